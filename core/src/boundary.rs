//! Top-level render boundary.
//!
//! Every frame is produced inside [`render_guard`]. An error returned by the
//! render closure, or a panic inside it, becomes an [`ErrorPanel`] the host
//! can show instead of a blank or crashed screen.

use std::any::Any;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

/// Readable replacement for a frame that failed to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub title: &'static str,
    pub message: String,
}

impl ErrorPanel {
    fn new(message: String) -> Self {
        Self {
            title: "Something went wrong",
            message,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run one render pass, catching errors and panics.
pub fn render_guard<T, E, F>(render: F) -> Result<T, ErrorPanel>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(Ok(frame)) => Ok(frame),
        Ok(Err(e)) => {
            error!(error = %e, "render failed");
            Err(ErrorPanel::new(e.to_string()))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(%message, "render panicked");
            Err(ErrorPanel::new(message))
        }
    }
}
