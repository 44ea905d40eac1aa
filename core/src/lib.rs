//! Client core for a reactive todo list.
//!
//! # Overview
//! The todo collection lives in a hosted reactive store. This crate holds
//! the client side of it: the record model, the store boundary, and the
//! screen state that turns live snapshots into a filtered list and user
//! actions into store mutations.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`, and the host does the I/O.
//! - `TodoStore` is the seam between screen logic and storage, with an
//!   in-memory implementation and one driven through a host `Transport`.
//! - `TodoController` owns only ephemeral UI state; the list it shows is
//!   always the latest snapshot pushed by the store.
//! - DTOs are defined independently from the mock-store crate; integration
//!   tests catch schema drift.

pub mod boundary;
pub mod client;
pub mod composer;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod memory;
pub mod remote;
pub mod reorder;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use boundary::{render_guard, ErrorPanel};
pub use client::TodoClient;
pub use composer::Composer;
pub use config::StoreConfig;
pub use controller::{Connection, TodoController};
pub use error::{ApiError, InputError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use memory::MemoryStore;
pub use remote::{RemoteStore, Transport};
pub use reorder::{move_item, plan_reorder};
pub use session::{DetailSession, Draft};
pub use store::{Feed, Subscription, TodoStore};
pub use types::{NewTodo, OrderUpdate, Snapshot, Status, Todo, TodoEdit};
pub use view::{filter_todos, Filter, ListView, Row, Theme};
