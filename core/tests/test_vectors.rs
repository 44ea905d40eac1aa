//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, NewTodo, OrderUpdate, Snapshot, Todo, TodoClient, TodoEdit};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn cases(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Compare method, path, and (when the vector lists them) headers and body.
fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_error(name: &str, err: ApiError, expected: &serde_json::Value) {
    match expected.as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: NewTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_todo(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let id = c.parse_create_todo(simulated(&case)).unwrap();
        let expected: Uuid = case["expected_result"].as_str().unwrap().parse().unwrap();
        assert_eq!(id, expected, "{name}: parsed id");
    }
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[test]
fn toggle_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/toggle.json")) {
        let name = case["name"].as_str().unwrap();
        let id: Uuid = case["input_id"].as_str().unwrap().parse().unwrap();

        let req = c.build_toggle_todo(id);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_toggle_todo(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id: Uuid = case["input_id"].as_str().unwrap().parse().unwrap();
        let input: TodoEdit = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_todo(id, &input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_todo(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[test]
fn reorder_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/reorder.json")) {
        let name = case["name"].as_str().unwrap();
        let updates: Vec<OrderUpdate> = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_reorder_todos(&updates).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_reorder_todos(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

#[test]
fn watch_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/watch.json")) {
        let name = case["name"].as_str().unwrap();
        let after = case["input_after"].as_u64();

        let req = c.build_watch_todos(after);
        check_request(name, &req, &case["expected_request"]);

        let snapshot = c.parse_watch_todos(simulated(&case)).unwrap();
        let expected: Snapshot = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(snapshot, expected, "{name}: parsed result");
    }
}
