//! Verify build/parse methods and the formatter against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use chrono::FixedOffset;
use serde_json::Value;
use todo_core::{ApiError, DateTimeFormatter, HttpMethod, HttpRequest, HttpResponse, Todo, TodoClient};

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

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

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
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Compare against `expected_result`, or `expected_error` when present.
fn check_outcome<T: PartialEq + std::fmt::Debug>(
    name: &str,
    case: &Value,
    result: Result<T, ApiError>,
    expected: impl Fn(&Value) -> T,
) {
    match case.get("expected_error") {
        Some(expected_error) => match result.unwrap_err() {
            ApiError::Server { status, message } => {
                assert_eq!(u64::from(status), expected_error["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(message, expected_error["message"].as_str().unwrap(), "{name}: message");
            }
            other => panic!("{name}: unexpected error {other:?}"),
        },
        None => assert_eq!(result.unwrap(), expected(&case["expected_result"]), "{name}: parsed result"),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let query = case["query"].as_str();

        let req = c.build_list_todos(query);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_todos(simulated(&case));
        check_outcome(name, &case, result, |v| serde_json::from_value::<Vec<Todo>>(v.clone()).unwrap());
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
        let input: Todo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_todo(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_todo(simulated(&case));
        check_outcome(name, &case, result, |v| serde_json::from_value::<Todo>(v.clone()).unwrap());
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
        let input: Todo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_todo(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_todo(simulated(&case));
        check_outcome(name, &case, result, |v| serde_json::from_value::<Todo>(v.clone()).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_delete_todo(id);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_todo(simulated(&case));
        check_outcome(name, &case, result, Value::clone);
    }
}

// ---------------------------------------------------------------------------
// Date/time formatting
// ---------------------------------------------------------------------------

#[test]
fn datetime_test_vectors() {
    for case in cases(include_str!("../../test-vectors/datetime.json")) {
        let name = case["name"].as_str().unwrap();
        let zone = FixedOffset::east_opt(case["zone_offset_seconds"].as_i64().unwrap() as i32).unwrap();
        let formatter = DateTimeFormatter::new(zone);

        let out = formatter.format(
            case["input"].as_str().unwrap(),
            case["offset_hours"].as_f64(),
            case["format"].as_str(),
        );
        assert_eq!(out, case["expected"].as_str().unwrap(), "{name}");
    }
}
