use axum::http::HeaderValue;

use insight_relay::infrastructure::observability::{REQUEST_ID_HEADER, RequestId};

#[test]
fn given_request_id_header_constant_when_accessed_then_returns_correct_value() {
    assert_eq!(REQUEST_ID_HEADER, "x-request-id");
}

#[test]
fn given_printable_header_when_reading_request_id_then_keeps_caller_value() {
    let header = HeaderValue::from_static("trace-abc-123");

    let request_id = RequestId::from_header(Some(&header));

    assert_eq!(request_id, RequestId("trace-abc-123".to_string()));
}

#[test]
fn given_missing_header_when_reading_request_id_then_generates_uuid() {
    let request_id = RequestId::from_header(None);

    assert!(uuid::Uuid::parse_str(&request_id.0).is_ok());
}

#[test]
fn given_oversized_header_when_reading_request_id_then_generates_new_one() {
    let long = "a".repeat(200);
    let header = HeaderValue::from_str(&long).unwrap();

    let request_id = RequestId::from_header(Some(&header));

    assert_ne!(request_id.0, long);
    assert!(uuid::Uuid::parse_str(&request_id.0).is_ok());
}

#[test]
fn given_header_with_spaces_when_reading_request_id_then_generates_new_one() {
    let header = HeaderValue::from_static("two words");

    let request_id = RequestId::from_header(Some(&header));

    assert_ne!(request_id.0, "two words");
}
