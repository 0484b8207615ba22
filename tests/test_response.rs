use bytes::Bytes;
use docserver::http::response::{Response, ResponseBuilder, StatusCode};
use docserver::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Created.as_u16(), 201);
    assert_eq!(StatusCode::NoContent.as_u16(), 204);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::NotAcceptable.as_u16(), 406);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Created.reason_phrase(), "Created");
    assert_eq!(StatusCode::NoContent.reason_phrase(), "No Content");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
}

#[test]
fn test_response_builder_auto_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .content_type("text/plain")
        .body(b"This is the body".to_vec())
        .build();

    assert_eq!(response.content_length, Some(16));
    assert_eq!(response.content_type.as_deref(), Some("text/plain"));
}

#[test]
fn test_response_body_overrides_declared_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .content_length(999)
        .body("test")
        .build();

    assert_eq!(response.content_length, Some(4));
}

#[test]
fn test_response_length_without_body() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .content_type("text/html")
        .content_length(42)
        .build();

    assert_eq!(response.content_length, Some(42));
    assert!(response.body.is_none());
}

#[test]
fn test_header_only_helpers() {
    for (response, status) in [
        (Response::bad_request(), StatusCode::BadRequest),
        (Response::forbidden(), StatusCode::Forbidden),
        (Response::not_found(), StatusCode::NotFound),
        (Response::not_implemented(), StatusCode::NotImplemented),
        (Response::internal_error(), StatusCode::InternalServerError),
    ] {
        assert_eq!(response.status, status);
        assert_eq!(response.content_type, None);
        assert_eq!(response.content_length, None);
        assert_eq!(response.body, None);
    }
}

#[test]
fn test_serialize_head_style_response() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .content_type("text/html")
        .content_length(42)
        .build();

    assert_eq!(
        serialize_response(&response),
        b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 42\r\n\r\n"
    );
}

#[test]
fn test_serialize_body_without_type_uses_fallback() {
    let response = ResponseBuilder::new(StatusCode::Ok).body("x").build();
    let text = String::from_utf8(serialize_response(&response)).unwrap();

    assert!(text.contains("Content-Type: application/octet-stream\r\n"));
    assert!(text.ends_with("\r\n\r\nx\r\n\r\n"));
}

#[test]
fn test_serialize_status_only() {
    assert_eq!(
        serialize_response(&Response::status(StatusCode::Created)),
        b"HTTP/1.1 201 Created\r\n\r\n"
    );
}

#[test]
fn test_serialize_uses_body_length_over_stale_field() {
    let response = Response {
        status: StatusCode::Ok,
        content_type: Some("text/plain".to_string()),
        content_length: Some(999),
        body: Some(Bytes::from_static(b"abc")),
    };

    assert_eq!(
        serialize_response(&response),
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc\r\n\r\n"
    );
}
