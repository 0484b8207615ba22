use bytes::Bytes;

/// HTTP status codes the server answers with.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource created
/// - `NoContent` (204): Resource replaced or deleted
/// - `BadRequest` (400): Malformed request framing
/// - `Forbidden` (403): Target outside the document root, or not a regular file
/// - `NotFound` (404): Resource not found
/// - `NotAcceptable` (406): Unknown form action
/// - `InternalServerError` (500): Server error
/// - `NotImplemented` (501): Method not supported for the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 406 Not Acceptable
    NotAcceptable,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserver::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::NotAcceptable => 406,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotAcceptable => "Not Acceptable",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
///
/// When `body` is present, `content_length` equals its byte length. A HEAD
/// response carries a `content_length` without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: Option<Bytes>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use docserver::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/plain")
///     .body("hi")
///     .build();
/// assert_eq!(response.content_length, Some(2));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: Option<String>,
    content_length: Option<u64>,
    body: Option<Bytes>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            content_length: None,
            body: None,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declares a length without sending a body, as HEAD does.
    pub fn content_length(mut self, len: u64) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the final Response.
    ///
    /// A body always overrides any declared length with its own.
    pub fn build(mut self) -> Response {
        if let Some(body) = &self.body {
            self.content_length = Some(body.len() as u64);
        }

        Response {
            status: self.status,
            content_type: self.content_type,
            content_length: self.content_length,
            body: self.body,
        }
    }
}

impl Response {
    /// A header-only response: status line and blank line.
    pub fn status(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    pub fn bad_request() -> Self {
        Self::status(StatusCode::BadRequest)
    }

    pub fn forbidden() -> Self {
        Self::status(StatusCode::Forbidden)
    }

    pub fn not_found() -> Self {
        Self::status(StatusCode::NotFound)
    }

    pub fn not_implemented() -> Self {
        Self::status(StatusCode::NotImplemented)
    }

    pub fn internal_error() -> Self {
        Self::status(StatusCode::InternalServerError)
    }
}
