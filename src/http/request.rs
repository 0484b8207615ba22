use std::fmt;

use bytes::Bytes;

/// HTTP request methods.
///
/// The server acts on GET, HEAD, POST, PUT and DELETE. Any other token is kept
/// verbatim as `Unknown` so the dispatcher can answer 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
    /// HEAD - Like GET but without the response body
    Head,
    /// POST - Create a resource or append to it
    Post,
    /// PUT - Replace a resource
    Put,
    /// DELETE - Delete a resource
    Delete,
    /// Any other method token
    Unknown(String),
}

impl Method {
    /// Parses an HTTP method from its request-line token.
    ///
    /// Matching is case-sensitive, so `get` is `Unknown`.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserver::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::Get);
    /// assert_eq!(Method::parse("get"), Method::Unknown("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Unknown(s) => s,
        }
    }

    /// Whether requests with this method carry a Content-Length framed body.
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `Name: Value` header line, split on its first colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Represents a parsed HTTP request from a client.
///
/// A request is never modified once built. The body is absent until it has
/// been read off the connection, at which point [`Request::with_body`]
/// produces a new request carrying it.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    target: String,
    version: String,
    headers: Vec<Header>,
    content_length: Option<u64>,
    body: Option<Bytes>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: Vec<Header>,
    content_length: Option<u64>,
    body: Option<Bytes>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the root-relative target, without its leading slash.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a header, keeping earlier headers with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn content_length(mut self, len: u64) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target: self.target.ok_or("target missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            content_length: self.content_length,
            body: self.body,
        })
    }
}

impl Request {
    pub(crate) fn from_parts(
        method: Method,
        target: String,
        version: String,
        headers: Vec<Header>,
        content_length: Option<u64>,
    ) -> Self {
        Self {
            method,
            target,
            version,
            headers,
            content_length,
            body: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The requested path relative to the server, leading slash stripped.
    /// Empty for a request of `/`.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Header lines in the order they were received.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Retrieves a header value by name, case-insensitively.
    ///
    /// When a header repeats, the first occurrence wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// The declared body length, or `None` if the request had no
    /// Content-Length header.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns this request with its body attached.
    pub fn with_body(self, body: Bytes) -> Self {
        Self {
            body: Some(body),
            ..self
        }
    }
}
