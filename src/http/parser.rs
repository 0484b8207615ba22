use thiserror::Error;

use crate::http::request::{Header, Method, Request};

/// Reasons a header block cannot become a [`Request`]. Every variant is
/// answered with 400 Bad Request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line must be `METHOD PATH VERSION`, got {0:?}")]
    MalformedRequestLine(String),
    #[error("header line without a colon: {0:?}")]
    InvalidHeader(String),
    #[error("request carries no header lines")]
    MissingHeaders,
    #[error("invalid Content-Length value {0:?}")]
    MalformedContentLength(String),
}

const CONTENT_LENGTH: &str = "Content-Length";

/// Parses a header block (the text before the blank line) into a request.
///
/// The block is tokenized line by line on CRLF. The first line must be
/// exactly `METHOD SP PATH SP VERSION`. Every following line is a header that
/// the first colon splits into name and value.
pub fn parse_header_block(block: &str) -> Result<Request, ParseError> {
    let mut lines = block.split("\r\n");

    let request_line = lines.next().unwrap_or_default();
    let (method, target, version) = parse_request_line(request_line)?;

    let mut headers = Vec::new();
    for line in lines {
        headers.push(parse_header_line(line)?);
    }

    // A well-formed request names at least its Host.
    if headers.is_empty() {
        return Err(ParseError::MissingHeaders);
    }

    let content_length = content_length(&headers)?;

    Ok(Request::from_parts(method, target, version, headers, content_length))
}

fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let malformed = || ParseError::MalformedRequestLine(line.to_string());

    let mut parts = line.split(' ');
    let (Some(method), Some(path), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    if method.is_empty() || path.is_empty() || version.is_empty() {
        return Err(malformed());
    }

    // Exactly one leading slash is stripped; percent-decoding is not applied.
    let target = path.strip_prefix('/').unwrap_or(path);

    Ok((Method::parse(method), target.to_string(), version.to_string()))
}

fn parse_header_line(line: &str) -> Result<Header, ParseError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::InvalidHeader(line.to_string()));
    }

    Ok(Header {
        name: name.to_string(),
        value: value.trim().to_string(),
    })
}

fn content_length(headers: &[Header]) -> Result<Option<u64>, ParseError> {
    let mut found: Option<u64> = None;

    for header in headers
        .iter()
        .filter(|h| h.name.eq_ignore_ascii_case(CONTENT_LENGTH))
    {
        let value = &header.value;
        let malformed = || ParseError::MalformedContentLength(value.clone());

        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let len = value.parse::<u64>().map_err(|_| malformed())?;

        match found {
            Some(prev) if prev != len => return Err(malformed()),
            _ => found = Some(len),
        }
    }

    Ok(found)
}
