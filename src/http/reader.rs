//! Pulls request bytes off a connection.
//!
//! Framing is strict CRLF: the header block ends at the first `\r\n\r\n`.
//! A bare `\n` or `\r` is ordinary header text and never ends the block.

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::parser::ParseError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const READ_CHUNK: usize = 4096;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("connection closed before any request bytes arrived")]
    Empty,
    #[error("header block is not valid UTF-8")]
    InvalidEncoding,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{0} request requires a Content-Length header")]
    MissingContentLength(String),
    #[error("Content-Length {0} does not fit in memory")]
    BodyTooLarge(u64),
    #[error("body ended after {received} of {expected} bytes")]
    IncompleteBody { expected: usize, received: usize },
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ReadError {
    /// Framing errors are answered with 400. I/O failures are not, since the
    /// client is most likely gone.
    pub fn is_framing(&self) -> bool {
        !matches!(self, ReadError::Io(_))
    }
}

/// Reads until the blank line that ends the header block and returns the
/// block's text without its terminator.
///
/// Bytes received past the terminator stay in `buf`; they are the start of
/// the body. If the stream ends before a terminator, whatever arrived is the
/// header block.
pub async fn read_header_block<R>(stream: &mut R, buf: &mut BytesMut) -> Result<String, ReadError>
where
    R: AsyncRead + Unpin,
{
    // Bytes before this offset were already searched for the terminator.
    let mut scanned = 0;

    loop {
        if let Some(end) = find_headers_end(buf, scanned) {
            let block = buf.split_to(end + HEADER_TERMINATOR.len());
            return decode(&block[..end]);
        }
        scanned = buf.len().saturating_sub(HEADER_TERMINATOR.len() - 1);

        buf.reserve(READ_CHUNK);
        let n = stream.read_buf(buf).await?;

        if n == 0 {
            if buf.is_empty() {
                return Err(ReadError::Empty);
            }
            let block = buf.split();
            let text = block.strip_suffix(b"\r\n").unwrap_or(&block[..]);
            return decode(text);
        }
    }
}

/// Reads exactly `len` body bytes, starting with any already buffered.
///
/// Bytes beyond `len` are left in `buf` untouched.
pub async fn read_body<R>(stream: &mut R, buf: &mut BytesMut, len: usize) -> Result<Bytes, ReadError>
where
    R: AsyncRead + Unpin,
{
    while buf.len() < len {
        buf.reserve(READ_CHUNK.min(len - buf.len()));
        let n = stream.read_buf(buf).await?;
        if n == 0 {
            return Err(ReadError::IncompleteBody {
                expected: len,
                received: buf.len(),
            });
        }
    }

    Ok(buf.split_to(len).freeze())
}

/// Position of the first terminator starting at or after `from`.
fn find_headers_end(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| from + pos)
}

fn decode(bytes: &[u8]) -> Result<String, ReadError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| ReadError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn leaves_body_bytes_in_buffer() {
        let mut input: &[u8] = b"PUT /doc/x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let mut buf = BytesMut::new();

        let block = read_header_block(&mut input, &mut buf).await.unwrap();

        assert_eq!(block, "PUT /doc/x HTTP/1.1\r\nContent-Length: 3");
        assert_eq!(&buf[..], b"abc");
    }

    #[tokio::test]
    async fn bare_newlines_do_not_end_the_block() {
        let mut input: &[u8] = b"GET / HTTP/1.1\n\nHost: a\r\n\r\n";
        let mut buf = BytesMut::new();

        let block = read_header_block(&mut input, &mut buf).await.unwrap();

        assert_eq!(block, "GET / HTTP/1.1\n\nHost: a");
    }

    #[test]
    fn terminator_search_resumes_from_offset() {
        let buf = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";

        assert_eq!(find_headers_end(buf, 0), Some(23));
        assert_eq!(find_headers_end(buf, 23), Some(23));
        assert_eq!(find_headers_end(buf, 24), None);
        assert_eq!(find_headers_end(buf, 100), None);
    }

    #[tokio::test]
    async fn terminator_split_across_reads_is_found() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let request = b"GET / HTTP/1.1\r\nHost: a\r\n\r\nrest";

        let writer = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            for byte in request {
                client.write_all(&[*byte]).await.unwrap();
                tokio::task::yield_now().await;
            }
            client
        });

        let mut buf = BytesMut::new();
        let block = read_header_block(&mut server, &mut buf).await.unwrap();
        let _client = writer.await.unwrap();

        assert_eq!(block, "GET / HTTP/1.1\r\nHost: a");
    }

    #[tokio::test]
    async fn body_read_stops_at_declared_length() {
        let mut input: &[u8] = b"defg";
        let mut buf = BytesMut::from(&b"abc"[..]);

        let body = read_body(&mut input, &mut buf, 5).await.unwrap();

        assert_eq!(&body[..], b"abcde");
    }
}
