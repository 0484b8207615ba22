use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::mime;
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Bytes sent after a body. Existing clients expect a blank line here, which
/// is not strict HTTP/1.1.
const BODY_TRAILER: &[u8] = b"\r\n\r\n";

pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    let content_type = match (&resp.content_type, &resp.body) {
        (Some(ct), _) => Some(ct.as_str()),
        (None, Some(_)) => Some(mime::FALLBACK),
        (None, None) => None,
    };
    if let Some(ct) = content_type {
        buf.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
    }
    // A body always advertises its own length, whatever the struct says.
    let content_length = match &resp.body {
        Some(body) => Some(body.len() as u64),
        None => resp.content_length,
    };
    if let Some(len) = content_length {
        buf.extend_from_slice(format!("Content-Length: {len}\r\n").as_bytes());
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    if let Some(body) = &resp.body {
        buf.extend_from_slice(body);
        buf.extend_from_slice(BODY_TRAILER);
    }

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
