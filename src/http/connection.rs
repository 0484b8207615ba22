use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::files::{self, Authorization};
use crate::http::parser::parse_header_block;
use crate::http::reader::{self, ReadError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Unread request bytes discarded after the response, so closing the socket
/// does not reset the connection before the client reads the response.
const LINGER_LIMIT: usize = 64 * 1024;

/// Longest a finished connection waits for the client to close its side.
const LINGER_TIMEOUT: Duration = Duration::from_secs(2);

/// One accepted client, handled from first byte to close.
///
/// Exactly one request is served per connection; the stream is shut down
/// after the response is written.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<Config>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            config,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Ok(req) => ConnectionState::Processing(req),
                        Err(e) if e.is_framing() => {
                            warn!(error = %e, "Rejecting malformed request");
                            ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()))
                        }
                        Err(e) => return Err(e.into()),
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(req).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;
                    self.linger().await;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Discards input until the client closes its side, the byte limit is
    /// hit, or `LINGER_TIMEOUT` passes.
    async fn linger(&mut self) {
        let mut sink = [0u8; 4096];
        let mut drained = self.buffer.len();
        self.buffer.clear();

        let drain = async {
            while drained < LINGER_LIMIT {
                match self.stream.read(&mut sink).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => drained += n,
                }
            }
        };

        if tokio::time::timeout(LINGER_TIMEOUT, drain).await.is_err() {
            debug!("Client kept its side open, closing");
        }
    }

    async fn read_request(&mut self) -> Result<Request, ReadError> {
        let block = reader::read_header_block(&mut self.stream, &mut self.buffer).await?;
        Ok(parse_header_block(&block)?)
    }

    /// Attaches the Content-Length framed body to a POST or PUT request.
    async fn read_body(&mut self, req: Request) -> Result<Request, ReadError> {
        let declared = req
            .content_length()
            .ok_or_else(|| ReadError::MissingContentLength(req.method().to_string()))?;
        let len = usize::try_from(declared).map_err(|_| ReadError::BodyTooLarge(declared))?;

        let body = reader::read_body(&mut self.stream, &mut self.buffer, len).await?;
        debug!(bytes = body.len(), "Read request body");
        Ok(req.with_body(body))
    }

    async fn handle_request(&mut self, req: Request) -> Response {
        let config = Arc::clone(&self.config);
        let docs = &config.documents;

        let resource = match files::authorize(req.target(), docs).await {
            Ok(Authorization::Authorized(resource)) => resource,
            Ok(Authorization::Forbidden) => {
                log_response(&req, &Response::forbidden());
                return Response::forbidden();
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Authorization failed");
                return Response::internal_error();
            }
        };

        let req = if req.method().carries_body() {
            match self.read_body(req).await {
                Ok(req) => req,
                Err(e) => {
                    warn!(error = %e, "Rejecting request body");
                    return Response::bad_request();
                }
            }
        } else {
            req
        };

        let response = match files::dispatch(&req, &resource, docs).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    method = %req.method(),
                    target = %req.target(),
                    error = %format!("{e:#}"),
                    "Request handling failed"
                );
                Response::internal_error()
            }
        };

        log_response(&req, &response);
        response
    }
}

fn log_response(req: &Request, response: &Response) {
    info!(
        method = %req.method(),
        target = %req.target(),
        status = response.status.as_u16(),
        "Request handled"
    );
}
