use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;

use crate::http::parser::{Limits, ParseError, parse_with_limits};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::router::Router;
use crate::store::FileStore;

const READ_CHUNK: usize = 4096;

/// Per-connection settings shared by every task.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub read_timeout: Duration,
    pub limits: Limits,
}

/// Serves exactly one request on a stream, then closes it.
pub struct Connection<T, S> {
    stream: T,
    buffer: BytesMut,
    state: ConnectionState,
    router: Arc<Router<S>>,
    settings: ConnectionSettings,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<T, S> Connection<T, S>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: FileStore,
{
    pub fn new(stream: T, router: Arc<Router<S>>, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            router,
            settings,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let read_timeout = self.settings.read_timeout;
                    self.state = match timeout(read_timeout, self.read_request()).await {
                        Ok(Ok(Some(req))) => ConnectionState::Processing(req),
                        Ok(Ok(None)) => ConnectionState::Closed,
                        Ok(Err(e)) => match e
                            .downcast_ref::<ParseError>()
                            .and_then(ParseError::status)
                        {
                            Some(status) => {
                                tracing::warn!(
                                    error = %e,
                                    status = status.as_u16(),
                                    "Rejecting request"
                                );
                                let response = Response::error(status);
                                ConnectionState::Writing(ResponseWriter::new(&response))
                            }
                            None => return Err(e),
                        },
                        Err(_) => {
                            tracing::warn!(
                                timeout_secs = read_timeout.as_secs(),
                                "Timed out waiting for request"
                            );
                            let response = Response::error(StatusCode::RequestTimeout);
                            ConnectionState::Writing(ResponseWriter::new(&response))
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = Self::handle_request(&self.router, req).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // No keep-alive: one request per connection
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until a full request is buffered.
    ///
    /// `Ok(None)` means the peer closed before sending anything. A close
    /// mid-request is [`ParseError::Incomplete`].
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            // Try parsing whatever we already have
            match parse_with_limits(&self.buffer, &self.settings.limits) {
                Ok((request, consumed)) => {
                    // Bytes past the declared body stay unread
                    self.buffer.advance(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(e.into()),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    // Client closed connection
                    return Ok(None);
                }
                return Err(ParseError::Incomplete.into());
            }
        }
    }

    async fn handle_request(router: &Router<S>, req: &Request) -> Response {
        let response = match router.handle(req).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    method = req.method.as_str(),
                    path = %req.path,
                    "Handler failed"
                );
                e.to_response()
            }
        };

        tracing::info!(
            method = req.method.as_str(),
            path = %req.path,
            status = response.status.as_u16(),
            "Request handled"
        );

        response
    }
}
