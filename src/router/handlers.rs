//! Endpoint handlers, one per route.

use crate::http::request::Request;
use crate::http::response::{
    CONTENT_TYPE, OCTET_STREAM, Response, ResponseBuilder, StatusCode,
};
use crate::router::HandlerError;
use crate::store::FileStore;

pub fn root() -> Response {
    ResponseBuilder::new(StatusCode::Ok).build()
}

/// Returns `text` verbatim, without percent-decoding.
pub fn echo(text: &str) -> Response {
    Response::text(text)
}

/// Reflects the `User-Agent` header, or an empty body when there is none.
pub fn user_agent(req: &Request) -> Response {
    Response::text(req.header("user-agent").unwrap_or_default())
}

pub fn not_found() -> Response {
    Response::not_found()
}

pub async fn read_file<S: FileStore>(
    store: Option<&S>,
    name: &str,
) -> Result<Response, HandlerError> {
    let name = check_filename(name)?;
    let store = store.ok_or(HandlerError::StoreUnconfigured)?;

    match store.read(name).await? {
        Some(bytes) => Ok(ResponseBuilder::new(StatusCode::Ok)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(bytes)
            .build()),
        None => Ok(Response::not_found()),
    }
}

/// Persists the request body as `name`, replacing any existing file.
pub async fn write_file<S: FileStore>(
    store: Option<&S>,
    name: &str,
    body: &[u8],
) -> Result<Response, HandlerError> {
    let name = check_filename(name)?;
    let store = store.ok_or(HandlerError::StoreUnconfigured)?;

    store.write(name, body).await?;
    Ok(Response::created())
}

/// A filename must be a single, non-empty path segment.
fn check_filename(name: &str) -> Result<&str, HandlerError> {
    if name.is_empty() {
        return Err(HandlerError::MissingFilename);
    }

    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(HandlerError::InvalidFilename(name.to_string()));
    }

    Ok(name)
}
