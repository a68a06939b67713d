//! Request routing
//!
//! Dispatch is purely structural: [`route`] looks at the method and a path
//! prefix and never touches I/O. [`Router`] pairs the resolved [`Route`]
//! with its handler and the optional [`FileStore`].
//!
//! ```text
//! Request → route() → Route → handlers::* → Response
//! ```

pub mod handlers;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::store::{FileStore, StoreError};

const ECHO_PREFIX: &str = "/echo/";
const USER_AGENT_PREFIX: &str = "/user-agent";
const FILES_PREFIX: &str = "/files/";

/// Handler selected for a request, borrowing path segments from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/` with any method
    Root,
    /// `GET /echo/{text}`
    Echo(&'a str),
    /// `GET /user-agent`
    UserAgent,
    /// `GET /files/{name}`
    ReadFile(&'a str),
    /// `POST /files/{name}`
    WriteFile(&'a str),
    NotFound,
}

/// Resolves the route for a request. First match wins.
pub fn route(req: &Request) -> Route<'_> {
    let path = req.path.as_str();

    if path == "/" {
        return Route::Root;
    }

    match req.method {
        Method::GET => {
            if let Some(text) = path.strip_prefix(ECHO_PREFIX) {
                Route::Echo(text)
            } else if path.starts_with(USER_AGENT_PREFIX) {
                Route::UserAgent
            } else if let Some(name) = path.strip_prefix(FILES_PREFIX) {
                Route::ReadFile(name)
            } else {
                Route::NotFound
            }
        }
        Method::POST => match path.strip_prefix(FILES_PREFIX) {
            Some(name) => Route::WriteFile(name),
            None => Route::NotFound,
        },
        _ => Route::NotFound,
    }
}

/// Failures a handler reports instead of a response.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("missing filename in request path")]
    MissingFilename,
    #[error("invalid filename {0:?}")]
    InvalidFilename(String),
    #[error("no directory configured for file routes")]
    StoreUnconfigured,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::MissingFilename | HandlerError::InvalidFilename(_) => {
                StatusCode::BadRequest
            }
            HandlerError::StoreUnconfigured | HandlerError::Store(_) => {
                StatusCode::InternalServerError
            }
        }
    }

    pub fn to_response(&self) -> Response {
        Response::error(self.status())
    }
}

/// Dispatches requests to the endpoint handlers.
///
/// `store` is `None` when the server was started without a directory; the
/// file routes then fail with [`HandlerError::StoreUnconfigured`].
pub struct Router<S> {
    store: Option<S>,
}

impl<S: FileStore> Router<S> {
    pub fn new(store: Option<S>) -> Self {
        Self { store }
    }

    pub fn with_store(store: S) -> Self {
        Self::new(Some(store))
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub async fn handle(&self, req: &Request) -> Result<Response, HandlerError> {
        match route(req) {
            Route::Root => Ok(handlers::root()),
            Route::Echo(text) => Ok(handlers::echo(text)),
            Route::UserAgent => Ok(handlers::user_agent(req)),
            Route::ReadFile(name) => handlers::read_file(self.store(), name).await,
            Route::WriteFile(name) => handlers::write_file(self.store(), name, &req.body).await,
            Route::NotFound => Ok(handlers::not_found()),
        }
    }
}
