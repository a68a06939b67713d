//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection,
//! `Content-Length` framing only, no keep-alive or chunked bodies.
//!
//! # Architecture
//!
//! - **`connection`**: Drives one request-response cycle on a stream
//! - **`parser`**: Frames a request out of a byte buffer
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until a request parses
//!        └──────┬──────┘
//!               │ Request received         (parse error / timeout
//!               ▼                           skips to Writing with a
//!        ┌──────────────────┐               fallback response)
//!        │   Processing     │ ← Route and run the handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use courier::http::connection::{Connection, ConnectionSettings};
//! use courier::router::Router;
//! use courier::store::DirectoryStore;
//!
//! let router = Arc::new(Router::with_store(DirectoryStore::new("/tmp")));
//! let (socket, _addr) = listener.accept().await?;
//! tokio::spawn(async move {
//!     let mut conn = Connection::new(socket, router, settings);
//!     if let Err(e) = conn.run().await {
//!         tracing::error!("Connection error: {}", e);
//!     }
//! });
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
