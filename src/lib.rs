//! Courier - minimal HTTP/1.1 file server
//!
//! Core library: request framing, routing, endpoint handlers and the
//! file store behind the `/files/` routes.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod store;
