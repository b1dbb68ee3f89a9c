//! HTTP API for docdrop.
//!
//! Upload, list, fetch and delete documents as JSON endpoints under `/api`,
//! with blobs served read-only under the public prefix.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
