//! docdrop - minimal document drop service
//!
//! Upload, list and delete documents over HTTP. Metadata lives in memory,
//! bytes live on local disk.

pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod web;

pub use config::Config;
pub use document::{BlobStore, Document, DocumentRegistry, DocumentService, UploadRequest};
pub use error::{DocdropError, Result};
