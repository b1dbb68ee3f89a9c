//! Document management for docdrop.
//!
//! This module provides the document lifecycle:
//! - Blob storage on local disk with generated unique names
//! - An in-memory, insertion-ordered metadata registry
//! - A service tying upload, listing and deletion together

mod model;
mod registry;
mod service;
mod storage;

pub use model::Document;
pub use registry::DocumentRegistry;
pub use service::{DocumentService, UploadRequest};
pub use storage::{BlobStore, StoredBlob};

/// Type tag assigned when the client does not supply one.
pub const DEFAULT_DOC_TYPE: &str = "Other";

/// Default maximum upload size (10MB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Default URL prefix blobs are served under.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/uploads";
