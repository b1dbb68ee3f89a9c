//! API handlers for docdrop.

pub mod document;

pub use document::*;

use crate::document::DocumentService;

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Blob store and registry.
    pub documents: DocumentService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(documents: DocumentService) -> Self {
        Self { documents }
    }

    /// Upload ceiling in bytes.
    pub fn max_upload_size(&self) -> u64 {
        self.documents.storage().max_size()
    }
}
