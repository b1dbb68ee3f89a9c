//! Response DTOs for the docdrop HTTP API.

use serde::Serialize;

use crate::document::Document;

/// Body of a successful upload: `{"success": true, "document": {...}}`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub document: Document,
}

impl UploadResponse {
    pub fn new(document: Document) -> Self {
        Self {
            success: true,
            document,
        }
    }
}

/// Bare acknowledgement: `{"success": true}`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
