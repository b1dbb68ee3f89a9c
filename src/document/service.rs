//! Document service for docdrop.
//!
//! Ties the blob store and the registry together:
//! - Upload: write the blob, then register the record
//! - Delete: unregister the record, then unlink the blob (best effort)

use crate::{DocdropError, Result};

use super::{BlobStore, Document, DocumentRegistry};

/// Request data for a document upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub filename: String,
    /// Type tag (optional).
    pub doc_type: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            doc_type: None,
            content,
        }
    }

    /// Set the type tag.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }
}

/// Owns the blob store and the registry for the lifetime of the server.
#[derive(Debug)]
pub struct DocumentService {
    storage: BlobStore,
    registry: DocumentRegistry,
}

impl DocumentService {
    /// Create a service over `storage` with an empty registry.
    pub fn new(storage: BlobStore) -> Self {
        Self {
            storage,
            registry: DocumentRegistry::new(),
        }
    }

    pub fn storage(&self) -> &BlobStore {
        &self.storage
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Store the content and register a new record for it.
    ///
    /// The record is only created once the blob is on disk, so a rejected
    /// upload never leaves a registry entry behind.
    pub async fn upload(&self, request: UploadRequest) -> Result<Document> {
        let blob = self.storage.put(&request.content, &request.filename)?;

        let document = Document::new(
            request.filename,
            self.storage.filepath_for(&blob.stored_name),
            request.doc_type.as_deref(),
            blob.size,
        );
        self.registry.insert(document.clone()).await;

        tracing::info!(
            id = %document.id,
            filename = %document.filename,
            doc_type = %document.doc_type,
            size = document.size,
            "Document uploaded"
        );

        Ok(document)
    }

    /// All records in upload order.
    pub async fn list(&self) -> Vec<Document> {
        self.registry.list().await
    }

    /// Look up a single record.
    pub async fn get(&self, id: &str) -> Result<Document> {
        self.registry
            .find_by_id(id)
            .await
            .ok_or_else(|| DocdropError::NotFound("Document".to_string()))
    }

    /// Read the blob behind a record.
    pub async fn load_content(&self, document: &Document) -> Result<Vec<u8>> {
        let stored_name = self.stored_name_of(document)?;
        self.storage.load(&stored_name)
    }

    /// Remove a record and unlink its blob.
    ///
    /// Only a missing record is an error. The blob unlink is best effort: a blob
    /// that is already gone is fine, and any other unlink failure is logged and
    /// swallowed because the record is already removed.
    pub async fn delete(&self, id: &str) -> Result<Document> {
        let document = self.registry.remove(id).await?;

        match self.stored_name_of(&document) {
            Ok(stored_name) => match self.storage.delete(&stored_name) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(id = %document.id, "Blob already absent on delete");
                }
                Err(e) => {
                    tracing::warn!(id = %document.id, error = %e, "Failed to unlink blob");
                }
            },
            Err(e) => {
                tracing::warn!(id = %document.id, error = %e, "Record has no blob path");
            }
        }

        tracing::info!(id = %document.id, filename = %document.filename, "Document deleted");
        Ok(document)
    }

    fn stored_name_of(&self, document: &Document) -> Result<String> {
        self.storage
            .stored_name_from_filepath(&document.filepath)
            .ok_or_else(|| {
                DocdropError::Validation(format!(
                    "filepath {:?} is outside {}",
                    document.filepath,
                    self.storage.public_prefix()
                ))
            })
    }
}
