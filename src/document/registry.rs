//! In-memory document registry.

use tokio::sync::RwLock;

use crate::{DocdropError, Result};

use super::Document;

/// Insertion-ordered set of document records, held for the life of the process.
///
/// All access goes through an async `RwLock`: inserts and removals take the
/// write lock, reads share the read lock.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: RwLock<Vec<Document>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub async fn insert(&self, document: Document) {
        self.documents.write().await.push(document);
    }

    /// Snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    /// First record whose ID equals `id`.
    pub async fn find_by_id(&self, id: &str) -> Option<Document> {
        self.documents
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    /// Remove the first record whose ID equals `id` and hand it back.
    pub async fn remove(&self, id: &str) -> Result<Document> {
        let mut documents = self.documents.write().await;
        let index = documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DocdropError::NotFound("Document".to_string()))?;

        Ok(documents.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}
