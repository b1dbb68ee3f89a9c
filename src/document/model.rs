//! Document record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DEFAULT_DOC_TYPE;

/// Metadata for one uploaded document.
///
/// Serialized with camelCase keys, which is the wire shape clients read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document ID, the sole lookup key for deletion.
    pub id: String,
    /// Original client-supplied filename (display only).
    pub filename: String,
    /// Public path of the blob, e.g. `/uploads/1700000000000-3f2a9c1d-report.pdf`.
    pub filepath: String,
    /// Free-form type tag.
    pub doc_type: String,
    /// When the document was registered.
    pub uploaded_at: DateTime<Utc>,
    /// Blob size in bytes.
    pub size: u64,
}

impl Document {
    /// Create a new record with a fresh ID and the current timestamp.
    ///
    /// A missing or blank `doc_type` falls back to [`DEFAULT_DOC_TYPE`].
    pub fn new(
        filename: impl Into<String>,
        filepath: impl Into<String>,
        doc_type: Option<&str>,
        size: u64,
    ) -> Self {
        let doc_type = match doc_type {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => DEFAULT_DOC_TYPE.to_string(),
        };

        Self {
            id: generate_id(),
            filename: filename.into(),
            filepath: filepath.into(),
            doc_type,
            uploaded_at: Utc::now(),
            size,
        }
    }
}

/// Random 32-character hex ID.
fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
