//! Blob storage for docdrop.
//!
//! Uploaded bytes are written into a single flat directory so that the
//! directory can be mounted directly as the public static prefix:
//!
//! ```text
//! {base_path}/
//! ├── 1760870400123-3f2a9c1d-report.pdf
//! ├── 1760870400456-9be01c77-scan.png
//! └── ...
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::{DocdropError, Result};

use super::{DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_PUBLIC_PREFIX};

/// Fallback name used when sanitizing leaves nothing.
const FALLBACK_NAME: &str = "file";

/// Outcome of a successful [`BlobStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Generated on-disk filename.
    pub stored_name: String,
    /// Bytes written, as reported by the filesystem.
    pub size: u64,
}

/// Local-disk blob store.
#[derive(Debug, Clone)]
pub struct BlobStore {
    base_path: PathBuf,
    max_size: u64,
    public_prefix: String,
}

impl BlobStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            max_size: DEFAULT_MAX_UPLOAD_SIZE,
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
        })
    }

    /// Set the upload ceiling in bytes.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the URL prefix blobs are served under. A trailing slash is dropped.
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.public_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Write `content` under a freshly generated name derived from `original_name`.
    ///
    /// Fails with [`DocdropError::SizeLimitExceeded`] if the payload is over the
    /// ceiling; nothing is written in that case.
    pub fn put(&self, content: &[u8], original_name: &str) -> Result<StoredBlob> {
        let size = content.len() as u64;
        if size > self.max_size {
            return Err(DocdropError::SizeLimitExceeded {
                size,
                limit: self.max_size,
            });
        }

        let stored_name = Self::generate_stored_name(original_name);
        let file_path = self.base_path.join(&stored_name);

        // The directory may have been removed out from under us since startup.
        fs::create_dir_all(&self.base_path)?;
        fs::write(&file_path, content)?;
        let size = fs::metadata(&file_path)?.len();

        tracing::debug!(stored_name = %stored_name, size, "Stored blob");

        Ok(StoredBlob { stored_name, size })
    }

    /// Read a blob back.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.file_path(stored_name)?;

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(DocdropError::NotFound(format!("Blob {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a blob.
    ///
    /// Deleting a blob that is already gone is not an error: the call returns
    /// `Ok(false)`. Any other unlink failure is returned.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        let file_path = self.file_path(stored_name)?;

        match fs::remove_file(&file_path) {
            Ok(()) => {
                tracing::debug!(stored_name = %stored_name, "Deleted blob");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Full on-disk path for a stored name.
    ///
    /// Names that could escape the base directory are rejected.
    pub fn file_path(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name.starts_with('.')
            || stored_name.contains(['/', '\\'])
        {
            return Err(DocdropError::Validation(format!(
                "invalid stored name: {stored_name:?}"
            )));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Public URL path of a stored blob, percent-encoded so it can be requested as-is.
    pub fn filepath_for(&self, stored_name: &str) -> String {
        format!("{}/{}", self.public_prefix, urlencoding::encode(stored_name))
    }

    /// Reverse of [`BlobStore::filepath_for`]. `None` if the path is not under the prefix.
    pub fn stored_name_from_filepath(&self, filepath: &str) -> Option<String> {
        let encoded = filepath
            .strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')
            .filter(|name| !name.is_empty())?;
        urlencoding::decode(encoded).ok().map(|name| name.into_owned())
    }

    /// Build `<unix millis>-<8 hex>-<sanitized original>`.
    pub fn generate_stored_name(original_name: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let nonce = Uuid::new_v4().simple().to_string();
        format!(
            "{millis}-{}-{}",
            &nonce[..8],
            Self::sanitize_name(original_name)
        )
    }

    /// Make a client filename safe to use as a single path segment.
    fn sanitize_name(original_name: &str) -> String {
        let cleaned: String = original_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | '?' | '#' | '%' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        let cleaned = cleaned.trim_start_matches('.').trim();
        if cleaned.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            cleaned.to_string()
        }
    }
}
