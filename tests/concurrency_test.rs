//! Concurrency tests for docdrop.
//!
//! These tests verify that the shared registry and blob store hold up when
//! many requests race on the same service.

use std::collections::HashSet;
use std::sync::Arc;

use docdrop::{BlobStore, DocdropError, DocumentService, UploadRequest};
use tempfile::TempDir;

/// Setup a service over a temporary upload directory.
fn setup_service() -> (Arc<DocumentService>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = BlobStore::new(temp_dir.path()).unwrap();
    (Arc::new(DocumentService::new(storage)), temp_dir)
}

/// Test concurrent uploads of the same filename.
///
/// Every upload must get its own id and its own blob on disk.
#[tokio::test]
async fn test_concurrent_uploads() {
    let (service, temp_dir) = setup_service();

    const NUM_UPLOADS: usize = 20;

    let mut handles = Vec::new();
    for i in 0..NUM_UPLOADS {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let request = UploadRequest::new("same.txt", format!("payload {}", i).into_bytes());
            service.upload(request).await
        }));
    }

    let mut ids = HashSet::new();
    let mut filepaths = HashSet::new();
    for handle in handles {
        let document = handle.await.unwrap().unwrap();
        ids.insert(document.id);
        filepaths.insert(document.filepath);
    }

    assert_eq!(ids.len(), NUM_UPLOADS);
    assert_eq!(filepaths.len(), NUM_UPLOADS);
    assert_eq!(service.list().await.len(), NUM_UPLOADS);
    assert_eq!(
        std::fs::read_dir(temp_dir.path()).unwrap().count(),
        NUM_UPLOADS
    );
}

/// Test concurrent deletes of the same document.
///
/// Exactly one delete wins; the rest see a missing record.
#[tokio::test]
async fn test_concurrent_deletes_of_one_document() {
    let (service, temp_dir) = setup_service();

    let document = service
        .upload(UploadRequest::new("target.txt", b"target".to_vec()))
        .await
        .unwrap();
    let survivor = service
        .upload(UploadRequest::new("survivor.txt", b"survivor".to_vec()))
        .await
        .unwrap();

    const NUM_DELETES: usize = 10;

    let mut handles = Vec::new();
    for _ in 0..NUM_DELETES {
        let service = Arc::clone(&service);
        let id = document.id.clone();
        handles.push(tokio::spawn(async move { service.delete(&id).await }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(deleted) => {
                assert_eq!(deleted.id, document.id);
                succeeded += 1;
            }
            Err(DocdropError::NotFound(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(succeeded, 1);

    let remaining = service.list().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor.id);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

/// Test uploads and deletes interleaved across tasks.
#[tokio::test]
async fn test_concurrent_upload_and_delete() {
    let (service, _temp_dir) = setup_service();

    let mut seeded = Vec::new();
    for i in 0..5 {
        let document = service
            .upload(UploadRequest::new(format!("seed{}.txt", i), vec![i as u8]))
            .await
            .unwrap();
        seeded.push(document.id);
    }

    let mut handles = Vec::new();
    for id in seeded {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.delete(&id).await.map(|_| ())
        }));
    }
    for i in 0..5 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .upload(UploadRequest::new(format!("new{}.txt", i), vec![i as u8]))
                .await
                .map(|_| ())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let remaining = service.list().await;
    assert_eq!(remaining.len(), 5);
    assert!(remaining.iter().all(|d| d.filename.starts_with("new")));
}
