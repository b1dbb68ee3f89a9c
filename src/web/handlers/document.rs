//! Document handlers for the HTTP API.

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::document::{Document, UploadRequest};
use crate::web::dto::{SuccessResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::DocdropError;

/// Message returned when the request carries no file part.
const NO_FILE_MESSAGE: &str = "No file uploaded";

/// Build a `Content-Disposition: attachment` value for `filename`.
///
/// Plain ASCII names are quoted as-is. Anything else gets an ASCII fallback
/// (control characters dropped; quotes, backslashes and non-ASCII replaced
/// with `_`) plus an RFC 5987 `filename*` carrying the exact name.
fn attachment_disposition(filename: &str) -> String {
    let is_plain = filename
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');
    if is_plain {
        return format!("attachment; filename=\"{filename}\"");
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

/// Map a multipart read failure, keeping body-limit overruns distinct.
fn multipart_error(err: MultipartError, max_upload_size: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected by body limit: {}", err);
        ApiError::payload_too_large(max_upload_size)
    } else {
        tracing::warn!("Failed to read multipart field: {}", err);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// POST /api/upload - Upload a document.
///
/// Request body: multipart/form-data with a "file" part and an optional
/// "docType" text part.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let max_upload_size = state.max_upload_size();

    // A body that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without multipart body: {}", e);
        ApiError::bad_request(NO_FILE_MESSAGE)
    })?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut doc_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_size))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                // Parts without a filename are plain fields, and only the first file counts.
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                if file.is_some() {
                    continue;
                }
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_size))?;
                file = Some((filename, content.to_vec()));
            }
            "docType" => {
                doc_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, max_upload_size))?,
                );
            }
            _ => {}
        }
    }

    let (filename, content) = file.ok_or_else(|| ApiError::bad_request(NO_FILE_MESSAGE))?;

    let mut request = UploadRequest::new(filename, content);
    if let Some(doc_type) = doc_type {
        request = request.with_doc_type(doc_type);
    }

    let document = state.documents.upload(request).await?;

    Ok(Json(UploadResponse::new(document)))
}

/// GET /api/documents - List all documents in upload order.
pub async fn list_documents(State(state): State<Arc<AppState>>) -> Json<Vec<Document>> {
    Json(state.documents.list().await)
}

/// GET /api/documents/:id - Get document metadata.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let document = state.documents.get(&id).await?;
    Ok(Json(document))
}

/// GET /api/documents/:id/download - Download a document under its original name.
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let document = state.documents.get(&id).await?;

    let content = state
        .documents
        .load_content(&document)
        .await
        .map_err(|e| match e {
            DocdropError::NotFound(_) => {
                tracing::warn!(id = %document.id, "Blob missing for registered document");
                ApiError::not_found("Document not found")
            }
            other => other.into(),
        })?;

    let content_type = mime_guess::from_path(&document.filename)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&document.filename),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// DELETE /api/documents/:id - Delete a document and its blob.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.documents.delete(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}
