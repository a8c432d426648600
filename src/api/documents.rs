//! Document upload endpoints

use std::convert::Infallible;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use bytes::BytesMut;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, warn};

use super::state::AppState;
use super::types::{ApiError, Json, UploadResponse};
use crate::domain::extraction::extension_of;
use crate::domain::ingestion::{validate_upload, ProgressEvent, RawDocument, UploadLimits};
use crate::domain::DomainError;

const FILE_FIELD: &str = "file";

/// `POST /api/documents/upload`
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let document = read_upload(multipart, state.ingestion.limits()).await?;
    debug!(filename = %document.filename(), size = document.size(), "Upload received");

    let result = state.ingestion.ingest(document).await?;

    Ok(Json(UploadResponse::from(result)))
}

/// `POST /api/documents/upload/progress`
///
/// Streams `data: {"progress": ...}` events ending in `done` or `error`.
pub async fn upload_document_with_progress(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events: BoxStream<'static, ProgressEvent> =
        match read_upload(multipart, state.ingestion.limits()).await {
            Ok(document) => state.ingestion.ingest_with_progress(document),
            Err(e) => {
                warn!(error = %e, "Upload rejected before ingestion");
                stream::iter([
                    ProgressEvent::Uploading,
                    ProgressEvent::error(e.message()),
                ])
                .boxed()
            }
        };

    Sse::new(events.map(|event| Ok(to_sse_event(&event)))).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &ProgressEvent) -> Event {
    match Event::default().json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            warn!(error = %e, "Failed to serialize progress event");
            Event::default().data(r#"{"progress":"error","message":"Internal server error"}"#)
        }
    }
}

/// Read the `file` field of a multipart body
///
/// Reading stops as soon as the upload exceeds the size limit.
async fn read_upload(mut multipart: Multipart, limits: &UploadLimits) -> Result<RawDocument, ApiError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let extension = extension_of(&filename).unwrap_or_default().to_string();

        // Reject by name before reading any content
        validate_upload(&filename, &extension, 0, limits)?;

        let mut buffer = BytesMut::new();

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            buffer.extend_from_slice(&chunk);
            validate_upload(&filename, &extension, buffer.len(), limits)?;
        }

        return Ok(RawDocument::new(filename, buffer.freeze()));
    }

    Err(DomainError::validation("No file was attached").into())
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Request body is too large")
    } else {
        ApiError::bad_request(format!("Failed to read multipart field: {}", e.body_text()))
            .with_param(FILE_FIELD)
    }
}
