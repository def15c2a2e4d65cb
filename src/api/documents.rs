/// Document upload endpoints
///
/// Both endpoints take the raw document as the request body and classify it by its
/// `Content-Type` header. `/extract` previews the contact found in the document,
/// the other endpoint stores it straight away as a new lead.

use crate::{
    api::{error::ApiError, AppState},
    extractor::{DocumentKind, ExtractedContact},
    lead::Lead,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};

/// Create document processing routes
pub fn create_document_routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents/extract", post(extract_contact))
        .route("/api/documents", post(create_lead_from_document))
}

/// Decode the upload and extract a contact, failing with 422 when nothing is found
async fn extract_from_upload(
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<ExtractedContact, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let kind = DocumentKind::from_content_type(content_type)?;

    match state.documents.process(kind, body.to_vec()).await? {
        Some(contact) => Ok(contact),
        None => {
            tracing::warn!("⚠️ No contact details found in {:?} document", kind);
            Err(ApiError::ExtractionFailed)
        }
    }
}

/// Preview the contact found in a document
///
/// POST /api/documents/extract
async fn extract_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ExtractedContact>, ApiError> {
    let contact = extract_from_upload(&state, &headers, body).await?;
    Ok(Json(contact))
}

/// Create a lead from the contact found in a document
///
/// POST /api/documents
async fn create_lead_from_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let contact = extract_from_upload(&state, &headers, body).await?;

    let lead = state
        .storage
        .create_lead(contact.into_new_lead())
        .await
        .map_err(ApiError::storage("Failed to create lead"))?;

    tracing::info!("📄 Created lead {} ({}) from document", lead.id, lead.name);
    Ok((StatusCode::CREATED, Json(lead)))
}
