/// Lead management REST API endpoints
///
/// CRUD over leads plus the status filter used by the dashboard and the canned
/// assistant behind the lead chat panel.

use crate::{
    api::{
        error::{parse_id, parse_json_body, ApiError},
        AppState,
    },
    lead::{assistant, Lead, LeadFilter, LeadPatch, NewLead},
    validation::FieldReader,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

const LEAD_NOT_FOUND: &str = "Lead not found";

/// Query string for lead listing
#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    /// "All", "New" or "Contacted"
    pub status: Option<String>,
}

/// Reply from the lead assistant
#[derive(Debug, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub reply: String,
}

/// Create lead management routes
pub fn create_lead_routes() -> Router<AppState> {
    Router::new()
        .route("/api/leads", get(list_leads).post(create_lead))
        .route(
            "/api/leads/{id}",
            get(get_lead).patch(update_lead).delete(delete_lead),
        )
        .route(
            "/api/leads/{id}/interact",
            get(greet_lead).post(interact_with_lead),
        )
}

/// List leads, newest first
///
/// GET /api/leads?status=New
async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let filter = match query.status.as_deref() {
        Some(raw) => LeadFilter::parse(raw)
            .map_err(|e| ApiError::validation("Invalid lead filter", vec![e]))?,
        None => LeadFilter::All,
    };

    let leads = state
        .storage
        .list_leads(filter)
        .await
        .map_err(ApiError::storage("Failed to fetch leads"))?;
    Ok(Json(leads))
}

/// Get a single lead
///
/// GET /api/leads/{id}
async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, ApiError> {
    let id = parse_id(&id, LEAD_NOT_FOUND)?;
    state
        .storage
        .get_lead(id)
        .await
        .map_err(ApiError::storage("Failed to fetch lead"))?
        .map(Json)
        .ok_or(ApiError::NotFound(LEAD_NOT_FOUND))
}

/// Create a new lead
///
/// POST /api/leads
/// Body: { "name": "...", "email": "...", "phone"?: "...", "status"?: "New", "source"?: "Manual" }
async fn create_lead(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    const INVALID: &str = "Invalid lead data";
    let payload = parse_json_body(&body, INVALID)?;
    let new_lead = NewLead::from_json(&payload).map_err(|errors| ApiError::validation(INVALID, errors))?;

    let lead = state
        .storage
        .create_lead(new_lead)
        .await
        .map_err(ApiError::storage("Failed to create lead"))?;

    tracing::info!("➕ Created lead {} ({}, source: {})", lead.id, lead.name, lead.source);
    Ok((StatusCode::CREATED, Json(lead)))
}

/// Partially update a lead
///
/// PATCH /api/leads/{id}
/// Body: any subset of the creation fields
async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<Lead>, ApiError> {
    const INVALID: &str = "Invalid update data";
    let id = parse_id(&id, LEAD_NOT_FOUND)?;
    let payload = parse_json_body(&body, INVALID)?;
    let patch = LeadPatch::from_json(&payload).map_err(|errors| ApiError::validation(INVALID, errors))?;

    let lead = state
        .storage
        .update_lead(id, patch)
        .await
        .map_err(ApiError::storage("Failed to update lead"))?
        .ok_or(ApiError::NotFound(LEAD_NOT_FOUND))?;

    tracing::info!("✏️ Updated lead {} (status: {})", lead.id, lead.status);
    Ok(Json(lead))
}

/// Delete a lead
///
/// DELETE /api/leads/{id}
async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, LEAD_NOT_FOUND)?;
    let deleted = state
        .storage
        .delete_lead(id)
        .await
        .map_err(ApiError::storage("Failed to delete lead"))?;

    if !deleted {
        return Err(ApiError::NotFound(LEAD_NOT_FOUND));
    }

    tracing::info!("🗑️ Deleted lead {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Opening line of a conversation about a lead
///
/// GET /api/leads/{id}/interact
async fn greet_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InteractionResponse>, ApiError> {
    let id = parse_id(&id, LEAD_NOT_FOUND)?;
    let lead = state
        .storage
        .get_lead(id)
        .await
        .map_err(ApiError::storage("Failed to fetch lead"))?
        .ok_or(ApiError::NotFound(LEAD_NOT_FOUND))?;

    Ok(Json(InteractionResponse {
        reply: assistant::greeting(&lead),
    }))
}

/// Ask the assistant about a lead
///
/// POST /api/leads/{id}/interact
/// Body: { "message": "..." }
async fn interact_with_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<InteractionResponse>, ApiError> {
    const INVALID: &str = "Invalid message";
    let id = parse_id(&id, LEAD_NOT_FOUND)?;
    let payload = parse_json_body(&body, INVALID)?;

    let mut reader = FieldReader::new(&payload).map_err(|errors| ApiError::validation(INVALID, errors))?;
    let message = reader.required_text("message");
    let message = reader
        .finish(|| message)
        .map_err(|errors| ApiError::validation(INVALID, errors))?;

    let lead = state
        .storage
        .get_lead(id)
        .await
        .map_err(ApiError::storage("Failed to fetch lead"))?
        .ok_or(ApiError::NotFound(LEAD_NOT_FOUND))?;

    Ok(Json(InteractionResponse {
        reply: assistant::reply(&lead, &message),
    }))
}
