/// Workflow management REST API endpoints
///
/// Stores graphs authored in the visual builder. Saving a workflow kicks off a
/// simulated run of its action nodes when the simulator is enabled.

use crate::{
    api::{
        error::{parse_id, parse_json_body, ApiError},
        AppState,
    },
    workflow::{NewWorkflow, Workflow, WorkflowPatch},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

const WORKFLOW_NOT_FOUND: &str = "Workflow not found";

/// Create workflow management routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", get(list_workflows).post(create_workflow))
        .route(
            "/api/workflows/{id}",
            get(get_workflow).patch(update_workflow).delete(delete_workflow),
        )
}

/// List all workflows, newest first
///
/// GET /api/workflows
async fn list_workflows(State(state): State<AppState>) -> Result<Json<Vec<Workflow>>, ApiError> {
    let workflows = state
        .storage
        .list_workflows()
        .await
        .map_err(ApiError::storage("Failed to fetch workflows"))?;
    Ok(Json(workflows))
}

/// Get a specific workflow by ID
///
/// GET /api/workflows/{id}
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, ApiError> {
    let id = parse_id(&id, WORKFLOW_NOT_FOUND)?;
    state
        .storage
        .get_workflow(id)
        .await
        .map_err(ApiError::storage("Failed to fetch workflow"))?
        .map(Json)
        .ok_or(ApiError::NotFound(WORKFLOW_NOT_FOUND))
}

/// Save a new workflow
///
/// POST /api/workflows
/// Body: { "name": "...", "nodes": "<json text>", "edges": "<json text>" }
async fn create_workflow(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Workflow>), ApiError> {
    const INVALID: &str = "Invalid workflow data";
    let payload = parse_json_body(&body, INVALID)?;
    let new_workflow =
        NewWorkflow::from_json(&payload).map_err(|errors| ApiError::validation(INVALID, errors))?;

    let workflow = state
        .storage
        .create_workflow(new_workflow)
        .await
        .map_err(ApiError::storage("Failed to create workflow"))?;

    tracing::info!("✅ Saved workflow {} ({})", workflow.id, workflow.name);

    // Detached: the run outlives this request
    if let Some(simulator) = &state.simulator {
        simulator.spawn(&workflow);
    }

    Ok((StatusCode::CREATED, Json(workflow)))
}

/// Partially update a workflow
///
/// PATCH /api/workflows/{id}
async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<Workflow>, ApiError> {
    const INVALID: &str = "Invalid workflow data";
    let id = parse_id(&id, WORKFLOW_NOT_FOUND)?;
    let payload = parse_json_body(&body, INVALID)?;
    let patch =
        WorkflowPatch::from_json(&payload).map_err(|errors| ApiError::validation(INVALID, errors))?;

    let workflow = state
        .storage
        .update_workflow(id, patch)
        .await
        .map_err(ApiError::storage("Failed to update workflow"))?
        .ok_or(ApiError::NotFound(WORKFLOW_NOT_FOUND))?;

    tracing::info!("🔄 Updated workflow {}", workflow.id);
    Ok(Json(workflow))
}

/// Delete a workflow
///
/// DELETE /api/workflows/{id}
async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, WORKFLOW_NOT_FOUND)?;
    let deleted = state
        .storage
        .delete_workflow(id)
        .await
        .map_err(ApiError::storage("Failed to delete workflow"))?;

    if !deleted {
        return Err(ApiError::NotFound(WORKFLOW_NOT_FOUND));
    }

    tracing::info!("🗑️ Deleted workflow {}", id);
    Ok(StatusCode::NO_CONTENT)
}
