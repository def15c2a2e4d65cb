/// HTTP API Layer
///
/// REST endpoints for the lead dashboard. It handles:
/// - Lead CRUD, status filtering and the lead assistant
/// - Workflow definitions saved from the visual builder
/// - Document upload with contact extraction

// Error type and response mapping shared by every handler
pub mod error;

// Lead management endpoints (GET/POST/PATCH/DELETE)
pub mod leads;

// Workflow management endpoints
pub mod workflows;

// Document extraction endpoints
pub mod documents;

use crate::{extractor::DocumentProcessor, runtime::WorkflowSimulator, storage::Storage};

// Re-export router builders
pub use documents::create_document_routes;
pub use error::{ApiError, ErrorResponse};
pub use leads::create_lead_routes;
pub use workflows::create_workflow_routes;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Lead and workflow persistence
    pub storage: Storage,
    /// Decoders plus the shared contact extractor
    pub documents: DocumentProcessor,
    /// Fires simulated notifications for saved workflows; `None` disables it
    pub simulator: Option<WorkflowSimulator>,
}
