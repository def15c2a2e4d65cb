/// Server setup and initialization
///
/// Wires together all components: storage, document processing, the workflow
/// simulator and HTTP routes. Provides the application factory used by `main` and
/// the integration tests.

use crate::{
    api::{create_document_routes, create_lead_routes, create_workflow_routes, AppState},
    config::Config,
    extractor::{ContactExtractor, DocumentProcessor},
    runtime::WorkflowSimulator,
    storage::{SqliteStorage, Storage},
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;

/// Build the shared application state from configuration
///
/// Opens the configured storage backend, seeds demo data when asked to and builds the
/// contact extractor from the known-name list.
pub async fn create_state(config: &Config) -> Result<AppState> {
    let storage = match &config.database.path {
        Some(path) => {
            tracing::info!("📋 Initializing SQLite storage");
            let sqlite = SqliteStorage::connect(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open database {}: {}", path, e))?;
            Storage::Sqlite(sqlite)
        }
        None => {
            tracing::info!("📋 Initializing in-memory storage");
            Storage::in_memory()
        }
    };
    tracing::debug!("Storage backend: {}", storage.backend_name());

    if config.database.seed_demo_data {
        storage
            .seed_demo_leads()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed demo leads: {}", e))?;
    }

    tracing::info!(
        "🔎 Initializing contact extractor ({} known names)",
        config.extractor.known_names.len()
    );
    let extractor = Arc::new(ContactExtractor::new(&config.extractor.known_names));
    tracing::debug!("Name strategies: {:?}", extractor.strategy_labels());
    let documents = DocumentProcessor::new(extractor);

    let simulator = if config.workflow.simulate_on_create {
        tracing::info!(
            "⏱️ Workflow simulation enabled ({}ms per step)",
            config.workflow.step_delay_ms
        );
        Some(WorkflowSimulator::new(Duration::from_millis(
            config.workflow.step_delay_ms,
        )))
    } else {
        None
    };

    Ok(AppState {
        storage,
        documents,
        simulator,
    })
}

/// Assemble the router for an already-built state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        .merge(create_lead_routes())
        .merge(create_workflow_routes())
        .merge(create_document_routes())
        .with_state(state)
}

/// Create the main Axum application with all routes
pub async fn create_app(config: Config) -> Result<Router> {
    let state = create_state(&config).await?;

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = build_router(state);

    tracing::info!("✅ Application initialized successfully");
    Ok(app)
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Leadflow server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
