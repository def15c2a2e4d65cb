/// Leadflow: lead management with document contact extraction
///
/// Main entry point for the Leadflow server. Loads configuration from the environment
/// and starts the HTTP server.

use leadflow::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Lead management API at /api/leads/*
/// - Workflow definitions at /api/workflows/*
/// - Document contact extraction at /api/documents/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:5000 with in-memory storage)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
