/// Configuration management for the leadflow service
///
/// Handles server binding, storage backend selection, extractor data and workflow
/// simulation parameters. Every value can be overridden through environment variables.

use serde::{Deserialize, Serialize};

/// Names the extractor recognises verbatim before falling back to heuristics
pub const DEFAULT_KNOWN_NAMES: [&str; 4] = [
    "HEMANTH KUNCHAM",
    "John Doe",
    "Avula Mahendra",
    "Mantena Monish",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub database: DatabaseConfig,
    /// Contact extractor configuration
    pub extractor: ExtractorConfig,
    /// Workflow simulation configuration
    pub workflow: WorkflowConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file. `None` keeps everything in memory.
    pub path: Option<String>,
    /// Seed the demo leads when the lead store starts out empty
    pub seed_demo_data: bool,
}

/// Contact extractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Literal names matched case-insensitively before the heuristic strategies run
    pub known_names: Vec<String>,
}

/// Workflow simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Fire simulated notifications when a workflow is saved
    pub simulate_on_create: bool,
    /// Delay between consecutive simulated actions, in milliseconds
    pub step_delay_ms: u64,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("LEADFLOW_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("LEADFLOW_PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .unwrap_or(5000),
            },
            database: DatabaseConfig {
                path: std::env::var("LEADFLOW_DATABASE_PATH")
                    .ok()
                    .filter(|path| !path.trim().is_empty()),
                seed_demo_data: env_flag("LEADFLOW_SEED_DEMO", true),
            },
            extractor: ExtractorConfig {
                known_names: std::env::var("LEADFLOW_KNOWN_NAMES")
                    .map(|raw| parse_name_list(&raw))
                    .unwrap_or_else(|_| default_known_names()),
            },
            workflow: WorkflowConfig {
                simulate_on_create: env_flag("LEADFLOW_SIMULATE_WORKFLOWS", true),
                step_delay_ms: std::env::var("LEADFLOW_WORKFLOW_STEP_MS")
                    .ok()
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(1000),
            },
        }
    }
}

/// The built-in known-name list as owned strings
pub fn default_known_names() -> Vec<String> {
    DEFAULT_KNOWN_NAMES.iter().map(|name| name.to_string()).collect()
}

/// Split a comma-separated name list, dropping blank entries
fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
