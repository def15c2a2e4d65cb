/// Leadflow: lead management with document contact extraction
///
/// This library provides the lead and workflow stores, the contact extractor used on
/// uploaded documents, the simulated workflow runner and the HTTP API on top.

// Core configuration and setup
pub mod config;

// Request body validation shared by the record types
pub mod validation;

// Lead records, filters and the lead assistant
pub mod lead;

// Workflow definitions from the visual builder
pub mod workflow;

// Storage backends (in-memory and SQLite)
pub mod storage;

// Contact extraction and document decoding
pub mod extractor;

// Background work - simulated workflow runs
pub mod runtime;

// HTTP API layer - REST endpoints for leads, workflows and documents
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use extractor::{ContactExtractor, ExtractedContact};
pub use lead::{Lead, LeadSource, LeadStatus};
pub use server::start_server;
pub use storage::Storage;
pub use workflow::Workflow;
