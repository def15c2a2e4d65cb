/// Lead Management Layer
///
/// Lead record definitions, request validation and the canned lead assistant.

// Core lead type definitions and payload validation
pub mod types;

// Keyword-driven replies for the lead chat panel
pub mod assistant;

// Re-export commonly used types
pub use types::{Lead, LeadFilter, LeadPatch, LeadSource, LeadStatus, NewLead};
