/// Workflow Management Layer
///
/// Type definitions for the graphs saved by the visual workflow builder.
/// Persistence lives in the storage layer; simulated execution in the runtime.

// Core workflow type definitions
pub mod types;

// Re-export commonly used types
pub use types::{NewWorkflow, Workflow, WorkflowPatch};
