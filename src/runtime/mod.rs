/// Runtime Layer
///
/// Background work that outlives a request. Today that is only the simulated
/// workflow run fired when a workflow is saved.

// Staggered notification simulation for saved workflows
pub mod simulator;

// Re-export main types
pub use simulator::{SimulatedAction, WorkflowSimulator};
