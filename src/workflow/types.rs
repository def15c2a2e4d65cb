/// Core workflow type definitions
///
/// Workflows are graphs authored in the visual builder. The service stores their nodes
/// and edges as opaque JSON-encoded text and hands them back verbatim; only the
/// simulator ever looks inside.

use crate::validation::{FieldError, FieldReader};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Store-assigned identifier
    pub id: i64,
    /// Human-readable workflow name
    pub name: String,
    /// Serialized graph nodes, stored verbatim
    pub nodes: String,
    /// Serialized graph edges, stored verbatim
    pub edges: String,
    pub created_at: DateTime<Utc>,
}

/// Validated payload for creating a workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWorkflow {
    pub name: String,
    pub nodes: String,
    pub edges: String,
}

/// Partial workflow update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowPatch {
    pub name: Option<String>,
    pub nodes: Option<String>,
    pub edges: Option<String>,
}

impl NewWorkflow {
    /// Validate a JSON request body. All three fields are required strings.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut reader = FieldReader::new(body)?;
        let name = reader.required_string("name");
        let nodes = reader.required_string("nodes");
        let edges = reader.required_string("edges");

        reader.finish(|| {
            Some(NewWorkflow {
                name: name?,
                nodes: nodes?,
                edges: edges?,
            })
        })
    }

    pub fn into_workflow(self, id: i64, created_at: DateTime<Utc>) -> Workflow {
        Workflow {
            id,
            name: self.name,
            nodes: self.nodes,
            edges: self.edges,
            created_at,
        }
    }
}

impl WorkflowPatch {
    /// Validate a partial update body. Absent fields stay `None`.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut reader = FieldReader::new(body)?;
        let name = reader.optional_text("name");
        let nodes = reader.optional_string("nodes");
        let edges = reader.optional_string("edges");

        reader.finish(|| Some(WorkflowPatch { name, nodes, edges }))
    }
}

impl Workflow {
    /// Merge a partial update in place
    pub fn apply(&mut self, patch: WorkflowPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(nodes) = patch.nodes {
            self.nodes = nodes;
        }
        if let Some(edges) = patch.edges {
            self.edges = edges;
        }
    }
}
