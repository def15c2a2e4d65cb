/// Simulated workflow execution
///
/// Saved workflows are not really executed. Each action node in the builder graph is
/// turned into a notification that fires after a staggered delay: step 1 after one
/// step delay, step 2 after two, and so on. Nodes run in the order they were saved.

use crate::workflow::Workflow;
use serde_json::Value;
use std::time::Duration;
use tokio::{task::JoinHandle, time::Instant};

/// Node type the builder assigns to action nodes
pub const ACTION_NODE_TYPE: &str = "actionNode";

/// One simulated notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedAction {
    /// 1-based position among the action nodes
    pub step: usize,
    pub node_id: String,
    pub action: String,
    pub message: String,
    /// Offset from the start of the run
    pub delay: Duration,
}

/// Plans and fires simulated workflow runs
#[derive(Debug, Clone)]
pub struct WorkflowSimulator {
    step_delay: Duration,
}

impl WorkflowSimulator {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// Action nodes of `workflow` in saved order
    ///
    /// Nodes that are not a JSON array yield an empty plan rather than an error.
    pub fn plan(&self, workflow: &Workflow) -> Vec<SimulatedAction> {
        let nodes: Vec<Value> = match serde_json::from_str(&workflow.nodes) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!("Workflow {} has unreadable nodes, nothing to simulate: {}", workflow.id, e);
                return Vec::new();
            }
        };

        nodes
            .iter()
            .filter(|node| node.get("type").and_then(Value::as_str) == Some(ACTION_NODE_TYPE))
            .enumerate()
            .map(|(index, node)| {
                let data = node.get("data");
                let action = data
                    .and_then(|data| data.get("action").or_else(|| data.get("label")))
                    .and_then(Value::as_str)
                    .unwrap_or("Action")
                    .to_string();
                let step = index + 1;

                SimulatedAction {
                    step,
                    node_id: node.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
                    message: action_message(&action),
                    action,
                    delay: self.delay_for(step),
                }
            })
            .collect()
    }

    /// Offset of the given 1-based step, saturating instead of overflowing
    fn delay_for(&self, step: usize) -> Duration {
        u32::try_from(step)
            .ok()
            .and_then(|step| self.step_delay.checked_mul(step))
            .unwrap_or(Duration::MAX)
    }

    /// Fire the plan in the background; the handle resolves to the fired actions
    pub fn spawn(&self, workflow: &Workflow) -> JoinHandle<Vec<SimulatedAction>> {
        let plan = self.plan(workflow);
        let workflow_id = workflow.id;
        let workflow_name = workflow.name.clone();

        tracing::info!("🚀 Simulating workflow {} ({}) with {} actions", workflow_id, workflow_name, plan.len());
        tokio::spawn(async move {
            let started = Instant::now();
            for action in &plan {
                let Some(deadline) = started.checked_add(action.delay) else {
                    tracing::warn!(
                        "Workflow {} step {} is scheduled too far ahead, stopping simulation",
                        workflow_id,
                        action.step
                    );
                    break;
                };
                tokio::time::sleep_until(deadline).await;
                tracing::info!("Workflow Action {}: {}", action.step, action.message);
            }
            tracing::info!("✅ Simulated workflow {} finished", workflow_id);
            plan
        })
    }
}

/// Notification text for an action
pub fn action_message(action: &str) -> String {
    match action {
        "Send Email" => "📧 Email sent to lead".to_string(),
        "Update Status" => "✅ Status updated to Contacted".to_string(),
        "Create Task" => "📋 Task created for lead".to_string(),
        "Send SMS" => "📱 SMS sent to lead".to_string(),
        other => format!("⚡ Action executed: {}", other),
    }
}
