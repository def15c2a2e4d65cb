/// In-memory storage backend
///
/// Keeps leads and workflows in maps keyed by identifier. Identifiers come from
/// store-owned sequences and are assigned while the map's write lock is held, so
/// "assign next id, insert" is atomic and ids are never reused after deletion.

use crate::{
    lead::{Lead, LeadFilter, LeadPatch, NewLead},
    storage::newest_first,
    workflow::{NewWorkflow, Workflow, WorkflowPatch},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Map-backed storage for leads and workflows
#[derive(Debug)]
pub struct MemStorage {
    leads: RwLock<HashMap<i64, Lead>>,
    workflows: RwLock<HashMap<i64, Workflow>>,
    /// Next lead identifier
    lead_seq: AtomicI64,
    /// Next workflow identifier
    workflow_seq: AtomicI64,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            leads: RwLock::new(HashMap::new()),
            workflows: RwLock::new(HashMap::new()),
            lead_seq: AtomicI64::new(1),
            workflow_seq: AtomicI64::new(1),
        }
    }

    pub async fn list_leads(&self, filter: LeadFilter) -> Vec<Lead> {
        let leads = self.leads.read().await;
        let mut matching: Vec<Lead> = leads
            .values()
            .filter(|lead| filter.matches(lead))
            .cloned()
            .collect();
        newest_first(&mut matching, |lead| (lead.created_at, lead.id));
        matching
    }

    pub async fn get_lead(&self, id: i64) -> Option<Lead> {
        self.leads.read().await.get(&id).cloned()
    }

    pub async fn create_lead(&self, new_lead: NewLead) -> Lead {
        let mut leads = self.leads.write().await;
        let id = self.lead_seq.fetch_add(1, Ordering::SeqCst);
        let lead = new_lead.into_lead(id, Utc::now());
        leads.insert(id, lead.clone());
        tracing::debug!("Stored lead {} in memory", id);
        lead
    }

    pub async fn update_lead(&self, id: i64, patch: LeadPatch) -> Option<Lead> {
        let mut leads = self.leads.write().await;
        let lead = leads.get_mut(&id)?;
        lead.apply(patch);
        Some(lead.clone())
    }

    pub async fn delete_lead(&self, id: i64) -> bool {
        self.leads.write().await.remove(&id).is_some()
    }

    pub async fn list_workflows(&self) -> Vec<Workflow> {
        let workflows = self.workflows.read().await;
        let mut all: Vec<Workflow> = workflows.values().cloned().collect();
        newest_first(&mut all, |workflow| (workflow.created_at, workflow.id));
        all
    }

    pub async fn get_workflow(&self, id: i64) -> Option<Workflow> {
        self.workflows.read().await.get(&id).cloned()
    }

    pub async fn create_workflow(&self, new_workflow: NewWorkflow) -> Workflow {
        let mut workflows = self.workflows.write().await;
        let id = self.workflow_seq.fetch_add(1, Ordering::SeqCst);
        let workflow = new_workflow.into_workflow(id, Utc::now());
        workflows.insert(id, workflow.clone());
        workflow
    }

    pub async fn update_workflow(&self, id: i64, patch: WorkflowPatch) -> Option<Workflow> {
        let mut workflows = self.workflows.write().await;
        let workflow = workflows.get_mut(&id)?;
        workflow.apply(patch);
        Some(workflow.clone())
    }

    pub async fn delete_workflow(&self, id: i64) -> bool {
        self.workflows.write().await.remove(&id).is_some()
    }
}
