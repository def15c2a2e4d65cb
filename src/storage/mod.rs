/// Storage Layer
///
/// One storage contract for leads and workflows with two backends:
/// - `MemStorage`: maps guarded by async locks, store-owned id sequences
/// - `SqliteStorage`: sqlx pool over a single SQLite file
///
/// `Storage` dispatches to whichever backend the configuration selected.

// In-memory backend (default)
pub mod memory;

// SQLite backend using sqlx
pub mod sqlite;

pub use memory::MemStorage;
pub use sqlite::SqliteStorage;

use crate::{
    lead::{Lead, LeadFilter, LeadPatch, LeadSource, LeadStatus, NewLead},
    workflow::{NewWorkflow, Workflow, WorkflowPatch},
};
use std::sync::Arc;
use thiserror::Error;

/// Storage error
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into a record
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage handle shared by the API layer
#[derive(Debug, Clone)]
pub enum Storage {
    Memory(Arc<MemStorage>),
    Sqlite(SqliteStorage),
}

impl Storage {
    /// Fresh in-memory storage
    pub fn in_memory() -> Self {
        Storage::Memory(Arc::new(MemStorage::new()))
    }

    /// Human-readable backend name for logs
    pub fn backend_name(&self) -> &'static str {
        match self {
            Storage::Memory(_) => "memory",
            Storage::Sqlite(_) => "sqlite",
        }
    }

    /// All leads matching `filter`, newest first
    pub async fn list_leads(&self, filter: LeadFilter) -> StorageResult<Vec<Lead>> {
        match self {
            Storage::Memory(store) => Ok(store.list_leads(filter).await),
            Storage::Sqlite(store) => store.list_leads(filter).await,
        }
    }

    pub async fn get_lead(&self, id: i64) -> StorageResult<Option<Lead>> {
        match self {
            Storage::Memory(store) => Ok(store.get_lead(id).await),
            Storage::Sqlite(store) => store.get_lead(id).await,
        }
    }

    pub async fn create_lead(&self, lead: NewLead) -> StorageResult<Lead> {
        match self {
            Storage::Memory(store) => Ok(store.create_lead(lead).await),
            Storage::Sqlite(store) => store.create_lead(lead).await,
        }
    }

    /// Apply a partial update; `None` when the lead does not exist
    pub async fn update_lead(&self, id: i64, patch: LeadPatch) -> StorageResult<Option<Lead>> {
        match self {
            Storage::Memory(store) => Ok(store.update_lead(id, patch).await),
            Storage::Sqlite(store) => store.update_lead(id, patch).await,
        }
    }

    /// Remove a lead; `false` when it did not exist
    pub async fn delete_lead(&self, id: i64) -> StorageResult<bool> {
        match self {
            Storage::Memory(store) => Ok(store.delete_lead(id).await),
            Storage::Sqlite(store) => store.delete_lead(id).await,
        }
    }

    /// All workflows, newest first
    pub async fn list_workflows(&self) -> StorageResult<Vec<Workflow>> {
        match self {
            Storage::Memory(store) => Ok(store.list_workflows().await),
            Storage::Sqlite(store) => store.list_workflows().await,
        }
    }

    pub async fn get_workflow(&self, id: i64) -> StorageResult<Option<Workflow>> {
        match self {
            Storage::Memory(store) => Ok(store.get_workflow(id).await),
            Storage::Sqlite(store) => store.get_workflow(id).await,
        }
    }

    pub async fn create_workflow(&self, workflow: NewWorkflow) -> StorageResult<Workflow> {
        match self {
            Storage::Memory(store) => Ok(store.create_workflow(workflow).await),
            Storage::Sqlite(store) => store.create_workflow(workflow).await,
        }
    }

    pub async fn update_workflow(
        &self,
        id: i64,
        patch: WorkflowPatch,
    ) -> StorageResult<Option<Workflow>> {
        match self {
            Storage::Memory(store) => Ok(store.update_workflow(id, patch).await),
            Storage::Sqlite(store) => store.update_workflow(id, patch).await,
        }
    }

    pub async fn delete_workflow(&self, id: i64) -> StorageResult<bool> {
        match self {
            Storage::Memory(store) => Ok(store.delete_workflow(id).await),
            Storage::Sqlite(store) => store.delete_workflow(id).await,
        }
    }

    /// Insert the two demo leads when the lead store is empty
    ///
    /// Returns the number of leads inserted.
    pub async fn seed_demo_leads(&self) -> StorageResult<usize> {
        if !self.list_leads(LeadFilter::All).await?.is_empty() {
            return Ok(0);
        }

        let demo = demo_leads();
        let count = demo.len();
        for lead in demo {
            self.create_lead(lead).await?;
        }
        tracing::info!("🌱 Seeded {} demo leads", count);
        Ok(count)
    }
}

fn demo_leads() -> Vec<NewLead> {
    vec![
        NewLead {
            name: "John Smith".to_string(),
            email: "john.smith@company.com".to_string(),
            phone: Some("+1 (555) 123-4567".to_string()),
            status: Some(LeadStatus::New),
            source: Some(LeadSource::Manual),
        },
        NewLead {
            name: "Sarah Johnson".to_string(),
            email: "sarah.j@startup.io".to_string(),
            phone: Some("+1 (555) 987-6543".to_string()),
            status: Some(LeadStatus::Contacted),
            source: Some(LeadSource::Document),
        },
    ]
}

/// Newest first; ties on the timestamp fall back to the higher identifier
pub(crate) fn newest_first<T>(records: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64)) {
    records.sort_by(|a, b| key(b).cmp(&key(a)));
}
