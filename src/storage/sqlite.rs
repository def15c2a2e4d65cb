/// SQLite persistence layer for leads and workflows
///
/// Uses a single sqlx connection pool over one database file. Identifiers come from
/// `INTEGER PRIMARY KEY AUTOINCREMENT`, which never hands out a deleted id again.
/// Timestamps are stored as fixed-width RFC 3339 text so they sort lexicographically.

use crate::{
    lead::{Lead, LeadFilter, LeadPatch, NewLead},
    storage::{StorageError, StorageResult},
    workflow::{NewWorkflow, Workflow, WorkflowPatch},
};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow},
    Row,
};
use std::path::Path;

const LEAD_COLUMNS: &str = "id, name, email, phone, status, source, created_at";
const WORKFLOW_COLUMNS: &str = "id, name, nodes, edges, created_at";

/// SQLite-based storage manager
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    /// SQLite connection pool
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) the database file and make sure the schema exists
    pub async fn connect(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        tracing::info!("🗄️ Opening SQLite database: {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Wrap an existing pool. Call `init_schema` before use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes. Safe to call multiple times.
    pub async fn init_schema(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL DEFAULT 'N/A',
                status TEXT NOT NULL DEFAULT 'New',
                source TEXT NOT NULL DEFAULT 'Manual',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workflows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                nodes TEXT NOT NULL,
                edges TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workflows_created_at ON workflows(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_leads(&self, filter: LeadFilter) -> StorageResult<Vec<Lead>> {
        let rows = match filter {
            LeadFilter::All => {
                sqlx::query(&format!(
                    "SELECT {} FROM leads ORDER BY created_at DESC, id DESC",
                    LEAD_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
            LeadFilter::Status(status) => {
                sqlx::query(&format!(
                    "SELECT {} FROM leads WHERE status = ? ORDER BY created_at DESC, id DESC",
                    LEAD_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(lead_from_row).collect()
    }

    pub async fn get_lead(&self, id: i64) -> StorageResult<Option<Lead>> {
        let row = sqlx::query(&format!("SELECT {} FROM leads WHERE id = ?", LEAD_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(lead_from_row).transpose()
    }

    pub async fn create_lead(&self, new_lead: NewLead) -> StorageResult<Lead> {
        let created_at = Utc::now().trunc_subsecs(6);
        let lead = new_lead.into_lead(0, created_at);

        let result = sqlx::query(
            "INSERT INTO leads (name, email, phone, status, source, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.status.as_str())
        .bind(lead.source.as_str())
        .bind(format_timestamp(&lead.created_at))
        .execute(&self.pool)
        .await?;

        Ok(Lead {
            id: result.last_insert_rowid(),
            ..lead
        })
    }

    /// Read-merge-write inside one transaction
    pub async fn update_lead(&self, id: i64, patch: LeadPatch) -> StorageResult<Option<Lead>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {} FROM leads WHERE id = ?", LEAD_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut lead = lead_from_row(&row)?;
        lead.apply(patch);

        sqlx::query(
            "UPDATE leads SET name = ?, email = ?, phone = ?, status = ?, source = ? WHERE id = ?",
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.status.as_str())
        .bind(lead.source.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(lead))
    }

    pub async fn delete_lead(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_workflows(&self) -> StorageResult<Vec<Workflow>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM workflows ORDER BY created_at DESC, id DESC",
            WORKFLOW_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(workflow_from_row).collect()
    }

    pub async fn get_workflow(&self, id: i64) -> StorageResult<Option<Workflow>> {
        let row = sqlx::query(&format!("SELECT {} FROM workflows WHERE id = ?", WORKFLOW_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(workflow_from_row).transpose()
    }

    pub async fn create_workflow(&self, new_workflow: NewWorkflow) -> StorageResult<Workflow> {
        let created_at = Utc::now().trunc_subsecs(6);
        let workflow = new_workflow.into_workflow(0, created_at);

        let result = sqlx::query(
            "INSERT INTO workflows (name, nodes, edges, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&workflow.name)
        .bind(&workflow.nodes)
        .bind(&workflow.edges)
        .bind(format_timestamp(&workflow.created_at))
        .execute(&self.pool)
        .await?;

        Ok(Workflow {
            id: result.last_insert_rowid(),
            ..workflow
        })
    }

    pub async fn update_workflow(
        &self,
        id: i64,
        patch: WorkflowPatch,
    ) -> StorageResult<Option<Workflow>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {} FROM workflows WHERE id = ?", WORKFLOW_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut workflow = workflow_from_row(&row)?;
        workflow.apply(patch);

        sqlx::query("UPDATE workflows SET name = ?, nodes = ?, edges = ? WHERE id = ?")
            .bind(&workflow.name)
            .bind(&workflow.nodes)
            .bind(&workflow.edges)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(workflow))
    }

    pub async fn delete_workflow(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM workflows WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn lead_from_row(row: &SqliteRow) -> StorageResult<Lead> {
    let status: String = row.try_get("status")?;
    let source: String = row.try_get("source")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Lead {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        status: status.parse().map_err(StorageError::Corrupt)?,
        source: source.parse().map_err(StorageError::Corrupt)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn workflow_from_row(row: &SqliteRow) -> StorageResult<Workflow> {
    let created_at: String = row.try_get("created_at")?;

    Ok(Workflow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        nodes: row.try_get("nodes")?,
        edges: row.try_get("edges")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("invalid timestamp '{}': {}", raw, e)))
}
