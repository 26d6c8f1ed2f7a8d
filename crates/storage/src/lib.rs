use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use dottie_core::AssessmentResult;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAssessment {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub result: AssessmentResult,
}

/// Persistence for classified assessments.
///
/// Records are only ever replaced whole; `replace` keeps the id, owner and
/// creation time of the existing record.
pub trait AssessmentRepository: Send + Sync {
    async fn insert(&self, user_id: &str, result: AssessmentResult) -> Result<StoredAssessment>;
    async fn get(&self, id: &str) -> Result<Option<StoredAssessment>>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<StoredAssessment>>;
    async fn replace(
        &self,
        id: &str,
        result: AssessmentResult,
    ) -> Result<Option<StoredAssessment>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

fn new_record(user_id: &str, result: AssessmentResult) -> StoredAssessment {
    StoredAssessment {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        created_at: Utc::now(),
        result,
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    assessments: Arc<RwLock<HashMap<String, StoredAssessment>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssessmentRepository for MemoryStore {
    async fn insert(&self, user_id: &str, result: AssessmentResult) -> Result<StoredAssessment> {
        let record = new_record(user_id, result);
        self.assessments
            .write()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<StoredAssessment>> {
        Ok(self.assessments.read().get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<StoredAssessment>> {
        let mut records = self
            .assessments
            .read()
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn replace(
        &self,
        id: &str,
        result: AssessmentResult,
    ) -> Result<Option<StoredAssessment>> {
        let mut guard = self.assessments.write();
        let Some(record) = guard.get_mut(id) else {
            return Ok(None);
        };

        record.result = result;
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.assessments.write().remove(id).is_some())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = pool_options(database_url)
            .connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assessments (
              id TEXT PRIMARY KEY,
              user_id TEXT NOT NULL,
              created_at TEXT NOT NULL,
              pattern TEXT NOT NULL,
              result_json TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS assessments_by_user
            ON assessments (user_id, created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn pool_options(database_url: &str) -> SqlitePoolOptions {
    // Every connection to an in-memory database sees its own empty copy, so
    // the single connection must never be reaped.
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

fn record_from_row(row: &SqliteRow) -> Result<StoredAssessment> {
    let id: String = row.get("id");
    let result_json: String = row.get("result_json");
    let result = serde_json::from_str(&result_json)
        .with_context(|| format!("corrupt result payload for assessment {}", id))?;
    let created_at = DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
        .with_context(|| format!("corrupt created_at for assessment {}", id))?
        .with_timezone(&Utc);

    Ok(StoredAssessment {
        id,
        user_id: row.get("user_id"),
        created_at,
        result,
    })
}

impl AssessmentRepository for SqliteStore {
    async fn insert(&self, user_id: &str, result: AssessmentResult) -> Result<StoredAssessment> {
        let record = new_record(user_id, result);
        let result_json = serde_json::to_string(&record.result)?;

        sqlx::query(
            r#"
            INSERT INTO assessments (id, user_id, created_at, pattern, result_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .bind(record.result.pattern.as_str())
        .bind(result_json)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<StoredAssessment>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, created_at, result_json
            FROM assessments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<StoredAssessment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, created_at, result_json
            FROM assessments
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn replace(
        &self,
        id: &str,
        result: AssessmentResult,
    ) -> Result<Option<StoredAssessment>> {
        let result_json = serde_json::to_string(&result)?;

        let updated = sqlx::query(
            r#"
            UPDATE assessments
            SET pattern = ?2, result_json = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(result.pattern.as_str())
        .bind(result_json)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM assessments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteStore::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }

    pub async fn from_optional_url(database_url: Option<&str>) -> Result<Self> {
        match database_url {
            Some(url) => Self::sqlite(url).await,
            None => Ok(Self::memory()),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Sqlite(_) => "sqlite",
        }
    }
}

impl AssessmentRepository for Store {
    async fn insert(&self, user_id: &str, result: AssessmentResult) -> Result<StoredAssessment> {
        match self {
            Store::Memory(store) => store.insert(user_id, result).await,
            Store::Sqlite(store) => store.insert(user_id, result).await,
        }
    }

    async fn get(&self, id: &str) -> Result<Option<StoredAssessment>> {
        match self {
            Store::Memory(store) => store.get(id).await,
            Store::Sqlite(store) => store.get(id).await,
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<StoredAssessment>> {
        match self {
            Store::Memory(store) => store.list_for_user(user_id).await,
            Store::Sqlite(store) => store.list_for_user(user_id).await,
        }
    }

    async fn replace(
        &self,
        id: &str,
        result: AssessmentResult,
    ) -> Result<Option<StoredAssessment>> {
        match self {
            Store::Memory(store) => store.replace(id, result).await,
            Store::Sqlite(store) => store.replace(id, result).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        match self {
            Store::Memory(store) => store.delete(id).await,
            Store::Sqlite(store) => store.delete(id).await,
        }
    }
}
