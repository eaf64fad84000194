use crate::{
    config::PostgresConfig,
    error::{Result, ThumbnailError},
    models::Thumbnail,
    storage::traits::RecordStore,
};
use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use serde_json::Value;
use tokio_postgres::{NoTls, Row};

/// Thumbnails kept as JSONB documents, with `id` and `user_id` pulled out
/// into indexed columns for owner-scoped lookups.
pub struct PostgresRecordStore {
    pool: Pool,
}

impl PostgresRecordStore {
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        let mut cfg = Config::new();
        cfg.host = config.host;
        cfg.port = config.port;
        cfg.user = config.username;
        cfg.password = config.password;
        cfg.dbname = config.database;

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ThumbnailError::ConfigError(format!("Failed to create pool: {}", e)))?;

        let store = Self { pool };
        store.initialize_schema().await?;

        Ok(store)
    }

    async fn connection(&self) -> Result<Object> {
        self.pool.get().await.map_err(|e| {
            ThumbnailError::PersistenceFailure(format!("Failed to get connection: {}", e))
        })
    }

    async fn initialize_schema(&self) -> Result<()> {
        let client = self.connection().await?;

        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS thumbnails (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    document JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_thumbnails_user_id ON thumbnails(user_id);",
            )
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!(
                    "Failed to create thumbnails table: {}",
                    e
                ))
            })?;

        log::info!("PostgreSQL thumbnail store schema initialized");
        Ok(())
    }

    fn from_row(row: &Row) -> Result<Thumbnail> {
        let document: Value = row.get("document");
        Ok(serde_json::from_value(document)?)
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn create(&self, record: &Thumbnail) -> Result<()> {
        let client = self.connection().await?;
        let document = serde_json::to_value(record)?;

        client
            .execute(
                "INSERT INTO thumbnails (id, user_id, document, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &record.id,
                    &record.user_id,
                    &document,
                    &record.created_at,
                    &record.updated_at,
                ],
            )
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!("Failed to insert thumbnail: {}", e))
            })?;

        Ok(())
    }

    async fn save(&self, record: &Thumbnail) -> Result<()> {
        let client = self.connection().await?;
        let document = serde_json::to_value(&record)?;

        let updated = client
            .execute(
                "UPDATE thumbnails SET document = $2, updated_at = $3 WHERE id = $1",
                &[&record.id, &document, &record.updated_at],
            )
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!("Failed to update thumbnail: {}", e))
            })?;

        if updated == 0 {
            return Err(ThumbnailError::PersistenceFailure(format!(
                "Thumbnail {} does not exist",
                record.id
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Thumbnail>> {
        let client = self.connection().await?;
        let row = client
            .query_opt("SELECT document FROM thumbnails WHERE id = $1", &[&id])
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!("Failed to fetch thumbnail: {}", e))
            })?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<Thumbnail>> {
        let client = self.connection().await?;
        let row = client
            .query_opt(
                "SELECT document FROM thumbnails WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!("Failed to fetch thumbnail: {}", e))
            })?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Thumbnail>> {
        let client = self.connection().await?;
        let rows = client
            .query(
                "SELECT document FROM thumbnails WHERE user_id = $1 ORDER BY created_at DESC",
                &[&user_id],
            )
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!("Failed to list thumbnails: {}", e))
            })?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool> {
        let client = self.connection().await?;
        let deleted = client
            .execute(
                "DELETE FROM thumbnails WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await
            .map_err(|e| {
                ThumbnailError::PersistenceFailure(format!("Failed to delete thumbnail: {}", e))
            })?;

        Ok(deleted > 0)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<bool> {
        let client = self.connection().await?;
        Ok(client.simple_query("SELECT 1").await.is_ok())
    }
}
