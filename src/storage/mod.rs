pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;

use crate::{config::Config, error::Result};
use std::sync::Arc;

pub use memory::MemoryRecordStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresRecordStore;
pub use traits::RecordStore;

/// Selects and owns the record store backend described by `Config`.
#[derive(Clone)]
pub struct RecordStoreManager {
    backend: Arc<dyn RecordStore>,
}

impl RecordStoreManager {
    pub async fn new(config: &Config) -> Result<Self> {
        let backend: Arc<dyn RecordStore> = if config.use_psql {
            #[cfg(feature = "postgres")]
            {
                let postgres_config = config.postgres.clone().ok_or_else(|| {
                    crate::error::ThumbnailError::ConfigError("PostgreSQL config required".into())
                })?;
                Arc::new(PostgresRecordStore::new(postgres_config).await?)
            }
            #[cfg(not(feature = "postgres"))]
            {
                return Err(crate::error::ThumbnailError::ConfigError(
                    "PostgreSQL feature not enabled".into(),
                ));
            }
        } else {
            log::warn!("No database configured, thumbnails are kept in memory");
            Arc::new(MemoryRecordStore::new())
        };

        log::info!("Record store backend: {}", backend.backend_name());
        Ok(Self { backend })
    }

    pub fn from_backend(backend: Arc<dyn RecordStore>) -> Self {
        Self { backend }
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.backend.clone()
    }
}
