use crate::{
    error::{Result, ThumbnailError},
    models::Thumbnail,
    storage::traits::RecordStore,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, Thumbnail>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, record: &Thumbnail) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(ThumbnailError::PersistenceFailure(format!(
                "Duplicate thumbnail id {}",
                record.id
            )));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn save(&self, record: &Thumbnail) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(ThumbnailError::PersistenceFailure(format!(
                "Thumbnail {} does not exist",
                record.id
            ))),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Thumbnail>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<Thumbnail>> {
        Ok(self
            .records
            .read()
            .await
            .get(id)
            .filter(|r| r.is_owned_by(user_id))
            .cloned())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Thumbnail>> {
        let mut owned: Vec<Thumbnail> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let owned = records.get(id).is_some_and(|r| r.is_owned_by(user_id));
        if owned {
            records.remove(id);
        }
        Ok(owned)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
