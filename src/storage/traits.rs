use crate::{error::Result, models::Thumbnail};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record. Fails if the id already exists.
    async fn create(&self, record: &Thumbnail) -> Result<()>;

    /// Overwrites an existing record in place.
    async fn save(&self, record: &Thumbnail) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Thumbnail>>;

    /// Lookup constrained to `id` and `user_id` together.
    async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<Thumbnail>>;

    /// All records of one owner, newest first.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Thumbnail>>;

    /// Deletes the record matching both `id` and `user_id`. Returns whether
    /// anything was removed.
    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool>;

    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> Result<bool>;
}
