pub mod assets;
pub mod config;
pub mod error;
pub mod generation;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod server;
pub mod service;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use assets::{AssetStore, CloudinaryAssetStore};
pub use config::{CloudinaryConfig, Config, GenerationConfig, PostgresConfig};
pub use error::{Result, ThumbnailError};
pub use generation::{ImageAcquirer, ImageProvider};
pub use models::*;
pub use service::{GenerationFailed, ThumbnailService};
pub use storage::{MemoryRecordStore, RecordStore, RecordStoreManager};
