use crate::{
    assets::{AssetStore, CloudinaryAssetStore},
    config::Config,
    error::{Result, ThumbnailError},
    generation::ImageAcquirer,
    logger,
    models::{GenerateThumbnailRequest, Thumbnail},
    prompt::{self, PromptInput},
    storage::{RecordStore, RecordStoreManager},
};
use std::sync::Arc;

/// A generation that went wrong, together with whatever record had been
/// written by then.
#[derive(Debug)]
pub struct GenerationFailed {
    pub thumbnail: Option<Thumbnail>,
    pub error: ThumbnailError,
}

/// Runs the per-request pipeline: compose, record, render, upload, record.
#[derive(Clone)]
pub struct ThumbnailService {
    records: Arc<dyn RecordStore>,
    images: ImageAcquirer,
    assets: Arc<dyn AssetStore>,
}

impl ThumbnailService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        images: ImageAcquirer,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            records,
            images,
            assets,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let records = RecordStoreManager::new(config).await?.store();
        let images = ImageAcquirer::from_config(&config.generation)?;
        log::info!("Image providers: {}", images.provider_names().join(" -> "));
        let assets = Arc::new(CloudinaryAssetStore::new(config.cloudinary.clone())?);

        Ok(Self::new(records, images, assets))
    }

    pub fn records(&self) -> &Arc<dyn RecordStore> {
        &self.records
    }

    pub async fn generate(
        &self,
        user_id: &str,
        request: GenerateThumbnailRequest,
    ) -> std::result::Result<Thumbnail, GenerationFailed> {
        let _timer = logger::timer("thumbnail generation");

        let prompt = prompt::compose(&PromptInput {
            title: request.title.as_deref(),
            prompt: request.prompt.as_deref(),
            style: request.style.as_deref(),
            aspect_ratio: request.aspect_ratio.as_deref(),
            color_scheme: request.color_scheme.as_deref(),
        });
        log::debug!("Composed prompt: {}", prompt);

        let mut thumbnail = Thumbnail::pending(user_id, &request);
        if let Err(error) = self.records.create(&thumbnail).await {
            log::error!("Failed to create thumbnail record: {}", error);
            return Err(GenerationFailed {
                thumbnail: None,
                error,
            });
        }
        log::info!("Thumbnail {} pending for user {}", thumbnail.id, user_id);

        let url = match self.render(&prompt, &thumbnail).await {
            Ok(url) => url,
            Err(error) => return Err(self.record_failure(thumbnail, error).await),
        };

        thumbnail.succeed(url);
        thumbnail.touch();
        match self.records.save(&thumbnail).await {
            Ok(()) => {
                log::info!("Thumbnail {} ready", thumbnail.id);
                Ok(thumbnail)
            }
            Err(error) => Err(self.record_failure(thumbnail, error).await),
        }
    }

    async fn render(&self, prompt: &str, thumbnail: &Thumbnail) -> Result<String> {
        let image = self.images.acquire(prompt, thumbnail.aspect_ratio).await?;
        log::info!(
            "Thumbnail {} rendered by {} ({}x{})",
            thumbnail.id,
            image.provider,
            image.width,
            image.height
        );
        self.assets.upload(&image.bytes).await
    }

    /// Marks the record failed and tries once to persist that. A failing
    /// recovery write is logged and dropped so `error` reaches the caller.
    async fn record_failure(
        &self,
        mut thumbnail: Thumbnail,
        error: ThumbnailError,
    ) -> GenerationFailed {
        log::error!("Thumbnail {} failed: {}", thumbnail.id, error);
        thumbnail.fail(error.to_string());
        thumbnail.touch();

        if let Err(save_error) = self.records.save(&thumbnail).await {
            log::warn!(
                "Could not persist failure state of thumbnail {}: {}",
                thumbnail.id,
                save_error
            );
        }

        GenerationFailed {
            thumbnail: Some(thumbnail),
            error,
        }
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Thumbnail> {
        self.records
            .find_owned(id, user_id)
            .await?
            .ok_or_else(|| ThumbnailError::NotFound(id.to_string()))
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Thumbnail>> {
        self.records.list_by_owner(user_id).await
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        if self.records.delete_owned(id, user_id).await? {
            log::info!("Thumbnail {} deleted by user {}", id, user_id);
            Ok(())
        } else {
            Err(ThumbnailError::NotFound(id.to_string()))
        }
    }
}
