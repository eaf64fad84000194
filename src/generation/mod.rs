pub mod providers;

use crate::{
    config::GenerationConfig,
    error::{Result, ThumbnailError},
    models::{AcquiredImage, AspectRatio, ImageRequest},
};
use std::sync::Arc;
use std::time::Duration;

pub use providers::{
    default_providers, ImageProvider, PicsumProvider, PlaceholdProvider, PollinationsProvider,
};

/// Walks an ordered provider chain until one of them returns an image.
#[derive(Clone)]
pub struct ImageAcquirer {
    providers: Vec<Arc<dyn ImageProvider>>,
    backoff_base: Duration,
}

impl ImageAcquirer {
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>, backoff_base: Duration) -> Self {
        Self {
            providers,
            backoff_base,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Ok(Self::new(default_providers(config)?, config.backoff_base()))
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Delay inserted before the attempt at `index`: none for the first
    /// provider, then `base * 2^(index - 1)`.
    pub fn backoff_delay(&self, index: usize) -> Duration {
        if index == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow((index - 1) as u32);
        self.backoff_base.saturating_mul(factor)
    }

    pub async fn acquire(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<AcquiredImage> {
        let (width, height) = aspect_ratio.dimensions();
        let request = ImageRequest {
            prompt: prompt.to_string(),
            width,
            height,
        };

        let mut last_error = None;

        for (index, provider) in self.providers.iter().enumerate() {
            let delay = self.backoff_delay(index);
            if !delay.is_zero() {
                log::info!(
                    "Waiting {}ms before trying provider {} ({}/{})",
                    delay.as_millis(),
                    provider.name(),
                    index + 1,
                    self.providers.len()
                );
                tokio::time::sleep(delay).await;
            }

            log::info!(
                "Requesting {}x{} image from {}",
                width,
                height,
                provider.name()
            );

            let attempt = tokio::time::timeout(provider.timeout(), provider.fetch(&request)).await;
            match attempt {
                Ok(Ok(bytes)) => {
                    log::info!(
                        "Received {} bytes from {}",
                        bytes.len(),
                        provider.name()
                    );
                    return Ok(AcquiredImage {
                        bytes,
                        provider: provider.name().to_string(),
                        width,
                        height,
                    });
                }
                Ok(Err(e)) => {
                    log::warn!("Provider {} failed: {}", provider.name(), e);
                    last_error = Some(e.to_string());
                }
                Err(_) => {
                    log::warn!(
                        "Provider {} timed out after {}s",
                        provider.name(),
                        provider.timeout().as_secs()
                    );
                    last_error = Some(format!("{} timed out", provider.name()));
                }
            }
        }

        log::error!("All {} image providers failed", self.providers.len());
        Err(ThumbnailError::GenerationFailure(match last_error {
            Some(e) => format!(
                "all {} image providers failed, last error: {}",
                self.providers.len(),
                e
            ),
            None => "no image providers configured".to_string(),
        }))
    }
}
