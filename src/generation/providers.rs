use crate::{
    config::GenerationConfig,
    error::{Result, ThumbnailError},
    models::ImageRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, Url};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("rthumb/", env!("CARGO_PKG_VERSION"));

/// An external service able to render bytes for a prompt.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Upper bound for a single attempt against this provider.
    fn timeout(&self) -> Duration;

    async fn fetch(&self, request: &ImageRequest) -> Result<Vec<u8>>;
}

/// The built-in chain: the text-to-image service first, then placeholders.
pub fn default_providers(config: &GenerationConfig) -> Result<Vec<Arc<dyn ImageProvider>>> {
    Ok(vec![
        Arc::new(PollinationsProvider::new(&config.pollinations_url)?),
        Arc::new(PicsumProvider::new(&config.picsum_url)?),
        Arc::new(PlaceholdProvider::new(&config.placehold_url)?),
    ])
}

/// Millisecond clock value sent as `seed`/`random` so CDNs in front of the
/// providers never hand back a cached image.
fn freshness_seed() -> i64 {
    Utc::now().timestamp_millis()
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ThumbnailError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ThumbnailError::ConfigError(format!("Invalid provider URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ThumbnailError::ConfigError(format!("Provider URL {} cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn download(client: &Client, provider: &str, url: Url) -> Result<Vec<u8>> {
    log::debug!("{} GET {}", provider, url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "image/*")
        .send()
        .await
        .map_err(|e| ThumbnailError::RequestError(format!("{} request failed: {}", provider, e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ThumbnailError::ResponseError(format!(
            "{} returned {}: {}",
            provider, status, error_text
        )));
    }

    let bytes = response.bytes().await.map_err(|e| {
        ThumbnailError::ResponseError(format!("{} body could not be read: {}", provider, e))
    })?;

    if bytes.is_empty() {
        return Err(ThumbnailError::ResponseError(format!(
            "{} returned an empty image",
            provider
        )));
    }

    Ok(bytes.to_vec())
}

/// Free text-to-image service. Slow and rate limited, so it gets the longest
/// timeout in the chain.
pub struct PollinationsProvider {
    client: Client,
    base_url: String,
}

impl PollinationsProvider {
    pub const TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(Self::TIMEOUT)?,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, request: &ImageRequest, seed: i64) -> Result<Url> {
        let mut url = endpoint(&self.base_url, &["prompt", request.prompt.as_str()])?;
        url.query_pairs_mut()
            .append_pair("width", &request.width.to_string())
            .append_pair("height", &request.height.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("nologo", "true");
        Ok(url)
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    fn name(&self) -> &str {
        "pollinations"
    }

    fn timeout(&self) -> Duration {
        Self::TIMEOUT
    }

    async fn fetch(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let url = self.url_for(request, freshness_seed())?;
        download(&self.client, self.name(), url).await
    }
}

/// Random stock photo at the requested size. Ignores the prompt.
pub struct PicsumProvider {
    client: Client,
    base_url: String,
}

impl PicsumProvider {
    pub const TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(Self::TIMEOUT)?,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, request: &ImageRequest, seed: i64) -> Result<Url> {
        let width = request.width.to_string();
        let height = request.height.to_string();
        let mut url = endpoint(&self.base_url, &[width.as_str(), height.as_str()])?;
        url.query_pairs_mut().append_pair("random", &seed.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ImageProvider for PicsumProvider {
    fn name(&self) -> &str {
        "picsum"
    }

    fn timeout(&self) -> Duration {
        Self::TIMEOUT
    }

    async fn fetch(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let url = self.url_for(request, freshness_seed())?;
        download(&self.client, self.name(), url).await
    }
}

/// Flat placeholder card, last resort.
pub struct PlaceholdProvider {
    client: Client,
    base_url: String,
}

impl PlaceholdProvider {
    pub const TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(Self::TIMEOUT)?,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, request: &ImageRequest) -> Result<Url> {
        let size = format!("{}x{}", request.width, request.height);
        let mut url = endpoint(&self.base_url, &[size.as_str(), "png"])?;
        url.query_pairs_mut().append_pair("text", "Thumbnail");
        Ok(url)
    }
}

#[async_trait]
impl ImageProvider for PlaceholdProvider {
    fn name(&self) -> &str {
        "placehold"
    }

    fn timeout(&self) -> Duration {
        Self::TIMEOUT
    }

    async fn fetch(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let url = self.url_for(request)?;
        download(&self.client, self.name(), url).await
    }
}
