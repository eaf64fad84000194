use super::{AssetStore, StagedImage};
use crate::{
    config::CloudinaryConfig,
    error::{Result, ThumbnailError},
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

pub struct CloudinaryAssetStore {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    upload_url: String,
    staging_dir: PathBuf,
}

impl CloudinaryAssetStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let cloud_name = config.cloud_name.ok_or_else(|| {
            ThumbnailError::ConfigError("Cloudinary cloud name is required".into())
        })?;
        let api_key = config
            .api_key
            .ok_or_else(|| ThumbnailError::ConfigError("Cloudinary API key is required".into()))?;
        let api_secret = config.api_secret.ok_or_else(|| {
            ThumbnailError::ConfigError("Cloudinary API secret is required".into())
        })?;

        let client = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| ThumbnailError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cloud_name,
            api_key,
            api_secret,
            folder: config.folder,
            upload_url: config.upload_url,
            staging_dir: config.staging_dir,
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.upload_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    /// Request signature: parameters sorted by name, joined as a query
    /// string, with the API secret appended, hashed with SHA-256.
    pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn upload_file(&self, staged: &StagedImage) -> Result<String> {
        let path = staged.path();
        let data = tokio::fs::read(path).await.map_err(|e| {
            ThumbnailError::StorageUploadFailure(format!(
                "Failed to read staged image {}: {}",
                path.display(),
                e
            ))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "thumbnail".to_string());

        let timestamp = Utc::now().timestamp().to_string();
        let signed = [
            ("folder", self.folder.clone()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = Self::sign(&signed, &self.api_secret);

        // Unrecognised bytes go up untyped and Cloudinary detects them.
        let mut part = multipart::Part::bytes(data).file_name(file_name);
        if let Some(format) = staged.format() {
            part = part
                .mime_str(format.mime())
                .map_err(|e| ThumbnailError::StorageUploadFailure(e.to_string()))?;
        }

        let form = multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("folder", self.folder.clone())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                ThumbnailError::StorageUploadFailure(format!("Cloudinary request failed: {}", e))
            })?;

        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(|e| {
            ThumbnailError::StorageUploadFailure(format!(
                "Failed to parse Cloudinary response ({}): {}",
                status, e
            ))
        })?;

        if let Some(error) = body.error {
            return Err(ThumbnailError::StorageUploadFailure(error.message));
        }

        match body.secure_url {
            Some(url) if status.is_success() => Ok(url),
            _ => Err(ThumbnailError::StorageUploadFailure(format!(
                "Cloudinary upload returned {} without a secure_url",
                status
            ))),
        }
    }
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn upload(&self, bytes: &[u8]) -> Result<String> {
        let staged = StagedImage::write(&self.staging_dir, bytes).await?;
        let result = self.upload_file(&staged).await;
        staged.discard().await;

        match &result {
            Ok(url) => log::info!("Uploaded image to {}", url),
            Err(e) => log::error!("Image upload failed: {}", e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn stubbed(stub: &StubServer, dir: &std::path::Path) -> CloudinaryAssetStore {
        let mut cfg = config().with_staging_dir(dir);
        cfg.upload_url = stub.url.clone();
        CloudinaryAssetStore::new(cfg).unwrap()
    }

    fn config() -> CloudinaryConfig {
        CloudinaryConfig::new().with_credentials("demo", "123456", "abcd")
    }

    #[test]
    fn test_missing_credentials() {
        let err = CloudinaryAssetStore::new(CloudinaryConfig::new()).err().unwrap();
        assert!(matches!(err, ThumbnailError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint() {
        let store = CloudinaryAssetStore::new(config()).unwrap();
        assert_eq!(
            store.endpoint(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn test_signature_sorts_params() {
        let expected = "6dcef1d508d90dd25c78e9ea56470ac9a7ecd73098ee9276e7e4e06998ae8512";
        let forward = [
            ("folder", "thumbnails".to_string()),
            ("timestamp", "1700000000".to_string()),
        ];
        let reversed = [
            ("timestamp", "1700000000".to_string()),
            ("folder", "thumbnails".to_string()),
        ];
        assert_eq!(CloudinaryAssetStore::sign(&forward, "abcd"), expected);
        assert_eq!(CloudinaryAssetStore::sign(&reversed, "abcd"), expected);
    }

    #[tokio::test]
    async fn test_failed_upload_still_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config().with_staging_dir(dir.path());
        // Nothing listens on port 9, so the request fails fast.
        cfg.upload_url = "http://127.0.0.1:9".to_string();
        let store = CloudinaryAssetStore::new(cfg).unwrap();

        let err = store.upload(b"bytes").await.unwrap_err();
        assert!(matches!(err, ThumbnailError::StorageUploadFailure(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let stub = StubServer::start(
            "200 OK",
            "application/json",
            r#"{"secure_url":"https://res.cloudinary.com/demo/image/upload/v1/thumbnails/a.jpg"}"#,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let store = stubbed(&stub, dir.path());

        let url = store.upload(JPEG).await.unwrap();
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/v1/thumbnails/a.jpg"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.starts_with("POST /demo/image/upload HTTP/1.1"));
        assert!(request.contains("Content-Type: image/jpeg"));
        assert!(request.contains(".jpg\""));
        assert!(request.contains("name=\"signature_algorithm\"\r\n\r\nsha256"));
        assert!(request.contains("name=\"folder\"\r\n\r\nthumbnails"));
    }

    #[tokio::test]
    async fn test_upload_error_message_is_surfaced() {
        let stub = StubServer::start(
            "401 Unauthorized",
            "application/json",
            r#"{"error":{"message":"Invalid Signature"}}"#,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let store = stubbed(&stub, dir.path());

        let err = store.upload(JPEG).await.unwrap_err();
        match err {
            ThumbnailError::StorageUploadFailure(message) => {
                assert_eq!(message, "Invalid Signature")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_bytes_upload_untyped() {
        let stub = StubServer::start(
            "200 OK",
            "application/json",
            r#"{"secure_url":"https://res.cloudinary.com/demo/image/upload/b.png"}"#,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let store = stubbed(&stub, dir.path());

        store.upload(b"raw bytes").await.unwrap();
        let request = &stub.requests()[0];
        assert!(request.contains(".bin\""));
        assert!(!request.contains("Content-Type: image/"));
    }
}
