use super::options::{AspectRatio, ColorScheme, Style};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /thumbnails`. Every field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateThumbnailRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub text_overlay: Option<bool>,
}

/// One generation request and its outcome, as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub prompt_used: String,
    pub style: Style,
    pub aspect_ratio: AspectRatio,
    pub color_scheme: ColorScheme,
    pub text_overlay: bool,
    #[serde(rename = "isGenerating")]
    pub is_generating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thumbnail {
    /// A fresh record in the pending state, coerced to the fixed option sets.
    pub fn pending(user_id: impl Into<String>, request: &GenerateThumbnailRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: request.title.clone().unwrap_or_default(),
            prompt_used: request.prompt.clone().unwrap_or_default(),
            style: Style::resolve(request.style.as_deref()),
            aspect_ratio: AspectRatio::resolve(request.aspect_ratio.as_deref()),
            color_scheme: ColorScheme::resolve(request.color_scheme.as_deref()),
            text_overlay: request.text_overlay.unwrap_or(true),
            is_generating: true,
            image_url: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn succeed(&mut self, image_url: impl Into<String>) {
        self.image_url = Some(image_url.into());
        self.error = None;
        self.is_generating = false;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.image_url = None;
        self.error = Some(error.into());
        self.is_generating = false;
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateThumbnailResponse {
    pub message: String,
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationFailedResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThumbnailResponse {
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThumbnailListResponse {
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
