//! Storage for uploaded thumbnails, avatars and lecture videos.
//!
//! [`LocalMediaStore`] writes below `STORAGE_ROOT` and the server exposes the
//! files under `/media`. [`CloudinaryStore`] pushes files to Cloudinary's
//! signed upload API and reports video durations back.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use util::config::AppConfig;
use util::duration::parse_seconds;
use util::paths::{ensure_parent_dir, sanitize_segment};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media host request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Media host rejected upload: {0}")]
    Rejected(String),
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    pub url: String,
    /// Reported for videos by hosts that probe the upload.
    pub duration_seconds: Option<i32>,
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Declared content type, falling back to a guess from the file name.
    pub fn mime(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .to_string()
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime().starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime().starts_with("video/")
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores `upload` inside `folder` and returns its public location.
    async fn store(&self, folder: &str, upload: MediaUpload) -> Result<StoredMedia, MediaError>;
}

pub struct LocalMediaStore {
    root: PathBuf,
    public_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            util::paths::resolve_root(&config.storage_root),
            config.public_media_url.clone(),
        )
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, folder: &str, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        let folder = sanitize_segment(folder);
        let file_name = format!(
            "{}-{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_segment(&upload.file_name)
        );
        let path = self.root.join(&folder).join(&file_name);

        ensure_parent_dir(&path)?;
        tokio::fs::write(&path, &upload.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = upload.bytes.len(), "Stored upload");

        Ok(StoredMedia {
            url: format!("{}/{}/{}", self.public_url, folder, file_name),
            duration_seconds: None,
        })
    }
}

pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    base_folder: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    duration: Option<serde_json::Value>,
    error: Option<CloudinaryErrorBody>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

/// Signature over the alphabetically sorted upload parameters.
pub fn cloudinary_signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{joined}{api_secret}").as_bytes()))
}

impl CloudinaryStore {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
            base_folder: config.media_folder.clone(),
        }
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn store(&self, folder: &str, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        let folder = format!("{}/{}", self.base_folder, sanitize_segment(folder));
        let timestamp = Utc::now().timestamp().to_string();
        let signature = cloudinary_signature(
            &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.api_secret,
        );

        let mime = upload.mime();
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&mime)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.cloud_name
        );
        let body: CloudinaryResponse = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = body.error {
            return Err(MediaError::Rejected(err.message));
        }
        let url = body
            .secure_url
            .ok_or_else(|| MediaError::Rejected("missing secure_url".into()))?;
        let duration_seconds = body.duration.and_then(|d| parse_seconds(&d.to_string()));

        Ok(StoredMedia {
            url,
            duration_seconds,
        })
    }
}
