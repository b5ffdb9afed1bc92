// HTTP transport for the assistant backend

use crate::config::BackendConfig;
use crate::streaming::{parse_frame_stream, FrameStream};
use crate::traits::{ChatBackend, DocumentBackend, GalleryBackend, HistoryBackend};
use crate::types::{
    ChatRequest, ChatResponse, DocumentUpload, GalleryClearResponse, GalleryItem, GalleryResponse,
    HistoryResponse, UploadResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Response;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Backend client over plain HTTP (no auth, no retries)
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create new client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/event-stream"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("mosaic/", env!("CARGO_PKG_VERSION"))),
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reject non-success statuses, keeping the body for diagnostics
    async fn ensure_success(response: Response) -> Result<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %error_text, "Backend request failed");
            anyhow::bail!("HTTP error! status: {}", status);
        }
        Ok(response)
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .http_client
            .post(self.endpoint("/chat"))
            .json(request)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::ensure_success(response).await?;

        response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse response")
    }

    async fn chat_stream(&self, request: &ChatRequest) -> Result<FrameStream> {
        let response = self
            .http_client
            .post(self.endpoint("/chat/stream"))
            .json(request)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::ensure_success(response).await?;

        Ok(parse_frame_stream(response.bytes_stream()))
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn upload_documents(
        &self,
        thread_id: &str,
        files: Vec<DocumentUpload>,
    ) -> Result<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            let mut part = Part::bytes(file.bytes).file_name(file.name);
            if let Some(mime) = file.mime {
                part = part.mime_str(&mime).context("Invalid MIME type")?;
            }
            form = form.part("files", part);
        }
        form = form.text("thread_id", thread_id.to_string());

        let response = self
            .http_client
            .post(self.endpoint("/upload_documents"))
            .multipart(form)
            .send()
            .await
            .context("Failed to send upload")?;

        let response = Self::ensure_success(response).await?;

        response
            .json::<UploadResponse>()
            .await
            .context("Failed to parse upload response")
    }
}

#[async_trait]
impl GalleryBackend for HttpBackend {
    async fn list_gallery(&self, limit: Option<usize>) -> Result<Vec<GalleryItem>> {
        let url = match limit {
            Some(limit) => self.endpoint(&format!("/gallery?limit={}", limit)),
            None => self.endpoint("/gallery"),
        };

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("Failed to fetch gallery")?;

        let response = Self::ensure_success(response).await?;

        let body: GalleryResponse = response
            .json()
            .await
            .context("Failed to parse gallery")?;
        Ok(body.gallery)
    }

    async fn delete_gallery_item(&self, id: i64) -> Result<()> {
        let response = self
            .http_client
            .delete(self.endpoint(&format!("/gallery/{}", id)))
            .send()
            .await
            .context("Failed to delete gallery item")?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn clear_gallery(&self) -> Result<usize> {
        let response = self
            .http_client
            .delete(self.endpoint("/gallery"))
            .send()
            .await
            .context("Failed to clear gallery")?;

        let response = Self::ensure_success(response).await?;

        let body: GalleryClearResponse = response
            .json()
            .await
            .context("Failed to parse gallery clear response")?;
        Ok(body.deleted_count)
    }
}

#[async_trait]
impl HistoryBackend for HttpBackend {
    async fn fetch_history(&self, thread_id: &str) -> Result<HistoryResponse> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("/history/{}", thread_id)))
            .send()
            .await
            .context("Failed to fetch history")?;

        let response = Self::ensure_success(response).await?;

        response
            .json()
            .await
            .context("Failed to parse history")
    }

    async fn clear_history(&self, thread_id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.endpoint(&format!("/history/{}", thread_id)))
            .send()
            .await
            .context("Failed to clear history")?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
