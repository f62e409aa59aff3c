// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Storage REST client.
//!
//! Objects are addressed by a slash-separated path inside one bucket. The
//! path is URL-encoded as a single segment (`profileImages%2Fabc`) in
//! object URLs.

use crate::error::AppError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Storage service client.
#[derive(Clone)]
pub struct StorageGateway {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    auth_token: Option<String>,
}

/// Object metadata (the fields we use).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    /// Comma-separated download tokens
    #[serde(default)]
    download_tokens: Option<String>,
}

impl StorageGateway {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            auth_token,
        }
    }

    fn objects_url(&self) -> String {
        format!("{}/b/{}/o", self.base_url, self.bucket)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.objects_url(), urlencoding::encode(path))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Public download URL for an object with the given metadata.
    fn download_url_for(&self, metadata: &ObjectMetadata) -> String {
        let base = format!("{}?alt=media", self.object_url(&metadata.name));
        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next())
            .filter(|t| !t.is_empty());
        match token {
            Some(token) => format!("{}&token={}", base, urlencoding::encode(token)),
            None => base,
        }
    }

    /// Upload `bytes` to `path`, replacing any existing object.
    ///
    /// Returns the download URL of the stored object.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let size = bytes.len();
        let request = self
            .http
            .post(self.objects_url())
            .query(&[("name", path), ("uploadType", "media")])
            .header("Content-Type", content_type)
            .body(bytes);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage upload failed: {}", e)))?;

        let metadata: ObjectMetadata = Self::check_response_json(response).await?;
        tracing::info!(path, size, "Object uploaded");

        Ok(self.download_url_for(&metadata))
    }

    /// Download URL of the object at `path`, or `None` if it does not exist.
    pub async fn download_url(&self, path: &str) -> Result<Option<String>, AppError> {
        let response = self
            .authorize(self.http.get(self.object_url(path)))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage metadata request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let metadata: ObjectMetadata = Self::check_response_json(response).await?;
        Ok(Some(self.download_url_for(&metadata)))
    }

    /// Delete the object at `path`. A missing object is not an error.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let response = self
            .authorize(self.http.delete(self.object_url(path)))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage delete failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(path, "Object already absent");
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!(path, "Object deleted");
        Ok(())
    }

    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
    }
}
