// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity Toolkit REST client (email/password accounts).
//!
//! Handles:
//! - Account creation (`accounts:signUp`)
//! - Password sign-in (`accounts:signInWithPassword`)
//! - Display name / photo updates (`accounts:update`)

use crate::error::{AppError, AuthFailure};
use crate::models::User;
use serde::{Deserialize, Serialize};

/// Identity service client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A signed-in identity together with its ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: User,
    /// Short-lived ID token for calls made on the user's behalf
    pub id_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'a str>,
    return_secure_token: bool,
}

/// Account payload shared by the signUp, signInWithPassword and update endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl AccountResponse {
    fn into_user(self) -> (User, Option<String>, Option<String>) {
        let user = User {
            uid: self.local_id,
            display_name: self.display_name.filter(|n| !n.is_empty()),
            email: self.email,
            photo_url: self.photo_url.filter(|p| !p.is_empty()),
        };
        (user, self.id_token, self.refresh_token)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create an email/password account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let account: AccountResponse = self.post("accounts:signUp", &body).await?;
        tracing::info!(uid = %account.local_id, "Identity created");
        Self::session_from(account)
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let account: AccountResponse = self.post("accounts:signInWithPassword", &body).await?;
        tracing::debug!(uid = %account.local_id, "Identity signed in");
        Self::session_from(account)
    }

    /// Update the identity's display name and/or photo URL.
    ///
    /// Returns the updated identity; the ID token may be rotated.
    pub async fn update_profile(
        &self,
        id_token: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<AuthSession, AppError> {
        let body = UpdateRequest {
            id_token,
            display_name,
            photo_url,
            return_secure_token: true,
        };
        let account: AccountResponse = self.post("accounts:update", &body).await?;
        let (user, new_token, refresh_token) = account.into_user();
        Ok(AuthSession {
            user,
            id_token: new_token.unwrap_or_else(|| id_token.to_string()),
            refresh_token,
        })
    }

    fn session_from(account: AccountResponse) -> Result<AuthSession, AppError> {
        let (user, id_token, refresh_token) = account.into_user();
        let id_token = id_token.ok_or_else(|| {
            AuthFailure::Service("Identity response has no ID token".to_string())
        })?;
        Ok(AuthSession {
            user,
            id_token,
            refresh_token,
        })
    }

    /// POST a JSON body to an `accounts:*` endpoint.
    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AuthFailure::Service(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let failure = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => AuthFailure::from_identity_message(&envelope.error.message),
                Err(_) => AuthFailure::Service(format!("HTTP {}: {}", status, text)),
            };
            tracing::debug!(endpoint, %status, error = %failure, "Identity request rejected");
            return Err(failure.into());
        }

        response
            .json()
            .await
            .map_err(|e| AuthFailure::Service(format!("JSON parse error: {}", e)).into())
    }
}
