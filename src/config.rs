//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";
const DEFAULT_EXERCISE_API_URL: &str = "https://api.api-ninjas.com/v1/exercises";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// GCP / Firebase project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Firebase Storage bucket holding profile images
    pub storage_bucket: String,
    /// Identity Toolkit REST base URL (override for emulator/tests)
    pub identity_base_url: String,
    /// Firebase Storage REST base URL (override for emulator/tests)
    pub storage_base_url: String,
    /// Exercise catalog endpoint
    pub exercise_api_url: String,

    // --- Secrets ---
    /// Firebase Web API key (identity service)
    pub firebase_api_key: String,
    /// Exercise catalog API key
    pub exercise_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Bearer token for storage requests, if the bucket requires one
    pub storage_auth_token: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:8081".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_bucket: "test-project.appspot.com".to_string(),
            identity_base_url: "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1"
                .to_string(),
            storage_base_url: "http://127.0.0.1:9199/v0".to_string(),
            exercise_api_url: "http://127.0.0.1:9999/v1/exercises".to_string(),
            firebase_api_key: "test_api_key".to_string(),
            exercise_api_key: "test_exercise_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            storage_auth_token: None,
        }
    }
}

impl Config {
    /// Config for tests. Points every remote service at localhost.
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let gcp_project_id =
            env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string());

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            storage_bucket: env::var("FIREBASE_STORAGE_BUCKET")
                .unwrap_or_else(|_| format!("{}.appspot.com", gcp_project_id)),
            gcp_project_id,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_BASE_URL.to_string()),
            storage_base_url: env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_STORAGE_BASE_URL.to_string()),
            exercise_api_url: env::var("EXERCISE_API_URL")
                .unwrap_or_else(|_| DEFAULT_EXERCISE_API_URL.to_string()),

            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            exercise_api_key: env::var("EXERCISE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("EXERCISE_API_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            storage_auth_token: env::var("STORAGE_AUTH_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("FIREBASE_API_KEY", " test_key ");
        env::set_var("EXERCISE_API_KEY", "exercise_key");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_api_key, "test_key");
        assert_eq!(config.exercise_api_key, "exercise_key");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_auth_token, None);
        assert!(config.storage_bucket.ends_with(".appspot.com"));
    }
}
