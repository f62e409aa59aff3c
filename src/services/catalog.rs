// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog client (API Ninjas `v1/exercises`).

use crate::error::AppError;
use crate::models::exercise::{filter_exercises, Exercise};

/// Server-side catalog filters. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub name: Option<String>,
    pub muscle: Option<String>,
    pub exercise_type: Option<String>,
    pub difficulty: Option<String>,
}

impl CatalogQuery {
    fn params(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("muscle", &self.muscle),
            ("type", &self.exercise_type),
            ("difficulty", &self.difficulty),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

#[derive(Clone)]
pub struct ExerciseCatalog {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl ExerciseCatalog {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch exercises matching the server-side filters.
    pub async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Exercise>, AppError> {
        let response = self
            .http
            .get(&self.url)
            .header("X-Api-Key", &self.api_key)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Catalog request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let exercises: Vec<Exercise> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))?;

        tracing::debug!(count = exercises.len(), "Catalog fetched");
        Ok(exercises)
    }

    /// Fetch, then apply the free-text `search` locally.
    pub async fn search(
        &self,
        query: &CatalogQuery,
        search: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        let exercises = self.fetch(query).await?;
        Ok(filter_exercises(exercises, search))
    }
}
