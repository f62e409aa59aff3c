// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog entries.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// An exercise from the remote catalog. Read-only, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    pub name: String,
    #[serde(rename = "type", default)]
    pub exercise_type: String,
    #[serde(default)]
    pub muscle: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub instructions: String,
}

impl Exercise {
    /// Case-insensitive substring match on name, muscle or type.
    ///
    /// `needle` must already be lowercase.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.muscle.to_lowercase().contains(needle)
            || self.exercise_type.to_lowercase().contains(needle)
    }
}

/// Filter a fetched catalog by a free-text search.
///
/// An empty (or whitespace) search returns the whole list.
pub fn filter_exercises(exercises: Vec<Exercise>, search: &str) -> Vec<Exercise> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return exercises;
    }
    exercises
        .into_iter()
        .filter(|e| e.matches_lowercase(&needle))
        .collect()
}
