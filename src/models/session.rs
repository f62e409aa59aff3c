// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recorded workout session model.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Weekday;

/// Longest accepted text for a single reps/weight entry.
const MAX_MEASURE_LEN: usize = 16;

/// A reps or weight value as typed by the user.
///
/// Kept as text so that empty and half-typed input ("", "42.") can be
/// stored. Only the aggregator turns it into a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MeasureText(String);

/// Rejected reps/weight input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasureError {
    #[error("value is longer than 16 characters")]
    TooLong,
    #[error("value may only contain digits and a decimal separator: {0:?}")]
    InvalidCharacter(String),
}

impl MeasureText {
    /// Validate user input at the API boundary.
    ///
    /// Accepts an empty string or digits with at most one `.` or `,`.
    pub fn parse(raw: &str) -> Result<Self, MeasureError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > MAX_MEASURE_LEN {
            return Err(MeasureError::TooLong);
        }
        let separators = trimmed.chars().filter(|c| *c == '.' || *c == ',').count();
        let valid_chars = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',');
        if !valid_chars || separators > 1 {
            return Err(MeasureError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Numeric value, or `None` for empty or non-numeric text.
    ///
    /// A comma decimal separator is accepted ("62,5").
    pub fn to_number(&self) -> Option<f64> {
        let text = self.0.trim();
        if text.is_empty() {
            return None;
        }
        text.replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }
}

impl fmt::Display for MeasureText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MeasureText {
    /// Stored documents are read leniently: legacy numbers become text and
    /// arbitrary strings are kept as-is (they are excluded at aggregation).
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
            Raw::Null(()) => Self::default(),
        })
    }
}

/// One set within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Serie {
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub reps: MeasureText,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub weight: MeasureText,
}

/// Sets recorded per exercise name.
pub type ExerciseSets = BTreeMap<String, Vec<Serie>>;

/// Stored session record in Firestore (`sessions` collection, auto id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSession {
    /// Firestore document ID (not stored as a field)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    /// Owning user ID
    #[serde(default)]
    pub user_id: String,
    /// Routine this session was performed against
    #[serde(default)]
    pub routine_id: String,
    /// Routine name at the time of recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_name: Option<String>,
    /// Session name (free text)
    #[serde(default)]
    pub name: String,
    /// When the session was performed (ISO 8601)
    #[serde(default)]
    pub date: String,
    /// Sets per exercise. Absent or null in storage reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exercises: ExerciseSets,
    /// Routine schedule at the time of recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_days: Option<Vec<Weekday>>,
}

impl ExerciseSession {
    /// Date component of `date` ("2024-01-08T10:00:00Z" -> "2024-01-08").
    pub fn day(&self) -> &str {
        date_component(&self.date)
    }

    /// The last recorded set for an exercise, if any.
    pub fn last_serie(&self, exercise: &str) -> Option<&Serie> {
        self.exercises.get(exercise).and_then(|sets| sets.last())
    }
}

/// Everything before the `T` separator of an ISO 8601 timestamp.
pub fn date_component(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ExerciseSets, D::Error> {
    Ok(Option::<ExerciseSets>::deserialize(deserializer)?.unwrap_or_default())
}
