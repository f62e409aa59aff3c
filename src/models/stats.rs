//! Per-exercise progress series for charting.
//!
//! Everything here is a pure function of the sessions passed in. Nothing is
//! cached between calls, so repeated calls on the same input return equal
//! output.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ExerciseSession;

/// One point of a weight-over-time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressPoint {
    /// Session date ("YYYY-MM-DD")
    pub date: String,
    /// Weight of the session's last set for the exercise
    pub weight: f64,
}

impl ProgressPoint {
    /// Chart axis label in "DD-MM" form.
    ///
    /// Dates that are not "YYYY-MM-DD" are returned unchanged.
    pub fn chart_label(&self) -> String {
        let parts: Vec<&str> = self.date.split('-').collect();
        match parts.as_slice() {
            [_, month, day] => format!("{}-{}", day, month),
            _ => self.date.clone(),
        }
    }
}

/// The series for one exercise of a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseSeries {
    pub exercise: String,
    /// Ascending by date. Empty means "no data" for this exercise.
    pub points: Vec<ProgressPoint>,
}

impl ExerciseSeries {
    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(ProgressPoint::chart_label).collect()
    }
}

/// Build the weight series for a single exercise.
///
/// Each session with at least one set for `exercise` contributes the weight
/// of its last set. Sessions without sets, and sets whose weight is empty
/// or not a number, contribute nothing (the series is sparse, never
/// zero-filled).
pub fn exercise_progress(sessions: &[ExerciseSession], exercise: &str) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = sessions
        .iter()
        .filter_map(|session| {
            let weight = session.last_serie(exercise)?.weight.to_number()?;
            Some(ProgressPoint {
                date: session.day().to_string(),
                weight,
            })
        })
        .collect();

    // Stable, so same-day sessions keep their input order.
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// Build one series per distinct exercise of a routine, in routine order.
///
/// A routine without sessions yields an empty result rather than a list of
/// empty series.
pub fn routine_progress(
    sessions: &[ExerciseSession],
    exercises: &[String],
) -> Vec<ExerciseSeries> {
    if sessions.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    exercises
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .map(|name| ExerciseSeries {
            exercise: name.clone(),
            points: exercise_progress(sessions, name),
        })
        .collect()
}

/// Distinct days ("YYYY-MM-DD") on which any session was recorded.
pub fn session_calendar(sessions: &[ExerciseSession]) -> BTreeSet<String> {
    sessions
        .iter()
        .filter(|s| !s.date.is_empty())
        .map(|s| s.day().to_string())
        .collect()
}
