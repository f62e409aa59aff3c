// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout routine model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Day of the week a routine is scheduled on.
///
/// Stored as English names. Documents written by the original mobile app
/// carry Spanish labels, which are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Weekday {
    #[serde(alias = "Lunes")]
    Monday,
    #[serde(alias = "Martes")]
    Tuesday,
    #[serde(alias = "Miércoles", alias = "Miercoles")]
    Wednesday,
    #[serde(alias = "Jueves")]
    Thursday,
    #[serde(alias = "Viernes")]
    Friday,
    #[serde(alias = "Sábado", alias = "Sabado")]
    Saturday,
    #[serde(alias = "Domingo")]
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of the seven weekdays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown weekday: {0}")]
pub struct UnknownWeekday(pub String);

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "monday" | "lunes" => Weekday::Monday,
            "tuesday" | "martes" => Weekday::Tuesday,
            "wednesday" | "miércoles" | "miercoles" => Weekday::Wednesday,
            "thursday" | "jueves" => Weekday::Thursday,
            "friday" | "viernes" => Weekday::Friday,
            "saturday" | "sábado" | "sabado" => Weekday::Saturday,
            "sunday" | "domingo" => Weekday::Sunday,
            _ => return Err(UnknownWeekday(s.to_string())),
        };
        Ok(day)
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Sort days Monday-first and drop duplicates.
pub fn normalize_days(days: &[Weekday]) -> Vec<Weekday> {
    let mut days = days.to_vec();
    days.sort();
    days.dedup();
    days
}

/// Stored routine record in Firestore (`routines` collection, auto id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    /// Firestore document ID (not stored as a field)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    /// Routine name (non-empty)
    #[serde(default)]
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Exercise names, in the order they are performed
    #[serde(default)]
    pub exercises: Vec<String>,
    /// Scheduled weekdays
    #[serde(default)]
    pub days: Vec<Weekday>,
    /// Owning user ID
    #[serde(default)]
    pub user_id: String,
}

impl Routine {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.user_id == user_id
    }

    pub fn is_scheduled_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}
