// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod routine;
pub mod session;
pub mod stats;
pub mod user;

pub use exercise::Exercise;
pub use routine::{Routine, Weekday};
pub use session::{ExerciseSession, ExerciseSets, MeasureText, Serie};
pub use stats::{ExerciseSeries, ProgressPoint};
pub use user::{User, UserData};
