// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::routes::{exercises, profile, routines, sessions};
use crate::AppState;
use axum::Router;
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(routines::routes())
        .merge(sessions::routes())
        .merge(profile::routes())
        .merge(exercises::routes())
}
