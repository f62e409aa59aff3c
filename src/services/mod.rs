// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote clients and business logic.

pub mod auth;
pub mod catalog;
pub mod identity;
pub mod profile;
pub mod session;
pub mod storage;

pub use auth::{AuthGateway, ProfileStatus, Registration};
pub use catalog::{CatalogQuery, ExerciseCatalog};
pub use identity::{AuthSession, IdentityClient};
pub use profile::ProfileService;
pub use session::{SessionState, SessionSubscription};
pub use storage::StorageGateway;
