// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GymPlus Tracker: workout routines, recorded sessions and progress
//!
//! This crate provides the data-access layer (Firestore repositories,
//! identity/storage/catalog clients), the statistics aggregator and the
//! HTTP API used by the mobile app.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{
    AuthGateway, ExerciseCatalog, IdentityClient, ProfileService, SessionState, StorageGateway,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityClient,
    pub catalog: ExerciseCatalog,
    pub profiles: ProfileService,
}

impl AppState {
    /// Build the service clients described by `config` around `db`.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let identity = IdentityClient::new(&config.identity_base_url, &config.firebase_api_key);
        let catalog = ExerciseCatalog::new(&config.exercise_api_url, &config.exercise_api_key);
        let storage = StorageGateway::new(
            &config.storage_base_url,
            &config.storage_bucket,
            config.storage_auth_token.clone(),
        );
        let profiles = ProfileService::new(db.clone(), storage);

        Self {
            config,
            db,
            identity,
            catalog,
            profiles,
        }
    }

    /// An auth gateway with its own session state.
    ///
    /// The server keeps no signed-in state between requests; each request
    /// gets a fresh session.
    pub fn auth_gateway(&self) -> AuthGateway {
        AuthGateway::new(self.identity.clone(), self.db.clone(), SessionState::new())
    }
}
