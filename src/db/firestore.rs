// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Routines (user-owned workout templates)
//! - Sessions (recorded workouts, scoped by user and routine)
//! - User profiles (extended attributes keyed by user ID)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ExerciseSession, Routine, UserData};
use firestore::FirestoreQueryDirection;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

fn read_error(e: impl std::fmt::Display) -> AppError {
    AppError::Read(e.to_string())
}

fn write_error(e: impl std::fmt::Display) -> AppError {
    AppError::Write(e.to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Read(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Read(format!("Failed to connect to Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Read("Database not connected (offline mode)".to_string()))
    }

    /// Like `get_client`, but reports the offline case as a write failure.
    fn get_write_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Write("Database not connected (offline mode)".to_string()))
    }

    // ─── Routine Operations ──────────────────────────────────────

    /// Store a new routine and return its generated document ID.
    pub async fn create_routine(&self, routine: &Routine) -> Result<String, AppError> {
        let created: Routine = self
            .get_write_client()?
            .fluent()
            .insert()
            .into(collections::ROUTINES)
            .generate_document_id()
            .object(routine)
            .execute()
            .await
            .map_err(write_error)?;

        let id = created
            .id
            .ok_or_else(|| AppError::Write("Created routine has no document ID".to_string()))?;

        tracing::info!(routine_id = %id, user_id = %routine.user_id, "Routine created");
        Ok(id)
    }

    /// Get a routine by ID. Absence is `Ok(None)`.
    pub async fn get_routine(&self, routine_id: &str) -> Result<Option<Routine>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ROUTINES)
            .obj()
            .one(routine_id)
            .await
            .map_err(read_error)
    }

    /// Get a routine only if it belongs to `user_id`.
    ///
    /// A routine owned by someone else is reported as absent.
    pub async fn get_routine_for_user(
        &self,
        routine_id: &str,
        user_id: &str,
    ) -> Result<Option<Routine>, AppError> {
        let routine = self.get_routine(routine_id).await?;
        Ok(routine.filter(|r| {
            let owned = r.is_owned_by(user_id);
            if !owned {
                tracing::warn!(routine_id, user_id, "Routine requested by non-owner");
            }
            owned
        }))
    }

    /// All routines owned by a user.
    pub async fn list_routines_for_user(&self, user_id: &str) -> Result<Vec<Routine>, AppError> {
        let mut routines: Vec<Routine> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ROUTINES)
            .filter(|q| q.field("userId").eq(user_id))
            .obj()
            .query()
            .await
            .map_err(read_error)?;

        routines.retain(|r| r.is_owned_by(user_id));
        Ok(routines)
    }

    /// Permanently delete a routine. Deleting a missing ID succeeds.
    pub async fn delete_routine(&self, routine_id: &str) -> Result<(), AppError> {
        self.get_write_client()?
            .fluent()
            .delete()
            .from(collections::ROUTINES)
            .document_id(routine_id)
            .execute()
            .await
            .map_err(write_error)?;

        tracing::info!(routine_id, "Routine deleted");
        Ok(())
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Store a new session and return its generated document ID.
    pub async fn create_session(&self, session: &ExerciseSession) -> Result<String, AppError> {
        let created: ExerciseSession = self
            .get_write_client()?
            .fluent()
            .insert()
            .into(collections::SESSIONS)
            .generate_document_id()
            .object(session)
            .execute()
            .await
            .map_err(write_error)?;

        let id = created
            .id
            .ok_or_else(|| AppError::Write("Created session has no document ID".to_string()))?;

        tracing::info!(
            session_id = %id,
            user_id = %session.user_id,
            routine_id = %session.routine_id,
            "Session recorded"
        );
        Ok(id)
    }

    /// Get a session by ID. Absence is `Ok(None)`.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<ExerciseSession>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SESSIONS)
            .obj()
            .one(session_id)
            .await
            .map_err(read_error)
    }

    /// All sessions of a user, most recent first.
    pub async fn list_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ExerciseSession>, AppError> {
        let mut sessions: Vec<ExerciseSession> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SESSIONS)
            .filter(|q| q.field("userId").eq(user_id))
            .order_by([("date", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(read_error)?;

        sessions.retain(|s| s.user_id == user_id);
        Ok(sessions)
    }

    /// All sessions recorded against a routine, oldest first.
    ///
    /// Callers are expected to have checked that the routine belongs to the
    /// requesting user.
    pub async fn list_sessions_for_routine(
        &self,
        routine_id: &str,
    ) -> Result<Vec<ExerciseSession>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SESSIONS)
            .filter(|q| q.field("routineId").eq(routine_id))
            .order_by([("date", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(read_error)
    }

    /// The user's most recent session, fetched with a single-document query.
    pub async fn get_most_recent_session(
        &self,
        user_id: &str,
    ) -> Result<Option<ExerciseSession>, AppError> {
        let sessions: Vec<ExerciseSession> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SESSIONS)
            .filter(|q| q.field("userId").eq(user_id))
            .order_by([("date", FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(read_error)?;

        Ok(sessions.into_iter().next())
    }

    // ─── User Profile Operations ─────────────────────────────────

    /// Get a user's extended profile.
    pub async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserData>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(read_error)
    }

    /// Write the full profile document (registration).
    pub async fn create_user_profile(&self, user_id: &str, data: &UserData) -> Result<(), AppError> {
        let _: () = self
            .get_write_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(data)
            .execute()
            .await
            .map_err(write_error)?;

        tracing::info!(user_id, "User profile created");
        Ok(())
    }

    /// Merge the fields set in `patch` into the stored profile.
    ///
    /// Only the fields present in `patch` are written; the document is
    /// created if it does not exist yet.
    pub async fn merge_user_profile(&self, user_id: &str, patch: &UserData) -> Result<(), AppError> {
        let fields = patch.present_fields();
        if fields.is_empty() {
            tracing::debug!(user_id, "Empty profile patch, nothing to write");
            return Ok(());
        }

        let _: () = self
            .get_write_client()?
            .fluent()
            .update()
            .fields(fields.iter().copied())
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(patch)
            .execute()
            .await
            .map_err(write_error)?;

        tracing::info!(user_id, fields = ?fields, "User profile merged");
        Ok(())
    }

    /// Remove the named fields from the stored profile.
    ///
    /// Fields in the update mask that are absent from the written object are
    /// deleted from the document.
    pub async fn clear_user_profile_fields(
        &self,
        user_id: &str,
        fields: &[&str],
    ) -> Result<(), AppError> {
        if fields.is_empty() {
            return Ok(());
        }

        let _: () = self
            .get_write_client()?
            .fluent()
            .update()
            .fields(fields.iter().copied())
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(&UserData::default())
            .execute()
            .await
            .map_err(write_error)?;

        tracing::info!(user_id, fields = ?fields, "User profile fields cleared");
        Ok(())
    }
}
