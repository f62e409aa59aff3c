// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account lifecycle: registration, sign-in, sign-out and identity profile.
//!
//! Registration is two writes to two services (identity first, then the
//! `users/{uid}` profile document). The first is authoritative: if the
//! identity cannot be created nothing else is written. If the profile write
//! fails the account still exists, so the outcome reports the profile as
//! incomplete and `complete_profile` can be retried later.

use crate::db::FirestoreDb;
use crate::error::{AppError, AuthFailure};
use crate::models::{User, UserData};
use crate::services::identity::{AuthSession, IdentityClient};
use crate::services::session::{SessionState, SessionSubscription};

/// Whether the profile document was written during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    Complete,
    /// The identity exists but `users/{uid}` was not written.
    Incomplete,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub session: AuthSession,
    pub profile: ProfileStatus,
}

impl Registration {
    pub fn user(&self) -> &User {
        &self.session.user
    }
}

/// Identity operations bound to one session state.
#[derive(Clone)]
pub struct AuthGateway {
    identity: IdentityClient,
    db: FirestoreDb,
    session: SessionState,
}

impl AuthGateway {
    pub fn new(identity: IdentityClient, db: FirestoreDb, session: SessionState) -> Self {
        Self {
            identity,
            db,
            session,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Create an account and its profile document, then sign in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        fields: UserData,
    ) -> Result<Registration, AppError> {
        let mut session = self.identity.sign_up(email, password).await?;
        let uid = session.user.uid.clone();

        if let Some(name) = fields.display_name.as_deref() {
            match self
                .identity
                .update_profile(&session.id_token, Some(name), None)
                .await
            {
                Ok(updated) => session = updated,
                Err(e) => {
                    tracing::warn!(uid = %uid, error = %e, "Could not set display name on identity")
                }
            }
        }

        let mut profile = fields;
        if profile.email.is_none() {
            profile.email = Some(email.to_string());
        }

        let status = match self.db.create_user_profile(&uid, &profile).await {
            Ok(()) => ProfileStatus::Complete,
            Err(e) => {
                tracing::warn!(uid = %uid, error = %e, "Profile write failed after sign-up");
                ProfileStatus::Incomplete
            }
        };

        self.session.set(Some(session.clone()));

        Ok(Registration {
            session,
            profile: status,
        })
    }

    /// Write (or rewrite) the profile document of an existing account.
    ///
    /// Safe to repeat: the write is a merge keyed by `uid`.
    pub async fn complete_profile(&self, uid: &str, fields: &UserData) -> Result<(), AppError> {
        self.db.merge_user_profile(uid, fields).await
    }

    /// Sign in. Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let session = self.identity.sign_in(email, password).await?;
        self.session.set(Some(session.clone()));
        Ok(session)
    }

    pub fn logout(&self) {
        self.session.set(None);
    }

    /// Update display name and/or photo URL of the signed-in identity.
    pub async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<User, AppError> {
        let current = self
            .session
            .current_session()
            .ok_or(AppError::Auth(AuthFailure::NotSignedIn))?;

        let updated = self
            .identity
            .update_profile(&current.id_token, display_name, photo_url)
            .await?;
        let user = updated.user.clone();
        self.session.set(Some(updated));

        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// See [`SessionState::on_session_change`].
    pub fn on_session_change<F>(&self, callback: F) -> SessionSubscription
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        self.session.on_session_change(callback)
    }
}
