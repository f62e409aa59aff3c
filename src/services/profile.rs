// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile image handling on top of storage and the profile document.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::UserData;
use crate::services::storage::StorageGateway;

const PROFILE_IMAGE_DIR: &str = "profileImages";

/// Storage path of a user's profile image. One object per user.
pub fn profile_image_path(user_id: &str) -> String {
    format!("{}/{}", PROFILE_IMAGE_DIR, user_id)
}

#[derive(Clone)]
pub struct ProfileService {
    db: FirestoreDb,
    storage: StorageGateway,
}

impl ProfileService {
    pub fn new(db: FirestoreDb, storage: StorageGateway) -> Self {
        Self { db, storage }
    }

    /// Store a new profile image and record its URL on the profile.
    ///
    /// Re-uploading replaces the previous image.
    pub async fn upload_profile_image(
        &self,
        user_id: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = self
            .storage
            .upload(&profile_image_path(user_id), bytes, content_type)
            .await?;

        let patch = UserData {
            profile_image: Some(url.clone()),
            ..Default::default()
        };
        self.db.merge_user_profile(user_id, &patch).await?;

        Ok(url)
    }

    /// URL of the user's profile image, if one was uploaded.
    pub async fn profile_image_url(&self, user_id: &str) -> Result<Option<String>, AppError> {
        self.storage.download_url(&profile_image_path(user_id)).await
    }

    pub async fn delete_profile_image(&self, user_id: &str) -> Result<(), AppError> {
        self.storage.delete(&profile_image_path(user_id)).await?;
        self.db
            .clear_user_profile_fields(user_id, &["profileImage"])
            .await
    }

    /// Profile document and image URL, fetched concurrently.
    ///
    /// The profile read is required; a failed image lookup yields `None`.
    pub async fn profile_with_image(
        &self,
        user_id: &str,
    ) -> Result<(Option<UserData>, Option<String>), AppError> {
        let (profile, image) = tokio::join!(
            self.db.get_user_profile(user_id),
            self.profile_image_url(user_id)
        );

        let image = image.unwrap_or_else(|e| {
            tracing::warn!(user_id, error = %e, "Profile image lookup failed");
            None
        });

        Ok((profile?, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_image_path() {
        assert_eq!(profile_image_path("abc123"), "profileImages/abc123");
    }
}
