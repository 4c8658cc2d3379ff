//! Profile reads and the merge-style profile upsert.
//!
//! The upsert touches only the fields present in the request. When a new
//! image set is supplied it fully replaces the previous one, and blobs that
//! dropped out of the set are deleted from media storage strictly after the
//! database write - a failed delete is logged, never surfaced.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{age_on, ProfileWithOwner};
use crate::storage::MediaStore;

pub async fn get_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<ProfileWithOwner, ServiceError> {
    let profile: Option<ProfileWithOwner> = sqlx::query_as(
        r#"
        SELECT p.id, p.user_id, u.username, p.name, p.dob, p.gender,
               p.interested_in, p.images, p.tagline, p.about, p.looking_for,
               p.interests, p.nft_stats, p.created_at, p.updated_at
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    profile.ok_or(ServiceError::NotFound("profile"))
}

/// Partial profile update; `None` means "leave unchanged".
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub interested_in: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<Vec<String>>,
}

pub async fn upsert(
    pool: &PgPool,
    media: &MediaStore,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<ProfileWithOwner, ServiceError> {
    // A dob change re-runs the same minimum-age rule as registration.
    if let Some(dob) = update.dob {
        if age_on(dob, Utc::now().date_naive()) < 18 {
            return Err(ServiceError::underage());
        }
    }

    let previous_images: Option<Vec<String>> =
        sqlx::query_scalar("SELECT images FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match previous_images {
        Some(previous) => {
            // Single-statement field-level merge; unsupplied fields keep
            // their stored values.
            let updated = sqlx::query(
                r#"
                UPDATE profiles SET
                    name          = COALESCE($2, name),
                    dob           = COALESCE($3, dob),
                    gender        = COALESCE($4, gender),
                    interested_in = COALESCE($5, interested_in),
                    images        = COALESCE($6, images),
                    tagline       = COALESCE($7, tagline),
                    about         = COALESCE($8, about),
                    looking_for   = COALESCE($9, looking_for),
                    interests     = COALESCE($10, interests),
                    updated_at    = now()
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .bind(&update.name)
            .bind(update.dob)
            .bind(&update.gender)
            .bind(&update.interested_in)
            .bind(&update.images)
            .bind(&update.tagline)
            .bind(&update.about)
            .bind(&update.looking_for)
            .bind(&update.interests)
            .execute(pool)
            .await?;

            if updated.rows_affected() == 0 {
                // Profile vanished between the read and the write.
                return Err(ServiceError::NotFound("profile"));
            }

            // Delete-after-commit: replaced blobs are collected only once
            // the row update has succeeded, and each at most once.
            if let Some(ref new_images) = update.images {
                collect_replaced_images(media, &previous, new_images).await;
            }
        }
        None => {
            create_profile(pool, user_id, &update).await?;
        }
    }

    get_by_user(pool, user_id).await
}

/// Creation path for a user whose profile record is missing (registration
/// normally seeds it). Name falls back to the account fullname; dob and
/// gender cannot be defaulted.
async fn create_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<(), ServiceError> {
    let fullname: Option<String> = sqlx::query_scalar("SELECT fullname FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let Some(fullname) = fullname else {
        return Err(ServiceError::NotFound("user"));
    };

    let Some(dob) = update.dob else {
        return Err(ServiceError::missing_field("dob"));
    };
    let Some(gender) = update.gender.as_deref() else {
        return Err(ServiceError::missing_field("gender"));
    };

    sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, name, dob, gender, interested_in, images, tagline,
             about, looking_for, interests)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(user_id)
    .bind(update.name.as_deref().unwrap_or(&fullname))
    .bind(dob)
    .bind(gender)
    .bind(update.interested_in.clone().unwrap_or_default())
    .bind(update.images.clone().unwrap_or_default())
    .bind(&update.tagline)
    .bind(&update.about)
    .bind(&update.looking_for)
    .bind(update.interests.clone().unwrap_or_default())
    .execute(pool)
    .await?;

    Ok(())
}

/// Fire-and-forget cleanup of image blobs that fell out of the profile's
/// image set. Failures are logged and do not fail the request.
async fn collect_replaced_images(media: &MediaStore, previous: &[String], current: &[String]) {
    for reference in previous {
        if current.contains(reference) {
            continue;
        }
        if let Err(e) = media.delete(reference).await {
            tracing::warn!(reference = %reference, "Failed to delete replaced image: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_media() -> (MediaStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let media = MediaStore::new(dir.path().to_path_buf(), 1024)
            .await
            .unwrap();
        (media, dir)
    }

    #[tokio::test]
    async fn test_replaced_images_deleted_exactly_once() {
        let (media, _dir) = test_media().await;

        let kept = media.store(b"kept").await.unwrap();
        let dropped = media.store(b"dropped").await.unwrap();

        let previous = vec![kept.clone(), dropped.clone()];
        let current = vec![kept.clone()];

        collect_replaced_images(&media, &previous, &current).await;

        // Re-referenced blob survives, dropped blob is gone.
        assert!(media.get(&kept).await.is_ok());
        assert!(media.get(&dropped).await.is_err());

        // Running the collection again is harmless: the second delete is a
        // logged no-op, not a failure.
        collect_replaced_images(&media, &previous, &current).await;
        assert!(media.get(&kept).await.is_ok());
    }

    #[tokio::test]
    async fn test_foreign_references_are_skipped_gracefully() {
        let (media, _dir) = test_media().await;
        let previous = vec!["https://cdn.example.com/old.jpg".to_string()];

        // Invalid references only log; nothing panics or errors out.
        collect_replaced_images(&media, &previous, &[]).await;
    }
}
