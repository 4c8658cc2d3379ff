//! Settings read and merge-patch update.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{validate_blockchain, validate_discovery, Settings, SettingsPatch};

pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Settings, ServiceError> {
    let settings: Option<Settings> = sqlx::query_as("SELECT * FROM settings WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    settings.ok_or(ServiceError::NotFound("settings"))
}

/// Apply a merge-patch: only the nested keys present in the patch change.
/// Range validation runs on the patched result before anything is written.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    patch: SettingsPatch,
) -> Result<Settings, ServiceError> {
    let current = get(pool, user_id).await?;

    let mut notifications = current.notifications.0;
    let mut privacy = current.privacy.0;
    let mut discovery = current.discovery.0;
    let mut blockchain = current.blockchain.0;

    if let Some(ref p) = patch.notifications {
        p.apply(&mut notifications);
    }
    if let Some(ref p) = patch.privacy {
        p.apply(&mut privacy);
    }
    if let Some(ref p) = patch.discovery {
        p.apply(&mut discovery);
    }
    if let Some(ref p) = patch.blockchain {
        p.apply(&mut blockchain);
    }

    validate_discovery(&discovery)?;
    validate_blockchain(&blockchain)?;

    let updated: Settings = sqlx::query_as(
        r#"
        UPDATE settings SET
            notifications = $2,
            privacy       = $3,
            discovery     = $4,
            blockchain    = $5,
            updated_at    = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(Json(notifications))
    .bind(Json(privacy))
    .bind(Json(discovery))
    .bind(Json(blockchain))
    .fetch_one(pool)
    .await?;

    Ok(updated)
}
