//! Swipe-candidate discovery.
//!
//! Candidates are profiles whose gender is in the requester's stated
//! preference, excluding the requester's own profile. An unset preference
//! fails closed: no candidates until the requester says who to show.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::ProfileWithOwner;

pub async fn list_candidates(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ProfileWithOwner>, ServiceError> {
    let interested_in: Option<Vec<String>> =
        sqlx::query_scalar("SELECT interested_in FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let Some(interested_in) = interested_in else {
        return Err(ServiceError::NotFound("profile"));
    };

    if interested_in.is_empty() {
        return Ok(Vec::new());
    }

    let candidates: Vec<ProfileWithOwner> = sqlx::query_as(
        r#"
        SELECT p.id, p.user_id, u.username, p.name, p.dob, p.gender,
               p.interested_in, p.images, p.tagline, p.about, p.looking_for,
               p.interests, p.nft_stats, p.created_at, p.updated_at
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id <> $1
          AND p.gender = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(&interested_in)
    .fetch_all(pool)
    .await?;

    Ok(candidates)
}
