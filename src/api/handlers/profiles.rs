//! Profile API Handlers
//!
//! Discovery feed, profile reads, and the merge-style profile edit.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::ServiceError;
use crate::models::{NftStats, ProfileWithOwner, TagSet};
use crate::services;
use crate::services::profiles::ProfileUpdate;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Public owner info joined onto profile responses - username only.
#[derive(Debug, Serialize)]
pub struct ProfileOwner {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user: ProfileOwner,
    pub name: String,
    /// Derived from dob at response time, never stored
    pub age: u32,
    pub dob: NaiveDate,
    pub gender: String,
    pub interested_in: Vec<String>,
    pub images: Vec<String>,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Vec<String>,
    pub nft_stats: NftStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileWithOwner> for ProfileResponse {
    fn from(profile: ProfileWithOwner) -> Self {
        let age = profile.age();
        ProfileResponse {
            id: profile.id,
            user: ProfileOwner {
                id: profile.user_id,
                username: profile.username,
            },
            name: profile.name,
            age,
            dob: profile.dob,
            gender: profile.gender,
            interested_in: profile.interested_in,
            images: profile.images,
            tagline: profile.tagline,
            about: profile.about,
            looking_for: profile.looking_for,
            interests: profile.interests,
            nft_stats: profile.nft_stats.0,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub interested_in: Option<TagSet>,
    pub images: Option<Vec<String>>,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<TagSet>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            name: req.name,
            dob: req.dob,
            gender: req.gender,
            interested_in: req.interested_in.map(TagSet::normalize),
            images: req.images,
            tagline: req.tagline,
            about: req.about,
            looking_for: req.looking_for,
            interests: req.interests.map(TagSet::normalize),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Get swipeable candidate profiles
/// GET /profiles
pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ProfileResponse>>, ServiceError> {
    let candidates = services::discovery::list_candidates(&state.db.pool, auth_user.user_id).await?;

    Ok(Json(
        candidates.into_iter().map(ProfileResponse::from).collect(),
    ))
}

/// Get the current user's profile
/// GET /profiles/me
pub async fn get_own(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, ServiceError> {
    let profile = services::profiles::get_by_user(&state.db.pool, auth_user.user_id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Get a profile by its owner's user id
/// GET /profiles/:user_id
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ServiceError> {
    let profile = services::profiles::get_by_user(&state.db.pool, user_id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Create or update the current user's profile (merge semantics)
/// POST /profiles
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ServiceError> {
    let profile = services::profiles::upsert(
        &state.db.pool,
        &state.media,
        auth_user.user_id,
        req.into(),
    )
    .await?;

    Ok(Json(ProfileResponse::from(profile)))
}
