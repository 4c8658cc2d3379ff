//! Settings API Handlers

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::ServiceError;
use crate::models::{Blockchain, Discovery, Notifications, Privacy, Settings, SettingsPatch};
use crate::services;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notifications: Notifications,
    pub privacy: Privacy,
    pub discovery: Discovery,
    pub blockchain: Blockchain,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        SettingsResponse {
            id: settings.id,
            user_id: settings.user_id,
            notifications: settings.notifications.0,
            privacy: settings.privacy.0,
            discovery: settings.discovery.0,
            blockchain: settings.blockchain.0,
            created_at: settings.created_at,
            updated_at: settings.updated_at,
        }
    }
}

/// Get the current user's settings
/// GET /settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<SettingsResponse>, ServiceError> {
    let settings = services::settings::get(&state.db.pool, auth_user.user_id).await?;
    Ok(Json(SettingsResponse::from(settings)))
}

/// Merge-patch the current user's settings
/// PUT /settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<SettingsResponse>, ServiceError> {
    let settings = services::settings::update(&state.db.pool, auth_user.user_id, patch).await?;
    Ok(Json(SettingsResponse::from(settings)))
}
