//! User Account Handlers

use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::auth::middleware::AuthUser;
use crate::error::ServiceError;
use crate::models::{PublicUser, User};
use crate::AppState;

/// Get the current user's account
/// GET /users/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<PublicUser>, ServiceError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.user_id)
        .fetch_optional(&state.db.pool)
        .await?;

    user.map(PublicUser::from)
        .map(Json)
        .ok_or(ServiceError::NotFound("user"))
}
