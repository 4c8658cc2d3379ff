//! Auth API Handlers
//!
//! Registration, login, and the (stateless) logout.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::{PublicUser, TagSet};
use crate::services;
use crate::services::auth::RegisterInput;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub interested_in: Option<TagSet>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new user
/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ServiceError> {
    let input = RegisterInput {
        fullname: req
            .fullname
            .ok_or_else(|| ServiceError::missing_field("fullname"))?,
        username: req
            .username
            .ok_or_else(|| ServiceError::missing_field("username"))?,
        email: req.email.ok_or_else(|| ServiceError::missing_field("email"))?,
        password: req
            .password
            .ok_or_else(|| ServiceError::missing_field("password"))?,
        dob: req.dob.ok_or_else(|| ServiceError::missing_field("dob"))?,
        gender: req
            .gender
            .ok_or_else(|| ServiceError::missing_field("gender"))?,
        interested_in: req
            .interested_in
            .ok_or_else(|| ServiceError::missing_field("interested_in"))?
            .normalize(),
    };

    let (user, token) = services::auth::register(&state.db.pool, &state.jwt, input).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

/// Authenticate and get a token
/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let email = req.email.ok_or_else(|| ServiceError::missing_field("email"))?;
    let password = req
        .password
        .ok_or_else(|| ServiceError::missing_field("password"))?;

    let token = services::auth::login(&state.db.pool, &state.jwt, &email, &password).await?;

    Ok(Json(LoginResponse { token }))
}

/// Discard the session
/// POST /auth/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client is instructed to drop its copy.
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Logged out - discard your token".to_string(),
    })
}
