//! Media Handlers
//!
//! Serves stored profile image blobs by reference.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::AppState;

/// Fetch an image blob
/// GET /media/:reference
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let bytes = state.media.get(&reference).await?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}
