use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::auth::middleware::auth_middleware;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Stored profile images (public, like static upload serving)
        .route("/media/:reference", get(handlers::media::get_image));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        // Account
        .route("/users/me", get(handlers::users::me))
        // Profiles
        .route(
            "/profiles",
            get(handlers::profiles::list_candidates).post(handlers::profiles::upsert_profile),
        )
        .route("/profiles/me", get(handlers::profiles::get_own))
        .route("/profiles/:user_id", get(handlers::profiles::get_by_id))
        // Settings
        .route("/settings", get(handlers::settings::get_settings))
        .route("/settings", put(handlers::settings::update_settings))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}
