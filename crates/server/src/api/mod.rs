pub mod fragments;
pub mod health;
pub mod schemas;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fragments_model::FragmentService;

use crate::auth::BasicAuthProvider;
use crate::auth::middleware::AuthLayer;
use crate::error::error_body;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fragment flows over the configured store.
    pub service: FragmentService,
    /// Optional auth provider (None when no users are configured).
    pub auth: Option<Arc<BasicAuthProvider>>,
    /// Base URL for `Location` headers, without a trailing slash.
    pub api_url: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    let public = Router::new().route("/health", get(health::health));

    let protected = Router::new()
        .route(
            "/v1/fragments",
            get(fragments::list).post(fragments::create),
        )
        .route(
            "/v1/fragments/{id}",
            get(fragments::get)
                .put(fragments::update)
                .delete(fragments::delete),
        )
        .route("/v1/fragments/{id}/info", get(fragments::info))
        .layer(AuthLayer::new(state.auth.clone()));

    let max_body_bytes = state.max_body_bytes;

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive().expose_headers([header::LOCATION]))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(error_body(StatusCode::NOT_FOUND, "not found")),
    )
}
