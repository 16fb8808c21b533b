use axum::Json;

use super::schemas::{HealthBody, Success};

/// `GET /health` -- returns service status and version. Never authenticated.
pub async fn health() -> Json<Success<HealthBody>> {
    Json(Success::new(HealthBody {
        version: env!("CARGO_PKG_VERSION"),
    }))
}
