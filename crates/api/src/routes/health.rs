//! Root-level health probe.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
}

/// GET /health. Always 200: an unreachable database shows up as
/// `degraded` in the body, not as an error status.
async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    let db_healthy = canopy_db::health_check(&state.pool).await.is_ok();

    Json(HealthBody {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Routes mounted at the server root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
