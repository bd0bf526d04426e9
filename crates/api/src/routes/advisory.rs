//! Route definitions for the advisory feature endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::advisory;
use crate::state::AppState;

/// Routes mounted at `/advisory`.
///
/// ```text
/// POST /chat               -> chat
/// GET  /chat/health        -> chat_health (the one reserved GET probe)
/// POST /diagnosis/disease  -> diagnose_disease
/// POST /diagnosis/plant    -> diagnose_plant
/// POST /credit-score       -> credit_score
/// ```
///
/// Feature endpoints register POST only, so axum's method routing answers
/// every other verb with 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(advisory::chat))
        .route("/chat/health", get(advisory::chat_health))
        .route("/diagnosis/disease", post(advisory::diagnose_disease))
        .route("/diagnosis/plant", post(advisory::diagnose_plant))
        .route("/credit-score", post(advisory::credit_score))
}
