//! Route definitions for the `/creators` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::creators;
use crate::state::AppState;

/// Routes mounted at `/creators`.
///
/// ```text
/// POST /signup  -> signup
/// POST /login   -> login
/// GET  /me      -> me          (requires auth)
/// PUT  /me      -> update_me   (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(creators::signup))
        .route("/login", post(creators::login))
        .route("/me", get(creators::me).put(creators::update_me))
}
