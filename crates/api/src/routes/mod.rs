pub mod advisory;
pub mod creators;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /advisory/chat                   POST (GET reserved for /chat/health)
/// /advisory/chat/health            GET probe
/// /advisory/diagnosis/disease      POST disease diagnosis
/// /advisory/diagnosis/plant        POST plant identification
/// /advisory/credit-score           POST statement analysis
///
/// /creators/signup                 POST signup (public)
/// /creators/login                  POST login (public)
/// /creators/me                     GET, PUT profile (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/advisory", advisory::router())
        .nest("/creators", creators::router())
}
