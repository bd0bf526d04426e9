//! Shared handler state.

use std::sync::Arc;

use canopy_advisory::AdvisoryApi;

use crate::config::ServerConfig;

/// State handed to every handler through `State<AppState>`.
///
/// Clones are cheap: the pool is internally reference-counted and the
/// rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: canopy_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// `None` when `ADVISORY_API_KEY` is unset; the advisory handlers
    /// answer with the configuration error in that case.
    pub advisory: Option<Arc<AdvisoryApi>>,
}
