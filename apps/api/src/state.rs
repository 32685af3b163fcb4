use sqlx::PgPool;

use crate::config::Config;
use crate::jobscape::matching::MatchWeights;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Centralized scoring weights consumed by the recommendation engine.
    pub match_weights: MatchWeights,
}
