use std::sync::Arc;

use crate::services::Recommender;

/// Shared application state.
///
/// The recommender is built before the server starts and never mutated, so
/// handlers share it without a lock.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub default_top_n: usize,
}

impl AppState {
    /// Wraps a ready recommender for the router
    pub fn new(recommender: Recommender, default_top_n: usize) -> Self {
        Self {
            recommender: Arc::new(recommender),
            default_top_n,
        }
    }
}
