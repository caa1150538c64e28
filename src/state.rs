use std::sync::Arc;

use crate::config::Config;
use crate::services::{enricher::QuestionEnricher, leaderboard::LeaderboardService};
use crate::store::ResultStore;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
    pub enricher: QuestionEnricher,
    pub leaderboard: Arc<dyn LeaderboardService>,
    pub config: Config,
}

impl FromRef<AppState> for ResultStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
