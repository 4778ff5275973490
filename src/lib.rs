pub mod attempt;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod scoring;
pub mod session;
pub mod store;

use std::sync::Arc;

use axum::Router;

use attempt::AttemptController;
use session::SessionTracker;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub attempts: AttemptController,
}

impl AppState {
    pub fn new(db: db::Db) -> Self {
        let attempts = AttemptController::new(
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            SessionTracker::new(),
        );
        Self { db, attempts }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::attempt::routes())
        .with_state(state)
}
