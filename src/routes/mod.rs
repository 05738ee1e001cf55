//! API route handlers - maps HTTP endpoints to report operations.
//!
//! - `repository`: Basic repo info (GET /api/v1/repository)
//! - `report`: Cross-referenced report for a defect id

pub mod report;
pub mod repository;

use axum::Router;

use crate::git::SharedRepo;
use crate::report::ReportConfig;

#[derive(Clone)]
pub struct AppState {
    pub repo: SharedRepo,
    pub config: ReportConfig,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(repository::routes(state.clone()))
        .merge(report::routes(state))
}
