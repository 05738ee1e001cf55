//! Report endpoint.
//!
//! GET /api/v1/report/{bug}?fail_fast=<optional>
//!
//! Builds the report for a defect id on a blocking worker: every git query
//! is a blocking call and a report runs them strictly one after another.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::Report;
use crate::report::{FailurePolicy, build_report};
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/report/{bug}", get(get_report))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    fail_fast: Option<bool>,
}

async fn get_report(
    State(state): State<AppState>,
    Path(bug): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>> {
    let mut config = state.config;
    if let Some(fail_fast) = query.fail_fast {
        config.failure_policy = if fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Skip
        };
    }

    let repo = state.repo.clone();
    let report = tokio::task::spawn_blocking(move || build_report(repo.as_ref(), &bug, &config))
        .await
        .map_err(|e| AppError::Internal(format!("report worker failed: {}", e)))??;

    Ok(Json(report))
}
