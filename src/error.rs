//! Application error types and HTTP response mapping.
//!
//! `AppError` covers everything that stops a commit (or a whole run) from
//! being reported: git2 failures, failing `git` invocations, unknown commits.
//! `ParseIssue` covers the anomalies that are recovered locally: the
//! offending line is skipped and the issue is logged as a warning.
//!
//! Error mappings:
//! - `RepoNotFound`, `CommitNotFound` → 404
//! - `Git`, `Command`, `Io`, `Json`, `Internal` → 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("`{command}` failed with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A line of VCS output that did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    #[error("unparsable log line: {0:?}")]
    UnparsableLogLine(String),

    #[error("unparsable blame line in {path}: {line:?}")]
    UnparsableBlameLine { path: String, line: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RepoNotFound(_) | AppError::CommitNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Git(_)
            | AppError::Command { .. }
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
