//! API error types with IntoResponse
//!
//! Expected-absent states map to 404/503 and are never logged as errors.
//! Everything else is finalized here exactly once: a generic 500 body for
//! the client, plus failure details stashed in the response extensions for
//! the pipeline guard to report.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::report::model::FailureDetails;

/// Client-facing message for every unhandled failure.
pub const GENERIC_ERROR: &str = "An error occurred while processing your request";

#[derive(Debug)]
pub enum ApiError {
    /// Row (or table) absent (404)
    NotFound { resource: &'static str, id: String },

    /// Table absent on create: schema not ready (503)
    SchemaMissing { table: &'static str },

    /// Any other failure (500, logged, reported by the guard)
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                })),
            )
                .into_response(),
            Self::SchemaMissing { table } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "schema_unavailable",
                    "message": format!("table \"{}\" does not exist yet", table)
                })),
            )
                .into_response(),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "unhandled error");

                let details = FailureDetails {
                    message: err.to_string(),
                    kind: classify(&err),
                    // Debug format carries the cause chain and, when
                    // captured, the backtrace.
                    trace: Some(format!("{err:?}")),
                    source_message: err.chain().nth(1).map(|source| source.to_string()),
                };

                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": GENERIC_ERROR,
                        "message": details.message.clone()
                    })),
                )
                    .into_response();
                response.extensions_mut().insert(details);
                response
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::SchemaMissing { table } => Self::SchemaMissing { table },
            DbError::Sqlx(_) => Self::Internal(e.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

/// Coarse kind tag for the error report, from the cause chain.
fn classify(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.downcast_ref::<sqlx::Error>().is_some() {
            return "database";
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return "io";
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return "serialization";
        }
    }
    "unhandled"
}
