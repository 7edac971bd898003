//! Mapping of training errors onto HTTP responses.
//!
//! Handlers return [`ApiError`], which wraps the service's
//! `Report<TrainingError>` and turns its current context into a status code
//! and a user-safe JSON body. Internal details only go to the log.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use medtrain_training::{TrainingError, UpstreamFailure};
use rootcause::Report;
use serde_json::json;

/// Error type returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError(Report<TrainingError>);

impl From<Report<TrainingError>> for ApiError {
    fn from(report: Report<TrainingError>) -> Self {
        Self(report)
    }
}

impl From<TrainingError> for ApiError {
    fn from(err: TrainingError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            TrainingError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            TrainingError::ScenarioNotFound { .. } | TrainingError::DialogNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            TrainingError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            TrainingError::Upstream(UpstreamFailure::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            TrainingError::Upstream(UpstreamFailure::BadResponse { .. }) => StatusCode::BAD_GATEWAY,
            TrainingError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TrainingError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    fn public_message(&self) -> String {
        match self.0.current_context() {
            TrainingError::InvalidArgument { reason } => reason.clone(),
            TrainingError::ScenarioNotFound { .. } => "Scenario not found".to_string(),
            TrainingError::DialogNotFound { .. } => "Dialog not found".to_string(),
            TrainingError::RateLimited { .. } => "Rate limit exceeded".to_string(),
            TrainingError::Upstream(UpstreamFailure::Timeout) => {
                "Language model did not respond in time".to_string()
            }
            TrainingError::Upstream(UpstreamFailure::BadResponse { .. }) => {
                "Language model request failed".to_string()
            }
            TrainingError::Storage { .. } => "Internal server error".to_string(),
            TrainingError::Conflict { .. } => {
                "Dialog was updated by another request, please retry".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        let message = self.public_message();
        match self.0.current_context() {
            TrainingError::RateLimited {
                remaining,
                retry_after_secs,
            } => {
                let mut response = (
                    status,
                    Json(json!({ "error": message, "remaining": remaining })),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(*retry_after_secs));
                response
            }
            _ => (status, Json(json!({ "error": message }))).into_response(),
        }
    }
}
