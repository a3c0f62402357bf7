use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Failure raised by the discovery engine when a whole call cannot complete.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("{program} executable is not available on this host")]
    ExecutableUnavailable { program: &'static str },
    #[error("{program} executable could not be started: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    CommandFailed { exit_code: i32, message: String },
    #[error("a systemd unit must be provided to query journalctl")]
    MissingUnit,
    #[error("discovery worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest {
        code: &'static str,
        message: String,
    },
    #[error("unavailable: {message}")]
    Unavailable {
        code: &'static str,
        message: String,
    },
    #[error("upstream failure: {message}")]
    Upstream {
        code: &'static str,
        message: String,
    },
    #[error("internal error")]
    Internal { code: &'static str, message: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
        }
    }
}

impl From<DiscoveryError> for AppError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::MissingUnit => Self::bad_request("missing_unit", err.to_string()),
            DiscoveryError::ExecutableUnavailable { .. } => Self::Unavailable {
                code: "systemd_unavailable",
                message: err.to_string(),
            },
            DiscoveryError::Spawn { .. } | DiscoveryError::CommandFailed { .. } => {
                Self::Upstream {
                    code: "systemd_command_failed",
                    message: err.to_string(),
                }
            }
            DiscoveryError::Worker(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("invalid_query", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Unavailable { code, message } => {
                (StatusCode::SERVICE_UNAVAILABLE, code, message)
            }
            Self::Upstream { code, message } => {
                tracing::warn!(error = %message, "systemd query failed");
                (StatusCode::BAD_GATEWAY, code, message)
            }
            Self::Internal { code, message } => {
                tracing::error!(error = %message, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                details: json!({}),
            }),
        )
            .into_response()
    }
}
