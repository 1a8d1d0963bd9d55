use axum::{
    Json,
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Only {allowed} supported")]
    UnsupportedMediaType { allowed: String },

    #[error("File exceeds {limit_mb}MB limit")]
    FileTooLarge { limit_mb: u64 },

    #[error("{message}")]
    BadInput { status: StatusCode, message: String },

    #[error("Runpod endpoint or API key is not configured.")]
    RunpodConfigMissing,

    #[error("Runpod request timed out.")]
    RunpodTimeout,

    #[error("{0}")]
    RunpodCallFailed(String),

    #[error("Case ID '{case_id}' not found.")]
    CaseNotFound { case_id: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn bad_input(status: StatusCode, msg: impl Into<String>) -> Self {
        Self::BadInput {
            status,
            message: msg.into(),
        }
    }

    pub fn runpod_call(msg: impl Into<String>) -> Self {
        Self::RunpodCallFailed(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Maps a transport failure talking to Runpod onto the relay error codes.
    pub fn from_upstream(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RunpodTimeout
        } else {
            Self::RunpodCallFailed(format!("{}: {}", upstream_error_kind(&err), err))
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BadInput { status, .. } => *status,
            Self::RunpodTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::RunpodCallFailed(_) | Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::CaseNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType { .. } | Self::BadInput { .. } => "BAD_INPUT",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::RunpodConfigMissing => "RUNPOD_CONFIG_MISSING",
            Self::RunpodTimeout => "RUNPOD_TIMEOUT",
            Self::RunpodCallFailed(_) | Self::Network(_) => "RUNPOD_CALL_FAILED",
            Self::CaseNotFound { .. } => "CASE_NOT_FOUND",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_input(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_input(rejection.status(), rejection.body_text())
    }
}

fn upstream_error_kind(err: &reqwest::Error) -> &'static str {
    if err.is_connect() {
        "ConnectError"
    } else if err.is_request() {
        "RequestError"
    } else if err.is_body() || err.is_decode() {
        "BodyError"
    } else {
        "HttpError"
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), "Request failed: {}", self);
        } else {
            warn!(code = self.code(), "Request rejected: {}", self);
        }

        let body = ErrorResponse {
            status: "error",
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
