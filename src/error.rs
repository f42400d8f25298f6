use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::moderation::ScorerError;

/// `axum`-compatible error handler.
#[derive(Error)]
pub struct Error {
    status: StatusCode,
    err: anyhow::Error,
}

impl Error {
    pub fn with_status(status: StatusCode, err: impl Into<anyhow::Error>) -> Self {
        Self {
            status,
            err: err.into(),
        }
    }

    pub fn bad_request(err: impl Into<anyhow::Error>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(err: impl Into<anyhow::Error>) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden(err: impl Into<anyhow::Error>) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, err)
    }

    pub fn not_found(err: impl Into<anyhow::Error>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict(err: impl Into<anyhow::Error>) -> Self {
        Self::with_status(StatusCode::CONFLICT, err)
    }

    /// The user-facing message, without the status.
    pub fn message(&self) -> String {
        format!("{:#}", self.err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            err,
        }
    }
}

impl From<ScorerError> for Error {
    fn from(err: ScorerError) -> Self {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.status, self.err)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.err.fmt(f)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Client errors carry a message meant for the user.
        if self.status.is_client_error() {
            debug!("{}: {:#}", self.status, self.err);
            return (self.status, self.message()).into_response();
        }

        error!("{:?}", self.err);

        // N.B: Forward out the error chain to the requester if this is a debug build.
        // This is insecure for production builds, so we'll return an empty body if this
        // is a release build.
        if cfg!(debug_assertions) {
            (self.status, format!("{:?}", self.err)).into_response()
        } else {
            self.status.into_response()
        }
    }
}
