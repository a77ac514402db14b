use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{Error, storage::WorkspaceError};

/// An error returned from a REST handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The store rejected the request.
    #[error(transparent)]
    Store(#[from] Error),

    /// The request could not be decoded.
    #[error("validation failed: {0}")]
    Rejected(String),

    /// The forest could not be saved.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::Store(err) => Self::Store(err),
            WorkspaceError::Save(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(Error::Validation(_)) | Self::Rejected(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Store(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(Error::HasChildren { .. } | Error::CircularReference { .. }) => {
                StatusCode::CONFLICT
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Store(err) => err.kind(),
            Self::Rejected(_) => "validation_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
            message: String,
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("request rejected: {self}");
        }

        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
