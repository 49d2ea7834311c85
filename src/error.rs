use axum::http::StatusCode;
use tracing::error;

use crate::goals::repo_types::GoalStatus;

/// Errors produced by the domain services.
///
/// Handlers keep the `(StatusCode, String)` rejection shape; `?` converts
/// through the `From` impl below.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("cannot {action} a goal that is {from}")]
    InvalidTransition {
        from: GoalStatus,
        action: &'static str,
    },

    #[error("goal {0} was updated by someone else, reload and retry")]
    Conflict(i64),

    #[error("{0}")]
    Unauthorized(String),

    #[error("staff access required")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for (StatusCode, String) {
    fn from(e: AppError) -> Self {
        let status = e.status();
        if status.is_server_error() {
            error!(error = %e, "request failed");
            (status, "Internal server error".into())
        } else {
            (status, e.to_string())
        }
    }
}
