use serde::{Deserialize, Serialize};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Rate limited, retry in {0} seconds")]
    RateLimited(u64),

    #[error("Database error: {0}")]
    Database(String),

    /// A scheduled snapshot run failed. Logged by the scheduler, never returned to a caller.
    #[error("Scheduled run failed: {0}")]
    SchedulerRun(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::RateLimited(_) => 429,
            Self::Database(_) | Self::SchedulerRun(_) | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RateLimited(_) => "RATE_LIMITED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::SchedulerRun(_) => "SCHEDULER_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to show to the caller. Client errors keep their detail,
    /// server errors are replaced with a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::Conflict(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Unauthorized => "Sign in to continue.".to_string(),
            Self::RateLimited(secs) => format!("Too many votes. Try again in {secs} seconds."),
            Self::Database(_) | Self::SchedulerRun(_) | Self::Config(_) | Self::Internal(_) => {
                "Something went wrong on our side. Try again later.".to_string()
            }
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorBody {
        code: &'static str,
        message: String,
    }

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        error: ErrorBody,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let code = self.error_code();

            if self.is_server_error() {
                tracing::error!(error = %self, code, "Server error occurred");
            } else {
                tracing::debug!(error = %self, code, "Client error occurred");
            }

            let body = ErrorResponse {
                error: ErrorBody {
                    code,
                    message: self.user_message(),
                },
            };
            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("video".into()).status_code(), 404);
        assert_eq!(AppError::Conflict("dup".into()).status_code(), 409);
        assert_eq!(AppError::Unauthorized.status_code(), 401);
        assert_eq!(AppError::RateLimited(10).status_code(), 429);
        assert_eq!(AppError::Database("boom".into()).status_code(), 500);
        assert_eq!(AppError::SchedulerRun("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database("relation \"votes\" does not exist".into());
        assert!(err.is_server_error());
        assert!(!err.user_message().contains("votes"));

        let err = AppError::Conflict("Already voted for this video".into());
        assert!(!err.is_server_error());
        assert_eq!(err.user_message(), "Already voted for this video");
    }
}
