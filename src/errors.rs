use axum::http::StatusCode;
use thiserror::Error;

/// Failure to obtain the dataset. Both variants are terminal for a load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch calendar data from {source_name}: {message}")]
    Fetch { source_name: String, message: String },
    #[error("failed to parse calendar data from {source_name}: {message}")]
    Parse { source_name: String, message: String },
}

impl LoadError {
    pub fn fetch(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Fetch {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    pub fn parse(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "calendar data is not loaded".to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
