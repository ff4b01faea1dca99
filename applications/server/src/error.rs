/// Server error types
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Every failure is an opaque 500 with the message in a plain-text body
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::Io(e) => tracing::error!("IO error: {:?}", e),
            other => tracing::error!("{}", other),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Internal Server Error\n{}", self),
        )
            .into_response()
    }
}
