use axum::http::{ header, StatusCode };
use axum::response::{ IntoResponse, Response };
use thiserror::Error;

/// Body returned for every failure past request validation.
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating PDF.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")] Validation(String),

    #[error("Missing \"{0}\" query parameter.")] MissingField(String),

    #[error("QR encoding error: {0}")] Encoding(String),

    #[error("PDF render error: {0}")] Render(String),

    #[error("Storage error: {0}")] Store(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure was caused by the caller rather than the pipeline.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = if self.is_client_error() {
            tracing::debug!("Rejected request: {}", self);
            self.to_string()
        } else {
            // Details stay in the log; the caller only sees a fixed message
            tracing::error!("Document generation failed: {}", self);
            GENERATION_FAILED_MESSAGE.to_string()
        };

        (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
