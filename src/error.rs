use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures raised by a service plugin while talking to its backend.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("API error: {0}")]
    Api(String),

    /// The backend answered, but with a payload we could not make sense of
    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{service} API error: {detail}")]
    Upstream { service: String, detail: String },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::UnknownService(_) => "unknown_service",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::Upstream { .. } => "upstream_api",
            AppError::Internal(_) => "unexpected",
        }
    }

    /// Attaches the display name of the service whose plugin produced the error.
    pub fn from_service(service: &str, err: ServiceError) -> Self {
        match err {
            ServiceError::Authentication(msg) => AppError::ServiceUnavailable(format!(
                "{} credentials were rejected or are missing: {}",
                service, msg
            )),
            ServiceError::Api(detail) => AppError::Upstream {
                service: service.to_string(),
                detail,
            },
            ServiceError::Decode(detail) => {
                AppError::Internal(anyhow::anyhow!("{} response could not be decoded: {}", service, detail))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnknownService(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Upstream { ref service, ref detail } => {
                tracing::error!("{} API error: {}", service, detail);
                (
                    StatusCode::BAD_GATEWAY,
                    format!(
                        "An error occurred with the {} API. The playlist might be private or invalid.",
                        service
                    ),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!("Error processing playlist: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
