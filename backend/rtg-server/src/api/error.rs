//! REST API error types
//!
//! Every failure leaves the gateway as `{"error": {"code", "message"}}` with
//! a status chosen from the error kind. Internal details stay in the logs.

use rtg_auth::AuthError;
use rtg_core::CoreError;
use rtg_webhook::WebhookError;
use rtg_ws::WsError;

use std::panic::Location;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body with code and message
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "TENANT_REQUIRED", "TOKEN_EXPIRED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {message} {location}")]
    BadRequest {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Missing or rejected credentials (401)
    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    /// Resource not found (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Downstream delivery is not possible right now (503)
    #[error("Service unavailable: {message} {location}")]
    ServiceUnavailable {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        let body = match self {
            ApiError::BadRequest { code, message, .. }
            | ApiError::Unauthorized { code, message, .. }
            | ApiError::ServiceUnavailable { code, message, .. } => ApiErrorBody {
                code: code.into(),
                message,
            },
            ApiError::Forbidden { message, .. } => ApiErrorBody {
                code: "FORBIDDEN".into(),
                message,
            },
            ApiError::NotFound { message, .. } => ApiErrorBody {
                code: "NOT_FOUND".into(),
                message,
            },
            ApiError::Internal { .. } => ApiErrorBody {
                code: "INTERNAL_ERROR".into(),
                message: "An unexpected error occurred".into(),
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            AuthError::InsufficientScope { .. } => ApiError::Forbidden {
                message: e.client_message(),
                location,
            },
            AuthError::TokenExpired { .. }
            | AuthError::TokenInvalid { .. }
            | AuthError::InvalidSignature { .. }
            | AuthError::MissingApiKey { .. }
            | AuthError::InvalidApiKey { .. } => ApiError::Unauthorized {
                code: e.error_code(),
                message: e.client_message(),
                location,
            },
            AuthError::SigningUnavailable { .. } | AuthError::KeyMaterial { .. } => {
                log::error!("Auth misconfiguration: {}", e);
                ApiError::Internal {
                    message: e.to_string(),
                    location,
                }
            }
        }
    }
}

/// Convert rtg-ws errors to API errors
impl From<WsError> for ApiError {
    #[track_caller]
    fn from(e: WsError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            WsError::Unauthorized { message, .. } => ApiError::Unauthorized {
                code: "UNAUTHORIZED",
                message,
                location,
            },
            WsError::Forbidden { message, .. } => ApiError::Forbidden { message, location },
            WsError::InvalidMessage { message, .. } => ApiError::BadRequest {
                code: "INVALID_MESSAGE",
                message,
                location,
            },
            WsError::CapacityExceeded { .. } | WsError::Bus { .. } => {
                ApiError::ServiceUnavailable {
                    code: e.error_code(),
                    message: e.client_message(),
                    location,
                }
            }
            _ => ApiError::Internal {
                message: e.to_string(),
                location,
            },
        }
    }
}

/// Convert rtg-webhook errors to API errors
impl From<WebhookError> for ApiError {
    #[track_caller]
    fn from(e: WebhookError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let code = e.error_code();
        let message = e.client_message().to_string();
        match e {
            WebhookError::TenantRequired { .. } | WebhookError::MalformedPayload { .. } => {
                ApiError::BadRequest {
                    code,
                    message,
                    location,
                }
            }
            WebhookError::InvalidSignature { .. } => ApiError::Unauthorized {
                code,
                message,
                location,
            },
            WebhookError::DeliveryFailed { attempts, .. } => {
                log::error!("Webhook delivery failed after {} attempts", attempts);
                ApiError::ServiceUnavailable {
                    code,
                    message,
                    location,
                }
            }
        }
    }
}

/// Convert rtg-core parse errors to API errors
impl From<CoreError> for ApiError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            CoreError::InvalidProvider { value, .. } => ApiError::NotFound {
                message: format!("Unknown webhook provider: {value}"),
                location,
            },
            CoreError::Json { .. } => ApiError::BadRequest {
                code: "MALFORMED_PAYLOAD",
                message: "Invalid JSON payload".into(),
                location,
            },
            CoreError::Validation { message, .. } => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message,
                location,
            },
            CoreError::InvalidMessageType { value, .. } => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message: format!("Invalid message type: {value}"),
                location,
            },
            CoreError::InvalidPriority { value, .. } => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message: format!("Invalid priority: {value}"),
                location,
            },
        }
    }
}

/// Convert request body rejections to API errors
impl From<JsonRejection> for ApiError {
    #[track_caller]
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest {
            code: "VALIDATION_ERROR",
            message: e.body_text(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
