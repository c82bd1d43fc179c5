use crate::ApiError;

use rtg_auth::AuthError;
use rtg_core::{CoreError, WebhookProvider};
use rtg_webhook::WebhookError;
use rtg_ws::WsError;

use std::panic::Location;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_location::ErrorLocation;
use http_body_util::BodyExt;

fn here() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_not_found_returns_404_with_json_body() {
    let error = ApiError::NotFound {
        message: "Metrics endpoint disabled".into(),
        location: here(),
    };
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "Metrics endpoint disabled");
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let error = ApiError::Internal {
        message: "redis pool exhausted at 10.0.0.3".into(),
        location: here(),
    };
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"]["message"], "An unexpected error occurred");
}

#[test]
fn test_auth_errors_map_to_401_and_403() {
    let expired = ApiError::from(AuthError::TokenExpired { location: here() });
    let bad_key = ApiError::from(AuthError::InvalidApiKey { location: here() });
    let scope = ApiError::from(AuthError::InsufficientScope {
        required: "broadcast:send".into(),
        actual: "ws:connect".into(),
        location: here(),
    });
    let key_material = ApiError::from(AuthError::KeyMaterial {
        message: "bad pem".into(),
        location: here(),
    });

    assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(bad_key.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(scope.status(), StatusCode::FORBIDDEN);
    assert_eq!(key_material.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_webhook_errors_map_to_caller_statuses() {
    let tenant = ApiError::from(WebhookError::TenantRequired { location: here() });
    let malformed = ApiError::from(WebhookError::MalformedPayload {
        message: "expected value".into(),
        location: here(),
    });
    let signature = ApiError::from(WebhookError::InvalidSignature {
        source: AuthError::InvalidSignature { location: here() },
        location: here(),
    });
    let delivery = ApiError::from(WebhookError::DeliveryFailed {
        attempts: 4,
        message: "broker down".into(),
        location: here(),
    });

    assert_eq!(tenant.status(), StatusCode::BAD_REQUEST);
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(signature.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(delivery.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_webhook_error_body_carries_code_not_internals() {
    let error = ApiError::from(WebhookError::DeliveryFailed {
        attempts: 4,
        message: "connection refused (os error 111)".into(),
        location: here(),
    });

    let json = body_json(error.into_response()).await;

    assert_eq!(json["error"]["code"], "DELIVERY_FAILED");
    assert_eq!(json["error"]["message"], "Webhook could not be delivered");
}

#[test]
fn test_ws_forbidden_maps_to_403() {
    let error = ApiError::from(WsError::Forbidden {
        message: "Cannot broadcast to another tenant".into(),
        location: here(),
    });

    assert_eq!(error.status(), StatusCode::FORBIDDEN);
}

#[test]
fn test_unknown_provider_maps_to_404() {
    let error = ApiError::from("paypal".parse::<WebhookProvider>().unwrap_err());

    assert_eq!(error.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_core_validation_maps_to_400() {
    let error = ApiError::from(CoreError::Validation {
        message: "payload must be an object".into(),
        location: here(),
    });

    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}
