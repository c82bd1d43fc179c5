use crate::{
    ApiResult, BroadcastCaller, BroadcastResponse, GatewayState, GlobalBroadcastRequest,
    SystemCaller, TenantBroadcastRequest, UserBroadcastRequest,
};

use rtg_core::{BroadcastRequest, BroadcastTarget, Principal, Priority};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use log::info;
use serde_json::{Map, Value};

/// POST /api/broadcast/global
///
/// Fans out to every connection of every tenant. System API key only.
pub async fn broadcast_global(
    State(state): State<GatewayState>,
    _caller: SystemCaller,
    body: Result<Json<GlobalBroadcastRequest>, JsonRejection>,
) -> ApiResult<Json<BroadcastResponse>> {
    let Json(request) = body?;
    let priority = resolve_priority(request.priority, &request.payload);

    let mut broadcast =
        BroadcastRequest::new(BroadcastTarget::Global, Principal::System, request.payload)
            .with_message_type(request.message_type)
            .with_priority(priority);
    if let Some(from_user) = request.from_user {
        broadcast = broadcast.with_from_user(from_user);
    }

    let outcome = state.ws.dispatcher.dispatch(broadcast).await?;
    info!(
        "Global broadcast sent: type={}, subscribers={}",
        outcome.message.message_type, outcome.subscribers_reached
    );

    Ok(Json(BroadcastResponse::from_outcome(
        &outcome,
        "Global broadcast sent successfully",
    )))
}

/// POST /api/broadcast/tenant
pub async fn broadcast_tenant(
    State(state): State<GatewayState>,
    BroadcastCaller(principal): BroadcastCaller,
    body: Result<Json<TenantBroadcastRequest>, JsonRejection>,
) -> ApiResult<Json<BroadcastResponse>> {
    let Json(request) = body?;
    let priority = resolve_priority(request.priority, &request.payload);
    let target = BroadcastTarget::Tenant {
        tenant_id: request.tenant_id,
    };

    let broadcast = build_request(target, principal, request.payload, request.from_user)
        .with_message_type(request.message_type)
        .with_priority(priority);

    let outcome = state.ws.dispatcher.dispatch(broadcast).await?;

    Ok(Json(BroadcastResponse::from_outcome(
        &outcome,
        "Tenant broadcast sent successfully",
    )))
}

/// POST /api/broadcast/user
pub async fn broadcast_user(
    State(state): State<GatewayState>,
    BroadcastCaller(principal): BroadcastCaller,
    body: Result<Json<UserBroadcastRequest>, JsonRejection>,
) -> ApiResult<Json<BroadcastResponse>> {
    let Json(request) = body?;
    let priority = resolve_priority(request.priority, &request.payload);
    let target = BroadcastTarget::User {
        tenant_id: request.tenant_id,
        user_id: request.user_id,
    };

    let broadcast = build_request(target, principal, request.payload, request.from_user)
        .with_message_type(request.message_type)
        .with_priority(priority);

    let outcome = state.ws.dispatcher.dispatch(broadcast).await?;

    Ok(Json(BroadcastResponse::from_outcome(
        &outcome,
        "User broadcast sent successfully",
    )))
}

/// Only the system principal may name a different sender; a user always
/// appears as themselves.
pub(crate) fn build_request(
    target: BroadcastTarget,
    principal: Principal,
    payload: Map<String, Value>,
    from_user: Option<String>,
) -> BroadcastRequest {
    let system_sender = match principal {
        Principal::System => from_user,
        Principal::User { .. } => None,
    };

    let request = BroadcastRequest::new(target, principal, payload);
    match system_sender {
        Some(sender) => request.with_from_user(sender),
        None => request,
    }
}

/// Explicit priority wins, then a `priority` string inside the payload.
pub(crate) fn resolve_priority(
    explicit: Option<Priority>,
    payload: &Map<String, Value>,
) -> Priority {
    explicit
        .or_else(|| {
            payload
                .get("priority")
                .and_then(Value::as_str)
                .and_then(|value| value.parse().ok())
        })
        .unwrap_or_default()
}
