use crate::{ApiResult, GatewayState, WebhookAcceptedResponse};

use rtg_core::WebhookProvider;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use bytes::Bytes;

/// POST /webhooks/{provider}
///
/// The raw body is handed to the ingestor untouched so signatures are
/// checked against the exact bytes the provider sent.
pub async fn receive_webhook(
    State(state): State<GatewayState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAcceptedResponse>> {
    let provider: WebhookProvider = provider.parse()?;
    log::debug!("Received {} webhook ({} bytes)", provider, body.len());

    let event = state.ingestor.ingest(provider, &body, &headers).await?;

    Ok(Json(WebhookAcceptedResponse::from(event)))
}
