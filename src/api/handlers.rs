use actix_web::{
    web::{Data, Json},
    HttpResponse,
};
use log::{error, warn};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    config::{RelaySettings, Settings},
    error::SendError,
    mailer,
    models::request::SendEmailRequest,
    models::response::{ApiResponse, API_VERSION},
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// `None` when the relay configuration is incomplete; health endpoints
    /// keep working, the send endpoint answers with the service-unavailable
    /// envelope.
    pub relay: Option<RelaySettings>,
    pub http_client: reqwest::Client,
}

pub async fn root_handler() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(
        "Email API is running",
        json!({
            "service": "rustysend",
            "version": API_VERSION,
        }),
    ))
}

pub async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(
        "Service is healthy",
        json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now(),
        }),
    ))
}

/// The send endpoint. Transport-level status is always 200; the envelope's
/// `statusCode`/`isError` carry the real outcome.
pub async fn send_email_handler(
    state: Data<AppState>,
    payload: Json<SendEmailRequest>,
) -> HttpResponse {
    let request = payload.into_inner();

    let response = match process_send(&state, &request).await {
        Ok(result) => ApiResponse::ok(
            "Email sent successfully",
            serde_json::to_value(result).unwrap_or(serde_json::Value::Null),
        ),
        Err(err) => {
            match err.status_code() {
                400..=499 => warn!("Send rejected: {}", err),
                _ => error!("Send failed: {}", err),
            }
            ApiResponse::failure(&err)
        }
    };

    HttpResponse::Ok().json(response)
}

async fn process_send(
    state: &AppState,
    request: &SendEmailRequest,
) -> Result<crate::models::response::DeliveryResult, SendError> {
    // Address validation happens before touching the relay or any URL.
    request.validate().map_err(SendError::from)?;

    let relay = state.relay.as_ref().ok_or(SendError::ServiceUnavailable)?;

    mailer::send_email(&state.http_client, relay, request).await
}
