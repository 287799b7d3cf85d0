//! Message construction and SMTP delivery.

pub mod attachment;
pub mod message;
pub mod smtp;

use log::{debug, info};

use crate::config::RelaySettings;
use crate::error::SendError;
use crate::models::request::SendEmailRequest;
use crate::models::response::{DeliveryResult, Recipients};

/// Runs the full send pipeline for an already-validated request: resolve
/// attachments, build the MIME message, deliver it through the relay.
///
/// Attachment resolution happens before any SMTP traffic; the first failing
/// attachment aborts the whole send, so no partial message ever goes out.
pub async fn send_email(
    http_client: &reqwest::Client,
    relay: &RelaySettings,
    request: &SendEmailRequest,
) -> Result<DeliveryResult, SendError> {
    let mut resolved = Vec::new();
    if let Some(sources) = &request.attachments {
        for source in sources {
            resolved.push(attachment::resolve(http_client, source).await?);
        }
    }

    let message = message::build_message(request, relay, resolved)?;
    debug!("Relaying to {:?}", message::recipient_set(request));
    smtp::deliver(relay, message).await?;

    info!("Email sent successfully to {}", request.to_email);

    Ok(DeliveryResult {
        email_id: request.to_email.clone(),
        subject: request.subject.clone(),
        timestamp: chrono::Utc::now(),
        status: "sent".to_string(),
        recipients: Recipients {
            to: request.to_email.clone(),
            cc: request.cc.clone().unwrap_or_default(),
            bcc: request.bcc.clone().unwrap_or_default(),
        },
    })
}
