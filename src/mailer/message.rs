//! Builds the outgoing MIME message with lettre's typed builder.

use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, Message, MultiPart, SinglePart};
use lettre::Address;

use crate::config::RelaySettings;
use crate::error::SendError;
use crate::mailer::attachment::ResolvedAttachment;
use crate::models::request::{BodyType, SendEmailRequest};

const OCTET_STREAM: &str = "application/octet-stream";

/// The addresses the relay is asked to deliver to: To, then Cc, then Bcc.
pub fn recipient_set(request: &SendEmailRequest) -> Vec<String> {
    let mut recipients = vec![request.to_email.clone()];
    if let Some(cc) = &request.cc {
        recipients.extend(cc.iter().cloned());
    }
    if let Some(bcc) = &request.bcc {
        recipients.extend(bcc.iter().cloned());
    }
    recipients
}

/// Builds the complete message: headers, one body part, attachment parts.
///
/// The configured SMTP username is always the authenticated sender address;
/// `from_name` only changes the display name in front of it.
pub fn build_message(
    request: &SendEmailRequest,
    relay: &RelaySettings,
    attachments: Vec<ResolvedAttachment>,
) -> Result<Message, SendError> {
    let display_name = request.from_name.as_deref().unwrap_or(&relay.username);
    // Built structurally so display names with commas or other address
    // specials survive; lettre quotes them on render.
    let sender: Address = relay.username.parse().map_err(|e| {
        SendError::Validation(format!("Invalid from address {}: {}", relay.username, e))
    })?;
    let from_mailbox = Mailbox::new(Some(display_name.to_string()), sender);

    let mut builder = Message::builder()
        .from(from_mailbox)
        .to(request.to_email.parse().map_err(|e| {
            SendError::Validation(format!("Invalid to address {}: {}", request.to_email, e))
        })?)
        .subject(&request.subject);

    if let Some(reply_to) = &request.reply_to {
        builder = builder.reply_to(reply_to.parse().map_err(|e| {
            SendError::Validation(format!("Invalid reply-to address {}: {}", reply_to, e))
        })?);
    }

    if let Some(cc_addrs) = &request.cc {
        for cc_addr in cc_addrs {
            builder = builder.cc(cc_addr.parse().map_err(|e| {
                SendError::Validation(format!("Invalid cc address {}: {}", cc_addr, e))
            })?);
        }
    }

    if let Some(bcc_addrs) = &request.bcc {
        for bcc_addr in bcc_addrs {
            builder = builder.bcc(bcc_addr.parse().map_err(|e| {
                SendError::Validation(format!("Invalid bcc address {}: {}", bcc_addr, e))
            })?);
        }
    }

    let body_content_type = match request.body_type {
        BodyType::Html => ContentType::TEXT_HTML,
        BodyType::Plain => ContentType::TEXT_PLAIN,
    };

    let message = if attachments.is_empty() {
        builder
            .header(body_content_type)
            .body(request.body.clone())?
    } else {
        let body_part = SinglePart::builder()
            .header(body_content_type)
            .body(request.body.clone());

        let mut multipart = MultiPart::mixed().singlepart(body_part);
        for attachment in attachments {
            // An unparseable resolved type degrades to octet-stream rather
            // than failing the send.
            let content_type = ContentType::parse(&attachment.content_type)
                .or_else(|_| ContentType::parse(OCTET_STREAM))
                .map_err(|e| SendError::Attachment {
                    name: attachment.filename.clone(),
                    detail: e.to_string(),
                })?;
            // Attachment parts are always base64 transfer-encoded, whatever
            // the content looks like.
            let body = Body::new_with_encoding(attachment.data, ContentTransferEncoding::Base64)
                .map_err(|_| SendError::Attachment {
                    name: attachment.filename.clone(),
                    detail: "content could not be base64 encoded".to_string(),
                })?;
            multipart =
                multipart.singlepart(Attachment::new(attachment.filename).body(body, content_type));
        }

        builder.multipart(multipart)?
    };

    Ok(message)
}
