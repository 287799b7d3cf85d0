//! Delivery through the configured relay.
//!
//! One transport per send: built, used, dropped. lettre closes the session
//! on every exit path and a failing QUIT never surfaces to the caller.

use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::debug;

use crate::config::RelaySettings;
use crate::error::SendError;

pub async fn deliver(relay: &RelaySettings, message: Message) -> Result<(), SendError> {
    let creds = Credentials::new(relay.username.clone(), relay.password.clone());

    let builder = if relay.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&relay.server)
            .map_err(|e| SendError::Delivery(format!("SMTP relay error: {}", e)))?
    } else {
        // Plaintext session when TLS is disabled, same as the relay's own
        // submission behavior on a trusted network.
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&relay.server)
    };

    let mailer = builder.port(relay.port).credentials(creds).build();

    debug!(
        "Opening SMTP session to {}:{} (starttls={})",
        relay.server, relay.port, relay.use_tls
    );

    mailer.send(message).await.map_err(classify_smtp_error)?;

    Ok(())
}

/// Maps a lettre SMTP failure onto the envelope taxonomy.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> SendError {
    if let Some(code) = err.status() {
        if let Some(classified) = classify_reply_code(code.to_string().as_str(), &err.to_string())
        {
            return classified;
        }
    }

    // No SMTP reply to go on: a dropped or refused connection shows up as an
    // io error somewhere in the source chain.
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return SendError::ConnectionLost(err.to_string());
        }
        source = cause.source();
    }
    if err.is_timeout() {
        return SendError::ConnectionLost(err.to_string());
    }

    SendError::Delivery(err.to_string())
}

/// Reply-code classification: credential rejections, recipient rejections,
/// everything else left for the caller to fall through on.
fn classify_reply_code(code: &str, detail: &str) -> Option<SendError> {
    match code {
        "534" | "535" | "538" => Some(SendError::Authentication(detail.to_string())),
        "450" | "451" | "452" | "513" | "550" | "551" | "552" | "553" => {
            Some(SendError::RecipientRejected(detail.to_string()))
        }
        _ => None,
    }
}
