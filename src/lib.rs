//! Library core for RustySend: an HTTP API that relays emails through an
//! upstream SMTP server.

pub mod api;
pub mod config;
pub mod error;
pub mod mailer;
pub mod models;

pub mod prelude {
    pub use crate::api::handlers::AppState;
    pub use crate::config::{RelaySettings, Settings, SmtpConfig};
    pub use crate::error::SendError;
    pub use crate::models::request::{AttachmentSource, BodyType, SendEmailRequest};
    pub use crate::models::response::{ApiResponse, DeliveryResult, Recipients};

    // Common Libs
    pub use log::{debug, error, info, trace, warn};
    pub use std::sync::Arc;
    pub use thiserror::Error;
}
