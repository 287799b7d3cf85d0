use thiserror::Error;

/// Failure taxonomy for the send pipeline.
///
/// Every variant maps to the `statusCode` carried inside the response
/// envelope; the HTTP transport status stays 200 for compatibility with
/// existing consumers of this API.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Request validation failed: {0}")]
    Validation(String),

    #[error("Invalid attachment URL '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    #[error("Failed to download attachment from '{url}': {detail}")]
    Download { url: String, detail: String },

    #[error("Attachment '{name}' could not be processed: {detail}")]
    Attachment { name: String, detail: String },

    #[error("SMTP Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid recipient email address: {0}")]
    RecipientRejected(String),

    #[error("SMTP Server connection lost: {0}")]
    ConnectionLost(String),

    #[error("Failed to send email: {0}")]
    Delivery(String),

    #[error("Email service not initialized. Please check environment variables.")]
    ServiceUnavailable,
}

impl SendError {
    /// Envelope status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            SendError::Validation(_)
            | SendError::InvalidUrl { .. }
            | SendError::Download { .. }
            | SendError::Attachment { .. }
            | SendError::RecipientRejected(_) => 400,
            SendError::Authentication(_) => 401,
            SendError::ConnectionLost(_) => 503,
            SendError::Delivery(_) | SendError::ServiceUnavailable => 500,
        }
    }
}

impl From<validator::ValidationErrors> for SendError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    )
                })
            })
            .collect();

        SendError::Validation(details.join("; "))
    }
}

impl From<lettre::error::Error> for SendError {
    fn from(err: lettre::error::Error) -> Self {
        SendError::Delivery(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SendError::Validation("bad".into()).status_code(), 400);
        assert_eq!(
            SendError::InvalidUrl {
                url: "nope".into(),
                detail: "no scheme".into()
            }
            .status_code(),
            400
        );
        assert_eq!(
            SendError::Download {
                url: "http://x/y".into(),
                detail: "404".into()
            }
            .status_code(),
            400
        );
        assert_eq!(SendError::Authentication("535".into()).status_code(), 401);
        assert_eq!(SendError::RecipientRejected("550".into()).status_code(), 400);
        assert_eq!(SendError::ConnectionLost("reset".into()).status_code(), 503);
        assert_eq!(SendError::Delivery("boom".into()).status_code(), 500);
        assert_eq!(SendError::ServiceUnavailable.status_code(), 500);
    }

    #[test]
    fn test_attachment_error_names_the_url() {
        let err = SendError::Download {
            url: "http://files.example.com/a.pdf".into(),
            detail: "HTTP status 404 Not Found".into(),
        };
        assert!(err.to_string().contains("http://files.example.com/a.pdf"));
    }

    #[test]
    fn test_validation_errors_conversion() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1))]
            field: String,
        }

        let err: SendError = Probe {
            field: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();

        match err {
            SendError::Validation(detail) => assert!(detail.contains("field")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
