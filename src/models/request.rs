//! Request model for the send endpoint.
//!
//! Field names match the original JSON contract (`to_email`, `body_type`,
//! ...); validation rejects malformed addresses before any network activity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

/// Whether the email body is HTML markup or plain text.
///
/// Any value other than a case-insensitive `"html"` is treated as plain
/// text; unknown strings are deliberately accepted rather than rejected,
/// matching the behavior existing clients depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    #[default]
    Html,
    Plain,
}

impl<'de> Deserialize<'de> for BodyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        if value.eq_ignore_ascii_case("html") {
            Ok(BodyType::Html)
        } else {
            Ok(BodyType::Plain)
        }
    }
}

impl Serialize for BodyType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            BodyType::Html => serializer.serialize_str("html"),
            BodyType::Plain => serializer.serialize_str("plain"),
        }
    }
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

/// Attachment supplied inline as base64-encoded content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineAttachment {
    pub filename: String,
    /// Base64 encoded content
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

/// Where attachment bytes come from: inline encoded content or a remote URL
/// fetched at send time. A JSON string selects the URL variant, an object
/// the inline variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentSource {
    Url(String),
    Inline(InlineAttachment),
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendEmailRequest {
    #[validate(custom(function = "validators::validate_email"))]
    pub to_email: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub body_type: BodyType,
    pub from_name: Option<String>,
    #[validate(custom(function = "validators::validate_email"))]
    pub reply_to: Option<String>,
    #[validate(custom(function = "validators::validate_email_list"))]
    pub cc: Option<Vec<String>>,
    #[validate(custom(function = "validators::validate_email_list"))]
    pub bcc: Option<Vec<String>>,
    pub attachments: Option<Vec<AttachmentSource>>,
}

/// Custom validation functions
pub mod validators {
    use regex::Regex;
    use validator::ValidationError;

    /// Email validation regex pattern
    const EMAIL_REGEX: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

    /// Validate email address format
    pub fn validate_email(email: &str) -> Result<(), ValidationError> {
        let email_regex = Regex::new(EMAIL_REGEX).unwrap();
        if !email_regex.is_match(email) {
            return Err(ValidationError::new("invalid_email_format"));
        }
        Ok(())
    }

    /// Validate every address in a CC/BCC list
    pub fn validate_email_list(list: &[String]) -> Result<(), ValidationError> {
        for address in list {
            validate_email(address)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn minimal_request(to_email: &str) -> SendEmailRequest {
        SendEmailRequest {
            to_email: to_email.to_string(),
            subject: "Hi".to_string(),
            body: "<b>hi</b>".to_string(),
            body_type: BodyType::Html,
            from_name: None,
            reply_to: None,
            cc: None,
            bcc: None,
            attachments: None,
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(validators::validate_email("test@example.com").is_ok());
        assert!(validators::validate_email("not-an-email").is_err());
        assert!(validators::validate_email("@example.com").is_err());
        assert!(validators::validate_email("test@").is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(minimal_request("a@example.com").validate().is_ok());
        assert!(minimal_request("not-an-email").validate().is_err());

        let mut request = minimal_request("a@example.com");
        request.cc = Some(vec!["ok@example.com".to_string(), "bad".to_string()]);
        assert!(request.validate().is_err());

        let mut request = minimal_request("a@example.com");
        request.reply_to = Some("nope".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_body_type_is_permissive() {
        let parse = |json: &str| -> SendEmailRequest { serde_json::from_str(json).unwrap() };

        let request = parse(
            r#"{"to_email":"a@example.com","subject":"s","body":"b","body_type":"HTML"}"#,
        );
        assert_eq!(request.body_type, BodyType::Html);

        let request = parse(
            r#"{"to_email":"a@example.com","subject":"s","body":"b","body_type":"markdown"}"#,
        );
        assert_eq!(request.body_type, BodyType::Plain);

        // Absent body_type defaults to html
        let request = parse(r#"{"to_email":"a@example.com","subject":"s","body":"b"}"#);
        assert_eq!(request.body_type, BodyType::Html);
    }

    #[test]
    fn test_attachment_source_variants() {
        let request: SendEmailRequest = serde_json::from_str(
            r#"{
                "to_email": "a@example.com",
                "subject": "s",
                "body": "b",
                "attachments": [
                    "https://files.example.com/report.pdf",
                    {"filename": "note.txt", "content": "aGVsbG8="}
                ]
            }"#,
        )
        .unwrap();

        let attachments = request.attachments.unwrap();
        assert_eq!(attachments.len(), 2);
        match &attachments[0] {
            AttachmentSource::Url(url) => {
                assert_eq!(url, "https://files.example.com/report.pdf")
            }
            other => panic!("expected url variant, got {:?}", other),
        }
        match &attachments[1] {
            AttachmentSource::Inline(inline) => {
                assert_eq!(inline.filename, "note.txt");
                assert_eq!(inline.content_type, "application/octet-stream");
            }
            other => panic!("expected inline variant, got {:?}", other),
        }
    }
}
