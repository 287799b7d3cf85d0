//! The uniform response envelope and the success payload.
//!
//! Every endpoint answers with [`ApiResponse`]. The send endpoint replies
//! with transport-level 200 even on failure; the real outcome lives in
//! `statusCode`/`isError`. That convention is a compatibility requirement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SendError;

/// Fixed envelope version string.
pub const API_VERSION: &str = "1.0.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub version: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(rename = "responseException", skip_serializing_if = "Option::is_none")]
    pub response_exception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(message: &str, result: serde_json::Value) -> Self {
        Self {
            version: API_VERSION.to_string(),
            status_code: 200,
            message: message.to_string(),
            is_error: None,
            response_exception: None,
            result: Some(result),
        }
    }

    pub fn failure(err: &SendError) -> Self {
        Self {
            version: API_VERSION.to_string(),
            status_code: err.status_code(),
            message: "Failed to send email".to_string(),
            is_error: Some(true),
            response_exception: Some(err.to_string()),
            result: None,
        }
    }
}

/// Recipients breakdown reported back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipients {
    pub to: String,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

/// Success payload of the send endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub email_id: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub recipients: Recipients,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::ok(
            "Email sent successfully",
            serde_json::json!({"status": "sent"}),
        );
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["version"], API_VERSION);
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["message"], "Email sent successfully");
        assert!(value.get("isError").is_none());
        assert!(value.get("responseException").is_none());
        assert_eq!(value["result"]["status"], "sent");
    }

    #[test]
    fn test_failure_envelope_shape() {
        let response = ApiResponse::failure(&SendError::Authentication("535 5.7.8".into()));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 401);
        assert_eq!(value["isError"], true);
        assert!(value["responseException"]
            .as_str()
            .unwrap()
            .contains("SMTP Authentication failed"));
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_delivery_result_wire_names() {
        let result = DeliveryResult {
            email_id: "a@example.com".to_string(),
            subject: "Hi".to_string(),
            timestamp: Utc::now(),
            status: "sent".to_string(),
            recipients: Recipients {
                to: "a@example.com".to_string(),
                cc: vec![],
                bcc: vec![],
            },
        };
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["emailId"], "a@example.com");
        assert_eq!(value["status"], "sent");
        assert_eq!(value["recipients"]["to"], "a@example.com");
        assert!(value["recipients"]["cc"].as_array().unwrap().is_empty());
        // chrono serializes to RFC 3339 / ISO-8601
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }
}
