//! Attachment resolution: turning an attachment source into bytes plus a
//! filename and content type.
//!
//! Inline sources only need a base64 decode. URL sources are fetched with a
//! fixed timeout and a hard size cap enforced both on the declared
//! `Content-Length` and on the streamed bytes, so an oversized download is
//! cut off without buffering past the limit.

use base64::Engine;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use url::Url;

use crate::error::SendError;
use crate::models::request::{AttachmentSource, InlineAttachment};

/// Hard cap on a single fetched attachment.
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

/// Per-fetch timeout, applied on the shared HTTP client.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

const FALLBACK_FILENAME: &str = "attachment";
const OCTET_STREAM: &str = "application/octet-stream";

/// An attachment reduced to the three things the message builder needs.
#[derive(Debug, Clone)]
pub struct ResolvedAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Builds the HTTP client used for URL attachments: fixed timeout, fixed
/// identifying User-Agent. Shared across requests; resolution itself keeps
/// no state between calls.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(concat!("rustysend/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub async fn resolve(
    http_client: &reqwest::Client,
    source: &AttachmentSource,
) -> Result<ResolvedAttachment, SendError> {
    match source {
        AttachmentSource::Inline(inline) => resolve_inline(inline),
        AttachmentSource::Url(url) => fetch_url(http_client, url).await,
    }
}

fn resolve_inline(inline: &InlineAttachment) -> Result<ResolvedAttachment, SendError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(&inline.content)
        .map_err(|e| SendError::Attachment {
            name: inline.filename.clone(),
            detail: format!("invalid base64 content: {}", e),
        })?;

    Ok(ResolvedAttachment {
        filename: inline.filename.clone(),
        content_type: inline.content_type.clone(),
        data,
    })
}

async fn fetch_url(
    http_client: &reqwest::Client,
    url: &str,
) -> Result<ResolvedAttachment, SendError> {
    let parsed = Url::parse(url).map_err(|e| SendError::InvalidUrl {
        url: url.to_string(),
        detail: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(SendError::InvalidUrl {
            url: url.to_string(),
            detail: "URL must have an http(s) scheme and a host".to_string(),
        });
    }

    let response = http_client
        .get(parsed.clone())
        .send()
        .await
        .map_err(|e| SendError::Download {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SendError::Download {
            url: url.to_string(),
            detail: format!("HTTP status {}", status),
        });
    }

    // Reject on the declared length before reading any of the body.
    if let Some(declared) = response.content_length() {
        if declared > MAX_ATTACHMENT_SIZE as u64 {
            return Err(SendError::Download {
                url: url.to_string(),
                detail: format!(
                    "declared Content-Length {} exceeds the {} byte limit",
                    declared, MAX_ATTACHMENT_SIZE
                ),
            });
        }
    }

    let header_filename = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(disposition_filename);
    let header_content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let filename = header_filename.unwrap_or_else(|| filename_from_url(&parsed));
    let content_type = resolve_content_type(header_content_type.as_deref(), &filename);

    let mut data: Vec<u8> = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SendError::Download {
            url: url.to_string(),
            detail: e.to_string(),
        })?;
        if data.len() + chunk.len() > MAX_ATTACHMENT_SIZE {
            return Err(SendError::Download {
                url: url.to_string(),
                detail: format!("download exceeds the {} byte limit", MAX_ATTACHMENT_SIZE),
            });
        }
        data.extend_from_slice(&chunk);
    }

    Ok(ResolvedAttachment {
        filename,
        content_type,
        data,
    })
}

/// Extracts the `filename=` parameter from a Content-Disposition value,
/// stripping surrounding quotes.
fn disposition_filename(value: &str) -> Option<String> {
    for part in value.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("filename=") {
            let name = rest.trim().trim_matches('"').trim_matches('\'');
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Last path segment of the URL, or the literal `attachment` when the path
/// is empty or ends in `/`.
fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Response header wins unless it is the generic octet-stream, in which
/// case the filename extension gets a chance to name something better.
fn resolve_content_type(header: Option<&str>, filename: &str) -> String {
    let essence = header
        .map(|h| h.split(';').next().unwrap_or(h).trim())
        .unwrap_or("");

    if !essence.is_empty() && essence != OCTET_STREAM {
        return essence.to_string();
    }

    mime_guess::from_path(filename)
        .first_raw()
        .map(|m| m.to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
