//! Boundary to the external interpretation advisor.
//!
//! # Responsibility
//! - Define transcript, image and reply shapes exchanged with the advisor.
//! - Build request payloads and render replies for display.
//! - Declare the provider SPI the host implements; no transport lives here.
//!
//! # Invariants
//! - Reply text is displayed verbatim; only empty text is replaced.
//! - An inline image is attached to the final user turn only.

pub mod prompt;
pub mod request;

use crate::config::AdvisorConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use prompt::{LabAnalysisKind, LabData, LabPayload};
pub use request::{advice_request, lab_request, search_request, AdvisorRequest, ContentTurn, Part};

static DATA_URL_MIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"data:(.*?);").expect("valid data url regex"));

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Transcript author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// Base64 image payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 text, passed through untouched.
    pub data: String,
}

impl InlineImage {
    /// Splits a `data:<mime>;base64,<payload>` URL.
    ///
    /// The MIME type falls back to `image/jpeg` when the URL carries none.
    pub fn from_data_url(url: &str) -> Result<Self, AdvisorError> {
        let data = match url.split_once(',') {
            Some((_, payload)) if !payload.trim().is_empty() => payload.trim().to_string(),
            _ => {
                return Err(AdvisorError::InvalidImage(
                    "data url carries no payload".to_string(),
                ))
            }
        };
        let mime_type = DATA_URL_MIME_RE
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();
        Ok(Self { mime_type, data })
    }
}

/// Advisor answer: free text plus optional grounding sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl AdvisorReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            sources: Vec::new(),
        }
    }
}

/// Transcript text for a conversation reply.
pub fn render_advice(reply: &AdvisorReply, config: &AdvisorConfig) -> String {
    match reply.text.as_deref() {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => config.empty_advice_message.clone(),
    }
}

/// Transcript text for a lab-analysis reply, with a markdown source list.
pub fn render_lab_reply(reply: &AdvisorReply) -> String {
    let text = reply.text.as_deref().unwrap_or_default();
    let sources: Vec<&str> = reply
        .sources
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .collect();
    if sources.is_empty() {
        return text.to_string();
    }
    let links: String = sources
        .iter()
        .map(|url| format!("\n- [{url}]({url})"))
        .collect();
    format!("{text}\n\n**Sources:**{links}")
}

/// Advisor-side failures surfaced to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    InvalidImage(String),
    /// Lab payload could not be serialized.
    Payload(String),
    /// Failure reported by the host provider.
    Provider { code: String, message: String },
}

impl AdvisorError {
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::InvalidImage(_) => "invalid_image",
            Self::Payload(_) => "payload",
            Self::Provider { code, .. } => code,
        }
    }
}

impl Display for AdvisorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImage(message) => write!(f, "invalid image: {message}"),
            Self::Payload(message) => write!(f, "invalid lab payload: {message}"),
            Self::Provider { code, message } => write!(f, "advisor failed ({code}): {message}"),
        }
    }
}

impl Error for AdvisorError {}

/// Host-implemented advisor transport.
pub trait AdvisorProvider {
    fn provider_id(&self) -> &str;
    fn generate(&self, request: &AdvisorRequest) -> Result<AdvisorReply, AdvisorError>;
}

#[cfg(test)]
mod tests {
    use super::{render_advice, render_lab_reply, AdvisorReply, InlineImage};
    use crate::config::AdvisorConfig;

    #[test]
    fn data_url_is_split_into_mime_and_payload() {
        let image = InlineImage::from_data_url("data:image/png;base64,iVBORw0KGgo=")
            .expect("valid data url");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
    }

    #[test]
    fn data_url_without_mime_defaults_to_jpeg() {
        let image = InlineImage::from_data_url("data:;base64,AAAA").expect("valid data url");
        assert_eq!(image.mime_type, "image/jpeg");
        assert!(InlineImage::from_data_url("not a data url").is_err());
    }

    #[test]
    fn empty_advice_uses_fallback() {
        let config = AdvisorConfig::default();
        let reply = AdvisorReply {
            text: Some("   ".to_string()),
            sources: vec![],
        };
        assert_eq!(render_advice(&reply, &config), config.empty_advice_message);
        assert_eq!(
            render_advice(&AdvisorReply::text("Foreland."), &config),
            "Foreland."
        );
    }

    #[test]
    fn lab_reply_lists_sources_as_markdown_links() {
        let reply = AdvisorReply {
            text: Some("Recycled orogen.".to_string()),
            sources: vec!["https://a.example".to_string(), " ".to_string()],
        };
        assert_eq!(
            render_lab_reply(&reply),
            "Recycled orogen.\n\n**Sources:**\n- [https://a.example](https://a.example)"
        );
        assert_eq!(render_lab_reply(&AdvisorReply::default()), "");
    }
}
