//! Core types for extracted content and CRM message records

use crate::config::NO_CONTENT_SENTINEL;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of running the extraction pipeline on one body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Plain text of the newest message
    Extracted(String),

    /// Nothing usable survived; rendered as the sentinel at the boundary
    Empty,
}

impl Extraction {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text view, with `Empty` rendered as the sentinel
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Extracted(text) => text,
            Self::Empty => NO_CONTENT_SENTINEL,
        }
    }

    /// Extracted text, if any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Extracted(text) => Some(text),
            Self::Empty => None,
        }
    }

    /// Convert to the string stored back on the record
    #[must_use]
    pub fn into_content(self) -> String {
        match self {
            Self::Extracted(text) => text,
            Self::Empty => NO_CONTENT_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check whether stored content is the "no content" marker rather than real text
#[must_use]
pub fn is_sentinel(content: &str) -> bool {
    content.trim() == NO_CONTENT_SENTINEL
}

/// Channel a message was sent over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Email,
    Sms,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
        }
    }
}

/// Whether the lead or the business sent the message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A message row as the hosted database returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    /// Row id
    pub id: String,

    /// Message channel
    #[serde(rename = "type")]
    pub kind: MessageType,

    #[serde(default)]
    pub direction: Option<Direction>,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub recipient: Option<String>,

    /// Body as stored; raw MIME for emails that were never cleaned
    #[serde(default)]
    pub content: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MessageRecord {
    #[must_use]
    pub fn is_email(&self) -> bool {
        self.kind == MessageType::Email
    }

    /// True when the stored content is already the "no content" marker
    #[must_use]
    pub fn has_sentinel_content(&self) -> bool {
        self.content.as_deref().is_some_and(is_sentinel)
    }
}
