//! Tunable heuristics for the extraction pipeline

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Literal returned when nothing usable survives extraction.
///
/// Callers store this string in place of content, so it doubles as a
/// marker for duplicate detection and display logic.
pub const NO_CONTENT_SENTINEL: &str = "No content available";

/// A sign-off line only ends the message when fewer than this many
/// characters of non-blank content follow it.
pub const SIGNATURE_TAIL_THRESHOLD: usize = 52;

/// Results shorter than this (in chars) are reported as empty.
pub const MIN_CONTENT_CHARS: usize = 2;

/// MIME part whose body is nothing but base64 text.
///
/// Group 1 is the payload: a boundary line, optional part headers, a blank
/// line, then base64 lines up to the next boundary.
pub const BASE64_BLOCK_PATTERN: &str = r"--[0-9A-Za-z'()+_,./:=?-]+\r?\n(?:[A-Za-z][A-Za-z0-9-]*:[^\r\n]*\r?\n)*\r?\n([A-Za-z0-9+/=\r\n]{16,}?)\r?\n--";

/// Extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Max trailing content (chars) after a sign-off for it to count as a signature
    pub signature_tail_threshold: usize,

    /// Minimum length of a non-empty result
    pub min_content_chars: usize,

    /// Regex locating a base64 MIME block; must have one capture group
    pub base64_block_pattern: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            signature_tail_threshold: SIGNATURE_TAIL_THRESHOLD,
            min_content_chars: MIN_CONTENT_CHARS,
            base64_block_pattern: BASE64_BLOCK_PATTERN.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Load a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}
