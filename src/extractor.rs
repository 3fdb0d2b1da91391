//! The extraction pipeline
//!
//! Stage order matters: payloads are decoded before any structural parsing
//! (a reply header cannot be found inside still-encoded text), and markup is
//! removed before the line-based heuristics run.

use crate::cleanup::{normalize_whitespace, strip_artifacts};
use crate::config::{BASE64_BLOCK_PATTERN, ExtractorConfig, NO_CONTENT_SENTINEL};
use crate::decode::{
    best_effort, decode_entities, decode_quoted_printable, strip_html, unwrap_base64_block,
};
use crate::error::{Error, Result};
use crate::rules::RuleTable;
use crate::types::Extraction;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_BASE64_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BASE64_BLOCK_PATTERN).unwrap());

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(Extractor::default);

/// Reduces a raw email body to the newest message's plain text
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    base64_block: Regex,
    rules: RuleTable,
}

impl Default for Extractor {
    fn default() -> Self {
        let config = ExtractorConfig::default();
        Self {
            rules: RuleTable::standard(config.signature_tail_threshold),
            base64_block: DEFAULT_BASE64_BLOCK.clone(),
            config,
        }
    }
}

impl Extractor {
    /// Build an extractor with custom heuristics.
    ///
    /// Fails only if `base64_block_pattern` does not compile or has no
    /// capture group for the payload.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let base64_block =
            Regex::new(&config.base64_block_pattern).map_err(|e| Error::InvalidPattern {
                name: "base64_block_pattern".into(),
                details: e.to_string(),
            })?;

        if base64_block.captures_len() < 2 {
            return Err(Error::InvalidPattern {
                name: "base64_block_pattern".into(),
                details: "no capture group for the payload".into(),
            });
        }

        Ok(Self {
            rules: RuleTable::standard(config.signature_tail_threshold),
            base64_block,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Run every stage over `raw`. Never fails; unusable input yields
    /// `Extraction::Empty`.
    #[must_use]
    pub fn extract(&self, raw: &str) -> Extraction {
        let text = best_effort("base64", raw, |input| {
            unwrap_base64_block(&self.base64_block, input)
        });
        let text = strip_html(&text);
        let text = decode_entities(&text);
        let text = decode_quoted_printable(&text);
        let text = self.rules.truncate(&text);
        let text = strip_artifacts(&text);
        let text = normalize_whitespace(&text);

        debug!(
            "Extracted {} chars from {} byte body",
            text.chars().count(),
            raw.len()
        );

        if text.chars().count() < self.config.min_content_chars {
            Extraction::Empty
        } else {
            Extraction::Extracted(text)
        }
    }

    /// Boundary form of [`Extractor::extract`]: missing content and empty
    /// results both become the sentinel string
    #[must_use]
    pub fn extract_content(&self, raw: Option<&str>) -> String {
        raw.map_or_else(
            || NO_CONTENT_SENTINEL.to_string(),
            |raw| self.extract(raw).into_content(),
        )
    }
}

pub(crate) fn default_extractor() -> &'static Extractor {
    &DEFAULT_EXTRACTOR
}

/// Extract with the default heuristics; `None` yields the sentinel
#[must_use]
pub fn extract(raw: Option<&str>) -> String {
    DEFAULT_EXTRACTOR.extract_content(raw)
}

/// Extract from a JSON column value. Anything but a string yields the
/// sentinel.
#[must_use]
pub fn extract_value(value: &serde_json::Value) -> String {
    extract(value.as_str())
}
