//! Decoding stages: base64 unwrap, HTML stripping, entities, quoted-printable

use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::warn;

/// Standard alphabet, tolerant of missing or extra padding
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

static BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\b[^>]*>|</(?:p|div)\s*>").unwrap());

// Tags open with a letter, '/', '!' or '?' so a bare "<" in prose is left alone.
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^<>]*>").unwrap());

static QP_SOFT_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\r?\n").unwrap());

static QP_ESCAPE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:=[0-9A-F]{2})+").unwrap());

/// Named entities, `&amp;` last so "&amp;lt;" stays "&lt;"
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// UTF-8 punctuation that was decoded as Latin-1/CP-1252 once too often.
/// Longest sequences first; the bare "â€" is a right double quote whose
/// last byte was lost.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€™", "'"),
    ("â€˜", "'"),
    ("â€œ", "\""),
    ("â€\u{9d}", "\""),
    ("â€“", "-"),
    ("â€”", "-"),
    ("â€¦", "..."),
    ("â€", "\""),
    ("Â\u{a0}", " "),
];

/// Run an optional decode stage, keeping the input when it has nothing to
/// do (`Ok(None)`) or fails (`Err`, logged).
pub fn best_effort<F>(stage: &str, input: &str, attempt: F) -> String
where
    F: FnOnce(&str) -> Result<Option<String>>,
{
    match attempt(input) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => input.to_string(),
        Err(e) => {
            warn!("Skipping {stage} stage: {e}");
            input.to_string()
        }
    }
}

/// Decode the first base64 MIME block matched by `pattern`.
///
/// Returns `Ok(None)` when no block is present. The decoded payload must be
/// UTF-8 text; binary attachments are reported as a decode error.
pub fn unwrap_base64_block(pattern: &Regex, input: &str) -> Result<Option<String>> {
    let Some(payload) = pattern.captures(input).and_then(|caps| caps.get(1)) else {
        return Ok(None);
    };

    let compact: String = payload
        .as_str()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| Error::Decode(format!("base64: {e}")))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| Error::Decode(format!("base64 payload is not UTF-8: {e}")))?;

    if text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(Error::Decode("base64 payload is not text".into()));
    }

    Ok(Some(text))
}

/// Remove markup, keeping line structure from `<br>`, `</p>` and `</div>`
#[must_use]
pub fn strip_html(input: &str) -> String {
    let text = STYLE_BLOCK.replace_all(input, "");
    let text = SCRIPT_BLOCK.replace_all(&text, "");
    let text = BLOCK_BREAK.replace_all(&text, "\n");
    ANY_TAG.replace_all(&text, " ").into_owned()
}

/// Decode common named entities and repair double-decoded punctuation
#[must_use]
pub fn decode_entities(input: &str) -> String {
    let mut text = input.to_string();
    for &(from, to) in MOJIBAKE.iter().chain(ENTITIES) {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }
    text
}

/// Decode `=XY` escapes and drop soft line breaks.
///
/// Each run of escapes is read as UTF-8; a run that is not valid UTF-8 is
/// read one byte per Latin-1 char instead.
#[must_use]
pub fn decode_quoted_printable(input: &str) -> String {
    best_effort("quoted-printable", input, try_decode_quoted_printable)
}

#[allow(clippy::unnecessary_wraps)]
fn try_decode_quoted_printable(input: &str) -> Result<Option<String>> {
    if !input.contains('=') {
        return Ok(None);
    }

    let joined = QP_SOFT_BREAK.replace_all(input, "");
    let decoded =
        QP_ESCAPE_RUN.replace_all(&joined, |caps: &Captures| decode_escape_run(&caps[0]));

    Ok(Some(decoded.into_owned()))
}

fn decode_escape_run(run: &str) -> String {
    let bytes: Vec<u8> = run
        .as_bytes()
        .chunks(3)
        .filter_map(|chunk| match chunk {
            [b'=', hi, lo] => Some((hex_value(*hi)? << 4) | hex_value(*lo)?),
            _ => None,
        })
        .collect();

    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect())
}

const fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
