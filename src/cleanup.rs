//! Final passes: residual MIME artifacts and whitespace

use regex::Regex;
use std::sync::LazyLock;

static MIME_HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*Content-(?:Type|Transfer-Encoding|Disposition):").unwrap()
});

static BOUNDARY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*--[0-9A-Za-z'()+_,./:=?-]+\s*$").unwrap());

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\x0B\x0C\x{A0}]+").unwrap());

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Drop MIME header lines, boundary markers and quoted lines that survived
/// truncation
#[must_use]
pub fn strip_artifacts(text: &str) -> String {
    text.lines()
        .filter(|line| {
            !MIME_HEADER_LINE.is_match(line)
                && !is_boundary_line(line)
                && !line.trim_start().starts_with('>')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single spaces within lines, trimmed lines, at most one blank line in a
/// row, trimmed overall
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = unified
        .split('\n')
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .collect();

    EXCESS_NEWLINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

/// `--token` or `--token--`; a line of dashes only is a divider, not a boundary
fn is_boundary_line(line: &str) -> bool {
    BOUNDARY_LINE.is_match(line) && !line.trim().chars().all(|c| c == '-')
}
