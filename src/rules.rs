//! Thread truncation rules
//!
//! A body is scanned top to bottom and cut at the first line where a rule
//! says the newest message has ended. Rules are tried in table order, so
//! structural markers (reply headers, dividers, quotes) take precedence
//! over sign-off heuristics.

use crate::config::SIGNATURE_TAIL_THRESHOLD;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static REPLY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*On\s.+\bwrote:\s*$").unwrap());

static REPLY_HEADER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*On\s").unwrap());

static OUTLOOK_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\*?From:\*?\s*\S").unwrap());

static OUTLOOK_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\*?(?:Sent|Date|To|Cc|Subject):\*?\s").unwrap());

static ORIGINAL_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-{2,}\s*Original Message\s*-{2,}").unwrap());

static UNDERSCORE_DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*_{10,}").unwrap());

static SIGN_OFF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*(?:
            sent\ from\ my\b.*
          | sent\ from\ (?:outlook|mail|yahoo\ mail)\b.*
          | get\ outlook\ for\b.*
          | (?:best\ |kind\ |warm\ |warmest\ )?regards[,.!]?
          | many\ thanks[,.!]?
          | thanks[,.!]?
          | thank\ you[,.!]?
          | cheers[,.!]?
          | best[,!]?
          | sincerely[,.]?
          | --
        )\s*$",
    )
    .unwrap()
});

/// How many following non-blank lines an Outlook `From:` line looks at for
/// the rest of its header block
const OUTLOOK_BLOCK_LOOKAHEAD: usize = 3;

/// How many following non-blank lines a wrapped "On ... wrote:" header may
/// continue onto
const REPLY_HEADER_CONTINUATION: usize = 2;

/// Which marker ended the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// "On <date>, <name> wrote:"
    ReplyHeader,
    /// `From:` followed by `Sent:`/`To:`/`Subject:` lines
    OutlookHeader,
    /// "-----Original Message-----"
    OriginalMessage,
    /// A long run of underscores
    UnderscoreDivider,
    /// A line starting with `>`
    QuoteMarker,
    /// "Regards,", "Sent from my iPhone", ...
    SignOff,
}

/// What a matching rule does to the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Stop here unconditionally
    Cut,
    /// Stop here only if the non-blank text after this line is shorter
    /// than the given number of chars
    CutIfTailShorterThan(usize),
}

type LineMatcher = fn(&str, &[&str]) -> bool;

/// One entry of the truncation table
#[derive(Clone, Copy)]
pub struct ThreadRule {
    pub kind: RuleKind,
    pub action: RuleAction,
    matcher: LineMatcher,
}

impl ThreadRule {
    /// Does `line` (with `following` lines after it) look like this marker?
    #[must_use]
    pub fn matches(&self, line: &str, following: &[&str]) -> bool {
        (self.matcher)(line, following)
    }

    /// Given a match, does the scan stop here?
    #[must_use]
    pub fn stops(&self, following: &[&str]) -> bool {
        match self.action {
            RuleAction::Cut => true,
            RuleAction::CutIfTailShorterThan(limit) => tail_shorter_than(following, limit),
        }
    }
}

impl fmt::Debug for ThreadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadRule")
            .field("kind", &self.kind)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Ordered list of truncation rules
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<ThreadRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard(SIGNATURE_TAIL_THRESHOLD)
    }
}

impl RuleTable {
    /// The built-in table; `signature_tail_threshold` bounds the sign-off rule
    #[must_use]
    pub fn standard(signature_tail_threshold: usize) -> Self {
        Self {
            rules: vec![
                ThreadRule {
                    kind: RuleKind::ReplyHeader,
                    action: RuleAction::Cut,
                    matcher: is_reply_header,
                },
                ThreadRule {
                    kind: RuleKind::OutlookHeader,
                    action: RuleAction::Cut,
                    matcher: is_outlook_header,
                },
                ThreadRule {
                    kind: RuleKind::OriginalMessage,
                    action: RuleAction::Cut,
                    matcher: |line, _| ORIGINAL_MESSAGE.is_match(line),
                },
                ThreadRule {
                    kind: RuleKind::UnderscoreDivider,
                    action: RuleAction::Cut,
                    matcher: |line, _| UNDERSCORE_DIVIDER.is_match(line),
                },
                ThreadRule {
                    kind: RuleKind::QuoteMarker,
                    action: RuleAction::Cut,
                    matcher: |line, _| line.trim_start().starts_with('>'),
                },
                ThreadRule {
                    kind: RuleKind::SignOff,
                    action: RuleAction::CutIfTailShorterThan(signature_tail_threshold),
                    matcher: |line, _| SIGN_OFF.is_match(line),
                },
            ],
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[ThreadRule] {
        &self.rules
    }

    /// The rule that ends the message at `line`, if any.
    ///
    /// Only the first matching rule is consulted; a sign-off followed by a
    /// long tail does not fall through to later rules.
    #[must_use]
    pub fn evaluate(&self, line: &str, following: &[&str]) -> Option<RuleKind> {
        let rule = self.rules.iter().find(|r| r.matches(line, following))?;
        rule.stops(following).then_some(rule.kind)
    }

    /// Keep the lines before the first stopping marker.
    ///
    /// Leading blank lines are dropped; blank lines after the first line of
    /// content are kept.
    #[must_use]
    pub fn truncate(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

        for (i, &line) in lines.iter().enumerate() {
            if kept.is_empty() && line.trim().is_empty() {
                continue;
            }
            if let Some(kind) = self.evaluate(line, &lines[i + 1..]) {
                debug!("Thread cut at line {i}: {kind:?}");
                break;
            }
            kept.push(line);
        }

        kept.join("\n")
    }
}

/// "On ... wrote:" on one line, or wrapped over the next few non-blank lines
fn is_reply_header(line: &str, following: &[&str]) -> bool {
    if REPLY_HEADER.is_match(line) {
        return true;
    }
    if !REPLY_HEADER_START.is_match(line) {
        return false;
    }

    let mut joined = line.trim_end().to_string();
    for next in following
        .iter()
        .filter(|l| !l.trim().is_empty())
        .take(REPLY_HEADER_CONTINUATION)
    {
        joined.push(' ');
        joined.push_str(next.trim());
        if REPLY_HEADER.is_match(&joined) {
            return true;
        }
    }
    false
}

fn is_outlook_header(line: &str, following: &[&str]) -> bool {
    OUTLOOK_FROM.is_match(line)
        && following
            .iter()
            .filter(|l| !l.trim().is_empty())
            .take(OUTLOOK_BLOCK_LOOKAHEAD)
            .any(|l| OUTLOOK_FIELD.is_match(l))
}

/// Whether the non-blank lines after a sign-off, trimmed and joined with
/// `\n`, come to fewer than `limit` chars. Stops counting at `limit`.
fn tail_shorter_than(following: &[&str], limit: usize) -> bool {
    let mut total = 0;
    let lines = following.iter().map(|l| l.trim()).filter(|l| !l.is_empty());

    for (n, line) in lines.enumerate() {
        total += usize::from(n > 0);
        total += line.chars().take(limit.saturating_sub(total)).count();
        if total >= limit {
            return false;
        }
    }

    total < limit
}
