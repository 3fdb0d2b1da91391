//! Extraction from complete RFC 5322 messages

use crate::extractor::Extractor;
use crate::types::Extraction;
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};
use tracing::debug;

/// Headers that show the bytes really are a message and not a bare body
const MESSAGE_HEADERS: &[&str] = &[
    "From",
    "To",
    "Subject",
    "Date",
    "Message-ID",
    "MIME-Version",
    "Content-Type",
];

impl Extractor {
    /// Parse `raw` as a full message and extract its best text part.
    ///
    /// `text/plain` wins over `text/html`; attachments are skipped. A
    /// message without any text part is `Empty`. Bytes that do not look
    /// like a message are run through [`Extractor::extract`] as lossy UTF-8.
    #[must_use]
    pub fn extract_message(&self, raw: &[u8]) -> Extraction {
        match mailparse::parse_mail(raw) {
            Ok(parsed) if looks_like_message(&parsed) => {
                return best_body(&parsed).map_or_else(
                    || {
                        debug!("Message has no text part");
                        Extraction::Empty
                    },
                    |body| self.extract(&body),
                );
            }
            Ok(_) => debug!("No message headers, extracting raw bytes"),
            Err(e) => debug!("Not a MIME message ({e}), extracting raw bytes"),
        }

        self.extract(&String::from_utf8_lossy(raw))
    }
}

/// [`Extractor::extract_message`] with the default heuristics
#[must_use]
pub fn extract_message(raw: &[u8]) -> Extraction {
    crate::extractor::default_extractor().extract_message(raw)
}

fn looks_like_message(parsed: &ParsedMail) -> bool {
    MESSAGE_HEADERS
        .iter()
        .any(|name| parsed.headers.get_first_header(name).is_some())
}

fn best_body(parsed: &ParsedMail) -> Option<String> {
    let mut text = None;
    let mut html = None;
    collect_body_parts(parsed, &mut text, &mut html);
    text.or(html)
}

fn collect_body_parts(part: &ParsedMail, text: &mut Option<String>, html: &mut Option<String>) {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            collect_body_parts(sub, text, html);
        }
        return;
    }

    if matches!(
        part.get_content_disposition().disposition,
        DispositionType::Attachment
    ) {
        return;
    }

    let mimetype = part.ctype.mimetype.to_lowercase();
    let slot = if mimetype == "text/plain" {
        text
    } else if mimetype == "text/html" {
        html
    } else {
        return;
    };

    if slot.is_none() {
        match part.get_body() {
            Ok(body) if !body.trim().is_empty() => *slot = Some(body),
            Ok(_) => {}
            Err(e) => debug!("Skipping undecodable {mimetype} part: {e}"),
        }
    }
}
