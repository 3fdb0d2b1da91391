// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CRM Email Content Extraction
//!
//! Turns a raw stored email body into the plain text of the newest message
//! in it, for display and duplicate detection in the CRM.
//!
//! # Pipeline
//!
//! 1. Unwrap a base64 MIME block, if there is one
//! 2. Strip HTML, keeping line breaks from block elements
//! 3. Decode HTML entities and double-decoded punctuation
//! 4. Decode quoted-printable escapes
//! 5. Cut the thread at the first reply header, divider, quote or trailing
//!    signature
//! 6. Drop leftover MIME headers, boundaries and quoted lines
//! 7. Normalize whitespace
//! 8. Report near-empty output as [`Extraction::Empty`]
//!
//! Extraction never fails. An empty result is written to records as
//! [`NO_CONTENT_SENTINEL`].
//!
//! # Example
//!
//! ```rust
//! use crm_mail_extract::extract;
//!
//! let raw = "Thanks for booking!\n\nOn Mon, Jan 1, 2024, Jane <jane@x.com> wrote:\n> Can I reschedule?";
//! assert_eq!(extract(Some(raw)), "Thanks for booking!");
//! assert_eq!(extract(None), "No content available");
//! ```

mod cleanup;
mod config;
mod decode;
mod error;
mod extractor;
mod message;
mod repair;
mod rules;
mod store;
mod types;

pub use cleanup::{normalize_whitespace, strip_artifacts};
pub use config::{
    BASE64_BLOCK_PATTERN, ExtractorConfig, MIN_CONTENT_CHARS, NO_CONTENT_SENTINEL,
    SIGNATURE_TAIL_THRESHOLD,
};
pub use decode::{
    best_effort, decode_entities, decode_quoted_printable, strip_html, unwrap_base64_block,
};
pub use error::{Error, Result};
pub use extractor::{Extractor, extract, extract_value};
pub use message::extract_message;
pub use repair::{RepairOptions, RepairReport, repair_email_contents};
pub use rules::{RuleAction, RuleKind, RuleTable, ThreadRule};
pub use store::{MemoryStore, RecordStore};
pub use types::*;
