//! Message record storage

use crate::error::{Error, Result};
use crate::types::MessageRecord;
use chrono::Utc;
use std::collections::HashMap;

/// Where message records are read from and written back to.
///
/// Only single-record reads and writes are assumed; there is no
/// transaction or ordering guarantee across records.
pub trait RecordStore {
    /// Email records, newest first, at most `limit` of them
    fn email_records(&self, limit: Option<usize>) -> Result<Vec<MessageRecord>>;

    /// Replace the content of the record with `id`
    fn update_content(&mut self, id: &str, content: &str) -> Result<()>;
}

/// Record store held in memory, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, MessageRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows as exported from the messages table (a JSON array)
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<MessageRecord> =
            serde_json::from_str(json).map_err(|e| Error::Store(e.to_string()))?;
        Ok(records.into_iter().collect())
    }

    /// Add or replace a record, returning the one it replaced
    pub fn insert(&mut self, record: MessageRecord) -> Option<MessageRecord> {
        self.records.insert(record.id.clone(), record)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MessageRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<MessageRecord> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = MessageRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }
}

impl RecordStore for MemoryStore {
    fn email_records(&self, limit: Option<usize>) -> Result<Vec<MessageRecord>> {
        let mut emails: Vec<MessageRecord> = self
            .records
            .values()
            .filter(|r| r.is_email())
            .cloned()
            .collect();

        emails.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        emails.truncate(limit.unwrap_or(usize::MAX));

        Ok(emails)
    }

    fn update_content(&mut self, id: &str, content: &str) -> Result<()> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

        record.content = Some(content.to_string());
        record.updated_at = Some(Utc::now());
        Ok(())
    }
}
