//! Batch re-extraction of stored email content

use crate::error::Result;
use crate::extractor::Extractor;
use crate::store::RecordStore;
use crate::types::is_sentinel;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// How a repair run behaves
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepairOptions {
    /// Compute the report without writing anything back
    pub dry_run: bool,

    /// Only look at the newest `limit` email records
    pub limit: Option<usize>,
}

/// Counts from a repair run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepairReport {
    pub dry_run: bool,

    /// Email records read
    pub scanned: usize,

    /// Records whose content changed (written unless `dry_run`)
    pub updated: usize,

    /// Records already holding their extracted form
    pub unchanged: usize,

    /// Records whose extraction came back empty; also counted in
    /// `updated` or `unchanged`
    pub degraded: usize,

    /// Records skipped because they already hold the sentinel or are not
    /// emails
    pub skipped: usize,
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanned {} email records: {} updated, {} unchanged, {} degraded, {} skipped",
            self.scanned, self.updated, self.unchanged, self.degraded, self.skipped
        )?;
        if self.dry_run {
            write!(f, " (dry run)")?;
        }
        Ok(())
    }
}

/// Re-run extraction over stored email records and write back changed
/// content.
///
/// A failed write aborts the run; records already written stay written.
pub fn repair_email_contents<S>(
    store: &mut S,
    extractor: &Extractor,
    options: &RepairOptions,
) -> Result<RepairReport>
where
    S: RecordStore + ?Sized,
{
    let records = store.email_records(options.limit)?;
    let mut report = RepairReport {
        dry_run: options.dry_run,
        ..RepairReport::default()
    };

    for record in records {
        report.scanned += 1;

        if !record.is_email() || record.has_sentinel_content() {
            report.skipped += 1;
            continue;
        }

        let extracted = extractor.extract_content(record.content.as_deref());
        if is_sentinel(&extracted) {
            report.degraded += 1;
        }

        if record.content.as_deref() == Some(extracted.as_str()) {
            report.unchanged += 1;
            continue;
        }

        if !options.dry_run {
            store.update_content(&record.id, &extracted)?;
        }
        debug!(
            "Record {}: {} -> {} chars",
            record.id,
            record.content.as_deref().map_or(0, str::len),
            extracted.len()
        );
        report.updated += 1;
    }

    info!("{report}");
    Ok(report)
}
