//! Import/export of the demo collection
//!
//! The export document is a pretty-printed JSON array of demos in the
//! app-facing camelCase shape, nested comments included.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::demo::Demo;
use crate::error::Error;
use crate::Result;

/// Serialize the whole collection to a transportable document
pub fn export_json(demos: &[Demo]) -> Result<String> {
    Ok(serde_json::to_string_pretty(demos)?)
}

/// File name for a downloadable export, with the current time embedded
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "demo-tracker-backup-{}.json",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Parse an export document back into demos
///
/// A malformed document fails as a whole, before anything is written.
pub fn parse_import(document: &str) -> Result<Vec<Demo>> {
    serde_json::from_str(document)
        .map_err(|e| Error::Import(format!("invalid export document: {}", e)))
}

/// Outcome of a best-effort import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Demos created in the backing store
    pub imported: usize,
    /// Demos skipped because their insert failed
    pub skipped: usize,
}
