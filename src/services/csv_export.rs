//! CSV backup of the in-memory directory.
//!
//! Output is UTF-8 with a leading byte-order mark so spreadsheet tools pick
//! the right encoding for Thai text. The header row is bare; every data
//! field is double-quoted with embedded quotes doubled.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::types::directory::PhoneEntry;
use crate::types::errors::ExportError;

pub const CSV_HEADERS: [&str; 5] = ["id", "building", "department", "number", "created_at"];

const BOM: &str = "\u{FEFF}";

/// Renders `entries` as a CSV document.
///
/// Rows without `created_at` carry `exported_at` instead.
pub fn render_csv(entries: &[PhoneEntry], exported_at: DateTime<Utc>) -> Result<Vec<u8>, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::Empty);
    }

    let fallback_time = exported_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut out = Vec::new();
    out.extend_from_slice(BOM.as_bytes());
    out.extend_from_slice(CSV_HEADERS.join(",").as_bytes());
    out.push(b'\n');

    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut out);

        for entry in entries {
            let created_at = entry.created_at.as_deref().unwrap_or(&fallback_time);
            writer.write_record([
                entry.id.as_str(),
                entry.building.as_str(),
                entry.department.as_str(),
                entry.number.as_str(),
                created_at,
            ])?;
        }
        writer.flush()?;
    }

    // Drop the terminator after the last row
    if out.last() == Some(&b'\n') {
        out.pop();
    }
    Ok(out)
}

/// `phonebook_backup_<YYYY-MM-DD>.csv`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("phonebook_backup_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes a dated backup of `entries` into `dir` and returns its path.
pub fn export_to_dir(
    entries: &[PhoneEntry],
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let content = render_csv(entries, now)?;
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(backup_file_name(now.date_naive()));
    fs::write(&path, content)?;
    Ok(path)
}
