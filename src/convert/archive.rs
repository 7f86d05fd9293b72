//! Packaging category groups into a zip archive.

use super::grouper::CategoryGroup;
use super::vcard;
use crate::error::ConversionResult;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// One file inside the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub filename: String,
    pub content: Vec<u8>,
}

/// File name for a category: `contacts_<category>.vcf`.
///
/// Path separators are replaced with `_` so a category can never escape the
/// archive root.
pub fn entry_name(category: &str) -> String {
    let safe: String = category
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("contacts_{}.vcf", safe)
}

/// Serialize every non-empty group into an entry.
///
/// When two categories map to the same file name, later ones get a ` (n)`
/// suffix so names stay unique.
pub fn build_entries(groups: &[CategoryGroup]) -> Vec<ArchiveEntry> {
    let mut used = HashSet::new();
    let mut entries = Vec::with_capacity(groups.len());

    for group in groups {
        if group.is_empty() {
            tracing::debug!(category = %group.category(), "Skipping empty category group");
            continue;
        }

        let body = vcard::render_cards(group.records());
        if body.is_empty() {
            continue;
        }

        let filename = unique_name(entry_name(group.category()), &mut used);
        entries.push(ArchiveEntry {
            filename,
            content: body.into_bytes(),
        });
    }

    entries
}

fn unique_name(candidate: String, used: &mut HashSet<String>) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }

    let stem = candidate.strip_suffix(".vcf").unwrap_or(&candidate);
    let mut n = 2;
    loop {
        let name = format!("{} ({}).vcf", stem, n);
        if used.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}

/// Write entries into an in-memory zip archive.
///
/// Entries are deflated and stamped with a fixed modification time, so the
/// same entries always produce the same bytes.
pub fn write_archive(entries: &[ArchiveEntry]) -> ConversionResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        writer.start_file(entry.filename.as_str(), options)?;
        writer.write_all(&entry.content)?;
    }

    Ok(writer.finish()?.into_inner())
}
