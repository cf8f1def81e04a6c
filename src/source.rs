// File: src/source.rs
//! Reader for `kana,frequency[,word]` vocabulary files.

use crate::core::vocabulary::RawEntry;
use std::fs;
use std::path::Path;

/// Parses one source line. Returns `None` for blank lines, lines without a
/// frequency field, and frequencies that are not finite non-negative
/// numbers. A missing or empty word falls back to the kana.
pub fn parse_line(line: &str) -> Option<RawEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = line.split(',').map(str::trim);
    let kana = fields.next().filter(|kana| !kana.is_empty())?;
    let frequency: f64 = fields.next()?.parse().ok()?;
    let word = fields.next().filter(|word| !word.is_empty()).unwrap_or(kana);

    Some(RawEntry::new(kana, word, frequency)).filter(RawEntry::has_valid_frequency)
}

/// Parses a whole source text, skipping lines that do not parse.
pub fn parse_vocabulary(content: &str) -> Vec<RawEntry> {
    let mut skipped = 0usize;
    let entries: Vec<RawEntry> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let entry = parse_line(line);
            if entry.is_none() {
                skipped += 1;
                log::debug!("Skipping malformed vocabulary line: {line:?}");
            }
            entry
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed vocabulary lines");
    }
    entries
}

/// Reads a vocabulary file. A missing or unreadable file yields no entries;
/// the engine then simply recognizes nothing.
pub fn read_vocabulary(path: &Path) -> Vec<RawEntry> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let entries = parse_vocabulary(&content);
            log::info!("Read {} vocabulary entries from {}", entries.len(), path.display());
            entries
        }
        Err(e) => {
            log::warn!("Failed to read vocabulary file {}: {e}", path.display());
            Vec::new()
        }
    }
}
