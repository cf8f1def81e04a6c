// File: src/persistence.rs
use crate::core::index::VocabularyIndex;
use crate::core::layout::{ResolvedKey, ResolvedLayout};
use crate::core::vocabulary::{vocabulary_digest, RawEntry, TraceParams};
use crate::error::{GestureError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 2;

/// Everything an index was computed from: the vocabulary and what its
/// ideal traces depend on. A snapshot is only reused when this matches
/// exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    keys: Vec<ResolvedKey>,
    params: TraceParams,
    vocabulary: u64,
}

impl Fingerprint {
    pub fn new(layout: &ResolvedLayout, params: TraceParams, entries: &[RawEntry]) -> Self {
        Self {
            keys: layout.keys().to_vec(),
            params,
            vocabulary: vocabulary_digest(entries),
        }
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    fingerprint: &'a Fingerprint,
    index: &'a VocabularyIndex,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    fingerprint: Fingerprint,
    index: VocabularyIndex,
}

/// Writes `index` next to `path` and atomically moves it into place, so a
/// crash never leaves a half-written snapshot behind.
pub fn save_index(index: &VocabularyIndex, fingerprint: &Fingerprint, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        fingerprint,
        index,
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;

    log::info!("Saved index snapshot with {} entries to {}", index.len(), path.display());
    Ok(())
}

/// Reads a snapshot written by `save_index`, refusing one built from a
/// different vocabulary, layout or trace setup. Buckets are rebuilt from the
/// stored entries, so they cannot point outside them.
pub fn load_index(path: &Path, expected: &Fingerprint) -> Result<VocabularyIndex> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(GestureError::StaleSnapshot(format!(
            "version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }
    if snapshot.fingerprint != *expected {
        return Err(GestureError::StaleSnapshot(
            "built from a different vocabulary, layout or trace setup".to_string(),
        ));
    }

    log::info!(
        "Loaded index snapshot with {} entries from {}",
        snapshot.index.len(),
        path.display()
    );
    Ok(snapshot.index)
}
