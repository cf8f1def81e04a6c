// --- File: src/core/index.rs
use crate::core::layout::ResolvedLayout;
use crate::core::phonetic::Consonant;
use crate::core::types::Point;
use crate::core::vocabulary::{RawEntry, TraceParams, VocabularyEntry};
use crate::error::Result;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

/// Progress is reported once per this many raw entries.
pub const PROGRESS_STRIDE: usize = 100;

/// First and last row of a spelling; the bucket key of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsonantPair {
    pub start: Consonant,
    pub end: Consonant,
}

impl ConsonantPair {
    pub fn new(start: Consonant, end: Consonant) -> Self {
        Self { start, end }
    }
}

/// Read-only vocabulary grouped by endpoint rows.
/// Buckets hold positions into `entries`, so every indexed entry is part of
/// the full set by construction. Only the entries are serialized; buckets
/// are always rebuilt from them on load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<VocabularyEntry>")]
pub struct VocabularyIndex {
    entries: Vec<VocabularyEntry>,
    buckets: HashMap<ConsonantPair, Vec<usize>>,
}

impl VocabularyIndex {
    /// Groups `entries` by their endpoint rows, keeping load order inside
    /// each bucket.
    pub fn from_entries(entries: Vec<VocabularyEntry>) -> Self {
        let mut buckets: HashMap<ConsonantPair, Vec<usize>> = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            let (start, end) = entry.endpoints();
            buckets
                .entry(ConsonantPair::new(start, end))
                .or_default()
                .push(position);
        }
        Self { entries, buckets }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries filed under `pair`, in load order.
    pub fn bucket(&self, pair: ConsonantPair) -> impl Iterator<Item = &VocabularyEntry> + '_ {
        self.buckets
            .get(&pair)
            .into_iter()
            .flatten()
            .map(move |&position| &self.entries[position])
    }

    /// Entries that can plausibly produce `trace`: they must start on the row
    /// of the key nearest the first point and end on a row whose key lies
    /// within `end_radius` of the last point.
    pub fn candidates(
        &self,
        trace: &[Point],
        layout: &ResolvedLayout,
        end_radius: f64,
    ) -> Vec<&VocabularyEntry> {
        let (Some(&first), Some(&last)) = (trace.first(), trace.last()) else {
            return Vec::new();
        };

        let start = layout.nearest_consonant(first);
        let ends = layout.consonants_within(last, end_radius);
        log::debug!("Narrowing on start {start} and ends {ends:?}");

        ends.into_iter()
            .flat_map(|end| self.bucket(ConsonantPair::new(start, end)))
            .collect()
    }
}

impl From<Vec<VocabularyEntry>> for VocabularyIndex {
    fn from(entries: Vec<VocabularyEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl Serialize for VocabularyIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Builds a fresh index from parsed dictionary lines against one resolved
/// layout.
pub struct IndexBuilder<'a> {
    layout: &'a ResolvedLayout,
    params: TraceParams,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(layout: &'a ResolvedLayout, params: TraceParams) -> Self {
        Self { layout, params }
    }

    pub fn build(&self, raw_entries: Vec<RawEntry>) -> VocabularyIndex {
        self.build_with_progress(raw_entries, |_| {})
    }

    /// Builds the index, calling `progress` with a non-decreasing fraction in
    /// [0, 1] every `PROGRESS_STRIDE` entries and with 1.0 at the end.
    pub fn build_with_progress<F>(&self, raw_entries: Vec<RawEntry>, mut progress: F) -> VocabularyIndex
    where
        F: FnMut(f64),
    {
        let total = raw_entries.len();
        let mut entries = Vec::with_capacity(total);

        for (i, raw) in raw_entries.into_iter().enumerate() {
            if i % PROGRESS_STRIDE == 0 {
                progress(i as f64 / total as f64);
            }
            if !raw.has_valid_frequency() {
                log::warn!(
                    "Skipping {:?} with invalid frequency {}",
                    raw.kana,
                    raw.frequency
                );
                continue;
            }
            entries.push(VocabularyEntry::new(raw, self.layout, &self.params));
        }
        progress(1.0);

        let index = VocabularyIndex::from_entries(entries);
        log::info!(
            "Built vocabulary index: {} entries in {} buckets",
            index.len(),
            index.bucket_count()
        );
        index
    }
}

/// Messages from a background build.
#[derive(Debug)]
pub enum BuildEvent {
    Progress(f64),
    Finished(VocabularyIndex),
}

/// Runs a build on its own thread. The index only ever crosses the channel
/// whole, as the final `Finished` event. Dropping the receiver abandons the
/// result; the thread still runs to completion.
pub fn spawn_build(
    layout: ResolvedLayout,
    params: TraceParams,
    raw_entries: Vec<RawEntry>,
) -> Result<Receiver<BuildEvent>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("vocabulary-build".to_string())
        .spawn(move || {
            let builder = IndexBuilder::new(&layout, params);
            let index = builder.build_with_progress(raw_entries, |fraction| {
                let _ = tx.send(BuildEvent::Progress(fraction));
            });
            if tx.send(BuildEvent::Finished(index)).is_err() {
                log::debug!("Vocabulary build finished after its receiver was dropped");
            }
        })?;
    Ok(rx)
}

/// The index currently served to queries. Publishing swaps the whole
/// snapshot; readers holding an older snapshot keep using it undisturbed.
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<VocabularyIndex>>,
}

impl SharedIndex {
    pub fn new(index: VocabularyIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    pub fn snapshot(&self) -> Arc<VocabularyIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn publish(&self, index: VocabularyIndex) {
        let index = Arc::new(index);
        log::info!("Publishing vocabulary index with {} entries", index.len());
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = index;
    }
}
