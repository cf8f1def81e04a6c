use crate::config::EngineConfig;
use crate::core::geometry::{normalize_and_resample, path_length, resample};
use crate::core::index::{IndexBuilder, SharedIndex, VocabularyIndex};
use crate::core::layout::{KeyboardLayout, ResolvedLayout};
use crate::core::scoring::{
    adjusted_sigma, joint_score, location_distance, normalize_scores, shape_distance,
    ChannelDistances,
};
use crate::core::types::{CandidateResult, Gesture, Point, Size, TraceId};
use crate::core::vocabulary::{RawEntry, VocabularyEntry};
use crate::error::Result;
use crate::persistence::{load_index, save_index, Fingerprint};
use crate::source::read_vocabulary;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// The engine owns the layout, the tuning and the published index. Queries
// only ever read a snapshot of the index.
pub struct GestureEngine {
    config: EngineConfig,
    layout: KeyboardLayout,
    resolved: ResolvedLayout,
    index: SharedIndex,
}

impl GestureEngine {
    /// An engine with an empty vocabulary.
    pub fn new(config: EngineConfig, layout: KeyboardLayout, surface: Size) -> Result<Self> {
        config.validate()?;
        let resolved = layout.resolve(surface);
        Ok(Self {
            config,
            layout,
            resolved,
            index: SharedIndex::default(),
        })
    }

    /// Reads `vocabulary_path` and loads the index from `snapshot_path` when
    /// the snapshot was built from the same vocabulary, layout and config.
    /// Otherwise builds the index from the vocabulary and refreshes the
    /// snapshot. An empty rebuild never replaces an existing snapshot.
    pub fn from_snapshot_or_vocabulary(
        config: EngineConfig,
        layout: KeyboardLayout,
        surface: Size,
        snapshot_path: &Path,
        vocabulary_path: &Path,
    ) -> Result<Self> {
        let mut engine = Self::new(config, layout, surface)?;
        let raw_entries = read_vocabulary(vocabulary_path);
        let expected = Fingerprint::new(&engine.resolved, engine.config.trace_params(), &raw_entries);

        match load_index(snapshot_path, &expected) {
            Ok(index) => engine.install_index(index),
            Err(e) => {
                log::warn!("Index snapshot unusable ({e}), rebuilding from vocabulary");
                engine.load_entries(raw_entries, |_| {});
                if engine.index().is_empty() {
                    log::warn!("Rebuilt index is empty, leaving {} untouched", snapshot_path.display());
                } else if let Err(e) = engine.save_index(snapshot_path) {
                    log::warn!("Failed to save index snapshot: {e}");
                }
            }
        }
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn resolved_layout(&self) -> &ResolvedLayout {
        &self.resolved
    }

    /// The index queries currently run against.
    pub fn index(&self) -> Arc<VocabularyIndex> {
        self.index.snapshot()
    }

    /// What the current index depends on.
    pub fn fingerprint(&self) -> Fingerprint {
        let raw_entries: Vec<RawEntry> = self
            .index()
            .entries()
            .iter()
            .map(VocabularyEntry::to_raw)
            .collect();
        Fingerprint::new(&self.resolved, self.config.trace_params(), &raw_entries)
    }

    /// Builds an index from `raw_entries` and publishes it once complete.
    pub fn load_entries<F>(&mut self, raw_entries: Vec<RawEntry>, progress: F)
    where
        F: FnMut(f64),
    {
        let index = IndexBuilder::new(&self.resolved, self.config.trace_params())
            .build_with_progress(raw_entries, progress);
        self.index.publish(index);
    }

    /// Publishes an index built elsewhere, e.g. by `spawn_build` or read from
    /// a snapshot. It must have been built against `resolved_layout()`.
    pub fn install_index(&self, index: VocabularyIndex) {
        self.index.publish(index);
    }

    /// Re-resolves the layout for a new surface size and rebuilds the index,
    /// since ideal traces live in absolute coordinates.
    pub fn resize(&mut self, surface: Size) {
        if surface == self.resolved.surface() {
            return;
        }
        log::info!("Resizing keyboard to {}x{}", surface.width, surface.height);
        self.resolved = self.layout.resolve(surface);
        let raw_entries: Vec<RawEntry> = self
            .index()
            .entries()
            .iter()
            .map(VocabularyEntry::to_raw)
            .collect();
        self.load_entries(raw_entries, |_| {});
    }

    pub fn save_index(&self, path: &Path) -> Result<()> {
        save_index(&self.index(), &self.fingerprint(), path)
    }

    pub fn recognize(&self, trace: &[Point]) -> Vec<CandidateResult> {
        self.recognize_gesture(&Gesture::new(trace.to_vec()))
    }

    pub fn recognize_gesture(&self, gesture: &Gesture) -> Vec<CandidateResult> {
        recognize_with(&self.index(), &self.resolved, &self.config, gesture)
    }
}

/// Recognizes `gesture` against an explicit index snapshot.
///
/// Narrows the vocabulary by the trace endpoints, scores every candidate on
/// both channels, fuses the scores with the frequency prior and ranks the
/// result. Never fails; degenerate input yields an empty list.
pub fn recognize_with(
    index: &VocabularyIndex,
    layout: &ResolvedLayout,
    config: &EngineConfig,
    gesture: &Gesture,
) -> Vec<CandidateResult> {
    let points = &gesture.points;
    if points.is_empty() {
        return vec![];
    }

    let resampled = resample(points, config.sample_count);
    let normalized = normalize_and_resample(points, config.sample_count, config.bounding_box_side);
    let candidates = index.candidates(points, layout, config.end_radius);

    // Entries sharing an ideal path share one location computation.
    let mut location_cache: HashMap<TraceId, Option<f64>> = HashMap::new();
    let mut scored: Vec<(&VocabularyEntry, f64)> = Vec::with_capacity(candidates.len());

    for &entry in &candidates {
        let Some(shape) = shape_distance(&normalized, entry.normalized_trace()) else {
            continue;
        };
        let location = *location_cache
            .entry(entry.trace_id())
            .or_insert_with(|| location_distance(&resampled, entry.trace(), config.tunnel_radius));
        let Some(location) = location else {
            continue;
        };

        let distances = ChannelDistances {
            shape,
            location,
            frequency: entry.frequency(),
        };
        let sigma_location = location_sigma(config, gesture.duration, entry);
        scored.push((entry, joint_score(&distances, config.sigma_shape, sigma_location)));
    }

    let joint: Vec<f64> = scored.iter().map(|&(_, score)| score).collect();
    let confidences = normalize_scores(&joint);

    let results = scored
        .iter()
        .zip(confidences)
        .map(|(&(entry, _), confidence)| CandidateResult {
            text: entry.word().to_string(),
            confidence,
        })
        .collect();

    let ranked = rank(results, config.min_confidence);
    log::debug!(
        "Scored {} of {} candidates, {} above threshold",
        scored.len(),
        candidates.len(),
        ranked.len()
    );
    ranked
}

fn location_sigma(config: &EngineConfig, duration: Option<f64>, entry: &VocabularyEntry) -> f64 {
    match (config.speed, duration) {
        (Some(speed), Some(actual_time)) => {
            let ideal_time = path_length(entry.trace()) / speed.nominal_speed;
            adjusted_sigma(ideal_time, actual_time, config.sigma_location, speed.gamma)
        }
        _ => config.sigma_location,
    }
}

/// Drops results at or below `min_confidence` and sorts the rest by
/// confidence, highest first. Ties keep their incoming order.
pub fn rank(mut results: Vec<CandidateResult>, min_confidence: f64) -> Vec<CandidateResult> {
    results.retain(|result| result.confidence > min_confidence);
    results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    results
}
