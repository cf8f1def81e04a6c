// src/core/vocabulary.rs
use crate::core::geometry::{normalize_and_resample, resample};
use crate::core::layout::ResolvedLayout;
use crate::core::phonetic::{consonant_of, consonant_sequence, vowel_of, vowel_sequence};
use crate::core::phonetic::{Consonant, Vowel};
use crate::core::types::{Point, TraceId};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;

/// A dictionary line after parsing, before any geometry is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub kana: String,
    pub word: String,
    pub frequency: f64,
}

impl RawEntry {
    pub fn new(kana: impl Into<String>, word: impl Into<String>, frequency: f64) -> Self {
        Self {
            kana: kana.into(),
            word: word.into(),
            frequency,
        }
    }

    /// Frequencies act as a prior, so they must be finite and not negative.
    pub fn has_valid_frequency(&self) -> bool {
        self.frequency.is_finite() && self.frequency >= 0.0
    }
}

/// How a spelling is turned into the polyline a user is expected to draw.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    /// One point per kana, on its row key.
    #[default]
    Consonant,
    /// Like `Consonant`, plus a flick point per kana displaced towards its
    /// column: い left, う up, え right, お down, あ none.
    VowelOffset { offset: f64 },
}

/// Everything an ideal trace depends on besides the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceParams {
    pub sample_count: usize,
    pub bounding_box_side: f64,
    pub mode: TraceMode,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            sample_count: 20,
            bounding_box_side: 1.0,
            mode: TraceMode::Consonant,
        }
    }
}

/// One dictionary word with its precomputed ideal traces.
/// Built once at load time and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    kana: String,
    word: String,
    frequency: f64,
    consonants: Vec<Consonant>,
    vowels: Vec<Vowel>,
    trace: Vec<Point>,
    normalized_trace: Vec<Point>,
    trace_id: TraceId,
}

impl VocabularyEntry {
    pub fn new(raw: RawEntry, layout: &ResolvedLayout, params: &TraceParams) -> Self {
        let consonants = consonant_sequence(&raw.kana);
        let vowels = vowel_sequence(&raw.kana);

        let key_points = key_points(&raw.kana, layout, params.mode);
        let trace = resample(&key_points, params.sample_count);
        let normalized_trace =
            normalize_and_resample(&key_points, params.sample_count, params.bounding_box_side);
        let trace_id = trace_identity(&trace);

        Self {
            kana: raw.kana,
            word: raw.word,
            frequency: raw.frequency,
            consonants,
            vowels,
            trace,
            normalized_trace,
            trace_id,
        }
    }

    pub fn kana(&self) -> &str {
        &self.kana
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn consonants(&self) -> &[Consonant] {
        &self.consonants
    }

    pub fn vowels(&self) -> &[Vowel] {
        &self.vowels
    }

    /// Ideal trace in absolute keyboard coordinates.
    pub fn trace(&self) -> &[Point] {
        &self.trace
    }

    /// Ideal trace in shape space.
    pub fn normalized_trace(&self) -> &[Point] {
        &self.normalized_trace
    }

    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// The dictionary line this entry was built from.
    pub fn to_raw(&self) -> RawEntry {
        RawEntry::new(self.kana.as_str(), self.word.as_str(), self.frequency)
    }

    /// Index bucket of this entry. An empty sequence files under (あ, あ).
    pub fn endpoints(&self) -> (Consonant, Consonant) {
        (
            self.consonants.first().copied().unwrap_or(Consonant::A),
            self.consonants.last().copied().unwrap_or(Consonant::A),
        )
    }
}

/// Key coordinates visited while spelling `kana`. Rows without a key on the
/// layout are skipped, so the point count can be lower than the kana count.
fn key_points(kana: &str, layout: &ResolvedLayout, mode: TraceMode) -> Vec<Point> {
    let mut points = Vec::new();
    for c in kana.chars() {
        let Some(base) = consonant_of(c).and_then(|row| layout.position_of(row)) else {
            continue;
        };
        points.push(base);

        if let TraceMode::VowelOffset { offset } = mode {
            let flick = match vowel_of(c) {
                Some(Vowel::I) => Some((-offset, 0.0)),
                Some(Vowel::U) => Some((0.0, -offset)),
                Some(Vowel::E) => Some((offset, 0.0)),
                Some(Vowel::O) => Some((0.0, offset)),
                Some(Vowel::A) | None => None,
            };
            if let Some((dx, dy)) = flick {
                points.push(Point::new(base.x + dx, base.y + dy));
            }
        }
    }
    points
}

/// FNV-1a, fed one coordinate at a time so the digest depends on order.
struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(0xcbf2_9ce4_8422_2325)
    }
}

impl Hasher for Fnv1a {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
}

/// Digest of a vocabulary as the index sees it: entries with an invalid
/// frequency are left out, everything else counts in order.
pub fn vocabulary_digest(entries: &[RawEntry]) -> u64 {
    let mut hasher = Fnv1a::default();
    for entry in entries.iter().filter(|e| e.has_valid_frequency()) {
        hasher.write(entry.kana.as_bytes());
        hasher.write_u8(0xff);
        hasher.write(entry.word.as_bytes());
        hasher.write_u8(0xff);
        hasher.write_u64(entry.frequency.to_bits());
    }
    hasher.finish()
}

/// Identity of a trace. Two traces share it only if they visit the same
/// coordinates in the same order.
pub fn trace_identity(points: &[Point]) -> TraceId {
    let mut hasher = Fnv1a::default();
    hasher.write_usize(points.len());
    for p in points {
        // +0.0 folds -0.0 into 0.0 so equal coordinates hash equally.
        hasher.write_u64((p.x + 0.0).to_bits());
        hasher.write_u64((p.y + 0.0).to_bits());
    }
    TraceId(hasher.finish())
}
