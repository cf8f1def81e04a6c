// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A 2D coordinate on the keyboard surface (or in normalized shape space).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Width and height of the surface the keyboard is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Content-derived identity of an ideal trace.
/// Entries that share an ideal path share a `TraceId`, which lets a query
/// reuse one location-distance computation for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(pub u64);

/// A gesture as handed over by the pointer surface.
#[derive(Debug, Clone, Default)]
pub struct Gesture {
    /// Absolute keyboard coordinates, in capture order.
    pub points: Vec<Point>,
    /// Wall-clock duration of the stroke in seconds, when the surface knows it.
    pub duration: Option<f64>,
}

impl Gesture {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, duration: None }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }
}

/// One recognized word and its share of the probability mass for this query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub text: String,
    pub confidence: f64,
}
