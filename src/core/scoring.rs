// src/core/scoring.rs
//! Shape and location channels of the SHARK2 classifier and their fusion
//! with the frequency prior.

use crate::core::geometry::distance;
use crate::core::types::Point;

/// Smallest share of the base location sigma left after speed adjustment.
/// A slow, careful stroke tightens the tunnel, but never below a tenth of
/// its base width.
const MIN_SPEED_FACTOR: f64 = 0.1;

/// Mean squared point-to-point distance between two normalized traces.
/// `None` when the traces are empty or of different length.
pub fn shape_distance(a: &[Point], b: &[Point]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let sum_sq: f64 = a
        .iter()
        .zip(b)
        .map(|(p, q)| {
            let dx = p.x - q.x;
            let dy = p.y - q.y;
            dx * dx + dy * dy
        })
        .sum();
    Some(sum_sq / a.len() as f64)
}

/// Weight of the i-th of `n` samples in the location channel.
///
/// Zero at 20% of the path, 0.4 at the first sample, 1.6 at the last one.
/// NOTE: the slope is not symmetric around the middle, so the end of a
/// gesture counts four times as much as its start. Kept as-is pending a
/// product decision.
pub fn location_weight(i: usize, n: usize) -> f64 {
    let position = if n > 1 {
        i as f64 / (n - 1) as f64
    } else {
        0.0
    };
    (position - 0.2).abs() * 2.0
}

/// Tunnel score of `input` (resampled, absolute coordinates) against an
/// ideal trace. Samples closer than `radius` to the ideal trace cost
/// nothing; the rest cost their distance, weighted by `location_weight`.
/// `None` when either trace is empty.
pub fn location_distance(input: &[Point], ideal: &[Point], radius: f64) -> Option<f64> {
    if input.is_empty() || ideal.is_empty() {
        return None;
    }
    let n = input.len();
    let score = input
        .iter()
        .enumerate()
        .map(|(i, &u)| {
            let nearest = ideal
                .iter()
                .map(|&t| distance(u, t))
                .fold(f64::INFINITY, f64::min);
            let penalty = if nearest <= radius { 0.0 } else { nearest };
            location_weight(i, n) * penalty
        })
        .sum();
    Some(score)
}

/// Zero-mean normal density.
pub fn gaussian_pdf(x: f64, sigma: f64) -> f64 {
    let coeff = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * sigma);
    coeff * (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Location sigma widened or narrowed by gesture speed: a stroke drawn
/// faster than the ideal time is allowed to stray further from the keys.
/// The factor is floored at `MIN_SPEED_FACTOR`, which also covers
/// candidates with a zero-length ideal path.
pub fn adjusted_sigma(ideal_time: f64, actual_time: f64, base_sigma: f64, gamma: f64) -> f64 {
    if actual_time <= 0.0 {
        return base_sigma;
    }
    let ratio = (ideal_time / actual_time).max(0.01);
    let factor = 1.0 + gamma * ratio.log2();
    base_sigma * factor.max(MIN_SPEED_FACTOR)
}

/// Channel distances of one candidate, ready for fusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelDistances {
    pub shape: f64,
    pub location: f64,
    pub frequency: f64,
}

/// Unnormalized joint likelihood: shape likelihood × location likelihood ×
/// frequency prior.
pub fn joint_score(d: &ChannelDistances, sigma_shape: f64, sigma_location: f64) -> f64 {
    gaussian_pdf(d.shape, sigma_shape) * gaussian_pdf(d.location, sigma_location) * d.frequency
}

/// Scales joint scores into a distribution over the same candidates.
/// An empty vector comes back when the total is zero or not finite.
pub fn normalize_scores(joint: &[f64]) -> Vec<f64> {
    let total: f64 = joint.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Vec::new();
    }
    joint.iter().map(|score| score / total).collect()
}

/// Fuses both channels and the prior for every candidate and normalizes the
/// result. Output is index-aligned with `distances`, or empty.
pub fn integrate_channels(
    distances: &[ChannelDistances],
    sigma_shape: f64,
    sigma_location: f64,
) -> Vec<f64> {
    let joint: Vec<f64> = distances
        .iter()
        .map(|d| joint_score(d, sigma_shape, sigma_location))
        .collect();
    normalize_scores(&joint)
}
