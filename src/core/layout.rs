// src/core/layout.rs
use crate::core::geometry::distance;
use crate::core::phonetic::Consonant;
use crate::core::types::{Point, Size};
use serde::{Deserialize, Serialize};

/// A key as the caller lays it out: a row and a position in the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyPosition {
    pub consonant: Consonant,
    pub x: f64,
    pub y: f64,
}

impl KeyPosition {
    pub const fn new(consonant: Consonant, x: f64, y: f64) -> Self {
        Self { consonant, x, y }
    }

    /// Position of this key on a surface of the given size.
    pub fn absolute(&self, surface: Size) -> Point {
        Point::new(self.x * surface.width, self.y * surface.height)
    }
}

/// Ordered list of keys in relative coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub keys: Vec<KeyPosition>,
}

impl KeyboardLayout {
    pub fn new(keys: Vec<KeyPosition>) -> Self {
        Self { keys }
    }

    /// Resolves every key against `surface`. The result replaces any earlier
    /// resolution as a whole; nothing is patched in place.
    pub fn resolve(&self, surface: Size) -> ResolvedLayout {
        ResolvedLayout {
            surface,
            keys: self
                .keys
                .iter()
                .map(|key| ResolvedKey {
                    consonant: key.consonant,
                    position: key.absolute(surface),
                })
                .collect(),
        }
    }
}

impl Default for KeyboardLayout {
    /// Three columns by four rows, with わ alone in the bottom row.
    fn default() -> Self {
        use Consonant::*;
        Self::new(vec![
            KeyPosition::new(A, 1.0 / 6.0, 1.0 / 8.0),
            KeyPosition::new(K, 3.0 / 6.0, 1.0 / 8.0),
            KeyPosition::new(S, 5.0 / 6.0, 1.0 / 8.0),
            KeyPosition::new(T, 1.0 / 6.0, 3.0 / 8.0),
            KeyPosition::new(N, 3.0 / 6.0, 3.0 / 8.0),
            KeyPosition::new(H, 5.0 / 6.0, 3.0 / 8.0),
            KeyPosition::new(M, 1.0 / 6.0, 5.0 / 8.0),
            KeyPosition::new(Y, 3.0 / 6.0, 5.0 / 8.0),
            KeyPosition::new(R, 5.0 / 6.0, 5.0 / 8.0),
            KeyPosition::new(W, 3.0 / 6.0, 7.0 / 8.0),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedKey {
    pub consonant: Consonant,
    pub position: Point,
}

/// A layout with absolute key coordinates for one surface size.
/// Read-only once built; a resize produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLayout {
    surface: Size,
    keys: Vec<ResolvedKey>,
}

impl ResolvedLayout {
    pub fn surface(&self) -> Size {
        self.surface
    }

    pub fn keys(&self) -> &[ResolvedKey] {
        &self.keys
    }

    /// Absolute position of the first key carrying `consonant`.
    pub fn position_of(&self, consonant: Consonant) -> Option<Point> {
        self.keys
            .iter()
            .find(|key| key.consonant == consonant)
            .map(|key| key.position)
    }

    /// Row of the key closest to `point`. Ties go to the earlier key; an
    /// empty layout answers あ.
    pub fn nearest_consonant(&self, point: Point) -> Consonant {
        let mut best: Option<(f64, Consonant)> = None;
        for key in &self.keys {
            let d = distance(key.position, point);
            match best {
                Some((best_d, _)) if d >= best_d => {}
                _ => best = Some((d, key.consonant)),
            }
        }
        best.map(|(_, consonant)| consonant).unwrap_or(Consonant::A)
    }

    /// Rows of all keys strictly closer than `radius` to `point`, each row
    /// once, in layout order.
    pub fn consonants_within(&self, point: Point, radius: f64) -> Vec<Consonant> {
        let mut found = Vec::new();
        for key in &self.keys {
            if distance(key.position, point) < radius && !found.contains(&key.consonant) {
                found.push(key.consonant);
            }
        }
        found
    }
}
