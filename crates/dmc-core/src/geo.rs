//! Planar coordinate type.
//!
//! Activity locations are given in a projected coordinate system measured in
//! metres, so crow-fly distances are plain Euclidean distances.

/// A projected coordinate in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance_m(self, other: Coord) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Euclidean distance in kilometres.
    #[inline]
    pub fn distance_km(self, other: Coord) -> f64 {
        self.distance_m(other) * 1e-3
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
