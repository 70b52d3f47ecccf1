use crate::types::EPSILON;
use glam::Vec2;

/// One edge of a vascular tree.
///
/// The radius tapers linearly from `start_radius` at `start` to
/// `end_radius` at `end`. A segment carries no topology; parent/child
/// relations are inferred from endpoint coincidence by
/// [`crate::topology::reconstruct`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub start_radius: f32,
    pub end_radius: f32,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2, start_radius: f32, end_radius: f32) -> Self {
        Self {
            start,
            end,
            start_radius,
            end_radius,
        }
    }

    /// Returns `true` if this segment's start lies on `other`'s end,
    /// i.e. `other` can be this segment's parent.
    #[inline]
    pub fn continues(&self, other: &Segment) -> bool {
        coincident(other.end, self.start)
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// Manhattan-distance coincidence test with tolerance [`EPSILON`].
#[inline]
pub fn coincident(a: Vec2, b: Vec2) -> bool {
    let d = (a - b).abs();
    d.x + d.y < EPSILON
}
