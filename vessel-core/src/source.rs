//! Geometry source boundary.
//!
//! Anything that can hand the core a segment soup implements
//! [`GeometrySource`]. File formats usually produce a [`Geometry`] first
//! (points, index-pair connections, optional per-point radii) and then
//! flatten it with [`Geometry::to_segments`].

use crate::segment::Segment;
use glam::Vec2;

/// Start radius substituted when a connection has no radius data.
pub const DEFAULT_START_RADIUS: f32 = 0.05;
/// End radius substituted when a connection has no radius data.
pub const DEFAULT_END_RADIUS: f32 = 0.02;

/// A producer of segment soups.
///
/// Sources that cannot fail use [`std::convert::Infallible`] as their
/// error type.
pub trait GeometrySource {
    type Error;

    /// Produces a fresh segment soup.
    fn segments(&self) -> Result<Vec<Segment>, Self::Error>;
}

/// Indexed line geometry as read from a file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub points: Vec<Vec2>,
    /// 0-based index pairs into `points`.
    pub connections: Vec<(usize, usize)>,
    /// Per-point radii, aligned with `points`. May be shorter or empty.
    pub radii: Vec<f32>,
}

impl Geometry {
    /// Flattens the indexed geometry into a segment soup.
    ///
    /// Connections referencing a point outside `points` are skipped one by
    /// one. A connection whose endpoints are not both covered by `radii`
    /// gets the default radius pair.
    ///
    /// ### Returns
    /// One [`Segment`] per valid connection, in connection order.
    pub fn to_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.connections.len());
        let mut skipped = 0usize;

        for &(a, b) in &self.connections {
            let (Some(&start), Some(&end)) = (self.points.get(a), self.points.get(b)) else {
                skipped += 1;
                continue;
            };

            let (start_radius, end_radius) = match (self.radii.get(a), self.radii.get(b)) {
                (Some(&ra), Some(&rb)) => (ra, rb),
                _ => (DEFAULT_START_RADIUS, DEFAULT_END_RADIUS),
            };

            segments.push(Segment::new(start, end, start_radius, end_radius));
        }

        if skipped > 0 {
            tracing::debug!(
                skipped,
                points = self.points.len(),
                "skipped out-of-range connections"
            );
        }
        segments
    }

    /// Centers the points on their bounding box and scales them uniformly
    /// so that the larger extent spans `[-half_extent, half_extent]`.
    ///
    /// Degenerate inputs (no points, or all points identical) are only
    /// translated.
    pub fn fit_to(&mut self, half_extent: f32) {
        let Some(&first) = self.points.first() else {
            return;
        };

        let (min, max) = self
            .points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));

        let center = (min + max) * 0.5;
        let extent = (max - min).max_element() * 0.5;
        let scale = if extent > 0.0 {
            half_extent / extent
        } else {
            1.0
        };

        for p in &mut self.points {
            *p = (*p - center) * scale;
        }
    }
}

impl GeometrySource for Geometry {
    type Error = std::convert::Infallible;

    fn segments(&self) -> Result<Vec<Segment>, Self::Error> {
        Ok(self.to_segments())
    }
}
