//! Attribute mapping: hierarchy metrics to per-vertex colors and
//! per-segment line widths.

use crate::config::{ColorMode, MapperConfig};
use crate::hierarchy::Hierarchy;
use crate::segment::Segment;
use crate::types::SegmentId;
use glam::{Vec2, Vec3};

/// Width of a leaf in thickness mode.
pub const THICKNESS_OFFSET: f32 = 2.0;
/// Extra width of the segment with the most descendants in thickness mode.
pub const THICKNESS_SCALE: f32 = 13.0;
pub const MIN_DRAW_WIDTH: f32 = 1.0;
pub const MAX_DRAW_WIDTH: f32 = 10.0;
/// Gradient-mode color of segments the root cannot reach.
pub const UNREACHED_COLOR: Vec3 = Vec3::splat(0.35);

/// Render-ready line list.
///
/// Segment `i` owns vertices `2i` and `2i + 1` (start, end), both with
/// color `colors[2i]`, and width `thicknesses[i]`.
///
/// ### Fields
/// - `vertices` - Line-list positions, two per segment.
/// - `colors` - RGB per vertex, aligned with `vertices`.
/// - `thicknesses` - Unclamped width per segment; see [`RenderData::draw_width`].
/// - `default_width` - Single width for drawing every segment in one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderData {
    pub vertices: Vec<Vec2>,
    pub colors: Vec<Vec3>,
    pub thicknesses: Vec<f32>,
    pub default_width: f32,
}

impl RenderData {
    pub fn segment_count(&self) -> usize {
        self.thicknesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thicknesses.is_empty()
    }

    /// Width for drawing segment `id` on its own, clamped to
    /// `[MIN_DRAW_WIDTH, MAX_DRAW_WIDTH]`.
    #[inline]
    pub fn draw_width(&self, id: SegmentId) -> f32 {
        self.thicknesses[id].clamp(MIN_DRAW_WIDTH, MAX_DRAW_WIDTH)
    }

    /// Iterates `(endpoints, color, width)` per segment, using clamped
    /// per-segment widths when `per_segment` is set and the default width
    /// otherwise.
    pub fn lines(
        &self,
        per_segment: bool,
    ) -> impl Iterator<Item = ([Vec2; 2], Vec3, f32)> + '_ {
        (0..self.segment_count()).map(move |i| {
            let width = if per_segment {
                self.draw_width(i)
            } else {
                self.default_width
            };
            (
                [self.vertices[2 * i], self.vertices[2 * i + 1]],
                self.colors[2 * i],
                width,
            )
        })
    }
}

/// Color of one segment.
///
/// `depth` and `descendants` are the normalized metrics, `None` for
/// unreachable segments.
pub fn segment_color(mode: ColorMode, depth: Option<f32>, descendants: Option<f32>) -> Vec3 {
    match mode {
        ColorMode::PlainWhite => Vec3::ONE,
        ColorMode::Monochrome => Vec3::new(0.0, 1.0, 0.0),
        ColorMode::DepthGradient => match depth {
            Some(d) => Vec3::new(1.0 - 0.5 * d, 0.0, 0.5 * d),
            None => UNREACHED_COLOR,
        },
        ColorMode::DescendantGradient => match descendants {
            Some(s) => Vec3::new(s.sqrt(), 0.0, 1.0 - s * s),
            None => UNREACHED_COLOR,
        },
    }
}

/// Unclamped width of one segment.
pub fn segment_thickness(cfg: &MapperConfig, descendants: Option<f32>) -> f32 {
    match descendants {
        Some(s) if cfg.thickness_mode => THICKNESS_OFFSET + s * THICKNESS_SCALE,
        _ => cfg.base_width,
    }
}

/// Builds the render buffer for a segment soup.
///
/// ### Parameters
/// - `segments` - The soup `hierarchy` was computed from.
/// - `hierarchy` - Output of [`crate::hierarchy::analyze`].
/// - `cfg` - Color and thickness mode for this pass.
///
/// ### Returns
/// A [`RenderData`] with two vertices per segment. An empty soup yields
/// empty buffers.
pub fn map_attributes(
    segments: &[Segment],
    hierarchy: &Hierarchy,
    cfg: &MapperConfig,
) -> RenderData {
    let n = segments.len();
    let mut data = RenderData {
        vertices: Vec::with_capacity(2 * n),
        colors: Vec::with_capacity(2 * n),
        thicknesses: Vec::with_capacity(n),
        default_width: cfg.base_width,
    };

    for (i, s) in segments.iter().enumerate() {
        let depth = hierarchy.normalized_depth(i);
        let descendants = hierarchy.normalized_descendants(i);
        let color = segment_color(cfg.color_mode, depth, descendants);

        data.vertices.extend([s.start, s.end]);
        data.colors.extend([color, color]);
        data.thicknesses.push(segment_thickness(cfg, descendants));
    }
    data
}
