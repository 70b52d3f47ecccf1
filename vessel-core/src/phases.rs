//! Per-frame render pipeline over the active segment soup.
//!
//! Each render request runs, from scratch:
//! 1. [`reconstruction_phase`] — infer root and adjacency from endpoint
//!    coincidence.
//! 2. [`analysis_phase`] — depth and descendant counts from the root, and
//!    the connected components of the soup.
//! 3. [`mapping_phase`] — colors and widths for the selected modes.
//!
//! Nothing is cached between calls; a new soup or new modes take effect on
//! the next pass.

use crate::{
    config::MapperConfig,
    hierarchy::{self, Hierarchy},
    mapper::{self, RenderData},
    segment::Segment,
    topology::{self, Component, Topology},
};

/// Everything one pass produced.
///
/// `topology`, `hierarchy` and `components` are kept for status display
/// only; the renderer consumes `render`. Metrics cover the first component;
/// the others are drawn but stay unreachable.
#[derive(Clone, Debug, Default)]
pub struct RenderPass {
    pub topology: Topology,
    pub hierarchy: Hierarchy,
    pub components: Vec<Component>,
    pub render: RenderData,
}

/// Reconstructs the tree structure of `segments`.
///
/// Small soups use the pairwise matcher; at and above
/// `indexed_threshold` segments the spatial-hash matcher is used. Both
/// give the same [`Topology`].
pub fn reconstruction_phase(segments: &[Segment], indexed_threshold: usize) -> Topology {
    if segments.len() >= indexed_threshold {
        topology::reconstruct_indexed(segments)
    } else {
        topology::reconstruct(segments)
    }
}

pub fn analysis_phase(topology: &Topology) -> (Hierarchy, Vec<Component>) {
    (hierarchy::analyze(topology), topology.components())
}

pub fn mapping_phase(
    segments: &[Segment],
    hierarchy: &Hierarchy,
    cfg: &MapperConfig,
) -> RenderData {
    mapper::map_attributes(segments, hierarchy, cfg)
}

/// Soups with at least this many segments are matched through the spatial
/// hash in [`render_pass`].
pub const INDEXED_THRESHOLD: usize = 4096;

/// Runs all three phases for one frame.
///
/// ### Parameters
/// - `segments` - The active soup, borrowed read-only.
/// - `cfg` - Display modes for this frame.
///
/// ### Returns
/// A [`RenderPass`] owning all intermediate and final results.
pub fn render_pass(segments: &[Segment], cfg: &MapperConfig) -> RenderPass {
    let topology = reconstruction_phase(segments, INDEXED_THRESHOLD);
    let (hierarchy, components) = analysis_phase(&topology);
    let render = mapping_phase(segments, &hierarchy, cfg);

    RenderPass {
        topology,
        hierarchy,
        components,
        render,
    }
}
