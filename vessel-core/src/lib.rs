//! Core of the 2-D vascular tree viewer: segment soups in, render buffers out.
//!
//! Main components:
//! - [`segment`] — the segment type and endpoint coincidence test.
//! - [`source`] — geometry source boundary (indexed geometry, sources).
//! - [`topology`] — root and adjacency reconstruction from coincidence.
//! - [`hierarchy`] — depth and descendant counts per segment.
//! - [`procedural`] — seeded procedural arterial trees.
//! - [`mapper`] — colors and line widths from hierarchy metrics.
//! - [`phases`] — the per-frame render pipeline.
//! - [`config`] — display modes and generator tuning.
//! - [`types`] — shared type aliases and constants.

pub mod config;
pub mod hierarchy;
pub mod mapper;
pub mod phases;
pub mod procedural;
pub mod segment;
pub mod source;
pub mod topology;
pub mod types;
