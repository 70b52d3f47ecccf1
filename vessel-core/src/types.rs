/// Identifier for a segment in a segment soup.
///
/// This is an index into the `&[Segment]` slice a pass was run on, and is
/// only meaningful for that slice. Reordering or rebuilding the soup
/// invalidates every id derived from it.
pub type SegmentId = usize;

/// Coincidence tolerance for endpoint matching (Manhattan distance).
pub const EPSILON: f32 = 0.001;
