//! Per-segment hierarchy metrics over a reconstructed [`Topology`].

use std::collections::VecDeque;

use crate::topology::Topology;
use crate::types::SegmentId;

/// Depth of a segment that is not reachable from the root.
pub const UNREACHED: i32 = -1;

/// Depth and subtree size of every segment.
///
/// ### Fields
/// - `depth` - Breadth-first distance from the root, [`UNREACHED`] for
///   segments the root cannot reach.
/// - `descendants` - Number of segments below each segment, excluding
///   itself. Leaves and unreachable segments have `0`.
/// - `max_depth` - Largest reachable depth, at least `1`.
/// - `max_descendants` - Largest descendant count, at least `1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub depth: Vec<i32>,
    pub descendants: Vec<usize>,
    pub max_depth: u32,
    pub max_descendants: usize,
}

impl Hierarchy {
    fn from_metrics(depth: Vec<i32>, descendants: Vec<usize>) -> Self {
        let max_depth = depth.iter().copied().max().unwrap_or(0).max(1) as u32;
        let max_descendants = descendants.iter().copied().max().unwrap_or(0).max(1);

        Self {
            depth,
            descendants,
            max_depth,
            max_descendants,
        }
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    #[inline]
    pub fn is_reachable(&self, id: SegmentId) -> bool {
        self.depth.get(id).is_some_and(|&d| d != UNREACHED)
    }

    pub fn unreachable_count(&self) -> usize {
        self.depth.iter().filter(|&&d| d == UNREACHED).count()
    }

    /// `depth / max_depth` in `[0, 1]`, or `None` if `id` is unreachable.
    pub fn normalized_depth(&self, id: SegmentId) -> Option<f32> {
        self.is_reachable(id)
            .then(|| self.depth[id] as f32 / self.max_depth as f32)
    }

    /// `descendants / max_descendants` in `[0, 1]`, or `None` if `id` is
    /// unreachable.
    pub fn normalized_descendants(&self, id: SegmentId) -> Option<f32> {
        self.is_reachable(id)
            .then(|| self.descendants[id] as f32 / self.max_descendants as f32)
    }
}

/// Computes depth and descendant counts from the topology's root.
///
/// Metrics follow the chosen-parent tree: segment `c` hangs below
/// [`Topology::parent_of`]`(c)` and nowhere else, so a segment with several
/// coincident parents is credited to the same parent that the topology
/// reports. Without ambiguity this is exactly `children`. Depth comes from a
/// breadth-first walk from the root; descendant counts are accumulated
/// bottom-up by replaying the visit order backwards. The root never hangs
/// below another segment, which ends the walk on a closed loop.
///
/// ### Parameters
/// - `topology` - Output of [`crate::topology::reconstruct`].
///
/// ### Returns
/// A [`Hierarchy`] with one entry per segment. An empty topology yields
/// empty vectors.
pub fn analyze(topology: &Topology) -> Hierarchy {
    let n = topology.len();
    let mut depth = vec![UNREACHED; n];
    let mut descendants = vec![0usize; n];

    let Some(root) = topology.root else {
        return Hierarchy::from_metrics(depth, descendants);
    };

    let mut tree_children: Vec<Vec<SegmentId>> = vec![Vec::new(); n];
    for c in (0..n).filter(|&c| c != root) {
        if let Some(p) = topology.parent_of(c) {
            tree_children[p].push(c);
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::from([root]);
    depth[root] = 0;

    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &c in &tree_children[id] {
            depth[c] = depth[id] + 1;
            queue.push_back(c);
        }
    }

    for &id in order.iter().rev() {
        if id != root
            && let Some(p) = topology.parent_of(id)
        {
            descendants[p] += 1 + descendants[id];
        }
    }

    let hierarchy = Hierarchy::from_metrics(depth, descendants);
    if order.len() < n {
        tracing::debug!(
            unreachable = n - order.len(),
            "segments not reachable from root"
        );
    }
    hierarchy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;
    use crate::topology::reconstruct;
    use glam::Vec2;

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32) -> Segment {
        Segment::new(Vec2::new(x0, y0), Vec2::new(x1, y1), 0.05, 0.02)
    }

    fn analyze_soup(soup: &[Segment]) -> Hierarchy {
        analyze(&reconstruct(soup))
    }

    #[test]
    fn empty_topology_gives_empty_metrics() {
        let h = analyze(&Topology::default());

        assert!(h.is_empty());
        assert!(h.descendants.is_empty());
        assert_eq!(h.max_depth, 1);
        assert_eq!(h.max_descendants, 1);
        assert_eq!(h.normalized_depth(0), None);
    }

    #[test]
    fn single_segment_has_zero_depth_and_descendants() {
        let h = analyze_soup(&[seg(0.0, -1.0, 0.0, -0.2)]);

        assert_eq!(h.depth, vec![0]);
        assert_eq!(h.descendants, vec![0]);
        assert_eq!(h.normalized_depth(0), Some(0.0));
        assert_eq!(h.normalized_descendants(0), Some(0.0));
    }

    #[test]
    fn fork_metrics() {
        let h = analyze_soup(&[
            seg(0.0, -0.2, 0.0, 0.3),
            seg(0.0, 0.3, 0.4, 0.6),
            seg(0.0, 0.3, -0.4, 0.6),
        ]);

        assert_eq!(h.depth, vec![0, 1, 1]);
        assert_eq!(h.descendants, vec![2, 0, 0]);
        assert_eq!(h.max_depth, 1);
        assert_eq!(h.max_descendants, 2);
        assert_eq!(h.normalized_depth(1), Some(1.0));
        assert_eq!(h.normalized_descendants(0), Some(1.0));
    }

    #[test]
    fn chain_accumulates_descendants_bottom_up() {
        // Listed leaf-first to make sure order in the soup does not matter.
        let h = analyze_soup(&[
            seg(0.0, 2.0, 0.0, 3.0),
            seg(0.0, 1.0, 0.0, 2.0),
            seg(0.0, 0.0, 0.0, 1.0),
        ]);

        assert_eq!(h.depth, vec![2, 1, 0]);
        assert_eq!(h.descendants, vec![0, 1, 2]);
        assert_eq!(h.normalized_depth(0), Some(1.0));
        assert_eq!(h.normalized_depth(1), Some(0.5));
    }

    #[test]
    fn unreachable_segments_keep_sentinel() {
        let h = analyze_soup(&[
            seg(0.0, 0.0, 0.0, 1.0),
            seg(0.0, 1.0, 0.0, 2.0),
            seg(5.0, 5.0, 6.0, 6.0),
        ]);

        assert_eq!(h.depth, vec![0, 1, UNREACHED]);
        assert_eq!(h.descendants, vec![1, 0, 0]);
        assert_eq!(h.unreachable_count(), 1);
        assert!(!h.is_reachable(2));
        assert_eq!(h.normalized_depth(2), None);
        assert_eq!(h.normalized_descendants(2), None);
    }

    #[test]
    fn shared_child_is_counted_once() {
        let h = analyze_soup(&[
            seg(-1.0, 0.0, 0.0, 1.0),
            seg(1.0, 0.0, 0.0, 1.0),
            seg(0.0, 1.0, 0.0, 2.0),
        ]);

        assert_eq!(h.depth, vec![0, UNREACHED, 1]);
        assert_eq!(h.descendants, vec![1, 0, 0]);
    }

    #[test]
    fn cycle_terminates_from_fallback_root() {
        let h = analyze_soup(&[
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 1.0, 1.0),
            seg(1.0, 1.0, 0.0, 0.0),
        ]);

        assert_eq!(h.depth, vec![0, 1, 2]);
        assert_eq!(h.descendants, vec![2, 1, 0]);
    }

    #[test]
    fn ambiguous_segment_hangs_below_its_reported_parent() {
        let soup = [
            seg(0.0, 0.0, 0.0, 1.0),
            seg(0.0, 2.0, 1.0, 2.0),
            seg(0.0, 1.0, 1.0, 2.0),
            seg(0.0, 1.0, 0.0, 2.0),
            seg(1.0, 2.0, 2.0, 3.0),
        ];
        let topology = reconstruct(&soup);

        let h = analyze(&topology);

        assert_eq!(topology.parent_of(4), Some(1));
        assert_eq!(h.depth, vec![0, 2, 1, 1, 3]);
        assert_eq!(h.descendants, vec![4, 1, 0, 2, 0]);
        for id in 0..soup.len() {
            let Some(p) = topology.parent_of(id) else {
                continue;
            };
            assert_eq!(h.depth[id], h.depth[p] + 1, "segment {id}");
        }
    }
}
