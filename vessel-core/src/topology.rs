//! Topology reconstruction from endpoint coincidence.
//!
//! A segment soup stores no parent/child pointers. A segment `j` is a child
//! of `i` when `start(j)` lies within [`EPSILON`] (Manhattan) of `end(i)`.
//! [`reconstruct`] tests every ordered pair, which is `O(n²)` and fine for a
//! few thousand segments per frame. [`reconstruct_indexed`] produces the
//! same [`Topology`] through a spatial hash for larger soups.
//!
//! All tie-breaks follow soup order: the first coincident segment is the
//! chosen parent, the first orphan is the root.

use std::collections::{HashMap, VecDeque};

use crate::segment::{Segment, coincident};
use crate::types::{EPSILON, SegmentId};
use glam::Vec2;

/// How a segment's parent was determined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parentage {
    /// No other segment ends where this one starts.
    Orphan,
    /// Exactly one candidate parent.
    Unique(SegmentId),
    /// Several segments end where this one starts; `chosen` is the first in
    /// soup order and `candidates` lists all of them, ascending.
    Ambiguous {
        chosen: SegmentId,
        candidates: Vec<SegmentId>,
    },
}

impl Parentage {
    fn from_candidates(candidates: Vec<SegmentId>) -> Self {
        match candidates.len() {
            0 => Self::Orphan,
            1 => Self::Unique(candidates[0]),
            _ => Self::Ambiguous {
                chosen: candidates[0],
                candidates,
            },
        }
    }

    pub fn parent(&self) -> Option<SegmentId> {
        match self {
            Self::Orphan => None,
            Self::Unique(p) => Some(*p),
            Self::Ambiguous { chosen, .. } => Some(*chosen),
        }
    }

    #[inline]
    pub fn has_parent(&self) -> bool {
        !matches!(self, Self::Orphan)
    }
}

/// How [`Topology::root`] was picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RootOutcome {
    /// Empty soup, no root.
    #[default]
    Empty,
    /// The first segment whose start continues no other segment.
    FirstOrphan,
    /// Every segment has a parent; index `0` was used.
    Fallback,
}

/// Reconstructed adjacency over a segment soup.
///
/// ### Fields
/// - `root` - First orphan segment in soup order, `0` if every segment has a
///   parent, `None` for an empty soup.
/// - `root_outcome` - Whether `root` is a true orphan or the index-0
///   fallback.
/// - `children` - For every segment, the segments continuing from its end,
///   ascending.
/// - `parentage` - For every segment, how its parent was determined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
    pub root: Option<SegmentId>,
    pub root_outcome: RootOutcome,
    pub children: Vec<Vec<SegmentId>>,
    pub parentage: Vec<Parentage>,
}

/// A connected piece of the soup, rooted at an orphan segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub root: SegmentId,
    /// Members in breadth-first order, starting with `root`.
    pub members: Vec<SegmentId>,
}

impl Topology {
    fn assemble(parentage: Vec<Parentage>, children: Vec<Vec<SegmentId>>) -> Self {
        let n = parentage.len();
        let orphan = parentage.iter().position(|p| !p.has_parent());

        let (root, root_outcome) = match orphan {
            Some(id) => (Some(id), RootOutcome::FirstOrphan),
            None if n > 0 => {
                tracing::warn!(segments = n, "no orphan segment, falling back to root 0");
                (Some(0), RootOutcome::Fallback)
            }
            None => (None, RootOutcome::Empty),
        };

        let topology = Self {
            root,
            root_outcome,
            children,
            parentage,
        };

        tracing::debug!(
            segments = n,
            root = ?topology.root,
            ambiguous = topology.ambiguous_count(),
            "reconstructed topology"
        );
        topology
    }

    /// Number of segments in the soup this topology was built from.
    pub fn len(&self) -> usize {
        self.parentage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parentage.is_empty()
    }

    pub fn parent_of(&self, id: SegmentId) -> Option<SegmentId> {
        self.parentage.get(id).and_then(Parentage::parent)
    }

    /// Number of segments whose parent was chosen among several candidates.
    pub fn ambiguous_count(&self) -> usize {
        self.parentage
            .iter()
            .filter(|p| matches!(p, Parentage::Ambiguous { .. }))
            .count()
    }

    /// Splits the soup into connected pieces.
    ///
    /// Every orphan, in soup order, roots one component holding the
    /// segments reachable from it that no earlier component claimed. When
    /// there is no orphan the single component starts at the fallback root.
    /// Segments reachable from no root (e.g. on a cycle) belong to no
    /// component.
    pub fn components(&self) -> Vec<Component> {
        let mut roots: Vec<SegmentId> = self
            .parentage
            .iter()
            .enumerate()
            .filter_map(|(id, p)| (!p.has_parent()).then_some(id))
            .collect();
        if roots.is_empty()
            && let Some(root) = self.root
        {
            roots.push(root);
        }

        let mut claimed = vec![false; self.len()];
        let mut queue = VecDeque::new();

        roots
            .into_iter()
            .filter_map(|root| {
                if claimed[root] {
                    return None;
                }
                claimed[root] = true;
                queue.push_back(root);

                let mut members = Vec::new();
                while let Some(id) = queue.pop_front() {
                    members.push(id);
                    for &c in &self.children[id] {
                        if !claimed[c] {
                            claimed[c] = true;
                            queue.push_back(c);
                        }
                    }
                }
                Some(Component { root, members })
            })
            .collect()
    }
}

/// Reconstructs root and adjacency by testing every ordered segment pair.
///
/// ### Parameters
/// - `segments` - The segment soup; ids in the result index into it.
///
/// ### Returns
/// A [`Topology`] with `children` and `parentage` of length
/// `segments.len()`.
pub fn reconstruct(segments: &[Segment]) -> Topology {
    let n = segments.len();

    let parentage = (0..n)
        .map(|i| {
            let candidates = (0..n)
                .filter(|&j| j != i && segments[i].continues(&segments[j]))
                .collect();
            Parentage::from_candidates(candidates)
        })
        .collect();

    let children = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && segments[j].continues(&segments[i]))
                .collect::<Vec<_>>()
        })
        .collect();

    Topology::assemble(parentage, children)
}

/// Uniform grid over endpoint positions with cell size [`EPSILON`].
///
/// Two points within Manhattan distance `EPSILON` differ by less than one
/// cell on each axis, so probing the 3x3 neighbourhood finds every match.
#[derive(Debug, Default)]
struct SpatialHash {
    cells: HashMap<(i64, i64), Vec<SegmentId>>,
}

impl SpatialHash {
    fn cell(p: Vec2) -> (i64, i64) {
        (
            (p.x / EPSILON).floor() as i64,
            (p.y / EPSILON).floor() as i64,
        )
    }

    /// Ids must be inserted in ascending order.
    fn from_points(points: impl Iterator<Item = Vec2>) -> Self {
        let mut hash = Self::default();
        for (id, p) in points.enumerate() {
            hash.cells.entry(Self::cell(p)).or_default().push(id);
        }
        hash
    }

    /// Ids whose indexed point coincides with `p`, ascending, except `skip`.
    fn query(
        &self,
        p: Vec2,
        skip: SegmentId,
        point_of: impl Fn(SegmentId) -> Vec2,
    ) -> Vec<SegmentId> {
        let (cx, cy) = Self::cell(p);
        let mut found = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.cells.get(&(cx + dx, cy + dy)) {
                    found.extend(
                        ids.iter()
                            .copied()
                            .filter(|&id| id != skip && coincident(point_of(id), p)),
                    );
                }
            }
        }
        found.sort_unstable();
        found
    }
}

/// Same result as [`reconstruct`], matching endpoints through a spatial hash
/// in roughly linear time.
pub fn reconstruct_indexed(segments: &[Segment]) -> Topology {
    let ends = SpatialHash::from_points(segments.iter().map(|s| s.end));
    let starts = SpatialHash::from_points(segments.iter().map(|s| s.start));

    let parentage = segments
        .iter()
        .enumerate()
        .map(|(i, s)| Parentage::from_candidates(ends.query(s.start, i, |j| segments[j].end)))
        .collect();

    let children = segments
        .iter()
        .enumerate()
        .map(|(i, s)| starts.query(s.end, i, |j| segments[j].start))
        .collect();

    Topology::assemble(parentage, children)
}
