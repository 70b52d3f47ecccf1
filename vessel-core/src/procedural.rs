//! Procedural arterial trees.
//!
//! [`ProceduralGenerator`] grows a segment soup from a list of
//! [`BranchSeed`]s. Every branch emits one segment, then forks into one or
//! two thinner, shorter children rotated left and right of its own
//! direction, until its remaining depth runs out. The generator is seeded,
//! so the same configuration always yields the same soup.

use std::convert::Infallible;

use crate::config::GeneratorConfig;
use crate::segment::Segment;
use crate::source::GeometrySource;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Starting state of one branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchSeed {
    pub start: Vec2,
    /// Unit growth direction.
    pub direction: Vec2,
    pub length: f32,
    pub radius: f32,
    /// Remaining recursion depth; `0` emits nothing.
    pub depth: u32,
}

impl BranchSeed {
    /// Creates a seed, normalizing `direction`.
    pub fn new(start: Vec2, direction: Vec2, length: f32, radius: f32, depth: u32) -> Self {
        Self {
            start,
            direction: direction.normalize_or_zero(),
            length,
            radius,
            depth,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProceduralGenerator {
    pub cfg: GeneratorConfig,
    /// Grown in order; the first seed's first segment comes first in the soup.
    pub seeds: Vec<BranchSeed>,
}

impl ProceduralGenerator {
    pub fn new(cfg: GeneratorConfig, seeds: Vec<BranchSeed>) -> Self {
        Self { cfg, seeds }
    }

    /// The default arterial layout: a trunk rising from `(0, -0.8)`, two
    /// basal branches at `y = -0.6` and two middle branches at `y = -0.3`.
    ///
    /// The trunk is grown first so that its base segment is the root found
    /// by [`crate::topology::reconstruct`].
    pub fn arterial() -> Self {
        let seeds = vec![
            BranchSeed::new(Vec2::new(0.0, -0.8), Vec2::new(0.0, 1.0), 0.6, 0.08, 6),
            BranchSeed::new(Vec2::new(0.0, -0.6), Vec2::new(0.8, 0.4), 0.3, 0.04, 4),
            BranchSeed::new(Vec2::new(0.0, -0.6), Vec2::new(-0.8, 0.4), 0.3, 0.04, 4),
            BranchSeed::new(Vec2::new(0.0, -0.3), Vec2::new(0.9, 0.2), 0.25, 0.03, 3),
            BranchSeed::new(Vec2::new(0.0, -0.3), Vec2::new(-0.9, 0.2), 0.25, 0.03, 3),
        ];
        Self::new(GeneratorConfig::default(), seeds)
    }

    /// Grows every seed in order with one shared RNG.
    ///
    /// ### Returns
    /// The segment soup, each branch's segment followed by the segments of
    /// its first child subtree, then its second.
    pub fn generate(&self) -> Vec<Segment> {
        let mut rng = StdRng::seed_from_u64(self.cfg.seed);
        let mut out = Vec::new();
        for &seed in &self.seeds {
            self.grow(seed, &mut rng, &mut out);
        }
        tracing::debug!(segments = out.len(), seeds = self.seeds.len(), "generated tree");
        out
    }

    /// Depth-first growth with an explicit stack.
    ///
    /// Children are pushed in reverse so the first child is popped first,
    /// which keeps the emission order (and the RNG draw order) of a
    /// recursive pre-order walk.
    fn grow(&self, seed: BranchSeed, rng: &mut StdRng, out: &mut Vec<Segment>) {
        let cfg = &self.cfg;
        let turns = [
            Vec2::from_angle(cfg.branch_angle),
            Vec2::from_angle(-cfg.branch_angle),
        ];
        let mut stack = vec![seed];

        while let Some(b) = stack.pop() {
            if b.depth == 0 || b.length < cfg.min_length {
                continue;
            }

            let end = b.start + b.direction * b.length + self.jitter(rng);
            out.push(Segment::new(b.start, end, b.radius, b.radius * cfg.radius_falloff));

            if b.depth > 1 {
                let count = if b.depth > cfg.fork_depth { 2 } else { 1 };
                for turn in turns[..count].iter().rev() {
                    stack.push(BranchSeed {
                        start: end,
                        direction: turn.rotate(b.direction).normalize_or_zero(),
                        length: b.length * cfg.length_falloff,
                        radius: b.radius * cfg.radius_falloff,
                        depth: b.depth - 1,
                    });
                }
            }
        }
    }

    fn jitter(&self, rng: &mut StdRng) -> Vec2 {
        let j = self.cfg.jitter;
        if j <= 0.0 {
            return Vec2::ZERO;
        }
        let x = rng.random_range(-j..j);
        let y = rng.random_range(-j..j);
        Vec2::new(x, y)
    }
}

impl Default for ProceduralGenerator {
    fn default() -> Self {
        Self::arterial()
    }
}

impl GeometrySource for ProceduralGenerator {
    type Error = Infallible;

    fn segments(&self) -> Result<Vec<Segment>, Self::Error> {
        Ok(self.generate())
    }
}
