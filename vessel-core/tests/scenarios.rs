use glam::{Vec2, Vec3};
use vessel_core::{
    config::{ColorMode, MapperConfig},
    hierarchy::analyze,
    mapper::map_attributes,
    phases::render_pass,
    procedural::ProceduralGenerator,
    segment::Segment,
    topology::{reconstruct, reconstruct_indexed},
    types::SegmentId,
};

fn seg(x0: f32, y0: f32, x1: f32, y1: f32) -> Segment {
    Segment::new(Vec2::new(x0, y0), Vec2::new(x1, y1), 0.05, 0.02)
}

fn trunk_and_two_children() -> Vec<Segment> {
    vec![
        seg(0.0, -0.2, 0.0, 0.3),
        seg(0.0, 0.3, 0.4, 0.6),
        seg(0.0, 0.3, -0.4, 0.6),
    ]
}

/// Counts the segments below `id` by walking `children` directly.
fn subtree_size(children: &[Vec<SegmentId>], id: SegmentId) -> usize {
    let mut stack = children[id].clone();
    let mut count = 0;
    while let Some(c) = stack.pop() {
        count += 1;
        stack.extend(children[c].iter().copied());
    }
    count
}

#[test]
fn single_segment() {
    let topology = reconstruct(&[seg(0.0, -1.0, 0.0, -0.2)]);
    let h = analyze(&topology);

    assert_eq!(topology.root, Some(0));
    assert!(topology.children[0].is_empty());
    assert_eq!(h.depth, vec![0]);
    assert_eq!(h.descendants, vec![0]);
}

#[test]
fn trunk_with_two_children() {
    let topology = reconstruct(&trunk_and_two_children());
    let h = analyze(&topology);

    assert_eq!(topology.root, Some(0));
    assert_eq!(topology.children[0], vec![1, 2]);
    assert_eq!(h.depth, vec![0, 1, 1]);
    assert_eq!(h.descendants, vec![2, 0, 0]);
}

#[test]
fn depth_gradient_on_trunk_with_two_children() {
    let segments = trunk_and_two_children();
    let h = analyze(&reconstruct(&segments));
    let cfg = MapperConfig {
        color_mode: ColorMode::DepthGradient,
        ..MapperConfig::default()
    };

    let data = map_attributes(&segments, &h, &cfg);

    let close = |a: Vec3, b: Vec3| (a - b).abs().max_element() < 1e-6;
    assert_eq!(h.max_depth, 1);
    assert!(close(data.colors[0], Vec3::new(1.0, 0.0, 0.0)));
    assert!(close(data.colors[2], Vec3::new(0.5, 0.0, 0.5)));
    assert!(close(data.colors[4], Vec3::new(0.5, 0.0, 0.5)));
}

#[test]
fn empty_soup_renders_nothing() {
    let pass = render_pass(&[], &MapperConfig::default());

    assert!(pass.render.vertices.is_empty());
    assert!(pass.render.colors.is_empty());
    assert!(pass.render.thicknesses.is_empty());
}

#[test]
fn generated_tree_depth_follows_edges() {
    let mut generator = ProceduralGenerator::arterial();
    generator.seeds.truncate(1);
    let segments = generator.generate();

    let topology = reconstruct(&segments);
    let h = analyze(&topology);

    let root = topology.root.expect("non-empty soup has a root");
    assert_eq!(h.depth[root], 0);
    for (parent, children) in topology.children.iter().enumerate() {
        for &c in children {
            assert_eq!(h.depth[c], h.depth[parent] + 1, "edge {parent} -> {c}");
        }
    }
}

#[test]
fn descendant_counts_match_subtree_sizes() {
    let mut generator = ProceduralGenerator::arterial();
    generator.seeds.truncate(2);
    let segments = generator.generate();

    let topology = reconstruct(&segments);
    let h = analyze(&topology);

    for id in 0..segments.len() {
        if !h.is_reachable(id) {
            continue;
        }
        assert_eq!(h.descendants[id], subtree_size(&topology.children, id));
        if topology.children[id].is_empty() {
            assert_eq!(h.descendants[id], 0);
        }
    }
}

#[test]
fn normalized_metrics_stay_in_unit_range() {
    let segments = ProceduralGenerator::arterial().generate();
    let h = analyze(&reconstruct(&segments));

    let mut zero_depth = 0;
    for id in 0..segments.len() {
        let (Some(d), Some(s)) = (h.normalized_depth(id), h.normalized_descendants(id)) else {
            continue;
        };
        assert!((0.0..=1.0).contains(&d));
        assert!((0.0..=1.0).contains(&s));
        if d == 0.0 {
            zero_depth += 1;
        }
    }
    assert_eq!(zero_depth, 1);
}

#[test]
fn generator_is_byte_identical_across_runs() {
    let bits = |segments: Vec<Segment>| -> Vec<u32> {
        segments
            .iter()
            .flat_map(|s| {
                [
                    s.start.x, s.start.y, s.end.x, s.end.y, s.start_radius, s.end_radius,
                ]
            })
            .map(f32::to_bits)
            .collect()
    };

    assert_eq!(
        bits(ProceduralGenerator::arterial().generate()),
        bits(ProceduralGenerator::arterial().generate())
    );
}

#[test]
fn reconstruction_and_analysis_are_idempotent() {
    let segments = ProceduralGenerator::arterial().generate();

    let t1 = reconstruct(&segments);
    let t2 = reconstruct(&segments);
    assert_eq!(t1, t2);
    assert_eq!(analyze(&t1), analyze(&t2));
}

#[test]
fn indexed_reconstruction_matches_pairwise() {
    let segments = ProceduralGenerator::arterial().generate();

    assert_eq!(reconstruct_indexed(&segments), reconstruct(&segments));
}
