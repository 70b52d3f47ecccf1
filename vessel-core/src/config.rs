/// How segment colors are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// White everywhere.
    PlainWhite,
    /// Flat green, independent of metrics.
    #[default]
    Monochrome,
    /// Red at the root fading to violet at the deepest segments.
    DepthGradient,
    /// Blue for leaves, red for segments carrying large subtrees.
    DescendantGradient,
}

impl ColorMode {
    pub const ALL: [ColorMode; 4] = [
        ColorMode::PlainWhite,
        ColorMode::Monochrome,
        ColorMode::DepthGradient,
        ColorMode::DescendantGradient,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::PlainWhite => "Plain white",
            ColorMode::Monochrome => "Monochrome",
            ColorMode::DepthGradient => "Depth gradient",
            ColorMode::DescendantGradient => "Descendant gradient",
        }
    }
}

/// Display settings for one render pass.
///
/// Passed by value into [`crate::phases::render_pass`]; input handling
/// builds a new value instead of toggling shared flags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapperConfig {
    pub color_mode: ColorMode,
    /// Scale each segment's width by its descendant count.
    pub thickness_mode: bool,
    /// Width used for every segment when `thickness_mode` is off, and for
    /// batched draws.
    pub base_width: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            thickness_mode: false,
            base_width: 3.0,
        }
    }
}

/// Tuning constants of the procedural branch generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Half-width of the uniform jitter added to each end point, per axis.
    pub jitter: f32,
    /// Branches shorter than this are not emitted.
    pub min_length: f32,
    /// Child length = parent length * `length_falloff`.
    pub length_falloff: f32,
    /// End radius = start radius * `radius_falloff`; also the child radius factor.
    pub radius_falloff: f32,
    /// Rotation (radians) applied to the parent direction for each child.
    pub branch_angle: f32,
    /// Branches with more remaining depth than this fork into two children.
    pub fork_depth: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            jitter: 0.05,
            min_length: 0.01,
            length_falloff: 0.6,
            radius_falloff: 0.7,
            branch_angle: 0.5,
            fork_depth: 3,
        }
    }
}
