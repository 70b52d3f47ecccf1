//! Interactive 2D arterial tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the active segment soup, the
//! list of tree files to cycle through, the display modes and the camera,
//! and implements [`eframe::App`] to draw the render buffer produced by
//! [`vessel_core::phases::render_pass`] every frame.

use std::path::PathBuf;

use eframe::App;
use glam::{Vec2, Vec3};
use vessel_core::{
    config::{ColorMode, MapperConfig},
    phases::{self, RenderPass},
    procedural::ProceduralGenerator,
    segment::Segment,
    source::GeometrySource,
    topology::RootOutcome,
};

use crate::vtk::VtkFile;

/// Pixels per world unit at zoom `1.0`.
const BASE_SCALE: f32 = 350.0;
const PAN_SPEED: f32 = 6.0;
const ZOOM_STEP: f32 = 1.01;
const ROTATE_STEP: f32 = 0.02;

/// Main application state for the viewer.
///
/// The typical per-frame update is:
/// 1. Handle keyboard shortcuts (tree navigation, modes, camera).
/// 2. Run [`phases::render_pass`] on the active soup with the current
///    [`MapperConfig`].
/// 3. Draw the panels and the resulting line list.
///
/// ### Fields
/// - `files` - Tree files cycled with the arrow keys; empty means procedural only.
/// - `current` - Index of the active file in `files`.
/// - `segments` - The active segment soup.
/// - `source` - Human-readable description of where `segments` came from.
///
/// - `mapper` - Color and thickness mode passed to each render pass.
///
/// - `zoom` - Zoom factor on top of [`BASE_SCALE`].
/// - `pan` - Screen-space pan offset in pixels.
/// - `rotation` - View rotation in radians.
pub struct Viewer {
    files: Vec<PathBuf>,
    current: usize,
    segments: Vec<Segment>,
    source: String,

    mapper: MapperConfig,

    zoom: f32,
    pan: egui::Vec2,
    rotation: f32,
}

impl Viewer {
    /// Creates a viewer and loads the first tree.
    ///
    /// ### Parameters
    /// - `files` - Tree files to cycle through. If empty, or if a file
    ///   fails to load, the procedural arterial tree is shown instead.
    pub fn new(files: Vec<PathBuf>) -> Self {
        let mut viewer = Self {
            files,
            current: 0,
            segments: Vec::new(),
            source: String::new(),
            mapper: MapperConfig::default(),
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            rotation: 0.0,
        };
        viewer.load_current();
        viewer
    }

    /// Replaces the active soup with the current file, or with the
    /// procedural tree if there is no file or it cannot be loaded.
    fn load_current(&mut self) {
        let loaded = match self.files.get(self.current) {
            Some(path) => match VtkFile::new(path).segments() {
                Ok(segments) => Some((segments, path.display().to_string())),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "could not load tree, generating procedural tree"
                    );
                    None
                }
            },
            None => None,
        };

        let (segments, source) = loaded.unwrap_or_else(|| {
            let generator = ProceduralGenerator::arterial();
            let Ok(segments) = generator.segments();
            (segments, "procedural".to_owned())
        });

        tracing::info!(source = %source, segments = segments.len(), "active tree replaced");
        self.segments = segments;
        self.source = source;
    }

    /// Moves `step` files forward (negative: backward), wrapping around.
    fn cycle_tree(&mut self, step: isize) {
        if self.files.is_empty() {
            return;
        }
        let len = self.files.len() as isize;
        self.current = (self.current as isize + step).rem_euclid(len) as usize;
        self.load_current();
    }

    fn set_color_mode(&mut self, color_mode: ColorMode) {
        if self.mapper.color_mode != color_mode {
            tracing::info!(mode = color_mode.label(), "color mode");
        }
        self.mapper = MapperConfig {
            color_mode,
            ..self.mapper
        };
    }

    fn toggle_thickness(&mut self) {
        self.mapper = MapperConfig {
            thickness_mode: !self.mapper.thickness_mode,
            ..self.mapper
        };
        tracing::info!(on = self.mapper.thickness_mode, "thickness mode");
    }

    fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = egui::vec2(0.0, 0.0);
        self.rotation = 0.0;
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are rotated by `rotation`, scaled by
    /// `BASE_SCALE * zoom`, offset by `pan`, and centered inside `rect`.
    /// The y-axis is flipped so that positive y goes up.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let scale = BASE_SCALE * self.zoom;
        let r = Vec2::from_angle(self.rotation).rotate(p);
        egui::pos2(
            center.x + r.x * scale + self.pan.x,
            center.y - r.y * scale + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`] (up to floating point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let scale = BASE_SCALE * self.zoom;
        let r = Vec2::new(
            (p.x - center.x - self.pan.x) / scale,
            (center.y - p.y + self.pan.y) / scale,
        );
        Vec2::from_angle(-self.rotation).rotate(r)
    }

    /// Discrete shortcuts and held-key camera controls.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        use egui::Key;

        let pressed = |key: Key| ctx.input(|i| i.key_pressed(key));
        let down = |key: Key| ctx.input(|i| i.key_down(key));

        if pressed(Key::Escape) {
            tracing::info!("closing viewer");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if pressed(Key::ArrowRight) {
            self.cycle_tree(1);
        }
        if pressed(Key::ArrowLeft) {
            self.cycle_tree(-1);
        }

        let keys = [Key::Num1, Key::Num2, Key::Num3, Key::Num4];
        for (key, mode) in keys.into_iter().zip(ColorMode::ALL) {
            if pressed(key) {
                self.set_color_mode(mode);
            }
        }
        if pressed(Key::T) {
            self.toggle_thickness();
        }
        if pressed(Key::R) {
            self.reset_view();
        }

        let mut moved = false;
        for (key, delta) in [
            (Key::A, egui::vec2(-PAN_SPEED, 0.0)),
            (Key::D, egui::vec2(PAN_SPEED, 0.0)),
            (Key::W, egui::vec2(0.0, -PAN_SPEED)),
            (Key::S, egui::vec2(0.0, PAN_SPEED)),
        ] {
            if down(key) {
                self.pan += delta;
                moved = true;
            }
        }
        if down(Key::Q) {
            self.zoom = (self.zoom * ZOOM_STEP).clamp(0.1, 20.0);
            moved = true;
        }
        if down(Key::E) {
            self.zoom = (self.zoom / ZOOM_STEP).clamp(0.1, 20.0);
            moved = true;
        }
        if down(Key::Z) {
            self.rotation += ROTATE_STEP;
            moved = true;
        }
        if down(Key::X) {
            self.rotation -= ROTATE_STEP;
            moved = true;
        }
        if moved {
            ctx.request_repaint();
        }
    }

    /// Builds the top panel (tree navigation, view reset, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let has_files = !self.files.is_empty();
                if ui.add_enabled(has_files, egui::Button::new("◀ Prev")).clicked() {
                    self.cycle_tree(-1);
                }
                if ui.add_enabled(has_files, egui::Button::new("Next ▶")).clicked() {
                    self.cycle_tree(1);
                }
                ui.label(self.source.as_str());

                ui.separator();
                if ui.button("Reset view").clicked() {
                    self.reset_view();
                }
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=20.0).text("Zoom"));
            });
        });
    }

    /// Status bar entries for one pass, left to right.
    fn status_labels(&self, pass: &RenderPass) -> Vec<String> {
        let root = match (pass.topology.root, pass.topology.root_outcome) {
            (None, _) => "-".to_owned(),
            (Some(r), RootOutcome::Fallback) => format!("{r} (fallback)"),
            (Some(r), _) => r.to_string(),
        };
        let main_size = pass.components.first().map_or(0, |c| c.members.len());

        vec![
            format!("segments = {}", self.segments.len()),
            format!("root = {root}"),
            format!("max depth = {}", pass.hierarchy.max_depth),
            format!("components = {}", pass.components.len()),
            format!("analyzed = {main_size}"),
            format!("unreachable = {}", pass.hierarchy.unreachable_count()),
            format!("ambiguous = {}", pass.topology.ambiguous_count()),
        ]
    }

    /// Builds the bottom status bar from the metrics of this frame's pass.
    fn ui_status_bar(&self, ctx: &egui::Context, pass: &RenderPass) {
        let labels = self.status_labels(pass);
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for label in labels {
                    ui.label(label);
                    ui.separator();
                }
            });
        });
    }

    /// Builds the right-hand panel for display modes.
    fn ui_modes_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("modes_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Display");

                ui.separator();
                ui.label("Color mode");
                for (n, mode) in ColorMode::ALL.into_iter().enumerate() {
                    let text = format!("{} {}", n + 1, mode.label());
                    if ui
                        .selectable_label(self.mapper.color_mode == mode, text)
                        .clicked()
                    {
                        self.set_color_mode(mode);
                    }
                }

                ui.separator();
                let mut thickness = self.mapper.thickness_mode;
                if ui.checkbox(&mut thickness, "T Thickness by subtree").changed() {
                    self.toggle_thickness();
                }
                ui.add(
                    egui::DragValue::new(&mut self.mapper.base_width)
                        .prefix("base width = ")
                        .range(1.0..=10.0)
                        .speed(0.1),
                );

                ui.separator();
                ui.label("Arrows: trees  WASD: pan");
                ui.label("Q/E: zoom  Z/X: rotate  R: reset");
            });
    }

    /// Builds the central panel and draws the tree.
    ///
    /// In thickness mode each segment is stroked with its own clamped
    /// width; otherwise all segments share the default width and are
    /// submitted as one batch.
    fn ui_central_panel(&mut self, ctx: &egui::Context, pass: &RenderPass) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_gray(25)))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Pan with drag.
                if response.dragged() {
                    self.pan += response.drag_delta();
                }

                // Zoom around the mouse cursor.
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    self.zoom = (self.zoom * factor).clamp(0.1, 20.0);

                    let screen_after = self.world_to_screen(world_before, rect);
                    self.pan += pointer_screen - screen_after;
                }

                if pass.render.is_empty() {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "no tree loaded",
                        egui::FontId::proportional(18.0),
                        egui::Color32::GRAY,
                    );
                    return;
                }

                let shapes: Vec<egui::Shape> = pass
                    .render
                    .lines(self.mapper.thickness_mode)
                    .map(|([a, b], color, width)| {
                        egui::Shape::line_segment(
                            [self.world_to_screen(a, rect), self.world_to_screen(b, rect)],
                            egui::Stroke::new(width, to_color32(color)),
                        )
                    })
                    .collect();

                if self.mapper.thickness_mode {
                    for shape in shapes {
                        painter.add(shape);
                    }
                } else {
                    painter.add(egui::Shape::Vec(shapes));
                }
            });
    }
}

/// Converts an RGB color in `[0, 1]` to an opaque egui color.
fn to_color32(c: Vec3) -> egui::Color32 {
    let [r, g, b] = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0)
        .round()
        .to_array()
        .map(|v| v as u8);
    egui::Color32::from_rgb(r, g, b)
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// The render pass is recomputed from the active soup every frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        let pass = phases::render_pass(&self.segments, &self.mapper);

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx, &pass);
        self.ui_modes_panel(ctx);
        self.ui_central_panel(ctx, &pass);
    }
}
