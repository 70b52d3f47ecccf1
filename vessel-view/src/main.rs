//! Application entry point for the 2D arterial tree viewer.
//!
//! This binary parses the command line, installs the tracing subscriber,
//! configures eframe/egui and delegates all interactive logic and
//! rendering to [`Viewer`] from the `viewer` module.

mod viewer;
mod vtk;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Trees shown when no file is given on the command line.
const DEFAULT_TREES: [&str; 3] = [
    "data/Nterm_064/tree2D_Nterm0064_step0064.vtk",
    "data/Nterm_128/tree2D_Nterm0128_step0128.vtk",
    "data/Nterm_256/tree2D_Nterm0256_step0256.vtk",
];

const DEFAULT_LOG: &str = "vessel_view=info,vessel_core=warn";

/// Visualize 2D arterial trees stored as line segments.
#[derive(Parser, Debug)]
#[command(name = "vessel-view", version)]
struct Args {
    /// Legacy ASCII VTK files to cycle through (default: the sample trees
    /// under `data/`).
    files: Vec<PathBuf>,

    /// Ignore files and show the procedural tree.
    #[arg(long)]
    procedural: bool,

    /// Log filter, e.g. `vessel_core=debug`. Overrides `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn tree_files(&self) -> Vec<PathBuf> {
        if self.procedural {
            Vec::new()
        } else if self.files.is_empty() {
            DEFAULT_TREES.iter().map(PathBuf::from).collect()
        } else {
            self.files.clone()
        }
    }
}

fn init_tracing(log: Option<&str>) {
    let filter = match log {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let files = args.tree_files();
    tracing::info!(files = files.len(), "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("2D Arterial Tree Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "2D Arterial Tree Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(files)))),
    )
}
