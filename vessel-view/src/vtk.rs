//! Legacy ASCII VTK polydata loader.
//!
//! Only the parts the viewer needs are read:
//! - `POINTS n <type>` — `x y z` triples; `z` is dropped.
//! - `LINES n size` — cells `k i0 .. i(k-1)`; every consecutive index pair
//!   becomes one connection.
//! - `RADIUS` / `RADII` sections and `SCALARS <name> ...` arrays whose name
//!   contains `radius` — one radius per point.
//!
//! Everything else (header, `POINT_DATA`, other scalars, lookup tables) is
//! skipped. Loaded coordinates are centered and scaled to fit the view.

use std::path::{Path, PathBuf};

use glam::Vec2;
use thiserror::Error;
use vessel_core::segment::Segment;
use vessel_core::source::{Geometry, GeometrySource};

/// Loaded trees are scaled to fit `[-FIT_EXTENT, FIT_EXTENT]` on both axes.
pub const FIT_EXTENT: f32 = 0.9;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("geometry contains no segments")]
    NoSegments,
}

/// What the numbers on the current line belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    None,
    Points { remaining: usize },
    Lines { remaining: usize },
    Radii,
    Skip,
}

/// Parses the first numeric field after the keyword, e.g. `n` in `POINTS n float`.
fn header_count(fields: &[&str], line: usize) -> Result<usize, LoadError> {
    fields
        .get(1)
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| LoadError::Parse {
            line,
            message: format!("expected a count after {}", fields[0]),
        })
}

fn parse_number<T: std::str::FromStr>(field: &str, line: usize) -> Result<T, LoadError> {
    field.parse().map_err(|_| LoadError::Parse {
        line,
        message: format!("invalid number '{field}'"),
    })
}

/// Parses VTK legacy ASCII text into indexed geometry.
///
/// ### Returns
/// - `Ok(Geometry)` with raw (unscaled) coordinates. The geometry may be
///   empty; callers decide whether that is an error.
/// - `Err(LoadError::Parse)` if a data line contains a malformed number or a
///   section header lacks its count.
pub fn parse_vtk(text: &str) -> Result<Geometry, LoadError> {
    let mut geometry = Geometry::default();
    let mut section = Section::None;
    let mut coords: Vec<f32> = Vec::with_capacity(3);
    let mut cell: Vec<usize> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let Some(&first) = fields.first() else {
            continue;
        };

        if first.starts_with(|c: char| c.is_ascii_alphabetic() || c == '#') {
            section = match first {
                "POINTS" => {
                    let n = header_count(&fields, line)?;
                    geometry.points.reserve(n.min(text.len()));
                    coords.clear();
                    Section::Points { remaining: n }
                }
                "LINES" => {
                    let n = header_count(&fields, line)?;
                    geometry.connections.reserve(n.min(text.len()));
                    cell.clear();
                    Section::Lines { remaining: n }
                }
                "RADIUS" | "RADII" => Section::Radii,
                "SCALARS" => {
                    let name = fields.get(1).copied().unwrap_or_default();
                    if name.to_ascii_lowercase().contains("radius") {
                        Section::Radii
                    } else {
                        Section::Skip
                    }
                }
                // Belongs to the SCALARS header just read.
                "LOOKUP_TABLE" => section,
                _ => Section::None,
            };
            continue;
        }

        match &mut section {
            Section::Points { remaining } => {
                for field in &fields {
                    if *remaining == 0 {
                        break;
                    }
                    coords.push(parse_number(field, line)?);
                    if coords.len() == 3 {
                        geometry.points.push(Vec2::new(coords[0], coords[1]));
                        coords.clear();
                        *remaining -= 1;
                    }
                }
            }
            Section::Lines { remaining } => {
                for field in &fields {
                    if *remaining == 0 {
                        break;
                    }
                    cell.push(parse_number(field, line)?);
                    let cell_len = cell[0].checked_add(1).ok_or_else(|| LoadError::Parse {
                        line,
                        message: format!("cell size {} out of range", cell[0]),
                    })?;
                    if cell.len() == cell_len {
                        geometry
                            .connections
                            .extend(cell[1..].windows(2).map(|w| (w[0], w[1])));
                        cell.clear();
                        *remaining -= 1;
                    }
                }
            }
            Section::Radii => {
                for field in &fields {
                    geometry.radii.push(parse_number(field, line)?);
                }
            }
            Section::None | Section::Skip => {}
        }
    }

    tracing::debug!(
        points = geometry.points.len(),
        connections = geometry.connections.len(),
        radii = geometry.radii.len(),
        "parsed vtk"
    );
    Ok(geometry)
}

/// A tree stored in a VTK file on disk.
#[derive(Clone, Debug)]
pub struct VtkFile {
    pub path: PathBuf,
}

impl VtkFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl GeometrySource for VtkFile {
    type Error = LoadError;

    /// Reads, parses and fits the file, then flattens it into segments.
    fn segments(&self) -> Result<Vec<Segment>, LoadError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut geometry = parse_vtk(&text)?;
        geometry.fit_to(FIT_EXTENT);

        let segments = geometry.to_segments();
        if segments.is_empty() {
            return Err(LoadError::NoSegments);
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# vtk DataFile Version 3.0
tree2D Nterm 3
ASCII
DATASET POLYDATA
POINTS 4 float
0.0 0.0 0.0
0.0 10.0 0.0
5.0 15.0 0.0  -5.0 15.0 0.0
LINES 3 9
2 0 1
2 1 2
2 1 3
POINT_DATA 4
SCALARS radius float
LOOKUP_TABLE default
0.4 0.3
0.2 0.1
";

    #[test]
    fn parses_points_lines_and_radii() {
        let g = parse_vtk(SAMPLE).unwrap();

        assert_eq!(
            g.points,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 10.0),
                Vec2::new(5.0, 15.0),
                Vec2::new(-5.0, 15.0),
            ]
        );
        assert_eq!(g.connections, vec![(0, 1), (1, 2), (1, 3)]);
        assert_eq!(g.radii, vec![0.4, 0.3, 0.2, 0.1]);
    }

    #[test]
    fn polyline_cells_become_consecutive_pairs() {
        let text = "POINTS 3 float\n0 0 0 1 0 0 2 0 0\nLINES 1 4\n3 0 1 2\n";

        let g = parse_vtk(text).unwrap();

        assert_eq!(g.connections, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn other_scalars_are_ignored() {
        let text = "POINTS 1 float\n0 0 0\nPOINT_DATA 1\nSCALARS pressure float\nLOOKUP_TABLE default\n7.5\nRADII\n0.25\n";

        let g = parse_vtk(text).unwrap();

        assert_eq!(g.radii, vec![0.25]);
    }

    #[test]
    fn malformed_number_reports_line() {
        let text = "POINTS 2 float\n0 0 0\n1 x 0\n";

        let err = parse_vtk(text).unwrap_err();

        assert!(matches!(err, LoadError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn missing_count_is_an_error() {
        let err = parse_vtk("POINTS\n").unwrap_err();

        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn oversized_cell_count_is_an_error() {
        let text = "POINTS 2 float\n0 0 0 1 0 0\nLINES 1 2\n18446744073709551615 0\n";

        let err = parse_vtk(text).unwrap_err();

        assert!(matches!(err, LoadError::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn huge_header_count_does_not_preallocate() {
        let g = parse_vtk("POINTS 18446744073709551615 float\n0 0 0\n").unwrap();

        assert_eq!(g.points, vec![Vec2::ZERO]);

        let g = parse_vtk("LINES 18446744073709551615 3\n2 0 1\n").unwrap();

        assert_eq!(g.connections, vec![(0, 1)]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let file = VtkFile::new("does/not/exist.vtk");

        assert!(matches!(file.segments(), Err(LoadError::Io { .. })));
    }

    #[test]
    fn file_is_fitted_into_view() {
        let path = std::env::temp_dir().join(format!("vessel-view-{}.vtk", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();

        let segments = VtkFile::new(&path).segments();
        std::fs::remove_file(&path).ok();
        let segments = segments.unwrap();

        assert_eq!(segments.len(), 3);
        // Bounding box (-5..5, 0..15) is centered and its 15-unit height
        // scaled to 1.8.
        assert!((segments[0].start - Vec2::new(0.0, -0.9)).length() < 1e-6);
        assert!((segments[1].end - Vec2::new(0.6, 0.9)).length() < 1e-6);
        assert_eq!(segments[0].start_radius, 0.4);
    }

    #[test]
    fn file_without_lines_has_no_segments() {
        let path =
            std::env::temp_dir().join(format!("vessel-view-empty-{}.vtk", std::process::id()));
        std::fs::write(&path, "POINTS 1 float\n0 0 0\n").unwrap();

        let result = VtkFile::new(&path).segments();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(LoadError::NoSegments)));
    }
}
