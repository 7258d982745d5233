//! Level map loading
//!
//! A map file holds a grid of integer cell codes and a scale factor. The
//! loader turns it into a `BinaryMap`, which then walks the grid and
//! reports platform and spawn placements to a `LevelSink`.
//!
//! Two on-disk formats are understood:
//! - `legacy`: the original fixed-offset text layout
//! - `keyed`: explicitly keyed JSON

pub mod cell;
pub mod grid;
pub mod keyed;
pub mod legacy;

pub use cell::CellCode;
pub use grid::Grid;

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::sink::LevelSink;

/// On-disk encoding of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapFormat {
    Legacy,
    Keyed,
}

impl MapFormat {
    /// Pick a format from the file extension, falling back to sniffing the content
    pub fn detect(path: &Path, contents: &str) -> Self {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json || contents.trim_start().starts_with('{') {
            MapFormat::Keyed
        } else {
            MapFormat::Legacy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapFormat::Legacy => "legacy",
            MapFormat::Keyed => "keyed",
        }
    }
}

/// A single placement produced by walking the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Platform(Vec2),
    PlayerSpawn(Vec2),
}

/// What a placement pass reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    pub platforms: usize,
    pub spawns: usize,
    /// Cells with codes that have no meaning
    pub ignored: usize,
}

/// A loaded level map
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMap {
    grid: Grid,
    scale: Vec2,
}

impl BinaryMap {
    pub fn new(grid: Grid, scale: Vec2) -> Self {
        Self { grid, scale }
    }

    /// Read and parse the map at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| MapError::from_io(path, e))?;

        let format = MapFormat::detect(path, &contents);
        log::debug!("Parsing {} as {} map", path.display(), format.as_str());

        let map = Self::parse(&contents, format)?;
        log::info!(
            "Loaded map {} ({}x{}, scale {}x{})",
            path.display(),
            map.grid.width(),
            map.grid.height(),
            map.scale.x,
            map.scale.y
        );
        Ok(map)
    }

    pub fn parse(contents: &str, format: MapFormat) -> Result<Self, MapError> {
        match format {
            MapFormat::Legacy => Self::parse_legacy(contents),
            MapFormat::Keyed => Self::parse_keyed(contents),
        }
    }

    pub fn parse_legacy(contents: &str) -> Result<Self, MapError> {
        let parsed = legacy::parse(contents)?;
        Ok(Self::new(parsed.grid, parsed.scale))
    }

    pub fn parse_keyed(contents: &str) -> Result<Self, MapError> {
        let parsed = keyed::parse(contents)?;
        Ok(Self::new(parsed.grid, parsed.scale))
    }

    /// Write the map to `path` in the given format
    pub fn save(&self, path: impl AsRef<Path>, format: MapFormat) -> Result<(), MapError> {
        let path = path.as_ref();
        let contents = match format {
            MapFormat::Legacy => self.to_legacy_string(),
            MapFormat::Keyed => self.to_keyed_string()?,
        };
        fs::write(path, contents).map_err(|e| MapError::from_io(path, e))?;
        log::info!("Saved {} map to {}", format.as_str(), path.display());
        Ok(())
    }

    pub fn to_legacy_string(&self) -> String {
        legacy::write(&self.grid, self.scale)
    }

    pub fn to_keyed_string(&self) -> Result<String, MapError> {
        keyed::write(&self.grid, self.scale)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Reject cells whose code has no defined meaning
    pub fn validate_cells(&self) -> Result<(), MapError> {
        match self.grid.unknown_cells().next() {
            Some((row, col, code)) => Err(MapError::UnknownCellCode { row, col, code }),
            None => Ok(()),
        }
    }

    /// World position of the center of cell (col, row)
    #[inline]
    pub fn cell_world_position(&self, col: usize, row: usize) -> Vec2 {
        cell_center(col, row) * self.scale
    }

    /// Every placement, in the order `emit_placements` reports them
    ///
    /// Column-major: all rows of column 0, then column 1, and so on.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        let height = self.grid.height();
        (0..self.grid.width())
            .flat_map(move |x| (0..height).map(move |y| (x, y)))
            .filter_map(|(x, y)| {
                let position = self.cell_world_position(x, y);
                match self.grid.cell(y, x)? {
                    CellCode::Platform => Some(Placement::Platform(position)),
                    CellCode::HeroSpawn => Some(Placement::PlayerSpawn(position)),
                    CellCode::Empty => None,
                }
            })
    }

    /// Walk the grid and report placements to `sink`
    pub fn emit_placements(&self, sink: &mut impl LevelSink) -> PlacementSummary {
        let mut summary = PlacementSummary::default();
        for placement in self.placements() {
            match placement {
                Placement::Platform(pos) => {
                    sink.add_platform(pos);
                    summary.platforms += 1;
                }
                Placement::PlayerSpawn(pos) => {
                    sink.set_player_initial_position(pos);
                    summary.spawns += 1;
                }
            }
        }
        summary.ignored = self.grid.unknown_cells().count();

        if summary.spawns > 1 {
            log::warn!("Map has {} hero spawns, using the last one", summary.spawns);
        }
        if summary.ignored > 0 {
            log::warn!("Ignored {} cells with unknown codes", summary.ignored);
        }
        summary
    }
}

/// Grid coordinate to cell-center coordinate, before scaling
#[inline]
pub fn cell_center(col: usize, row: usize) -> Vec2 {
    Vec2::new(col as f32 + 0.5, row as f32 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LevelLayout;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hazard_run_{}_{}", std::process::id(), name))
    }

    fn scenario_map() -> BinaryMap {
        let mut grid = Grid::new(6, 4);
        grid.set(1, 2, CellCode::PLATFORM);
        grid.set(0, 0, CellCode::HERO_SPAWN);
        BinaryMap::new(grid, Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_scenario_placements() {
        let map = scenario_map();
        let mut layout = LevelLayout::new();
        let summary = map.emit_placements(&mut layout);

        assert_eq!(layout.platforms, vec![Vec2::new(250.0, 150.0)]);
        assert_eq!(layout.player_spawn, Some(Vec2::new(50.0, 50.0)));
        assert_eq!(
            summary,
            PlacementSummary {
                platforms: 1,
                spawns: 1,
                ignored: 0
            }
        );
    }

    #[test]
    fn test_scenario_from_legacy_text() {
        let src = "Width 6\nHeight 4\nScaleX 100\nScaleY 100\n\
                   2 0 0 0 0 0\n\
                   0 0 1 0 0 0\n\
                   0 0 0 0 0 0\n\
                   0 0 0 0 0 0\n";
        let map = BinaryMap::parse_legacy(src).unwrap();
        assert_eq!(map, scenario_map());
    }

    #[test]
    fn test_last_spawn_in_column_major_order_wins() {
        // (row 0, col 1) is visited after (row 1, col 0)
        let grid = Grid::from_cells(2, 2, vec![0, 2, 2, 0]).unwrap();
        let map = BinaryMap::new(grid, Vec2::ONE);
        let mut layout = LevelLayout::new();
        let summary = map.emit_placements(&mut layout);
        assert_eq!(summary.spawns, 2);
        assert_eq!(layout.player_spawn, Some(Vec2::new(1.5, 0.5)));
    }

    #[test]
    fn test_column_major_platform_order() {
        let grid = Grid::from_cells(2, 2, vec![1, 1, 1, 0]).unwrap();
        let map = BinaryMap::new(grid, Vec2::splat(10.0));
        let platforms: Vec<_> = map.placements().collect();
        assert_eq!(
            platforms,
            vec![
                Placement::Platform(Vec2::new(5.0, 5.0)),
                Placement::Platform(Vec2::new(5.0, 15.0)),
                Placement::Platform(Vec2::new(15.0, 5.0)),
            ]
        );
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        let grid = Grid::from_cells(3, 1, vec![5, 1, -2]).unwrap();
        let map = BinaryMap::new(grid, Vec2::ONE);
        let mut layout = LevelLayout::new();
        let summary = map.emit_placements(&mut layout);
        assert_eq!(summary.platforms, 1);
        assert_eq!(summary.ignored, 2);
        assert!(matches!(
            map.validate_cells(),
            Err(MapError::UnknownCellCode {
                row: 0,
                col: 0,
                code: 5
            })
        ));
    }

    #[test]
    fn test_zero_sized_emits_nothing() {
        for (w, h) in [(0, 4), (6, 0), (0, 0)] {
            let map = BinaryMap::new(Grid::new(w, h), Vec2::ONE);
            let mut layout = LevelLayout::new();
            let summary = map.emit_placements(&mut layout);
            assert!(layout.is_empty());
            assert_eq!(summary, PlacementSummary::default());
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = BinaryMap::load(temp_path("does_not_exist.txt")).unwrap_err();
        assert!(matches!(err, MapError::FileNotFound { .. }));
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let map = scenario_map();

        let legacy_path = temp_path("scenario.txt");
        map.save(&legacy_path, MapFormat::Legacy).unwrap();
        assert_eq!(BinaryMap::load(&legacy_path).unwrap(), map);

        let keyed_path = temp_path("scenario.json");
        map.save(&keyed_path, MapFormat::Keyed).unwrap();
        assert_eq!(BinaryMap::load(&keyed_path).unwrap(), map);

        let _ = fs::remove_file(legacy_path);
        let _ = fs::remove_file(keyed_path);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            MapFormat::detect(Path::new("a/level1.JSON"), "Width 1"),
            MapFormat::Keyed
        );
        assert_eq!(
            MapFormat::detect(Path::new("a/level1.map"), "  {\"width\": 1}"),
            MapFormat::Keyed
        );
        assert_eq!(
            MapFormat::detect(Path::new("a/level1.txt"), "Width 1"),
            MapFormat::Legacy
        );
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (0usize..12, 0usize..12).prop_flat_map(|(w, h)| {
            prop::collection::vec(-3i32..6, w * h)
                .prop_map(move |cells| Grid::from_cells(w, h, cells).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_legacy_text_preserves_every_code(grid in arb_grid(), sx in 0.25f32..64.0, sy in 0.25f32..64.0) {
            let map = BinaryMap::new(grid, Vec2::new(sx, sy));
            let reparsed = BinaryMap::parse_legacy(&map.to_legacy_string()).unwrap();
            prop_assert_eq!(reparsed.grid(), map.grid());
            prop_assert_eq!(reparsed.scale(), map.scale());
        }

        #[test]
        fn prop_placement_counts_match_grid(grid in arb_grid()) {
            let platforms = grid.count(CellCode::PLATFORM);
            let spawns = grid.count(CellCode::HERO_SPAWN);
            let map = BinaryMap::new(grid, Vec2::splat(16.0));

            let mut layout = LevelLayout::new();
            let summary = map.emit_placements(&mut layout);
            prop_assert_eq!(layout.platforms.len(), platforms);
            prop_assert_eq!(summary.spawns, spawns);

            let last_spawn = map.placements().filter_map(|p| match p {
                Placement::PlayerSpawn(pos) => Some(pos),
                Placement::Platform(_) => None,
            }).last();
            prop_assert_eq!(layout.player_spawn, last_spawn);
        }
    }
}
