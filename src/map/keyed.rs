//! Keyed JSON map format
//!
//! Field order is irrelevant and nothing depends on character offsets:
//! ```json
//! { "width": 3, "height": 2, "scale": [32.0, 32.0],
//!   "rows": [[0, 1, 0], [2, 0, 1]] }
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::legacy::ParsedMap;
use crate::error::MapError;

/// On-disk shape of a keyed map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedMap {
    pub width: usize,
    pub height: usize,
    pub scale: [f32; 2],
    #[serde(default)]
    pub rows: Vec<Vec<i32>>,
}

impl KeyedMap {
    pub fn from_grid(grid: &Grid, scale: Vec2) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            scale: scale.to_array(),
            rows: grid.rows().map(<[i32]>::to_vec).collect(),
        }
    }

    /// Validate dimensions and flatten into a grid
    pub fn into_map(self) -> Result<ParsedMap, MapError> {
        let [sx, sy] = self.scale;
        if !sx.is_finite() || !sy.is_finite() {
            return Err(MapError::MalformedHeader {
                field: "scale",
                reason: format!("must be finite, got [{sx}, {sy}]"),
            });
        }

        // A zero-width grid may list empty rows or none at all
        let expected_rows = if self.width == 0 { self.rows.len() } else { self.height };
        if self.rows.len() != expected_rows {
            return Err(MapError::MalformedGrid {
                row: self.rows.len().min(self.height),
                col: 0,
                reason: format!("expected {} rows, found {}", self.height, self.rows.len()),
            });
        }

        let mut cells = Vec::with_capacity(self.rows.iter().map(Vec::len).sum());
        for (row, values) in self.rows.into_iter().enumerate() {
            if values.len() != self.width {
                return Err(MapError::MalformedGrid {
                    row,
                    col: values.len().min(self.width),
                    reason: format!("expected {} cells, found {}", self.width, values.len()),
                });
            }
            cells.extend(values);
        }

        let grid = Grid::from_cells(self.width, self.height, cells).ok_or(
            MapError::MalformedGrid {
                row: 0,
                col: 0,
                reason: "cell count mismatch".to_string(),
            },
        )?;
        Ok(ParsedMap {
            grid,
            scale: Vec2::new(sx, sy),
        })
    }
}

/// Parse a keyed JSON map
pub fn parse(src: &str) -> Result<ParsedMap, MapError> {
    let keyed: KeyedMap = serde_json::from_str(src)?;
    keyed.into_map()
}

/// Serialize a grid as pretty-printed keyed JSON
pub fn write(grid: &Grid, scale: Vec2) -> Result<String, MapError> {
    Ok(serde_json::to_string_pretty(&KeyedMap::from_grid(grid, scale))?)
}
