//! Legacy fixed-offset text map format
//!
//! Layout (skip counts are load-bearing):
//! ```text
//! Width <w>
//! Height <h>
//! ScaleX <sx>
//! ScaleY <sy>
//! <h lines of w codes>
//! ```
//! Each header value is preceded by a fixed number of skipped characters
//! (6, 8, 7, 7 - the newline of the previous line counts), then any
//! whitespace. Every grid cell is preceded by exactly one skipped
//! character (the separator or line break), then any whitespace.

use std::fmt::Write as _;

use glam::Vec2;

use super::grid::Grid;
use crate::error::MapError;

/// Characters skipped before each header field
pub const WIDTH_SKIP: usize = 6;
pub const HEIGHT_SKIP: usize = 8;
pub const SCALE_X_SKIP: usize = 7;
pub const SCALE_Y_SKIP: usize = 7;
/// Characters skipped before each grid cell
pub const CELL_SKIP: usize = 1;

/// Grid and scale read from a map file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMap {
    pub grid: Grid,
    pub scale: Vec2,
}

/// Stream-style reader over the text, mimicking formatted extraction
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Skip exactly `n` characters; false if input ran out first
    fn skip(&mut self, n: usize) -> bool {
        let mut chars = self.rest().char_indices();
        for _ in 0..n {
            if chars.next().is_none() {
                self.pos = self.src.len();
                return false;
            }
        }
        self.pos += chars.next().map_or(self.rest().len(), |(i, _)| i);
        true
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Take the longest prefix whose chars satisfy `accept(index, char)`
    fn take_while(&mut self, mut accept: impl FnMut(usize, char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .enumerate()
            .find(|&(n, (_, c))| !accept(n, c))
            .map_or(rest.len(), |(_, (i, _))| i);
        self.pos += end;
        &rest[..end]
    }

    fn read_int(&mut self) -> Result<i64, String> {
        self.skip_whitespace();
        let token = self.take_while(|n, c| c.is_ascii_digit() || (n == 0 && (c == '-' || c == '+')));
        if token.is_empty() {
            return Err(self.describe_next("integer"));
        }
        token
            .parse::<i64>()
            .map_err(|e| format!("invalid integer `{token}`: {e}"))
    }

    fn read_float(&mut self) -> Result<f32, String> {
        self.skip_whitespace();
        let mut prev = ' ';
        let token = self.take_while(|n, c| {
            let ok = c.is_ascii_digit()
                || c == '.'
                || c == 'e'
                || c == 'E'
                || ((c == '-' || c == '+') && (n == 0 || prev == 'e' || prev == 'E'));
            prev = c;
            ok
        });
        if token.is_empty() {
            return Err(self.describe_next("number"));
        }
        token
            .parse::<f32>()
            .map_err(|e| format!("invalid number `{token}`: {e}"))
    }

    fn describe_next(&self, expected: &str) -> String {
        match self.rest().chars().next() {
            Some(c) => format!("expected {expected}, found `{c}`"),
            None => format!("expected {expected}, found end of input"),
        }
    }
}

fn header_dimension(scan: &mut Scanner, skip: usize, field: &'static str) -> Result<usize, MapError> {
    if !scan.skip(skip) {
        return Err(MapError::MalformedHeader {
            field,
            reason: "unexpected end of input".to_string(),
        });
    }
    let value = scan
        .read_int()
        .map_err(|reason| MapError::MalformedHeader { field, reason })?;
    usize::try_from(value).map_err(|_| MapError::MalformedHeader {
        field,
        reason: format!("must not be negative, got {value}"),
    })
}

fn header_scale(scan: &mut Scanner, skip: usize, field: &'static str) -> Result<f32, MapError> {
    if !scan.skip(skip) {
        return Err(MapError::MalformedHeader {
            field,
            reason: "unexpected end of input".to_string(),
        });
    }
    let value = scan
        .read_float()
        .map_err(|reason| MapError::MalformedHeader { field, reason })?;
    if !value.is_finite() {
        return Err(MapError::MalformedHeader {
            field,
            reason: format!("must be finite, got {value}"),
        });
    }
    Ok(value)
}

/// Parse the legacy fixed-offset text format
pub fn parse(src: &str) -> Result<ParsedMap, MapError> {
    let mut scan = Scanner::new(src);

    let width = header_dimension(&mut scan, WIDTH_SKIP, "width")?;
    let height = header_dimension(&mut scan, HEIGHT_SKIP, "height")?;
    let scale_x = header_scale(&mut scan, SCALE_X_SKIP, "scale_x")?;
    let scale_y = header_scale(&mut scan, SCALE_Y_SKIP, "scale_y")?;

    let total = width.checked_mul(height).ok_or(MapError::MalformedHeader {
        field: "height",
        reason: format!("{width} x {height} grid is too large"),
    })?;
    // Don't trust the header for the allocation; every cell needs at least two chars
    let mut cells = Vec::with_capacity(total.min(src.len() / 2 + 1));

    // A zero-width grid has no cells to read, however tall it claims to be
    let rows = if width == 0 { 0 } else { height };
    for row in 0..rows {
        for col in 0..width {
            let grid_err = |reason: String| MapError::MalformedGrid { row, col, reason };
            if !scan.skip(CELL_SKIP) {
                return Err(grid_err("unexpected end of input".to_string()));
            }
            let value = scan.read_int().map_err(grid_err)?;
            let code = i32::try_from(value)
                .map_err(|_| grid_err(format!("code {value} out of range")))?;
            cells.push(code);
        }
    }

    let grid = Grid::from_cells(width, height, cells).ok_or(MapError::MalformedGrid {
        row: height,
        col: 0,
        reason: "cell count mismatch".to_string(),
    })?;

    Ok(ParsedMap {
        grid,
        scale: Vec2::new(scale_x, scale_y),
    })
}

/// Write a grid in the canonical legacy layout
pub fn write(grid: &Grid, scale: Vec2) -> String {
    let mut out = String::with_capacity(32 + grid.len() * 2);
    // Writing to a String cannot fail
    let _ = writeln!(out, "Width {}", grid.width());
    let _ = writeln!(out, "Height {}", grid.height());
    let _ = writeln!(out, "ScaleX {}", scale.x);
    let _ = write!(out, "ScaleY {}", scale.y);
    for row in grid.rows() {
        out.push('\n');
        for (col, code) in row.iter().enumerate() {
            if col > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{code}");
        }
    }
    out.push('\n');
    out
}
