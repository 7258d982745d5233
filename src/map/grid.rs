//! Rectangular grid of raw cell codes
//!
//! Cells live in one contiguous buffer indexed by `row * width + col`.

use super::cell::CellCode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Create a grid filled with `CellCode::EMPTY`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellCode::EMPTY; width * height],
        }
    }

    /// Build from a row-major buffer; `None` if the length doesn't match
    pub fn from_cells(width: usize, height: usize, cells: Vec<i32>) -> Option<Self> {
        if width.checked_mul(height) != Some(cells.len()) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`)
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    /// Raw code at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Interpreted code at (row, col)
    pub fn cell(&self, row: usize, col: usize) -> Option<CellCode> {
        self.get(row, col).map(CellCode::from_code)
    }

    /// Overwrite a cell, returning false when out of bounds
    pub fn set(&mut self, row: usize, col: usize, code: i32) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = code;
                true
            }
            None => false,
        }
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[i32]> {
        (row < self.height).then(|| &self.cells[row * self.width..(row + 1) * self.width])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        // chunks_exact panics on 0, and a zero-width grid has no cells anyway
        let width = self.width.max(1);
        self.cells.chunks_exact(width).take(self.height)
    }

    /// Row-major view of every code
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    /// Number of cells holding exactly `code`
    pub fn count(&self, code: i32) -> usize {
        self.cells.iter().filter(|&&c| c == code).count()
    }

    /// (row, col, code) of every cell whose code has no defined meaning
    pub fn unknown_cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !CellCode::is_known(**c))
            .map(move |(i, &c)| (i / width, i % width, c))
    }
}
