//! The editable colour grid.
//!
//! [`Grid`] is the single source of truth for a chart. Resizing always
//! rebuilds the whole grid as background; painting a cell is the only
//! in-place edit.

use crate::color::Color;
use crate::error::ChartError;
use serde::{Deserialize, Serialize};

pub const MIN_DIMENSION: usize = 1;
pub const MAX_DIMENSION: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub width: usize,
    pub height: usize,
}

impl GridDimensions {
    /// Out-of-range input is corrected, never rejected.
    pub fn clamped(width: i64, height: i64) -> Self {
        Self {
            width: clamp_axis(width),
            height: clamp_axis(height),
        }
    }

    pub fn is_valid(&self) -> bool {
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        range.contains(&self.width) && range.contains(&self.height)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.height && cell.col < self.width
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

fn clamp_axis(value: i64) -> usize {
    let clamped = value.clamp(MIN_DIMENSION as i64, MAX_DIMENSION as i64) as usize;
    if clamped as i64 != value {
        log::warn!("grid dimension {value} out of range, using {clamped}");
    }
    clamped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: GridDimensions,
    cells: Vec<Vec<Color>>,
}

impl Grid {
    pub fn new(dims: GridDimensions) -> Self {
        let axis = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let dims = GridDimensions::clamped(axis(dims.width), axis(dims.height));
        Self {
            dims,
            cells: vec![vec![Color::BACKGROUND; dims.width]; dims.height],
        }
    }

    /// Builds a grid from row-major colour rows. Rows must be rectangular
    /// and inside the editable size range.
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, ChartError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let dims = GridDimensions { width, height };
        if !dims.is_valid() {
            return Err(ChartError::InvalidRecord(format!(
                "grid is {width}x{height}, expected 1..={MAX_DIMENSION} on each axis"
            )));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ChartError::InvalidRecord(format!(
                "row {idx} has {} cells, expected {width}",
                row.len()
            )));
        }
        Ok(Self { dims, cells: rows })
    }

    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn rows(&self) -> &[Vec<Color>] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Replaces the grid with a blank one of the (clamped) new size.
    /// Previous cell data is discarded even when the size is unchanged.
    pub fn resize(&mut self, width: i64, height: i64) {
        *self = Self::new(GridDimensions::clamped(width, height));
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.dims);
    }

    pub fn set_cell(&mut self, row: usize, col: usize, color: Color) -> Result<(), ChartError> {
        let dims = self.dims;
        if !dims.contains(CellCoord::new(row, col)) {
            return Err(ChartError::OutOfBounds {
                row,
                col,
                width: dims.width,
                height: dims.height,
            });
        }
        self.cells[row][col] = color;
        Ok(())
    }

    /// Non-background colours in row-major first-seen order.
    pub fn used_colors(&self) -> Vec<Color> {
        let mut seen = Vec::new();
        for color in self.cells.iter().flatten() {
            if !color.is_background() && !seen.contains(color) {
                seen.push(*color);
            }
        }
        seen
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridDimensions::default())
    }
}
