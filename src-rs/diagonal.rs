//! Diagonal numbering for corner-to-corner work.
//!
//! Diagonal 0 is the bottom-right cell, where the first block is made; the
//! top-left cell holds the last index, `width + height - 2`. The chart
//! overlay, the printable view and the written rows all use this numbering.

use crate::grid::{CellCoord, GridDimensions};
use serde::Serialize;
use std::ops::RangeInclusive;

pub fn diagonal(row: usize, col: usize, dims: GridDimensions) -> usize {
    (dims.height - 1 - row) + (dims.width - 1 - col)
}

pub fn diagonal_count(dims: GridDimensions) -> usize {
    dims.width + dims.height - 1
}

pub fn diagonals(dims: GridDimensions) -> RangeInclusive<usize> {
    0..=(dims.width + dims.height).saturating_sub(2)
}

/// Cells on diagonal `d`, ordered by their offset from the bottom edge.
/// This order is the stitch order within the working row.
pub fn cells_on_diagonal(d: usize, dims: GridDimensions) -> Vec<CellCoord> {
    if dims.width == 0 || dims.height == 0 {
        return Vec::new();
    }
    // offset i walks up from the bottom row; d - i is the distance from the right edge
    let first = d.saturating_sub(dims.width - 1);
    let last = d.min(dims.height - 1);
    if first > last {
        return Vec::new();
    }
    (first..=last)
        .map(|i| CellCoord::new(dims.height - 1 - i, dims.width - 1 - (d - i)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Increasing,
    Decreasing,
}

impl Phase {
    pub fn of(d: usize, dims: GridDimensions) -> Self {
        let shorter = dims.width.min(dims.height);
        // a square grid's longest diagonal already counts as the first decrease
        let boundary = if dims.width == dims.height {
            shorter.saturating_sub(1)
        } else {
            shorter
        };
        if d < boundary {
            Phase::Increasing
        } else {
            Phase::Decreasing
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Phase::Increasing => "increase",
            Phase::Decreasing => "decrease",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: usize, height: usize) -> GridDimensions {
        GridDimensions { width, height }
    }

    #[test]
    fn corners_fix_orientation() {
        for w in 1..=40 {
            for h in 1..=40 {
                let d = dims(w, h);
                assert_eq!(diagonal(h - 1, w - 1, d), 0);
                assert_eq!(diagonal(0, 0, d), w + h - 2);
            }
        }
    }

    #[test]
    fn diagonals_partition_the_grid() {
        for (w, h) in [(1, 1), (3, 2), (2, 3), (4, 1), (1, 4), (7, 7), (40, 13)] {
            let d = dims(w, h);
            let mut seen = vec![vec![0u32; w]; h];
            let mut total = 0;
            for idx in diagonals(d) {
                for cell in cells_on_diagonal(idx, d) {
                    assert_eq!(diagonal(cell.row, cell.col, d), idx);
                    seen[cell.row][cell.col] += 1;
                    total += 1;
                }
            }
            assert_eq!(total, d.cell_count());
            assert!(seen.iter().flatten().all(|&n| n == 1));
            assert_eq!(diagonals(d).count(), diagonal_count(d));
        }
    }

    #[test]
    fn cells_start_at_bottom_edge() {
        let cells = cells_on_diagonal(2, dims(3, 3));
        assert_eq!(
            cells,
            vec![CellCoord::new(2, 0), CellCoord::new(1, 1), CellCoord::new(0, 2)]
        );
        assert!(cells_on_diagonal(9, dims(3, 3)).is_empty());
    }

    #[test]
    fn phase_switches_at_shorter_edge() {
        for (w, h) in [(3, 2), (2, 3), (10, 4), (1, 5), (40, 39)] {
            let d = dims(w, h);
            let m = w.min(h);
            assert_eq!(Phase::of(m - 1, d), Phase::Increasing);
            assert_eq!(Phase::of(m, d), Phase::Decreasing);
            assert_eq!(Phase::of(w + h - 2, d), Phase::Decreasing);
        }
    }

    #[test]
    fn square_grid_longest_diagonal_is_decreasing() {
        for n in 1..=40 {
            let d = dims(n, n);
            assert_eq!(Phase::of(n - 1, d), Phase::Decreasing);
            if n > 1 {
                assert_eq!(Phase::of(n - 2, d), Phase::Increasing);
            }
        }
    }
}
