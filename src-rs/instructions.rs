//! Working-row generation for corner-to-corner charts.
//!
//! [`generate`] walks every diagonal from the bottom-right corner to the
//! top-left corner and run-length encodes the colours along it. The result
//! is plain data; `text` and `printable` format it.

use crate::color::Color;
use crate::diagonal::{cells_on_diagonal, diagonals, Phase};
use crate::grid::Grid;
use serde::Serialize;
use std::collections::HashMap;

/// Order in which legend ordinals are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendOrder {
    /// Row-major scan of the grid, top-left first.
    #[default]
    GridScan,
    /// First appearance while walking the working rows.
    DiagonalWalk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    pub name: Option<&'static str>,
    pub ordinal: usize,
}

impl LegendEntry {
    pub fn label(&self) -> String {
        match self.name {
            Some(name) => format!("{name} (Color {})", self.ordinal),
            None => format!("Color {}", self.ordinal),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorLegend {
    entries: Vec<LegendEntry>,
    index: HashMap<Color, usize>,
}

impl ColorLegend {
    pub fn build(grid: &Grid, order: LegendOrder) -> Self {
        let colors = match order {
            LegendOrder::GridScan => grid.used_colors(),
            LegendOrder::DiagonalWalk => {
                let mut seen = Vec::new();
                for d in diagonals(grid.dims()) {
                    for cell in cells_on_diagonal(d, grid.dims()) {
                        if let Some(color) = grid.get(cell.row, cell.col) {
                            if !color.is_background() && !seen.contains(&color) {
                                seen.push(color);
                            }
                        }
                    }
                }
                seen
            }
        };

        let mut legend = Self::default();
        for (idx, color) in colors.into_iter().enumerate() {
            legend.index.insert(color, idx);
            legend.entries.push(LegendEntry {
                color,
                name: color.palette_name(),
                ordinal: idx + 1,
            });
        }
        legend
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, color: Color) -> Option<&LegendEntry> {
        self.index.get(&color).map(|&idx| &self.entries[idx])
    }

    /// Background is never part of the legend; it always reads "Background".
    pub fn label(&self, color: Color) -> String {
        if color.is_background() {
            return "Background".to_string();
        }
        self.get(color)
            .map(LegendEntry::label)
            .unwrap_or_else(|| color.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorRun {
    pub color: Color,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionRow {
    pub diagonal_index: usize,
    pub block_count: usize,
    pub phase: Phase,
    /// Empty when every block in the row is background.
    pub runs: Vec<ColorRun>,
}

impl InstructionRow {
    /// One-based row number as written in the pattern.
    pub fn number(&self) -> usize {
        self.diagonal_index + 1
    }

    pub fn is_all_background(&self) -> bool {
        self.runs.is_empty()
    }

    /// `"2 Red (Color 1), 1 Blue (Color 2)"` or `"All background"`.
    pub fn color_summary(&self) -> String {
        if self.runs.is_empty() {
            return "All background".to_string();
        }
        self.runs
            .iter()
            .map(|run| format!("{} {}", run.count, run.label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    pub legend: ColorLegend,
    pub rows: Vec<InstructionRow>,
}

impl Instructions {
    /// Index into `rows` of the first decreasing row, if any.
    pub fn decrease_start(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.phase == Phase::Decreasing)
    }
}

pub fn generate(grid: &Grid) -> Instructions {
    generate_with(grid, LegendOrder::default())
}

pub fn generate_with(grid: &Grid, order: LegendOrder) -> Instructions {
    let dims = grid.dims();
    let legend = ColorLegend::build(grid, order);
    let mut rows = Vec::with_capacity(dims.width + dims.height - 1);

    for d in diagonals(dims) {
        let blocks: Vec<Color> = cells_on_diagonal(d, dims)
            .into_iter()
            .filter_map(|cell| grid.get(cell.row, cell.col))
            .collect();
        if blocks.is_empty() {
            continue;
        }
        rows.push(InstructionRow {
            diagonal_index: d,
            block_count: blocks.len(),
            phase: Phase::of(d, dims),
            runs: encode_runs(&blocks, &legend),
        });
    }

    log::debug!(
        "generated {} working rows for {}x{} grid with {} colors",
        rows.len(),
        dims.width,
        dims.height,
        legend.entries().len()
    );

    Instructions { legend, rows }
}

/// Groups consecutive equal colours. Background blocks end the open run and
/// are never emitted themselves.
pub fn encode_runs(blocks: &[Color], legend: &ColorLegend) -> Vec<ColorRun> {
    let mut runs = Vec::new();
    let mut current: Option<(Color, usize)> = None;

    for &color in blocks {
        if color.is_background() {
            if let Some((open, count)) = current.take() {
                runs.push(make_run(open, count, legend));
            }
            continue;
        }
        current = match current {
            Some((open, count)) if open == color => Some((open, count + 1)),
            Some((open, count)) => {
                runs.push(make_run(open, count, legend));
                Some((color, 1))
            }
            None => Some((color, 1)),
        };
    }

    if let Some((open, count)) = current {
        runs.push(make_run(open, count, legend));
    }
    runs
}

fn make_run(color: Color, count: usize, legend: &ColorLegend) -> ColorRun {
    ColorRun {
        color,
        label: legend.label(color),
        count,
    }
}
