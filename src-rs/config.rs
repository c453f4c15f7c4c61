//! Editor options and output locations.
//!
//! None of these settings change stored cell colours; they only affect how
//! a chart is drawn, labelled or where its exports land.

use crate::color::Color;
use crate::export::YarnWeight;
use crate::grid::{GridDimensions, MAX_DIMENSION, MIN_DIMENSION};
use std::env;
use std::path::PathBuf;

pub const OUT_DIR_ENV: &str = "C2C_OUT_DIR";
pub const DEFAULT_OUT_DIR: &str = ".c2c-chart";
pub const DEFAULT_PAINT_COLOR: Color = Color::RED;
pub const DEFAULT_CELL_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Edge length of one block in pixels.
    pub cell_size: u32,
    pub show_numbers: bool,
    pub show_guides: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            show_numbers: true,
            show_guides: true,
        }
    }
}

/// Reads a dimension typed by the user. A leading integer is used if there
/// is one; anything else (or zero) becomes 1, and the result is clamped to
/// the editable range. Digit runs too long for `i64` saturate.
pub fn parse_dimension(raw: &str) -> usize {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(idx, ch)| !(ch.is_ascii_digit() || (idx == 0 && matches!(ch, '-' | '+'))))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    let number = &trimmed[..end];
    let has_digits = number.bytes().any(|b| b.is_ascii_digit());
    let value = match number.parse::<i64>() {
        Ok(0) => 1,
        Ok(v) => v,
        Err(_) if has_digits && number.starts_with('-') => i64::MIN,
        Err(_) if has_digits => i64::MAX,
        Err(_) => 1,
    };
    let clamped = value.clamp(MIN_DIMENSION as i64, MAX_DIMENSION as i64) as usize;
    if trimmed != clamped.to_string() {
        log::warn!("dimension input {raw:?} corrected to {clamped}");
    }
    clamped
}

pub fn parse_dimensions(width: &str, height: &str) -> GridDimensions {
    GridDimensions {
        width: parse_dimension(width),
        height: parse_dimension(height),
    }
}

pub fn out_root() -> PathBuf {
    env::var(OUT_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pattern,
    Chart,
    Printable,
    Instructions,
}

impl ExportKind {
    pub fn file_name(self, yarn: YarnWeight) -> String {
        let id = yarn.id();
        match self {
            ExportKind::Pattern => format!("c2c-chart-{id}.json"),
            ExportKind::Chart => format!("c2c-chart-{id}.png"),
            ExportKind::Printable => format!("c2c-chart-{id}.html"),
            ExportKind::Instructions => format!("c2c-instructions-{id}.txt"),
        }
    }

    pub fn default_path(self, yarn: YarnWeight) -> PathBuf {
        out_root().join(self.file_name(yarn))
    }
}
