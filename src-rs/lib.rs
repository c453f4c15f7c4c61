//! Corner-to-corner (C2C) crochet chart core.
//!
//! A [`Grid`] of colours is edited by painting cells or by sampling an
//! image into it. Everything downstream is a pure function of the grid:
//! [`instructions::generate`] produces the diagonal working rows,
//! [`render::render_chart`] draws the chart, and [`ExportRecord`] snapshots
//! the pattern for the JSON, text and printable exports. Writing files is
//! left to the caller.

pub mod color;
pub mod config;
pub mod diagonal;
pub mod error;
pub mod export;
pub mod grid;
pub mod instructions;
pub mod printable;
pub mod render;
pub mod sampler;
pub mod text;

pub use color::{Color, PALETTE};
pub use config::ChartOptions;
pub use error::ChartError;
pub use export::{ExportRecord, YarnWeight};
pub use grid::{CellCoord, Grid, GridDimensions};
pub use instructions::{InstructionRow, Instructions, LegendOrder};
