use crate::diagonal::Phase;
use crate::error::ChartError;
use crate::export::ExportRecord;
use crate::grid::GridDimensions;
use crate::instructions::{self, InstructionRow, Instructions, LegendOrder};
use std::fmt::Write;

const STITCH_GUIDE: &str = "BASIC C2C STITCHES:
Starting chain: ch 6
First block: dc in 4th ch from hook and in next 2 ch
Chain between blocks: ch 6
Standard block: dc in 4th ch from hook and in next 2 ch, slip stitch to corner ch-3 space of previous row, ch 3
Decreasing: slip stitch across the top of the last block, do not make a new block
";

pub fn row_line(row: &InstructionRow) -> String {
    let noun = if row.block_count == 1 { "block" } else { "blocks" };
    format!(
        "Row {} ({} {noun}, {}): {}",
        row.number(),
        row.block_count,
        row.phase.verb(),
        row.color_summary()
    )
}

/// Plain-text written pattern for `record`. Rows are generated from the
/// record's own grid, so a malformed record is an error.
pub fn written_instructions(
    record: &ExportRecord,
    order: LegendOrder,
) -> Result<String, ChartError> {
    let grid = record.to_grid()?;
    let rows = instructions::generate_with(&grid, order);
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_instructions(&mut out, grid.dims(), record, &rows);
    Ok(out)
}

fn write_instructions(
    out: &mut String,
    dims: GridDimensions,
    record: &ExportRecord,
    instructions: &Instructions,
) -> std::fmt::Result {
    writeln!(out, "C2C CROCHET PATTERN - WRITTEN INSTRUCTIONS")?;
    writeln!(out)?;
    writeln!(out, "Pattern Size: {} × {} blocks", dims.width, dims.height)?;
    writeln!(out, "Yarn Weight: {}", record.yarn_type().display_name())?;
    writeln!(out)?;

    writeln!(out, "COLOR KEY:")?;
    for entry in instructions.legend.entries() {
        writeln!(out, "{}: [HEX: {}]", entry.label(), entry.color)?;
    }
    writeln!(out)?;

    out.push_str(STITCH_GUIDE);
    writeln!(out)?;

    writeln!(out, "PATTERN INSTRUCTIONS:")?;
    writeln!(
        out,
        "Note: Start in the bottom-right corner and work diagonally toward the top-left."
    )?;
    writeln!(out)?;
    writeln!(out, "INCREASING SECTION:")?;

    let mut decreasing = false;
    for row in &instructions.rows {
        if row.phase == Phase::Decreasing && !decreasing {
            decreasing = true;
            writeln!(out)?;
            writeln!(out, "DECREASING SECTION:")?;
        }
        writeln!(out, "{}", row_line(row))?;
    }

    writeln!(out)?;
    writeln!(out, "Finish off and weave in ends.")?;
    Ok(())
}
