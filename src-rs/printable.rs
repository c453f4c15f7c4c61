//! Printable HTML view of a pattern.

use crate::config::ChartOptions;
use crate::diagonal::diagonal;
use crate::error::ChartError;
use crate::export::ExportRecord;
use crate::grid::Grid;
use crate::instructions::{self, Instructions};
use crate::text::row_line;
use std::fmt::Write;

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; padding: 20px; }
    .grid-container { margin: 20px 0; }
    .row { display: flex; }
    .cell { width: 20px; height: 20px; border: 1px solid #ccc; box-sizing: border-box; }
    .diagonal-0 { box-shadow: inset 0 0 0 20px rgba(200, 200, 200, 0.1); }
    .diagonal-1 { box-shadow: inset 0 0 0 20px rgba(200, 200, 200, 0.2); }
    .number { width: 20px; height: 20px; display: flex; align-items: center; justify-content: center; font-size: 10px; color: #666; }
    .info { margin-bottom: 20px; font-size: 14px; }
    .instructions { margin-top: 30px; font-size: 14px; line-height: 1.5; }
    table.color-key { border-collapse: collapse; margin-top: 20px; }
    table.color-key td, table.color-key th { border: 1px solid #ddd; padding: 8px; }
    .color-sample { width: 20px; height: 20px; display: inline-block; border: 1px solid #ddd; }
    @media print { button { display: none; } }
"#;

const HOW_TO_READ: &str = r#"<div class="instructions">
<h2>How to Read This C2C Chart</h2>
<p>Corner to corner crochet works diagonally, starting from one corner and working to the opposite corner. Each square represents one "block" or "tile" in your work.</p>
<p><strong>Starting:</strong> Begin at the bottom-right corner and work diagonally towards the top-left.</p>
<p><strong>Increasing:</strong> Add one block at the beginning of each row until you reach the maximum width of the pattern.</p>
<p><strong>Decreasing:</strong> After reaching the maximum width, decrease one block at the beginning of each row until you reach the opposite corner.</p>
<p><strong>Color Changes:</strong> Change yarn color at the end of a block before making the chain for the next block.</p>
<p><strong>Reading the Chart:</strong> Each diagonal line represents one row of blocks. The shaded diagonal lines help you see which blocks are worked together in one row.</p>
</div>
"#;

/// Printable HTML page for `record`. The chart, colour key and written rows
/// all come from the record's validated grid.
pub fn printable_html(record: &ExportRecord, opts: &ChartOptions) -> Result<String, ChartError> {
    let grid = record.to_grid()?;
    let rows = instructions::generate(&grid);
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_page(&mut out, record, &grid, &rows, opts);
    Ok(out)
}

fn write_page(
    out: &mut String,
    record: &ExportRecord,
    grid: &Grid,
    instructions: &Instructions,
    opts: &ChartOptions,
) -> std::fmt::Result {
    let dims = grid.dims();
    let (width, height) = (dims.width, dims.height);
    let created = record
        .created_at()
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| record.timestamp().to_string());

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>C2C Crochet Chart</title>")?;
    writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>")?;
    writeln!(out, "<h1>C2C (Corner to Corner) Crochet Chart</h1>")?;
    writeln!(out, "<div class=\"info\">")?;
    writeln!(
        out,
        "<p><strong>Yarn Weight:</strong> {}</p>",
        record.yarn_type().display_name()
    )?;
    writeln!(out, "<p><strong>Grid Size:</strong> {width} × {height}</p>")?;
    writeln!(out, "<p><strong>Date Created:</strong> {created}</p>")?;
    writeln!(out, "</div>")?;

    writeln!(out, "<div class=\"grid-container\">")?;
    if opts.show_numbers {
        out.push_str("<div class=\"row\"><div class=\"number\"></div>");
        for i in 0..width {
            write!(out, "<div class=\"number\">{}</div>", width - i)?;
        }
        out.push_str("</div>\n");
    }
    for (y, row) in grid.rows().iter().enumerate() {
        out.push_str("<div class=\"row\">");
        if opts.show_numbers {
            write!(out, "<div class=\"number\">{}</div>", height - y)?;
        }
        for (x, color) in row.iter().enumerate() {
            let band = if opts.show_guides {
                format!(" diagonal-{}", diagonal(y, x, dims) % 2)
            } else {
                String::new()
            };
            write!(
                out,
                "<div class=\"cell{band}\" style=\"background-color: {color}\"></div>"
            )?;
        }
        out.push_str("</div>\n");
    }
    writeln!(out, "</div>")?;

    if !instructions.legend.is_empty() {
        writeln!(out, "<h2>Color Key</h2>")?;
        writeln!(out, "<table class=\"color-key\">")?;
        writeln!(out, "<tr><th>Color</th><th>Sample</th><th>Hex</th></tr>")?;
        for entry in instructions.legend.entries() {
            writeln!(
                out,
                "<tr><td>{}</td><td><div class=\"color-sample\" style=\"background-color: {}\"></div></td><td>{}</td></tr>",
                entry.label(),
                entry.color,
                entry.color
            )?;
        }
        writeln!(out, "</table>")?;
    }

    writeln!(out, "<h2>Written Instructions</h2>")?;
    writeln!(out, "<ol class=\"rows\">")?;
    for row in &instructions.rows {
        writeln!(out, "<li>{}</li>", row_line(row))?;
    }
    writeln!(out, "</ol>")?;

    out.push_str(HOW_TO_READ);
    writeln!(out, "<button onclick=\"window.print()\">Print Pattern</button>")?;
    writeln!(out, "</body>\n</html>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::export::YarnWeight;
    use crate::grid::GridDimensions;
    use crate::instructions::{generate, LegendOrder};
    use crate::text::written_instructions;

    fn record() -> ExportRecord {
        let mut grid = Grid::new(GridDimensions { width: 3, height: 2 });
        grid.set_cell(0, 0, Color::RED).unwrap();
        grid.set_cell(1, 2, Color::rgb(0x12, 0x34, 0x56)).unwrap();
        ExportRecord::snapshot(&grid, YarnWeight::Light)
    }

    fn page(rec: &ExportRecord, opts: &ChartOptions) -> String {
        printable_html(rec, opts).unwrap()
    }

    #[test]
    fn numbering_runs_in_reverse() {
        let html = page(&record(), &ChartOptions::default());
        assert!(html.contains(concat!(
            "<div class=\"row\"><div class=\"number\"></div>",
            "<div class=\"number\">3</div><div class=\"number\">2</div>",
            "<div class=\"number\">1</div></div>"
        )));
        let first_row = html.find("<div class=\"row\"><div class=\"number\">2</div>").unwrap();
        let second_row = html.find("<div class=\"row\"><div class=\"number\">1</div>").unwrap();
        assert!(first_row < second_row);
        assert!(html.contains("Light/DK (Size 3)"));
    }

    #[test]
    fn guides_and_numbers_can_be_hidden() {
        let opts = ChartOptions {
            show_numbers: false,
            show_guides: false,
            ..ChartOptions::default()
        };
        let html = page(&record(), &opts);
        assert!(!html.contains("class=\"number\""));
        assert!(!html.contains("cell diagonal-"));
        assert_eq!(html.matches("<div class=\"cell\"").count(), 6);
    }

    #[test]
    fn bottom_right_cell_is_band_zero() {
        let html = page(&record(), &ChartOptions::default());
        assert!(html.contains(
            "<div class=\"cell diagonal-0\" style=\"background-color: #123456\"></div></div>"
        ));
    }

    #[test]
    fn legend_and_rows_match_text_output() {
        let rec = record();
        let rows = generate(&rec.to_grid().unwrap());
        let html = page(&rec, &ChartOptions::default());
        let text = written_instructions(&rec, LegendOrder::GridScan).unwrap();
        for entry in rows.legend.entries() {
            assert!(html.contains(&format!("<td>{}</td>", entry.label())));
            assert!(text.contains(&entry.label()));
        }
        for line in text.lines().filter(|l| l.starts_with("Row ")) {
            assert!(html.contains(&format!("<li>{line}</li>")));
        }
    }

    #[test]
    fn blank_grid_has_no_color_key() {
        let blank = Grid::new(GridDimensions { width: 2, height: 2 });
        let rec = ExportRecord::snapshot(&blank, YarnWeight::Medium);
        let html = page(&rec, &ChartOptions::default());
        assert!(!html.contains("Color Key"));
        assert!(html.contains("How to Read This C2C Chart"));
    }

    #[test]
    fn size_mismatch_is_an_error_not_a_panic() {
        let raw = r##"{"grid":[["#FF0000","#FFFFFF","#FFFFFF"],["#FFFFFF","#FFFFFF","#123456"]],
            "size":{"width":2,"height":2},"yarnType":"light","type":"c2c_crochet",
            "timestamp":"2024-01-01T00:00:00.000Z"}"##;
        let rec: ExportRecord = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            printable_html(&rec, &ChartOptions::default()),
            Err(ChartError::InvalidRecord(_))
        ));
    }
}
