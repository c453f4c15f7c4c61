//! Chart rasterisation.
//!
//! [`render_chart`] turns a grid into an `RgbaImage`; [`encode_png`] turns
//! that into bytes. Nothing here touches the filesystem.

use crate::config::ChartOptions;
use crate::diagonal::diagonal;
use crate::error::ChartError;
use crate::grid::Grid;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Space reserved above and left of the cells for row/column numbers.
pub const LABEL_MARGIN: u32 = 40;

const CANVAS: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CELL_BORDER: Rgba<u8> = Rgba([0xCC, 0xCC, 0xCC, 255]);
const LABEL_TEXT: Rgba<u8> = Rgba([0x66, 0x66, 0x66, 255]);
const GUIDE_BAND: Rgba<u8> = Rgba([100, 100, 100, 48]);
const GLYPH: i32 = 8;

pub fn render_chart(grid: &Grid, opts: &ChartOptions) -> RgbaImage {
    let cell = opts.cell_size.max(1);
    let offset = if opts.show_numbers { LABEL_MARGIN } else { 0 };
    let (cols, rows) = (grid.width() as u32, grid.height() as u32);
    let mut img = RgbaImage::from_pixel(cols * cell + offset, rows * cell + offset, CANVAS);
    log::debug!(
        "rendering {cols}x{rows} chart at {}x{} px",
        img.width(),
        img.height()
    );

    for (y, row) in grid.rows().iter().enumerate() {
        for (x, color) in row.iter().enumerate() {
            let px = offset + x as u32 * cell;
            let py = offset + y as u32 * cell;
            fill_rect(&mut img, px, py, cell, cell, color.to_rgba());
            if opts.show_guides && diagonal(y, x, grid.dims()) % 2 == 0 {
                fill_rect(&mut img, px, py, cell, cell, GUIDE_BAND);
            }
            draw_rect_outline(&mut img, px, py, cell, cell, CELL_BORDER);
        }
    }

    if opts.show_numbers {
        draw_axis_labels(&mut img, grid, cell, offset);
    }
    img
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ChartError> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(ChartError::Encode)?;
    Ok(out)
}

pub fn render_png(grid: &Grid, opts: &ChartOptions) -> Result<Vec<u8>, ChartError> {
    encode_png(&render_chart(grid, opts))
}

/// Columns count down from `width` left to right, rows count down from
/// `height` top to bottom, so (1, 1) is the bottom-right starting block.
fn draw_axis_labels(img: &mut RgbaImage, grid: &Grid, cell: u32, offset: u32) {
    let cell_i = cell as i32;
    let offset_i = offset as i32;
    let text_y = (offset_i - GLYPH) / 2;

    for i in 0..grid.width() {
        let label = (grid.width() - i).to_string();
        let center = offset_i + i as i32 * cell_i + cell_i / 2;
        draw_bitmap_text(img, center - text_width(&label) / 2, text_y, &label, LABEL_TEXT);
    }
    for i in 0..grid.height() {
        let label = (grid.height() - i).to_string();
        let center = offset_i + i as i32 * cell_i + cell_i / 2;
        let x = (offset_i - text_width(&label)) / 2;
        draw_bitmap_text(img, x, center - GLYPH / 2, &label, LABEL_TEXT);
    }
}

fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH
}

fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = f64::from(src[3]) / 255.0;
    if a <= 0.0 {
        return dst;
    }
    let inv = 1.0 - a;
    let mix = |d: u8, s: u8| {
        (f64::from(d) * inv + f64::from(s) * a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    let out_a = (f64::from(dst[3]) + f64::from(src[3]) * inv)
        .round()
        .clamp(0.0, 255.0) as u8;
    Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), out_a])
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x1 = (x + w).min(img.width());
    let y1 = (y + h).min(img.height());
    for yy in y..y1 {
        for xx in x..x1 {
            let dst = *img.get_pixel(xx, yy);
            img.put_pixel(xx, yy, blend_pixel(dst, color));
        }
    }
}

fn draw_rect_outline(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    if w == 0 || h == 0 || img.width() == 0 || img.height() == 0 {
        return;
    }
    let x0 = x.min(img.width() - 1);
    let y0 = y.min(img.height() - 1);
    let x1 = (x + w - 1).min(img.width() - 1);
    let y1 = (y + h - 1).min(img.height() - 1);
    for xx in x0..=x1 {
        img.put_pixel(xx, y0, color);
        img.put_pixel(xx, y1, color);
    }
    for yy in y0..=y1 {
        img.put_pixel(x0, yy, color);
        img.put_pixel(x1, yy, color);
    }
}

fn draw_bitmap_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>) {
    let mut cursor_x = x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += GLYPH;
            continue;
        };
        for (row_idx, &row_bits) in glyph.iter().enumerate() {
            for col_idx in 0..GLYPH {
                if (row_bits >> col_idx) & 1 == 0 {
                    continue;
                }
                let tx = cursor_x + col_idx;
                let ty = y + row_idx as i32;
                if tx >= 0 && ty >= 0 && tx < img.width() as i32 && ty < img.height() as i32 {
                    let dst = *img.get_pixel(tx as u32, ty as u32);
                    img.put_pixel(tx as u32, ty as u32, blend_pixel(dst, color));
                }
            }
        }
        cursor_x += GLYPH;
    }
}
