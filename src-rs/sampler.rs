use crate::color::Color;
use crate::error::ChartError;
use crate::grid::{Grid, GridDimensions};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Samples an already-decoded image into a grid of the given size.
///
/// The image is stretched (never cropped) to exactly `width x height`
/// pixels with nearest-neighbour filtering, so each cell takes the colour of
/// a single source pixel. Aspect ratio is not preserved.
pub fn sample_image(img: &DynamicImage, dims: GridDimensions) -> Grid {
    let (src_w, src_h) = img.dimensions();
    let scaled = img
        .resize_exact(dims.width as u32, dims.height as u32, FilterType::Nearest)
        .to_rgba8();
    log::debug!(
        "sampled {src_w}x{src_h} image into {}x{} grid ({} cells)",
        dims.width,
        dims.height,
        dims.cell_count()
    );

    let rows = (0..dims.height as u32)
        .map(|y| {
            (0..dims.width as u32)
                .map(|x| Color::from_rgba(*scaled.get_pixel(x, y)))
                .collect()
        })
        .collect();

    // dims came from a clamped GridDimensions, so the shape is always valid
    Grid::from_rows(rows).unwrap_or_else(|_| Grid::new(dims))
}

/// Decodes raw image bytes (any format the enabled codecs support) and
/// samples them.
pub fn sample_bytes(bytes: &[u8], dims: GridDimensions) -> Result<Grid, ChartError> {
    let img = image::load_from_memory(bytes).map_err(ChartError::Decode)?;
    Ok(sample_image(&img, dims))
}

impl Grid {
    /// Replaces the grid contents with a sampled image at the current size.
    /// On a decode failure the grid is left exactly as it was.
    pub fn import_image(&mut self, bytes: &[u8]) -> Result<(), ChartError> {
        let sampled = sample_bytes(bytes, self.dims())?;
        *self = sampled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn quadrants(size: u32) -> RgbaImage {
        let half = size / 2;
        RgbaImage::from_fn(size, size, |x, y| match (x < half, y < half) {
            (true, true) => Rgba([255, 0, 0, 255]),
            (false, true) => Rgba([0, 255, 0, 255]),
            (true, false) => Rgba([0, 0, 255, 255]),
            (false, false) => Rgba([0, 0, 0, 128]),
        })
    }

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn one_sample_per_cell() {
        let img = DynamicImage::ImageRgba8(quadrants(8));
        let grid = sample_image(&img, GridDimensions { width: 2, height: 2 });
        assert_eq!(grid.get(0, 0), Some(Color::RED));
        assert_eq!(grid.get(0, 1), Some(Color::GREEN));
        assert_eq!(grid.get(1, 0), Some(Color::BLUE));
        // half-transparent black stays black
        assert_eq!(grid.get(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn output_matches_grid_size_not_image_aspect() {
        let pixel = Rgba([0x66, 0x33, 0x00, 255]);
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, pixel));
        let grid = sample_image(&img, GridDimensions { width: 7, height: 3 });
        assert_eq!(grid.dims(), GridDimensions { width: 7, height: 3 });
        assert!(grid.rows().iter().flatten().all(|&c| c == Color::rgb(0x66, 0x33, 0x00)));
    }

    #[test]
    fn import_replaces_grid_from_png_bytes() {
        let mut grid = Grid::new(GridDimensions { width: 2, height: 2 });
        grid.import_image(&png_bytes(quadrants(4))).unwrap();
        assert_eq!(grid.get(0, 0), Some(Color::RED));
        assert_eq!(grid.get(1, 0), Some(Color::BLUE));
    }

    #[test]
    fn undecodable_bytes_leave_grid_untouched() {
        let mut grid = Grid::new(GridDimensions { width: 3, height: 3 });
        grid.set_cell(1, 1, Color::RED).unwrap();
        let before = grid.clone();
        let err = grid.import_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ChartError::Decode(_)));
        assert_eq!(grid, before);
    }
}
