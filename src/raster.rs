//! Module matrix to pixel rasterization.

use image::{Rgba, RgbaImage};

use crate::layout::GridLayout;
use crate::matrix::ModuleMatrix;
use crate::request::StyleSpec;

/// Renders `matrix` into a `size` x `size` image.
///
/// Dark modules take the foreground color, everything else (light modules and the
/// centering margin) the background.
///
/// # Example
///
/// ```
/// use qrlogo::matrix::{CorrectionLevel, ModuleSource, QrCodeSource};
/// use qrlogo::raster::render_matrix;
/// use qrlogo::request::StyleSpec;
///
/// let matrix = QrCodeSource.encode("Hello", CorrectionLevel::High).unwrap();
/// let img = render_matrix(&matrix, &StyleSpec::default(), 256);
/// assert_eq!(img.dimensions(), (256, 256));
/// ```
pub fn render_matrix(matrix: &ModuleMatrix, style: &StyleSpec, size: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, style.background);
    let grid = GridLayout::new(size, matrix.size() as u32);

    for (col, row) in matrix.dark_modules() {
        let (x0, x1) = grid.span(col as u32);
        let (y0, y1) = grid.span(row as u32);
        fill_rect(&mut img, x0, y0, x1 - x0, y1 - y0, style.foreground);
    }
    img
}

/// Overwrites a rectangle with `color`, clipped to the image bounds.
pub(crate) fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};

    fn checker() -> ModuleMatrix {
        ModuleMatrix::from_modules(3, vec![true, false, true, false, true, false, true, false, true]).unwrap()
    }

    #[test]
    fn output_is_exactly_requested_size() {
        for size in [1, 2, 3, 10, 100, 1024] {
            let img = render_matrix(&checker(), &StyleSpec::default(), size);
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn modules_map_to_blocks() {
        let img = render_matrix(&checker(), &StyleSpec::default(), 31);
        // 10px modules; the single pixel of slack ends up on the right and bottom.
        let grid = GridLayout::new(31, 3);
        assert_eq!(grid.margin(), 0);
        assert_eq!(*img.get_pixel(0, 0), DEFAULT_FOREGROUND);
        assert_eq!(*img.get_pixel(15, 5), DEFAULT_BACKGROUND);
        assert_eq!(*img.get_pixel(15, 15), DEFAULT_FOREGROUND);
        assert_eq!(*img.get_pixel(30, 30), DEFAULT_BACKGROUND);
    }

    #[test]
    fn uses_requested_colors() {
        let style = StyleSpec {
            foreground: Rgba([200, 0, 0, 255]),
            background: Rgba([0, 0, 200, 255]),
        };
        let img = render_matrix(&checker(), &style, 30);
        assert_eq!(*img.get_pixel(5, 5), style.foreground);
        assert_eq!(*img.get_pixel(15, 5), style.background);
    }

    #[test]
    fn fill_is_clipped() {
        let mut img = RgbaImage::new(4, 4);
        fill_rect(&mut img, 2, 2, 10, 10, DEFAULT_FOREGROUND);
        assert_eq!(*img.get_pixel(3, 3), DEFAULT_FOREGROUND);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }
}
