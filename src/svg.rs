//! SVG rendering of a module matrix and an optional logo.
//!
//! The document is built from the matrix directly instead of tracing the raster
//! output. Module positions come from the same [`GridLayout`] the raster renderer
//! uses, and a logo is placed with the same [`FittedLogo`], so both outputs line up
//! pixel for pixel.

use std::fmt::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::color::to_hex;
use crate::layout::GridLayout;
use crate::logo::{FittedLogo, Logo};
use crate::matrix::ModuleMatrix;
use crate::request::StyleSpec;

/// Returns an SVG document depicting `matrix` on a `size` x `size` canvas.
///
/// The background is one full-canvas rectangle, each dark module one more rectangle.
/// A vector logo is painted over a background-colored clear square and embedded as a
/// nested SVG document. Raster logos cannot be expressed as vector paths and are left
/// out. The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(matrix: &ModuleMatrix, style: &StyleSpec, size: u32, logo: Option<(&Logo, &FittedLogo)>) -> String {
    let grid = GridLayout::new(size, matrix.size() as u32);
    let foreground = to_hex(style.foreground);
    let background = to_hex(style.background);

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    // Writing into a String cannot fail.
    let _ = writeln!(
        result,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\" shape-rendering=\"crispEdges\">"
    );
    let _ = writeln!(result, "\t<rect width=\"{size}\" height=\"{size}\" fill=\"{background}\"/>");

    let _ = writeln!(result, "\t<g fill=\"{foreground}\">");
    for (col, row) in matrix.dark_modules() {
        let (x0, x1) = grid.span(col as u32);
        let (y0, y1) = grid.span(row as u32);
        if x1 > x0 && y1 > y0 {
            let _ = writeln!(result, "\t\t<rect x=\"{x0}\" y=\"{y0}\" width=\"{}\" height=\"{}\"/>", x1 - x0, y1 - y0);
        }
    }
    result += "\t</g>\n";

    match logo {
        Some((Logo::Vector { source, .. }, fit)) => {
            let _ = writeln!(
                result,
                "\t<rect x=\"{}\" y=\"{}\" width=\"{side}\" height=\"{side}\" fill=\"{background}\"/>",
                fit.clear_offset_x,
                fit.clear_offset_y,
                side = fit.clear_side
            );
            let _ = writeln!(
                result,
                "\t<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" xlink:href=\"data:image/svg+xml;base64,{}\"/>",
                fit.offset_x,
                fit.offset_y,
                fit.inner_width,
                fit.inner_height,
                STANDARD.encode(source)
            );
        }
        Some((Logo::Raster(_), _)) => {
            tracing::debug!("raster logos are not embedded in vector output");
        }
        None => {}
    }

    result += "</svg>\n";
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::{fit_logo, LogoAsset, LogoKind};
    use image::{DynamicImage, RgbaImage};
    use std::io::Cursor;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10" fill="#0000ff"/></svg>"##;

    fn diagonal() -> ModuleMatrix {
        ModuleMatrix::from_modules(3, vec![true, false, false, false, true, false, false, false, true]).unwrap()
    }

    #[test]
    fn starts_with_prolog_and_sizes_canvas() {
        let svg = to_svg_string(&diagonal(), &StyleSpec::default(), 100, None);
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 100 100\""));
        assert!(svg.contains("<rect width=\"100\" height=\"100\" fill=\"#ffffff\"/>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn one_rect_per_dark_module() {
        // 100 / 3 = 33 per module, 1px of slack gives no margin.
        let svg = to_svg_string(&diagonal(), &StyleSpec::default(), 100, None);
        assert_eq!(svg.matches("<rect x=").count(), 3);
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"33\" height=\"33\"/>"));
        assert!(svg.contains("<rect x=\"33\" y=\"33\" width=\"33\" height=\"33\"/>"));
        assert!(svg.contains("<rect x=\"66\" y=\"66\" width=\"33\" height=\"33\"/>"));
    }

    #[test]
    fn centers_slack_like_raster() {
        // 104 / 3 = 34 per module, 2px of slack gives a 1px margin.
        let svg = to_svg_string(&diagonal(), &StyleSpec::default(), 104, None);
        assert!(svg.contains("<rect x=\"1\" y=\"1\" width=\"34\" height=\"34\"/>"));
        assert!(svg.contains("<rect x=\"69\" y=\"69\" width=\"34\" height=\"34\"/>"));
    }

    #[test]
    fn embeds_vector_logo_at_fitted_position() {
        let logo = LogoAsset::new(SQUARE_SVG.as_bytes().to_vec(), LogoKind::Vector).decode().unwrap();
        let fit = fit_logo(Some(logo.intrinsic_size()), 1024, 1024, 0.24, 0.02).unwrap();
        let svg = to_svg_string(&diagonal(), &StyleSpec::default(), 1024, Some((&logo, &fit)));

        assert!(svg.contains("<rect x=\"389\" y=\"389\" width=\"245\" height=\"245\" fill=\"#ffffff\"/>"));
        assert!(svg.contains(&format!(
            "<image x=\"409\" y=\"409\" width=\"205\" height=\"205\" xlink:href=\"data:image/svg+xml;base64,{}\"/>",
            STANDARD.encode(SQUARE_SVG)
        )));
    }

    #[test]
    fn omits_raster_logo() {
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let logo = LogoAsset::new(png, LogoKind::Raster).decode().unwrap();
        let fit = fit_logo(Some(logo.intrinsic_size()), 1024, 1024, 0.24, 0.02).unwrap();
        let with_logo = to_svg_string(&diagonal(), &StyleSpec::default(), 1024, Some((&logo, &fit)));
        assert_eq!(with_logo, to_svg_string(&diagonal(), &StyleSpec::default(), 1024, None));
    }

    #[test]
    fn uses_style_colors() {
        let style = StyleSpec::from_strings(Some("#123456"), Some("abc"));
        let svg = to_svg_string(&diagonal(), &style, 30, None);
        assert!(svg.contains("<g fill=\"#123456\">"));
        assert!(svg.contains("fill=\"#aabbcc\""));
    }
}
