//! Logo assets, their decoding, and their placement on the code.

use std::path::Path;

use image::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::error::{RenderError, Result};

/// How a logo's bytes are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoKind {
    /// An SVG document.
    Vector,
    /// Any format the `image` crate can decode.
    Raster,
}

impl LogoKind {
    /// `.svg` (any case) is a vector logo, everything else is treated as raster.
    pub fn from_filename(name: &str) -> Self {
        let is_svg = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if is_svg {
            LogoKind::Vector
        } else {
            LogoKind::Raster
        }
    }
}

/// Raw logo bytes as uploaded, tagged with their kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset {
    pub bytes: Vec<u8>,
    pub kind: LogoKind,
}

impl LogoAsset {
    pub fn new(bytes: Vec<u8>, kind: LogoKind) -> Self {
        Self { bytes, kind }
    }

    /// Tags `bytes` using the uploaded file name.
    pub fn from_named_bytes(filename: &str, bytes: Vec<u8>) -> Self {
        Self::new(bytes, LogoKind::from_filename(filename))
    }

    /// Parses or decodes the bytes.
    ///
    /// # Errors
    ///
    /// [`RenderError::UnsupportedLogoAsset`] when the SVG does not parse or the raster
    /// image does not decode.
    pub fn decode(&self) -> Result<Logo> {
        match self.kind {
            LogoKind::Vector => {
                let tree = usvg::Tree::from_data(&self.bytes, &usvg::Options::default())
                    .map_err(|e| RenderError::UnsupportedLogoAsset(e.to_string()))?;
                let view_box = parse_view_box(&self.bytes);
                Ok(Logo::Vector { tree, view_box, source: self.bytes.clone() })
            }
            LogoKind::Raster => image::load_from_memory(&self.bytes)
                .map(Logo::Raster)
                .map_err(|e| RenderError::UnsupportedLogoAsset(e.to_string())),
        }
    }
}

/// A decoded logo, ready to be measured and rasterized.
pub enum Logo {
    Vector {
        tree: usvg::Tree,
        /// Width and height of the root `viewBox`, when it declares a usable one.
        view_box: Option<(f64, f64)>,
        /// The original document, kept for embedding in SVG output.
        source: Vec<u8>,
    },
    Raster(DynamicImage),
}

impl Logo {
    pub fn kind(&self) -> LogoKind {
        match self {
            Logo::Vector { .. } => LogoKind::Vector,
            Logo::Raster(_) => LogoKind::Raster,
        }
    }

    /// Width and height in the logo's own units: the viewbox size for SVG, pixels
    /// for raster images.
    pub fn intrinsic_size(&self) -> (f64, f64) {
        match self {
            Logo::Vector { tree, view_box, .. } => (*view_box).unwrap_or_else(|| {
                let size = tree.size();
                (f64::from(size.width()), f64::from(size.height()))
            }),
            Logo::Raster(img) => (f64::from(img.width()), f64::from(img.height())),
        }
    }

    /// Renders the logo into a `width` x `height` straight-alpha RGBA image.
    ///
    /// SVG is rasterized with resvg; raster images are resampled with Lanczos3.
    pub fn rasterize_to(&self, width: u32, height: u32) -> Result<RgbaImage> {
        match self {
            Logo::Vector { tree, view_box, .. } => {
                let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
                    RenderError::UnsupportedLogoAsset(format!("cannot allocate {width}x{height} pixmap"))
                })?;
                // Map the drawn viewbox area, not the whole canvas, onto the target.
                let (cx, cy, cw, ch) = content_rect(tree.size(), *view_box);
                let (sx, sy) = (width as f32 / cw, height as f32 / ch);
                let transform = tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, -cx * sx, -cy * sy);
                resvg::render(tree, transform, &mut pixmap.as_mut());

                // tiny-skia stores premultiplied alpha, image expects straight alpha.
                let mut img = RgbaImage::new(width, height);
                for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
                    let c = src.demultiply();
                    *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
                }
                Ok(img)
            }
            Logo::Raster(img) => Ok(imageops::resize(&img.to_rgba8(), width, height, FilterType::Lanczos3)),
        }
    }
}

/// Reads the width and height of the root element's `viewBox`.
fn parse_view_box(bytes: &[u8]) -> Option<(f64, f64)> {
    let text = std::str::from_utf8(bytes).ok()?;
    let doc = roxmltree::Document::parse(text).ok()?;
    let values: Vec<f64> = doc
        .root_element()
        .attribute("viewBox")?
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f64>)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [_, _, w, h] if *w > 0.0 && *h > 0.0 => Some((*w, *h)),
        _ => None,
    }
}

/// The part of a `size` canvas that the viewbox is drawn into, as `(x, y, w, h)`.
///
/// usvg applies the viewbox with the default `xMidYMid meet`, so a viewbox whose
/// aspect ratio differs from the canvas is letterboxed and centered.
fn content_rect(size: usvg::Size, view_box: Option<(f64, f64)>) -> (f32, f32, f32, f32) {
    let (sw, sh) = (size.width(), size.height());
    let Some((vw, vh)) = view_box else {
        return (0.0, 0.0, sw, sh);
    };
    let aspect = (vw / vh) as f32;
    if sw / sh > aspect {
        let w = sh * aspect;
        ((sw - w) / 2.0, 0.0, w, sh)
    } else {
        let h = sw / aspect;
        (0.0, (sh - h) / 2.0, sw, h)
    }
}

/// Where a logo goes on the code and how much of the code is cleared for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedLogo {
    pub inner_width: u32,
    pub inner_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    /// Side of the square painted with the background color beneath the logo.
    pub clear_side: u32,
    pub clear_offset_x: u32,
    pub clear_offset_y: u32,
}

/// Fits a logo with the given intrinsic size into the center of a `base_width` x
/// `base_height` image.
///
/// The cleared square is `floor(base_width * scale)` wide. The logo's longer edge gets
/// that minus `floor(base_width * padding * 2)`, and the shorter edge follows the
/// aspect ratio, rounded down. Missing or non-positive intrinsic sizes give a square
/// logo. Both rectangles are centered with integer halving.
///
/// Returns `None` when there is no room left for the logo.
///
/// # Example
///
/// ```
/// use qrlogo::logo::fit_logo;
///
/// let fit = fit_logo(Some((200.0, 100.0)), 1024, 1024, 0.24, 0.02).unwrap();
/// assert_eq!((fit.inner_width, fit.inner_height), (205, 102));
/// assert_eq!((fit.offset_x, fit.offset_y), (409, 461));
/// ```
pub fn fit_logo(
    intrinsic: Option<(f64, f64)>,
    base_width: u32,
    base_height: u32,
    scale: f64,
    padding: f64,
) -> Option<FittedLogo> {
    let w = f64::from(base_width);
    let clear_side = (w * scale).floor().max(0.0) as u32;
    let inner_max = clear_side.saturating_sub((w * padding * 2.0).floor().max(0.0) as u32);
    if inner_max == 0 {
        return None;
    }

    let (inner_width, inner_height) = match intrinsic {
        Some((iw, ih)) if iw > 0.0 && ih > 0.0 => {
            let ratio = ih / iw;
            let max = f64::from(inner_max);
            if ratio <= 1.0 {
                (inner_max, (max * ratio) as u32)
            } else {
                ((max / ratio) as u32, inner_max)
            }
        }
        _ => (inner_max, inner_max),
    };
    // Extreme aspect ratios must not collapse the short edge to nothing.
    let (inner_width, inner_height) = (inner_width.max(1), inner_height.max(1));

    let center = |extent: u32, dim: u32| extent.saturating_sub(dim) / 2;
    Some(FittedLogo {
        inner_width,
        inner_height,
        offset_x: center(base_width, inner_width),
        offset_y: center(base_height, inner_height),
        clear_side,
        clear_offset_x: center(base_width, clear_side),
        clear_offset_y: center(base_height, clear_side),
    })
}
