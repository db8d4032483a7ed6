//! Logo compositing onto a rendered code.

use image::{imageops, Rgba, RgbaImage};

use crate::error::Result;
use crate::logo::{FittedLogo, Logo};
use crate::raster::fill_rect;

/// Places `logo` in the middle of `base`.
///
/// The base is copied, the fitted clear square is overwritten with `background`
/// (no blending, so no module survives underneath), and the logo is then blended over
/// it respecting its own alpha.
pub fn composite_logo(base: &RgbaImage, logo: &Logo, fit: &FittedLogo, background: Rgba<u8>) -> Result<RgbaImage> {
    let rendered = logo.rasterize_to(fit.inner_width, fit.inner_height)?;

    let mut canvas = base.clone();
    fill_rect(&mut canvas, fit.clear_offset_x, fit.clear_offset_y, fit.clear_side, fit.clear_side, background);
    imageops::overlay(&mut canvas, &rendered, i64::from(fit.offset_x), i64::from(fit.offset_y));
    Ok(canvas)
}
