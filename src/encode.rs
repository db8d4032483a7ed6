//! Output formats and their encoders.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{RenderError, Result};

/// Requested output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless PNG.
    #[default]
    Bitmap,
    /// Lossy JPEG.
    Photographic,
    /// SVG document.
    Vector,
}

impl OutputFormat {
    /// Parses a format name, case-insensitively.
    ///
    /// Besides `bitmap`, `photographic` and `vector`, the file extensions `png`,
    /// `jpg`/`jpeg` and `svg` are understood.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bitmap" | "png" => Some(OutputFormat::Bitmap),
            "photographic" | "jpeg" | "jpg" => Some(OutputFormat::Photographic),
            "vector" | "svg" => Some(OutputFormat::Vector),
            _ => None,
        }
    }

    /// Like [`parse`](Self::parse), but unknown names mean [`OutputFormat::Bitmap`].
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            if !name.trim().is_empty() {
                tracing::warn!(format = name, "unknown output format, using bitmap");
            }
            OutputFormat::default()
        })
    }

    pub fn media_type(self) -> &'static str {
        match self {
            OutputFormat::Bitmap => "image/png",
            OutputFormat::Photographic => "image/jpeg",
            OutputFormat::Vector => "image/svg+xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bitmap => "png",
            OutputFormat::Photographic => "jpg",
            OutputFormat::Vector => "svg",
        }
    }
}

/// Encodes `img` as PNG. The same image always produces the same bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    ensure_not_empty(img)?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encodes `img` as baseline JPEG at `quality` (clamped to 1..=100).
///
/// JPEG has no alpha channel; the composition is opaque anyway, so alpha is dropped.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    ensure_not_empty(img)?;
    let rgb = DynamicImage::ImageRgba8(img.clone()).into_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(buf)
}

fn ensure_not_empty(img: &RgbaImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(RenderError::Encoding(format!(
            "cannot encode a {}x{} image",
            img.width(),
            img.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rstest::rstest;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(64, 64, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgba([10, 20, 30, 255])
            } else {
                Rgba([240, 230, 220, 255])
            }
        })
    }

    #[rstest]
    #[case("bitmap", OutputFormat::Bitmap)]
    #[case("PNG", OutputFormat::Bitmap)]
    #[case("Photographic", OutputFormat::Photographic)]
    #[case("jpg", OutputFormat::Photographic)]
    #[case("VECTOR", OutputFormat::Vector)]
    #[case(" svg ", OutputFormat::Vector)]
    fn parses_format_names(#[case] name: &str, #[case] expected: OutputFormat) {
        assert_eq!(OutputFormat::parse(name), Some(expected));
    }

    #[test]
    fn unknown_format_defaults_to_bitmap() {
        assert_eq!(OutputFormat::parse("gif"), None);
        assert_eq!(OutputFormat::parse_or_default("gif"), OutputFormat::Bitmap);
        assert_eq!(OutputFormat::parse_or_default(""), OutputFormat::Bitmap);
    }

    #[test]
    fn media_types() {
        assert_eq!(OutputFormat::Bitmap.media_type(), "image/png");
        assert_eq!(OutputFormat::Photographic.media_type(), "image/jpeg");
        assert_eq!(OutputFormat::Vector.media_type(), "image/svg+xml");
    }

    #[test]
    fn png_is_lossless_and_deterministic() {
        let img = sample();
        let first = encode_png(&img).unwrap();
        assert_eq!(first, encode_png(&img).unwrap());
        assert!(first.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(&first).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn jpeg_has_expected_size() {
        let bytes = encode_jpeg(&sample(), 80).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64));
    }

    #[test]
    fn empty_images_fail() {
        let empty = RgbaImage::new(0, 0);
        assert!(matches!(encode_png(&empty), Err(RenderError::Encoding(_))));
        assert!(matches!(encode_jpeg(&empty, 80), Err(RenderError::Encoding(_))));
    }
}
