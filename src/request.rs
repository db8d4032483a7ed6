//! Render requests, styling and tunables.

use image::Rgba;
use serde::Deserialize;

use crate::color::{parse_color_or, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use crate::encode::OutputFormat;
use crate::logo::LogoAsset;
use crate::matrix::CorrectionLevel;

/// Canvas edge length used when the request does not name a usable one.
pub const DEFAULT_SIZE: u32 = 1024;

/// Foreground and background colors, both opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpec {
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self { foreground: DEFAULT_FOREGROUND, background: DEFAULT_BACKGROUND }
    }
}

impl StyleSpec {
    /// Resolves user supplied color strings, substituting black and white for
    /// anything missing or malformed.
    pub fn from_strings(foreground: Option<&str>, background: Option<&str>) -> Self {
        Self {
            foreground: foreground.map_or(DEFAULT_FOREGROUND, |s| parse_color_or(s, DEFAULT_FOREGROUND)),
            background: background.map_or(DEFAULT_BACKGROUND, |s| parse_color_or(s, DEFAULT_BACKGROUND)),
        }
    }
}

/// Rendering tunables. The defaults are what every request uses unless a caller
/// overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Side of the cleared square under the logo, as a fraction of the image width.
    pub logo_scale: f64,
    /// Padding between the cleared square and the logo on each side, as a fraction of
    /// the image width.
    pub logo_padding: f64,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
    /// Light modules added around the symbol.
    pub quiet_zone: usize,
    pub correction: CorrectionLevel,
    /// Largest raster edge in pixels. SVG output is text and is not limited.
    pub max_raster_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            logo_scale: 0.24,
            logo_padding: 0.02,
            jpeg_quality: 80,
            quiet_zone: 4,
            correction: CorrectionLevel::High,
            max_raster_size: 4096,
        }
    }
}

/// The JSON body accepted from clients:
/// `{"text": "...", "qr_color": "#000", "bg_color": "fff", "format": "vector", "size": 512}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestPayload {
    pub text: String,
    pub qr_color: Option<String>,
    pub bg_color: Option<String>,
    pub format: Option<String>,
    pub size: Option<i64>,
}

impl RequestPayload {
    /// Parses a JSON payload.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A fully resolved request. Built once per render and never mutated.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub text: String,
    pub style: StyleSpec,
    pub size: u32,
    pub logo: Option<LogoAsset>,
    pub format: OutputFormat,
}

impl RenderRequest {
    /// A bitmap request with default colors and size.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleSpec::default(),
            size: DEFAULT_SIZE,
            logo: None,
            format: OutputFormat::default(),
        }
    }

    /// Resolves a client payload, applying every default.
    pub fn from_payload(payload: RequestPayload, logo: Option<LogoAsset>) -> Self {
        Self {
            style: StyleSpec::from_strings(payload.qr_color.as_deref(), payload.bg_color.as_deref()),
            size: resolve_size(payload.size),
            format: payload.format.as_deref().map(OutputFormat::parse_or_default).unwrap_or_default(),
            text: payload.text,
            logo,
        }
    }

    pub fn with_logo(mut self, logo: LogoAsset) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = resolve_size(Some(i64::from(size)));
        self
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }
}

/// Unset, zero and negative sizes all mean [`DEFAULT_SIZE`].
fn resolve_size(size: Option<i64>) -> u32 {
    match size {
        Some(s) if s > 0 => u32::try_from(s).unwrap_or(u32::MAX),
        _ => DEFAULT_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults() {
        let payload = RequestPayload::from_json(r#"{"text":"hi"}"#).unwrap();
        let req = RenderRequest::from_payload(payload, None);
        assert_eq!(req.text, "hi");
        assert_eq!(req.size, DEFAULT_SIZE);
        assert_eq!(req.format, OutputFormat::Bitmap);
        assert_eq!(req.style, StyleSpec::default());
    }

    #[test]
    fn payload_fields_resolve() {
        let payload = RequestPayload::from_json(
            r##"{"text":"hi","qr_color":"#f00","bg_color":"00ff00","format":"VECTOR","size":300}"##,
        )
        .unwrap();
        let req = RenderRequest::from_payload(payload, None);
        assert_eq!(req.size, 300);
        assert_eq!(req.format, OutputFormat::Vector);
        assert_eq!(req.style.foreground.0, [255, 0, 0, 255]);
        assert_eq!(req.style.background.0, [0, 255, 0, 255]);
    }

    #[test]
    fn bad_colors_and_sizes_fall_back() {
        let payload = RequestPayload::from_json(
            r##"{"text":"hi","qr_color":"red","bg_color":"#12","size":-5}"##,
        )
        .unwrap();
        let req = RenderRequest::from_payload(payload, None);
        assert_eq!(req.style, StyleSpec::default());
        assert_eq!(req.size, DEFAULT_SIZE);
        assert_eq!(RenderRequest::new("x").with_size(0).size, DEFAULT_SIZE);
    }

    #[test]
    fn options_deserialize_partially() {
        let opts: RenderOptions = serde_json::from_str(r#"{"jpeg_quality":95,"correction":"quartile"}"#).unwrap();
        assert_eq!(opts.jpeg_quality, 95);
        assert_eq!(opts.correction, CorrectionLevel::Quartile);
        assert_eq!(opts.logo_scale, 0.24);
        assert_eq!(opts.quiet_zone, 4);
        assert_eq!(opts.max_raster_size, 4096);
    }
}
