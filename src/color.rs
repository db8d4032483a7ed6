//! Hex color parsing.
//!
//! Accepted forms are `RRGGBB`, `RGB`, `#RRGGBB` and `#RGB`. The three digit shorthand
//! doubles every digit, so `a3f` reads as `aa33ff`. Parsed colors are always opaque.

use image::Rgba;

use crate::error::{RenderError, Result};

/// Default module color when the requested one cannot be parsed.
pub const DEFAULT_FOREGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Default background color when the requested one cannot be parsed.
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parses a hex color string into an opaque RGBA pixel.
///
/// # Errors
///
/// Returns [`RenderError::InvalidColorFormat`] for any length other than 3 or 6 digits
/// (after the optional `#`) or for non-hex characters.
///
/// # Example
///
/// ```
/// use qrlogo::color::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#a3f").unwrap().0, [0xaa, 0x33, 0xff, 255]);
/// ```
pub fn parse_hex_color(input: &str) -> Result<Rgba<u8>> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    let invalid = || RenderError::InvalidColorFormat(input.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let nibbles: Vec<u8> = digits
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => b - b'A' + 10,
        })
        .collect();

    let [r, g, b] = match *nibbles.as_slice() {
        [r, g, b] => [r * 17, g * 17, b * 17],
        [r1, r0, g1, g0, b1, b0] => [(r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0],
        _ => return Err(invalid()),
    };
    Ok(Rgba([r, g, b, 255]))
}

/// Parses `input`, falling back to `default` when it is malformed.
///
/// This never fails: a bad color is a usability problem, not a reason to refuse
/// rendering.
pub fn parse_color_or(input: &str, default: Rgba<u8>) -> Rgba<u8> {
    match parse_hex_color(input) {
        Ok(color) => color,
        Err(err) => {
            tracing::warn!(%err, "falling back to default color");
            default
        }
    }
}

/// Formats a color as `#rrggbb` for SVG attributes.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, _] = color.0;
    format!("#{r:02x}{g:02x}{b:02x}")
}
