//! # qrlogo
//!
//! A Rust library for rendering QR codes with a centered logo overlay.
//!
//! `qrlogo` turns text into a QR code at the highest error correction level, paints it
//! with custom foreground and background colors, and optionally places an SVG or raster
//! logo in the middle. The area under the logo is cleared to the background color so no
//! stray modules show through. Output is PNG, JPEG or SVG; the SVG is built directly from
//! the module matrix and lines up exactly with the raster output.
//!
//! ## Features
//!
//! - Lenient `#RGB` / `#RRGGBB` color parsing with black and white fallbacks.
//! - Exact `size` x `size` output with centered module grids.
//! - Aspect-preserving logo fitting shared by raster and vector output.
//! - SVG logos rasterized with resvg, raster logos resampled with Lanczos3.
//! - Pluggable QR engines through [`matrix::ModuleSource`].
//!
//! ## Example
//!
//! Render a PNG with an SVG logo:
//!
//! ```rust
//! use qrlogo::helper::generate;
//! use qrlogo::logo::LogoAsset;
//! use qrlogo::request::{RenderOptions, RenderRequest, StyleSpec};
//!
//! let logo = br##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2 1"><rect width="2" height="1" fill="#e33"/></svg>"##;
//! let request = RenderRequest::new("https://example.com")
//!     .with_style(StyleSpec::from_strings(Some("#1e3a8a"), Some("fff")))
//!     .with_logo(LogoAsset::from_named_bytes("logo.svg", logo.to_vec()));
//!
//! let output = generate(&request, &RenderOptions::default()).unwrap();
//! assert_eq!(output.media_type(), "image/png");
//! ```
//!
//! ## Modules
//!
//! - [`color`]: Hex color parsing.
//! - [`matrix`]: Module matrices and QR engines.
//! - [`raster`] and [`svg`]: The two renderers.
//! - [`logo`] and [`compose`]: Logo decoding, fitting and compositing.
//! - [`encode`]: Output formats.
//! - [`helper`]: The full pipeline and file utilities.

pub mod color;
pub mod compose;
pub mod encode;
pub mod error;
pub mod helper;
pub mod layout;
pub mod logo;
pub mod matrix;
pub mod raster;
pub mod request;
pub mod svg;

pub use error::{RenderError, Result};
