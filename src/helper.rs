use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbaImage;

use crate::compose::composite_logo;
use crate::encode::{encode_jpeg, encode_png, OutputFormat};
use crate::error::{RenderError, Result};
use crate::logo::{fit_logo, FittedLogo, Logo, LogoAsset};
use crate::matrix::{ModuleMatrix, ModuleSource, QrCodeSource};
use crate::raster::render_matrix;
use crate::request::{RenderOptions, RenderRequest};
use crate::svg::to_svg_string;

/*---- Pipeline ----*/

/// Encoded bytes of a finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl RenderedOutput {
    /// `image/png`, `image/jpeg` or `image/svg+xml`.
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

/// Renders `request` into the format it asks for, using the `qrcode` crate engine.
///
/// A missing or malformed color has already been replaced by its default while the
/// request was built. A logo that cannot be decoded is dropped with a warning and the
/// plain code is returned. Only matrix generation and the final encoding can fail.
///
/// # Example
///
/// ```
/// use qrlogo::helper::generate;
/// use qrlogo::request::{RenderOptions, RenderRequest};
///
/// let out = generate(&RenderRequest::new("Hello, World!").with_size(256), &RenderOptions::default()).unwrap();
/// assert_eq!(out.media_type(), "image/png");
/// ```
pub fn generate(request: &RenderRequest, options: &RenderOptions) -> Result<RenderedOutput> {
    generate_with_source(&QrCodeSource, request, options)
}

/// Same as [`generate`], with a caller supplied QR engine.
pub fn generate_with_source(source: &dyn ModuleSource, request: &RenderRequest, options: &RenderOptions) -> Result<RenderedOutput> {
    let bytes = match request.format {
        OutputFormat::Bitmap => encode_png(&compose_image(source, request, options)?)?,
        OutputFormat::Photographic => encode_jpeg(&compose_image(source, request, options)?, options.jpeg_quality)?,
        OutputFormat::Vector => compose_svg(source, request, options)?.into_bytes(),
    };
    Ok(RenderedOutput { bytes, format: request.format })
}

/// Returns the composed raster image (code plus logo) without encoding it.
///
/// # Example
///
/// ```
/// use qrlogo::helper::generate_image_buffer;
/// use qrlogo::request::{RenderOptions, RenderRequest};
///
/// let img = generate_image_buffer(&RenderRequest::new("Hello, World!").with_size(300), &RenderOptions::default()).unwrap();
/// assert_eq!(img.dimensions(), (300, 300));
/// ```
pub fn generate_image_buffer(request: &RenderRequest, options: &RenderOptions) -> Result<RgbaImage> {
    compose_image(&QrCodeSource, request, options)
}

/// Returns the SVG document for `request`, whatever output format it names.
pub fn generate_svg_string(request: &RenderRequest, options: &RenderOptions) -> Result<String> {
    compose_svg(&QrCodeSource, request, options)
}

fn build_matrix(source: &dyn ModuleSource, request: &RenderRequest, options: &RenderOptions) -> Result<ModuleMatrix> {
    Ok(source.encode(&request.text, options.correction)?.with_quiet_zone(options.quiet_zone))
}

fn compose_image(source: &dyn ModuleSource, request: &RenderRequest, options: &RenderOptions) -> Result<RgbaImage> {
    if request.size > options.max_raster_size {
        return Err(RenderError::Encoding(format!(
            "{0}x{0} exceeds the {1}x{1} raster limit",
            request.size, options.max_raster_size
        )));
    }
    let matrix = build_matrix(source, request, options)?;
    let base = render_matrix(&matrix, &request.style, request.size);

    let Some((logo, fit)) = prepare_logo(request.logo.as_ref(), base.width(), base.height(), options) else {
        return Ok(base);
    };
    match composite_logo(&base, &logo, &fit, request.style.background) {
        Ok(composed) => Ok(composed),
        Err(err) => {
            tracing::warn!(%err, "logo compositing failed, returning the plain code");
            Ok(base)
        }
    }
}

fn compose_svg(source: &dyn ModuleSource, request: &RenderRequest, options: &RenderOptions) -> Result<String> {
    let matrix = build_matrix(source, request, options)?;
    let logo = prepare_logo(request.logo.as_ref(), request.size, request.size, options);
    let placed = logo.as_ref().map(|(logo, fit)| (logo, fit));
    Ok(to_svg_string(&matrix, &request.style, request.size, placed))
}

/// Decodes and fits the logo, or returns `None` when there is nothing usable to draw.
fn prepare_logo(asset: Option<&LogoAsset>, width: u32, height: u32, options: &RenderOptions) -> Option<(Logo, FittedLogo)> {
    let logo = match asset?.decode() {
        Ok(logo) => logo,
        Err(err) => {
            tracing::warn!(%err, "ignoring logo");
            return None;
        }
    };
    let Some(fit) = fit_logo(Some(logo.intrinsic_size()), width, height, options.logo_scale, options.logo_padding) else {
        tracing::warn!(width, height, "image too small for a logo");
        return None;
    };
    tracing::debug!(?fit, kind = ?logo.kind(), "fitted logo");
    Some((logo, fit))
}

/*---- Utilities ----*/

/// Prints the given matrix to the console.
pub fn print_qr(matrix: &ModuleMatrix) {
    for row in 0..matrix.size() {
        for col in 0..matrix.size() {
            let c: char = if matrix.get(col, row) { '█' } else { ' ' };
            print!("{0}{0}", c);
        }
        println!();
    }
    println!();
}

/// Writes `output` to `<directory>/<filename>.<ext>` and returns the path.
///
/// # Arguments
///
/// * `output` - The rendered QR code.
/// * `directory` - Optional. Defaults to "generated"; created when missing.
/// * `filename` - Optional. Without an extension; a timestamp is used when not provided.
///
/// # Errors
///
/// Returns [`RenderError::Io`](crate::error::RenderError::Io) if the directory cannot be
/// created or the file cannot be written.
pub fn save_output(output: &RenderedOutput, directory: Option<&Path>, filename: Option<&str>) -> Result<PathBuf> {
    let directory = directory.unwrap_or_else(|| Path::new("generated"));
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let since_the_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
            since_the_epoch.as_millis().to_string()
        }
    };

    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }
    let path = directory.join(format!("{}.{}", filename, output.format.extension()));
    fs::write(&path, &output.bytes)?;
    tracing::info!(path = %path.display(), bytes = output.bytes.len(), "saved QR code");
    Ok(path)
}
