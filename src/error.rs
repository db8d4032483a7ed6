use thiserror::Error;

/// Errors produced while rendering a QR code.
///
/// `InvalidColorFormat` and `UnsupportedLogoAsset` are recoverable: the pipeline
/// substitutes a default color or drops the logo. The remaining variants abort the
/// render and are meant to be reported to the caller.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The color string is not `RGB`/`RRGGBB` hex, with or without `#`.
    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// The text could not be turned into a module matrix.
    #[error("QR matrix generation failed: {0}")]
    MatrixGeneration(String),

    /// The logo bytes could not be parsed or decoded.
    #[error("Unsupported logo asset: {0}")]
    UnsupportedLogoAsset(String),

    /// The composed image could not be serialized.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Encoding(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
