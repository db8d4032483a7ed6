//! QR module matrices and the engines that produce them.
//!
//! The symbol encoding itself (segmenting, Reed-Solomon coding, masking) is delegated
//! to an engine implementing [`ModuleSource`]. [`QrCodeSource`] is the default engine,
//! backed by the `qrcode` crate.

use qrcode::{Color, EcLevel, QrCode};
use serde::Deserialize;

use crate::error::{RenderError, Result};

/// Error correction level of the QR symbol.
///
/// Logos destroy the modules beneath them, so rendering always asks for [`High`]
/// unless told otherwise.
///
/// [`High`]: CorrectionLevel::High
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionLevel {
    /// Tolerates about 7% erroneous codewords.
    Low,
    /// Tolerates about 15% erroneous codewords.
    Medium,
    /// Tolerates about 25% erroneous codewords.
    Quartile,
    /// Tolerates about 30% erroneous codewords.
    #[default]
    High,
}

impl From<CorrectionLevel> for EcLevel {
    fn from(level: CorrectionLevel) -> Self {
        match level {
            CorrectionLevel::Low => EcLevel::L,
            CorrectionLevel::Medium => EcLevel::M,
            CorrectionLevel::Quartile => EcLevel::Q,
            CorrectionLevel::High => EcLevel::H,
        }
    }
}

/// An immutable square grid of modules, `true` meaning dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Builds a matrix from row-major modules.
    ///
    /// Returns `None` unless `modules.len() == size * size` and `size >= 1`.
    pub fn from_modules(size: usize, modules: Vec<bool>) -> Option<Self> {
        (size >= 1 && modules.len() == size * size).then_some(Self { size, modules })
    }

    /// Width and height in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the module at (`col`, `row`) is dark. Out of range reads as light.
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.modules[row * self.size + col]
    }

    /// Returns a copy surrounded by `border` light modules on every side.
    pub fn with_quiet_zone(&self, border: usize) -> Self {
        let size = self.size + 2 * border;
        let mut modules = vec![false; size * size];
        for row in 0..self.size {
            let start = (row + border) * size + border;
            modules[start..start + self.size]
                .copy_from_slice(&self.modules[row * self.size..(row + 1) * self.size]);
        }
        Self { size, modules }
    }

    /// Iterates over the (`col`, `row`) coordinates of every dark module.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % self.size, i / self.size))
    }
}

/// Anything that can turn text into a module matrix.
pub trait ModuleSource {
    /// Encodes `text` at `level` into a matrix without quiet zone.
    fn encode(&self, text: &str, level: CorrectionLevel) -> Result<ModuleMatrix>;
}

/// The default engine, backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeSource;

impl ModuleSource for QrCodeSource {
    fn encode(&self, text: &str, level: CorrectionLevel) -> Result<ModuleMatrix> {
        if text.is_empty() {
            return Err(RenderError::MatrixGeneration("text must not be empty".into()));
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), level.into())
            .map_err(|e| RenderError::MatrixGeneration(e.to_string()))?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        let matrix = ModuleMatrix::from_modules(width, modules).ok_or_else(|| {
            RenderError::MatrixGeneration(format!("engine returned a malformed {width}x{width} symbol"))
        })?;
        tracing::debug!(modules = width, ?level, "encoded QR symbol");
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_square_matrix() {
        let matrix = QrCodeSource.encode("Hello, world!", CorrectionLevel::High).unwrap();
        // Version 1 is 21 modules wide, the finder pattern corner is dark.
        assert!(matrix.size() >= 21);
        assert_eq!((matrix.size() - 17) % 4, 0);
        assert!(matrix.get(0, 0));
    }

    #[test]
    fn higher_correction_needs_more_room() {
        let text = "https://example.com/a/fairly/long/path?with=query&and=more";
        let low = QrCodeSource.encode(text, CorrectionLevel::Low).unwrap();
        let high = QrCodeSource.encode(text, CorrectionLevel::High).unwrap();
        assert!(high.size() > low.size());
    }

    #[test]
    fn rejects_empty_and_oversized_text() {
        assert!(matches!(
            QrCodeSource.encode("", CorrectionLevel::High),
            Err(RenderError::MatrixGeneration(_))
        ));
        let huge = "x".repeat(4000);
        assert!(matches!(
            QrCodeSource.encode(&huge, CorrectionLevel::High),
            Err(RenderError::MatrixGeneration(_))
        ));
    }

    #[test]
    fn quiet_zone_pads_with_light_modules() {
        let matrix = ModuleMatrix::from_modules(2, vec![true, false, false, true]).unwrap();
        let padded = matrix.with_quiet_zone(1);
        assert_eq!(padded.size(), 4);
        assert!(!padded.get(0, 0));
        assert!(padded.get(1, 1));
        assert!(!padded.get(2, 1));
        assert!(padded.get(2, 2));
        assert_eq!(padded.dark_modules().collect::<Vec<_>>(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn rejects_non_square_input() {
        assert!(ModuleMatrix::from_modules(2, vec![true; 3]).is_none());
        assert!(ModuleMatrix::from_modules(0, Vec::new()).is_none());
    }
}
