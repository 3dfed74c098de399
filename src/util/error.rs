//! Error types for phasematch.

use thiserror::Error;

/// Result alias for phasematch operations.
pub type PhaseMatchResult<T> = std::result::Result<T, PhaseMatchError>;

/// Coarse grouping of [`PhaseMatchError`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shapes, strides, buffers or crops do not fit the images involved.
    InvalidDimensions,
    /// Every candidate window produced a meaningless score.
    DegenerateScore,
    /// The match configuration cannot produce a valid search.
    Configuration,
    /// Reading or decoding an image failed.
    Io,
}

/// Errors that can occur when running a registration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PhaseMatchError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Two patches that must share a square shape do not.
    #[error("shape mismatch: expected {expected}x{expected}, got {width}x{height}")]
    ShapeMismatch {
        expected: usize,
        width: usize,
        height: usize,
    },
    /// A requested crop does not lie entirely inside its source image.
    #[error(
        "out-of-bounds crop: {width}x{height} at ({x}, {y}) in {img_width}x{img_height} image"
    )]
    CropOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// All candidate scores were zero or NaN.
    #[error("degenerate score: all {candidates} candidates scored zero or NaN")]
    DegenerateScore { candidates: usize },
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// More candidates were requested than the grid generates.
    #[error("candidate_count {count} outside 1..={available}")]
    CandidateCountOutOfRange { count: usize, available: usize },
    /// The grid step leaves a partial final step under the strict policy.
    #[error("grid step {step} does not evenly divide search span {span}")]
    UnevenGridStep { span: usize, step: usize },
    /// The grid produced no candidate windows.
    #[error("search grid produced no candidate windows")]
    NoCandidates,
    /// Image decoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

impl PhaseMatchError {
    /// Returns the error family this variant belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. }
            | Self::InvalidStride { .. }
            | Self::BufferTooSmall { .. }
            | Self::ShapeMismatch { .. }
            | Self::CropOutOfBounds { .. } => ErrorKind::InvalidDimensions,
            Self::DegenerateScore { .. } => ErrorKind::DegenerateScore,
            Self::InvalidConfig(_)
            | Self::CandidateCountOutOfRange { .. }
            | Self::UnevenGridStep { .. }
            | Self::NoCandidates => ErrorKind::Configuration,
            Self::ImageIo { .. } => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, PhaseMatchError};

    #[test]
    fn crop_errors_are_dimension_errors() {
        let err = PhaseMatchError::CropOutOfBounds {
            x: -5,
            y: 0,
            width: 450,
            height: 450,
            img_width: 900,
            img_height: 900,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidDimensions);
        assert!(err.to_string().contains("out-of-bounds crop"));
    }

    #[test]
    fn grid_errors_are_configuration_errors() {
        let err = PhaseMatchError::UnevenGridStep { span: 150, step: 40 };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            PhaseMatchError::DegenerateScore { candidates: 9 }.kind(),
            ErrorKind::DegenerateScore
        );
    }
}
