//! Intensity sample types accepted by the matcher.

/// A grayscale sample that can be widened to `f64`.
///
/// Implemented for the integer and floating-point types image decoders
/// commonly hand out.
pub trait Pixel: Copy + Send + Sync {
    /// Converts the sample to `f64` without rescaling.
    fn to_f64(self) -> f64;
}

impl Pixel for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Pixel for u16 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Pixel for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Pixel for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
