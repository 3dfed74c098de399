//! Owned contiguous image buffers.

use crate::image::ImageView;
use crate::util::{PhaseMatchError, PhaseMatchResult};

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> PhaseMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhaseMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(PhaseMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(PhaseMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(PhaseMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> PhaseMatchResult<Self> {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major sample buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

impl<T: Copy> OwnedImage<T> {
    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, T>) -> PhaseMatchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(PhaseMatchError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }
}
