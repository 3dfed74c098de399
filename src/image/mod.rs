//! Image views, pixel conversion and bounds-checked cropping.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Crops are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! Every crop is validated against the source bounds; a request that would
//! reach outside the image fails with [`PhaseMatchError::CropOutOfBounds`]
//! rather than returning a clipped view.

use crate::util::{PhaseMatchError, PhaseMatchResult};

#[cfg(feature = "image-io")]
pub mod io;
mod owned;
mod pixel;

pub use owned::OwnedImage;
pub use pixel::Pixel;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> PhaseMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> PhaseMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(PhaseMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy crop whose top-left corner is `(x, y)`.
    ///
    /// The origin is signed so that crops computed around an estimate near the
    /// image border report the real requested position in the error.
    pub fn crop(
        &self,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    ) -> PhaseMatchResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(PhaseMatchError::InvalidDimensions { width, height });
        }
        let out_of_bounds = PhaseMatchError::CropOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        if x < 0 || y < 0 {
            return Err(out_of_bounds);
        }
        let (x, y) = (x as usize, y as usize);
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(PhaseMatchError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(PhaseMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }

    /// Returns the `width x height` crop centered on `(cx, cy)`.
    ///
    /// The top-left corner is `round(cx - width / 2), round(cy - height / 2)`
    /// with ties rounded to even.
    pub fn crop_centered(
        &self,
        cx: f64,
        cy: f64,
        width: usize,
        height: usize,
    ) -> PhaseMatchResult<ImageView<'a, T>> {
        let (x, y) = centered_origin(cx, cy, width, height);
        self.crop(x, y, width, height)
    }

    /// Returns the `width x height` crop at the center of this view.
    pub fn crop_center(&self, width: usize, height: usize) -> PhaseMatchResult<ImageView<'a, T>> {
        self.crop_centered(
            self.width as f64 / 2.0,
            self.height as f64 / 2.0,
            width,
            height,
        )
    }
}

impl<T: Pixel> ImageView<'_, T> {
    /// Copies the view into a contiguous row-major `f64` buffer.
    pub fn to_f64(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            out.extend(
                self.data[start..start + self.width]
                    .iter()
                    .map(|&value| value.to_f64()),
            );
        }
        out
    }
}

/// Top-left corner of a `width x height` crop centered on `(cx, cy)`.
pub(crate) fn centered_origin(cx: f64, cy: f64, width: usize, height: usize) -> (i64, i64) {
    let x = (cx - width as f64 / 2.0).round_ties_even();
    let y = (cy - height as f64 / 2.0).round_ties_even();
    (x as i64, y as i64)
}

fn required_len(width: usize, height: usize, stride: usize) -> PhaseMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(PhaseMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(PhaseMatchError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(PhaseMatchError::InvalidDimensions { width, height })?;
    Ok(needed)
}
