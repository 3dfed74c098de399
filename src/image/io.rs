//! Loading grayscale images through the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PhaseMatchError, PhaseMatchResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> PhaseMatchResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Converts any decoded image to an owned 8-bit luma image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> PhaseMatchResult<OwnedImage<u8>> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to 8-bit grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> PhaseMatchResult<OwnedImage<u8>> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| PhaseMatchError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}
