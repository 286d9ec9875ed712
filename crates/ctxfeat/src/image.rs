//! Conversions between `image::GrayImage` and the core field types.
//!
//! These wrappers expose the core drivers in terms of 8-bit grayscale
//! images, which is convenient for most downstream consumers. Pixel
//! values are rescaled to `[0, 1]` so they read as per-pixel
//! probabilities.

use anyhow::{bail, Result};
use ctxfeat_core::{mean_context_2d, mean_var_context_2d, ContextParams, Field2};
use image::GrayImage;

/// Interpret an 8-bit grayscale image as a single-channel probability
/// field with values scaled to `[0, 1]`.
pub fn field_from_image(img: &GrayImage) -> Field2 {
    let w = img.width() as usize;
    let h = img.height() as usize;
    let mut field = Field2::new(w, h, 1);
    for (i, &v) in img.as_raw().iter().enumerate() {
        field.data[i] = v as f32 / 255.0;
    }
    field
}

/// Assemble a multi-channel field from one grayscale plane per channel.
///
/// All planes must share the same dimensions; per-class probability maps
/// exported as separate images land here.
pub fn field_from_planes(planes: &[GrayImage]) -> Result<Field2> {
    let first = match planes.first() {
        Some(p) => p,
        None => bail!("at least one plane is required"),
    };
    let (w, h) = first.dimensions();
    for (i, p) in planes.iter().enumerate() {
        if p.dimensions() != (w, h) {
            bail!(
                "plane {i} is {}x{}, expected {w}x{h}",
                p.width(),
                p.height()
            );
        }
    }

    let nc = planes.len();
    let mut field = Field2::new(w as usize, h as usize, nc);
    for (ch, p) in planes.iter().enumerate() {
        for y in 0..h as usize {
            for x in 0..w as usize {
                field.set(x, y, ch, p.as_raw()[y * w as usize + x] as f32 / 255.0);
            }
        }
    }
    Ok(field)
}

/// Render one feature channel back into an 8-bit grayscale image.
///
/// Values are clamped to `[0, 1]` before rescaling, since variances and
/// fills can leave that range.
pub fn plane_to_image(field: &Field2, ch: usize) -> GrayImage {
    let mut img = GrayImage::new(field.w as u32, field.h as u32);
    for y in 0..field.h {
        for x in 0..field.w {
            let v = field.at(x, y, ch).clamp(0.0, 1.0);
            img.put_pixel(x as u32, y as u32, image::Luma([(v * 255.0).round() as u8]));
        }
    }
    img
}

/// Compute mean context features for an `image::GrayImage`.
#[inline]
pub fn mean_context_image(img: &GrayImage, params: &ContextParams) -> Field2 {
    mean_context_2d(&field_from_image(img), params)
}

/// Compute mean and variance context features for an `image::GrayImage`.
#[inline]
pub fn mean_var_context_image(img: &GrayImage, params: &ContextParams) -> Field2 {
    mean_var_context_2d(&field_from_image(img), params)
}
