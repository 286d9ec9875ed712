//! Drivers that turn a probability field into multi-scale context
//! features.
//!
//! Each driver builds its integral accumulator(s) once, then walks every
//! (channel, location) pair and lays the per-radius statistics out with a
//! fixed channel layout:
//!
//! - mean only: feature channel `ch * n_radii + i`,
//! - mean + variance: means at `ch * 2 * n_radii + i`, variances at
//!   `ch * 2 * n_radii + n_radii + i`,
//!
//! where `i` indexes the radius list. Locations never share output slots,
//! so the `rayon` feature can split the work over rows (2D) or z-slabs
//! (3D) without changing any result.

use alloc::vec;

use crate::features::{annulus_means_2d, annulus_means_3d};
use crate::field::{Field2, Field3};
use crate::integral::{IntegralImage, IntegralVolume};
use crate::ContextParams;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

fn check_radii(radii: &[u32]) {
    assert!(!radii.is_empty(), "radius list must not be empty");
    assert!(
        radii.windows(2).all(|w| w[0] < w[1]),
        "radii must be strictly increasing"
    );
}

/// Mean context features over a 2D field.
///
/// The output has `field.channels * params.radii.len()` channels; entry
/// `(x, y, ch * n_radii + i)` is the mean of input channel `ch` over the
/// annulus at radius `radii[i]` centered on `(x, y)`.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(field, params),
        fields(w = field.w, h = field.h, channels = field.channels, radii = params.radii.len())
    )
)]
pub fn mean_context_2d(field: &Field2, params: &ContextParams) -> Field2 {
    check_radii(&params.radii);
    let nr = params.radii.len();
    let mut out = Field2::new(field.w, field.h, field.channels * nr);
    if field.w == 0 || field.h == 0 || field.channels == 0 {
        return out;
    }

    let fill = params.border_fill.value(field.channels);
    let integral = IntegralImage::new(field);

    let (w, nc, out_c) = (field.w, field.channels, out.channels);
    let radii = &params.radii[..];

    let fill_row = |y: usize, row: &mut [f32]| {
        let mut stats = vec![0.0f32; nr];
        for x in 0..w {
            for ch in 0..nc {
                annulus_means_2d(&integral, x, y, ch, radii, fill, &mut stats);
                let base = x * out_c + ch * nr;
                row[base..base + nr].copy_from_slice(&stats);
            }
        }
    };

    #[cfg(feature = "rayon")]
    out.data
        .par_chunks_mut(w * out_c)
        .enumerate()
        .for_each(|(y, row)| fill_row(y, row));
    #[cfg(not(feature = "rayon"))]
    for (y, row) in out.data.chunks_mut(w * out_c).enumerate() {
        fill_row(y, row);
    }

    out
}

/// Mean and variance context features over a 2D field.
///
/// The output has `field.channels * 2 * n_radii` channels: for each input
/// channel a block of `n_radii` means followed by `n_radii` variances.
/// Variances are population variances over the annulus, computed as the
/// mean of squares minus the squared mean.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(field, params),
        fields(w = field.w, h = field.h, channels = field.channels, radii = params.radii.len())
    )
)]
pub fn mean_var_context_2d(field: &Field2, params: &ContextParams) -> Field2 {
    check_radii(&params.radii);
    let nr = params.radii.len();
    let mut out = Field2::new(field.w, field.h, field.channels * 2 * nr);
    if field.w == 0 || field.h == 0 || field.channels == 0 {
        return out;
    }

    let fill = params.border_fill.value(field.channels);
    let integral = IntegralImage::new(field);
    let integral_sq = IntegralImage::of_squares(field);

    let (w, nc, out_c) = (field.w, field.channels, out.channels);
    let radii = &params.radii[..];

    let fill_row = |y: usize, row: &mut [f32]| {
        let mut means = vec![0.0f32; nr];
        let mut sq_means = vec![0.0f32; nr];
        for x in 0..w {
            for ch in 0..nc {
                annulus_means_2d(&integral, x, y, ch, radii, fill, &mut means);
                annulus_means_2d(&integral_sq, x, y, ch, radii, fill, &mut sq_means);
                let base = x * out_c + ch * 2 * nr;
                for i in 0..nr {
                    row[base + i] = means[i];
                    row[base + nr + i] = sq_means[i] - means[i] * means[i];
                }
            }
        }
    };

    #[cfg(feature = "rayon")]
    out.data
        .par_chunks_mut(w * out_c)
        .enumerate()
        .for_each(|(y, row)| fill_row(y, row));
    #[cfg(not(feature = "rayon"))]
    for (y, row) in out.data.chunks_mut(w * out_c).enumerate() {
        fill_row(y, row);
    }

    out
}

/// Mean context features over a 3D field. See [`mean_context_2d`] for the
/// channel layout.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(field, params),
        fields(w = field.w, h = field.h, d = field.d, channels = field.channels)
    )
)]
pub fn mean_context_3d(field: &Field3, params: &ContextParams) -> Field3 {
    check_radii(&params.radii);
    let nr = params.radii.len();
    let mut out = Field3::new(field.w, field.h, field.d, field.channels * nr);
    if field.w == 0 || field.h == 0 || field.d == 0 || field.channels == 0 {
        return out;
    }

    let fill = params.border_fill.value(field.channels);
    let integral = IntegralVolume::new(field);

    let (w, h, nc, out_c) = (field.w, field.h, field.channels, out.channels);
    let radii = &params.radii[..];

    let fill_slab = |z: usize, slab: &mut [f32]| {
        let mut stats = vec![0.0f32; nr];
        for y in 0..h {
            for x in 0..w {
                for ch in 0..nc {
                    annulus_means_3d(&integral, x, y, z, ch, radii, fill, &mut stats);
                    let base = (y * w + x) * out_c + ch * nr;
                    slab[base..base + nr].copy_from_slice(&stats);
                }
            }
        }
    };

    #[cfg(feature = "rayon")]
    out.data
        .par_chunks_mut(w * h * out_c)
        .enumerate()
        .for_each(|(z, slab)| fill_slab(z, slab));
    #[cfg(not(feature = "rayon"))]
    for (z, slab) in out.data.chunks_mut(w * h * out_c).enumerate() {
        fill_slab(z, slab);
    }

    out
}

/// Mean and variance context features over a 3D field. See
/// [`mean_var_context_2d`] for the channel layout.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(field, params),
        fields(w = field.w, h = field.h, d = field.d, channels = field.channels)
    )
)]
pub fn mean_var_context_3d(field: &Field3, params: &ContextParams) -> Field3 {
    check_radii(&params.radii);
    let nr = params.radii.len();
    let mut out = Field3::new(field.w, field.h, field.d, field.channels * 2 * nr);
    if field.w == 0 || field.h == 0 || field.d == 0 || field.channels == 0 {
        return out;
    }

    let fill = params.border_fill.value(field.channels);
    let integral = IntegralVolume::new(field);
    let integral_sq = IntegralVolume::of_squares(field);

    let (w, h, nc, out_c) = (field.w, field.h, field.channels, out.channels);
    let radii = &params.radii[..];

    let fill_slab = |z: usize, slab: &mut [f32]| {
        let mut means = vec![0.0f32; nr];
        let mut sq_means = vec![0.0f32; nr];
        for y in 0..h {
            for x in 0..w {
                for ch in 0..nc {
                    annulus_means_3d(&integral, x, y, z, ch, radii, fill, &mut means);
                    annulus_means_3d(&integral_sq, x, y, z, ch, radii, fill, &mut sq_means);
                    let base = (y * w + x) * out_c + ch * 2 * nr;
                    for i in 0..nr {
                        slab[base + i] = means[i];
                        slab[base + nr + i] = sq_means[i] - means[i] * means[i];
                    }
                }
            }
        }
    };

    #[cfg(feature = "rayon")]
    out.data
        .par_chunks_mut(w * h * out_c)
        .enumerate()
        .for_each(|(z, slab)| fill_slab(z, slab));
    #[cfg(not(feature = "rayon"))]
    for (z, slab) in out.data.chunks_mut(w * h * out_c).enumerate() {
        fill_slab(z, slab);
    }

    out
}
