//! Per-location multi-scale annulus statistics.
//!
//! Radii are walked in increasing order while carrying the previous
//! in-border box's full sum and cell count, so each result is the mean
//! over the annulus between consecutive boxes. The innermost in-border
//! radius covers its whole box (the carried state starts empty). Radii
//! whose box exits the field produce the caller's fill value and leave
//! the carried state untouched, so the running subtraction only ever
//! uses sums that were actually extracted from the accumulator.

use crate::integral::{IntegralImage, IntegralVolume};

/// Write one annulus mean per radius for location `(x, y)` and channel
/// `ch` into `out`.
///
/// `out` must hold exactly `radii.len()` entries; it is a caller-owned
/// scratch slice so the hot per-location loop allocates nothing.
pub fn annulus_means_2d(
    integral: &IntegralImage,
    x: usize,
    y: usize,
    ch: usize,
    radii: &[u32],
    fill: f32,
    out: &mut [f32],
) {
    debug_assert_eq!(out.len(), radii.len());

    let mut prev_sum = 0.0f64;
    let mut prev_cells = 0u64;
    for (ir, &r) in radii.iter().enumerate() {
        let full = match integral.box_sum(x, y, ch, r) {
            Some(s) => s,
            None => {
                out[ir] = fill;
                continue;
            }
        };

        let side = 2 * r as u64 + 1;
        let cells = side * side;
        out[ir] = ((full - prev_sum) / (cells - prev_cells) as f64) as f32;
        prev_sum = full;
        prev_cells = cells;
    }
}

/// 3D counterpart of [`annulus_means_2d`] over cubic neighborhoods.
pub fn annulus_means_3d(
    integral: &IntegralVolume,
    x: usize,
    y: usize,
    z: usize,
    ch: usize,
    radii: &[u32],
    fill: f32,
    out: &mut [f32],
) {
    debug_assert_eq!(out.len(), radii.len());

    let mut prev_sum = 0.0f64;
    let mut prev_cells = 0u64;
    for (ir, &r) in radii.iter().enumerate() {
        let full = match integral.box_sum(x, y, z, ch, r) {
            Some(s) => s,
            None => {
                out[ir] = fill;
                continue;
            }
        };

        let side = 2 * r as u64 + 1;
        let cells = side * side * side;
        out[ir] = ((full - prev_sum) / (cells - prev_cells) as f64) as f32;
        prev_sum = full;
        prev_cells = cells;
    }
}
