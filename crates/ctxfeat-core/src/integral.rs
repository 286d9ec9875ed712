//! Integral images/volumes and O(1) axis-aligned box sums.
//!
//! An integral accumulator holds, at every position, the sum of the field
//! over all positions with each spatial coordinate less than or equal to
//! the corresponding one, per channel. Any box sum then costs four table
//! lookups in 2D and eight in 3D. Sums are accumulated in `f64` while the
//! field itself stays `f32`.

use alloc::vec::Vec;

use crate::field::{Field2, Field3};

/// Prefix-sum table over a [`Field2`].
#[derive(Clone, Debug)]
pub struct IntegralImage {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    /// Same layout as the source field, `f64` entries.
    pub data: Vec<f64>,
}

impl IntegralImage {
    /// Build the prefix-sum table of `field`.
    pub fn new(field: &Field2) -> Self {
        Self::build(field, |v| v as f64)
    }

    /// Build the prefix-sum table of the squared field values.
    ///
    /// Combined with [`IntegralImage::new`] this supports variance
    /// computation via the mean of squares.
    pub fn of_squares(field: &Field2) -> Self {
        Self::build(field, |v| v as f64 * v as f64)
    }

    fn build(field: &Field2, map: impl Fn(f32) -> f64) -> Self {
        let (w, h, nc) = (field.w, field.h, field.channels);
        let mut data: Vec<f64> = field.data.iter().map(|&v| map(v)).collect();

        // cumulative sum along x, row by row
        for y in 0..h {
            for x in 1..w {
                for ch in 0..nc {
                    data[(y * w + x) * nc + ch] += data[(y * w + x - 1) * nc + ch];
                }
            }
        }
        // cumulative sum along y
        for y in 1..h {
            for x in 0..w {
                for ch in 0..nc {
                    data[(y * w + x) * nc + ch] += data[((y - 1) * w + x) * nc + ch];
                }
            }
        }

        Self {
            w,
            h,
            channels: nc,
            data,
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize, ch: usize) -> f64 {
        self.data[(y * self.w + x) * self.channels + ch]
    }

    /// Table lookup for an inclusion–exclusion corner. A corner whose row
    /// or column would be `-1` addresses a rectangle that lies entirely
    /// outside the field and contributes zero.
    #[inline]
    fn corner(&self, x: i64, y: i64, ch: usize) -> f64 {
        if x < 0 || y < 0 {
            return 0.0;
        }
        self.at(x as usize, y as usize, ch)
    }

    /// Sum of the original field over the closed box
    /// `[x-r, x+r] × [y-r, y+r]` in channel `ch`.
    ///
    /// Returns `None` when the box extends outside the field on any side.
    /// Partial (clipped) boxes are deliberately not summed; the statistics
    /// layer substitutes its border fill instead.
    pub fn box_sum(&self, x: usize, y: usize, ch: usize, r: u32) -> Option<f64> {
        let r = r as i64;
        let (x, y) = (x as i64, y as i64);
        if x < r || y < r || x + r > self.w as i64 - 1 || y + r > self.h as i64 - 1 {
            return None;
        }

        let sum = self.corner(x + r, y + r, ch) - self.corner(x + r, y - r - 1, ch)
            - self.corner(x - r - 1, y + r, ch)
            + self.corner(x - r - 1, y - r - 1, ch);
        Some(sum)
    }
}

/// Prefix-sum table over a [`Field3`].
#[derive(Clone, Debug)]
pub struct IntegralVolume {
    pub w: usize,
    pub h: usize,
    pub d: usize,
    pub channels: usize,
    /// Same layout as the source field, `f64` entries.
    pub data: Vec<f64>,
}

impl IntegralVolume {
    /// Build the prefix-sum table of `field`.
    pub fn new(field: &Field3) -> Self {
        Self::build(field, |v| v as f64)
    }

    /// Build the prefix-sum table of the squared field values.
    pub fn of_squares(field: &Field3) -> Self {
        Self::build(field, |v| v as f64 * v as f64)
    }

    fn build(field: &Field3, map: impl Fn(f32) -> f64) -> Self {
        let (w, h, d, nc) = (field.w, field.h, field.d, field.channels);
        let mut data: Vec<f64> = field.data.iter().map(|&v| map(v)).collect();

        let idx = |x: usize, y: usize, z: usize, ch: usize| ((z * h + y) * w + x) * nc + ch;

        // one cumulative-sum sweep per axis; each sweep is sequential
        // along its own axis and independent along the others
        for z in 0..d {
            for y in 0..h {
                for x in 1..w {
                    for ch in 0..nc {
                        data[idx(x, y, z, ch)] += data[idx(x - 1, y, z, ch)];
                    }
                }
            }
        }
        for z in 0..d {
            for y in 1..h {
                for x in 0..w {
                    for ch in 0..nc {
                        data[idx(x, y, z, ch)] += data[idx(x, y - 1, z, ch)];
                    }
                }
            }
        }
        for z in 1..d {
            for y in 0..h {
                for x in 0..w {
                    for ch in 0..nc {
                        data[idx(x, y, z, ch)] += data[idx(x, y, z - 1, ch)];
                    }
                }
            }
        }

        Self {
            w,
            h,
            d,
            channels: nc,
            data,
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize, z: usize, ch: usize) -> f64 {
        self.data[((z * self.h + y) * self.w + x) * self.channels + ch]
    }

    /// Table lookup for an inclusion–exclusion corner; each coordinate is
    /// checked independently, so a `-1` along any axis zeroes the term.
    #[inline]
    fn corner(&self, x: i64, y: i64, z: i64, ch: usize) -> f64 {
        if x < 0 || y < 0 || z < 0 {
            return 0.0;
        }
        self.at(x as usize, y as usize, z as usize, ch)
    }

    /// Sum of the original field over the closed cube
    /// `[x-r, x+r] × [y-r, y+r] × [z-r, z+r]` in channel `ch`.
    ///
    /// Returns `None` when the cube extends outside the field on any side,
    /// mirroring [`IntegralImage::box_sum`].
    pub fn box_sum(&self, x: usize, y: usize, z: usize, ch: usize, r: u32) -> Option<f64> {
        let r = r as i64;
        let (x, y, z) = (x as i64, y as i64, z as i64);
        if x < r
            || y < r
            || z < r
            || x + r > self.w as i64 - 1
            || y + r > self.h as i64 - 1
            || z + r > self.d as i64 - 1
        {
            return None;
        }

        let (xl, xh) = (x - r - 1, x + r);
        let (yl, yh) = (y - r - 1, y + r);
        let (zl, zh) = (z - r - 1, z + r);

        // 8-corner inclusion–exclusion: sign flips with every low face
        let sum = self.corner(xh, yh, zh, ch)
            - self.corner(xl, yh, zh, ch)
            - self.corner(xh, yl, zh, ch)
            - self.corner(xh, yh, zl, ch)
            + self.corner(xl, yl, zh, ch)
            + self.corner(xl, yh, zl, ch)
            + self.corner(xh, yl, zl, ch)
            - self.corner(xl, yl, zl, ch);
        Some(sum)
    }
}
