#![cfg_attr(not(feature = "std"), no_std)]
//! Core primitives for computing multi-scale context statistics over
//! class-probability fields.
//!
//! # Overview
//!
//! This crate exposes three main building blocks:
//!
//! - [`field`] – owned 2D/3D multi-channel scalar fields.
//! - [`integral`] – integral images/volumes with O(1) axis-aligned box
//!   sums via inclusion–exclusion.
//! - [`context`] – drivers that turn a probability field into a feature
//!   field of local means (and optionally variances) at several scales.
//!
//! The statistic at each location, channel, and radius is the average of
//! the field over a concentric square (2D) or cube (3D) neighborhood of
//! side `2r + 1`. Radii are processed in increasing order and each radius
//! only accounts for the annulus between its box and the previous one, so
//! a single integral accumulator serves the whole radius list. Locations
//! whose neighborhood exits the field receive a configurable fill value
//! instead of a partial sum (see [`BorderFill`]).
//!
//! # Features
//!
//! - `std` *(default)* – enables use of the Rust standard library. When
//!   disabled, the crate is `no_std` + `alloc`.
//! - `rayon` – parallelizes the drivers over image rows / volume slabs
//!   using the `rayon` crate. This does not change numerical results,
//!   only performance on multi-core machines.
//! - `tracing` – instruments the driver entry points with the `tracing`
//!   crate for opt-in diagnostics.
//!
//! The per-location statistics in [`features`] are independent of
//! `rayon`/`tracing` and run the same logic regardless of these features;
//! only scheduling and diagnostics change.

extern crate alloc;

pub mod context;
pub mod features;
pub mod field;
pub mod integral;

use alloc::vec;
use alloc::vec::Vec;

/// Fill policy for neighborhoods that extend past the field border.
///
/// No partial (clipped) box sums are computed at the border; the affected
/// radii are filled with this value instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BorderFill {
    /// `1 / nclasses`, so a filled "average prediction" matches a uniform
    /// prior over the field's channels.
    UniformPrior,
    /// A fixed value, e.g. `0.0`.
    Constant(f32),
}

impl BorderFill {
    /// Resolve the policy to a concrete value for a field with `nclasses`
    /// channels.
    #[inline]
    pub fn value(self, nclasses: usize) -> f32 {
        match self {
            BorderFill::UniformPrior => 1.0 / nclasses as f32,
            BorderFill::Constant(v) => v,
        }
    }
}

/// Tunable parameters for context-feature computation.
#[derive(Clone, Debug)]
pub struct ContextParams {
    /// Neighborhood radii in cells, strictly increasing. A radius `r`
    /// spans a square/cube of side `2r + 1` centered on the location.
    pub radii: Vec<u32>,
    /// Value written for radii whose neighborhood exits the field.
    pub border_fill: BorderFill,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            radii: vec![1, 3, 5],
            border_fill: BorderFill::UniformPrior,
        }
    }
}

pub use crate::context::{
    mean_context_2d, mean_context_3d, mean_var_context_2d, mean_var_context_3d,
};
pub use crate::field::{Field2, Field3};
pub use crate::integral::{IntegralImage, IntegralVolume};
