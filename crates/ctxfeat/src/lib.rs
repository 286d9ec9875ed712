//! Ergonomic wrappers over `ctxfeat-core` that accept `image::GrayImage`
//! inputs.
//!
//! This crate is organized into a few focused modules:
//! - [`image`] – conversions between grayscale images and field types,
//!   plus single-call feature helpers.
//! - [`app`] – a JSON-config-driven runner shared by the CLI example.
//! - [`logger`] – a simple `log` implementation used by examples.

pub mod app;
pub mod image;
pub mod logger;

// Re-export a focused subset of core types for convenience. Consumers
// that need lower-level primitives (fields, integral tables, per-location
// statistics) are encouraged to depend on `ctxfeat-core` directly.
pub use ctxfeat_core::{
    mean_context_2d, mean_context_3d, mean_var_context_2d, mean_var_context_3d, BorderFill,
    ContextParams, Field2, Field3,
};

// High-level helpers on `image::GrayImage`.
pub use crate::image::{
    field_from_image, field_from_planes, mean_context_image, mean_var_context_image,
    plane_to_image,
};
