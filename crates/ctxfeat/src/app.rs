//! Shared application-level helpers for CLI and examples.
//!
//! These functions wire up I/O (load image, JSON/PNG output) around the
//! feature computation so the example binary and any future CLI can share
//! the same behavior.

use crate::image::{field_from_image, plane_to_image};
use anyhow::{Context, Result};
use ctxfeat_core::{mean_context_2d, mean_var_context_2d, BorderFill, ContextParams, Field2};
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path, path::PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContextConfig {
    pub image: PathBuf,
    /// Neighborhood radii; defaults to the core's `[1, 3, 5]`.
    pub radii: Option<Vec<u32>>,
    /// Also compute per-radius variances.
    pub variance: Option<bool>,
    /// Constant border fill; defaults to the uniform prior `1/nclasses`.
    pub border_fill: Option<f32>,
    pub output_json: Option<PathBuf>,
    pub output_png: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Per-plane summary included in the JSON dump.
#[derive(Serialize)]
pub struct PlaneSummary {
    pub channel: usize,
    pub radius: u32,
    pub statistic: String,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

#[derive(Serialize)]
pub struct FeatureDump {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub radii: Vec<u32>,
    pub variance: bool,
    pub feature_channels: usize,
    pub planes: Vec<PlaneSummary>,
}

pub fn run_context(cfg: ContextConfig) -> Result<()> {
    if let Some(level) = &cfg.log_level {
        let _ = crate::logger::init(level);
    }

    let radii = cfg.radii.clone().unwrap_or_else(|| vec![1, 3, 5]);
    if radii.is_empty() {
        anyhow::bail!("radii must not be empty");
    }
    if !radii.windows(2).all(|w| w[0] < w[1]) {
        anyhow::bail!("radii must be strictly increasing");
    }
    if let Some(fill) = cfg.border_fill {
        if !fill.is_finite() {
            anyhow::bail!("border fill must be finite");
        }
    }

    let variance = cfg.variance.unwrap_or(false);
    let params = ContextParams {
        radii: radii.clone(),
        border_fill: cfg
            .border_fill
            .map(BorderFill::Constant)
            .unwrap_or(BorderFill::UniformPrior),
    };

    let img = ImageReader::open(&cfg.image)
        .with_context(|| format!("opening image {}", cfg.image.display()))?
        .decode()?
        .to_luma8();
    let field = field_from_image(&img);

    log::info!(
        "computing {} context features for {} ({}x{}, {} radii)",
        if variance { "mean+variance" } else { "mean" },
        cfg.image.display(),
        img.width(),
        img.height(),
        radii.len()
    );

    let feats = if variance {
        mean_var_context_2d(&field, &params)
    } else {
        mean_context_2d(&field, &params)
    };

    let dump = FeatureDump {
        image: cfg.image.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        radii: radii.clone(),
        variance,
        feature_channels: feats.channels,
        planes: summarize_planes(&feats, &radii, variance),
    };

    let json_out = cfg
        .output_json
        .unwrap_or_else(|| cfg.image.with_extension("features.json"));
    write_json(&json_out, &dump)?;

    // visualize the widest-scale mean plane of the first input channel
    let png_out = cfg
        .output_png
        .unwrap_or_else(|| cfg.image.with_extension("features.png"));
    plane_to_image(&feats, radii.len() - 1)
        .save(&png_out)
        .with_context(|| format!("saving {}", png_out.display()))?;

    Ok(())
}

/// Min/max/mean per feature plane, tagged with the radius and statistic
/// the plane's channel index decodes to.
fn summarize_planes(feats: &Field2, radii: &[u32], variance: bool) -> Vec<PlaneSummary> {
    let nr = radii.len();
    let block = if variance { 2 * nr } else { nr };
    let mut planes = Vec::with_capacity(feats.channels);

    for fc in 0..feats.channels {
        let channel = fc / block;
        let within = fc % block;
        let (statistic, radius) = if within < nr {
            ("mean", radii[within])
        } else {
            ("variance", radii[within - nr])
        };

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for y in 0..feats.h {
            for x in 0..feats.w {
                let v = feats.at(x, y, fc);
                min = min.min(v);
                max = max.max(v);
                sum += v as f64;
            }
        }
        let n = (feats.w * feats.h).max(1);
        planes.push(PlaneSummary {
            channel,
            radius,
            statistic: statistic.to_string(),
            min,
            max,
            mean: (sum / n as f64) as f32,
        });
    }

    planes
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file = File::create(path)?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<ContextConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: ContextConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_summaries_decode_the_channel_layout() {
        let mut feats = Field2::new(2, 2, 8);
        for (i, v) in feats.data.iter_mut().enumerate() {
            *v = i as f32;
        }
        let radii = vec![1, 2];
        let planes = summarize_planes(&feats, &radii, true);

        assert_eq!(planes.len(), 8);
        assert_eq!(planes[0].channel, 0);
        assert_eq!(planes[0].statistic, "mean");
        assert_eq!(planes[0].radius, 1);
        assert_eq!(planes[3].statistic, "variance");
        assert_eq!(planes[3].radius, 2);
        assert_eq!(planes[4].channel, 1);
        assert_eq!(planes[4].statistic, "mean");
    }

    #[test]
    fn mean_only_summaries_use_single_blocks() {
        let feats = Field2::new(3, 3, 6);
        let radii = vec![1, 2, 4];
        let planes = summarize_planes(&feats, &radii, false);

        assert_eq!(planes.len(), 6);
        assert_eq!(planes[2].channel, 0);
        assert_eq!(planes[2].radius, 4);
        assert_eq!(planes[5].channel, 1);
        assert_eq!(planes[5].radius, 4);
        assert!(planes.iter().all(|p| p.statistic == "mean"));
    }
}
