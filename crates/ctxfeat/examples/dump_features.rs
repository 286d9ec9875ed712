use anyhow::Context;
use ctxfeat::{
    field_from_image, mean_context_2d, mean_var_context_2d, plane_to_image, BorderFill,
    ContextParams,
};
use image::ImageReader;
use serde::Serialize;
use std::time::Instant;
use std::{fs::File, io::Write, path::PathBuf};

#[derive(Serialize)]
struct PlaneOut {
    channel: usize,
    min: f32,
    max: f32,
}

#[derive(Serialize)]
struct FeatureOut {
    image: String,
    width: u32,
    height: u32,
    radii: Vec<u32>,
    variance: bool,
    feature_channels: usize,
    planes: Vec<PlaneOut>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input: PathBuf = args
        .next()
        .expect("usage: dump_features <image> [--radii 1,3,5] [--variance]")
        .into();

    let mut radii: Vec<u32> = vec![1, 3, 5];
    let mut variance = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--radii" => {
                let v = args.next().context("expected a list after --radii")?;
                radii = v
                    .split(',')
                    .map(|s| s.trim().parse())
                    .collect::<Result<_, _>>()
                    .context("could not parse radii (use comma-separated integers)")?;
                if radii.is_empty() || !radii.windows(2).all(|w| w[0] < w[1]) {
                    anyhow::bail!("radii must be non-empty and strictly increasing");
                }
            }
            "--variance" => variance = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let img = ImageReader::open(&input)?.decode()?.to_luma8();
    let field = field_from_image(&img);

    let params = ContextParams {
        radii: radii.clone(),
        border_fill: BorderFill::UniformPrior,
    };

    let feat_started = Instant::now();
    let feats = if variance {
        mean_var_context_2d(&field, &params)
    } else {
        mean_context_2d(&field, &params)
    };
    let feat_ms = feat_started.elapsed().as_secs_f64() * 1000.0;

    println!("image {}x{} pixels", img.width(), img.height());
    println!(
        "features: {:5.2} ms ({} planes, radii {:?})",
        feat_ms, feats.channels, radii
    );

    let mut planes = Vec::with_capacity(feats.channels);
    for ch in 0..feats.channels {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for y in 0..feats.h {
            for x in 0..feats.w {
                let v = feats.at(x, y, ch);
                min = min.min(v);
                max = max.max(v);
            }
        }
        planes.push(PlaneOut { channel: ch, min, max });
    }

    let json_out = input.with_extension("features.json");
    let dump = FeatureOut {
        image: input.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        radii: radii.clone(),
        variance,
        feature_channels: feats.channels,
        planes,
    };
    let mut json_file = File::create(&json_out)?;
    serde_json::to_writer_pretty(&mut json_file, &dump)?;
    json_file.write_all(b"\n")?;
    println!("Saved JSON dump to {}", json_out.display());

    // visualize the widest-scale mean plane
    let png_out = input.with_extension("features.png");
    plane_to_image(&feats, radii.len() - 1).save(&png_out)?;
    println!("Saved visualization to {}", png_out.display());

    Ok(())
}
