// Regenerates binary golden dumps of mean+variance context features for
// every PNG under testdata/images. Layout per file: w, h, channels as
// u32 LE, then the feature data in field order (channel fastest).
use ctxfeat::{field_from_image, mean_var_context_2d, ContextParams};
use image::ImageReader;
use std::{fs::File, io::Write, path::Path};

fn write_golden(
    path_out: &Path,
    w: usize,
    h: usize,
    channels: usize,
    data: &[f32],
) -> std::io::Result<()> {
    let mut f = File::create(path_out)?;
    f.write_all(&(w as u32).to_le_bytes())?;
    f.write_all(&(h as u32).to_le_bytes())?;
    f.write_all(&(channels as u32).to_le_bytes())?;
    for v in data {
        f.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let imgs = std::fs::read_dir("testdata/images")?;
    std::fs::create_dir_all("testdata/golden")?;

    let params = ContextParams::default();

    for e in imgs {
        let p = e?.path();
        if p.extension().and_then(|s| s.to_str()) != Some("png") {
            continue;
        }
        let img = ImageReader::open(&p)?.decode()?.to_luma8();

        let field = field_from_image(&img);
        let feats = mean_var_context_2d(&field, &params);

        let name = p.file_stem().unwrap().to_string_lossy();
        let out = Path::new("testdata/golden").join(format!("{name}.bin"));
        write_golden(&out, feats.w, feats.h, feats.channels, &feats.data)?;
        println!("golden: {:?} -> {:?}", p, out);
    }
    Ok(())
}
