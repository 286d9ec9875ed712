//! Full-pipeline checks against a brute-force reference.
//!
//! The reference recomputes every annulus statistic directly from the
//! field values, so any disagreement points at the integral tables, the
//! inclusion–exclusion corners, or the running annulus subtraction.

use ctxfeat_core::{
    mean_context_2d, mean_context_3d, mean_var_context_2d, mean_var_context_3d, BorderFill,
    ContextParams, Field2, Field3,
};

fn cell(x: usize, y: usize, z: usize, ch: usize) -> f32 {
    ((x * 31 + y * 17 + z * 29 + ch * 7) % 13) as f32 / 13.0
}

fn make_field_2d(w: usize, h: usize, nc: usize) -> Field2 {
    let mut f = Field2::new(w, h, nc);
    for y in 0..h {
        for x in 0..w {
            for ch in 0..nc {
                f.set(x, y, ch, cell(x, y, 0, ch));
            }
        }
    }
    f
}

fn make_field_3d(w: usize, h: usize, d: usize, nc: usize) -> Field3 {
    let mut f = Field3::new(w, h, d, nc);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                for ch in 0..nc {
                    f.set(x, y, z, ch, cell(x, y, z, ch));
                }
            }
        }
    }
    f
}

/// Direct per-radius mean and variance at one 2D location, without
/// integral tables: sum the annulus cells one by one.
fn reference_stats_2d(
    f: &Field2,
    x: usize,
    y: usize,
    ch: usize,
    radii: &[u32],
    fill: f32,
) -> Vec<(f32, f32)> {
    let mut out = Vec::with_capacity(radii.len());
    let mut prev: Option<u32> = None;

    for &r in radii {
        let ri = r as i64;
        let (xi, yi) = (x as i64, y as i64);
        let inside =
            xi >= ri && yi >= ri && xi + ri <= f.w as i64 - 1 && yi + ri <= f.h as i64 - 1;
        if !inside {
            out.push((fill, fill - fill * fill));
            continue;
        }

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut n = 0u64;
        let hole = prev.map(|p| p as i64);
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if let Some(p) = hole {
                    if dx.abs() <= p && dy.abs() <= p {
                        continue;
                    }
                }
                let v = f.at((xi + dx) as usize, (yi + dy) as usize, ch) as f64;
                sum += v;
                sum_sq += v * v;
                n += 1;
            }
        }
        let mean = sum / n as f64;
        let mean_sq = sum_sq / n as f64;
        out.push((mean as f32, (mean_sq - mean as f64 * mean as f64) as f32));
        prev = Some(r);
    }
    out
}

fn reference_stats_3d(
    f: &Field3,
    x: usize,
    y: usize,
    z: usize,
    ch: usize,
    radii: &[u32],
    fill: f32,
) -> Vec<(f32, f32)> {
    let mut out = Vec::with_capacity(radii.len());
    let mut prev: Option<u32> = None;

    for &r in radii {
        let ri = r as i64;
        let (xi, yi, zi) = (x as i64, y as i64, z as i64);
        let inside = xi >= ri
            && yi >= ri
            && zi >= ri
            && xi + ri <= f.w as i64 - 1
            && yi + ri <= f.h as i64 - 1
            && zi + ri <= f.d as i64 - 1;
        if !inside {
            out.push((fill, fill - fill * fill));
            continue;
        }

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut n = 0u64;
        let hole = prev.map(|p| p as i64);
        for dz in -ri..=ri {
            for dy in -ri..=ri {
                for dx in -ri..=ri {
                    if let Some(p) = hole {
                        if dx.abs() <= p && dy.abs() <= p && dz.abs() <= p {
                            continue;
                        }
                    }
                    let v = f
                        .at((xi + dx) as usize, (yi + dy) as usize, (zi + dz) as usize, ch)
                        as f64;
                    sum += v;
                    sum_sq += v * v;
                    n += 1;
                }
            }
        }
        let mean = sum / n as f64;
        let mean_sq = sum_sq / n as f64;
        out.push((mean as f32, (mean_sq - mean as f64 * mean as f64) as f32));
        prev = Some(r);
    }
    out
}

#[test]
fn mean_pipeline_matches_reference_2d() {
    let f = make_field_2d(13, 9, 3);
    let radii = vec![1u32, 2, 4];
    let params = ContextParams {
        radii: radii.clone(),
        border_fill: BorderFill::UniformPrior,
    };
    let fill = 1.0 / 3.0;
    let nr = radii.len();

    let out = mean_context_2d(&f, &params);

    for y in 0..f.h {
        for x in 0..f.w {
            for ch in 0..f.channels {
                let want = reference_stats_2d(&f, x, y, ch, &radii, fill);
                for i in 0..nr {
                    let got = out.at(x, y, ch * nr + i);
                    assert!(
                        (got - want[i].0).abs() < 1e-5,
                        "mean mismatch at ({x},{y}) ch={ch} i={i}: {got} vs {}",
                        want[i].0
                    );
                }
            }
        }
    }
}

#[test]
fn mean_var_pipeline_matches_reference_2d() {
    let f = make_field_2d(11, 11, 2);
    let radii = vec![1u32, 3];
    let params = ContextParams {
        radii: radii.clone(),
        border_fill: BorderFill::UniformPrior,
    };
    let fill = 0.5;
    let nr = radii.len();

    let out = mean_var_context_2d(&f, &params);

    for y in 0..f.h {
        for x in 0..f.w {
            for ch in 0..f.channels {
                let want = reference_stats_2d(&f, x, y, ch, &radii, fill);
                for i in 0..nr {
                    let mean = out.at(x, y, ch * 2 * nr + i);
                    let var = out.at(x, y, ch * 2 * nr + nr + i);
                    assert!(
                        (mean - want[i].0).abs() < 1e-5,
                        "mean mismatch at ({x},{y}) ch={ch} i={i}"
                    );
                    assert!(
                        (var - want[i].1).abs() < 1e-4,
                        "variance mismatch at ({x},{y}) ch={ch} i={i}: {var} vs {}",
                        want[i].1
                    );
                }
            }
        }
    }
}

#[test]
fn mean_pipeline_matches_reference_3d() {
    let f = make_field_3d(7, 6, 5, 2);
    let radii = vec![1u32, 2];
    let params = ContextParams {
        radii: radii.clone(),
        border_fill: BorderFill::UniformPrior,
    };
    let fill = 0.5;
    let nr = radii.len();

    let out = mean_context_3d(&f, &params);

    for z in 0..f.d {
        for y in 0..f.h {
            for x in 0..f.w {
                for ch in 0..f.channels {
                    let want = reference_stats_3d(&f, x, y, z, ch, &radii, fill);
                    for i in 0..nr {
                        let got = out.at(x, y, z, ch * nr + i);
                        assert!(
                            (got - want[i].0).abs() < 1e-5,
                            "mean mismatch at ({x},{y},{z}) ch={ch} i={i}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn mean_var_pipeline_matches_reference_3d() {
    let f = make_field_3d(6, 6, 6, 2);
    let radii = vec![1u32, 2];
    let params = ContextParams {
        radii: radii.clone(),
        border_fill: BorderFill::UniformPrior,
    };
    let fill = 0.5;
    let nr = radii.len();

    let out = mean_var_context_3d(&f, &params);

    for z in 0..f.d {
        for y in 0..f.h {
            for x in 0..f.w {
                for ch in 0..f.channels {
                    let want = reference_stats_3d(&f, x, y, z, ch, &radii, fill);
                    for i in 0..nr {
                        let mean = out.at(x, y, z, ch * 2 * nr + i);
                        let var = out.at(x, y, z, ch * 2 * nr + nr + i);
                        assert!(
                            (mean - want[i].0).abs() < 1e-5,
                            "mean mismatch at ({x},{y},{z}) ch={ch} i={i}"
                        );
                        assert!(
                            (var - want[i].1).abs() < 1e-4,
                            "variance mismatch at ({x},{y},{z}) ch={ch} i={i}"
                        );
                    }
                }
            }
        }
    }
}
