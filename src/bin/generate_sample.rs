use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

/// Normal deviate via the Marsaglia polar method.
fn normal(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    loop {
        let u: f64 = rng.gen_range(-1.0..1.0);
        let v: f64 = rng.gen_range(-1.0..1.0);
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return mean + std_dev * u * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

/// Provisional designation like `2026 KQ17`.
fn designation(rng: &mut impl Rng, year: i32) -> String {
    const HALF_MONTH: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXY";
    const ORDER: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";
    let h = HALF_MONTH[rng.gen_range(0..HALF_MONTH.len())] as char;
    let o = ORDER[rng.gen_range(0..ORDER.len())] as char;
    match rng.gen_range(0..40u32) {
        0 => format!("{year} {h}{o}"),
        n => format!("{year} {h}{o}{n}"),
    }
}

/// Julian date `days_since_epoch` days after 2026-01-01 00:00 UTC.
fn julian_date(days_since_epoch: f64) -> f64 {
    2_461_041.5 + days_since_epoch
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_cad.json".to_string());

    let mut rng = StdRng::seed_from_u64(42);
    let epoch = NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("sample epoch")?;

    let n_rows = 320;
    let horizon_days = 730.0;

    let mut rows: Vec<Vec<Value>> = (0..n_rows)
        .map(|_| {
            let day = rng.gen_range(0.0..horizon_days);
            let when = epoch + Duration::minutes((day * 24.0 * 60.0) as i64);

            // Mostly inside the 0.05 AU window, a tail beyond it.
            let dist_min = rng.gen_range(0.0002..0.07);
            // Well-observed orbits have tiny uncertainty; a few are wide.
            let spread = if rng.gen_bool(0.1) { 0.004 } else { 0.0004 };
            let mut delta = normal(&mut rng, 0.0, spread).abs();
            if rng.gen_bool(0.01) {
                // rare anomaly: minimum above nominal
                delta = -delta;
            }
            let dist = dist_min + delta;
            let dist_max = dist + delta.abs();
            let v_rel: f64 = rng.gen_range(2.0..30.0);
            let v_inf = if rng.gen_bool(0.05) {
                Value::Null
            } else {
                json!(format!("{:.9}", (v_rel - rng.gen_range(0.0..0.2)).max(0.1)))
            };
            let h = normal(&mut rng, 25.0, 2.5).clamp(15.0, 33.0);
            let t_sigma = if delta.abs() < 0.0005 { "< 00:01" } else { "00:07" };

            vec![
                json!(designation(&mut rng, when.year())),
                json!(format!("{}", rng.gen_range(1..=40u32))),
                json!(format!("{:.9}", julian_date(day))),
                json!(when.format("%Y-%b-%d %H:%M").to_string()),
                json!(format!("{dist:.14}")),
                json!(format!("{dist_min:.14}")),
                json!(format!("{dist_max:.14}")),
                json!(format!("{v_rel:.9}")),
                v_inf,
                json!(t_sigma),
                json!(format!("{h:.1}")),
            ]
        })
        .collect();

    // The API orders by approach date.
    rows.sort_by(|a, b| {
        a[2].as_str()
            .unwrap_or_default()
            .cmp(b[2].as_str().unwrap_or_default())
    });

    let body = json!({
        "signature": {
            "source": "NASA/JPL SBDB Close Approach Data API",
            "version": "1.5"
        },
        "count": rows.len().to_string(),
        "fields": [
            "des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max",
            "v_rel", "v_inf", "t_sigma_f", "h"
        ],
        "data": rows,
    });

    let text = serde_json::to_string_pretty(&body).context("serializing sample")?;
    std::fs::write(&output_path, text).with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {n_rows} close approaches to {output_path}");
    Ok(())
}
