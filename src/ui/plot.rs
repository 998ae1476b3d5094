use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::data::model::ApproachRecord;
use crate::state::{AppState, LoadState};

const LINE_NAME: &str = "Equal Distance Line";

// ---------------------------------------------------------------------------
// Approach-distance scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Hover text for one point, numbers to five decimals.
fn hover_text(r: &ApproachRecord) -> String {
    let opt = |v: Option<f64>| v.map(|x| format!("{x:.5}")).unwrap_or_else(|| "–".into());
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "–".into());
    format!(
        "{} (orbit {})\nClose Approach Date: {} (JD {}, ± {})\n\
         Nominal Distance (AU): {:.5}\nMinimum Distance (AU): {:.5}\nMaximum Distance (AU): {}\n\
         Delta (AU): {:.5}\nRelative Velocity (km/s): {}\nInfinity Velocity (km/s): {}\n\
         Absolute Magnitude: {}",
        r.des,
        text(&r.orbit_id),
        r.cd_formatted,
        text(&r.jd),
        text(&r.t_sigma_f),
        r.dist,
        r.dist_min,
        opt(r.dist_max),
        r.dist_delta,
        opt(r.v_rel),
        opt(r.v_inf),
        opt(r.h),
    )
}

/// Render the scatter plot of the kept records.
pub fn approach_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| match &state.load_state {
                LoadState::Failed(msg) => {
                    ui.heading(format!("Could not load close approaches: {msg}"));
                }
                _ => {
                    ui.heading("Fetching close approaches…");
                }
            });
            return;
        }
    };

    ui.heading("NEO Approach Distances");

    // (x, y, text) of every kept point for the hover lookup
    let hover: Vec<([f64; 2], String)> = state
        .partition
        .kept
        .iter()
        .map(|&i| {
            let r = &dataset.records[i];
            ([r.dist_min, r.dist], hover_text(r))
        })
        .collect();

    // Group the kept points by uncertainty band.
    let mut groups: Vec<Vec<[f64; 2]>> = match &state.color_scale {
        Some(scale) => vec![Vec::new(); scale.bands().len()],
        None => Vec::new(),
    };
    if let Some(scale) = &state.color_scale {
        for &i in &state.partition.kept {
            let r = &dataset.records[i];
            groups[scale.band_of(r.dist_delta)].push([r.dist_min, r.dist]);
        }
    }

    Plot::new("approach_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Minimum Distance (AU)")
        .y_axis_label("Nominal Distance (AU)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() || name == LINE_NAME {
                return format!("min {:.5} AU\nnominal {:.5} AU", value.x, value.y);
            }
            nearest(&hover, value)
                .map(str::to_string)
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            if let Some(scale) = &state.color_scale {
                for (band, points) in scale.bands().iter().zip(groups) {
                    if points.is_empty() {
                        continue;
                    }
                    let points: PlotPoints = points.into_iter().collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(band.label())
                            .color(band.color)
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(3.5),
                    );
                }
            }

            if let Some(end) = state.summary.and_then(|s| s.reference_end) {
                let line: PlotPoints = vec![[0.0, 0.0], end].into_iter().collect();
                plot_ui.line(
                    Line::new(line)
                        .name(LINE_NAME)
                        .color(Color32::ORANGE)
                        .width(1.5),
                );
            }
        });
}

/// Text of the hover entry closest to `value`.
fn nearest<'a>(hover: &'a [([f64; 2], String)], value: &PlotPoint) -> Option<&'a str> {
    hover
        .iter()
        .map(|(p, text)| {
            let d = (p[0] - value.x).powi(2) + (p[1] - value.y).powi(2);
            (d, text)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, text)| text.as_str())
}
