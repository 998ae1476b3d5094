use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{au_slider_index, au_slider_options, FilterBounds, AU_SLIDER_MAX};
use crate::state::{AppState, LoadState, Page};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Page selector, reload button, counts and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.selectable_value(&mut state.page, Page::Lunar, "🌙 Lunar Phase");
        ui.selectable_value(&mut state.page, Page::Neo, "🛰 Near Earth Objects");

        ui.separator();

        if state.page == Page::Neo {
            let reload = ui.add_enabled(!state.is_loading(), egui::Button::new("⟳ Reload"));
            if reload.clicked() {
                let ctx = ui.ctx().clone();
                state.reload(move || ctx.request_repaint());
            }

            if state.load_state == LoadState::Loading {
                ui.spinner();
                ui.label("Fetching close approaches…");
            } else if let Some(summary) = &state.summary {
                ui.label(format!(
                    "{} approaches loaded, {} visible",
                    summary.total, summary.kept
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel
// ---------------------------------------------------------------------------

/// Render the side panel for the current page.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    match state.page {
        Page::Lunar => {
            ui.heading(RichText::new("🌙 Lunar Phase").color(Color32::ORANGE));
            ui.separator();
            ui.label("Select “Near Earth Objects” in the top bar for close-approach data.");
        }
        Page::Neo => {
            ui.heading(RichText::new("🛰 Near Earth Objects").color(Color32::ORANGE));
            ui.separator();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| neo_controls(ui, state));
        }
    }
}

fn neo_controls(ui: &mut Ui, state: &mut AppState) {
    about(ui, state);

    let Some(mut bounds) = state.bounds else {
        ui.label("No data loaded.");
        return;
    };

    egui::CollapsingHeader::new(RichText::new("Filters").strong().color(Color32::GREEN))
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            // ---- Approach date ----
            ui.label(RichText::new("Approach Date").color(Color32::ORANGE));
            egui::Grid::new("date_filters").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("Start Date");
                ui.add(DatePickerButton::new(&mut bounds.start).id_salt("start_date"));
                ui.end_row();
                ui.label("End Date");
                ui.add(DatePickerButton::new(&mut bounds.end).id_salt("end_date"));
                ui.end_row();
            });
            if bounds.start > bounds.end {
                ui.label(
                    RichText::new("Start date is after end date: nothing matches.")
                        .color(Color32::YELLOW),
                );
            }
            ui.add_space(6.0);

            // ---- Minimum distance range ----
            ui.label(RichText::new("Closest Approach (AU)").color(Color32::ORANGE));
            let options = au_slider_options();
            let min_changed = au_slider(ui, &options, &mut bounds.min_au, "from");
            let max_changed = au_slider(ui, &options, &mut bounds.max_au, "to");
            // behave like a range slider: the handles push each other
            if bounds.min_au > bounds.max_au {
                if min_changed {
                    bounds.max_au = bounds.min_au;
                } else if max_changed {
                    bounds.min_au = bounds.max_au;
                }
            }
            if bounds.max_au > AU_SLIDER_MAX {
                ui.label(
                    RichText::new(format!("Upper bound {:.4} AU is past the slider", bounds.max_au))
                        .color(Color32::GRAY),
                );
            }

            let full = state.dataset.as_deref().and_then(FilterBounds::covering);
            if ui
                .add_enabled(full.is_some(), egui::Button::new("Full range"))
                .on_hover_text("Every observed date and distance")
                .clicked()
            {
                if let Some(full) = full {
                    bounds = full;
                }
            }
            ui.add_space(6.0);

            if let Some(summary) = &state.summary {
                ui.label(summary.caption());
            }
            ui.checkbox(&mut state.show_excluded, "Show filtered out data");
        });

    ui.separator();
    ui.checkbox(&mut state.show_raw, "Show raw data");

    state.set_bounds(bounds);
}

/// Slider over the discrete distance options. Only writes `value` when the
/// handle moved, so off-grid bounds survive until touched.
fn au_slider(ui: &mut Ui, options: &[f64], value: &mut f64, text: &str) -> bool {
    let mut idx = au_slider_index(*value);
    let last = options.len().saturating_sub(1);
    let changed = ui
        .add(
            egui::Slider::new(&mut idx, 0..=last)
                .custom_formatter(|i, _| format!("{:.3}", options[i as usize]))
                .text(text),
        )
        .changed();
    if changed {
        *value = options[idx];
    }
    changed
}

fn about(ui: &mut Ui, state: &AppState) {
    egui::CollapsingHeader::new(RichText::new("About").strong().color(Color32::LIGHT_BLUE))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let source = state
                .dataset
                .as_ref()
                .map(|ds| ds.source.clone())
                .unwrap_or_else(|| state.config.source_label());
            ui.label(format!("Data source: {source}"));
            if let Some(ds) = &state.dataset {
                ui.label(format!(
                    "Fetched {}",
                    ds.fetched_at.format("%Y-%m-%d %H:%M UTC")
                ));
            }
            ui.label(format!(
                "This plot shows the minimum and nominal (expected) distances for each \
                 Near Earth Object approach for the next {} days.",
                state.config.query.date_max_days
            ));
            ui.add_space(4.0);
            ui.label(RichText::new("Equal Distance Line").color(Color32::ORANGE));
            ui.label(RichText::new("Points above:").color(Color32::ORANGE));
            ui.label(
                "Objects where the minimum possible approach is closer than the nominal \
                 approach. The vertical distance from the line represents the difference \
                 between the nominal and minimum distances, a measure of the prediction's \
                 uncertainty.",
            );
            ui.label(RichText::new("Points below:").color(Color32::ORANGE));
            ui.label(
                "Objects where the minimum possible approach is farther than the nominal \
                 approach. This is a highly unlikely scenario for NEOs.",
            );
            if let Some(summary) = &state.summary {
                if summary.negative_delta > 0 {
                    ui.label(
                        RichText::new(format!(
                            "{} approaches in this dataset fall below the line.",
                            summary.negative_delta
                        ))
                        .color(Color32::YELLOW),
                    );
                }
            }
        });
}
