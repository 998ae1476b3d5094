use eframe::egui;

use crate::cli::Config;
use crate::state::{AppState, Page};
use crate::ui::{lunar, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NeoDashboardApp {
    pub state: AppState,
}

impl NeoDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut state = AppState::new(config);
        let ctx = cc.egui_ctx.clone();
        state.request_data(move || ctx.request_repaint());
        Self { state }
    }
}

impl eframe::App for NeoDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_fetch();

        // ---- Top panel: page selector + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: about + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot and tables, or the lunar page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Lunar => {
                let cfg = &self.state.config;
                lunar::lunar_page(ui, &self.state.lunar, &cfg.app_id_var, &cfg.app_secret_var);
            }
            Page::Neo => neo_page(ui, &mut self.state),
        });
    }
}

fn neo_page(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        let height = ui.available_height();
        plot::approach_plot(ui, state, height);
        return;
    };
    let summary = state.summary;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let height = (ui.available_height() * 0.7).max(360.0);
            plot::approach_plot(ui, state, height);

            if state.show_excluded {
                ui.separator();
                let title = summary
                    .map(|s| s.excluded_caption())
                    .unwrap_or_else(|| "Items that were filtered out".into());
                table::record_table(
                    ui,
                    "filtered_out",
                    &title,
                    &dataset,
                    &state.partition.excluded,
                    &mut state.status_message,
                );
            }

            if state.show_raw {
                ui.separator();
                let indices: Vec<usize> = (0..dataset.len()).collect();
                table::record_table(
                    ui,
                    "raw_data",
                    &format!("Raw data ({} rows)", dataset.len()),
                    &dataset,
                    &indices,
                    &mut state.status_message,
                );
            }
        });
}
