use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::{export_csv, table_header, table_row};
use crate::data::model::NeoDataset;

// ---------------------------------------------------------------------------
// Record tables (raw / filtered-out data)
// ---------------------------------------------------------------------------

/// Show `indices` of `dataset` as a scrollable table with a CSV export button.
/// Export failures land in `status`.
pub fn record_table(
    ui: &mut Ui,
    id: &str,
    title: &str,
    dataset: &NeoDataset,
    indices: &[usize],
    status: &mut Option<String>,
) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(title);
        if ui.button("Export CSV…").clicked() {
            save_dialog(id, dataset, indices, status);
        }
    });

    let header = table_header(dataset);

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(260.0)
                .columns(Column::auto().at_least(60.0), header.len())
                .header(20.0, |mut row| {
                    for name in &header {
                        row.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, indices.len(), |mut row| {
                        let idx = indices[row.index()];
                        for cell in table_row(dataset, idx) {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
    });
}

fn save_dialog(id: &str, dataset: &NeoDataset, indices: &[usize], status: &mut Option<String>) {
    let file = rfd::FileDialog::new()
        .set_title("Export close approaches")
        .set_file_name(format!("{id}.csv"))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_csv(&path, dataset, indices) {
            Ok(()) => *status = None,
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                *status = Some(format!("Error: {e:#}"));
            }
        }
    }
}
