use eframe::egui::{Color32, RichText, Ui};

use crate::lunar::{mask_token, LunarPage};

/// The lunar page: header plus the state of the Basic-Auth token.
pub fn lunar_page(ui: &mut Ui, page: &LunarPage, id_var: &str, secret_var: &str) {
    ui.heading(RichText::new("🌙 Lunar Phase").color(Color32::ORANGE));
    ui.separator();

    match &page.token {
        Ok(token) => {
            ui.label(format!("Authorization: Basic {}", mask_token(token)));
        }
        Err(msg) => {
            ui.label(RichText::new(msg).color(Color32::RED));
            ui.label(format!(
                "Set {id_var} and {secret_var} to the application id and secret, \
                 or pass --app-id-var / --app-secret-var to read other variables."
            ));
        }
    }
}
