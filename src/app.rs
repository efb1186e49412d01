use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WellLogApp {
    pub state: AppState,
}

impl WellLogApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WellLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Right side panel: selectors and statistics ----
        egui::SidePanel::right("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: depth plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::depth_plot(ui, &self.state);
        });
    }
}
