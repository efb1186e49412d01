use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Right side panel – selectors and statistics
// ---------------------------------------------------------------------------

/// Render the right control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Log quality");
    ui.separator();

    let options = state.options.clone();
    let selection = state.selection.clone();

    if let Some(curve) = selector(ui, "Curve", &selection.curve, &options.curves) {
        state.set_curve(curve);
    }
    if let Some(group) = selector(ui, "Group", &selection.group, &options.groups) {
        state.set_group(group);
    }
    if let Some(well) = selector(ui, "Well", &selection.well, &options.wells) {
        state.set_well(well);
    }

    ui.separator();

    for line in state.stat_lines() {
        ui.label(RichText::new(line).monospace());
    }
    if let Some(view) = &state.view {
        ui.label(
            RichText::new(format!(
                "{} samples, depth {} – {}",
                view.series.len(),
                view.range.top,
                view.range.base
            ))
            .small()
            .weak(),
        );
    }

    ui.separator();
    wells_table(ui, state);
}

/// A titled dropdown. Returns the newly picked value, if any.
fn selector(ui: &mut Ui, title: &str, current: &str, options: &[String]) -> Option<String> {
    let mut picked = None;
    ui.strong(title);
    egui::ComboBox::from_id_salt(title)
        .selected_text(current)
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui.selectable_label(current == option, option).clicked() {
                    picked = Some(option.clone());
                }
            }
        });
    ui.add_space(4.0);
    picked.filter(|p| p != current)
}

/// Collapsible overview of the depth coverage of every well.
fn wells_table(ui: &mut Ui, state: &AppState) {
    let summaries = state.context.dataset().well_summaries();

    egui::CollapsingHeader::new(RichText::new(format!("Wells ({})", summaries.len())).strong())
        .id_salt("wells_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::remainder())
                .header(18.0, |mut header| {
                    for title in ["Well", "Samples", "Top", "Base"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for s in &summaries {
                        body.row(16.0, |mut row| {
                            let highlight = s.well == state.selection.well;
                            row.col(|ui| {
                                let text = RichText::new(&s.well);
                                ui.label(if highlight { text.strong() } else { text });
                            });
                            row.col(|ui| {
                                ui.label(s.samples.to_string());
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.1}", s.top));
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.1}", s.base));
                            });
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let ds = state.context.dataset();
        ui.label(format!(
            "{} samples, {} wells, {} curves",
            ds.len(),
            ds.wells.len(),
            ds.curve_names.len()
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open well-log data folder")
        .set_directory(&state.config.source.dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Reloading from {}", dir.display());
        state.reload(&dir);
    }
}
