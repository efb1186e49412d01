use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Depth plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected curve against (negated) depth.
pub fn depth_plot(ui: &mut Ui, state: &AppState) {
    let view = match &state.view {
        Some(view) => view,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Nothing to plot for this selection");
            });
            return;
        }
    };

    if view.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!(
                "No {} samples for well {} between {} and {}",
                view.curve, view.well, view.range.top, view.range.base
            ));
        });
        return;
    }

    let color = state.palette.color_for(&view.curve);
    let name = format!("{} – {}", view.curve, view.well);

    Plot::new("depth_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(view.curve.as_str())
        .y_axis_label("Depth")
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for segment in view.series.segments() {
                let points: PlotPoints = segment.into_iter().collect();
                let line = Line::new(points).name(&name).color(color).width(1.5);
                plot_ui.line(line);
            }
        });
}
