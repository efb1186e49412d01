use std::path::Path;

use crate::color::CurvePalette;
use crate::config::{DashboardConfig, PREFERRED_CURVE, PREFERRED_GROUP, PREFERRED_WELL};
use crate::data::context::DataContext;
use crate::data::query::{CurveQuery, STAT_NAMES};

// ---------------------------------------------------------------------------
// Selection and option lists
// ---------------------------------------------------------------------------

/// Current value of the three dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub curve: String,
    pub group: String,
    pub well: String,
}

/// Values offered by the three dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub curves: Vec<String>,
    pub groups: Vec<String>,
    pub wells: Vec<String>,
}

impl SelectOptions {
    fn from_context(context: &DataContext, config: &DashboardConfig) -> Self {
        let ds = context.dataset();
        SelectOptions {
            curves: config
                .curves
                .clone()
                .unwrap_or_else(|| ds.curve_names.clone()),
            groups: config.groups.clone(),
            wells: config
                .wells
                .clone()
                .unwrap_or_else(|| ds.wells.iter().cloned().collect()),
        }
    }
}

/// Requested value if offered, else the preferred default, else the first option.
fn pick(requested: Option<&str>, preferred: &str, options: &[String]) -> String {
    if let Some(req) = requested {
        if options.iter().any(|o| o == req) {
            return req.to_string();
        }
        log::warn!("'{req}' is not one of {options:?}; ignoring");
    }
    if options.iter().any(|o| o == preferred) {
        return preferred.to_string();
    }
    options.first().cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub context: DataContext,
    pub config: DashboardConfig,
    pub options: SelectOptions,
    pub selection: Selection,

    /// Result for the current selection (None if the query failed).
    pub view: Option<CurveQuery>,

    /// Line colour per curve option.
    pub palette: CurvePalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(context: DataContext, config: DashboardConfig) -> Self {
        let options = SelectOptions::from_context(&context, &config);
        let initial = &config.initial;
        let selection = Selection {
            curve: pick(initial.curve.as_deref(), PREFERRED_CURVE, &options.curves),
            group: pick(initial.group.as_deref(), PREFERRED_GROUP, &options.groups),
            well: pick(initial.well.as_deref(), PREFERRED_WELL, &options.wells),
        };
        let palette = CurvePalette::new(&options.curves);

        let mut state = AppState {
            context,
            config,
            options,
            selection,
            view: None,
            palette,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Recompute the view for the current selection.
    pub fn refresh(&mut self) {
        let Selection { curve, group, well } = &self.selection;
        match self.context.select(curve, group, well) {
            Ok(view) => {
                log::debug!(
                    "{curve}/{group}/{well}: {} points in ({}, {})",
                    view.series.len(),
                    view.range.top,
                    view.range.base
                );
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Query failed: {e}");
                self.view = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_curve(&mut self, curve: String) {
        if self.selection.curve != curve {
            self.selection.curve = curve;
            self.refresh();
        }
    }

    pub fn set_group(&mut self, group: String) {
        if self.selection.group != group {
            self.selection.group = group;
            self.refresh();
        }
    }

    pub fn set_well(&mut self, well: String) {
        if self.selection.well != well {
            self.selection.well = well;
            self.refresh();
        }
    }

    /// The four statistic lines; bare labels when nothing is selected.
    pub fn stat_lines(&self) -> [String; 4] {
        match &self.view {
            Some(view) => view.stats.labelled(),
            None => STAT_NAMES.map(str::to_string),
        }
    }

    /// Replace the data with the contents of another folder, keeping the
    /// current selection where it is still offered. On failure the current
    /// data stays loaded.
    pub fn reload(&mut self, dir: &Path) {
        let source = self.config.source.with_dir(dir);
        match DataContext::load(&source, self.config.max_depth) {
            Ok(context) => {
                let mut config = self.config.clone();
                config.source = source;
                config.initial.curve = Some(self.selection.curve.clone());
                config.initial.group = Some(self.selection.group.clone());
                config.initial.well = Some(self.selection.well.clone());
                *self = AppState::new(context, config);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", dir.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::{DataSource, InitialSelection};
    use crate::data::groups::parse_group_csv;
    use crate::data::model::{MAX_DEPTH, Sample, WellLogDataset};

    fn config() -> DashboardConfig {
        DashboardConfig {
            source: DataSource {
                dir: "unused".into(),
                data_file: "well_log_data.txt".into(),
                group_prefix: "EAGE_Hackathon_2018_Well_".into(),
            },
            max_depth: MAX_DEPTH,
            groups: vec!["AA".into(), "BB".into(), "All".into()],
            curves: None,
            wells: None,
            initial: InitialSelection::default(),
        }
    }

    fn context() -> DataContext {
        let mut samples = Vec::new();
        for (well, offset) in [("A", 0.0), ("B", 1000.0)] {
            for i in 1..=5 {
                let depth = offset + i as f64 * 100.0;
                samples.push(Sample {
                    well: well.into(),
                    depth,
                    values: vec![i as f64 * 10.0, i as f64],
                });
            }
        }
        let ds = WellLogDataset::new(vec!["Gamma".into(), "Res".into()], samples);

        let mut boundaries = BTreeMap::new();
        boundaries.insert(
            "A".to_string(),
            parse_group_csv("name,Surface,Obs#,MD\nAA,group,Top,150\nAA,group,Base,350\n".as_bytes())
                .unwrap(),
        );
        DataContext::new(ds, boundaries, MAX_DEPTH)
    }

    #[test]
    fn initial_selection_prefers_defaults_and_is_applied() {
        let state = AppState::new(context(), config());
        assert_eq!(
            state.selection,
            Selection {
                curve: "Gamma".into(),
                group: "AA".into(),
                well: "A".into(),
            }
        );
        assert_eq!(state.options.wells, vec!["A", "B"]);

        let view = state.view.as_ref().unwrap();
        assert_eq!(view.series.depth, vec![-200.0, -300.0]);
        assert_eq!(state.stat_lines()[2], "Mean 25.00");
    }

    #[test]
    fn selection_changes_refresh_the_view() {
        let mut state = AppState::new(context(), config());

        state.set_group("All".into());
        assert_eq!(state.view.as_ref().unwrap().series.len(), 5);

        state.set_well("B".into());
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.well, "B");
        assert_eq!(view.series.depth.first(), Some(&-1100.0));

        state.set_curve("Res".into());
        assert_eq!(state.stat_lines()[0], "Max 5.00");
    }

    #[test]
    fn unknown_curve_is_reported_not_fatal() {
        let mut cfg = config();
        cfg.curves = Some(vec!["Gamma".into(), "Sonic".into()]);
        let mut state = AppState::new(context(), cfg);

        state.set_curve("Sonic".into());
        assert!(state.view.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("Sonic"));
        assert_eq!(state.stat_lines()[3], "Std");

        state.set_curve("Gamma".into());
        assert!(state.view.is_some());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn requested_selection_falls_back_when_not_offered() {
        let mut cfg = config();
        cfg.initial.well = Some("nowhere".into());
        cfg.initial.curve = Some("Res".into());
        let state = AppState::new(context(), cfg);
        assert_eq!(state.selection.well, "A");
        assert_eq!(state.selection.curve, "Res");

        assert_eq!(pick(None, "X", &[]), "");
        assert_eq!(pick(None, "X", &["Y".to_string()]), "Y");
    }

    #[test]
    fn failed_reload_keeps_current_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(context(), config());
        state.reload(dir.path());
        assert!(state.status_message.is_some());
        assert_eq!(state.context.dataset().len(), 10);
        assert_eq!(state.config.source.dir, Path::new("unused"));
    }
}
