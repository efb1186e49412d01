use std::collections::BTreeMap;

use anyhow::{Context, Result};

use super::groups::{GroupBoundaries, load_group_file};
use super::loader::load_measurements;
use super::model::{DepthRange, QueryError, WellLogDataset};
use super::query::{CurveQuery, query};
use crate::config::DataSource;

// ---------------------------------------------------------------------------
// DataContext – everything loaded from disk, read-only afterwards
// ---------------------------------------------------------------------------

/// The measurement table, the per-well group tables and the depth limit.
/// Built once and handed to the UI state.
#[derive(Debug, Clone)]
pub struct DataContext {
    dataset: WellLogDataset,
    boundaries: BTreeMap<String, GroupBoundaries>,
    max_depth: f64,
}

impl DataContext {
    pub fn new(
        dataset: WellLogDataset,
        boundaries: BTreeMap<String, GroupBoundaries>,
        max_depth: f64,
    ) -> Self {
        DataContext {
            dataset,
            boundaries,
            max_depth,
        }
    }

    /// Load the measurement file and one group file per well found in it.
    /// A well without a group file gets an empty table.
    pub fn load(source: &DataSource, max_depth: f64) -> Result<Self> {
        let path = source.measurements_path();
        let dataset = load_measurements(&path)
            .with_context(|| format!("loading measurements from {}", path.display()))?;
        if dataset.is_empty() {
            log::warn!("{} contains no samples", path.display());
        }

        let mut boundaries = BTreeMap::new();
        for well in &dataset.wells {
            let group_path = source.group_path(well);
            let table = if group_path.exists() {
                load_group_file(&group_path)?
            } else {
                log::warn!(
                    "No group file for well {well} ({}); using full depth range",
                    group_path.display()
                );
                GroupBoundaries::default()
            };
            boundaries.insert(well.clone(), table);
        }

        log::info!(
            "Loaded {} samples for {} wells with curves {:?}",
            dataset.len(),
            dataset.wells.len(),
            dataset.curve_names
        );

        Ok(DataContext::new(dataset, boundaries, max_depth))
    }

    pub fn dataset(&self) -> &WellLogDataset {
        &self.dataset
    }

    /// Top/base of `group` in `well`; the full range for `"All"`, unknown
    /// groups and unknown wells.
    pub fn range_for_group(&self, group: &str, well: &str) -> DepthRange {
        match self.boundaries.get(well) {
            Some(table) => table.range_for(group, self.max_depth),
            None => DepthRange::full(self.max_depth),
        }
    }

    pub fn query(&self, curve: &str, well: &str, range: DepthRange) -> Result<CurveQuery, QueryError> {
        query(&self.dataset, curve, well, range)
    }

    /// Group-range lookup followed by the curve query.
    pub fn select(&self, curve: &str, group: &str, well: &str) -> Result<CurveQuery, QueryError> {
        let range = self.range_for_group(group, well);
        self.query(curve, well, range)
    }
}
