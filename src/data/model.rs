use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Deepest depth considered by default when no group bounds apply.
pub const MAX_DEPTH: f64 = 5000.0;

/// Column holding the well identifier in measurement files.
pub const WELL_COLUMN: &str = "Well";

/// Column holding the measured depth in measurement files.
pub const DEPTH_COLUMN: &str = "Depth";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown curve '{name}' (available: {available})")]
    UnknownCurve { name: String, available: String },
}

// ---------------------------------------------------------------------------
// Sample – one row of the measurement table
// ---------------------------------------------------------------------------

/// A single depth sample of one well.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub well: String,
    pub depth: f64,
    /// One value per curve column, in [`WellLogDataset::curve_names`] order.
    /// Missing cells are NaN.
    pub values: Vec<f64>,
}

impl Sample {
    pub fn value(&self, curve: CurveId) -> f64 {
        self.values.get(curve.index()).copied().unwrap_or(f64::NAN)
    }
}

// ---------------------------------------------------------------------------
// CurveId – checked handle on a curve column
// ---------------------------------------------------------------------------

/// Index of a curve column. Only obtainable through [`WellLogDataset::curve`],
/// so it is always valid for the dataset that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurveId(usize);

impl CurveId {
    pub fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// DepthRange
// ---------------------------------------------------------------------------

/// Open depth interval `(top, base)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub top: f64,
    pub base: f64,
}

impl DepthRange {
    pub fn new(top: f64, base: f64) -> Self {
        Self { top, base }
    }

    /// `[0, max_depth)`, the range used when no group bounds apply.
    pub fn full(max_depth: f64) -> Self {
        Self::new(0.0, max_depth)
    }

    /// Both bounds are exclusive.
    pub fn contains(&self, depth: f64) -> bool {
        self.top < depth && depth < self.base
    }
}

// ---------------------------------------------------------------------------
// WellLogDataset – the complete loaded measurement table
// ---------------------------------------------------------------------------

/// Depth coverage of one well, shown in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct WellSummary {
    pub well: String,
    pub samples: usize,
    pub top: f64,
    pub base: f64,
}

/// The full parsed measurement table.
#[derive(Debug, Clone, Default)]
pub struct WellLogDataset {
    pub samples: Vec<Sample>,
    /// Curve columns (everything except `Well` and `Depth`), in file order.
    pub curve_names: Vec<String>,
    /// Sorted set of well identifiers.
    pub wells: BTreeSet<String>,
}

impl WellLogDataset {
    pub fn new(curve_names: Vec<String>, samples: Vec<Sample>) -> Self {
        let wells = samples.iter().map(|s| s.well.clone()).collect();
        WellLogDataset {
            samples,
            curve_names,
            wells,
        }
    }

    /// Resolve a curve name to its column handle.
    pub fn curve(&self, name: &str) -> Result<CurveId, QueryError> {
        self.curve_names
            .iter()
            .position(|c| c == name)
            .map(CurveId)
            .ok_or_else(|| QueryError::UnknownCurve {
                name: name.to_string(),
                available: self.curve_names.join(", "),
            })
    }

    pub fn curve_name(&self, curve: CurveId) -> &str {
        &self.curve_names[curve.index()]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Per-well sample counts and depth extent, ordered by well.
    pub fn well_summaries(&self) -> Vec<WellSummary> {
        let mut by_well: BTreeMap<&str, WellSummary> = BTreeMap::new();
        for sample in &self.samples {
            let entry = by_well
                .entry(sample.well.as_str())
                .or_insert_with(|| WellSummary {
                    well: sample.well.clone(),
                    samples: 0,
                    top: f64::INFINITY,
                    base: f64::NEG_INFINITY,
                });
            entry.samples += 1;
            entry.top = entry.top.min(sample.depth);
            entry.base = entry.base.max(sample.depth);
        }
        by_well.into_values().collect()
    }
}
