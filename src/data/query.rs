use super::model::{DepthRange, QueryError, WellLogDataset};

/// Labels of the displayed statistics, in display order.
pub const STAT_NAMES: [&str; 4] = ["Max", "Min", "Mean", "Std"];

// ---------------------------------------------------------------------------
// Depth series – what the plot draws
// ---------------------------------------------------------------------------

/// Curve values sorted by depth, with the depth axis negated so deeper
/// samples plot lower.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthSeries {
    pub depth: Vec<f64>,
    pub values: Vec<f64>,
}

impl DepthSeries {
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Plot points as `[value, -depth]`, split wherever a value is missing
    /// so gaps are not bridged by a straight line.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (&d, &v) in self.depth.iter().zip(&self.values) {
            if v.is_nan() {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                continue;
            }
            current.push([v, d]);
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Max, min, mean and sample standard deviation of a curve interval.
/// NaN inputs are skipped; an empty interval gives NaN everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub std: f64,
}

impl CurveStats {
    pub fn compute(values: &[f64]) -> Self {
        let vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if vals.is_empty() {
            return CurveStats {
                max: f64::NAN,
                min: f64::NAN,
                mean: f64::NAN,
                std: f64::NAN,
            };
        }

        let n = vals.len() as f64;
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = vals.iter().sum::<f64>() / n;

        // Bessel's correction: undefined for a single value.
        let std = if vals.len() < 2 {
            f64::NAN
        } else {
            let ss: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        };

        CurveStats {
            max,
            min,
            mean,
            std,
        }
    }

    /// Values in [`STAT_NAMES`] order.
    pub fn values(&self) -> [f64; 4] {
        [self.max, self.min, self.mean, self.std]
    }

    /// Display strings such as `"Max 30.00"`, in [`STAT_NAMES`] order.
    /// Undefined values read `"Max nan"`.
    pub fn labelled(&self) -> [String; 4] {
        let values = self.values();
        std::array::from_fn(|i| {
            if values[i].is_nan() {
                format!("{} nan", STAT_NAMES[i])
            } else {
                format!("{} {:.2}", STAT_NAMES[i], values[i])
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Result of selecting one curve of one well over a depth range.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveQuery {
    pub curve: String,
    pub well: String,
    pub range: DepthRange,
    pub series: DepthSeries,
    pub stats: CurveStats,
}

/// Select `curve` for `well` where `range.top < depth < range.base`.
///
/// The returned series is sorted by depth and has its depth negated;
/// the statistics are computed over the same samples.
pub fn query(
    dataset: &WellLogDataset,
    curve: &str,
    well: &str,
    range: DepthRange,
) -> Result<CurveQuery, QueryError> {
    let curve_id = dataset.curve(curve)?;

    let mut rows: Vec<(f64, f64)> = dataset
        .samples
        .iter()
        .filter(|s| range.contains(s.depth) && s.well == well)
        .map(|s| (s.depth, s.value(curve_id)))
        .collect();

    let stats = CurveStats::compute(&rows.iter().map(|&(_, v)| v).collect::<Vec<_>>());

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (depth, values) = rows.into_iter().map(|(d, v)| (-d, v)).unzip();

    Ok(CurveQuery {
        curve: dataset.curve_name(curve_id).to_string(),
        well: well.to_string(),
        range,
        series: DepthSeries { depth, values },
        stats,
    })
}
