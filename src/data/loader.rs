use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{DEPTH_COLUMN, Sample, WELL_COLUMN, WellLogDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a well-log measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.txt` / `.json` – JSON array of record groups (see [`load_json`])
/// * `.csv`           – header row with `Well`, `Depth` and curve columns
/// * `.parquet`       – flat `Well`, `Depth` and numeric curve columns
pub fn load_measurements(path: &Path) -> Result<WellLogDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "txt" | "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Row assembly shared by the JSON and CSV loaders
// ---------------------------------------------------------------------------

/// A single loosely-typed cell before it is placed in a [`Sample`].
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    fn from_json(val: &JsonValue) -> Cell {
        match val {
            JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            JsonValue::String(s) => Cell::Text(s.clone()),
            JsonValue::Null => Cell::Null,
            other => Cell::Text(other.to_string()),
        }
    }

    fn from_text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() {
            return Cell::Null;
        }
        match s.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(s.to_string()),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Null => None,
        }
    }

    fn as_label(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(v) => Some(v.to_string()),
            Cell::Null => None,
        }
    }
}

type RawRow = BTreeMap<String, Cell>;

/// Accumulates rows, tracking the union of columns in first-seen order.
#[derive(Default)]
struct RowSet {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

impl RowSet {
    fn note_column(&mut self, col: &str) {
        if !self.columns.iter().any(|c| c == col) {
            self.columns.push(col.to_string());
        }
    }

    fn push(&mut self, row: RawRow) {
        for col in row.keys() {
            self.note_column(col);
        }
        self.rows.push(row);
    }

    fn into_dataset(self) -> Result<WellLogDataset> {
        if !self.columns.iter().any(|c| c == WELL_COLUMN) {
            bail!("missing '{WELL_COLUMN}' column");
        }
        if !self.columns.iter().any(|c| c == DEPTH_COLUMN) {
            bail!("missing '{DEPTH_COLUMN}' column");
        }

        let curve_names: Vec<String> = self
            .columns
            .into_iter()
            .filter(|c| c != WELL_COLUMN && c != DEPTH_COLUMN)
            .collect();

        let samples = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let well = row
                    .get(WELL_COLUMN)
                    .and_then(Cell::as_label)
                    .with_context(|| format!("Row {i}: missing '{WELL_COLUMN}'"))?;
                let depth = row
                    .get(DEPTH_COLUMN)
                    .and_then(Cell::as_f64)
                    .with_context(|| format!("Row {i}: '{DEPTH_COLUMN}' is not a number"))?;
                let values = curve_names
                    .iter()
                    .map(|c| row.get(c).and_then(Cell::as_f64).unwrap_or(f64::NAN))
                    .collect();
                Ok(Sample {
                    well,
                    depth,
                    values,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WellLogDataset::new(curve_names, samples))
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema: a top-level array of record groups, concatenated
/// in order. Each group is one of the layouts `pd.DataFrame(group)` accepts:
///
/// ```json
/// [
///   { "Well": {"0": "A", "1": "A"}, "Depth": {"0": 100.0, "1": 100.5}, "Gamma": {...} },
///   { "Well": ["B", "B"],           "Depth": [80.0, 80.5],              "Gamma": [...] },
///   { "Well": "C",                  "Depth": [90.0, 90.5],              "Gamma": [...] },
///   [ { "Well": "D", "Depth": 70.0, "Gamma": 41.2 }, ... ]
/// ]
/// ```
///
/// Scalar columns are repeated on every row of their group. A single
/// top-level object is read as one group, and a top-level array whose
/// objects hold only scalars is read as one group of row records.
fn load_json(path: &Path) -> Result<WellLogDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text).with_context(|| format!("loading {}", path.display()))
}

fn parse_json(text: &str) -> Result<WellLogDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let groups = match &root {
        JsonValue::Array(items) if !items.is_empty() && items.iter().all(is_record) => {
            std::slice::from_ref(&root)
        }
        JsonValue::Array(items) => items.as_slice(),
        JsonValue::Object(_) => std::slice::from_ref(&root),
        _ => bail!("Expected top-level JSON array or object"),
    };

    let mut rows = RowSet::default();
    for (g, group) in groups.iter().enumerate() {
        match group {
            JsonValue::Object(columns) => read_column_group(columns, &mut rows)
                .with_context(|| format!("Group {g}"))?,
            JsonValue::Array(records) => read_row_group(records, &mut rows)
                .with_context(|| format!("Group {g}"))?,
            _ => bail!("Group {g} is neither an object nor an array"),
        }
    }
    rows.into_dataset()
}

fn is_scalar(val: &JsonValue) -> bool {
    !val.is_array() && !val.is_object()
}

/// One row object (`orient='records'`): every value is a scalar.
fn is_record(item: &JsonValue) -> bool {
    item.as_object()
        .is_some_and(|obj| obj.values().all(is_scalar))
}

fn read_row_group(records: &[JsonValue], rows: &mut RowSet) -> Result<()> {
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        rows.push(
            obj.iter()
                .map(|(k, v)| (k.clone(), Cell::from_json(v)))
                .collect(),
        );
    }
    Ok(())
}

/// Column-oriented group: every column maps index labels to values, either
/// as an object (`{"0": ..}`) or positionally as an array. Scalar columns
/// are broadcast to every row label of the group.
fn read_column_group(columns: &Map<String, JsonValue>, rows: &mut RowSet) -> Result<()> {
    if !columns.values().any(JsonValue::is_object) {
        let mut lengths = columns
            .iter()
            .filter_map(|(k, v)| v.as_array().map(|a| (k, a.len())));
        if let Some((first_col, n)) = lengths.next() {
            if let Some((col, m)) = lengths.find(|&(_, m)| m != n) {
                bail!("column '{first_col}' has {n} values but '{col}' has {m}");
            }
        }
    }

    // Row index label → row, in first-seen order.
    let mut index: Vec<String> = Vec::new();
    let mut by_label: BTreeMap<String, RawRow> = BTreeMap::new();
    let mut scalars: Vec<(&String, Cell)> = Vec::new();

    for (col, values) in columns {
        rows.note_column(col);
        let cells: Vec<(String, Cell)> = match values {
            JsonValue::Object(map) => map
                .iter()
                .map(|(label, v)| (label.clone(), Cell::from_json(v)))
                .collect(),
            JsonValue::Array(arr) => arr
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), Cell::from_json(v)))
                .collect(),
            scalar => {
                scalars.push((col, Cell::from_json(scalar)));
                continue;
            }
        };
        for (label, cell) in cells {
            let row = by_label.entry(label.clone()).or_insert_with(|| {
                index.push(label.clone());
                RawRow::new()
            });
            row.insert(col.clone(), cell);
        }
    }

    if index.is_empty() && !scalars.is_empty() {
        bail!("every column holds a scalar; at least one must be an object or array");
    }
    for row in by_label.values_mut() {
        for (col, cell) in &scalars {
            row.insert((*col).clone(), cell.clone());
        }
    }

    sort_index_labels(&mut index);
    for label in index {
        if let Some(row) = by_label.remove(&label) {
            rows.push(row);
        }
    }
    Ok(())
}

/// Integer-like labels sort numerically ("2" before "10"); anything else
/// keeps first-seen order.
fn sort_index_labels(index: &mut [String]) {
    if index.iter().all(|l| l.parse::<i64>().is_ok()) {
        index.sort_by_key(|l| l.parse::<i64>().unwrap_or_default());
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sample per row.
/// `Well` and `Depth` are required; all other columns are curves.
fn load_csv(path: &Path) -> Result<WellLogDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    parse_csv(file).with_context(|| format!("loading {}", path.display()))
}

fn parse_csv<R: std::io::Read>(reader: R) -> Result<WellLogDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = RowSet::default();
    for col in &headers {
        rows.note_column(col);
    }

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| {
                let cell = if col == WELL_COLUMN {
                    Cell::Text(value.trim().to_string())
                } else {
                    Cell::from_text(value)
                };
                (col.clone(), cell)
            })
            .collect();
        rows.push(row);
    }

    rows.into_dataset()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one sample per row.
///
/// Expected schema:
/// - `Well`: Utf8 / LargeUtf8 (integers are accepted and stringified)
/// - `Depth`: any numeric type
/// - any other column: numeric curve values (nulls become NaN)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<WellLogDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let well_idx = schema
        .index_of(WELL_COLUMN)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{WELL_COLUMN}' column"))?;
    let depth_idx = schema
        .index_of(DEPTH_COLUMN)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{DEPTH_COLUMN}' column"))?;
    let curve_cols: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != well_idx && *i != depth_idx)
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    let mut samples = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let wells = cast(batch.column(well_idx), &DataType::Utf8)
            .context("casting 'Well' column to text")?;
        let wells = wells.as_string::<i32>();
        let depths = to_f64(batch.column(depth_idx)).context("reading 'Depth' column")?;
        let depths = depths.as_primitive::<Float64Type>();
        let curves = curve_cols
            .iter()
            .map(|(idx, name)| {
                to_f64(batch.column(*idx)).with_context(|| format!("reading '{name}' column"))
            })
            .collect::<Result<Vec<_>>>()?;
        let curves: Vec<&Float64Array> = curves
            .iter()
            .map(|c| c.as_primitive::<Float64Type>())
            .collect();

        for row in 0..batch.num_rows() {
            if wells.is_null(row) {
                bail!("Row {row}: null '{WELL_COLUMN}'");
            }
            if depths.is_null(row) {
                bail!("Row {row}: null '{DEPTH_COLUMN}'");
            }
            let values = curves
                .iter()
                .map(|c| if c.is_null(row) { f64::NAN } else { c.value(row) })
                .collect();
            samples.push(Sample {
                well: wells.value(row).to_string(),
                depth: depths.value(row),
                values,
            });
        }
    }

    let curve_names = curve_cols.into_iter().map(|(_, name)| name).collect();
    Ok(WellLogDataset::new(curve_names, samples))
}

// -- Parquet / Arrow helpers --

/// Cast any numeric (or numeric-text) column to Float64.
fn to_f64(col: &Arc<dyn Array>) -> Result<Arc<dyn Array>> {
    match col.data_type() {
        DataType::Float64 => Ok(col.clone()),
        other if other.is_numeric() || matches!(other, DataType::Utf8 | DataType::LargeUtf8) => {
            Ok(cast(col, &DataType::Float64)?)
        }
        other => bail!("expected a numeric column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn gamma_of(ds: &WellLogDataset, well: &str) -> Vec<(f64, f64)> {
        let g = ds.curve("Gamma").unwrap();
        ds.samples
            .iter()
            .filter(|s| s.well == well)
            .map(|s| (s.depth, s.value(g)))
            .collect()
    }

    #[test]
    fn json_index_keyed_groups_are_concatenated() {
        let text = r#"[
            {"Well": {"0": "A", "1": "A", "10": "A", "2": "A"},
             "Depth": {"0": 100.0, "1": 101.0, "10": 110.0, "2": 102.0},
             "Gamma": {"0": 10.0, "1": 11.0, "10": 20.0, "2": null}},
            {"Well": {"0": "B"}, "Depth": {"0": 50.0}, "Gamma": {"0": 5.0}, "Res": {"0": 1.5}}
        ]"#;
        let ds = parse_json(text).unwrap();

        assert_eq!(ds.len(), 5);
        assert_eq!(ds.curve_names, vec!["Gamma", "Res"]);
        let depths: Vec<f64> = ds.samples.iter().map(|s| s.depth).collect();
        assert_eq!(depths, vec![100.0, 101.0, 102.0, 110.0, 50.0]);
        assert!(ds.samples[2].values[0].is_nan());
        // Res is absent from the first group.
        assert!(ds.samples[0].values[1].is_nan());
        assert_eq!(ds.samples[4].values, vec![5.0, 1.5]);
    }

    #[test]
    fn json_array_columns_and_row_records() {
        let columns = r#"[{"Well": ["A", "A"], "Depth": [1.0, 2.0], "Gamma": [3.0, 4.0]}]"#;
        let ds = parse_json(columns).unwrap();
        assert_eq!(gamma_of(&ds, "A"), vec![(1.0, 3.0), (2.0, 4.0)]);

        let records = r#"[{"Well": "C", "Depth": "7.5", "Gamma": 1.0}, {"Well": "C", "Depth": 8.0}]"#;
        let ds = parse_json(records).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.samples[0].depth, 7.5);
        assert!(ds.samples[1].values[0].is_nan());
    }

    #[test]
    fn json_scalar_well_is_broadcast_over_its_group() {
        let text = r#"[
            {"Well": "A", "Depth": [1.0, 2.0], "Gamma": [3.0, 4.0]},
            {"Well": "B", "Depth": [5.0], "Gamma": [6.0]}
        ]"#;
        let ds = parse_json(text).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.curve_names, vec!["Gamma"]);
        assert_eq!(gamma_of(&ds, "A"), vec![(1.0, 3.0), (2.0, 4.0)]);
        assert_eq!(gamma_of(&ds, "B"), vec![(5.0, 6.0)]);
    }

    #[test]
    fn json_scalar_columns_follow_index_keyed_rows() {
        let text = r#"[{"Well": "A", "Depth": {"1": 20.0, "0": 10.0}, "Gamma": {"0": 1.0, "1": 2.0}}]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(gamma_of(&ds, "A"), vec![(10.0, 1.0), (20.0, 2.0)]);
    }

    #[test]
    fn json_group_of_only_scalars_fails() {
        let err = parse_json(r#"{"Well": "A", "Depth": 1.0}"#).unwrap_err();
        assert!(format!("{err:#}").contains("scalar"));
    }

    #[test]
    fn json_mismatched_array_lengths_fail() {
        let text = r#"[{"Well": ["A", "A"], "Depth": [1.0], "Gamma": [3.0, 4.0]}]"#;
        let err = parse_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("Group 0"));
    }

    #[test]
    fn json_requires_well_and_depth() {
        let err = parse_json(r#"[{"Depth": [1.0], "Gamma": [2.0]}]"#).unwrap_err();
        assert!(err.to_string().contains("Well"));

        let err = parse_json(r#"[{"Well": ["A"], "Depth": ["deep"], "Gamma": [2.0]}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("Row 0"));
    }

    #[test]
    fn csv_rows_keep_well_as_text() {
        let text = "Well,Depth,Gamma,Res\n007,10.0,1.0,\n007,11.0,2.0,3.5\n";
        let ds = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.wells.iter().next().map(String::as_str), Some("007"));
        assert_eq!(ds.curve_names, vec!["Gamma", "Res"]);
        assert!(ds.samples[0].values[1].is_nan());
        assert_eq!(ds.samples[1].values, vec![2.0, 3.5]);
    }

    #[test]
    fn dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let txt = dir.path().join("well_log_data.txt");
        std::fs::File::create(&txt)
            .unwrap()
            .write_all(br#"[{"Well": ["A"], "Depth": [1.0], "Gamma": [2.0]}]"#)
            .unwrap();
        assert_eq!(load_measurements(&txt).unwrap().len(), 1);

        let csv = dir.path().join("logs.CSV");
        std::fs::write(&csv, "Well,Depth,Gamma\nA,1.0,2.0\nB,2.0,3.0\n").unwrap();
        assert_eq!(load_measurements(&csv).unwrap().wells.len(), 2);

        let other = dir.path().join("logs.las");
        std::fs::write(&other, "").unwrap();
        assert!(load_measurements(&other).is_err());
    }

    #[test]
    fn parquet_columns_are_cast_to_f64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Well", DataType::Utf8, false),
            Field::new("Depth", DataType::Int32, false),
            Field::new("Gamma", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "A", "B"])),
                Arc::new(Int32Array::from(vec![100, 200, 150])),
                Arc::new(Float64Array::from(vec![Some(1.0), None, Some(3.0)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_measurements(&path).unwrap();
        assert_eq!(ds.curve_names, vec!["Gamma"]);
        let a = gamma_of(&ds, "A");
        assert_eq!(a[0], (100.0, 1.0));
        assert_eq!(a[1].0, 200.0);
        assert!(a[1].1.is_nan());
        assert_eq!(gamma_of(&ds, "B"), vec![(150.0, 3.0)]);
    }
}
