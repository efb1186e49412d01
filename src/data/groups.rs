use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::model::DepthRange;

/// Group option meaning "no stratigraphic restriction".
pub const ALL_GROUPS: &str = "All";

/// `Surface` value marking a row as a stratigraphic group boundary.
pub const GROUP_SURFACE: &str = "group";

// ---------------------------------------------------------------------------
// Marker rows
// ---------------------------------------------------------------------------

/// Which end of a group interval a marker describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Top,
    Base,
}

impl BoundaryKind {
    pub fn parse(obs: &str) -> Option<Self> {
        match obs {
            "Top" => Some(BoundaryKind::Top),
            "Base" => Some(BoundaryKind::Base),
            _ => None,
        }
    }
}

/// One row of a per-well group file. Columns other than these are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupMarker {
    pub name: String,
    #[serde(rename = "Surface")]
    pub surface: String,
    #[serde(rename = "Obs#")]
    pub observation: String,
    #[serde(rename = "MD", default, deserialize_with = "csv::invalid_option")]
    pub md: Option<f64>,
}

impl GroupMarker {
    pub fn boundary_kind(&self) -> Option<BoundaryKind> {
        BoundaryKind::parse(&self.observation)
    }
}

// ---------------------------------------------------------------------------
// Per-well boundary table
// ---------------------------------------------------------------------------

/// All group markers recorded for one well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBoundaries {
    pub markers: Vec<GroupMarker>,
}

impl GroupBoundaries {
    /// Depth bounds of `group`, falling back to `[0, max_depth)` for any
    /// bound that is not recorded. The first matching marker wins.
    pub fn range_for(&self, group: &str, max_depth: f64) -> DepthRange {
        let mut range = DepthRange::full(max_depth);
        if group == ALL_GROUPS {
            return range;
        }

        let rows: Vec<&GroupMarker> = self
            .markers
            .iter()
            .filter(|m| m.name == group && m.surface == GROUP_SURFACE)
            .collect();

        let first_md = |kind: BoundaryKind| {
            rows.iter()
                .find(|m| m.boundary_kind() == Some(kind))
                .and_then(|m| m.md)
        };
        if let Some(top) = first_md(BoundaryKind::Top) {
            range.top = top;
        }
        if let Some(base) = first_md(BoundaryKind::Base) {
            range.base = base;
        }
        range
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a per-well group CSV (`name`, `Surface`, `Obs#`, `MD`, ...).
pub fn load_group_file(path: &Path) -> Result<GroupBoundaries> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening group file {}", path.display()))?;
    parse_group_csv(file).with_context(|| format!("parsing group file {}", path.display()))
}

pub fn parse_group_csv<R: Read>(reader: R) -> Result<GroupBoundaries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let markers = reader
        .deserialize()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("group row {row_no}")))
        .collect::<Result<Vec<GroupMarker>>>()?;

    Ok(GroupBoundaries { markers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MAX_DEPTH;

    const WELL_A: &str = "\
name,Surface,Obs#,MD,TVD
AA,group,Top,1200.5,1190
AA,group,Base,1400,1388
AA,horizon,Top,900,890
BB,group,Top,1400,1388
BB,group,Base,,
CC,group,Base,2100,2080
CC,group,Base,2200,2180
";

    fn table() -> GroupBoundaries {
        parse_group_csv(WELL_A.as_bytes()).unwrap()
    }

    #[test]
    fn parses_markers_and_ignores_extra_columns() {
        let t = table();
        assert_eq!(t.markers.len(), 7);
        assert_eq!(t.markers[0].observation, "Top");
        assert_eq!(t.markers[0].md, Some(1200.5));
        assert_eq!(t.markers[4].md, None);
        assert_eq!(t.markers[1].boundary_kind(), Some(BoundaryKind::Base));
    }

    #[test]
    fn all_is_the_full_range() {
        assert_eq!(
            table().range_for(ALL_GROUPS, MAX_DEPTH),
            DepthRange::new(0.0, MAX_DEPTH)
        );
        assert_eq!(
            GroupBoundaries::default().range_for(ALL_GROUPS, MAX_DEPTH),
            DepthRange::new(0.0, MAX_DEPTH)
        );
    }

    #[test]
    fn uses_group_rows_only() {
        assert_eq!(
            table().range_for("AA", MAX_DEPTH),
            DepthRange::new(1200.5, 1400.0)
        );
    }

    #[test]
    fn missing_bounds_keep_defaults() {
        assert_eq!(
            table().range_for("BB", MAX_DEPTH),
            DepthRange::new(1400.0, MAX_DEPTH)
        );
        assert_eq!(table().range_for("CC", MAX_DEPTH).top, 0.0);
        assert_eq!(
            table().range_for("ZZ", MAX_DEPTH),
            DepthRange::new(0.0, MAX_DEPTH)
        );
    }

    #[test]
    fn blank_first_marker_keeps_default_even_if_a_later_one_has_md() {
        let csv = "name,Surface,Obs#,MD\n\
                   GG,group,Top,\n\
                   GG,group,Top,900\n\
                   GG,group,Base,1100\n";
        let t = parse_group_csv(csv.as_bytes()).unwrap();
        assert_eq!(t.range_for("GG", MAX_DEPTH), DepthRange::new(0.0, 1100.0));
    }

    #[test]
    fn first_matching_marker_wins() {
        assert_eq!(table().range_for("CC", MAX_DEPTH).base, 2100.0);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse_group_csv("name,Surface,MD\nAA,group,10\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("group row 0"));
    }
}
