use std::path::{Path, PathBuf};

use clap::Parser;

use crate::data::groups::ALL_GROUPS;
use crate::data::model::MAX_DEPTH;

pub const DEFAULT_DATA_DIR: &str = "../data/EAGE2018";
pub const DEFAULT_DATA_FILE: &str = "well_log_data.txt";
pub const DEFAULT_GROUP_PREFIX: &str = "EAGE_Hackathon_2018_Well_";
pub const DEFAULT_GROUPS: [&str; 9] = ["HH", "GG", "FF", "EE", "DD", "CC", "BB", "AA", "All"];

/// Initial selections used when present in the option lists.
pub const PREFERRED_CURVE: &str = "Gamma";
pub const PREFERRED_GROUP: &str = "AA";
pub const PREFERRED_WELL: &str = "A";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "well-log-viewer")]
#[command(about = "Interactive well-log curve dashboard", long_about = None)]
pub struct Cli {
    /// Folder holding the measurement file and per-well group files
    #[arg(long, env = "WELL_LOG_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Measurement file name inside the data folder (.txt/.json, .csv or .parquet)
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data_file: String,

    /// Prefix of the per-well group files (`<prefix><well>.csv`)
    #[arg(long, default_value = DEFAULT_GROUP_PREFIX)]
    pub group_prefix: String,

    /// Base depth used when no group bound applies
    #[arg(long, default_value_t = MAX_DEPTH)]
    pub max_depth: f64,

    /// Group options, comma separated
    #[arg(long, value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Curve options, comma separated (default: every curve in the data)
    #[arg(long, value_delimiter = ',')]
    pub curves: Option<Vec<String>>,

    /// Well options, comma separated (default: every well in the data)
    #[arg(long, value_delimiter = ',')]
    pub wells: Option<Vec<String>>,

    /// Initially selected curve
    #[arg(long)]
    pub curve: Option<String>,

    /// Initially selected group
    #[arg(long)]
    pub group: Option<String>,

    /// Initially selected well
    #[arg(long)]
    pub well: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Where the input files live.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub dir: PathBuf,
    pub data_file: String,
    pub group_prefix: String,
}

impl DataSource {
    pub fn measurements_path(&self) -> PathBuf {
        self.dir.join(&self.data_file)
    }

    pub fn group_path(&self, well: &str) -> PathBuf {
        self.dir.join(format!("{}{}.csv", self.group_prefix, well))
    }

    /// Same file names, different folder.
    pub fn with_dir(&self, dir: &Path) -> Self {
        DataSource {
            dir: dir.to_path_buf(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialSelection {
    pub curve: Option<String>,
    pub group: Option<String>,
    pub well: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub max_depth: f64,
    /// Always ends with [`ALL_GROUPS`] if it was not listed.
    pub groups: Vec<String>,
    pub curves: Option<Vec<String>>,
    pub wells: Option<Vec<String>>,
    pub initial: InitialSelection,
}

impl From<Cli> for DashboardConfig {
    fn from(cli: Cli) -> Self {
        let mut groups: Vec<String> = cli
            .groups
            .unwrap_or_else(|| DEFAULT_GROUPS.iter().map(|g| g.to_string()).collect())
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if !groups.iter().any(|g| g == ALL_GROUPS) {
            groups.push(ALL_GROUPS.to_string());
        }

        DashboardConfig {
            source: DataSource {
                dir: cli.data_dir,
                data_file: cli.data_file,
                group_prefix: cli.group_prefix,
            },
            max_depth: cli.max_depth,
            groups,
            curves: cli.curves,
            wells: cli.wells,
            initial: InitialSelection {
                curve: cli.curve,
                group: cli.group,
                well: cli.well,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> DashboardConfig {
        let argv = std::iter::once("well-log-viewer").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn defaults_match_the_eage_layout() {
        let cfg = parse(&["--data-dir", "data"]);
        assert_eq!(cfg.max_depth, 5000.0);
        assert_eq!(cfg.source.measurements_path(), Path::new("data/well_log_data.txt"));
        assert_eq!(
            cfg.source.group_path("B_AT2"),
            Path::new("data/EAGE_Hackathon_2018_Well_B_AT2.csv")
        );
        assert_eq!(cfg.groups.first().map(String::as_str), Some("HH"));
        assert_eq!(cfg.groups.last().map(String::as_str), Some(ALL_GROUPS));
        assert_eq!(cfg.initial, InitialSelection::default());
    }

    #[test]
    fn group_list_always_offers_all() {
        let cfg = parse(&["--data-dir", "d", "--groups", "AA, BB"]);
        assert_eq!(cfg.groups, vec!["AA", "BB", "All"]);

        let cfg = parse(&["--data-dir", "d", "--groups", "All,AA"]);
        assert_eq!(cfg.groups, vec!["All", "AA"]);
    }

    #[test]
    fn selections_and_options_are_forwarded() {
        let cfg = parse(&[
            "--data-dir", "d", "--curve", "Res", "--well", "B", "--wells", "A,B", "--max-depth", "3000",
        ]);
        assert_eq!(cfg.initial.curve.as_deref(), Some("Res"));
        assert_eq!(cfg.initial.well.as_deref(), Some("B"));
        assert_eq!(cfg.wells, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(cfg.max_depth, 3000.0);
    }

    #[test]
    fn reload_keeps_file_names() {
        let cfg = parse(&["--data-dir", "old", "--data-file", "logs.csv"]);
        let moved = cfg.source.with_dir(Path::new("new"));
        assert_eq!(moved.measurements_path(), Path::new("new/logs.csv"));
    }
}
