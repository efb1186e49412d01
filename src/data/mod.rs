/// Data layer: core types, loading, group bounds and curve queries.
///
/// Architecture:
/// ```text
///  well_log_data.txt / .csv / .parquet     <prefix><well>.csv
///        │                                        │
///        ▼                                        ▼
///   ┌──────────┐                           ┌──────────┐
///   │  loader   │  → WellLogDataset         │  groups   │  → GroupBoundaries
///   └──────────┘                           └──────────┘
///        │                                        │
///        └──────────────┬─────────────────────────┘
///                       ▼
///               ┌──────────────┐
///               │  DataContext  │  read-only after load
///               └──────────────┘
///                       │  range_for_group → query
///                       ▼
///               ┌──────────────┐
///               │  CurveQuery   │  depth series + stats
///               └──────────────┘
/// ```

pub mod context;
pub mod groups;
pub mod loader;
pub mod model;
pub mod query;
