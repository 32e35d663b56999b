/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  census .csv / .json / .parquet     coordinates .csv / .json / .parquet
///                 │                                 │
///                 └───────────────┬─────────────────┘
///                                 ▼
///                          ┌──────────┐
///                          │  loader  │  parse + coerce → HousingDataset
///                          └──────────┘
///                                 │
///                                 ▼
///                       ┌────────────────┐
///                       │ HousingDataset │  records, coordinates, name index
///                       └────────────────┘
///                                 │
///                 ┌───────────────┴───────────────┐
///                 ▼                               ▼
///           ┌──────────┐                   ┌───────────┐
///           │  filter  │  exact name match │ aggregate │  group-by means, top-N, join
///           └──────────┘ ───────────────▶  └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
