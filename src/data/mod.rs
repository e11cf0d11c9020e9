/// Data layer: track table, loading, derived views and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, normalise headers → TrackTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ TrackTable  │  Vec<Track> in file order, inspection result
///   └────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  views    │   │  export   │  table → songs.csv bytes (cached)
///   └──────────┘   └──────────┘
///   aggregates, correlation (stats), 3D cloud, pie slices
/// ```

pub mod export;
pub mod loader;
pub mod model;
pub mod stats;
pub mod views;

#[cfg(test)]
pub mod test_support;
