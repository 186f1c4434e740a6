/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw records → Dataset (cleaned)
///   └──────────┘
///        │            ┌─────────┐
///        ├───────────▶│  cache   │  one snapshot per (path, version), TTL
///        ▼            └─────────┘
///   ┌──────────┐
///   │ Dataset   │  Vec<Notice>, distinct companies / categories, date span
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range ∧ company set ∧ category → Vec<&Notice>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  timeline, rankings, metrics, summary
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use aggregate::{AggregatedRow, DimensionMetrics, RankedCount, Summary, Truncation};
pub use error::{CriteriaError, LoadError};
pub use filter::FilterCriteria;
pub use model::{Dataset, Dimension, Notice, RawNotice};
