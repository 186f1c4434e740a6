//! Filtering and aggregation engine for field safety notice (FSN) datasets.
//!
//! The [`data`] layer loads and cleans notices, filters them by date range,
//! company and category, and aggregates the filtered subset into timelines,
//! rankings and per-dimension metrics. [`chart`] turns those aggregates into
//! renderer-agnostic chart specifications.

pub mod chart;
pub mod data;
