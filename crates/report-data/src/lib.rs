//! Data ingestion and aggregation layer for the works usage report.
//!
//! Responsible for locating and reading the exported spreadsheet, turning its
//! rows into usage records, aggregating them per project and per store,
//! splitting projects around the median and building chart-ready reports.

pub mod aggregator;
pub mod analysis;
pub mod cohort;
pub mod loader;
pub mod reader;
pub mod report;

pub use report_core as core;
