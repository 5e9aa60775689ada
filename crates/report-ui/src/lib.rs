//! Terminal UI layer for the works usage report.
//!
//! Provides themes, bar and header components, the project and cohort chart
//! views, and the synchronous application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod cohort_view;
pub mod components;
pub mod themes;

pub use report_core as core;
