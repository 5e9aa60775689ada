//! Core types and pure helpers for the works usage report.
//!
//! Holds the data model, the project-name normalizer, the hardware/software
//! classifier, statistics helpers, date parsing, number formatting, CLI
//! settings and the shared error type. Nothing in this crate touches the
//! terminal.

pub mod classify;
pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod stats;

pub use error::{ReportError, Result};
