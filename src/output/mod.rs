//! Output module for run summaries
//!
//! This module handles building and displaying the end-of-run summary.

pub mod stats;

pub use stats::{format_summary, print_summary, RunSummary};
