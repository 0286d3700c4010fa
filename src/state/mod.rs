//! Run-scoped state tracking
//!
//! This module contains:
//! - RunState: the visited, downloaded and failed sets for one run
//! - RunCounters: the totals reported in the final summary

mod counters;
mod run_state;

pub use counters::RunCounters;
pub use run_state::RunState;
