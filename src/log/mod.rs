//! Prediction log domain.
//!
//! This module turns raw detector log files into typed frame sequences
//! and reduces those sequences into events and aggregated class votes.

mod frame;
mod grouper;
mod parser;
mod vote;

pub use frame::{LogMode, ParseOptions, Positivity, PredictionFrame, PredictionLog};
pub use grouper::{Event, GroupingPolicy, group_frames};
pub use parser::parse_log;
pub use vote::weighted_prediction;
