//! Evaluation pipeline commands and shared plumbing.

pub mod events;
pub mod evaluator;
mod file_map;
pub mod ground_truth;
pub mod mapping;
pub mod tables;

pub use evaluator::{EvalOptions, evaluate_ground_truth, run_evaluation};
pub use file_map::FileMap;
pub use mapping::{MappingSummary, build_file_map};
