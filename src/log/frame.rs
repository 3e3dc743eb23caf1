//! Prediction frame and log types.

use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Log flavor, selecting parsing and grouping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Binary detector output (target/noise decisions).
    Binary,
    /// Multiclass classifier output with per-class score blocks.
    Multiclass,
}

/// How a frame's positive/negative decision is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Positivity {
    /// Use the raw integer decision field from the log line.
    RawFlag,
    /// A frame is positive when its probability exceeds this threshold.
    Threshold(f64),
}

impl Positivity {
    /// Decide positivity for one frame.
    pub fn is_positive(self, probability: f64, decision: i64) -> bool {
        match self {
            Self::RawFlag => decision != 0,
            Self::Threshold(t) => probability > t,
        }
    }
}

/// Parser configuration, passed per parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Log flavor.
    pub mode: LogMode,
    /// Positivity policy for binary decisions.
    pub positivity: Positivity,
}

impl ParseOptions {
    /// Options for a binary log with the given optional threshold.
    pub fn binary(threshold: Option<f64>) -> Self {
        Self {
            mode: LogMode::Binary,
            positivity: threshold.map_or(Positivity::RawFlag, Positivity::Threshold),
        }
    }

    /// Options for a multiclass log.
    pub fn multiclass() -> Self {
        Self {
            mode: LogMode::Multiclass,
            positivity: Positivity::RawFlag,
        }
    }
}

/// One parsed detection instant.
///
/// Times are seconds relative to the log's own recording start.
#[derive(Debug, Clone)]
pub struct PredictionFrame {
    /// Frame start in seconds.
    pub start_t: f64,
    /// Frame end in seconds.
    pub end_t: f64,
    /// Decision for this frame under the configured positivity policy.
    pub predicted_positive: bool,
    /// Binary category (`target`/`noise`) or multiclass label.
    pub class_label: String,
    /// Decision confidence, or the top label's probability for
    /// multiclass frames.
    pub probability: f64,
    /// Per-class probabilities for multiclass frames, in the order the
    /// log listed them. Empty for binary frames.
    pub class_scores: Vec<(String, f64)>,
}

/// A parsed detector log.
#[derive(Debug, Clone)]
pub struct PredictionLog {
    /// Path of the log file itself.
    pub file_path: PathBuf,
    /// Source audio path recorded on the log's first line.
    pub source_audio_path: String,
    /// Log flavor this file was parsed as.
    pub mode: LogMode,
    /// Absolute recording start, resolved from the audio filename.
    pub recording_start_time: NaiveDateTime,
    /// Seconds-offset window anchoring a multiclass excerpt inside its
    /// parent binary detection window. `None` for binary logs.
    pub excerpt_offset: Option<(f64, f64)>,
    /// Frames in file order, which is temporal order.
    pub frames: Vec<PredictionFrame>,
}
