//! Frame-to-event grouping.
//!
//! Reduces a time-ordered frame sequence into a shorter sequence of
//! events by merging runs of same-label frames. Two policies exist:
//! the smooth policy merges only positive frames and tolerates short
//! transient labels inside an open run, while the non-smooth policy
//! walks every frame and breaks runs strictly on label changes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::log::frame::PredictionFrame;

/// A maximal merged run of same-label frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event start in seconds, relative to the recording start.
    pub start_t: f64,
    /// Event end in seconds.
    pub end_t: f64,
    /// Label shared by the merged frames.
    pub class_id: String,
}

impl Event {
    fn seed(frame: &PredictionFrame) -> Self {
        Self {
            start_t: frame.start_t,
            end_t: frame.end_t,
            class_id: frame.class_label.clone(),
        }
    }
}

/// Selectable grouping policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingPolicy {
    /// Merge positive, temporally contiguous frames into events.
    #[default]
    Smooth,
    /// Break runs on every label change, keeping all frames.
    NonSmooth,
}

/// Group a time-ordered frame sequence into events under the given
/// policy. Frames must already be sorted by `start_t`; the parser
/// guarantees this for frames taken from one log.
pub fn group_frames(frames: &[PredictionFrame], policy: GroupingPolicy) -> Vec<Event> {
    match policy {
        GroupingPolicy::Smooth => group_smooth(frames),
        GroupingPolicy::NonSmooth => group_non_smooth(frames),
    }
}

/// Smooth policy: positive frames only, merged while contiguous.
///
/// A frame with a different label that still starts inside the open
/// run is dropped rather than allowed to fragment the run. An empty
/// (or all-negative) input yields no events.
fn group_smooth(frames: &[PredictionFrame]) -> Vec<Event> {
    let mut positives = frames.iter().filter(|f| f.predicted_positive);

    let Some(first) = positives.next() else {
        return Vec::new();
    };

    let mut grouped = Vec::new();
    let mut group = Event::seed(first);
    for frame in positives {
        if frame.class_label == group.class_id && frame.start_t <= group.end_t {
            group.end_t = frame.end_t;
        } else if frame.start_t <= group.end_t {
            // Transient different label inside an open run.
            continue;
        } else {
            grouped.push(group);
            group = Event::seed(frame);
        }
    }
    grouped.push(group);
    grouped
}

/// Non-smooth policy: unconditional run-length grouping over all
/// frames.
///
/// A run closes with the end time of its last frame when the label
/// changes. The final running group is intentionally not emitted at
/// end of input; downstream matching depends on this cutoff.
fn group_non_smooth(frames: &[PredictionFrame]) -> Vec<Event> {
    let mut grouped = Vec::new();

    let mut frames = frames.iter();
    let Some(first) = frames.next() else {
        return grouped;
    };
    let mut group = Event::seed(first);

    for frame in frames {
        if frame.class_label == group.class_id {
            group.end_t = frame.end_t;
        } else {
            grouped.push(group);
            group = Event::seed(frame);
        }
    }

    grouped
}
