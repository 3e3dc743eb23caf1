//! Output record definitions.

use chrono::NaiveDateTime;

use crate::constants::timestamps::CSV_FORMAT;

/// Format an absolute timestamp for tabular output.
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(CSV_FORMAT).to_string()
}

/// Ground-truth side of a matched prediction.
#[derive(Debug, Clone)]
pub struct GroundTruthFields {
    /// Absolute annotation start.
    pub start: NaiveDateTime,
    /// Absolute annotation end.
    pub end: NaiveDateTime,
    /// Annotation start relative to the table's recording start.
    pub start_rel: f64,
    /// Annotation end relative to the table's recording start.
    pub end_rel: f64,
    /// Annotated class label.
    pub class_id: String,
    /// Annotation quality grade.
    pub quality: String,
    /// Free-form notes.
    pub notes: String,
    /// Song marker.
    pub song: String,
    /// Call type.
    pub call_type: String,
    /// Annotator's sex assessment.
    pub likely_sex: String,
}

/// One row of evaluation output: a multiclass excerpt joined against
/// the annotation interval it overlaps, if any.
#[derive(Debug, Clone)]
pub struct MatchedRecord {
    /// Ground-truth table file name.
    pub ground_truth_file: String,
    /// Binary prediction log file name.
    pub binary_prediction_file: String,
    /// Multiclass prediction log file name.
    pub multiclass_prediction_file: String,
    /// Absolute excerpt window start.
    pub binary_start: NaiveDateTime,
    /// Absolute excerpt window end.
    pub binary_end: NaiveDateTime,
    /// Window start relative to the ground-truth recording start.
    pub binary_start_rel: f64,
    /// Window end relative to the ground-truth recording start.
    pub binary_end_rel: f64,
    /// Aggregated (weighted-vote) predicted label, lowercased.
    pub multiclass_prediction: String,
    /// The matched annotation, or `None` when no interval overlaps.
    pub ground_truth: Option<GroundTruthFields>,
}

/// Prediction side of an annotation-centric record.
#[derive(Debug, Clone)]
pub struct PredictionFields {
    /// Binary prediction log file name.
    pub binary_prediction_file: String,
    /// Absolute excerpt window start, verbatim from the results file.
    pub binary_start: String,
    /// Absolute excerpt window end.
    pub binary_end: String,
    /// Relative window start.
    pub binary_start_rel: String,
    /// Relative window end.
    pub binary_end_rel: String,
    /// Multiclass prediction log file name.
    pub multiclass_prediction_file: String,
    /// Aggregated predicted label.
    pub multiclass_prediction: String,
    /// Quality grade carried by the matched results row.
    pub quality: String,
    /// Notes carried by the matched results row.
    pub notes: String,
    /// Song marker carried by the matched results row.
    pub song: String,
    /// Call type carried by the matched results row.
    pub call_type: String,
    /// Sex assessment carried by the matched results row.
    pub likely_sex: String,
}

/// One row of annotation-centric output: an annotation interval joined
/// against the first overlapping prediction, if any.
#[derive(Debug, Clone)]
pub struct GroundTruthRecord {
    /// Ground-truth table file name.
    pub ground_truth_file: String,
    /// Annotated class label.
    pub ground_truth: String,
    /// Absolute annotation start.
    pub ground_truth_start: NaiveDateTime,
    /// Absolute annotation end.
    pub ground_truth_end: NaiveDateTime,
    /// Annotation start relative to the table's recording start.
    pub ground_truth_start_rel: f64,
    /// Annotation end relative to the table's recording start.
    pub ground_truth_end_rel: f64,
    /// The first overlapping prediction row, or `None`.
    pub prediction: Option<PredictionFields>,
}
