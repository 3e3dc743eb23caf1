//! Weighted class vote aggregation.

use crate::error::{Error, Result};
use crate::log::frame::PredictionFrame;

/// Collapse a multiclass frame sequence into a single class label.
///
/// Per-class probabilities are summed across all frames and the class
/// with the largest total wins. Totals are kept in first-appearance
/// order and resolved with a stable ascending sort, so an exact tie
/// goes to the class whose first appearance is latest. The tie-break
/// is order-dependent rather than principled; callers relying on tie
/// behavior get exactly this rule.
///
/// # Errors
///
/// [`Error::EmptyVote`] when `frames` is empty or no frame carries any
/// class scores.
pub fn weighted_prediction(frames: &[PredictionFrame]) -> Result<String> {
    if frames.is_empty() {
        return Err(Error::EmptyVote);
    }

    let mut totals: Vec<(String, f64)> = Vec::new();
    for frame in frames {
        for (class, score) in &frame.class_scores {
            match totals.iter_mut().find(|(c, _)| c == class) {
                Some((_, total)) => *total += score,
                None => totals.push((class.clone(), *score)),
            }
        }
    }

    totals.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    totals
        .last()
        .map(|(class, _)| class.clone())
        .ok_or(Error::EmptyVote)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn frame(scores: &[(&str, f64)]) -> PredictionFrame {
        let class_scores: Vec<(String, f64)> =
            scores.iter().map(|(c, s)| ((*c).to_string(), *s)).collect();
        let (class_label, probability) = class_scores
            .first()
            .map_or_else(|| (String::new(), 0.0), |(c, s)| (c.clone(), *s));
        PredictionFrame {
            start_t: 0.0,
            end_t: 1.0,
            predicted_positive: true,
            class_label,
            probability,
            class_scores,
        }
    }

    #[test]
    fn test_summed_scores_select_winner() {
        let frames = vec![
            frame(&[("A", 0.2), ("B", 0.5)]),
            frame(&[("A", 0.6), ("B", 0.1)]),
        ];
        // A sums to 0.8, B to 0.6.
        assert_eq!(weighted_prediction(&frames).unwrap(), "A");
    }

    #[test]
    fn test_tie_goes_to_latest_first_appearance() {
        let frames = vec![frame(&[("A", 0.5)]), frame(&[("B", 0.5)])];
        assert_eq!(weighted_prediction(&frames).unwrap(), "B");
    }

    #[test]
    fn test_classes_missing_from_some_frames() {
        let frames = vec![
            frame(&[("A", 0.3), ("B", 0.3), ("C", 0.4)]),
            frame(&[("C", 0.2)]),
        ];
        assert_eq!(weighted_prediction(&frames).unwrap(), "C");
    }

    #[test]
    fn test_empty_input_fails() {
        let result = weighted_prediction(&[]);
        assert!(matches!(result, Err(Error::EmptyVote)));
    }

    #[test]
    fn test_frames_without_scores_fail() {
        let frames = vec![frame(&[])];
        let result = weighted_prediction(&frames);
        assert!(matches!(result, Err(Error::EmptyVote)));
    }
}
