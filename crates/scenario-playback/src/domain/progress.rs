//! Progress indicator.
//!
//! Progress is the number of distinct beats visited divided by the number of
//! beats in the document. Along a `next-content`-only path this grows by one
//! beat per step; jumps can only revisit or skip beats, so the ratio never
//! decreases along any path and never exceeds 1.0. A completed run reports 1.0.

/// Fraction of the document's beats the learner has seen, in `[0.0, 1.0]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_ratio(visited: usize, total_beats: usize, complete: bool) -> f64 {
    if complete {
        return 1.0;
    }
    if total_beats == 0 {
        return 0.0;
    }
    (visited as f64 / total_beats as f64).clamp(0.0, 1.0)
}

/// Progress as a whole percentage, for display.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(ratio: f64) -> u8 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_counts_visited_over_total() {
        assert!((progress_ratio(1, 4, false) - 0.25).abs() < f64::EPSILON);
        assert!((progress_ratio(3, 4, false) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_saturates_at_one() {
        assert!((progress_ratio(9, 4, false) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_complete_reports_one() {
        assert!((progress_ratio(1, 10, true) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_document_reports_zero() {
        assert!(progress_ratio(0, 0, false).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unequal_scene_lengths_use_true_total() {
        // Scenes of 1 and 3 beats: after two beats, half the document is seen.
        assert!((progress_ratio(2, 4, false) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(progress_percent(1.0 / 3.0), 33);
        assert_eq!(progress_percent(1.0), 100);
        assert_eq!(progress_percent(0.0), 0);
    }
}
