//! Named missing-data policies.
//!
//! The three behavioral signals each treat an unanswered question
//! differently, and downstream thresholds were tuned against exactly these
//! rules:
//!
//! * raw self-report scoring zero-fills a missing Likert answer but keeps it
//!   in the denominator,
//! * consistency averaging substitutes the neutral midpoint 3,
//! * alignment over an empty scenario set defaults to fully aligned.
//!
//! Keep them as separate functions; they are not interchangeable.

/// Likert scale maximum.
pub(crate) const LIKERT_MAX: f64 = 5.0;

/// Neutral midpoint used only by consistency averaging.
pub(crate) const NEUTRAL_MIDPOINT: f64 = 3.0;

/// Self-report percentage over a dimension's configured Likert questions.
/// A missing answer contributes 0 to the numerator while its slot still
/// counts toward the maximum, so non-response lowers the score. An empty
/// question list yields the 0.0 sentinel, never NaN.
pub(crate) fn self_report_percentage(ratings: &[Option<u8>]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: u32 = ratings
        .iter()
        .map(|rating| u32::from(rating.unwrap_or(0)))
        .sum();
    f64::from(sum) / (ratings.len() as f64 * LIKERT_MAX) * 100.0
}

/// Average Likert rating with missing answers treated as the neutral
/// midpoint. Used only when comparing self-report against behavior; raw
/// scoring must not use this fallback.
pub(crate) fn neutral_filled_average(ratings: &[Option<u8>]) -> f64 {
    if ratings.is_empty() {
        return NEUTRAL_MIDPOINT;
    }

    let sum: f64 = ratings
        .iter()
        .map(|rating| rating.map_or(NEUTRAL_MIDPOINT, f64::from))
        .sum();
    sum / ratings.len() as f64
}

/// Alignment fraction with the optimistic default: a dimension with no
/// scenario weight configured is treated as fully aligned.
pub(crate) fn alignment_or_optimistic(aligned_weight: f64, total_weight: f64) -> f64 {
    if total_weight <= 0.0 {
        1.0
    } else {
        aligned_weight / total_weight
    }
}

/// Percentage with the divide-by-zero guard: zero possible points resolves
/// to the 0.0 sentinel instead of NaN or infinity.
pub(crate) fn guarded_percentage(earned: f64, possible: f64) -> f64 {
    if possible <= 0.0 {
        0.0
    } else {
        earned / possible * 100.0
    }
}
