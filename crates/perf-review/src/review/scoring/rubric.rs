use crate::review::domain::ScoreSet;

/// Lower percentage bounds of the five rubric description bands, best band first.
pub const RUBRIC_BANDS: [f64; 4] = [90.0, 70.0, 60.0, 30.0];

/// Raw total of a score set: the sum of every awarded value.
///
/// Agnostic to the active metric set. Unscored metrics are simply absent and contribute 0; values
/// are not checked against their metric maximum.
pub fn raw_total(scores: &ScoreSet) -> f64 {
    scores
        .values()
        .filter(|score| score.is_finite())
        .sum()
}

/// Index into a metric's five rubric descriptions for `score` out of `max`.
///
/// The percentage is rounded to a whole number before banding, matching the slider the scores are
/// entered with. A non-positive maximum reads as 0%.
pub fn band_index(score: f64, max: f64) -> usize {
    let percent = if max > 0.0 {
        (score / max * 100.0).round()
    } else {
        0.0
    };

    RUBRIC_BANDS
        .iter()
        .position(|bound| percent >= *bound)
        .unwrap_or(RUBRIC_BANDS.len())
}
