use super::domain::{Evaluation, ManagerSubmission};
use super::scoring::{composite_total, raw_total};

/// Build the evaluation stored for a manager submission.
///
/// A resubmission overwrites the scores but keeps what HR already did: the previous normalized
/// score (unless it was 0), the adjustment terms, and the normalized/published flags. The
/// normalized score is therefore stale until the period is normalized again.
pub fn compose(submission: ManagerSubmission, existing: Option<&Evaluation>) -> Evaluation {
    let raw = raw_total(&submission.scores);
    let z_score_adjusted = existing
        .map(|previous| previous.z_score_adjusted)
        .filter(|previous| *previous != 0.0)
        .unwrap_or(raw);

    let ManagerSubmission {
        employee_id,
        manager_id,
        year,
        term,
        scores,
        feedback,
    } = submission;

    let mut evaluation = Evaluation {
        employee_id,
        manager_id,
        year,
        term,
        scores,
        raw_total: raw,
        z_score_adjusted,
        attendance_bonus: existing.map_or(0, |previous| previous.attendance_bonus),
        overall_adjustment: existing.map_or(0, |previous| previous.overall_adjustment),
        rewards_punishments: existing.map_or(0, |previous| previous.rewards_punishments),
        total_score: 0.0,
        grade: None,
        feedback,
        is_manager_complete: true,
        is_z_score_calculated: existing.is_some_and(|previous| previous.is_z_score_calculated),
        is_hr_complete: existing.is_some_and(|previous| previous.is_hr_complete),
    };
    composite_total(&mut evaluation);
    evaluation
}
