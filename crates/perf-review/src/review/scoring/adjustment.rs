use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grade::Grade;
use super::round_to_cents;
use crate::review::domain::Evaluation;

/// HR-controlled additive term applied on top of the normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentField {
    AttendanceBonus,
    OverallAdjustment,
    RewardsPunishments,
}

impl AdjustmentField {
    pub const ALL: [AdjustmentField; 3] = [
        AdjustmentField::AttendanceBonus,
        AdjustmentField::OverallAdjustment,
        AdjustmentField::RewardsPunishments,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            AdjustmentField::AttendanceBonus => "attendanceBonus",
            AdjustmentField::OverallAdjustment => "overallAdjustment",
            AdjustmentField::RewardsPunishments => "rewardsPunishments",
        }
    }

    /// Range HR is told to stay within. Not enforced by the compositor.
    pub const fn documented_range(self) -> RangeInclusive<i32> {
        match self {
            AdjustmentField::AttendanceBonus => -10..=10,
            AdjustmentField::OverallAdjustment => -20..=20,
            AdjustmentField::RewardsPunishments => -30..=30,
        }
    }

    pub fn is_within_documented_range(self, value: i32) -> bool {
        self.documented_range().contains(&value)
    }

    pub fn value_of(self, evaluation: &Evaluation) -> i32 {
        match self {
            AdjustmentField::AttendanceBonus => evaluation.attendance_bonus,
            AdjustmentField::OverallAdjustment => evaluation.overall_adjustment,
            AdjustmentField::RewardsPunishments => evaluation.rewards_punishments,
        }
    }
}

impl fmt::Display for AdjustmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AdjustmentField {
    type Err = ParseAdjustmentFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let candidate = value.trim();
        AdjustmentField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(candidate))
            .ok_or_else(|| ParseAdjustmentFieldError(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown adjustment field '{0}'")]
pub struct ParseAdjustmentFieldError(pub String);

/// Set one adjustment term and recomposite the total and grade.
///
/// Only the chosen field, `total_score` and `grade` change; the raw total, the normalized score
/// and the other two terms are left as they are. Values outside the documented range are applied
/// as given.
pub fn apply_adjustment(mut evaluation: Evaluation, field: AdjustmentField, value: i32) -> Evaluation {
    match field {
        AdjustmentField::AttendanceBonus => evaluation.attendance_bonus = value,
        AdjustmentField::OverallAdjustment => evaluation.overall_adjustment = value,
        AdjustmentField::RewardsPunishments => evaluation.rewards_punishments = value,
    }
    composite_total(&mut evaluation);
    evaluation
}

/// Mark the evaluation final and visible to the employee. No recomputation happens here: the last
/// composited total and grade are what gets published.
pub fn publish(mut evaluation: Evaluation) -> Evaluation {
    evaluation.is_hr_complete = true;
    evaluation
}

/// `total_score = z_score_adjusted + adjustments`, to 2 dp, and the grade derived from it.
pub(crate) fn composite_total(evaluation: &mut Evaluation) {
    let total = evaluation.z_score_adjusted + f64::from(evaluation.adjustment_total());
    evaluation.total_score = round_to_cents(total);
    evaluation.grade = Some(Grade::from_score(evaluation.total_score));
}
