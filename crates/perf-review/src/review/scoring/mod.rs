//! Numeric core of the review pipeline.
//!
//! Every function here is synchronous and pure over owned data: the rubric scorer sums a score
//! set, the normalizer rescales one period's evaluations across manager cohorts, and the
//! compositor layers HR adjustments on top. Callers own persistence and must hand the normalizer
//! a complete snapshot of the period.

mod adjustment;
mod grade;
mod normalizer;
mod rubric;

pub use adjustment::{apply_adjustment, publish, AdjustmentField, ParseAdjustmentFieldError};
pub use grade::{classify, Grade};
pub use normalizer::{
    normalize, normalize_with_stats, CohortStats, Distribution, NormalizedPeriod,
    PeriodStatistics, MIN_STD_DEV,
};
pub use rubric::{band_index, raw_total, RUBRIC_BANDS};

pub(crate) use adjustment::composite_total;

/// Round half away from zero to two decimal places.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
