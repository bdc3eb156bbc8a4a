//! Cohort normalization for one scoring period.
//!
//! Each manager's ratings form a cohort. Every raw total is standardized against its own cohort
//! (mean and sample standard deviation) and then de-standardized against the whole period, so a
//! lenient or harsh rater's distribution is re-centred onto the company distribution while each
//! employee keeps their standing inside the cohort. An employee's adjusted score therefore depends
//! on how the same manager rated their other reports; that dependence is the fairness mechanism.
//!
//! A standard deviation of 0 (single-member cohort, or all-equal scores) is floored to
//! [`MIN_STD_DEV`] instead of skipping the rescale. A single-member cohort lands exactly on the
//! company mean.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use super::grade::Grade;
use super::round_to_cents;
use crate::review::domain::{Evaluation, ManagerId};

/// Floor applied to a zero standard deviation.
pub const MIN_STD_DEV: f64 = 1.0;

/// Mean and floored sample standard deviation of a set of raw totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Distribution {
    pub fn from_samples(samples: &[f64]) -> Self {
        let count = samples.len();
        let mean = mean(samples);
        let std_dev = sample_std_dev(samples, mean);

        Self {
            count,
            mean,
            std_dev: if std_dev == 0.0 { MIN_STD_DEV } else { std_dev },
        }
    }

    /// Map `value` from this distribution onto `target`, preserving its z-score.
    pub fn rescale(&self, value: f64, target: &Distribution) -> f64 {
        ((value - self.mean) / self.std_dev) * target.std_dev + target.mean
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample (n - 1) standard deviation; 0 for fewer than two samples.
fn sample_std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() <= 1 {
        return 0.0;
    }
    let squared: f64 = samples.iter().map(|value| (value - mean).powi(2)).sum();
    (squared / (samples.len() - 1) as f64).sqrt()
}

/// Statistics of one manager's cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    pub manager_id: ManagerId,
    #[serde(flatten)]
    pub distribution: Distribution,
}

/// Intermediate statistics of a normalization pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStatistics {
    pub cohorts: Vec<CohortStats>,
    pub company: Distribution,
}

impl PeriodStatistics {
    /// Cohort statistics ordered by manager id, plus the pooled company distribution.
    pub fn compute(evaluations: &[Evaluation]) -> Self {
        let mut by_manager: BTreeMap<&ManagerId, Vec<f64>> = BTreeMap::new();
        for evaluation in evaluations {
            by_manager
                .entry(&evaluation.manager_id)
                .or_default()
                .push(evaluation.raw_total);
        }

        let cohorts = by_manager
            .into_iter()
            .map(|(manager_id, totals)| CohortStats {
                manager_id: manager_id.clone(),
                distribution: Distribution::from_samples(&totals),
            })
            .collect();

        let pooled: Vec<f64> = evaluations
            .iter()
            .map(|evaluation| evaluation.raw_total)
            .collect();

        Self {
            cohorts,
            company: Distribution::from_samples(&pooled),
        }
    }

    pub fn cohort(&self, manager_id: &ManagerId) -> Option<&CohortStats> {
        self.cohorts
            .iter()
            .find(|cohort| &cohort.manager_id == manager_id)
    }
}

/// Output of a normalization pass: the rewritten evaluations, in input order, and the statistics
/// they were rescaled with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPeriod {
    pub evaluations: Vec<Evaluation>,
    pub statistics: PeriodStatistics,
}

/// Normalize every evaluation of one period. See [`normalize_with_stats`].
pub fn normalize(evaluations: Vec<Evaluation>) -> Vec<Evaluation> {
    normalize_with_stats(evaluations).evaluations
}

/// Normalize every evaluation of one period and report the statistics used.
///
/// The input must be the complete set of evaluations for a single (year, term). Each evaluation
/// gets `z_score_adjusted` and `total_score` (both to 2 dp), a grade, and the normalized flag.
/// Raw totals and adjustment terms are read, never written, so re-running on unchanged input
/// reproduces the same output.
pub fn normalize_with_stats(evaluations: Vec<Evaluation>) -> NormalizedPeriod {
    let statistics = PeriodStatistics::compute(&evaluations);
    if evaluations.is_empty() {
        return NormalizedPeriod {
            evaluations,
            statistics,
        };
    }

    for cohort in &statistics.cohorts {
        debug!(
            manager_id = %cohort.manager_id,
            count = cohort.distribution.count,
            mean = cohort.distribution.mean,
            std_dev = cohort.distribution.std_dev,
            "cohort statistics"
        );
    }

    let company = statistics.company;
    let evaluations = evaluations
        .into_iter()
        .map(|evaluation| {
            let cohort = statistics
                .cohort(&evaluation.manager_id)
                .map(|cohort| cohort.distribution)
                .unwrap_or(company);
            rescore(evaluation, &cohort, &company)
        })
        .collect();

    info!(
        evaluations = company.count,
        cohorts = statistics.cohorts.len(),
        company_mean = company.mean,
        company_std_dev = company.std_dev,
        "period normalized"
    );

    NormalizedPeriod {
        evaluations,
        statistics,
    }
}

fn rescore(mut evaluation: Evaluation, cohort: &Distribution, company: &Distribution) -> Evaluation {
    let adjusted_base = cohort.rescale(evaluation.raw_total, company);
    let total = adjusted_base + f64::from(evaluation.adjustment_total());

    evaluation.z_score_adjusted = round_to_cents(adjusted_base);
    evaluation.total_score = round_to_cents(total);
    evaluation.grade = Some(Grade::from_score(evaluation.total_score));
    evaluation.is_z_score_calculated = true;
    evaluation
}
