use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::criteria::{CriteriaConfig, DepartmentCategory, MetricSet, RoleTier};
use super::domain::{Evaluation, EvaluationKey, ManagerSubmission, Period};
use super::repository::{EvaluationRepository, RepositoryError};
use super::scoring::{self, AdjustmentField, PeriodStatistics};
use super::submission;

/// Service composing the repository, the criteria store, and the scoring pipeline.
pub struct ReviewService<R> {
    repository: Arc<R>,
    criteria: Arc<CriteriaConfig>,
}

impl<R> ReviewService<R>
where
    R: EvaluationRepository + 'static,
{
    pub fn new(repository: Arc<R>, criteria: CriteriaConfig) -> Self {
        Self {
            repository,
            criteria: Arc::new(criteria),
        }
    }

    pub fn criteria(&self) -> &CriteriaConfig {
        &self.criteria
    }

    pub fn metric_set(&self, category: DepartmentCategory, tier: RoleTier) -> Option<&MetricSet> {
        self.criteria.metric_set(category, tier)
    }

    /// Store a manager's scores, overwriting any earlier submission for the same period.
    pub fn submit(&self, submission: ManagerSubmission) -> Result<Evaluation, ReviewServiceError> {
        let key = submission.key();
        let existing = self.repository.fetch(&key)?;
        if existing
            .as_ref()
            .is_some_and(|previous| previous.is_z_score_calculated)
        {
            warn!(%key, "scores changed after normalization; period needs to be normalized again");
        }

        let evaluation = submission::compose(submission, existing.as_ref());
        self.repository.upsert(evaluation.clone())?;

        info!(%key, manager_id = %evaluation.manager_id, raw_total = evaluation.raw_total, "scores submitted");
        Ok(evaluation)
    }

    /// Normalize every evaluation of `period` and write the batch back.
    ///
    /// Reads the whole period in one call so the normalizer sees a complete snapshot. Submissions
    /// landing for the same period while this runs are last-write-wins.
    pub fn normalize_period(&self, period: &Period) -> Result<NormalizationReport, ReviewServiceError> {
        let snapshot = self.repository.for_period(period)?;
        if snapshot.is_empty() {
            info!(%period, "no evaluations to normalize");
        }

        let normalized = scoring::normalize_with_stats(snapshot);
        if !normalized.evaluations.is_empty() {
            self.repository.save_batch(normalized.evaluations.clone())?;
        }

        Ok(NormalizationReport {
            period: *period,
            statistics: normalized.statistics,
            evaluations: normalized.evaluations,
        })
    }

    /// Set one HR adjustment term and recomposite the total and grade.
    pub fn adjust(
        &self,
        key: &EvaluationKey,
        field: AdjustmentField,
        value: i32,
    ) -> Result<Evaluation, ReviewServiceError> {
        let evaluation = self.get(key)?;
        if !field.is_within_documented_range(value) {
            let range = field.documented_range();
            warn!(
                %key,
                %field,
                value,
                min = range.start(),
                max = range.end(),
                "adjustment outside documented range"
            );
        }

        let evaluation = scoring::apply_adjustment(evaluation, field, value);
        self.repository.upsert(evaluation.clone())?;
        Ok(evaluation)
    }

    /// Make the current total and grade final and visible to the employee.
    pub fn publish(&self, key: &EvaluationKey) -> Result<Evaluation, ReviewServiceError> {
        let evaluation = self.get(key)?;
        if !evaluation.is_z_score_calculated {
            warn!(%key, "publishing an evaluation that was never normalized");
        }

        let evaluation = scoring::publish(evaluation);
        self.repository.upsert(evaluation.clone())?;

        info!(%key, total_score = evaluation.total_score, grade = ?evaluation.grade, "evaluation published");
        Ok(evaluation)
    }

    pub fn get(&self, key: &EvaluationKey) -> Result<Evaluation, ReviewServiceError> {
        self.repository
            .fetch(key)?
            .ok_or_else(|| ReviewServiceError::NotFound(key.clone()))
    }

    /// Completion counters for one period.
    pub fn period_progress(&self, period: &Period) -> Result<PeriodProgress, ReviewServiceError> {
        let evaluations = self.repository.for_period(period)?;
        Ok(PeriodProgress::from_evaluations(*period, &evaluations))
    }
}

/// Result of a normalization pass, as returned to HR.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationReport {
    pub period: Period,
    pub statistics: PeriodStatistics,
    pub evaluations: Vec<Evaluation>,
}

/// How far a period has progressed through scoring, normalization, and publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodProgress {
    pub period: Period,
    pub total: usize,
    pub manager_complete: usize,
    pub normalized: usize,
    pub published: usize,
    pub pending: usize,
}

impl PeriodProgress {
    pub fn from_evaluations(period: Period, evaluations: &[Evaluation]) -> Self {
        let count = |predicate: fn(&Evaluation) -> bool| {
            evaluations
                .iter()
                .filter(|evaluation| period.contains(evaluation) && predicate(evaluation))
                .count()
        };

        Self {
            period,
            total: count(|_| true),
            manager_complete: count(|evaluation| evaluation.is_manager_complete),
            normalized: count(|evaluation| evaluation.is_z_score_calculated),
            published: count(|evaluation| evaluation.is_hr_complete),
            pending: count(Evaluation::is_pending_publication),
        }
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no evaluation for {0}")]
    NotFound(EvaluationKey),
}
