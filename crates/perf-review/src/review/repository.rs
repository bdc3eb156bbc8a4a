use super::domain::{Evaluation, EvaluationKey, Period};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Writes are overwrite-by-key on `(employee_id, year, term)`. Implementations need not
/// serialize a normalization pass against concurrent submissions for the same period; callers
/// that can race must hold the period exclusively for the duration of the pass.
pub trait EvaluationRepository: Send + Sync {
    fn fetch(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError>;
    fn upsert(&self, evaluation: Evaluation) -> Result<(), RepositoryError>;
    fn for_period(&self, period: &Period) -> Result<Vec<Evaluation>, RepositoryError>;
    fn save_batch(&self, evaluations: Vec<Evaluation>) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
