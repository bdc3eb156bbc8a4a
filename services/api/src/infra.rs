use metrics_exporter_prometheus::PrometheusHandle;
use perf_review::review::{
    Evaluation, EvaluationKey, EvaluationRepository, Period, RepositoryError, Term,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local evaluation store used by the service and the demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationKey, Evaluation>>>,
}

impl InMemoryEvaluationRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<EvaluationKey, Evaluation>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("evaluation store lock poisoned".to_string()))
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn fetch(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError> {
        Ok(self.records()?.get(key).cloned())
    }

    fn upsert(&self, evaluation: Evaluation) -> Result<(), RepositoryError> {
        self.records()?.insert(evaluation.key(), evaluation);
        Ok(())
    }

    fn for_period(&self, period: &Period) -> Result<Vec<Evaluation>, RepositoryError> {
        let mut evaluations: Vec<Evaluation> = self
            .records()?
            .values()
            .filter(|evaluation| period.contains(evaluation))
            .cloned()
            .collect();
        evaluations.sort_by(|left, right| left.key().cmp(&right.key()));
        Ok(evaluations)
    }

    fn save_batch(&self, evaluations: Vec<Evaluation>) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        for evaluation in evaluations {
            guard.insert(evaluation.key(), evaluation);
        }
        Ok(())
    }
}

pub(crate) fn parse_term(raw: &str) -> Result<Term, String> {
    raw.parse::<Term>().map_err(|err| err.to_string())
}
