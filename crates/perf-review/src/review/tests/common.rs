use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::review::domain::{
    EmployeeId, Evaluation, EvaluationKey, ManagerId, ManagerSubmission, Period, ScoreSet, Term,
};
use crate::review::repository::{EvaluationRepository, RepositoryError};
use crate::review::{review_router, submission, CriteriaConfig, ReviewService};

pub(super) const PERIOD: Period = Period::new(2024, Term::Yearly);

/// Raw totals of the two-manager scenario used across the suites: M1 rates E1..E3, M2 rates E4
/// and E5.
pub(super) const COHORT_SCENARIO: [(&str, &str, f64); 5] = [
    ("E1", "M1", 80.0),
    ("E2", "M1", 90.0),
    ("E3", "M1", 100.0),
    ("E4", "M2", 60.0),
    ("E5", "M2", 70.0),
];

pub(super) fn submission_for(employee: &str, manager: &str, raw: f64) -> ManagerSubmission {
    // Split across two admin metrics so the raw total is a real sum.
    let accuracy = (raw * 0.2).round();
    let scores: ScoreSet = [("targetAchievement", raw - accuracy), ("accuracy", accuracy)]
        .into_iter()
        .collect();

    ManagerSubmission {
        employee_id: EmployeeId(employee.to_string()),
        manager_id: ManagerId(manager.to_string()),
        year: PERIOD.year,
        term: PERIOD.term,
        scores,
        feedback: format!("{manager} review of {employee}"),
    }
}

pub(super) fn evaluation(employee: &str, manager: &str, raw: f64) -> Evaluation {
    submission::compose(submission_for(employee, manager, raw), None)
}

pub(super) fn scenario() -> Vec<Evaluation> {
    COHORT_SCENARIO
        .iter()
        .map(|(employee, manager, raw)| evaluation(employee, manager, *raw))
        .collect()
}

pub(super) fn find<'a>(evaluations: &'a [Evaluation], employee: &str) -> &'a Evaluation {
    evaluations
        .iter()
        .find(|evaluation| evaluation.employee_id.0 == employee)
        .expect("employee present")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn key(employee: &str) -> EvaluationKey {
    EvaluationKey::new(employee, PERIOD)
}

pub(super) fn build_service() -> (ReviewService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReviewService::new(repository.clone(), CriteriaConfig::standard());
    (service, repository)
}

pub(super) fn seeded_service() -> (ReviewService<MemoryRepository>, Arc<MemoryRepository>) {
    let (service, repository) = build_service();
    for (employee, manager, raw) in COHORT_SCENARIO {
        service
            .submit(submission_for(employee, manager, raw))
            .expect("submission stored");
    }
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<EvaluationKey, Evaluation>>>,
    pub(super) batches: Arc<Mutex<Vec<usize>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, key: &EvaluationKey) -> Option<Evaluation> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(key)
            .cloned()
    }

    pub(super) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().expect("batch mutex poisoned").clone()
    }
}

impl EvaluationRepository for MemoryRepository {
    fn fetch(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError> {
        Ok(self.stored(key))
    }

    fn upsert(&self, evaluation: Evaluation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(evaluation.key(), evaluation);
        Ok(())
    }

    fn for_period(&self, period: &Period) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut evaluations: Vec<Evaluation> = guard
            .values()
            .filter(|evaluation| period.contains(evaluation))
            .cloned()
            .collect();
        evaluations.sort_by(|left, right| left.employee_id.cmp(&right.employee_id));
        Ok(evaluations)
    }

    fn save_batch(&self, evaluations: Vec<Evaluation>) -> Result<(), RepositoryError> {
        self.batches
            .lock()
            .expect("batch mutex poisoned")
            .push(evaluations.len());
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for evaluation in evaluations {
            guard.insert(evaluation.key(), evaluation);
        }
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn fetch(&self, _key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _evaluation: Evaluation) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_period(&self, _period: &Period) -> Result<Vec<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_batch(&self, _evaluations: Vec<Evaluation>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn review_router_with_service(service: ReviewService<MemoryRepository>) -> axum::Router {
    review_router(Arc::new(service))
}
