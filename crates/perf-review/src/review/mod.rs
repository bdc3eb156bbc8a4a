//! Performance review scoring: rubric totals, cohort normalization, HR adjustments, and the
//! service and HTTP surface around them.
//!
//! The numeric pipeline in [`scoring`] is pure and has no storage or logging side effects beyond
//! `tracing` events. [`service::ReviewService`] composes it with an [`EvaluationRepository`] and
//! the [`CriteriaConfig`] rubric store.

pub mod criteria;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod submission;

#[cfg(test)]
mod tests;

pub use criteria::{
    CriteriaConfig, CriteriaError, Department, DepartmentCategory, Metric, MetricSet, RoleTier,
};
pub use domain::{
    EmployeeId, Evaluation, EvaluationKey, ManagerId, ManagerSubmission, ParsePeriodError, Period,
    ScoreSet, Term,
};
pub use repository::{EvaluationRepository, RepositoryError};
pub use router::review_router;
pub use scoring::{AdjustmentField, Grade, PeriodStatistics};
pub use service::{NormalizationReport, PeriodProgress, ReviewService, ReviewServiceError};
