use crate::infra::{parse_term, InMemoryEvaluationRepository};
use chrono::{Datelike, Local};
use clap::Args;
use perf_review::error::AppError;
use perf_review::review::{
    AdjustmentField, CriteriaConfig, DepartmentCategory, EmployeeId, Evaluation, EvaluationKey,
    ManagerId, ManagerSubmission, Period, ReviewService, RoleTier, ScoreSet, Term,
};
use std::sync::Arc;

/// Admin staff metric keys in rubric order.
const ADMIN_METRICS: [&str; 7] = [
    "targetAchievement",
    "accuracy",
    "timeliness",
    "problemSolving",
    "collaboration",
    "professionalDev",
    "engagement",
];

/// Two managers: M1 rates generously across three reports, M2 rates two reports harshly.
const DEMO_TEAM: [(&str, &str, [f64; 7]); 5] = [
    ("E1", "M1", [32.0, 16.0, 8.0, 8.0, 8.0, 4.0, 4.0]),
    ("E2", "M1", [36.0, 18.0, 9.0, 9.0, 9.0, 5.0, 4.0]),
    ("E3", "M1", [40.0, 20.0, 10.0, 10.0, 10.0, 5.0, 5.0]),
    ("E4", "M2", [24.0, 12.0, 6.0, 6.0, 6.0, 3.0, 3.0]),
    ("E5", "M2", [28.0, 14.0, 7.0, 7.0, 7.0, 4.0, 3.0]),
];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Review year (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Review term
    #[arg(long, value_parser = parse_term, default_value = "Yearly")]
    pub(crate) term: Term,
    /// Skip the HR adjustment and publication steps
    #[arg(long)]
    pub(crate) skip_adjustments: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        year,
        term,
        skip_adjustments,
    } = args;
    let period = Period::new(year.unwrap_or_else(|| Local::now().year()), term);

    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let service = ReviewService::new(repository, CriteriaConfig::standard());

    println!("Performance review scoring demo ({period})");
    println!("\nManager submissions");
    for submission in demo_submissions(period) {
        let evaluation = service.submit(submission)?;
        println!(
            "- {} scored by {}: raw total {:.2}",
            evaluation.employee_id, evaluation.manager_id, evaluation.raw_total
        );
    }

    if let Some(metrics) = service.metric_set(DepartmentCategory::Admin, RoleTier::Staff) {
        if let (Some(metric), Some(first)) = (metrics.get("accuracy"), DEMO_TEAM.first()) {
            let score = first.2[1];
            println!(
                "  Rubric for {} on {} ({:.0}/{:.0}): {}",
                first.0,
                metric.label,
                score,
                metric.max,
                metric.rubric_for(score)
            );
        }
    }

    let report = service.normalize_period(&period)?;
    let company = report.statistics.company;
    println!("\nCohort normalization");
    println!(
        "- company: {} evaluations | mean {:.2} | std dev {:.2}",
        company.count, company.mean, company.std_dev
    );
    for cohort in &report.statistics.cohorts {
        println!(
            "  - {}: mean {:.2} | std dev {:.2}",
            cohort.manager_id, cohort.distribution.mean, cohort.distribution.std_dev
        );
    }
    render_table(&report.evaluations);

    if skip_adjustments {
        return Ok(());
    }

    println!("\nHR adjustments");
    let key = EvaluationKey::new("E4", period);
    service.adjust(&key, AdjustmentField::AttendanceBonus, 2)?;
    let adjusted = service.adjust(&key, AdjustmentField::RewardsPunishments, 10)?;
    println!(
        "- {}: {} +{} / {} +{} -> total {:.2} ({})",
        adjusted.employee_id,
        AdjustmentField::AttendanceBonus,
        adjusted.attendance_bonus,
        AdjustmentField::RewardsPunishments,
        adjusted.rewards_punishments,
        adjusted.total_score,
        grade_label(&adjusted)
    );

    for (employee, _, _) in DEMO_TEAM {
        service.publish(&EvaluationKey::new(employee, period))?;
    }
    let progress = service.period_progress(&period)?;
    println!(
        "\nPublished {}/{} evaluations ({} pending)",
        progress.published, progress.total, progress.pending
    );

    Ok(())
}

fn demo_submissions(period: Period) -> Vec<ManagerSubmission> {
    DEMO_TEAM
        .iter()
        .map(|(employee, manager, scores)| ManagerSubmission {
            employee_id: EmployeeId(employee.to_string()),
            manager_id: ManagerId(manager.to_string()),
            year: period.year,
            term: period.term,
            scores: ADMIN_METRICS
                .into_iter()
                .zip(scores.iter().copied())
                .collect::<ScoreSet>(),
            feedback: String::new(),
        })
        .collect()
}

fn render_table(evaluations: &[Evaluation]) {
    println!(
        "\n{:<6} {:<8} {:>8} {:>10} {:>8} {:>6}",
        "Emp", "Manager", "Raw", "Adjusted", "Total", "Grade"
    );
    for evaluation in evaluations {
        println!(
            "{:<6} {:<8} {:>8.2} {:>10.2} {:>8.2} {:>6}",
            evaluation.employee_id.0,
            evaluation.manager_id.0,
            evaluation.raw_total,
            evaluation.z_score_adjusted,
            evaluation.total_score,
            grade_label(evaluation)
        );
    }
}

fn grade_label(evaluation: &Evaluation) -> &'static str {
    evaluation.grade.map_or("-", |grade| grade.letter())
}
