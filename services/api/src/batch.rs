use crate::infra::parse_term;
use chrono::{Datelike, Local};
use clap::Args;
use perf_review::config::AppConfig;
use perf_review::error::AppError;
use perf_review::review::scoring::{normalize_with_stats, PeriodStatistics};
use perf_review::review::{Evaluation, EvaluationKey, Period, Term};
use perf_review::telemetry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// JSON array of evaluations, as exported from the review store
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the merged array (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Review year to normalize (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Review term, e.g. Yearly, Half-Yearly, Q1..Q4, Probation, PIP
    #[arg(long, value_parser = parse_term)]
    pub(crate) term: Term,
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;

    let NormalizeArgs {
        input,
        output,
        year,
        term,
    } = args;
    let period = Period::new(year.unwrap_or_else(|| Local::now().year()), term);

    let reader = BufReader::new(File::open(&input)?);
    let records: Vec<Evaluation> = serde_json::from_reader(reader)?;
    info!(input = %input.display(), records = records.len(), %period, "evaluation export loaded");

    let (merged, statistics) = normalize_period_records(records, period);

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &merged)?;
            writer.flush()?;
            info!(output = %path.display(), "normalized export written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &merged)?;
            writeln!(stdout)?;
        }
    }

    render_statistics(period, &statistics);
    Ok(())
}

/// Normalize the records of `period` and merge them back by evaluation key. Records of other
/// periods come back unchanged and in their original position.
pub(crate) fn normalize_period_records(
    records: Vec<Evaluation>,
    period: Period,
) -> (Vec<Evaluation>, PeriodStatistics) {
    let batch: Vec<Evaluation> = records
        .iter()
        .filter(|record| period.contains(record))
        .cloned()
        .collect();

    let normalized = normalize_with_stats(batch);
    let mut by_key: HashMap<EvaluationKey, Evaluation> = normalized
        .evaluations
        .into_iter()
        .map(|evaluation| (evaluation.key(), evaluation))
        .collect();

    let merged = records
        .into_iter()
        .map(|record| by_key.remove(&record.key()).unwrap_or(record))
        .collect();

    (merged, normalized.statistics)
}

fn render_statistics(period: Period, statistics: &PeriodStatistics) {
    let company = statistics.company;
    eprintln!("Normalization summary for {period}");
    if company.count == 0 {
        eprintln!("- no evaluations in this period");
        return;
    }
    eprintln!(
        "- company: {} evaluations | mean {:.2} | std dev {:.2}",
        company.count, company.mean, company.std_dev
    );
    for cohort in &statistics.cohorts {
        eprintln!(
            "  - {}: {} evaluations | mean {:.2} | std dev {:.2}",
            cohort.manager_id,
            cohort.distribution.count,
            cohort.distribution.mean,
            cohort.distribution.std_dev
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_review::review::{EmployeeId, ManagerId, ScoreSet};

    fn record(employee: &str, manager: &str, term: Term, raw: f64) -> Evaluation {
        Evaluation {
            employee_id: EmployeeId(employee.to_string()),
            manager_id: ManagerId(manager.to_string()),
            year: 2024,
            term,
            scores: [("targetAchievement", raw)].into_iter().collect::<ScoreSet>(),
            raw_total: raw,
            z_score_adjusted: raw,
            attendance_bonus: 0,
            overall_adjustment: 0,
            rewards_punishments: 0,
            total_score: raw,
            grade: None,
            feedback: String::new(),
            is_manager_complete: true,
            is_z_score_calculated: false,
            is_hr_complete: false,
        }
    }

    #[test]
    fn merge_rewrites_only_the_selected_period() {
        let records = vec![
            record("E1", "M1", Term::Yearly, 80.0),
            record("E9", "M1", Term::Q3, 40.0),
            record("E2", "M1", Term::Yearly, 90.0),
            record("E3", "M1", Term::Yearly, 100.0),
            record("E4", "M2", Term::Yearly, 60.0),
            record("E5", "M2", Term::Yearly, 70.0),
        ];

        let (merged, statistics) =
            normalize_period_records(records, Period::new(2024, Term::Yearly));

        assert_eq!(merged.len(), 6);
        assert_eq!(statistics.company.count, 5);

        let untouched = &merged[1];
        assert_eq!(untouched.employee_id.0, "E9");
        assert!(!untouched.is_z_score_calculated);
        assert_eq!(untouched.z_score_adjusted, 40.0);

        assert_eq!(merged[0].employee_id.0, "E1");
        assert_eq!(merged[0].z_score_adjusted, 64.19);
        assert_eq!(merged[5].z_score_adjusted, 91.18);
        assert!(merged
            .iter()
            .filter(|evaluation| evaluation.term == Term::Yearly)
            .all(|evaluation| evaluation.is_z_score_calculated));
    }

    #[test]
    fn period_without_records_passes_everything_through() {
        let records = vec![record("E1", "M1", Term::Q1, 55.0)];

        let (merged, statistics) = normalize_period_records(records.clone(), Period::new(2023, Term::Q1));

        assert_eq!(merged, records);
        assert_eq!(statistics.company.count, 0);
    }
}
