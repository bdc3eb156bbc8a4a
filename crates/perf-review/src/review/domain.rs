use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::scoring::Grade;

/// Identifier wrapper for the employee being reviewed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for the manager who scored an evaluation. Also the cohort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagerId(pub String);

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review cycle within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Yearly,
    #[serde(rename = "Half-Yearly")]
    HalfYearly,
    Q1,
    Q2,
    Q3,
    Q4,
    Probation,
    #[serde(rename = "PIP")]
    Pip,
}

impl Term {
    pub const ALL: [Term; 8] = [
        Term::Yearly,
        Term::HalfYearly,
        Term::Q1,
        Term::Q2,
        Term::Q3,
        Term::Q4,
        Term::Probation,
        Term::Pip,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Term::Yearly => "Yearly",
            Term::HalfYearly => "Half-Yearly",
            Term::Q1 => "Q1",
            Term::Q2 => "Q2",
            Term::Q3 => "Q3",
            Term::Q4 => "Q4",
            Term::Probation => "Probation",
            Term::Pip => "PIP",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Term {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let candidate = value.trim().replace('_', "-");
        Term::ALL
            .into_iter()
            .find(|term| term.label().eq_ignore_ascii_case(&candidate))
            .ok_or_else(|| ParsePeriodError::UnknownTerm(value.to_string()))
    }
}

/// A (year, term) scoring cycle. Every period-scoped operation takes one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub term: Term,
}

impl Period {
    pub const fn new(year: i32, term: Term) -> Self {
        Self { year, term }
    }

    pub fn parse(year: &str, term: &str) -> Result<Self, ParsePeriodError> {
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| ParsePeriodError::InvalidYear(year.to_string()))?;
        Ok(Self::new(year, term.parse()?))
    }

    pub fn contains(&self, evaluation: &Evaluation) -> bool {
        evaluation.year == self.year && evaluation.term == self.term
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePeriodError {
    #[error("unknown review term '{0}'")]
    UnknownTerm(String),
    #[error("invalid review year '{0}'")]
    InvalidYear(String),
}

/// Awarded points keyed by metric key.
///
/// The key set follows whichever metric set was active when the employee was scored, so it is a
/// plain map rather than a fixed record. Values that are not numbers when deserialized count as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreSet(BTreeMap<String, f64>);

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, score: f64) -> Option<f64> {
        self.0.insert(key.into(), score)
    }

    /// Awarded score for `key`, 0 when the metric was not scored.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, score)| (key.as_str(), *score))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.values().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, score)| (key.into(), score))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for ScoreSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, LenientNumber>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(key, value)| (key, value.into_f64()))
                .collect(),
        ))
    }
}

/// Number as entered by a form: numeric, numeric text, or anything else (read as 0).
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    fn into_f64(self) -> f64 {
        let value = match self {
            LenientNumber::Number(value) => value,
            LenientNumber::Text(text) => text.trim().parse().unwrap_or(0.0),
            LenientNumber::Other(_) => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.into_f64())
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = LenientNumber::deserialize(deserializer)?.into_f64();
    Ok(value.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

fn optional_grade<'de, D>(deserializer: D) -> Result<Option<Grade>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|letter| letter.parse().ok()))
}

/// Storage key of an evaluation: one per employee and period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationKey {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub term: Term,
}

impl EvaluationKey {
    pub fn new(employee_id: impl Into<String>, period: Period) -> Self {
        Self {
            employee_id: EmployeeId(employee_id.into()),
            year: period.year,
            term: period.term,
        }
    }

    pub const fn period(&self) -> Period {
        Period::new(self.year, self.term)
    }
}

impl fmt::Display for EvaluationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.employee_id, self.year, self.term)
    }
}

/// One employee's review for one period, from manager scoring through HR publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub employee_id: EmployeeId,
    pub manager_id: ManagerId,
    pub year: i32,
    pub term: Term,
    #[serde(default)]
    pub scores: ScoreSet,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub raw_total: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub z_score_adjusted: f64,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub attendance_bonus: i32,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub overall_adjustment: i32,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub rewards_punishments: i32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_score: f64,
    #[serde(default, deserialize_with = "optional_grade")]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub is_manager_complete: bool,
    #[serde(default)]
    pub is_z_score_calculated: bool,
    #[serde(default, rename = "isHRComplete")]
    pub is_hr_complete: bool,
}

impl Evaluation {
    pub fn key(&self) -> EvaluationKey {
        EvaluationKey {
            employee_id: self.employee_id.clone(),
            year: self.year,
            term: self.term,
        }
    }

    pub const fn period(&self) -> Period {
        Period::new(self.year, self.term)
    }

    /// Sum of the three HR adjustment terms.
    pub fn adjustment_total(&self) -> i32 {
        self.attendance_bonus
            .saturating_add(self.overall_adjustment)
            .saturating_add(self.rewards_punishments)
    }

    /// Scored by the manager but not yet published by HR.
    pub fn is_pending_publication(&self) -> bool {
        self.is_manager_complete && !self.is_hr_complete
    }
}

/// Scores a manager submits for one of their reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSubmission {
    pub employee_id: EmployeeId,
    pub manager_id: ManagerId,
    pub year: i32,
    pub term: Term,
    #[serde(default)]
    pub scores: ScoreSet,
    #[serde(default)]
    pub feedback: String,
}

impl ManagerSubmission {
    pub fn key(&self) -> EvaluationKey {
        EvaluationKey {
            employee_id: self.employee_id.clone(),
            year: self.year,
            term: self.term,
        }
    }

    pub const fn period(&self) -> Period {
        Period::new(self.year, self.term)
    }
}
