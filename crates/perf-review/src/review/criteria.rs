//! Rubric metric sets keyed by department category and role tier.
//!
//! The engine never needs to know which set produced a score set; these types exist so the host
//! can render the rubric, pick the set for an employee, and load an edited configuration.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::scoring::band_index;

/// One rubric line: a metric key, its maximum points, and five band descriptions
/// (>=90%, >=70%, >=60%, >=30%, below).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub label: String,
    pub max: f64,
    pub description: [String; 5],
}

impl Metric {
    pub fn rubric_for(&self, score: f64) -> &str {
        &self.description[band_index(score, self.max)]
    }
}

/// Ordered metrics active for one department category and role tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(pub Vec<Metric>);

impl MetricSet {
    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.0.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Metric> {
        self.0.iter().find(|metric| metric.key == key)
    }

    /// Highest attainable raw total under this set.
    pub fn max_total(&self) -> f64 {
        self.0.iter().map(|metric| metric.max).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepartmentCategory {
    Sales,
    Admin,
}

impl DepartmentCategory {
    pub const fn key(self) -> &'static str {
        match self {
            DepartmentCategory::Sales => "SALES",
            DepartmentCategory::Admin => "ADMIN",
        }
    }
}

impl std::str::FromStr for DepartmentCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SALES" => Ok(DepartmentCategory::Sales),
            "ADMIN" => Ok(DepartmentCategory::Admin),
            other => Err(format!("unknown department category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleTier {
    Staff,
    Manager,
}

impl RoleTier {
    pub const fn key(self) -> &'static str {
        match self {
            RoleTier::Staff => "STAFF",
            RoleTier::Manager => "MANAGER",
        }
    }

    pub const fn from_is_manager(is_manager: bool) -> Self {
        if is_manager {
            RoleTier::Manager
        } else {
            RoleTier::Staff
        }
    }
}

impl std::str::FromStr for RoleTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "STAFF" => Ok(RoleTier::Staff),
            "MANAGER" => Ok(RoleTier::Manager),
            other => Err(format!("unknown role tier '{other}'")),
        }
    }
}

/// Organisational departments and the rubric category each one is scored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Sales,
    Marketing,
    #[serde(rename = "Human Resources")]
    HumanResources,
    #[serde(rename = "Financial Accounting")]
    FinancialAccounting,
    #[serde(rename = "Administrative Support")]
    Administration,
    Logistics,
    Pharmacy,
    Management,
}

impl Department {
    pub const fn category(self) -> DepartmentCategory {
        match self {
            Department::Sales | Department::Marketing => DepartmentCategory::Sales,
            Department::Engineering
            | Department::HumanResources
            | Department::FinancialAccounting
            | Department::Administration
            | Department::Logistics
            | Department::Pharmacy
            | Department::Management => DepartmentCategory::Admin,
        }
    }
}

/// Metric sets keyed `"{CATEGORY}_{TIER}"`, e.g. `SALES_STAFF`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaConfig(BTreeMap<String, MetricSet>);

impl CriteriaConfig {
    pub fn set_key(category: DepartmentCategory, tier: RoleTier) -> String {
        format!("{}_{}", category.key(), tier.key())
    }

    pub fn metric_set(&self, category: DepartmentCategory, tier: RoleTier) -> Option<&MetricSet> {
        self.0.get(&Self::set_key(category, tier))
    }

    pub fn insert(&mut self, category: DepartmentCategory, tier: RoleTier, set: MetricSet) {
        self.0.insert(Self::set_key(category, tier), set);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CriteriaError> {
        serde_json::from_reader(reader).map_err(CriteriaError::Parse)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CriteriaError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CriteriaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Built-in rubric: each category's results metrics plus four shared behaviour metrics, 100
    /// points per set. Manager tiers use the same metrics as staff.
    pub fn standard() -> Self {
        let sales = MetricSet(vec![
            metric("achievementRate", "Sales target achievement", 35.0, Standard::Quality),
            metric("salesAmount", "Sales volume", 20.0, Standard::Quality),
            metric("developmentActive", "Business development drive", 10.0, Standard::Quality),
            metric("activityQuality", "Sales activity quality", 5.0, Standard::Quality),
        ]);
        let admin = MetricSet(vec![
            metric("targetAchievement", "Work goal achievement", 40.0, Standard::Quality),
            metric("accuracy", "Work accuracy", 20.0, Standard::Quality),
            metric("timeliness", "Timeliness", 10.0, Standard::Quality),
        ]);

        let mut config = Self::default();
        for (category, results) in [
            (DepartmentCategory::Sales, sales),
            (DepartmentCategory::Admin, admin),
        ] {
            let mut metrics = results.0;
            metrics.extend(shared_metrics());
            for tier in [RoleTier::Staff, RoleTier::Manager] {
                config.insert(category, tier, MetricSet(metrics.clone()));
            }
        }
        config
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    #[error("unable to read criteria file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("criteria configuration is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy)]
enum Standard {
    Quality,
    ProblemSolving,
    Collaboration,
    Learning,
    Engagement,
}

impl Standard {
    const fn descriptions(self) -> [&'static str; 5] {
        match self {
            Standard::Quality => [
                "Fully meets or exceeds the expected standard.",
                "Almost fully meets requirements, with minor room for improvement.",
                "Meets requirements but is inconsistent on some items; clear room for improvement.",
                "Falls short of the required standard and behind target; frequent errors or inefficiency hold the team back.",
                "Far below the required standard; regularly causes serious errors or delays.",
            ],
            Standard::ProblemSolving => [
                "Resolves every problem encountered quickly and efficiently.",
                "Resolves most problems effectively; occasionally needs help.",
                "Resolves some problems but relies on help from others.",
                "Cannot resolve problems independently; others frequently step in.",
                "Reacts slowly to problems and leaves them unresolved or delayed.",
            ],
            Standard::Collaboration => [
                "Drives teamwork and contributes significantly to the team.",
                "Collaborates well and gets along with colleagues.",
                "Takes part in teamwork but contributes little.",
                "Only occasionally takes part in teamwork; low willingness to collaborate.",
                "Lacks team spirit and drags down team effectiveness.",
            ],
            Standard::Learning => [
                "Proactively learns and applies new knowledge, markedly improving their skills.",
                "Regularly joins learning activities and applies what was learned.",
                "Joins learning activities with limited benefit to the work.",
                "Low willingness to learn; no visible progress.",
                "Refuses to learn; no intent to improve professional skills.",
            ],
            Standard::Engagement => [
                "Strongly identifies with the company culture and joins company activities.",
                "Identifies with the company culture and joins some activities.",
                "Limited identification with the culture; joins activities only occasionally.",
                "Does not engage with culture activities; indifferent attitude.",
                "Refuses company activities; negative attitude towards the culture.",
            ],
        }
    }
}

fn shared_metrics() -> Vec<Metric> {
    vec![
        metric("problemSolving", "Problem solving", 10.0, Standard::ProblemSolving),
        metric("collaboration", "Teamwork", 10.0, Standard::Collaboration),
        metric("professionalDev", "Professional development", 5.0, Standard::Learning),
        metric("engagement", "Engagement", 5.0, Standard::Engagement),
    ]
}

fn metric(key: &str, label: &str, max: f64, standard: Standard) -> Metric {
    Metric {
        key: key.to_string(),
        label: label.to_string(),
        max,
        description: standard.descriptions().map(str::to_string),
    }
}
