use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const A_THRESHOLD: f64 = 90.0;
const B_THRESHOLD: f64 = 80.0;
const C_THRESHOLD: f64 = 70.0;

/// Letter grade published to the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Fixed, period-independent thresholds. Anything below 70, including negative totals and
    /// NaN, is a D.
    pub fn from_score(total: f64) -> Self {
        if total >= A_THRESHOLD {
            Grade::A
        } else if total >= B_THRESHOLD {
            Grade::B
        } else if total >= C_THRESHOLD {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "A" | "a" => Ok(Grade::A),
            "B" | "b" => Ok(Grade::B),
            "C" | "c" => Ok(Grade::C),
            "D" | "d" => Ok(Grade::D),
            other => Err(format!("unknown grade '{other}'")),
        }
    }
}

/// Free-function form of [`Grade::from_score`].
pub fn classify(total: f64) -> Grade {
    Grade::from_score(total)
}
