use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 20.0;

/// Finite number in `[0, 20]`.
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Finite and strictly positive.
pub fn is_valid_coefficient(coefficient: f64) -> bool {
    coefficient.is_finite() && coefficient > 0.0
}

pub fn is_valid_preschool_code(code: &str) -> bool {
    code.parse::<PreschoolCode>().is_ok()
}

/// Rounds to the nearest hundredth.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Qualitative marks used in preschool instead of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreschoolCode {
    #[serde(rename = "TS")]
    TresSatisfaisant,
    #[serde(rename = "S")]
    Satisfaisant,
    #[serde(rename = "PS")]
    PeuSatisfaisant,
}

impl PreschoolCode {
    pub const fn code(self) -> &'static str {
        match self {
            Self::TresSatisfaisant => "TS",
            Self::Satisfaisant => "S",
            Self::PeuSatisfaisant => "PS",
        }
    }
}

impl fmt::Display for PreschoolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a preschool code (expected TS, S or PS)")]
pub struct InvalidPreschoolCode(pub String);

impl FromStr for PreschoolCode {
    type Err = InvalidPreschoolCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TS" => Ok(Self::TresSatisfaisant),
            "S" => Ok(Self::Satisfaisant),
            "PS" => Ok(Self::PeuSatisfaisant),
            _ => Err(InvalidPreschoolCode(value.to_string())),
        }
    }
}

/// Non-empty set of usable values left after dropping absent or invalid
/// entries. Every aggregation goes through this type so that "nothing valid
/// left" consistently becomes `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidScores(Vec<f64>);

impl ValidScores {
    /// Keeps entries that are present and pass `is_valid`.
    pub fn filter<I>(values: I, is_valid: impl Fn(f64) -> bool) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let kept: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|value| is_valid(*value))
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(Self(kept))
        }
    }

    /// Raw marks: present and within `[0, 20]`.
    pub fn scores<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::filter(values, is_valid_score)
    }

    /// Already aggregated values: present and finite. Weighted averages may
    /// exceed 20, so the mark range is not enforced here.
    pub fn finite<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::filter(values, f64::is_finite)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Unrounded arithmetic mean.
    pub fn mean(&self) -> f64 {
        self.sum() / self.0.len() as f64
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}
