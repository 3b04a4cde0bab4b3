use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::AppError;

/// Rounds a score to 2 decimals for external consumption.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serde helper: serializes an `f64` rounded to 2 decimals.
pub fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

/// A skill name that has been trimmed and checked for emptiness.
///
/// Comparisons elsewhere go through `key()`, never through the display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    pub fn new(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("skill name cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased comparison key.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl TryFrom<String> for SkillName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SkillName::new(&value)
    }
}

impl From<SkillName> for String {
    fn from(value: SkillName) -> Self {
        value.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strength score in `[0, 1]`.
///
/// Construction from caller-supplied values is checked (`new`); values the
/// scorer computes itself go through `clamped`. Serializes rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(try_from = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub const ZERO: Confidence = Confidence(0.0);

    pub fn new(value: f64) -> Result<Self, AppError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(AppError::Validation(format!(
                "confidence must be within [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = AppError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Confidence::new(value)
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_round2(&self.0, serializer)
    }
}

/// A skill found in (or supplied for) a user's profile, with its strength and
/// the text that justifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMention {
    pub name: SkillName,
    pub confidence: Confidence,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl SkillMention {
    pub fn new(name: SkillName, confidence: Confidence) -> Self {
        Self {
            name,
            confidence,
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }
}
