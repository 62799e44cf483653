//! Urgency level and the scorer's assessment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete urgency derived from a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Emergency,
}

impl UrgencyLevel {
    pub const EMERGENCY_THRESHOLD: f64 = 8.0;
    pub const HIGH_THRESHOLD: f64 = 6.0;
    pub const MODERATE_THRESHOLD: f64 = 4.0;

    /// Map a score onto a level. Thresholds are tested high to low; first match wins.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EMERGENCY_THRESHOLD {
            UrgencyLevel::Emergency
        } else if score >= Self::HIGH_THRESHOLD {
            UrgencyLevel::High
        } else if score >= Self::MODERATE_THRESHOLD {
            UrgencyLevel::Moderate
        } else {
            UrgencyLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Moderate => "moderate",
            UrgencyLevel::High => "high",
            UrgencyLevel::Emergency => "emergency",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the urgency scorer. Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    /// Clamped to [0, 10].
    pub score: f64,
    pub level: UrgencyLevel,
    /// Human-readable notes on which escalations fired, in the order they fired.
    /// Explanatory only; never fed back into scoring.
    pub factors: Vec<String>,
}

impl UrgencyAssessment {
    pub const EMERGENCY_FACTOR: &'static str = "Emergency condition detected";

    /// The short-circuit result for any symptom set touching an emergency condition.
    pub fn emergency_override() -> Self {
        Self {
            score: 10.0,
            level: UrgencyLevel::Emergency,
            factors: vec![Self::EMERGENCY_FACTOR.to_string()],
        }
    }

    /// Build an assessment from a raw score, clamping it and deriving the level.
    pub fn from_score(raw: f64, factors: Vec<String>) -> Self {
        let score = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 10.0) };
        Self {
            score,
            level: UrgencyLevel::from_score(score),
            factors,
        }
    }
}

/// Result of the lightweight `quick_assess` entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAssessment {
    pub level: UrgencyLevel,
    /// True iff `level` is `Emergency`.
    pub needs_immediate_care: bool,
    pub message: String,
}
