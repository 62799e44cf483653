//! Request bands and the validated request type.
//!
//! Age, duration, and gender are closed sets. Their serde and `FromStr`
//! representations are the human labels used as keys in the rule and
//! reference tables ("Under 18", "1-3 days", ...).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CarePathError, CarePathResult};

/// Maximum number of symptoms accepted in one request.
pub const MAX_SYMPTOMS: usize = 20;

/// Maximum length of a single symptom name, in characters.
pub const MAX_SYMPTOM_LEN: usize = 100;

/// A set of symptom names. Ordered so every derived list is reproducible.
pub type SymptomSet = BTreeSet<String>;

// ── AgeBand ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "Under 18")]
    Under18,
    #[serde(rename = "18-30")]
    From18To30,
    #[serde(rename = "31-45")]
    From31To45,
    #[serde(rename = "46-60")]
    From46To60,
    #[serde(rename = "61-75")]
    From61To75,
    #[serde(rename = "Over 75")]
    Over75,
}

impl AgeBand {
    pub const ALL: [AgeBand; 6] = [
        AgeBand::Under18,
        AgeBand::From18To30,
        AgeBand::From31To45,
        AgeBand::From46To60,
        AgeBand::From61To75,
        AgeBand::Over75,
    ];

    /// The table key for this band.
    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Under18 => "Under 18",
            AgeBand::From18To30 => "18-30",
            AgeBand::From31To45 => "31-45",
            AgeBand::From46To60 => "46-60",
            AgeBand::From61To75 => "61-75",
            AgeBand::Over75 => "Over 75",
        }
    }

    pub fn is_minor(self) -> bool {
        self == AgeBand::Under18
    }

    /// "61-75" and "Over 75".
    pub fn is_senior(self) -> bool {
        matches!(self, AgeBand::From61To75 | AgeBand::Over75)
    }
}

// ── DurationBand ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationBand {
    #[serde(rename = "Less than 24 hours")]
    LessThan24Hours,
    #[serde(rename = "1-3 days")]
    OneToThreeDays,
    #[serde(rename = "4-7 days")]
    FourToSevenDays,
    #[serde(rename = "1-2 weeks")]
    OneToTwoWeeks,
    #[serde(rename = "2+ weeks")]
    MoreThanTwoWeeks,
}

impl DurationBand {
    pub const ALL: [DurationBand; 5] = [
        DurationBand::LessThan24Hours,
        DurationBand::OneToThreeDays,
        DurationBand::FourToSevenDays,
        DurationBand::OneToTwoWeeks,
        DurationBand::MoreThanTwoWeeks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DurationBand::LessThan24Hours => "Less than 24 hours",
            DurationBand::OneToThreeDays => "1-3 days",
            DurationBand::FourToSevenDays => "4-7 days",
            DurationBand::OneToTwoWeeks => "1-2 weeks",
            DurationBand::MoreThanTwoWeeks => "2+ weeks",
        }
    }
}

// ── Gender ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

macro_rules! label_impls {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = CarePathError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| CarePathError::InvalidRequest {
                        reason: format!(
                            "unknown {} '{}'; expected one of: {}",
                            $what,
                            s,
                            $ty::ALL.iter().map(|v| v.label()).collect::<Vec<_>>().join(", ")
                        ),
                    })
            }
        }
    };
}

label_impls!(AgeBand, "age band");
label_impls!(DurationBand, "duration band");
label_impls!(Gender, "gender");

// ── Severity ─────────────────────────────────────────────────────────────────

/// Self-reported severity on a 1..=10 scale. 5 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const NEUTRAL: Severity = Severity(5);

    pub fn new(value: u8) -> CarePathResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CarePathError::InvalidRequest {
                reason: format!("severity must be between 1 and 10, got {value}"),
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Severity {
    type Error = CarePathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

// ── PathwayRequest ───────────────────────────────────────────────────────────

/// Everything a caller supplies to build a care pathway.
///
/// The engine assumes the request has passed `validate()`; request handlers
/// call it before handing the request over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayRequest {
    pub symptoms: SymptomSet,
    pub age: AgeBand,
    pub gender: Gender,
    pub duration: DurationBand,
    pub severity: Severity,
}

impl PathwayRequest {
    /// Build a request from loose symptom strings, trimming each name.
    ///
    /// Duplicate names collapse into one entry.
    pub fn new<I, S>(
        symptoms: I,
        age: AgeBand,
        gender: Gender,
        duration: DurationBand,
        severity: Severity,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symptoms: symptoms.into_iter().map(|s| s.as_ref().trim().to_string()).collect(),
            age,
            gender,
            duration,
            severity,
        }
    }

    /// Enforce the request-boundary bounds on the symptom set.
    pub fn validate(&self) -> CarePathResult<()> {
        if self.symptoms.is_empty() {
            return Err(CarePathError::InvalidRequest {
                reason: "at least one symptom is required".to_string(),
            });
        }
        if self.symptoms.len() > MAX_SYMPTOMS {
            return Err(CarePathError::InvalidRequest {
                reason: format!(
                    "at most {MAX_SYMPTOMS} symptoms are accepted, got {}",
                    self.symptoms.len()
                ),
            });
        }
        for symptom in &self.symptoms {
            if symptom.trim().is_empty() {
                return Err(CarePathError::InvalidRequest {
                    reason: "symptom names must not be blank".to_string(),
                });
            }
            if symptom.chars().count() > MAX_SYMPTOM_LEN {
                return Err(CarePathError::InvalidRequest {
                    reason: format!("symptom name exceeds {MAX_SYMPTOM_LEN} characters"),
                });
            }
        }
        Ok(())
    }
}
