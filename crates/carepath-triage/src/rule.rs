//! Severity rule types and the rule-table schema.
//!
//! A `RuleTable` is deserialized from TOML and holds one `SymptomSeverityRule`
//! per named symptom plus a `DefaultRule` used for any symptom without an
//! explicit entry. Resolution is exact-match-or-default and always succeeds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use carepath_contracts::{
    error::{CarePathError, CarePathResult},
    request::{AgeBand, DurationBand, SymptomSet},
};

/// Multiplies a symptom's score when every listed symptom is present.
///
/// Example in TOML:
/// ```toml
/// [[rules.combinations]]
/// required_symptoms = ["Fever", "Stiff Neck"]
/// multiplier = 1.8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub required_symptoms: Vec<String>,
    /// Must be greater than 1.
    pub multiplier: f64,
}

impl CombinationRule {
    /// True if every required symptom is in `symptoms`.
    pub fn fires_for(&self, symptoms: &SymptomSet) -> bool {
        self.required_symptoms.iter().all(|s| symptoms.contains(s))
    }

    /// The required symptoms other than `symptom`, for factor text.
    pub fn partners<'a>(&'a self, symptom: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.required_symptoms
            .iter()
            .map(String::as_str)
            .filter(move |s| *s != symptom)
    }
}

/// Escalation tables keyed by band label. A missing label adds nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    #[serde(default)]
    pub duration_escalation: BTreeMap<String, f64>,
    #[serde(default)]
    pub age_escalation: BTreeMap<String, f64>,
}

impl Escalation {
    pub fn duration_bonus(&self, duration: DurationBand) -> f64 {
        self.duration_escalation.get(duration.label()).copied().unwrap_or(0.0)
    }

    pub fn age_bonus(&self, age: AgeBand) -> f64 {
        self.age_escalation.get(age.label()).copied().unwrap_or(0.0)
    }
}

/// The rule for one named symptom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomSeverityRule {
    /// Exact symptom name; unique within a table.
    pub symptom: String,
    /// Starting contribution in [0, 10].
    pub base_severity: f64,
    #[serde(flatten)]
    pub escalation: Escalation,
    /// Evaluated in declaration order; every firing rule multiplies.
    #[serde(default)]
    pub combinations: Vec<CombinationRule>,
}

/// Applied to any symptom without its own rule. Has no combinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultRule {
    pub base_severity: f64,
    #[serde(flatten)]
    pub escalation: Escalation,
}

/// Arithmetic knobs shared by every rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Self-reported severity that leaves the score unchanged.
    pub neutral_severity: f64,
    /// Fractional score shift per severity point away from neutral.
    pub severity_step: f64,
    /// More than this many symptoms applies `multi_symptom_multiplier`.
    pub multi_symptom_threshold: usize,
    pub multi_symptom_multiplier: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            neutral_severity: 5.0,
            severity_step: 0.1,
            multi_symptom_threshold: 3,
            multi_symptom_multiplier: 1.2,
        }
    }
}

/// The top-level structure deserialized from a severity rule file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub default: DefaultRule,
    #[serde(default)]
    pub rules: Vec<SymptomSeverityRule>,
}

/// The outcome of resolving a symptom name against a table.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedRule<'a> {
    Explicit(&'a SymptomSeverityRule),
    /// No explicit rule exists; the default applies under this symptom's name.
    Default { symptom: &'a str, rule: &'a DefaultRule },
}

impl<'a> ResolvedRule<'a> {
    pub fn symptom(&self) -> &'a str {
        match *self {
            ResolvedRule::Explicit(r) => r.symptom.as_str(),
            ResolvedRule::Default { symptom, .. } => symptom,
        }
    }

    pub fn base_severity(&self) -> f64 {
        match *self {
            ResolvedRule::Explicit(r) => r.base_severity,
            ResolvedRule::Default { rule, .. } => rule.base_severity,
        }
    }

    pub fn escalation(&self) -> &'a Escalation {
        match *self {
            ResolvedRule::Explicit(r) => &r.escalation,
            ResolvedRule::Default { rule, .. } => &rule.escalation,
        }
    }

    pub fn combinations(&self) -> &'a [CombinationRule] {
        match *self {
            ResolvedRule::Explicit(r) => &r.combinations,
            ResolvedRule::Default { .. } => &[],
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ResolvedRule::Default { .. })
    }
}

fn rule_error(reason: String) -> CarePathError {
    CarePathError::RuleTable { reason }
}

fn check_escalation(owner: &str, escalation: &Escalation) -> CarePathResult<()> {
    for (label, bonus) in &escalation.duration_escalation {
        if !DurationBand::ALL.iter().any(|d| d.label() == label) {
            return Err(rule_error(format!(
                "rule '{owner}' has unknown duration band '{label}'"
            )));
        }
        if !bonus.is_finite() || *bonus < 0.0 {
            return Err(rule_error(format!(
                "rule '{owner}' has invalid duration bonus {bonus} for '{label}'"
            )));
        }
    }
    for (label, bonus) in &escalation.age_escalation {
        if !AgeBand::ALL.iter().any(|a| a.label() == label) {
            return Err(rule_error(format!("rule '{owner}' has unknown age band '{label}'")));
        }
        if !bonus.is_finite() || *bonus < 0.0 {
            return Err(rule_error(format!(
                "rule '{owner}' has invalid age bonus {bonus} for '{label}'"
            )));
        }
    }
    Ok(())
}

fn check_base(owner: &str, base: f64) -> CarePathResult<()> {
    if !(0.0..=10.0).contains(&base) {
        return Err(rule_error(format!(
            "rule '{owner}' has base severity {base} outside [0, 10]"
        )));
    }
    Ok(())
}

impl RuleTable {
    /// Check the table for the invariants the scorer relies on.
    pub fn validate(&self) -> CarePathResult<()> {
        let s = &self.scoring;
        if !(1.0..=10.0).contains(&s.neutral_severity) {
            return Err(rule_error(format!(
                "neutral_severity {} outside [1, 10]",
                s.neutral_severity
            )));
        }
        // Severity 1 must still leave a positive multiplier.
        let floor = 1.0 + (1.0 - s.neutral_severity) * s.severity_step;
        if !s.severity_step.is_finite() || s.severity_step < 0.0 || floor <= 0.0 {
            return Err(rule_error(format!(
                "severity_step {} is negative or drives the severity multiplier to {floor}",
                s.severity_step
            )));
        }
        if s.multi_symptom_multiplier < 1.0 {
            return Err(rule_error(format!(
                "multi_symptom_multiplier {} must be at least 1",
                s.multi_symptom_multiplier
            )));
        }

        check_base("default", self.default.base_severity)?;
        check_escalation("default", &self.default.escalation)?;

        let mut seen = std::collections::BTreeSet::new();
        for rule in &self.rules {
            if rule.symptom.trim().is_empty() {
                return Err(rule_error("rule with empty symptom name".to_string()));
            }
            if !seen.insert(rule.symptom.as_str()) {
                return Err(rule_error(format!("duplicate rule for symptom '{}'", rule.symptom)));
            }
            check_base(&rule.symptom, rule.base_severity)?;
            check_escalation(&rule.symptom, &rule.escalation)?;
            for combo in &rule.combinations {
                if combo.required_symptoms.is_empty() {
                    return Err(rule_error(format!(
                        "rule '{}' has a combination with no required symptoms",
                        rule.symptom
                    )));
                }
                if !(combo.multiplier > 1.0) || !combo.multiplier.is_finite() {
                    return Err(rule_error(format!(
                        "rule '{}' has combination multiplier {} which must be greater than 1",
                        rule.symptom, combo.multiplier
                    )));
                }
            }
        }
        Ok(())
    }
}
