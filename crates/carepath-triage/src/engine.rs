//! TOML-driven urgency scorer.
//!
//! `TomlUrgencyScorer` loads a `RuleTable` from a TOML string or file and
//! implements the `UrgencyScorer` trait from carepath-core.
//!
//! Scoring algorithm:
//!
//! 1. Any symptom in the emergency set → score 10, `Emergency`, nothing else runs.
//! 2. Per symptom: resolve its rule (exact match, else the default rule) and
//!    compute `base + duration bonus + age bonus`. A bonus above 1 records a factor.
//! 3. Multiply by every combination rule of that symptom whose required
//!    symptoms are all present.
//! 4. Take the maximum over symptoms. The worst single symptom dominates.
//! 5. Scale by `1 + (severity - neutral) * step`.
//! 6. More than `multi_symptom_threshold` symptoms → scale by the multi-symptom multiplier.
//! 7. Clamp to [0, 10] and map to a level.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use carepath_contracts::{
    error::{CarePathError, CarePathResult},
    urgency::UrgencyAssessment,
};
use carepath_core::traits::{ScoringInput, UrgencyScorer};

use crate::rule::{ResolvedRule, RuleTable};

/// The severity rule table compiled into the crate.
pub const EMBEDDED_RULES: &str = include_str!("../rules/severity.toml");

/// An `UrgencyScorer` backed by a TOML rule table.
///
/// ```rust,ignore
/// use carepath_triage::TomlUrgencyScorer;
///
/// let scorer = TomlUrgencyScorer::from_file(Path::new("rules/severity.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlUrgencyScorer {
    table: RuleTable,
    index: HashMap<String, usize>,
}

impl TomlUrgencyScorer {
    /// Build a scorer from an already-parsed table, validating it first.
    pub fn from_table(table: RuleTable) -> CarePathResult<Self> {
        table.validate()?;
        let index = table
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.symptom.clone(), i))
            .collect();
        Ok(Self { table, index })
    }

    /// Parse `s` as a TOML rule table.
    ///
    /// Returns `CarePathError::RuleTable` if the TOML is malformed, does not
    /// match the `RuleTable` schema, or fails validation.
    pub fn from_toml_str(s: &str) -> CarePathResult<Self> {
        let table: RuleTable = toml::from_str(s).map_err(|e| CarePathError::RuleTable {
            reason: format!("failed to parse severity rule TOML: {}", e),
        })?;
        Self::from_table(table)
    }

    /// Read and parse the rule table at `path`.
    pub fn from_file(path: &Path) -> CarePathResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CarePathError::ConfigError {
            reason: format!("failed to read rule file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The rule table shipped with the crate.
    pub fn embedded() -> CarePathResult<Self> {
        Self::from_toml_str(EMBEDDED_RULES)
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Exact match, else the default rule under `symptom`'s name.
    pub fn resolve<'a>(&'a self, symptom: &'a str) -> ResolvedRule<'a> {
        match self.index.get(symptom) {
            Some(&i) => ResolvedRule::Explicit(&self.table.rules[i]),
            None => ResolvedRule::Default {
                symptom,
                rule: &self.table.default,
            },
        }
    }
}

impl UrgencyScorer for TomlUrgencyScorer {
    fn assess(&self, input: &ScoringInput<'_>) -> UrgencyAssessment {
        if let Some(hit) = input
            .symptoms
            .iter()
            .find(|s| input.emergency_conditions.contains(*s))
        {
            info!(symptom = %hit, "emergency condition present; overriding score");
            return UrgencyAssessment::emergency_override();
        }

        let scoring = &self.table.scoring;
        let mut factors = Vec::new();
        let mut worst: f64 = 0.0;

        for symptom in input.symptoms {
            let rule = self.resolve(symptom);
            let escalation = rule.escalation();
            let duration_bonus = escalation.duration_bonus(input.duration);
            let age_bonus = escalation.age_bonus(input.age);

            let mut score = rule.base_severity() + duration_bonus + age_bonus;

            if duration_bonus > 1.0 {
                factors.push(format!(
                    "{symptom} lasting {} (+{duration_bonus})",
                    input.duration
                ));
            }
            if age_bonus > 1.0 {
                factors.push(format!("{symptom} in age group {} (+{age_bonus})", input.age));
            }

            for combo in rule.combinations() {
                if combo.fires_for(input.symptoms) {
                    score *= combo.multiplier;
                    let partners = combo.partners(symptom).collect::<Vec<_>>().join(", ");
                    factors.push(format!(
                        "{symptom} together with {partners} (x{})",
                        combo.multiplier
                    ));
                }
            }

            debug!(
                symptom = %symptom,
                default_rule = rule.is_default(),
                score,
                "symptom scored"
            );

            worst = worst.max(score);
        }

        let severity = f64::from(input.severity.get());
        let mut raw = worst * (1.0 + (severity - scoring.neutral_severity) * scoring.severity_step);

        if input.symptoms.len() > scoring.multi_symptom_threshold {
            raw *= scoring.multi_symptom_multiplier;
            factors.push(format!(
                "Multiple symptoms present ({})",
                input.symptoms.len()
            ));
        }

        let assessment = UrgencyAssessment::from_score(raw, factors);
        debug!(
            score = assessment.score,
            level = %assessment.level,
            "urgency assessed"
        );
        assessment
    }
}
