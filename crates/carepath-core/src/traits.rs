//! Trait seams of the care pathway engine.
//!
//! - `UrgencyScorer`: trusted, pure scoring of a symptom profile
//! - `ReferenceStore`: read-only medicine / remedy tables
//! - `NarrativeGenerator`: untrusted text generation (may be backed by an LLM)
//! - `NarrativeValidator`: trusted checker for generator output
//!
//! The engine wires them together. Generator output never reaches a
//! `CarePathway` unless the validator passes it.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::Value;

use carepath_contracts::{
    error::NarrativeError,
    medicine::{HomeCareRemedy, Medicine, NaturalRemedy},
    narrative::NarrativePrompt,
    request::{AgeBand, DurationBand, Severity, SymptomSet},
    urgency::UrgencyAssessment,
    verify::{NarrativeSchema, VerificationReport},
};

/// Inputs to a single scoring call.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub symptoms: &'a SymptomSet,
    pub age: AgeBand,
    pub duration: DurationBand,
    pub severity: Severity,
    /// Symptoms that short-circuit to an emergency, from the reference store.
    pub emergency_conditions: &'a BTreeSet<String>,
}

/// Computes a 0-10 urgency score and level for a symptom profile.
///
/// Implementations must be deterministic and total: every symptom name
/// resolves to some rule, and no input that passed request validation may
/// cause a failure.
pub trait UrgencyScorer: Send + Sync {
    fn assess(&self, input: &ScoringInput<'_>) -> UrgencyAssessment;
}

/// Read-only reference tables. Safe for unsynchronised concurrent reads.
///
/// Lookups for unknown symptoms return empty lists rather than failing.
pub trait ReferenceStore: Send + Sync {
    fn medicines_for_symptom(&self, symptom: &str) -> Vec<String>;
    fn home_care_for_symptom(&self, symptom: &str) -> Vec<String>;
    fn natural_remedies_for_symptom(&self, symptom: &str) -> Vec<String>;

    fn medicine(&self, id: &str) -> Option<Medicine>;
    fn home_care(&self, id: &str) -> Option<HomeCareRemedy>;
    fn natural_remedy(&self, id: &str) -> Option<NaturalRemedy>;

    /// The fixed set of symptom names that force an emergency assessment.
    fn emergency_conditions(&self) -> &BTreeSet<String>;
}

/// An external text generator producing the four narrative fields.
///
/// Implementations are **untrusted**. They return the raw response text; the
/// engine parses and validates it. A single attempt is made per pathway.
///
/// The call runs on the caller's thread. Implementations must give up once
/// `timeout` has elapsed (for example with a client-level request timeout)
/// and return `NarrativeError::Timeout`; no work may outlive the call.
pub trait NarrativeGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &NarrativePrompt,
        timeout: Duration,
    ) -> Result<String, NarrativeError>;
}

/// Validates an untrusted narrative payload before the engine accepts it.
pub trait NarrativeValidator: Send + Sync {
    fn validate(&self, payload: &Value, schema: &NarrativeSchema) -> VerificationReport;
}
