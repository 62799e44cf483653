//! Validation schema and report types for untrusted narrative output.
//!
//! A generative collaborator's response is checked against a
//! `NarrativeSchema` before the engine accepts it. Anything other than a
//! passing `VerificationReport` sends the resolver to its fallback.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structural and semantic rules a narrative payload must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSchema {
    /// e.g. "narrative-v1".
    pub schema_id: String,
    /// JSON Schema document for structural validation. `null` skips the phase.
    pub json_schema: Value,
    pub rules: Vec<VerificationRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Referenced in failure reports.
    pub rule_id: String,
    pub description: String,
    pub rule_type: VerificationRuleType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// The field must be a string with non-whitespace content.
    RequiredText { field: String },

    /// The field must be a non-empty array whose items are all non-blank strings.
    RequiredList { field: String },

    /// No string in the field (or in its array items) may contain `phrase`,
    /// compared case-insensitively.
    ForbiddenPhrase { field: String, phrase: String },

    /// The field's string value (or each array item) must not exceed `max_chars`.
    MaxLength { field: String, max_chars: usize },
}

/// The result of running every rule in a `NarrativeSchema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every rule passed.
    pub passed: bool,
    /// Every failure found; empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// `"[rule] message"` strings, one per failure.
    pub fn summaries(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}
