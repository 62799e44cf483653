//! Schema-based narrative verifier.
//!
//! `NarrativeVerifier` implements the `NarrativeValidator` trait from
//! `carepath-core`. Verification runs in two phases:
//!
//! 1. **Structural**: the payload is validated against
//!    `NarrativeSchema::json_schema` using the `jsonschema` crate.
//! 2. **Semantic**: each `VerificationRule` in `NarrativeSchema::rules` is
//!    evaluated in order. All failures are collected before returning.

use serde_json::Value;
use tracing::{debug, warn};

use carepath_contracts::verify::{
    NarrativeSchema, VerificationFailure, VerificationReport, VerificationRuleType,
};
use carepath_core::traits::NarrativeValidator;

/// Checks untrusted narrative payloads before the engine accepts them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeVerifier;

impl NarrativeVerifier {
    pub fn new() -> Self {
        Self
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Resolve a dot-notation field path against a JSON value. Missing
    /// segments and JSON `null` both resolve to `None`.
    fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
        let mut current = value;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(v) if !v.is_null() => current = v,
                _ => return None,
            }
        }
        Some(current)
    }

    /// The strings a text rule applies to: the value itself, or each string
    /// item of an array. Other types yield nothing.
    fn texts(value: &Value) -> Vec<&str> {
        match value {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn check_rule(payload: &Value, rule_type: &VerificationRuleType) -> Option<String> {
        match rule_type {
            // ── RequiredText ──────────────────────────────────────────────────
            VerificationRuleType::RequiredText { field } => {
                match Self::resolve_path(payload, field) {
                    Some(Value::String(s)) if !s.trim().is_empty() => None,
                    Some(Value::String(_)) => Some(format!("field '{field}' is blank")),
                    Some(_) => Some(format!("field '{field}' is not a string")),
                    None => Some(format!("required field '{field}' is missing or null")),
                }
            }

            // ── RequiredList ──────────────────────────────────────────────────
            VerificationRuleType::RequiredList { field } => {
                match Self::resolve_path(payload, field) {
                    Some(Value::Array(items)) if items.is_empty() => {
                        Some(format!("field '{field}' is an empty list"))
                    }
                    Some(Value::Array(items)) => {
                        let blank = items
                            .iter()
                            .any(|i| i.as_str().map_or(true, |s| s.trim().is_empty()));
                        if blank {
                            Some(format!("field '{field}' contains a blank or non-string item"))
                        } else {
                            None
                        }
                    }
                    Some(_) => Some(format!("field '{field}' is not a list")),
                    None => Some(format!("required field '{field}' is missing or null")),
                }
            }

            // ── ForbiddenPhrase ───────────────────────────────────────────────
            // Case-insensitive. An absent field has nothing to check.
            VerificationRuleType::ForbiddenPhrase { field, phrase } => {
                let needle = phrase.to_lowercase();
                let hit = Self::resolve_path(payload, field)
                    .map(Self::texts)
                    .unwrap_or_default()
                    .into_iter()
                    .any(|s| s.to_lowercase().contains(&needle));
                hit.then(|| format!("field '{field}' contains forbidden phrase '{phrase}'"))
            }

            // ── MaxLength ─────────────────────────────────────────────────────
            VerificationRuleType::MaxLength { field, max_chars } => {
                let longest = Self::resolve_path(payload, field)
                    .map(Self::texts)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0);
                (longest > *max_chars).then(|| {
                    format!("field '{field}' has {longest} characters, more than {max_chars}")
                })
            }
        }
    }
}

impl NarrativeValidator for NarrativeVerifier {
    fn validate(&self, payload: &Value, schema: &NarrativeSchema) -> VerificationReport {
        let mut failures: Vec<VerificationFailure> = Vec::new();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        if !schema.json_schema.is_null() {
            match jsonschema::validator_for(&schema.json_schema) {
                Ok(validator) => {
                    for error in validator.iter_errors(payload) {
                        let message = format!(
                            "JSON Schema violation at {}: {}",
                            error.instance_path, error
                        );
                        warn!(
                            schema_id = %schema.schema_id,
                            %message,
                            "structural validation failure"
                        );
                        failures.push(VerificationFailure {
                            rule_id: "json-schema".to_string(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    let message = format!("invalid JSON Schema document: {e}");
                    warn!(schema_id = %schema.schema_id, %message, "schema compilation failure");
                    failures.push(VerificationFailure {
                        rule_id: "json-schema".to_string(),
                        message,
                    });
                }
            }
        }

        // ── Phase 2: Semantic rule evaluation ────────────────────────────────
        for rule in &schema.rules {
            debug!(rule_id = %rule.rule_id, "evaluating verification rule");

            if let Some(message) = Self::check_rule(payload, &rule.rule_type) {
                warn!(rule_id = %rule.rule_id, %message, "semantic rule failed");
                failures.push(VerificationFailure {
                    rule_id: rule.rule_id.clone(),
                    message,
                });
            }
        }

        let report = VerificationReport::from_failures(failures);
        debug!(
            schema_id = %schema.schema_id,
            passed = report.passed,
            failure_count = report.failures.len(),
            "verification complete"
        );
        report
    }
}
