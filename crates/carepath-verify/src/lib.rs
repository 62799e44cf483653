//! # carepath-verify
//!
//! Trusted validation of untrusted narrative output.
//!
//! [`NarrativeVerifier`] implements the
//! [`NarrativeValidator`](carepath_core::traits::NarrativeValidator) trait.
//! A payload passes only if it satisfies the schema's JSON Schema document
//! and every semantic rule; the report lists every failure found.
//!
//! ```rust,ignore
//! use carepath_core::narrative::{narrative_schema, NarrativeResolver};
//! use carepath_verify::NarrativeVerifier;
//!
//! let resolver = NarrativeResolver::new(Box::new(NarrativeVerifier::new()), timeout);
//! ```

pub mod engine;

pub use engine::NarrativeVerifier;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use carepath_contracts::verify::{NarrativeSchema, VerificationRule, VerificationRuleType};
    use carepath_core::{narrative::narrative_schema, traits::NarrativeValidator};

    use super::NarrativeVerifier;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn schema_with(rules: Vec<VerificationRule>) -> NarrativeSchema {
        NarrativeSchema {
            schema_id: "test".to_string(),
            json_schema: Value::Null,
            rules,
        }
    }

    fn rule(rule_id: &str, rule_type: VerificationRuleType) -> VerificationRule {
        VerificationRule {
            rule_id: rule_id.to_string(),
            description: "test rule".to_string(),
            rule_type,
        }
    }

    fn good_narrative() -> Value {
        json!({
            "symptomExplanation": "These symptoms are commonly linked to a mild viral infection.",
            "personalizedAdvice": "Rest, drink plenty of fluids, and keep track of how you feel.",
            "recoveryTimeline": "Most people feel better within 3 to 7 days.",
            "seekHelpIf": ["Symptoms last longer than a week", "You have trouble breathing"]
        })
    }

    fn check(payload: &Value, schema: &NarrativeSchema) -> Vec<String> {
        let report = NarrativeVerifier::new().validate(payload, schema);
        assert_eq!(report.passed, report.failures.is_empty());
        report.failures.into_iter().map(|f| f.rule_id).collect()
    }

    // ── Structural ────────────────────────────────────────────────────────────

    #[test]
    fn test_good_narrative_passes_standard_schema() {
        let report = NarrativeVerifier::new().validate(&good_narrative(), &narrative_schema());
        assert!(report.passed, "unexpected failures: {:?}", report.summaries());
    }

    #[test]
    fn test_missing_field_fails_structurally_and_semantically() {
        let mut payload = good_narrative();
        payload.as_object_mut().unwrap().remove("recoveryTimeline");

        let failed = check(&payload, &narrative_schema());
        assert!(failed.iter().any(|r| r == "json-schema"), "got {failed:?}");
        assert!(failed.iter().any(|r| r == "req-recoveryTimeline"), "got {failed:?}");
    }

    #[test]
    fn test_wrong_type_fails_json_schema() {
        let mut payload = good_narrative();
        payload["seekHelpIf"] = json!("just one string");
        let failed = check(&payload, &narrative_schema());
        assert!(failed.iter().any(|r| r == "json-schema"));
    }

    #[test]
    fn test_non_object_payload_fails() {
        let report = NarrativeVerifier::new().validate(&json!([1, 2, 3]), &narrative_schema());
        assert!(!report.passed);
    }

    #[test]
    fn test_null_json_schema_skips_structural_phase() {
        assert!(check(&json!({}), &schema_with(vec![])).is_empty());
    }

    #[test]
    fn test_invalid_schema_document_is_a_failure() {
        let schema = NarrativeSchema {
            schema_id: "broken".to_string(),
            json_schema: json!({ "type": 42 }),
            rules: vec![],
        };
        assert_eq!(check(&good_narrative(), &schema), vec!["json-schema".to_string()]);
    }

    // ── Semantic rules ────────────────────────────────────────────────────────

    #[test]
    fn test_required_text_rejects_blank() {
        let schema = schema_with(vec![rule(
            "req",
            VerificationRuleType::RequiredText { field: "personalizedAdvice".to_string() },
        )]);
        let mut payload = good_narrative();
        payload["personalizedAdvice"] = json!("   ");
        assert_eq!(check(&payload, &schema), vec!["req".to_string()]);
    }

    #[test]
    fn test_required_list_rejects_empty_and_blank_items() {
        let schema = schema_with(vec![rule(
            "list",
            VerificationRuleType::RequiredList { field: "seekHelpIf".to_string() },
        )]);

        let mut empty = good_narrative();
        empty["seekHelpIf"] = json!([]);
        assert_eq!(check(&empty, &schema), vec!["list".to_string()]);

        let mut blank = good_narrative();
        blank["seekHelpIf"] = json!(["Call a doctor", ""]);
        assert_eq!(check(&blank, &schema), vec!["list".to_string()]);
    }

    #[test]
    fn test_forbidden_phrase_is_case_insensitive() {
        let mut payload = good_narrative();
        payload["symptomExplanation"] = json!("Your Diagnosis Is influenza.");
        let failed = check(&payload, &narrative_schema());
        assert_eq!(failed, vec!["no-diagnosis-symptomExplanation-1".to_string()]);
    }

    #[test]
    fn test_forbidden_phrase_checks_list_items() {
        let mut payload = good_narrative();
        payload["seekHelpIf"] = json!(["I prescribe antibiotics"]);
        let failed = check(&payload, &narrative_schema());
        assert_eq!(failed, vec!["no-diagnosis-seekHelpIf-2".to_string()]);
    }

    #[test]
    fn test_max_length_counts_characters() {
        let schema = schema_with(vec![rule(
            "len",
            VerificationRuleType::MaxLength {
                field: "recoveryTimeline".to_string(),
                max_chars: 5,
            },
        )]);
        let mut payload = good_narrative();
        payload["recoveryTimeline"] = json!("ééééé");
        assert!(check(&payload, &schema).is_empty());

        payload["recoveryTimeline"] = json!("ééééék");
        assert_eq!(check(&payload, &schema), vec!["len".to_string()]);
    }

    #[test]
    fn test_all_failures_are_collected() {
        let payload = json!({
            "symptomExplanation": "",
            "personalizedAdvice": "",
            "recoveryTimeline": "",
            "seekHelpIf": []
        });
        let report = NarrativeVerifier::new().validate(&payload, &narrative_schema());
        assert!(!report.passed);
        assert!(report.failures.len() >= 4);
        assert!(report.summaries().iter().all(|s| s.starts_with('[')));
    }
}
