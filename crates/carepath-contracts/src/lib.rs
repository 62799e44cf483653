//! # carepath-contracts
//!
//! Shared types and contracts for the carepath engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, the request-boundary checks, and error
//! types.

pub mod config;
pub mod error;
pub mod medicine;
pub mod narrative;
pub mod pathway;
pub mod request;
pub mod urgency;
pub mod verify;

#[cfg(test)]
mod tests {
    use super::*;
    use error::{CarePathError, NarrativeError};
    use request::{AgeBand, DurationBand, Gender, PathwayRequest, Severity};
    use urgency::{UrgencyAssessment, UrgencyLevel};

    fn request(symptoms: &[&str]) -> PathwayRequest {
        PathwayRequest::new(
            symptoms.iter().copied(),
            AgeBand::From31To45,
            Gender::Female,
            DurationBand::OneToThreeDays,
            Severity::NEUTRAL,
        )
    }

    // ── UrgencyLevel thresholds ──────────────────────────────────────────────

    #[test]
    fn level_is_a_step_function_of_score() {
        assert_eq!(UrgencyLevel::from_score(10.0), UrgencyLevel::Emergency);
        assert_eq!(UrgencyLevel::from_score(8.0), UrgencyLevel::Emergency);
        assert_eq!(UrgencyLevel::from_score(7.99), UrgencyLevel::High);
        assert_eq!(UrgencyLevel::from_score(6.0), UrgencyLevel::High);
        assert_eq!(UrgencyLevel::from_score(5.99), UrgencyLevel::Moderate);
        assert_eq!(UrgencyLevel::from_score(4.0), UrgencyLevel::Moderate);
        assert_eq!(UrgencyLevel::from_score(3.99), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(0.0), UrgencyLevel::Low);
    }

    #[test]
    fn assessment_clamps_score() {
        let high = UrgencyAssessment::from_score(14.2, vec![]);
        assert_eq!(high.score, 10.0);
        assert_eq!(high.level, UrgencyLevel::Emergency);

        let negative = UrgencyAssessment::from_score(-3.0, vec![]);
        assert_eq!(negative.score, 0.0);
        assert_eq!(negative.level, UrgencyLevel::Low);

        let nan = UrgencyAssessment::from_score(f64::NAN, vec![]);
        assert_eq!(nan.score, 0.0);
    }

    #[test]
    fn emergency_override_is_pinned() {
        let a = UrgencyAssessment::emergency_override();
        assert_eq!(a.score, 10.0);
        assert_eq!(a.level, UrgencyLevel::Emergency);
        assert_eq!(a.factors, vec!["Emergency condition detected".to_string()]);
    }

    // ── Bands ────────────────────────────────────────────────────────────────

    #[test]
    fn bands_parse_from_table_labels() {
        assert_eq!("Under 18".parse::<AgeBand>().unwrap(), AgeBand::Under18);
        assert_eq!("over 75".parse::<AgeBand>().unwrap(), AgeBand::Over75);
        assert_eq!("2+ weeks".parse::<DurationBand>().unwrap(), DurationBand::MoreThanTwoWeeks);
        assert_eq!(" Female ".parse::<Gender>().unwrap(), Gender::Female);
    }

    #[test]
    fn unknown_band_lists_the_choices() {
        let err = "toddler".parse::<AgeBand>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown age band 'toddler'"), "got: {msg}");
        assert!(msg.contains("61-75"), "got: {msg}");
    }

    #[test]
    fn bands_serialize_as_labels() {
        let json = serde_json::to_string(&DurationBand::LessThan24Hours).unwrap();
        assert_eq!(json, "\"Less than 24 hours\"");
        let age: AgeBand = serde_json::from_str("\"61-75\"").unwrap();
        assert_eq!(age, AgeBand::From61To75);
        assert!(age.is_senior());
        assert!(!age.is_minor());
    }

    // ── Severity ─────────────────────────────────────────────────────────────

    #[test]
    fn severity_accepts_one_through_ten_only() {
        assert!(Severity::new(0).is_err());
        assert!(Severity::new(11).is_err());
        assert_eq!(Severity::new(1).unwrap().get(), 1);
        assert_eq!(Severity::new(10).unwrap().get(), 10);
    }

    #[test]
    fn severity_deserialization_goes_through_bounds_check() {
        assert!(serde_json::from_str::<Severity>("7").is_ok());
        assert!(serde_json::from_str::<Severity>("12").is_err());
    }

    // ── PathwayRequest ───────────────────────────────────────────────────────

    #[test]
    fn request_trims_and_deduplicates_symptoms() {
        let r = request(&[" Fever", "Fever ", "Cough"]);
        assert_eq!(r.symptoms.len(), 2);
        assert!(r.symptoms.contains("Fever"));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn request_without_symptoms_is_rejected() {
        let r = request(&[]);
        match r.validate() {
            Err(CarePathError::InvalidRequest { reason }) => {
                assert!(reason.contains("at least one symptom"), "got: {reason}");
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn request_with_too_many_or_too_long_symptoms_is_rejected() {
        let many: Vec<String> = (0..21).map(|i| format!("Symptom {i}")).collect();
        let r = PathwayRequest::new(
            many,
            AgeBand::From18To30,
            Gender::Male,
            DurationBand::OneToThreeDays,
            Severity::NEUTRAL,
        );
        assert!(r.validate().is_err());

        let long = "x".repeat(101);
        assert!(request(&[long.as_str()]).validate().is_err());
        assert!(request(&["   "]).validate().is_err());
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_messages_carry_reason() {
        let err = CarePathError::RuleTable {
            reason: "duplicate rule for 'Fever'".to_string(),
        };
        assert!(err.to_string().contains("rule table error"));
        assert!(err.to_string().contains("Fever"));

        let err = CarePathError::ReferenceData {
            reason: "unknown medicine id 'zzz'".to_string(),
        };
        assert!(err.to_string().contains("reference data error"));
    }

    #[test]
    fn narrative_rejection_joins_failures() {
        let err = NarrativeError::Rejected {
            failures: vec!["[a] one".to_string(), "[b] two".to_string()],
        };
        assert_eq!(err.to_string(), "narrative response rejected: [a] one; [b] two");

        let err = NarrativeError::Timeout { timeout_ms: 250 };
        assert!(err.to_string().contains("250 ms"));
    }

    // ── Prompt ───────────────────────────────────────────────────────────────

    #[test]
    fn prompt_mentions_every_input_and_the_guardrail() {
        let r = request(&["Fever", "Cough"]);
        let text = narrative::NarrativePrompt::new(&r, UrgencyLevel::Moderate).render();
        assert!(text.contains("Cough, Fever"));
        assert!(text.contains("31-45"));
        assert!(text.contains("Female"));
        assert!(text.contains("1-3 days"));
        assert!(text.contains("5/10"));
        assert!(text.contains("moderate"));
        assert!(text.contains("never diagnose"));
        assert!(text.contains("\"seekHelpIf\""));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: config::EngineConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.narrative.enabled);
        assert_eq!(cfg.narrative.timeout_ms, 8_000);
        assert_eq!(cfg.recommendations.max_medicine_warnings, 2);
        assert!(cfg.data.rules_path.is_none());
    }
}
