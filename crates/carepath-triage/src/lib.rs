//! # carepath-triage
//!
//! A TOML-driven urgency scorer for the carepath engine.
//!
//! ## Overview
//!
//! This crate provides [`TomlUrgencyScorer`], which implements the
//! [`UrgencyScorer`](carepath_core::traits::UrgencyScorer) trait. Severity
//! rules are declared per symptom in a TOML file; symptoms without a rule fall
//! back to the table's default rule, so scoring never fails.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use carepath_triage::TomlUrgencyScorer;
//!
//! let scorer = TomlUrgencyScorer::embedded()?;
//! // Pass `scorer` to `carepath_core::CarePathwayEngine::new(...)`.
//! ```
//!
//! ## Rule table
//!
//! Each rule carries a base severity, escalation bonuses keyed by duration
//! and age band labels, and combination multipliers that fire when every
//! required symptom is present. The `[scoring]` table holds the severity and
//! multi-symptom knobs.

pub mod engine;
pub mod rule;

pub use engine::{TomlUrgencyScorer, EMBEDDED_RULES};
pub use rule::{
    CombinationRule, DefaultRule, Escalation, ResolvedRule, RuleTable, ScoringConfig,
    SymptomSeverityRule,
};

// ── Tests ─────────────────────────────────────────────────────────────────────
