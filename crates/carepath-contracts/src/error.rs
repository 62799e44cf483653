//! Error types for the carepath engine.
//!
//! Loading and boundary checks return `CarePathResult<T>`. The engine's
//! request path itself is total; only configuration and input validation can
//! fail. Narrative collaborator failures have their own type, `NarrativeError`,
//! because they are always recovered from and never surfaced to callers.

use thiserror::Error;

/// The unified error type for the carepath workspace.
#[derive(Debug, Error)]
pub enum CarePathError {
    /// The request failed boundary validation (symptom count, names, severity).
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The symptom severity rule table could not be loaded or is inconsistent.
    #[error("rule table error: {reason}")]
    RuleTable { reason: String },

    /// The medicine / remedy reference tables could not be loaded or are inconsistent.
    #[error("reference data error: {reason}")]
    ReferenceData { reason: String },
}

/// Convenience alias used throughout the carepath crates.
pub type CarePathResult<T> = Result<T, CarePathError>;

/// Why the narrative collaborator's output was not used.
///
/// Every variant leads to the deterministic fallback narrative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    /// No collaborator is configured, or it is disabled.
    #[error("narrative generator unavailable")]
    Unavailable,

    /// The collaborator did not answer within the configured budget.
    #[error("narrative generator timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The collaborator reported an error or died before answering.
    #[error("narrative generator failed: {reason}")]
    Transport { reason: String },

    /// The response was not parseable JSON of the expected shape.
    #[error("narrative response malformed: {reason}")]
    Malformed { reason: String },

    /// The response parsed but failed one or more validation rules.
    #[error("narrative response rejected: {}", failures.join("; "))]
    Rejected { failures: Vec<String> },
}
