//! Engine configuration.
//!
//! Every field has a default so an empty TOML document is a valid config.
//!
//! ```toml
//! [narrative]
//! enabled = true
//! timeout_ms = 8000
//!
//! [recommendations]
//! max_medicine_warnings = 2
//! max_precautions = 6
//!
//! [data]
//! rules_path = "rules/severity.toml"
//! reference_path = "data/reference.toml"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub narrative: NarrativeConfig,
    pub recommendations: RecommendationConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// When false the generator is never called and the fallback is used.
    pub enabled: bool,
    /// Budget for a single generator call. There are no retries.
    pub timeout_ms: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 8_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// How many of a medicine's own warnings are appended to its precautions.
    pub max_medicine_warnings: usize,
    /// Upper bound on `user_precautions` length.
    pub max_precautions: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_medicine_warnings: 2,
            max_precautions: 6,
        }
    }
}

/// Optional on-disk overrides for the embedded tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub rules_path: Option<PathBuf>,
    pub reference_path: Option<PathBuf>,
}
