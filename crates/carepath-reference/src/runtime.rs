//! Runtime wiring: configuration loading and engine construction.
//!
//! Every binary builds its engine here so the scorer, reference store,
//! verifier and optional narrative generator are always combined the same way.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use carepath_contracts::{
    config::EngineConfig,
    error::{CarePathError, CarePathResult},
};
use carepath_core::{narrative::NarrativeResolver, traits::NarrativeGenerator, CarePathwayEngine};
use carepath_triage::TomlUrgencyScorer;
use carepath_verify::NarrativeVerifier;

use crate::store::TomlReferenceStore;

/// Parse an engine configuration from TOML. Missing sections take defaults.
pub fn parse_config(s: &str) -> CarePathResult<EngineConfig> {
    toml::from_str(s).map_err(|e| CarePathError::ConfigError {
        reason: format!("failed to parse engine config TOML: {}", e),
    })
}

/// Read and parse the engine configuration file at `path`.
pub fn load_config(path: &Path) -> CarePathResult<EngineConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| CarePathError::ConfigError {
        reason: format!("failed to read config file '{}': {}", path.display(), e),
    })?;
    parse_config(&contents)
}

/// Build an engine from `config`.
///
/// Rule and reference tables come from the configured paths when set, else
/// the embedded defaults. `generator` is attached only when narrative
/// generation is enabled; otherwise every pathway uses the fallback narrative.
pub fn build_engine(
    config: &EngineConfig,
    generator: Option<Arc<dyn NarrativeGenerator>>,
) -> CarePathResult<CarePathwayEngine> {
    if config.narrative.timeout_ms == 0 {
        return Err(CarePathError::ConfigError {
            reason: "narrative.timeout_ms must be greater than 0".to_string(),
        });
    }

    let scorer = match &config.data.rules_path {
        Some(path) => TomlUrgencyScorer::from_file(path)?,
        None => TomlUrgencyScorer::embedded()?,
    };
    let reference = match &config.data.reference_path {
        Some(path) => TomlReferenceStore::from_file(path)?,
        None => TomlReferenceStore::embedded()?,
    };

    let mut resolver = NarrativeResolver::new(
        Box::new(NarrativeVerifier::new()),
        Duration::from_millis(config.narrative.timeout_ms),
    );
    match generator {
        Some(g) if config.narrative.enabled => resolver = resolver.with_generator(g),
        Some(_) => warn!("narrative generation disabled by config; ignoring generator"),
        None => {}
    }

    info!(
        rules = scorer.table().rules.len(),
        narrative_generator = resolver.has_generator(),
        timeout_ms = config.narrative.timeout_ms,
        "care pathway engine ready"
    );

    Ok(CarePathwayEngine::new(
        Box::new(scorer),
        Box::new(reference),
        resolver,
        config.recommendations.clone(),
    ))
}
