//! # carepath-reference
//!
//! Reference data and runtime wiring for the carepath engine.
//!
//! 1. **Reference store**: [`TomlReferenceStore`] holds the medicine,
//!    home-care and natural-remedy tables, the symptom mappings, and the
//!    emergency condition list. The default tables are embedded; a file path
//!    in the engine config overrides them.
//! 2. **Runtime**: [`build_engine`] combines the TOML urgency scorer, the
//!    reference store, the narrative verifier and an optional narrative
//!    generator into a ready `CarePathwayEngine`.
//!
//! All data is fictional reference material and is not medical advice.

pub mod runtime;
pub mod store;

pub use runtime::{build_engine, load_config, parse_config};
pub use store::{ReferenceData, SymptomMapping, TomlReferenceStore, EMBEDDED_REFERENCE};

// ── Tests ─────────────────────────────────────────────────────────────────────
