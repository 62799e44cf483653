//! # carepath-core
//!
//! The care pathway engine.
//!
//! This crate provides:
//! - The four seams (`UrgencyScorer`, `ReferenceStore`, `NarrativeGenerator`,
//!   `NarrativeValidator`)
//! - The pure pipeline pieces: action plan builder, recommendation selector,
//!   narrative resolver with its rule-based fallback, content digest
//! - `CarePathwayEngine`, which wires them together (`assemble`, `quick_assess`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carepath_core::{CarePathwayEngine, narrative::NarrativeResolver};
//!
//! let engine = CarePathwayEngine::new(scorer, reference, resolver, config.recommendations);
//! let pathway = engine.assemble(&request);
//! ```

pub mod action_plan;
pub mod digest;
pub mod engine;
pub mod narrative;
pub mod recommend;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use engine::CarePathwayEngine;
