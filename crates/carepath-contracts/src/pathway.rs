//! Care pathway output types.
//!
//! A `CarePathway` is assembled once per request and handed out behind an
//! `Arc`; nothing mutates it after assembly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    medicine::{HomeCareRemedy, MedicineRecommendation, NaturalRemedy},
    narrative::NarrativeSource,
    request::PathwayRequest,
    urgency::UrgencyLevel,
};

/// Unique identifier for one assembled pathway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathwayId(pub uuid::Uuid);

impl PathwayId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for PathwayId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Immediate,
    ShortTerm,
    Ongoing,
    Monitoring,
}

/// One step of the immediate-care plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePathwayStep {
    /// 1-based and dense within a plan.
    pub order: u32,
    pub kind: StepKind,
    pub title: String,
    pub description: String,
    pub timeframe: String,
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

/// The fixed legal/medical disclaimer attached to every pathway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclaimer {
    pub title: String,
    pub body: String,
    pub emergency_notice: String,
}

impl Disclaimer {
    pub fn standard() -> Self {
        Self {
            title: "Important medical disclaimer".to_string(),
            body: "This care pathway is general health information generated from your answers. \
                   It is not a diagnosis, does not replace professional medical advice, and \
                   should not be used to start, stop, or change any treatment without talking \
                   to a qualified healthcare provider or pharmacist."
                .to_string(),
            emergency_notice: "If you think you are having a medical emergency, call your local \
                               emergency number immediately."
                .to_string(),
        }
    }
}

/// The engine's output for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePathway {
    pub id: PathwayId,
    pub generated_at: DateTime<Utc>,
    /// Echo of the inputs the pathway was built from.
    pub request: PathwayRequest,

    pub urgency_level: UrgencyLevel,
    pub urgency_score: f64,
    pub urgency_explanation: String,

    pub immediate_actions: Vec<CarePathwayStep>,
    pub medicine_recommendations: Vec<MedicineRecommendation>,
    pub home_care_recommendations: Vec<HomeCareRemedy>,
    pub natural_remedy_recommendations: Vec<NaturalRemedy>,

    pub symptom_explanation: String,
    pub personalized_advice: String,
    pub recovery_timeline: String,
    pub when_to_seek_help: Vec<String>,
    pub narrative_source: NarrativeSource,

    pub emergency_warnings: Vec<String>,
    /// Deduplicated, first-seen order.
    pub contraindications: Vec<String>,
    pub disclaimer: Disclaimer,

    /// Hex SHA-256 over the deterministic fields (level, actions, medicines,
    /// contraindications). Equal for equal inputs.
    pub content_digest: String,
}
