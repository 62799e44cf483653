//! The care pathway assembler.
//!
//! The engine composes the pipeline for one request:
//!
//!   Score → Action plan → Recommendations → Narrative → Assemble
//!
//! Scoring, action plan, and recommendation selection are pure functions of
//! the request. The narrative step is the only one that may block; it falls
//! back to rule-based content on any failure, so assembly never fails.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use carepath_contracts::{
    config::RecommendationConfig,
    medicine::MedicineRecommendation,
    pathway::{CarePathway, Disclaimer, PathwayId},
    request::{AgeBand, DurationBand, PathwayRequest, Severity, SymptomSet},
    urgency::{QuickAssessment, UrgencyAssessment, UrgencyLevel},
};

use crate::{
    action_plan::build_action_plan,
    digest::pathway_digest,
    narrative::NarrativeResolver,
    recommend::{select_home_care, select_medicines, select_natural_remedies},
    traits::{ReferenceStore, ScoringInput, UrgencyScorer},
};

/// Added to `contraindications` for every under-18 profile.
pub const PEDIATRIC_ASPIRIN_WARNING: &str =
    "Aspirin must not be given to anyone under 18 because of the risk of Reye's syndrome";

pub const EMERGENCY_WARNINGS: [&str; 2] = [
    "Call emergency services immediately; do not wait for symptoms to improve",
    "Do not eat, drink, or take any medicine unless told to by emergency staff",
];

/// How many contraindications each recommended medicine contributes.
const CONTRAINDICATIONS_PER_MEDICINE: usize = 2;

fn quick_message(level: UrgencyLevel) -> &'static str {
    match level {
        UrgencyLevel::Emergency => {
            "Seek emergency care now. Call your local emergency number or go to the nearest emergency department."
        }
        UrgencyLevel::High => {
            "Contact a healthcare provider within 24 hours to have your symptoms reviewed."
        }
        UrgencyLevel::Moderate => {
            "Monitor your symptoms closely and consider booking an appointment if they do not improve in a few days."
        }
        UrgencyLevel::Low => {
            "Your symptoms can usually be managed at home with rest and self-care."
        }
    }
}

fn urgency_explanation(assessment: &UrgencyAssessment) -> String {
    let lead = match assessment.level {
        UrgencyLevel::Emergency => "Your symptoms may indicate a medical emergency.",
        UrgencyLevel::High => "Your symptoms need prompt medical attention.",
        UrgencyLevel::Moderate => {
            "Your symptoms should be watched closely and may need a doctor's review."
        }
        UrgencyLevel::Low => "Your symptoms appear mild and can usually be managed with self-care.",
    };
    if assessment.factors.is_empty() {
        format!("{lead} Urgency score {:.1}/10.", assessment.score)
    } else {
        format!(
            "{lead} Urgency score {:.1}/10. Contributing factors: {}.",
            assessment.score,
            assessment.factors.join("; ")
        )
    }
}

/// Deduplicated union of each medicine's first contraindications, plus the
/// pediatric aspirin warning for minors.
fn collect_contraindications(medicines: &[MedicineRecommendation], age: AgeBand) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let candidates = medicines
        .iter()
        .flat_map(|r| r.medicine.contraindications.iter().take(CONTRAINDICATIONS_PER_MEDICINE))
        .cloned()
        .chain(age.is_minor().then(|| PEDIATRIC_ASPIRIN_WARNING.to_string()));
    for item in candidates {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Builds care pathways from validated requests.
///
/// Holds only read-only collaborators, so one engine may serve concurrent
/// requests.
pub struct CarePathwayEngine {
    scorer: Box<dyn UrgencyScorer>,
    reference: Box<dyn ReferenceStore>,
    narrative: NarrativeResolver,
    recommendations: RecommendationConfig,
}

impl CarePathwayEngine {
    pub fn new(
        scorer: Box<dyn UrgencyScorer>,
        reference: Box<dyn ReferenceStore>,
        narrative: NarrativeResolver,
        recommendations: RecommendationConfig,
    ) -> Self {
        Self {
            scorer,
            reference,
            narrative,
            recommendations,
        }
    }

    pub fn reference(&self) -> &dyn ReferenceStore {
        self.reference.as_ref()
    }

    /// Run the urgency scorer alone.
    pub fn assess(
        &self,
        symptoms: &SymptomSet,
        age: AgeBand,
        duration: DurationBand,
        severity: Severity,
    ) -> UrgencyAssessment {
        self.scorer.assess(&ScoringInput {
            symptoms,
            age,
            duration,
            severity,
            emergency_conditions: self.reference.emergency_conditions(),
        })
    }

    /// Build the full care pathway for `request`.
    ///
    /// The returned pathway is shared and read-only; clone it to derive a
    /// modified copy.
    pub fn assemble(&self, request: &PathwayRequest) -> Arc<CarePathway> {
        let id = PathwayId::new();
        let generated_at = Utc::now();

        debug!(
            pathway_id = %id.0,
            symptoms = request.symptoms.len(),
            age = %request.age,
            duration = %request.duration,
            severity = request.severity.get(),
            "assembling care pathway"
        );

        let assessment =
            self.assess(&request.symptoms, request.age, request.duration, request.severity);
        let level = assessment.level;

        let immediate_actions = build_action_plan(level, &request.symptoms);

        let medicine_recommendations = select_medicines(
            self.reference.as_ref(),
            &request.symptoms,
            request.age,
            request.gender,
            &self.recommendations,
        );
        let home_care_recommendations =
            select_home_care(self.reference.as_ref(), &request.symptoms);
        let natural_remedy_recommendations =
            select_natural_remedies(self.reference.as_ref(), &request.symptoms);

        let resolved = self.narrative.resolve(request, level);

        let contraindications = collect_contraindications(&medicine_recommendations, request.age);

        let emergency_warnings = if level == UrgencyLevel::Emergency {
            EMERGENCY_WARNINGS.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        let content_digest = pathway_digest(
            level,
            &immediate_actions,
            &medicine_recommendations,
            &contraindications,
        );

        info!(
            pathway_id = %id.0,
            level = %level,
            score = assessment.score,
            steps = immediate_actions.len(),
            medicines = medicine_recommendations.len(),
            narrative = ?resolved.source,
            "care pathway assembled"
        );

        Arc::new(CarePathway {
            id,
            generated_at,
            request: request.clone(),
            urgency_level: level,
            urgency_score: assessment.score,
            urgency_explanation: urgency_explanation(&assessment),
            immediate_actions,
            medicine_recommendations,
            home_care_recommendations,
            natural_remedy_recommendations,
            symptom_explanation: resolved.narrative.symptom_explanation,
            personalized_advice: resolved.narrative.personalized_advice,
            recovery_timeline: resolved.narrative.recovery_timeline,
            when_to_seek_help: resolved.narrative.seek_help_if,
            narrative_source: resolved.source,
            emergency_warnings,
            contraindications,
            disclaimer: Disclaimer::standard(),
            content_digest,
        })
    }

    /// Score only, and map the level to a fixed message.
    pub fn quick_assess(
        &self,
        symptoms: &SymptomSet,
        age: AgeBand,
        duration: DurationBand,
        severity: Severity,
    ) -> QuickAssessment {
        let level = self.assess(symptoms, age, duration, severity).level;
        QuickAssessment {
            level,
            needs_immediate_care: level == UrgencyLevel::Emergency,
            message: quick_message(level).to_string(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
