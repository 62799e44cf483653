//! Narrative content: the prompt sent to a generative collaborator and the
//! four-field shape it must answer with.

use serde::{Deserialize, Serialize};

use crate::{
    request::PathwayRequest,
    urgency::UrgencyLevel,
};

/// The four narrative fields. The serialized (camelCase) form is the wire
/// shape a generative collaborator is instructed to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub symptom_explanation: String,
    pub personalized_advice: String,
    pub recovery_timeline: String,
    pub seek_help_if: Vec<String>,
}

/// Where a narrative came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNarrative {
    pub narrative: Narrative,
    pub source: NarrativeSource,
}

/// Everything the collaborator is told about the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativePrompt {
    pub request: PathwayRequest,
    pub level: UrgencyLevel,
}

impl NarrativePrompt {
    pub fn new(request: &PathwayRequest, level: UrgencyLevel) -> Self {
        Self {
            request: request.clone(),
            level,
        }
    }

    /// Render the prompt text handed to a text-generation backend.
    pub fn render(&self) -> String {
        let r = &self.request;
        let symptoms = r.symptoms.iter().cloned().collect::<Vec<_>>().join(", ");
        format!(
            "You are a careful health information assistant. You never diagnose conditions \
             and never prescribe or name prescription medicines.\n\
             \n\
             Symptoms: {symptoms}\n\
             Age group: {age}\n\
             Gender: {gender}\n\
             Duration: {duration}\n\
             Self-reported severity: {severity}\n\
             Assessed urgency: {level}\n\
             \n\
             Respond with JSON only, exactly this shape:\n\
             {{\"symptomExplanation\": string, \"personalizedAdvice\": string, \
             \"recoveryTimeline\": string, \"seekHelpIf\": [string, ...]}}",
            age = r.age,
            gender = r.gender,
            duration = r.duration,
            severity = r.severity,
            level = self.level,
        )
    }
}
