//! Narrative content resolver.
//!
//! Resolution order:
//!
//!   configured generator → parse JSON → validate → accept
//!
//! Any failure along the way (no generator, timeout, transport error, panic,
//! malformed JSON, failed validation) falls through to `fallback_narrative`,
//! which is deterministic and total. The generator is called at most once,
//! synchronously, and is handed the resolver's timeout as its deadline.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{debug, warn};

use carepath_contracts::{
    error::NarrativeError,
    narrative::{Narrative, NarrativePrompt, NarrativeSource, ResolvedNarrative},
    request::{AgeBand, PathwayRequest},
    urgency::UrgencyLevel,
    verify::{NarrativeSchema, VerificationRule, VerificationRuleType},
};

use crate::traits::{NarrativeGenerator, NarrativeValidator};

const TEXT_FIELDS: [&str; 3] = ["symptomExplanation", "personalizedAdvice", "recoveryTimeline"];
const LIST_FIELD: &str = "seekHelpIf";

/// Phrases a generated narrative must never contain.
const FORBIDDEN_PHRASES: [&str; 3] =
    ["you have been diagnosed", "your diagnosis is", "i prescribe"];

const MAX_FIELD_CHARS: usize = 2_000;

/// The schema every generated narrative is checked against.
pub fn narrative_schema() -> NarrativeSchema {
    let mut rules = Vec::new();

    for field in TEXT_FIELDS {
        rules.push(VerificationRule {
            rule_id: format!("req-{field}"),
            description: format!("'{field}' must be non-empty text"),
            rule_type: VerificationRuleType::RequiredText { field: field.to_string() },
        });
    }
    rules.push(VerificationRule {
        rule_id: format!("req-{LIST_FIELD}"),
        description: format!("'{LIST_FIELD}' must list at least one warning sign"),
        rule_type: VerificationRuleType::RequiredList { field: LIST_FIELD.to_string() },
    });

    for field in TEXT_FIELDS.iter().chain([LIST_FIELD].iter()) {
        for (i, phrase) in FORBIDDEN_PHRASES.iter().enumerate() {
            rules.push(VerificationRule {
                rule_id: format!("no-diagnosis-{field}-{i}"),
                description: "narrative must not diagnose or prescribe".to_string(),
                rule_type: VerificationRuleType::ForbiddenPhrase {
                    field: field.to_string(),
                    phrase: phrase.to_string(),
                },
            });
        }
        rules.push(VerificationRule {
            rule_id: format!("len-{field}"),
            description: format!("'{field}' must stay under {MAX_FIELD_CHARS} characters"),
            rule_type: VerificationRuleType::MaxLength {
                field: field.to_string(),
                max_chars: MAX_FIELD_CHARS,
            },
        });
    }

    NarrativeSchema {
        schema_id: "narrative-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "required": ["symptomExplanation", "personalizedAdvice", "recoveryTimeline", "seekHelpIf"],
            "properties": {
                "symptomExplanation": { "type": "string" },
                "personalizedAdvice": { "type": "string" },
                "recoveryTimeline": { "type": "string" },
                "seekHelpIf": { "type": "array", "items": { "type": "string" } }
            }
        }),
        rules,
    }
}

// ── Fallback ──────────────────────────────────────────────────────────────────

const EXPLANATION_RESPIRATORY: &str = "Fever together with a cough is most often caused by a viral \
    respiratory infection such as a cold or flu. Your body raises its temperature to help fight the \
    infection, and the cough helps clear your airways.";
const EXPLANATION_TENSION: &str = "Headache with tiredness is commonly linked to stress, not drinking \
    enough fluids, or poor sleep. These symptoms often improve with rest, hydration, and regular meals.";
const EXPLANATION_DIGESTIVE: &str = "Nausea or diarrhea usually points to a digestive upset, often \
    from a stomach bug or something you ate. The main risk is losing fluids, so staying hydrated matters most.";
const EXPLANATION_GENERIC: &str = "Your symptoms are your body's response to something it is dealing \
    with, such as an infection, strain, or irritation. Many common symptoms improve on their own with \
    rest and self-care, but it is important to watch how they change.";

const ADVICE_MINOR: &str = "Because the person with these symptoms is under 18, a parent or guardian \
    should monitor them closely, check children's dosing on every medicine label, and never give \
    aspirin. Contact a pediatrician if symptoms worsen, if the child stops drinking, or if you are \
    unsure what to do.";
const ADVICE_SENIOR: &str = "Older adults can become unwell more quickly and may react more strongly \
    to medicines. Start with the lowest dose of any medicine, check for interactions with your regular \
    prescriptions, stay well hydrated, and contact your doctor early if you feel worse.";
const ADVICE_DEFAULT: &str = "Rest, drink plenty of fluids, and eat light, nourishing food. Use \
    over-the-counter medicines only as directed on the label, and keep track of how your symptoms \
    change over the next few days.";

const TIMELINE_LOW: &str = "Mild symptoms like these usually improve within 3-5 days with rest and self-care.";
const TIMELINE_MODERATE: &str = "Symptoms like these often take 5-7 days to improve. If you are not \
    getting better after a week, see a healthcare provider.";
const TIMELINE_URGENT: &str = "Recovery depends on the underlying cause. Follow the guidance of a \
    healthcare professional, who can give you a clearer timeline after assessing you.";

pub const SEEK_HELP_IF: [&str; 5] = [
    "Symptoms get significantly worse or new symptoms appear",
    "You have difficulty breathing or chest pain",
    "You have a high fever (39.4°C / 103°F or higher) that does not come down",
    "You feel confused, very drowsy, or faint",
    "Symptoms have not improved after 7 days of self-care",
];

fn explanation_for(request: &PathwayRequest) -> &'static str {
    let has = |s: &str| request.symptoms.contains(s);

    if has("Fever") && has("Cough") {
        EXPLANATION_RESPIRATORY
    } else if has("Headache") && has("Fatigue") {
        EXPLANATION_TENSION
    } else if has("Diarrhea") || has("Nausea") {
        EXPLANATION_DIGESTIVE
    } else {
        EXPLANATION_GENERIC
    }
}

fn advice_for(age: AgeBand) -> &'static str {
    if age.is_minor() {
        ADVICE_MINOR
    } else if age.is_senior() {
        ADVICE_SENIOR
    } else {
        ADVICE_DEFAULT
    }
}

fn timeline_for(level: UrgencyLevel) -> &'static str {
    match level {
        UrgencyLevel::Low => TIMELINE_LOW,
        UrgencyLevel::Moderate => TIMELINE_MODERATE,
        UrgencyLevel::High | UrgencyLevel::Emergency => TIMELINE_URGENT,
    }
}

/// Rule-based narrative. Every field is always populated.
pub fn fallback_narrative(request: &PathwayRequest, level: UrgencyLevel) -> Narrative {
    Narrative {
        symptom_explanation: explanation_for(request).to_string(),
        personalized_advice: advice_for(request.age).to_string(),
        recovery_timeline: timeline_for(level).to_string(),
        seek_help_if: SEEK_HELP_IF.iter().map(|s| s.to_string()).collect(),
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Resolves the narrative fields for a pathway, preferring a generator.
pub struct NarrativeResolver {
    generator: Option<Arc<dyn NarrativeGenerator>>,
    validator: Box<dyn NarrativeValidator>,
    schema: NarrativeSchema,
    timeout: Duration,
}

impl NarrativeResolver {
    /// A resolver with no generator: always uses the fallback.
    pub fn new(validator: Box<dyn NarrativeValidator>, timeout: Duration) -> Self {
        Self {
            generator: None,
            validator,
            schema: narrative_schema(),
            timeout,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn NarrativeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Produce the narrative. Never fails.
    pub fn resolve(&self, request: &PathwayRequest, level: UrgencyLevel) -> ResolvedNarrative {
        let prompt = NarrativePrompt::new(request, level);

        match self.try_generate(&prompt) {
            Ok(narrative) => {
                debug!(level = %level, "using generated narrative");
                ResolvedNarrative {
                    narrative,
                    source: NarrativeSource::Generated,
                }
            }
            Err(NarrativeError::Unavailable) => {
                debug!("no narrative generator configured; using fallback");
                ResolvedNarrative {
                    narrative: fallback_narrative(request, level),
                    source: NarrativeSource::Fallback,
                }
            }
            Err(err) => {
                warn!(error = %err, "narrative generation failed; using fallback");
                ResolvedNarrative {
                    narrative: fallback_narrative(request, level),
                    source: NarrativeSource::Fallback,
                }
            }
        }
    }

    fn try_generate(&self, prompt: &NarrativePrompt) -> Result<Narrative, NarrativeError> {
        let generator = self.generator.as_ref().ok_or(NarrativeError::Unavailable)?;
        let raw = self.call_with_deadline(generator.as_ref(), prompt)?;

        let payload: Value =
            serde_json::from_str(raw.trim()).map_err(|e| NarrativeError::Malformed {
                reason: format!("response is not JSON: {e}"),
            })?;

        let report = self.validator.validate(&payload, &self.schema);
        if !report.passed {
            return Err(NarrativeError::Rejected {
                failures: report.summaries(),
            });
        }

        let narrative: Narrative =
            serde_json::from_value(payload).map_err(|e| NarrativeError::Malformed {
                reason: format!("response does not match narrative shape: {e}"),
            })?;

        Ok(Narrative {
            symptom_explanation: narrative.symptom_explanation.trim().to_string(),
            personalized_advice: narrative.personalized_advice.trim().to_string(),
            recovery_timeline: narrative.recovery_timeline.trim().to_string(),
            seek_help_if: narrative
                .seek_help_if
                .into_iter()
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }

    /// Call the generator on this thread with the resolver's deadline.
    ///
    /// A response that arrives after the deadline is discarded. A panicking
    /// generator is reported as a transport failure.
    fn call_with_deadline(
        &self,
        generator: &dyn NarrativeGenerator,
        prompt: &NarrativePrompt,
    ) -> Result<String, NarrativeError> {
        let started = Instant::now();
        let call = AssertUnwindSafe(|| generator.generate(prompt, self.timeout));
        let result = panic::catch_unwind(call).unwrap_or_else(|_| {
            Err(NarrativeError::Transport {
                reason: "generator panicked".to_string(),
            })
        });

        let elapsed = started.elapsed();
        if elapsed > self.timeout {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "generator overran its deadline");
            return Err(NarrativeError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            });
        }
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
