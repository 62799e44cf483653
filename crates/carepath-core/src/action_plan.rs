//! Action plan builder: template-based immediate-care steps.
//!
//! Emission order:
//!
//! 1. `Emergency` → one "call emergency services" step and nothing else.
//! 2. `High` → a "contact a provider within 24 hours" step.
//! 3. Symptom templates in fixed order: fever, dehydration (diarrhea /
//!    vomiting / nausea), headache, respiratory (cough / sore throat).
//! 4. A closing "monitor your symptoms" step.
//!
//! `order` is assigned densely from 1 in emission order.

use carepath_contracts::{
    pathway::{CarePathwayStep, StepKind},
    request::SymptomSet,
    urgency::UrgencyLevel,
};

/// A symptom-triggered template. Fires when any trigger symptom is present.
struct SymptomTemplate {
    triggers: &'static [&'static str],
    kind: StepKind,
    title: &'static str,
    description: &'static str,
    timeframe: &'static str,
    actions: &'static [&'static str],
    warnings: &'static [&'static str],
}

const SYMPTOM_TEMPLATES: &[SymptomTemplate] = &[
    SymptomTemplate {
        triggers: &["Fever"],
        kind: StepKind::ShortTerm,
        title: "Manage your fever",
        description: "Keep your temperature in a comfortable range and support your body while it fights infection.",
        timeframe: "Next 24-48 hours",
        actions: &[
            "Check your temperature every 4-6 hours and write it down",
            "Rest and wear light, breathable clothing",
            "Drink water or clear fluids regularly",
            "Use a fever reducer such as paracetamol if needed, following the label dose",
        ],
        warnings: &[
            "Seek care if your temperature reaches 39.4°C (103°F) or higher, or lasts more than 3 days",
        ],
    },
    SymptomTemplate {
        triggers: &["Diarrhea", "Vomiting", "Nausea"],
        kind: StepKind::Immediate,
        title: "Prevent dehydration",
        description: "Replace the fluids and salts your body is losing.",
        timeframe: "Start now",
        actions: &[
            "Take small, frequent sips of water or an oral rehydration solution",
            "Avoid alcohol, caffeine, and very sugary drinks",
            "Eat bland foods such as rice, bananas, toast, or crackers once you can keep fluids down",
        ],
        warnings: &[
            "Seek care if you cannot keep fluids down for 12 hours, or notice very little or dark urine",
        ],
    },
    SymptomTemplate {
        triggers: &["Headache"],
        kind: StepKind::ShortTerm,
        title: "Relieve your headache",
        description: "Reduce common headache triggers and ease the pain.",
        timeframe: "Next few hours",
        actions: &[
            "Rest in a quiet, dimly lit room",
            "Drink a glass of water; dehydration is a common trigger",
            "Apply a cool compress to your forehead or the back of your neck",
            "Limit screen time until the pain eases",
        ],
        warnings: &[
            "Get help immediately for a sudden, severe headache or one with a stiff neck, confusion, or vision changes",
        ],
    },
    SymptomTemplate {
        triggers: &["Cough", "Sore Throat"],
        kind: StepKind::Ongoing,
        title: "Soothe your throat and airways",
        description: "Keep your airways moist and your throat comfortable while you recover.",
        timeframe: "Over the next several days",
        actions: &[
            "Drink warm fluids such as tea with honey or broth",
            "Gargle with warm salt water a few times a day",
            "Use a humidifier or breathe in steam from a warm shower",
            "Avoid smoke and other airway irritants",
        ],
        warnings: &[],
    },
];

fn emergency_step() -> CarePathwayStep {
    CarePathwayStep {
        order: 1,
        kind: StepKind::Immediate,
        title: "Call emergency services now".to_string(),
        description: "Your symptoms may need urgent medical attention.".to_string(),
        timeframe: "Immediately".to_string(),
        actions: vec![
            "Call your local emergency number (for example 911 or 112) right away".to_string(),
            "Do not drive yourself if you have chest pain or difficulty breathing".to_string(),
            "Stay calm, sit or lie in a comfortable position, and keep someone with you"
                .to_string(),
            "Prepare a short summary of your symptoms, medicines, and allergies for responders"
                .to_string(),
        ],
        warnings: Some(vec![
            "Do not wait to see whether symptoms improve".to_string(),
        ]),
    }
}

fn provider_step() -> CarePathwayStep {
    CarePathwayStep {
        order: 0,
        kind: StepKind::Immediate,
        title: "Contact a healthcare provider".to_string(),
        description: "Your symptoms should be reviewed by a doctor or nurse soon.".to_string(),
        timeframe: "Within 24 hours".to_string(),
        actions: vec![
            "Call your doctor, a nurse advice line, or an urgent care clinic".to_string(),
            "Describe all your symptoms, when they started, and how they have changed".to_string(),
            "Ask whether you should be seen in person today".to_string(),
        ],
        warnings: Some(vec![
            "Go to emergency care if symptoms suddenly get worse".to_string(),
        ]),
    }
}

fn monitoring_step() -> CarePathwayStep {
    CarePathwayStep {
        order: 0,
        kind: StepKind::Monitoring,
        title: "Monitor your symptoms".to_string(),
        description: "Track how you feel so you notice changes early.".to_string(),
        timeframe: "Ongoing".to_string(),
        actions: vec![
            "Write down your symptoms and how severe they are twice a day".to_string(),
            "Note anything that makes them better or worse".to_string(),
            "Get medical help if symptoms worsen or new symptoms appear".to_string(),
        ],
        warnings: None,
    }
}

impl SymptomTemplate {
    fn fires_for(&self, symptoms: &SymptomSet) -> bool {
        self.triggers.iter().any(|t| symptoms.contains(*t))
    }

    fn to_step(&self) -> CarePathwayStep {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        CarePathwayStep {
            order: 0,
            kind: self.kind,
            title: self.title.to_string(),
            description: self.description.to_string(),
            timeframe: self.timeframe.to_string(),
            actions: owned(self.actions),
            warnings: if self.warnings.is_empty() {
                None
            } else {
                Some(owned(self.warnings))
            },
        }
    }
}

/// Build the immediate-care plan for an urgency level and symptom set.
///
/// Identical inputs always produce an identical plan.
pub fn build_action_plan(level: UrgencyLevel, symptoms: &SymptomSet) -> Vec<CarePathwayStep> {
    if level == UrgencyLevel::Emergency {
        return vec![emergency_step()];
    }

    let mut steps = Vec::new();

    if level == UrgencyLevel::High {
        steps.push(provider_step());
    }

    steps.extend(
        SYMPTOM_TEMPLATES
            .iter()
            .filter(|t| t.fires_for(symptoms))
            .map(SymptomTemplate::to_step),
    );

    steps.push(monitoring_step());

    for (i, step) in steps.iter_mut().enumerate() {
        step.order = i as u32 + 1;
    }
    steps
}

// ── Tests ─────────────────────────────────────────────────────────────────────
