//! Shared mocks for the unit tests in this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use carepath_contracts::{
    error::NarrativeError,
    medicine::{
        HomeCareRemedy, Medicine, MedicineType, NaturalRemedy, PregnancyCategory, SafetyClass,
    },
    narrative::NarrativePrompt,
    request::SymptomSet,
    urgency::{UrgencyAssessment, UrgencyLevel},
    verify::{NarrativeSchema, VerificationFailure, VerificationReport},
};
use serde_json::Value;

use crate::traits::{
    NarrativeGenerator, NarrativeValidator, ReferenceStore, ScoringInput, UrgencyScorer,
};

pub fn set(items: &[&str]) -> SymptomSet {
    items.iter().map(|s| s.to_string()).collect()
}

fn medicine(
    id: &str,
    category: &str,
    medicine_type: MedicineType,
    safety_class: SafetyClass,
    pregnancy_category: PregnancyCategory,
    warnings: &[&str],
) -> Medicine {
    Medicine {
        id: id.to_string(),
        name: id.to_string(),
        category: category.to_string(),
        medicine_type,
        safety_class,
        pregnancy_category,
        contraindications: vec![
            format!("{id} contraindication 1"),
            format!("{id} contraindication 2"),
            format!("{id} contraindication 3"),
        ],
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
        typical_dosage: None,
        pediatric_excluded: false,
    }
}

fn pediatric_excluded(medicine: Medicine) -> Medicine {
    Medicine {
        pediatric_excluded: true,
        ..medicine
    }
}

/// A small in-memory reference store.
pub struct MockStore {
    medicines: BTreeMap<String, Medicine>,
    medicine_map: BTreeMap<&'static str, Vec<&'static str>>,
    home_care_map: BTreeMap<&'static str, Vec<&'static str>>,
    remedy_map: BTreeMap<&'static str, Vec<&'static str>>,
    emergency: BTreeSet<String>,
}

impl MockStore {
    pub fn new() -> Self {
        use MedicineType::*;
        use PregnancyCategory as P;
        use SafetyClass::*;

        let medicines = [
            medicine(
                "paracetamol",
                "Analgesic",
                Otc,
                GenerallySafe,
                P::B,
                &["Liver warning", "Max 4 g per day"],
            ),
            medicine(
                "ibuprofen",
                "NSAID",
                Otc,
                UseWithCaution,
                P::D,
                &["Take with food", "Stomach bleeding risk", "Kidney risk"],
            ),
            pediatric_excluded(medicine(
                "aspirin",
                "NSAID",
                Otc,
                UseWithCaution,
                P::D,
                &["Bleeding risk"],
            )),
            medicine(
                "dextromethorphan",
                "Antitussive",
                Otc,
                GenerallySafe,
                P::C,
                &["May cause drowsiness"],
            ),
            medicine(
                "amoxicillin",
                "Antibiotic",
                Prescription,
                ConsultDoctor,
                P::B,
                &["Complete the course"],
            ),
            pediatric_excluded(medicine(
                "bismuth",
                "Antidiarrheal",
                Otc,
                GenerallySafe,
                P::C,
                &["Contains a salicylate"],
            )),
            medicine("ginger-capsules", "Antiemetic", Otc, UseWithCaution, P::C, &[]),
        ]
        .into_iter()
        .map(|m| (m.id.clone(), m))
        .collect();

        Self {
            medicines,
            medicine_map: BTreeMap::from([
                ("Fever", vec!["paracetamol", "ibuprofen", "aspirin"]),
                ("Headache", vec!["paracetamol", "ibuprofen", "aspirin"]),
                ("Cough", vec!["dextromethorphan"]),
                ("Sore Throat", vec!["amoxicillin", "paracetamol", "ghost-medicine"]),
                ("Nausea", vec!["bismuth", "ginger-capsules"]),
            ]),
            home_care_map: BTreeMap::from([
                ("Fever", vec!["hydration", "rest"]),
                ("Headache", vec!["rest"]),
            ]),
            remedy_map: BTreeMap::from([("Cough", vec!["honey"]), ("Sore Throat", vec!["honey"])]),
            emergency: set(&["Chest Pain"]),
        }
    }
}

fn ids(map: &BTreeMap<&'static str, Vec<&'static str>>, symptom: &str) -> Vec<String> {
    map.get(symptom)
        .map(|v| v.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

impl ReferenceStore for MockStore {
    fn medicines_for_symptom(&self, symptom: &str) -> Vec<String> {
        ids(&self.medicine_map, symptom)
    }

    fn home_care_for_symptom(&self, symptom: &str) -> Vec<String> {
        ids(&self.home_care_map, symptom)
    }

    fn natural_remedies_for_symptom(&self, symptom: &str) -> Vec<String> {
        ids(&self.remedy_map, symptom)
    }

    fn medicine(&self, id: &str) -> Option<Medicine> {
        self.medicines.get(id).cloned()
    }

    fn home_care(&self, id: &str) -> Option<HomeCareRemedy> {
        matches!(id, "hydration" | "rest").then(|| HomeCareRemedy {
            id: id.to_string(),
            name: id.to_string(),
            description: format!("{id} description"),
            instructions: vec![],
        })
    }

    fn natural_remedy(&self, id: &str) -> Option<NaturalRemedy> {
        (id == "honey").then(|| NaturalRemedy {
            id: id.to_string(),
            name: "Honey".to_string(),
            description: "Soothes the throat".to_string(),
            evidence: "moderate".to_string(),
            cautions: vec!["Not for infants under 1 year".to_string()],
        })
    }

    fn emergency_conditions(&self) -> &BTreeSet<String> {
        &self.emergency
    }
}

/// A scorer that returns a fixed level (score at the level's threshold),
/// or the emergency override when an emergency condition is present.
pub struct FixedScorer {
    pub level: UrgencyLevel,
}

impl UrgencyScorer for FixedScorer {
    fn assess(&self, input: &ScoringInput<'_>) -> UrgencyAssessment {
        if input.symptoms.iter().any(|s| input.emergency_conditions.contains(s)) {
            return UrgencyAssessment::emergency_override();
        }
        let score = match self.level {
            UrgencyLevel::Low => 2.0,
            UrgencyLevel::Moderate => 4.0,
            UrgencyLevel::High => 6.0,
            UrgencyLevel::Emergency => 8.0,
        };
        UrgencyAssessment::from_score(score, vec!["fixed".to_string()])
    }
}

/// What a mock generator does when called.
#[derive(Clone)]
pub enum GeneratorBehavior {
    Respond(String),
    Fail(NarrativeError),
    /// Takes this long, giving up at the deadline like a client timeout.
    Sleep(Duration),
    /// Takes this long and answers regardless of the deadline.
    Overrun(Duration),
    Panic,
}

/// A generator that records its calls and behaves as configured.
pub struct MockGenerator {
    pub behavior: GeneratorBehavior,
    pub calls: Arc<Mutex<u32>>,
    /// Calls currently executing.
    pub in_flight: Arc<AtomicUsize>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockGenerator {
    pub fn new(behavior: GeneratorBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn valid_json() -> String {
        serde_json::json!({
            "symptomExplanation": "Generated explanation.",
            "personalizedAdvice": "Generated advice.",
            "recoveryTimeline": "Generated timeline.",
            "seekHelpIf": ["Generated warning"]
        })
        .to_string()
    }
}

impl NarrativeGenerator for MockGenerator {
    fn generate(
        &self,
        _prompt: &NarrativePrompt,
        timeout: Duration,
    ) -> Result<String, NarrativeError> {
        let _guard = InFlight::enter(&self.in_flight);
        *self.calls.lock().unwrap() += 1;
        match &self.behavior {
            GeneratorBehavior::Respond(body) => Ok(body.clone()),
            GeneratorBehavior::Fail(err) => Err(err.clone()),
            GeneratorBehavior::Sleep(d) if *d > timeout => {
                std::thread::sleep(timeout);
                Err(NarrativeError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            GeneratorBehavior::Sleep(d) | GeneratorBehavior::Overrun(d) => {
                std::thread::sleep(*d);
                Ok(Self::valid_json())
            }
            GeneratorBehavior::Panic => panic!("generator blew up"),
        }
    }
}

/// A validator that checks only that the four fields are present and non-empty.
pub struct PresenceValidator;

impl NarrativeValidator for PresenceValidator {
    fn validate(&self, payload: &Value, _schema: &NarrativeSchema) -> VerificationReport {
        let mut failures = Vec::new();
        for field in ["symptomExplanation", "personalizedAdvice", "recoveryTimeline"] {
            let ok = payload
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !ok {
                failures.push(VerificationFailure {
                    rule_id: format!("req-{field}"),
                    message: format!("'{field}' missing"),
                });
            }
        }
        let list_ok = payload
            .get("seekHelpIf")
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty());
        if !list_ok {
            failures.push(VerificationFailure {
                rule_id: "req-seekHelpIf".to_string(),
                message: "'seekHelpIf' missing".to_string(),
            });
        }
        VerificationReport::from_failures(failures)
    }
}
