//! Recommendation selector.
//!
//! Medicines:
//!
//! 1. Union the medicine ids mapped from every input symptom (first-seen order).
//! 2. Drop prescription-only medicines.
//! 3. Drop medicines flagged `pediatric_excluded` (aspirin and other
//!    salicylates) for "Under 18". This is an exclusion, not a warning.
//! 4. Build `user_precautions`: age note, pregnancy note, then the medicine's
//!    own warnings (bounded).
//! 5. `Primary` iff the safety class is "Generally Safe", else `Alternative`.
//! 6. Stable sort: every `Primary` before every `Alternative`.
//!
//! Home care and natural remedies are a plain id union over symptoms resolved
//! against the reference tables, with no scoring.

use tracing::{debug, warn};

use carepath_contracts::{
    config::RecommendationConfig,
    medicine::{
        HomeCareRemedy, Medicine, MedicineRecommendation, NaturalRemedy, RecommendationPriority,
        SafetyClass,
    },
    request::{AgeBand, Gender, SymptomSet},
};

use crate::traits::ReferenceStore;

pub const PEDIATRIC_NOTE: &str =
    "Use a children's formulation and weight-based dose; check with a pharmacist first";
pub const SENIOR_DOSE_NOTE: &str = "Start with the lowest effective dose";
pub const SENIOR_NSAID_NOTE: &str =
    "Anti-inflammatory painkillers raise the risk of stomach bleeding and kidney problems in older adults; use with extra caution";

fn pregnancy_note(medicine: &Medicine) -> String {
    format!(
        "Pregnancy category {}: avoid if pregnant or planning pregnancy unless a doctor advises otherwise",
        medicine.pregnancy_category
    )
}

/// Union of ids over symptoms, keeping first-seen order and dropping repeats.
fn union_ids<F>(symptoms: &SymptomSet, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Vec<String>,
{
    let mut ids: Vec<String> = Vec::new();
    for symptom in symptoms {
        for id in lookup(symptom.as_str()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn precautions_for(
    medicine: &Medicine,
    age: AgeBand,
    gender: Gender,
    cfg: &RecommendationConfig,
) -> Vec<String> {
    let mut notes = Vec::new();

    if age.is_minor() {
        notes.push(PEDIATRIC_NOTE.to_string());
    } else if age.is_senior() {
        notes.push(SENIOR_DOSE_NOTE.to_string());
        if medicine.is_nsaid() {
            notes.push(SENIOR_NSAID_NOTE.to_string());
        }
    }

    if gender == Gender::Female && medicine.pregnancy_category.has_fetal_risk() {
        notes.push(pregnancy_note(medicine));
    }

    notes.extend(medicine.warnings.iter().take(cfg.max_medicine_warnings).cloned());
    notes.truncate(cfg.max_precautions);
    notes
}

/// Select personalised medicine recommendations for a symptom profile.
pub fn select_medicines(
    store: &dyn ReferenceStore,
    symptoms: &SymptomSet,
    age: AgeBand,
    gender: Gender,
    cfg: &RecommendationConfig,
) -> Vec<MedicineRecommendation> {
    let candidate_ids = union_ids(symptoms, |s| store.medicines_for_symptom(s));

    let mut recommendations: Vec<MedicineRecommendation> = Vec::new();

    for id in &candidate_ids {
        let Some(medicine) = store.medicine(id) else {
            warn!(medicine_id = %id, "symptom mapping references unknown medicine; skipping");
            continue;
        };

        if medicine.is_prescription_only() {
            debug!(medicine_id = %id, "prescription-only medicine excluded");
            continue;
        }

        if age.is_minor() && medicine.pediatric_excluded {
            debug!(medicine_id = %id, "medicine excluded for under-18 profile");
            continue;
        }

        let reason_symptoms = symptoms
            .iter()
            .filter(|s| store.medicines_for_symptom(s).iter().any(|m| m == id))
            .cloned()
            .collect();

        let priority = if medicine.safety_class == SafetyClass::GenerallySafe {
            RecommendationPriority::Primary
        } else {
            RecommendationPriority::Alternative
        };

        let user_precautions = precautions_for(&medicine, age, gender, cfg);

        recommendations.push(MedicineRecommendation {
            medicine,
            priority,
            reason_symptoms,
            user_precautions,
        });
    }

    // Vec::sort_by_key is stable, so candidate order survives within each group.
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

/// Home-care measures for every input symptom, deduplicated.
pub fn select_home_care(store: &dyn ReferenceStore, symptoms: &SymptomSet) -> Vec<HomeCareRemedy> {
    union_ids(symptoms, |s| store.home_care_for_symptom(s))
        .iter()
        .filter_map(|id| {
            let found = store.home_care(id);
            if found.is_none() {
                warn!(home_care_id = %id, "symptom mapping references unknown home-care entry");
            }
            found
        })
        .collect()
}

/// Natural remedies for every input symptom, deduplicated.
pub fn select_natural_remedies(
    store: &dyn ReferenceStore,
    symptoms: &SymptomSet,
) -> Vec<NaturalRemedy> {
    union_ids(symptoms, |s| store.natural_remedies_for_symptom(s))
        .iter()
        .filter_map(|id| {
            let found = store.natural_remedy(id);
            if found.is_none() {
                warn!(remedy_id = %id, "symptom mapping references unknown natural remedy");
            }
            found
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
