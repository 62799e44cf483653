//! Content digest over the deterministic part of a care pathway.
//!
//! Identity fields (`id`, `generated_at`) and narrative text are left out so
//! two pathways built from the same inputs share a digest.
//!
//! Hash input layout (bytes, in order), every string length-prefixed with its
//! byte length as 8-byte little-endian:
//!   1. urgency level label
//!   2. per step: order (4-byte LE), kind label, title, description,
//!      timeframe, action count + actions, warning count + warnings
//!   3. per medicine: id, priority label, reason count + reasons,
//!      precaution count + precautions
//!   4. contraindication count + contraindications

use sha2::{Digest, Sha256};

use carepath_contracts::{
    medicine::{MedicineRecommendation, RecommendationPriority},
    pathway::{CarePathwayStep, StepKind},
    urgency::UrgencyLevel,
};

fn put_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn put_list(hasher: &mut Sha256, items: &[String]) {
    hasher.update((items.len() as u64).to_le_bytes());
    for item in items {
        put_str(hasher, item);
    }
}

fn kind_label(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Immediate => "immediate",
        StepKind::ShortTerm => "short-term",
        StepKind::Ongoing => "ongoing",
        StepKind::Monitoring => "monitoring",
    }
}

fn priority_label(priority: RecommendationPriority) -> &'static str {
    match priority {
        RecommendationPriority::Primary => "primary",
        RecommendationPriority::Alternative => "alternative",
    }
}

/// Compute the lowercase 64-character hex SHA-256 digest of a pathway's
/// deterministic content.
pub fn pathway_digest(
    level: UrgencyLevel,
    steps: &[CarePathwayStep],
    medicines: &[MedicineRecommendation],
    contraindications: &[String],
) -> String {
    let mut hasher = Sha256::new();

    put_str(&mut hasher, level.label());

    hasher.update((steps.len() as u64).to_le_bytes());
    for step in steps {
        hasher.update(step.order.to_le_bytes());
        put_str(&mut hasher, kind_label(step.kind));
        put_str(&mut hasher, &step.title);
        put_str(&mut hasher, &step.description);
        put_str(&mut hasher, &step.timeframe);
        put_list(&mut hasher, &step.actions);
        put_list(&mut hasher, step.warnings.as_deref().unwrap_or(&[]));
    }

    hasher.update((medicines.len() as u64).to_le_bytes());
    for rec in medicines {
        put_str(&mut hasher, &rec.medicine.id);
        put_str(&mut hasher, priority_label(rec.priority));
        put_list(&mut hasher, &rec.reason_symptoms);
        put_list(&mut hasher, &rec.user_precautions);
    }

    put_list(&mut hasher, contraindications);

    hex::encode(hasher.finalize())
}
