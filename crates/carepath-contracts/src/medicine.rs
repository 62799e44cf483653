//! Reference records (medicines, home care, natural remedies) and the
//! personalised recommendation built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a medicine is sold over the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicineType {
    Otc,
    Prescription,
}

/// Safety classification carried by each medicine record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyClass {
    #[serde(rename = "Generally Safe")]
    GenerallySafe,
    #[serde(rename = "Use with Caution")]
    UseWithCaution,
    #[serde(rename = "Consult Doctor")]
    ConsultDoctor,
}

/// FDA-style pregnancy category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PregnancyCategory {
    A,
    B,
    C,
    D,
    X,
    #[serde(rename = "N")]
    NotRated,
}

impl PregnancyCategory {
    /// D and X carry evidence of fetal risk.
    pub fn has_fetal_risk(self) -> bool {
        matches!(self, PregnancyCategory::D | PregnancyCategory::X)
    }
}

impl fmt::Display for PregnancyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PregnancyCategory::A => "A",
            PregnancyCategory::B => "B",
            PregnancyCategory::C => "C",
            PregnancyCategory::D => "D",
            PregnancyCategory::X => "X",
            PregnancyCategory::NotRated => "N",
        };
        f.write_str(s)
    }
}

/// A medicine in the reference store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub name: String,
    /// Pharmacological class, e.g. "Analgesic", "NSAID", "Antihistamine".
    pub category: String,
    pub medicine_type: MedicineType,
    pub safety_class: SafetyClass,
    pub pregnancy_category: PregnancyCategory,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub typical_dosage: Option<String>,
    /// Never offered to under-18 profiles (salicylates and Reye's syndrome).
    #[serde(default)]
    pub pediatric_excluded: bool,
}

impl Medicine {
    pub fn is_prescription_only(&self) -> bool {
        self.medicine_type == MedicineType::Prescription
    }

    pub fn is_nsaid(&self) -> bool {
        self.category.eq_ignore_ascii_case("NSAID")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationPriority {
    Primary,
    Alternative,
}

/// A medicine filtered and annotated for one request profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineRecommendation {
    pub medicine: Medicine,
    pub priority: RecommendationPriority,
    /// The input symptoms whose mapping includes this medicine.
    pub reason_symptoms: Vec<String>,
    /// Profile-specific notes first, then the medicine's own warnings.
    pub user_precautions: Vec<String>,
}

/// A home-care measure in the reference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeCareRemedy {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// A natural remedy in the reference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalRemedy {
    pub id: String,
    pub name: String,
    pub description: String,
    /// "strong", "moderate", "limited", ...
    pub evidence: String,
    #[serde(default)]
    pub cautions: Vec<String>,
}
