//! TOML-backed reference store.
//!
//! `TomlReferenceStore` implements the `ReferenceStore` trait from
//! carepath-core over medicine, home-care and natural-remedy tables plus the
//! symptom-to-id mappings and the emergency condition list. The tables are
//! read-only once loaded.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use carepath_contracts::{
    error::{CarePathError, CarePathResult},
    medicine::{HomeCareRemedy, Medicine, NaturalRemedy},
};
use carepath_core::traits::ReferenceStore;

/// The reference tables compiled into the crate.
pub const EMBEDDED_REFERENCE: &str = include_str!("../data/reference.toml");

/// The ids offered for one symptom, in recommendation order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SymptomMapping {
    #[serde(default)]
    pub medicines: Vec<String>,
    #[serde(default)]
    pub home_care: Vec<String>,
    #[serde(default)]
    pub natural_remedies: Vec<String>,
}

/// The top-level structure deserialized from a reference data file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub emergency_conditions: BTreeSet<String>,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
    #[serde(default)]
    pub home_care: Vec<HomeCareRemedy>,
    #[serde(default)]
    pub natural_remedies: Vec<NaturalRemedy>,
    /// Keyed by exact symptom name.
    #[serde(default)]
    pub symptoms: BTreeMap<String, SymptomMapping>,
}

fn reference_error(reason: String) -> CarePathError {
    CarePathError::ReferenceData { reason }
}

/// Index a table by id, rejecting blank and duplicate ids.
fn index_by_id<T: Clone>(
    table: &str,
    records: &[T],
    id_of: impl Fn(&T) -> &str,
) -> CarePathResult<HashMap<String, T>> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        let id = id_of(record);
        if id.trim().is_empty() {
            return Err(reference_error(format!("{table} entry with empty id")));
        }
        if index.insert(id.to_string(), record.clone()).is_some() {
            return Err(reference_error(format!("duplicate {table} id '{id}'")));
        }
    }
    Ok(index)
}

fn check_refs<T>(
    symptom: &str,
    table: &str,
    ids: &[String],
    index: &HashMap<String, T>,
) -> CarePathResult<()> {
    match ids.iter().find(|id| !index.contains_key(id.as_str())) {
        Some(missing) => Err(reference_error(format!(
            "symptom '{symptom}' references unknown {table} id '{missing}'"
        ))),
        None => Ok(()),
    }
}

/// A `ReferenceStore` backed by TOML tables.
///
/// ```rust,ignore
/// use carepath_reference::TomlReferenceStore;
///
/// let store = TomlReferenceStore::embedded()?;
/// ```
#[derive(Debug)]
pub struct TomlReferenceStore {
    medicines: HashMap<String, Medicine>,
    home_care: HashMap<String, HomeCareRemedy>,
    natural_remedies: HashMap<String, NaturalRemedy>,
    symptoms: BTreeMap<String, SymptomMapping>,
    emergency_conditions: BTreeSet<String>,
}

impl TomlReferenceStore {
    /// Build a store from parsed tables.
    ///
    /// Fails if any table has a blank or duplicate id, or if a symptom
    /// mapping names an id that does not exist.
    pub fn from_data(data: ReferenceData) -> CarePathResult<Self> {
        let medicines = index_by_id("medicine", &data.medicines, |m| m.id.as_str())?;
        let home_care = index_by_id("home care", &data.home_care, |h| h.id.as_str())?;
        let natural_remedies =
            index_by_id("natural remedy", &data.natural_remedies, |n| n.id.as_str())?;

        for (symptom, mapping) in &data.symptoms {
            check_refs(symptom, "medicine", &mapping.medicines, &medicines)?;
            check_refs(symptom, "home care", &mapping.home_care, &home_care)?;
            check_refs(symptom, "natural remedy", &mapping.natural_remedies, &natural_remedies)?;
        }

        if data.emergency_conditions.iter().any(|c| c.trim().is_empty()) {
            return Err(reference_error("blank emergency condition".to_string()));
        }

        info!(
            medicines = medicines.len(),
            home_care = home_care.len(),
            natural_remedies = natural_remedies.len(),
            symptoms = data.symptoms.len(),
            emergency_conditions = data.emergency_conditions.len(),
            "reference data loaded"
        );

        Ok(Self {
            medicines,
            home_care,
            natural_remedies,
            symptoms: data.symptoms,
            emergency_conditions: data.emergency_conditions,
        })
    }

    /// Parse `s` as reference data TOML.
    ///
    /// Returns `CarePathError::ReferenceData` if the TOML is malformed, does
    /// not match the `ReferenceData` schema, or fails validation.
    pub fn from_toml_str(s: &str) -> CarePathResult<Self> {
        let data: ReferenceData = toml::from_str(s).map_err(|e| CarePathError::ReferenceData {
            reason: format!("failed to parse reference TOML: {}", e),
        })?;
        Self::from_data(data)
    }

    /// Read and parse the reference data file at `path`.
    pub fn from_file(path: &Path) -> CarePathResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CarePathError::ConfigError {
            reason: format!("failed to read reference file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The reference data shipped with the crate.
    pub fn embedded() -> CarePathResult<Self> {
        Self::from_toml_str(EMBEDDED_REFERENCE)
    }

    /// Symptom names that have a mapping, in sorted order.
    pub fn known_symptoms(&self) -> impl Iterator<Item = &str> {
        self.symptoms.keys().map(String::as_str)
    }

    fn mapping(&self, symptom: &str) -> Option<&SymptomMapping> {
        self.symptoms.get(symptom)
    }
}

impl ReferenceStore for TomlReferenceStore {
    fn medicines_for_symptom(&self, symptom: &str) -> Vec<String> {
        self.mapping(symptom).map(|m| m.medicines.clone()).unwrap_or_default()
    }

    fn home_care_for_symptom(&self, symptom: &str) -> Vec<String> {
        self.mapping(symptom).map(|m| m.home_care.clone()).unwrap_or_default()
    }

    fn natural_remedies_for_symptom(&self, symptom: &str) -> Vec<String> {
        self.mapping(symptom)
            .map(|m| m.natural_remedies.clone())
            .unwrap_or_default()
    }

    fn medicine(&self, id: &str) -> Option<Medicine> {
        self.medicines.get(id).cloned()
    }

    fn home_care(&self, id: &str) -> Option<HomeCareRemedy> {
        self.home_care.get(id).cloned()
    }

    fn natural_remedy(&self, id: &str) -> Option<NaturalRemedy> {
        self.natural_remedies.get(id).cloned()
    }

    fn emergency_conditions(&self) -> &BTreeSet<String> {
        &self.emergency_conditions
    }
}
