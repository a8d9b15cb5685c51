//! Plant records.
//!
//! A [`PlantRecord`] can only be obtained through validation, so every
//! record in a catalog is known to carry all of its attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HerbviewError, Result};

/// Therapeutic category used by the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Digestion")]
    Digestion,
    #[serde(rename = "Immunity")]
    Immunity,
    #[serde(rename = "Skin & Hair")]
    SkinAndHair,
    #[serde(rename = "Diabetes")]
    Diabetes,
    #[serde(rename = "Heart & Blood pressure")]
    HeartAndBloodPressure,
}

impl Category {
    /// All categories in filter order.
    pub const ALL: [Category; 5] = [
        Category::Digestion,
        Category::Immunity,
        Category::SkinAndHair,
        Category::Diabetes,
        Category::HeartAndBloodPressure,
    ];

    /// Returns display name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Digestion => "Digestion",
            Category::Immunity => "Immunity",
            Category::SkinAndHair => "Skin & Hair",
            Category::Diabetes => "Diabetes",
            Category::HeartAndBloodPressure => "Heart & Blood pressure",
        }
    }

    /// Parses a display name. Case-insensitive.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Uses of a plant in the three AYUSH systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyushApplication {
    pub ayurveda: String,
    pub unani: String,
    pub siddha: String,
}

/// Unvalidated plant attributes, as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantData {
    pub slug: String,
    pub name: String,
    pub family: String,
    pub genus: String,
    /// Short size used on catalog cards, e.g. "60 cm".
    pub size_summary: String,
    /// Full size sentence used on the detail page.
    pub size: String,
    pub native_region: String,
    pub climate: String,
    pub sunlight: String,
    pub soil: String,
    pub part_used: Vec<String>,
    pub active_compounds: Vec<String>,
    pub therapeutic_properties: Vec<String>,
    pub dosage_forms: Vec<String>,
    pub ayush_application: AyushApplication,
    pub health_benefits: Vec<String>,
    pub categories: Vec<Category>,
    /// Path of the pre-authored 3D asset, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_asset: Option<String>,
}

/// A validated plant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PlantData", into = "PlantData")]
pub struct PlantRecord {
    data: PlantData,
}

impl PlantRecord {
    /// Validates `data` and wraps it.
    pub fn new(data: PlantData) -> Result<Self> {
        validate(&data)?;
        Ok(Self { data })
    }

    /// Returns all attributes.
    #[must_use]
    pub fn data(&self) -> &PlantData {
        &self.data
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.data.slug
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    /// Returns the 3D asset path, if the plant has one.
    #[must_use]
    pub fn model_asset(&self) -> Option<&str> {
        self.data.model_asset.as_deref()
    }

    /// Returns whether the plant belongs to `category`.
    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.data.categories.contains(&category)
    }
}

impl TryFrom<PlantData> for PlantRecord {
    type Error = HerbviewError;

    fn try_from(data: PlantData) -> Result<Self> {
        Self::new(data)
    }
}

impl From<PlantRecord> for PlantData {
    fn from(record: PlantRecord) -> Self {
        record.data
    }
}

/// Returns whether `slug` is non-empty lowercase kebab-case.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate(data: &PlantData) -> Result<()> {
    let fail = |reason: String| {
        Err(HerbviewError::InvalidRecord {
            slug: data.slug.clone(),
            reason,
        })
    };

    if !is_valid_slug(&data.slug) {
        return fail("slug must be lowercase kebab-case".to_string());
    }

    let text_fields = [
        ("name", &data.name),
        ("family", &data.family),
        ("genus", &data.genus),
        ("sizeSummary", &data.size_summary),
        ("size", &data.size),
        ("nativeRegion", &data.native_region),
        ("climate", &data.climate),
        ("sunlight", &data.sunlight),
        ("soil", &data.soil),
        ("ayushApplication.ayurveda", &data.ayush_application.ayurveda),
        ("ayushApplication.unani", &data.ayush_application.unani),
        ("ayushApplication.siddha", &data.ayush_application.siddha),
    ];
    for (field, value) in text_fields {
        if value.trim().is_empty() {
            return fail(format!("'{field}' is empty"));
        }
    }

    let list_fields = [
        ("partUsed", &data.part_used),
        ("activeCompounds", &data.active_compounds),
        ("therapeuticProperties", &data.therapeutic_properties),
        ("dosageForms", &data.dosage_forms),
        ("healthBenefits", &data.health_benefits),
    ];
    for (field, values) in list_fields {
        if values.is_empty() {
            return fail(format!("'{field}' has no entries"));
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            return fail(format!("'{field}' contains an empty entry"));
        }
    }

    if data.categories.is_empty() {
        return fail("'categories' has no entries".to_string());
    }
    if data
        .model_asset
        .as_deref()
        .is_some_and(|path| path.trim().is_empty())
    {
        return fail("'modelAsset' is present but empty".to_string());
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_data() -> PlantData {
        PlantData {
            slug: "holy-basil".to_string(),
            name: "Holy Basil".to_string(),
            family: "Lamiaceae".to_string(),
            genus: "Ocimum".to_string(),
            size_summary: "60 cm".to_string(),
            size: "Typically grows up to 60 cm (2 feet) in height.".to_string(),
            native_region: "Indian subcontinent.".to_string(),
            climate: "Warm, tropical and subtropical climates.".to_string(),
            sunlight: "Full sun to partial shade.".to_string(),
            soil: "Well-drained, fertile soil rich in organic matter.".to_string(),
            part_used: vec!["Leaves".to_string()],
            active_compounds: vec!["Eugenol".to_string()],
            therapeutic_properties: vec![
                "Adaptogenic".to_string(),
                "Antioxidant".to_string(),
                "Anti-inflammatory".to_string(),
                "Immunomodulatory".to_string(),
            ],
            dosage_forms: vec!["Tea".to_string(), "Capsules".to_string()],
            ayush_application: AyushApplication {
                ayurveda: "Respiratory support.".to_string(),
                unani: "Cough and cold.".to_string(),
                siddha: "Mental clarity.".to_string(),
            },
            health_benefits: vec![
                "Reduces stress and anxiety levels.".to_string(),
                "Supports respiratory health and eases breathing.".to_string(),
                "Boosts immune system function.".to_string(),
            ],
            categories: vec![Category::Immunity, Category::HeartAndBloodPressure],
            model_asset: Some("assets/3dModels/HOLY BOSIL.glb".to_string()),
        }
    }

    #[test]
    fn test_valid_record() {
        let record = PlantRecord::new(sample_data()).unwrap();
        assert_eq!(record.slug(), "holy-basil");
        assert_eq!(record.name(), "Holy Basil");
        assert!(record.has_category(Category::Immunity));
        assert!(!record.has_category(Category::Diabetes));
        assert_eq!(record.model_asset(), Some("assets/3dModels/HOLY BOSIL.glb"));
    }

    #[test]
    fn test_rejects_empty_text() {
        let mut data = sample_data();
        data.soil = "   ".to_string();
        let err = PlantRecord::new(data).unwrap_err();
        assert!(err.to_string().contains("soil"));
    }

    #[test]
    fn test_rejects_empty_list() {
        let mut data = sample_data();
        data.dosage_forms.clear();
        assert!(PlantRecord::new(data).is_err());
    }

    #[test]
    fn test_rejects_bad_slug() {
        for slug in ["", "Holy Basil", "-neem", "neem-", "aloe--vera"] {
            let mut data = sample_data();
            data.slug = slug.to_string();
            assert!(PlantRecord::new(data).is_err(), "slug {slug:?} accepted");
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let mut value = serde_json::to_value(sample_data()).unwrap();
        value["partUsed"] = serde_json::json!([]);
        let result: std::result::Result<PlantRecord, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from_label("skin & hair"), Some(Category::SkinAndHair));
        assert_eq!(Category::from_label("All"), None);
        assert_eq!(
            serde_json::to_string(&Category::HeartAndBloodPressure).unwrap(),
            "\"Heart & Blood pressure\""
        );
    }
}
