//! Plant catalog: the static table of plant records.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{HerbviewError, Result};
use crate::plant::{Category, PlantRecord};

/// Records shipped with the crate.
const BUILTIN_PLANTS: &str = include_str!("../data/plants.json");

/// Category filter for [`PlantCatalog::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every plant matches.
    #[default]
    All,
    /// Only plants tagged with the category match.
    Only(Category),
}

impl CategoryFilter {
    /// Parses a filter label; "All" (any case) selects everything.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        if label.trim().eq_ignore_ascii_case("all") {
            Some(CategoryFilter::All)
        } else {
            Category::from_label(label).map(CategoryFilter::Only)
        }
    }

    fn matches(self, record: &PlantRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.has_category(category),
        }
    }
}

/// Plant records keyed by slug, kept in authoring order.
#[derive(Debug, Clone, Default)]
pub struct PlantCatalog {
    plants: Vec<PlantRecord>,
    by_slug: HashMap<String, usize>,
}

impl PlantCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_PLANTS)
    }

    /// Parses a JSON array of plant records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<PlantRecord> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Reads a JSON array of plant records from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&text)?;
        log::info!(
            "loaded {} plants from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Adds a record.
    ///
    /// Returns an error if a record with the same slug already exists.
    pub fn insert(&mut self, record: PlantRecord) -> Result<()> {
        if self.by_slug.contains_key(record.slug()) {
            return Err(HerbviewError::DuplicatePlant(record.slug().to_string()));
        }
        self.by_slug
            .insert(record.slug().to_string(), self.plants.len());
        self.plants.push(record);
        Ok(())
    }

    /// Gets a record by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&PlantRecord> {
        self.by_slug.get(slug).map(|&i| &self.plants[i])
    }

    /// Gets a record by slug, failing with [`HerbviewError::UnknownPlant`].
    pub fn require(&self, slug: &str) -> Result<&PlantRecord> {
        self.get(slug)
            .ok_or_else(|| HerbviewError::UnknownPlant(slug.to_string()))
    }

    /// Looks up the 3D asset for a plant.
    ///
    /// `Ok(None)` means the plant exists but has no model.
    pub fn model_asset(&self, slug: &str) -> Result<Option<&str>> {
        Ok(self.require(slug)?.model_asset())
    }

    /// Returns plants whose name contains `term` (case-insensitive) and that
    /// pass `filter`, in catalog order. An empty term matches every name.
    #[must_use]
    pub fn search(&self, term: &str, filter: CategoryFilter) -> Vec<&PlantRecord> {
        let needle = term.trim().to_lowercase();
        self.plants
            .iter()
            .filter(|p| p.name().to_lowercase().contains(&needle))
            .filter(|p| filter.matches(p))
            .collect()
    }

    /// Returns an iterator over all records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PlantRecord> {
        self.plants.iter()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}
