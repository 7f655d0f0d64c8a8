use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canteen {
    pub name: String,
    pub address: String,
    pub coordinates: (f64, f64),
}

// the feed carries no address/coordinate data, so canteen identity is the name
impl PartialEq for Canteen {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Canteen {}

impl Canteen {
    pub fn named(name: &str) -> Self {
        Canteen {
            name: name.to_string(),
            address: String::new(),
            coordinates: (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePair {
    pub student: f64,
    pub employee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u64,
    pub name: String,
    pub price: Option<PricePair>,
    pub ingredients: BTreeSet<Ingredient>,
    pub allergens: BTreeSet<Allergen>,
    pub image_url: Option<Url>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Pork,
    Beef,
    Poultry,
    Fish,
    Alcohol,
    Garlic,
    Vegetarian,
    Vegan,
}

impl Ingredient {
    /// Maps a detail-page list entry to its ingredient. The site vocabulary is
    /// closed; anything else is reported by the caller and dropped.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Menü enthält Schweinefleisch" => Some(Ingredient::Pork),
            "Menü enthält Rindfleisch" => Some(Ingredient::Beef),
            "Menü enthält Geflügel" => Some(Ingredient::Poultry),
            "Menü enthält Fisch" => Some(Ingredient::Fish),
            "Menü enthält Alkohol" => Some(Ingredient::Alcohol),
            "Menü enthält Knoblauch" => Some(Ingredient::Garlic),
            "Menü ist vegetarisch" => Some(Ingredient::Vegetarian),
            "Menü ist vegan" => Some(Ingredient::Vegan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Allergen {
    Gluten,
    Crustaceans,
    Eggs,
    Fish,
    Peanuts,
    Soy,
    Milk,
    Nuts,
    Celery,
    Mustard,
    Sesame,
    Sulfites,
    Lupin,
    Molluscs,
}

impl Allergen {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Glutenhaltiges Getreide (A)" => Some(Allergen::Gluten),
            "Krebstiere (B)" => Some(Allergen::Crustaceans),
            "Eier (C)" => Some(Allergen::Eggs),
            "Fisch (D)" => Some(Allergen::Fish),
            "Erdnüsse (E)" => Some(Allergen::Peanuts),
            "Soja (F)" => Some(Allergen::Soy),
            "Milch/Milchzucker (G)" => Some(Allergen::Milk),
            "Schalenfrüchte/Nüsse (H)" => Some(Allergen::Nuts),
            "Sellerie (I)" => Some(Allergen::Celery),
            "Senf (J)" => Some(Allergen::Mustard),
            "Sesam (K)" => Some(Allergen::Sesame),
            "Sulfit/Schwefeldioxid (L)" => Some(Allergen::Sulfites),
            "Lupine (M)" => Some(Allergen::Lupin),
            "Weichtiere (N)" => Some(Allergen::Molluscs),
            _ => None,
        }
    }
}

/// One fully-ingested state of the feed. `canteens` and `meals_by_canteen`
/// always carry the same set of names; the snapshot is only ever replaced as a
/// whole, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub canteens: Vec<Canteen>,
    pub meals_by_canteen: BTreeMap<String, Vec<Meal>>,
    pub last_updated: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn empty() -> Self {
        CatalogSnapshot {
            canteens: Vec::new(),
            meals_by_canteen: BTreeMap::new(),
            // infinitely stale until the first successful refresh
            last_updated: DateTime::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IngestionError {
    #[error("no response from the feed server")]
    Request,
    #[error("feed response was unusable")]
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("no response from the detail server")]
    Request,
    #[error("detail response was unusable")]
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no canteen with that name in the catalog")]
    UnknownCanteen,
    #[error("catalog data is outdated, refresh first")]
    OutdatedData,
}
