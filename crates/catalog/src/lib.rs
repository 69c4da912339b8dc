pub mod video;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

pub use video::{DEFAULT_VIDEO_URL, VideoPanel, video_for};

const BUILTIN_COUNTRIES_JSON: &str = include_str!("../data/countries.json");

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn lat_lng(self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    pub capital: String,
    /// Free text, e.g. "84 milyon".
    pub population: String,
    pub language: String,
    pub currency: String,
    pub description: String,
    pub fun_fact: String,
    pub flag_image_url: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Country {
    /// Spoken summary for the info panel's listen action.
    pub fn narration(&self) -> String {
        format!(
            "{name} hakkında bilgi. {name} ülkesinin başkenti {capital}. Nüfusu {population}. {description} İlginç bilgi: {fun_fact}",
            name = self.name,
            capital = self.capital,
            population = self.population,
            description = self.description,
            fun_fact = self.fun_fact,
        )
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("country table is malformed: {0}")]
    Malformed(String),
    #[error("country table is empty")]
    Empty,
    #[error("duplicate country id: {0}")]
    DuplicateId(String),
    #[error("country {0} has out-of-range coordinates")]
    InvalidCoordinates(String),
}

/// Immutable, ordered set of countries keyed by a stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    countries: Vec<Country>,
    by_id: BTreeMap<String, usize>,
}

impl Catalog {
    pub fn new(countries: Vec<Country>) -> Result<Self, CatalogError> {
        if countries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_id = BTreeMap::new();
        for (idx, country) in countries.iter().enumerate() {
            let Coordinates { lat, lng } = country.coordinates;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(CatalogError::InvalidCoordinates(country.id.clone()));
            }
            if by_id.insert(country.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(country.id.clone()));
            }
        }

        Ok(Self { countries, by_id })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let countries: Vec<Country> =
            serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        Self::new(countries)
    }

    /// The compiled-in country table, parsed once per process.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| {
            Catalog::from_json(BUILTIN_COUNTRIES_JSON)
                .expect("compiled-in country table must be valid")
        })
    }

    pub fn get(&self, id: &str) -> Option<&Country> {
        self.by_id.get(id).map(|&idx| &self.countries[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Countries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> + '_ {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
