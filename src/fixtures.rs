//! Fixtures
//!
//! Catalogues can be described in YAML and loaded from a fixture directory:
//!
//! ```yaml
//! currency: GBP
//! items:
//!   A: { name: Apple, rule: [25, 3, 2, 0] }
//!   B: [40, 3, 0, 100]
//! ```
//!
//! Each rule is `[unit price, group size, offer quantity charged, offer group price]`.

use std::{collections::BTreeMap, fs, path::PathBuf};

use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalogue::{Catalogue, CatalogueError, PricingRule},
    codes::ItemCode,
    engine::BasketEngine,
    error::ErrorKind,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The catalogue described by the fixture is invalid
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

impl FixtureError {
    /// Taxonomy kind for this error, if it has one. Reading and parsing
    /// failures sit outside the engine's taxonomy.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FixtureError::Io(_) | FixtureError::Yaml(_) => None,
            FixtureError::UnknownCurrency(_) => Some(ErrorKind::InvalidConfiguration),
            FixtureError::Catalogue(err) => Some(err.kind()),
        }
    }
}

/// Catalogue description in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogueFixture {
    /// Display currency code, `GBP` if omitted
    #[serde(default)]
    pub currency: Option<String>,

    /// Map of item code -> item fixture
    pub items: BTreeMap<String, ItemFixture>,
}

/// Item entry in YAML: either a bare rule or a named rule.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemFixture {
    /// `[price, group size, offer quantity, offer price]`
    Rule(Vec<i64>),

    /// Rule with a display name
    Named {
        /// Item name
        name: String,

        /// Pricing rule fields
        rule: Vec<i64>,
    },
}

impl CatalogueFixture {
    /// Validate the fixture and build the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown currency or any catalogue rule violation.
    pub fn try_into_catalogue(self) -> Result<Catalogue, FixtureError> {
        let currency = match self.currency.as_deref() {
            Some(code) => parse_currency(code)?,
            None => GBP,
        };

        let items = self
            .items
            .into_iter()
            .map(|(code, fixture)| -> Result<_, CatalogueError> {
                let code: ItemCode = code.parse()?;

                let (name, fields) = match fixture {
                    ItemFixture::Rule(fields) => (code.to_string(), fields),
                    ItemFixture::Named { name, rule } => (name, rule),
                };

                PricingRule::try_from(fields.as_slice())?.into_item(code, name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalogue::from_items(items)?.with_currency(currency))
    }
}

/// Parse a currency code
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than `GBP`, `USD` or `EUR`.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a catalogue from YAML text
///
/// # Errors
///
/// Returns an error if the YAML is malformed or describes an invalid catalogue.
pub fn parse_catalogue(contents: &str) -> Result<Catalogue, FixtureError> {
    let fixture: CatalogueFixture = serde_norway::from_str(contents)?;

    fixture.try_into_catalogue()
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of the catalogue file for a fixture set
    pub fn catalogue_path(&self, name: &str) -> PathBuf {
        self.base_path
            .join("catalogues")
            .join(format!("{name}.yml"))
    }

    /// Load a catalogue from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// catalogue it describes is invalid.
    pub fn load_catalogue(&self, name: &str) -> Result<Catalogue, FixtureError> {
        let contents = fs::read_to_string(self.catalogue_path(name))?;

        parse_catalogue(&contents)
    }

    /// Load a catalogue and create an empty engine over it
    ///
    /// # Errors
    ///
    /// See [`Fixture::load_catalogue`].
    pub fn engine(&self, name: &str) -> Result<BasketEngine, FixtureError> {
        Ok(BasketEngine::new(self.load_catalogue(name)?))
    }

    /// Load the engine for a fixture set from the default base path
    ///
    /// # Errors
    ///
    /// See [`Fixture::load_catalogue`].
    pub fn from_set(name: &str) -> Result<BasketEngine, FixtureError> {
        Self::new().engine(name)
    }
}
