use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::LocationId;

const EMBEDDED_CATALOG: &str = include_str!("../assets/catalog.json");

static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(EMBEDDED_CATALOG).unwrap_or_else(|err| {
        log::error!("embedded catalog is invalid: {err}");
        Catalog::default()
    })
});

/// Errors raised while loading or validating a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    #[error("location `{0}` is missing from the catalog")]
    MissingLocation(LocationId),
    #[error("location `{0}` offers no actions")]
    EmptyLocation(LocationId),
    #[error("location `{location}` references unknown action `{action}`")]
    UnknownActionReference {
        location: LocationId,
        action: String,
    },
}

/// Fixed numeric effect of an action on the player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ActionEffect {
    #[serde(default)]
    pub eco_points: i32,
    #[serde(default)]
    pub energy: i32,
    #[serde(default)]
    pub sustainability: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ActionEffect {
    #[must_use]
    pub fn new(eco_points: i32, energy: i32, sustainability: f64) -> Self {
        Self {
            eco_points,
            energy,
            sustainability,
            description: String::new(),
        }
    }

    /// Net-negative actions trade the environment for convenience.
    #[must_use]
    pub fn is_harmful(&self) -> bool {
        self.eco_points < 0 || self.sustainability < 0.0
    }
}

/// A place the player can visit and the actions it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub description: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Static locations table paired with the action effect table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub locations: BTreeMap<LocationId, LocationSpec>,
    pub actions: BTreeMap<String, ActionEffect>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or the first
    /// validation failure.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    #[must_use]
    pub fn embedded() -> Self {
        DEFAULT_CATALOG.clone()
    }

    /// Check that every location exists, offers something, and only refers to
    /// actions present in the effect table.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found, in location order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for id in LocationId::ALL {
            let spec = self
                .locations
                .get(&id)
                .ok_or(CatalogError::MissingLocation(id))?;
            if spec.actions.is_empty() {
                return Err(CatalogError::EmptyLocation(id));
            }
            if let Some(action) = spec.actions.iter().find(|a| !self.actions.contains_key(*a)) {
                return Err(CatalogError::UnknownActionReference {
                    location: id,
                    action: action.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn effect(&self, action: &str) -> Option<&ActionEffect> {
        self.actions.get(action)
    }

    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&LocationSpec> {
        self.locations.get(&id)
    }

    /// Ordered action ids offered at `id`; empty for an unknown location.
    #[must_use]
    pub fn actions_at(&self, id: LocationId) -> &[String] {
        self.locations
            .get(&id)
            .map(|spec| spec.actions.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn offers(&self, id: LocationId, action: &str) -> bool {
        self.actions_at(id).iter().any(|a| a == action)
    }

    /// Human readable label, e.g. `save_energy` becomes `Save Energy`.
    #[must_use]
    pub fn action_label(action: &str) -> String {
        action
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect::<String>()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
