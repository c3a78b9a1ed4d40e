//! Educational facts and tips shown during play.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::LocationId;

const EMBEDDED_CONTENT: &str = include_str!("../assets/content.json");

static DEFAULT_CONTENT: Lazy<ContentData> = Lazy::new(|| {
    ContentData::from_json(EMBEDDED_CONTENT).unwrap_or_else(|err| {
        log::error!("embedded content is invalid: {err}");
        ContentData::default()
    })
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("failed to parse content: {0}")]
    Parse(String),
    #[error("content pool `{0}` is empty")]
    EmptyPool(&'static str),
}

/// General facts, tips, and per-location facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentData {
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub location_facts: BTreeMap<LocationId, Vec<String>>,
}

impl ContentData {
    /// Parse and validate content from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` for malformed JSON or
    /// `ContentError::EmptyPool` when facts or tips are missing.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Self =
            serde_json::from_str(json).map_err(|err| ContentError::Parse(err.to_string()))?;
        content.validate()?;
        Ok(content)
    }

    #[must_use]
    pub fn embedded() -> Self {
        DEFAULT_CONTENT.clone()
    }

    /// Facts and tips must be non-empty. Location pools are optional.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyPool` naming the empty pool.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.facts.is_empty() {
            return Err(ContentError::EmptyPool("facts"));
        }
        if self.tips.is_empty() {
            return Err(ContentError::EmptyPool("tips"));
        }
        Ok(())
    }

    #[must_use]
    pub fn facts_for(&self, location: LocationId) -> &[String] {
        self.location_facts
            .get(&location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
