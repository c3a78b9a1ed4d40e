//! Hong Kong Sustainability Challenge Game Engine
//!
//! Platform-agnostic core logic for the sustainability challenge: the player
//! state engine, the action and location tables, non-repeating fact/tip
//! selection, and per-player sessions. No UI or I/O lives here.

pub mod constants;
pub mod content;
pub mod data;
pub mod picker;
pub mod result;
pub mod rules;
pub mod session;
pub mod state;

use std::sync::Arc;

// Re-export commonly used types
pub use content::{ContentData, ContentError};
pub use data::{ActionEffect, Catalog, CatalogError, LocationSpec};
pub use picker::{ContentPicker, LocationPicker, ShownSet, pick};
pub use result::{
    EcoRank, FinalTier, ResultSummary, SustainabilityTier, eco_rank, final_tier, result_summary,
    sustainability_status,
};
pub use rules::{GameRules, RulesError};
pub use session::{DayReport, GameSession, SessionError, SessionId, SessionRegistry};
pub use state::{ActionError, ActionOutcome, DayAdvance, LocationId, PlayerState, TravelOutcome};

/// Trait for abstracting where the static tables and content come from.
/// Platform-specific implementations should provide this
pub trait ContentLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the location and action tables
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load the fact and tip pools
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded or fails validation.
    fn load_content(&self) -> Result<ContentData, Self::Error>;
}

/// Serves the data compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

/// The compiled-in tables or pools did not validate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbeddedDataError {
    #[error("embedded catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("embedded content: {0}")]
    Content(#[from] ContentError),
}

impl ContentLoader for EmbeddedLoader {
    type Error = EmbeddedDataError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        checked_catalog(Catalog::embedded())
    }

    fn load_content(&self) -> Result<ContentData, Self::Error> {
        checked_content(ContentData::embedded())
    }
}

fn checked_catalog(catalog: Catalog) -> Result<Catalog, EmbeddedDataError> {
    catalog.validate()?;
    Ok(catalog)
}

fn checked_content(content: ContentData) -> Result<ContentData, EmbeddedDataError> {
    content.validate()?;
    Ok(content)
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError<E: std::error::Error + 'static> {
    #[error("failed to load game data")]
    Load(#[source] E),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Main game engine holding the loaded data shared by every session
#[derive(Debug, Clone)]
pub struct GameEngine {
    catalog: Arc<Catalog>,
    content: Arc<ContentData>,
    rules: GameRules,
}

impl GameEngine {
    /// Load data through `loader` and validate `rules`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Load` when the loader fails and
    /// `EngineError::Rules` when the rules are out of bounds.
    pub fn load<L: ContentLoader>(
        loader: &L,
        rules: GameRules,
    ) -> Result<Self, EngineError<L::Error>> {
        rules.validate()?;
        let catalog = loader.load_catalog().map_err(EngineError::Load)?;
        let content = loader.load_content().map_err(EngineError::Load)?;
        Ok(Self::from_parts(catalog, content, rules))
    }

    #[must_use]
    pub fn from_parts(catalog: Catalog, content: ContentData, rules: GameRules) -> Self {
        Self {
            catalog: Arc::new(catalog),
            content: Arc::new(content),
            rules,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn content(&self) -> &ContentData {
        &self.content
    }

    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Create a session for one player
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BlankName` for a blank player name.
    pub fn create_session(&self, name: &str, seed: u64) -> Result<GameSession, SessionError> {
        GameSession::new(
            name,
            seed,
            Arc::clone(&self.catalog),
            Arc::clone(&self.content),
            self.rules,
        )
    }

    /// Create an empty registry bound to this engine's data
    #[must_use]
    pub fn registry(&self) -> SessionRegistry {
        SessionRegistry::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.content),
            self.rules,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default)]
    struct BrokenLoader;

    impl ContentLoader for BrokenLoader {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Err(CatalogError::MissingLocation(LocationId::Park))
        }

        fn load_content(&self) -> Result<ContentData, Self::Error> {
            Ok(ContentData::embedded())
        }
    }

    #[test]
    fn engine_creates_sessions_from_embedded_data() {
        let engine = GameEngine::load(&EmbeddedLoader, GameRules::default()).unwrap();
        let mut session = engine.create_session("Mei", 0xABCD).unwrap();
        session.perform_action_at(2).unwrap();
        assert_eq!(session.state().energy, 100);
        assert_eq!(engine.catalog().actions.len(), 23);
    }

    #[test]
    fn engine_surfaces_loader_failures() {
        let err = GameEngine::load(&BrokenLoader, GameRules::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Load(CatalogError::MissingLocation(LocationId::Park))
        ));
    }

    #[test]
    fn embedded_loader_validates_its_data() {
        assert_eq!(
            checked_catalog(Catalog::default()),
            Err(EmbeddedDataError::Catalog(CatalogError::MissingLocation(
                LocationId::Home
            )))
        );
        assert_eq!(
            checked_content(ContentData::default()),
            Err(EmbeddedDataError::Content(ContentError::EmptyPool("facts")))
        );
        assert!(EmbeddedLoader.load_catalog().is_ok());
        assert!(EmbeddedLoader.load_content().is_ok());
    }

    #[test]
    fn engine_rejects_invalid_rules() {
        let rules = GameRules {
            max_energy: 0,
            ..GameRules::default()
        };
        assert!(matches!(
            GameEngine::load(&EmbeddedLoader, rules),
            Err(EngineError::Rules(_))
        ));
    }

    #[test]
    fn registry_shares_engine_data() {
        let engine = GameEngine::load(&EmbeddedLoader, GameRules::default()).unwrap();
        let mut registry = engine.registry();
        let id = registry.start("Kai", 3).unwrap();
        assert_eq!(registry.get(id).unwrap().available_actions().len(), 4);
    }
}
