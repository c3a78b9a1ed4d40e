//! Per-player sessions and the registry that keys them.
//!
//! A [`GameSession`] is the object a presentation layer holds for one player:
//! it owns the mutable [`PlayerState`], the content pickers, and a seeded RNG,
//! and shares the immutable catalog and content with every other session.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::LOG_SESSION;
use crate::content::ContentData;
use crate::data::Catalog;
use crate::picker::{ContentPicker, LocationPicker};
use crate::result::{ResultSummary, SustainabilityTier, result_summary, sustainability_status};
use crate::rules::GameRules;
use crate::state::{ActionError, ActionOutcome, LocationId, PlayerState, TravelOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("player name must not be blank")]
    BlankName,
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("`{action}` is not available at {location}")]
    ActionUnavailable {
        action: String,
        location: LocationId,
    },
    #[error("action number {index} is out of range ({available} available)")]
    InvalidActionIndex { index: usize, available: usize },
    #[error("location number {0} is out of range")]
    InvalidLocationIndex(usize),
    #[error("already at {0}")]
    AlreadyThere(LocationId),
    #[error("the game is over")]
    GameOver,
}

/// What ending a day produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub ended_day: u32,
    pub day: u32,
    pub energy: i32,
    pub eco_points: i32,
    pub sustainability_level: f64,
    pub status: SustainabilityTier,
    pub fact: Option<String>,
}

/// One player's game, from name entry to results.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: PlayerState,
    rules: GameRules,
    catalog: Arc<Catalog>,
    content: Arc<ContentData>,
    facts: ContentPicker,
    tips: ContentPicker,
    location_facts: LocationPicker,
    rng: ChaCha20Rng,
    seed: u64,
    quit: bool,
}

impl GameSession {
    /// Start a session at day 1, at home, with full energy.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BlankName` when `name` is empty or whitespace.
    pub fn new(
        name: &str,
        seed: u64,
        catalog: Arc<Catalog>,
        content: Arc<ContentData>,
        rules: GameRules,
    ) -> Result<Self, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::BlankName);
        }
        log::info!(target: LOG_SESSION, "starting session for {name} (seed {seed})");
        Ok(Self {
            state: PlayerState::new(name, &rules),
            rules,
            catalog,
            content,
            facts: ContentPicker::new(),
            tips: ContentPicker::new(),
            location_facts: LocationPicker::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
            quit: false,
        })
    }

    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Run out of days or quit.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.quit || self.state.is_past_horizon(&self.rules)
    }

    /// Actions offered where the player currently stands.
    #[must_use]
    pub fn available_actions(&self) -> &[String] {
        self.catalog.actions_at(self.state.location)
    }

    /// Description of the current location.
    #[must_use]
    pub fn location_description(&self) -> &str {
        self.catalog
            .location(self.state.location)
            .map_or("", |spec| spec.description.as_str())
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.is_over() {
            Err(SessionError::GameOver)
        } else {
            Ok(())
        }
    }

    /// Apply any catalogued action without checking the current location.
    ///
    /// # Errors
    ///
    /// `SessionError::GameOver` after the horizon, or the wrapped
    /// `ActionError::UnknownAction`.
    pub fn apply_action(&mut self, action: &str) -> Result<ActionOutcome, SessionError> {
        self.ensure_running()?;
        Ok(self.state.apply_action(&self.catalog, action, &self.rules)?)
    }

    /// Apply an action offered at the current location.
    ///
    /// # Errors
    ///
    /// `SessionError::ActionUnavailable` when the location does not offer it.
    pub fn perform_action(&mut self, action: &str) -> Result<ActionOutcome, SessionError> {
        self.ensure_running()?;
        if !self.catalog.offers(self.state.location, action) {
            return Err(SessionError::ActionUnavailable {
                action: action.to_string(),
                location: self.state.location,
            });
        }
        self.apply_action(action)
    }

    /// Apply the `index`-th (0-based) action of the current location.
    ///
    /// # Errors
    ///
    /// `SessionError::InvalidActionIndex` when `index` is out of range.
    pub fn perform_action_at(&mut self, index: usize) -> Result<ActionOutcome, SessionError> {
        self.ensure_running()?;
        let actions = self.catalog.actions_at(self.state.location);
        let action = actions
            .get(index)
            .cloned()
            .ok_or(SessionError::InvalidActionIndex {
                index,
                available: actions.len(),
            })?;
        self.apply_action(&action)
    }

    /// Travel to another location.
    ///
    /// # Errors
    ///
    /// `SessionError::AlreadyThere` when `to` is the current location.
    pub fn travel(&mut self, to: LocationId) -> Result<TravelOutcome, SessionError> {
        self.ensure_running()?;
        if to == self.state.location {
            return Err(SessionError::AlreadyThere(to));
        }
        Ok(self.state.travel(to, &self.rules))
    }

    /// Travel by 0-based position in [`LocationId::ALL`].
    ///
    /// # Errors
    ///
    /// `SessionError::InvalidLocationIndex` when `index` is out of range.
    pub fn travel_to_index(&mut self, index: usize) -> Result<TravelOutcome, SessionError> {
        let to = LocationId::ALL
            .get(index)
            .copied()
            .ok_or(SessionError::InvalidLocationIndex(index))?;
        self.travel(to)
    }

    /// Close the day: recover energy, report status, and show a fact.
    ///
    /// # Errors
    ///
    /// `SessionError::GameOver` once the horizon has passed.
    pub fn end_day(&mut self) -> Result<DayReport, SessionError> {
        self.ensure_running()?;
        let ended_day = self.state.day;
        let advance = self.state.advance_day(&self.rules);
        let fact = self.random_fact();
        Ok(DayReport {
            ended_day,
            day: advance.day,
            energy: advance.energy,
            eco_points: self.state.eco_points,
            sustainability_level: self.state.sustainability_level,
            status: sustainability_status(self.state.sustainability_level),
            fact,
        })
    }

    pub fn random_fact(&mut self) -> Option<String> {
        self.facts
            .pick(&self.content.facts, &mut self.rng)
            .map(str::to_string)
    }

    pub fn random_tip(&mut self) -> Option<String> {
        self.tips
            .pick(&self.content.tips, &mut self.rng)
            .map(str::to_string)
    }

    /// A fact tied to the current location, if any exist.
    pub fn location_fact(&mut self) -> Option<String> {
        let location = self.state.location;
        self.location_facts
            .pick(location, self.content.facts_for(location), &mut self.rng)
            .map(str::to_string)
    }

    /// Stop the session early.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        result_summary(&self.state, &self.rules)
    }
}

/// Opaque key handed to a presentation layer (e.g. stored in a cookie).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s-{:06}", self.0)
    }
}

/// Sessions keyed by id, sharing one catalog and content set.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    content: Arc<ContentData>,
    rules: GameRules,
    sessions: BTreeMap<SessionId, GameSession>,
    next_id: u64,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, content: Arc<ContentData>, rules: GameRules) -> Self {
        Self {
            catalog,
            content,
            rules,
            sessions: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Open a new session and return its key.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError::BlankName`.
    pub fn start(&mut self, name: &str, seed: u64) -> Result<SessionId, SessionError> {
        let session = GameSession::new(
            name,
            seed,
            Arc::clone(&self.catalog),
            Arc::clone(&self.content),
            self.rules,
        )?;
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, session);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<&GameSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut GameSession> {
        self.sessions.get_mut(&id)
    }

    /// Remove a session and return its final results.
    pub fn finish(&mut self, id: SessionId) -> Option<ResultSummary> {
        let session = self.sessions.remove(&id)?;
        let summary = session.summary();
        log::info!(
            target: LOG_SESSION,
            "session {id} finished: {} eco points, sustainability {:.1}",
            summary.eco_points,
            summary.sustainability_level
        );
        Some(summary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
