use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{LOG_ACTION_APPLIED, LOG_DAY_ADVANCED, LOG_EXHAUSTED, LOG_TRAVELED};
use crate::data::{ActionEffect, Catalog};
use crate::rules::GameRules;

/// One of the five fixed places in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LocationId {
    #[default]
    Home,
    Work,
    Market,
    Beach,
    Park,
}

impl LocationId {
    pub const ALL: [Self; 5] = [Self::Home, Self::Work, Self::Market, Self::Beach, Self::Park];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Work => "work",
            Self::Market => "market",
            Self::Beach => "beach",
            Self::Park => "park",
        }
    }

    /// Capitalized name for headers and menus.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Work => "Work",
            Self::Market => "Market",
            Self::Beach => "Beach",
            Self::Park => "Park",
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "work" => Ok(Self::Work),
            "market" => Ok(Self::Market),
            "beach" => Ok(Self::Beach),
            "park" => Ok(Self::Park),
            _ => Err(()),
        }
    }
}

impl From<LocationId> for String {
    fn from(value: LocationId) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}

/// Result of applying one action to the player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    /// Deltas taken from the effect table.
    pub effect: ActionEffect,
    /// Energy after clamping.
    pub energy: i32,
    /// Energy hit zero and was reset to the exhaustion floor.
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAdvance {
    pub day: u32,
    pub energy: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelOutcome {
    pub from: LocationId,
    pub to: LocationId,
    pub energy: i32,
    pub exhausted: bool,
}

/// Mutable per-session player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub eco_points: i32,
    pub energy: i32,
    pub day: u32,
    pub sustainability_level: f64,
    pub location: LocationId,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(String::new(), &GameRules::default())
    }
}

impl PlayerState {
    #[must_use]
    pub fn new(name: impl Into<String>, rules: &GameRules) -> Self {
        Self {
            name: name.into(),
            eco_points: 0,
            energy: rules.starting_energy,
            day: 1,
            sustainability_level: 0.0,
            location: LocationId::Home,
        }
    }

    /// Apply the effect triple registered for `action`.
    ///
    /// The engine does not check that `action` is offered at the current
    /// location.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::UnknownAction` when the catalog has no effect for
    /// `action`; the state is left untouched.
    pub fn apply_action(
        &mut self,
        catalog: &Catalog,
        action: &str,
        rules: &GameRules,
    ) -> Result<ActionOutcome, ActionError> {
        let effect = catalog
            .effect(action)
            .ok_or_else(|| ActionError::UnknownAction(action.to_string()))?;

        self.eco_points = self.eco_points.saturating_add(effect.eco_points);
        self.sustainability_level += effect.sustainability;
        let (energy, exhausted) = rules.settle_energy(self.energy.saturating_add(effect.energy));
        self.energy = energy;

        log::debug!(
            target: LOG_ACTION_APPLIED,
            "{} performed {action}: eco {:+}, energy {:+}, sustainability {:+.1}",
            self.name,
            effect.eco_points,
            effect.energy,
            effect.sustainability
        );
        if exhausted {
            log::warn!(
                target: LOG_EXHAUSTED,
                "{} ran out of energy; reset to {}",
                self.name,
                rules.exhaustion_floor
            );
        }

        Ok(ActionOutcome {
            action: action.to_string(),
            effect: effect.clone(),
            energy,
            exhausted,
        })
    }

    /// Move to another location, paying the travel cost.
    pub fn travel(&mut self, to: LocationId, rules: &GameRules) -> TravelOutcome {
        let from = self.location;
        self.location = to;
        let (energy, exhausted) = rules.settle_energy(self.energy.saturating_sub(rules.travel_cost));
        self.energy = energy;
        log::debug!(target: LOG_TRAVELED, "{} traveled {from} -> {to}", self.name);
        TravelOutcome {
            from,
            to,
            energy,
            exhausted,
        }
    }

    /// Close the current day and recover energy up to the ceiling.
    pub fn advance_day(&mut self, rules: &GameRules) -> DayAdvance {
        self.day = self.day.saturating_add(1);
        self.energy = self
            .energy
            .saturating_add(rules.day_recovery)
            .min(rules.max_energy);
        log::debug!(
            target: LOG_DAY_ADVANCED,
            "{} starts day {} with {} energy",
            self.name,
            self.day,
            self.energy
        );
        DayAdvance {
            day: self.day,
            energy: self.energy,
        }
    }

    /// Whether the configured number of days has been played out.
    #[must_use]
    pub const fn is_past_horizon(&self, rules: &GameRules) -> bool {
        self.day > rules.horizon_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn scenario_catalog() -> Catalog {
        let mut catalog = Catalog::embedded();
        catalog
            .actions
            .insert("save_energy".to_string(), ActionEffect::new(5, -10, 0.5));
        catalog
    }

    #[test]
    fn fresh_state_defaults() {
        let state = PlayerState::new("Mei", &GameRules::default());
        assert_eq!(state.eco_points, 0);
        assert_eq!(state.energy, 100);
        assert_eq!(state.day, 1);
        assert_eq!(state.location, LocationId::Home);
        assert!(state.sustainability_level.abs() < EPS);
    }

    #[test]
    fn save_energy_applies_table_deltas() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        let outcome = state
            .apply_action(&scenario_catalog(), "save_energy", &rules)
            .unwrap();
        assert_eq!(state.eco_points, 5);
        assert_eq!(state.energy, 90);
        assert!((state.sustainability_level - 0.5).abs() < EPS);
        assert_eq!(outcome.effect.eco_points, 5);
        assert!(!outcome.exhausted);
    }

    #[test]
    fn exhaustion_resets_to_floor() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        state.energy = 5;
        let outcome = state
            .apply_action(&Catalog::embedded(), "clean_beach", &rules)
            .unwrap();
        assert_eq!(state.energy, 10);
        assert!(outcome.exhausted);
        assert_eq!(state.eco_points, 20);
    }

    #[test]
    fn unknown_action_leaves_state_untouched() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        let before = state.clone();
        let err = state
            .apply_action(&Catalog::embedded(), "fly_to_bali", &rules)
            .unwrap_err();
        assert_eq!(err, ActionError::UnknownAction("fly_to_bali".to_string()));
        assert_eq!(state, before);
    }

    #[test]
    fn energy_is_clamped_at_ceiling() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        state.energy = 80;
        state
            .apply_action(&Catalog::embedded(), "rest", &rules)
            .unwrap();
        assert_eq!(state.energy, 100);
    }

    #[test]
    fn every_action_moves_stats_by_its_deltas() {
        let rules = GameRules::default();
        let catalog = Catalog::embedded();
        for (id, effect) in &catalog.actions {
            let mut state = PlayerState::new("Mei", &rules);
            state.energy = 50;
            state.eco_points = 100;
            state.sustainability_level = 3.0;
            state.apply_action(&catalog, id, &rules).unwrap();
            assert_eq!(state.eco_points, 100 + effect.eco_points, "{id}");
            assert_eq!(state.energy, 50 + effect.energy, "{id}");
            assert!(
                (state.sustainability_level - (3.0 + effect.sustainability)).abs() < EPS,
                "{id}"
            );
        }
    }

    #[test]
    fn advance_day_recovers_energy() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        state.energy = 50;
        let advance = state.advance_day(&rules);
        assert_eq!(advance, DayAdvance { day: 2, energy: 80 });
    }

    #[test]
    fn advance_day_never_exceeds_ceiling() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        for start in [0, 10, 69, 70, 71, 100] {
            state.energy = start;
            let day = state.day;
            let advance = state.advance_day(&rules);
            assert!(advance.energy <= rules.max_energy);
            assert_eq!(advance.day, day + 1);
        }
    }

    #[test]
    fn travel_costs_energy_and_moves() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        let outcome = state.travel(LocationId::Beach, &rules);
        assert_eq!(outcome.from, LocationId::Home);
        assert_eq!(state.location, LocationId::Beach);
        assert_eq!(state.energy, 95);

        state.energy = 3;
        let outcome = state.travel(LocationId::Park, &rules);
        assert!(outcome.exhausted);
        assert_eq!(state.energy, 10);
    }

    #[test]
    fn horizon_check() {
        let rules = GameRules::default();
        let mut state = PlayerState::new("Mei", &rules);
        state.day = 7;
        assert!(!state.is_past_horizon(&rules));
        state.day = 8;
        assert!(state.is_past_horizon(&rules));
    }

    #[test]
    fn location_ids_roundtrip_through_strings() {
        for id in LocationId::ALL {
            assert_eq!(id.as_str().parse::<LocationId>(), Ok(id));
            assert_eq!(id.to_string(), id.as_str());
        }
        assert!("mall".parse::<LocationId>().is_err());
    }
}
