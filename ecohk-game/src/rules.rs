//! Runtime-tunable energy and session rules.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DAY_RECOVERY, EXHAUSTION_FLOOR, HORIZON_DAYS, HORIZON_DAYS_CEILING, MAX_ENERGY,
    MAX_ENERGY_CEILING, STARTING_ENERGY, TRAVEL_COST,
};

/// Errors raised while validating [`GameRules`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("failed to parse rules: {0}")]
    Parse(String),
}

/// Energy and session-length rules applied by the state engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub starting_energy: i32,
    pub max_energy: i32,
    pub exhaustion_floor: i32,
    pub day_recovery: i32,
    pub travel_cost: i32,
    pub horizon_days: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_energy: STARTING_ENERGY,
            max_energy: MAX_ENERGY,
            exhaustion_floor: EXHAUSTION_FLOOR,
            day_recovery: DAY_RECOVERY,
            travel_cost: TRAVEL_COST,
            horizon_days: HORIZON_DAYS,
        }
    }
}

impl GameRules {
    /// Parse rules from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::Parse` on malformed JSON and a range violation when
    /// any field is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Self =
            serde_json::from_str(json).map_err(|err| RulesError::Parse(err.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Validate every field against its documented bounds.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::RangeViolation` naming the first offending field.
    pub fn validate(&self) -> Result<(), RulesError> {
        check_range("max_energy", self.max_energy, 1, MAX_ENERGY_CEILING)?;
        check_range("starting_energy", self.starting_energy, 1, self.max_energy)?;
        check_range("exhaustion_floor", self.exhaustion_floor, 1, self.max_energy)?;
        check_range("day_recovery", self.day_recovery, 0, self.max_energy)?;
        check_range("travel_cost", self.travel_cost, 0, self.max_energy)?;
        check_range(
            "horizon_days",
            i64::from(self.horizon_days),
            1,
            i64::from(HORIZON_DAYS_CEILING),
        )?;
        Ok(())
    }

    /// Bring a raw energy value back inside `[exhaustion_floor, max_energy]`
    /// when it dropped to zero, or clamp it at the ceiling.
    ///
    /// Returns the settled energy and whether the exhaustion reset fired.
    #[must_use]
    pub const fn settle_energy(&self, raw: i32) -> (i32, bool) {
        if raw <= 0 {
            (self.exhaustion_floor, true)
        } else if raw > self.max_energy {
            (self.max_energy, false)
        } else {
            (raw, false)
        }
    }
}

fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), RulesError>
where
    T: Into<i64> + Copy,
{
    let value: i64 = value.into();
    let min: i64 = min.into();
    let max: i64 = max.into();
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RulesError::RangeViolation {
            field,
            min,
            max,
            value,
        })
    }
}
