//! Narrative tiers and end-of-session results
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    FINAL_EXTRAORDINARY_AT, FINAL_GREAT_AT, FINAL_POSITIVE_AT, RANK_ADVOCATE_AT,
    RANK_CHAMPION_AT, RANK_VOLUNTEER_AT, STATUS_IMPROVING_AT, STATUS_NOTICEABLE_AT,
    STATUS_REMARKABLE_AT,
};
use crate::rules::GameRules;
use crate::state::PlayerState;

/// Day-end status of the city, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SustainabilityTier {
    Struggling,
    Improving,
    Noticeable,
    Remarkable,
}

impl SustainabilityTier {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Struggling => "Hong Kong is still facing significant environmental challenges.",
            Self::Improving => "Small improvements are visible in Hong Kong's environment.",
            Self::Noticeable => "Your efforts are making a noticeable difference in Hong Kong!",
            Self::Remarkable => {
                "Remarkable progress! Hong Kong is becoming a model for urban sustainability."
            }
        }
    }
}

impl fmt::Display for SustainabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Map an accumulated sustainability level to its narrative tier.
#[must_use]
pub fn sustainability_status(level: f64) -> SustainabilityTier {
    if level < STATUS_IMPROVING_AT {
        SustainabilityTier::Struggling
    } else if level < STATUS_NOTICEABLE_AT {
        SustainabilityTier::Improving
    } else if level < STATUS_REMARKABLE_AT {
        SustainabilityTier::Noticeable
    } else {
        SustainabilityTier::Remarkable
    }
}

/// Closing verdict shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalTier {
    Modest,
    Positive,
    Great,
    Extraordinary,
}

impl FinalTier {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Modest => {
                "Your efforts were modest, but every action counts in the fight for sustainability."
            }
            Self::Positive => "You've made a positive impact on Hong Kong's environment!",
            Self::Great => {
                "Great work! Your dedication has significantly improved Hong Kong's sustainability."
            }
            Self::Extraordinary => {
                "Extraordinary achievement! You've transformed Hong Kong into a beacon of urban sustainability."
            }
        }
    }
}

#[must_use]
pub fn final_tier(level: f64) -> FinalTier {
    if level < FINAL_POSITIVE_AT {
        FinalTier::Modest
    } else if level < FINAL_GREAT_AT {
        FinalTier::Positive
    } else if level < FINAL_EXTRAORDINARY_AT {
        FinalTier::Great
    } else {
        FinalTier::Extraordinary
    }
}

/// Badge earned from the final eco point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcoRank {
    Bystander,
    Volunteer,
    Advocate,
    Champion,
}

impl EcoRank {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bystander => "Bystander",
            Self::Volunteer => "Green Volunteer",
            Self::Advocate => "Eco Advocate",
            Self::Champion => "Sustainability Champion",
        }
    }
}

impl fmt::Display for EcoRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[must_use]
pub const fn eco_rank(points: i32) -> EcoRank {
    if points < RANK_VOLUNTEER_AT {
        EcoRank::Bystander
    } else if points < RANK_ADVOCATE_AT {
        EcoRank::Volunteer
    } else if points < RANK_CHAMPION_AT {
        EcoRank::Advocate
    } else {
        EcoRank::Champion
    }
}

/// Complete summary of a session for display on the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub name: String,
    pub days_played: u32,
    pub eco_points: i32,
    pub sustainability_level: f64,
    pub status: SustainabilityTier,
    pub final_tier: FinalTier,
    pub eco_rank: EcoRank,
}

impl ResultSummary {
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        self.final_tier.message()
    }
}

/// Build the summary from the final player state.
#[must_use]
pub fn result_summary(state: &PlayerState, rules: &GameRules) -> ResultSummary {
    ResultSummary {
        name: state.name.clone(),
        days_played: state.day.min(rules.horizon_days),
        eco_points: state.eco_points,
        sustainability_level: state.sustainability_level,
        status: sustainability_status(state.sustainability_level),
        final_tier: final_tier(state.sustainability_level),
        eco_rank: eco_rank(state.eco_points),
    }
}
