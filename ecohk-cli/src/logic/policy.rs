use std::fmt;

use ecohk_game::{GameSession, LocationId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Energy a conservative player keeps in reserve.
const CONSERVATIVE_RESERVE: i32 = 30;

/// One move a policy can make on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMove {
    /// 0-based index into the current location's actions.
    Act(usize),
    Travel(LocationId),
    EndDay,
}

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub turn: TurnMove,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(turn: TurnMove, rationale: Option<String>) -> Self {
        Self { turn, rationale }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose the next move for the session's current state.
    fn choose(&mut self, session: &GameSession) -> PolicyDecision;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameplayStrategy {
    Greedy,
    Conservative,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 3] = [Self::Greedy, Self::Conservative, Self::Random];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Conservative => "conservative",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greedy => "Greedy",
            Self::Conservative => "Conservative",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Greedy => "chase the highest eco points, travelling when needed",
            Self::Conservative => "keep an energy reserve and skip harmful actions",
            Self::Random => "seeded random moves",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Greedy => Box::new(GreedyPolicy),
            Self::Conservative => Box::new(ConservativePolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct GreedyPolicy;
struct ConservativePolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Best (location, index, points) across the whole catalog.
fn best_reward(session: &GameSession) -> Option<(LocationId, usize, i32)> {
    let catalog = session.catalog();
    LocationId::ALL
        .into_iter()
        .flat_map(|id| {
            catalog
                .actions_at(id)
                .iter()
                .enumerate()
                .filter_map(move |(idx, action)| {
                    catalog.effect(action).map(|e| (id, idx, e.eco_points))
                })
        })
        .max_by_key(|(id, _, points)| (*points, *id == session.state().location))
}

impl PlayerPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn choose(&mut self, session: &GameSession) -> PolicyDecision {
        match best_reward(session) {
            Some((id, idx, points)) if points > 0 => {
                if id == session.state().location {
                    PolicyDecision::new(TurnMove::Act(idx), Some(format!("reward {points}")))
                } else {
                    PolicyDecision::new(TurnMove::Travel(id), Some(format!("heading to {id}")))
                }
            }
            _ => PolicyDecision::new(TurnMove::EndDay, None),
        }
    }
}

impl PlayerPolicy for ConservativePolicy {
    fn name(&self) -> &'static str {
        "Conservative"
    }

    fn choose(&mut self, session: &GameSession) -> PolicyDecision {
        let energy = session.state().energy;
        let catalog = session.catalog();
        let safest = session
            .available_actions()
            .iter()
            .enumerate()
            .filter_map(|(idx, action)| catalog.effect(action).map(|e| (idx, e)))
            .filter(|(_, e)| !e.is_harmful() && e.eco_points > 0)
            .filter(|(_, e)| energy.saturating_add(e.energy) >= CONSERVATIVE_RESERVE)
            .max_by(|(_, a), (_, b)| a.sustainability.total_cmp(&b.sustainability));

        match safest {
            Some((idx, effect)) => PolicyDecision::new(
                TurnMove::Act(idx),
                Some(format!("sustainability {:+.1}", effect.sustainability)),
            ),
            None => PolicyDecision::new(TurnMove::EndDay, Some(format!("resting at {energy}"))),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn choose(&mut self, session: &GameSession) -> PolicyDecision {
        let actions = session.available_actions().len();
        let roll = self.rng.gen_range(0..10);
        if roll == 0 || actions == 0 {
            return PolicyDecision::new(TurnMove::EndDay, None);
        }
        if roll == 1 {
            let here = session.state().location;
            let others: Vec<LocationId> =
                LocationId::ALL.into_iter().filter(|id| *id != here).collect();
            let to = others[self.rng.gen_range(0..others.len())];
            return PolicyDecision::new(TurnMove::Travel(to), None);
        }
        PolicyDecision::new(TurnMove::Act(self.rng.gen_range(0..actions)), None)
    }
}
