use std::collections::BTreeMap;

use ecohk_game::{GameEngine, GameSession, ResultSummary, SessionError};
use serde::Serialize;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision, TurnMove};

/// Moves a policy may make before the day is ended for it.
pub const MAX_TURNS_PER_DAY: u32 = 12;

/// Configuration for one automated run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub max_turns_per_day: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_turns_per_day: MAX_TURNS_PER_DAY,
        }
    }

    #[must_use]
    pub const fn with_max_turns_per_day(mut self, turns: u32) -> Self {
        self.max_turns_per_day = turns;
        self
    }
}

/// Outcome of one seed played by one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub actions_taken: u32,
    pub travels: u32,
    pub exhaustions: u32,
    pub forced_day_ends: u32,
    pub summary: ResultSummary,
}

/// Play a whole session with the configured strategy.
///
/// # Errors
///
/// Propagates session errors other than rejected moves, which only end the
/// day.
pub fn run_simulation(
    engine: &GameEngine,
    config: SimulationConfig,
) -> Result<RunRecord, SessionError> {
    let name = format!("{} bot", config.strategy.label());
    let mut session = engine.create_session(&name, config.seed)?;
    let mut policy = config.strategy.create_policy(config.seed);
    let mut record = RunRecord {
        strategy: config.strategy,
        seed: config.seed,
        actions_taken: 0,
        travels: 0,
        exhaustions: 0,
        forced_day_ends: 0,
        summary: session.summary(),
    };

    while !session.is_over() {
        play_day(&mut session, policy.as_mut(), config, &mut record);
        session.end_day()?;
    }

    record.summary = session.summary();
    log::info!(
        "{} seed {}: {} eco points, sustainability {:.1}",
        config.strategy,
        config.seed,
        record.summary.eco_points,
        record.summary.sustainability_level
    );
    Ok(record)
}

fn play_day(
    session: &mut GameSession,
    policy: &mut dyn PlayerPolicy,
    config: SimulationConfig,
    record: &mut RunRecord,
) {
    for _ in 0..config.max_turns_per_day {
        let PolicyDecision { turn, rationale } = policy.choose(session);
        log::debug!(
            "day {} {}: {turn:?} ({})",
            session.state().day,
            policy.name(),
            rationale.as_deref().unwrap_or("-")
        );
        let result = match turn {
            TurnMove::EndDay => return,
            TurnMove::Act(idx) => session.perform_action_at(idx).map(|outcome| {
                record.actions_taken += 1;
                if outcome.exhausted {
                    record.exhaustions += 1;
                }
            }),
            TurnMove::Travel(to) => session.travel(to).map(|outcome| {
                record.travels += 1;
                if outcome.exhausted {
                    record.exhaustions += 1;
                }
            }),
        };
        if let Err(err) = result {
            log::debug!("{} move rejected: {err}", policy.name());
            return;
        }
    }
    record.forced_day_ends += 1;
}

/// Run every strategy against every seed, strategies in the order given.
///
/// # Errors
///
/// Fails on the first run that fails.
pub fn run_matrix(
    engine: &GameEngine,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
    max_turns_per_day: u32,
) -> Result<Vec<RunRecord>, SessionError> {
    let mut records = Vec::with_capacity(strategies.len() * seeds.len());
    for &strategy in strategies {
        for &seed in seeds {
            let config =
                SimulationConfig::new(strategy, seed).with_max_turns_per_day(max_turns_per_day);
            records.push(run_simulation(engine, config)?);
        }
    }
    Ok(records)
}

/// Per-strategy statistics over all of its runs.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAggregate {
    pub strategy: GameplayStrategy,
    pub runs: u32,
    pub mean_eco_points: f64,
    pub std_eco_points: f64,
    pub mean_sustainability: f64,
    pub std_sustainability: f64,
    pub best_eco_points: i32,
    pub worst_eco_points: i32,
    pub mean_actions: f64,
    pub mean_exhaustions: f64,
    pub remarkable_rate: f64,
}

#[must_use]
pub fn aggregate_runs(records: &[RunRecord]) -> Vec<StrategyAggregate> {
    let mut builders: BTreeMap<GameplayStrategy, AggregateBuilder> = BTreeMap::new();
    for record in records {
        builders
            .entry(record.strategy)
            .or_insert_with(|| AggregateBuilder::new(record.strategy))
            .ingest(record);
    }
    builders
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

struct AggregateBuilder {
    strategy: GameplayStrategy,
    eco_points: RunningStats,
    sustainability: RunningStats,
    best: i32,
    worst: i32,
    actions: u32,
    exhaustions: u32,
    remarkable: u32,
}

impl AggregateBuilder {
    const fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            eco_points: RunningStats::new(),
            sustainability: RunningStats::new(),
            best: i32::MIN,
            worst: i32::MAX,
            actions: 0,
            exhaustions: 0,
            remarkable: 0,
        }
    }

    fn ingest(&mut self, record: &RunRecord) {
        let summary = &record.summary;
        self.eco_points.add(f64::from(summary.eco_points));
        self.sustainability.add(summary.sustainability_level);
        self.best = self.best.max(summary.eco_points);
        self.worst = self.worst.min(summary.eco_points);
        self.actions = self.actions.saturating_add(record.actions_taken);
        self.exhaustions = self.exhaustions.saturating_add(record.exhaustions);
        if summary.status == ecohk_game::SustainabilityTier::Remarkable {
            self.remarkable += 1;
        }
    }

    fn finish(self) -> StrategyAggregate {
        let runs = self.eco_points.count;
        let per_run = |total: u32| {
            if runs == 0 {
                0.0
            } else {
                f64::from(total) / f64::from(runs)
            }
        };
        StrategyAggregate {
            strategy: self.strategy,
            runs,
            mean_eco_points: self.eco_points.mean(),
            std_eco_points: self.eco_points.std_dev(),
            mean_sustainability: self.sustainability.mean(),
            std_sustainability: self.sustainability.std_dev(),
            best_eco_points: self.best,
            worst_eco_points: self.worst,
            mean_actions: per_run(self.actions),
            mean_exhaustions: per_run(self.exhaustions),
            remarkable_rate: per_run(self.remarkable),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn std_dev(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / f64::from(self.count - 1)).sqrt()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecohk_game::{EmbeddedLoader, GameRules, SustainabilityTier};

    fn engine() -> GameEngine {
        GameEngine::load(&EmbeddedLoader, GameRules::default()).unwrap()
    }

    #[test]
    fn every_strategy_finishes_the_week() {
        let engine = engine();
        for strategy in GameplayStrategy::ALL {
            let record = run_simulation(&engine, SimulationConfig::new(strategy, 1337)).unwrap();
            assert_eq!(record.summary.days_played, 7, "{strategy}");
        }
    }

    #[test]
    fn greedy_outscores_random_on_average() {
        let engine = engine();
        let records = run_matrix(
            &engine,
            &[GameplayStrategy::Greedy, GameplayStrategy::Random],
            &[1, 2, 3, 4],
            MAX_TURNS_PER_DAY,
        )
        .unwrap();
        let aggregates = aggregate_runs(&records);
        assert_eq!(aggregates.len(), 2);
        assert!(aggregates[0].mean_eco_points > aggregates[1].mean_eco_points);
    }

    #[test]
    fn greedy_week_is_deterministic() {
        let engine = engine();
        let record = run_simulation(
            &engine,
            SimulationConfig::new(GameplayStrategy::Greedy, 9).with_max_turns_per_day(3),
        )
        .unwrap();
        // Travel once, then two conservation shifts on day one and three a day after.
        assert_eq!(record.travels, 1);
        assert_eq!(record.actions_taken, 20);
        assert_eq!(record.summary.eco_points, 500);
        assert_eq!(record.summary.status, SustainabilityTier::Remarkable);
        assert_eq!(record.forced_day_ends, 7);
    }

    #[test]
    fn conservative_never_takes_harmful_actions() {
        let engine = engine();
        let record =
            run_simulation(&engine, SimulationConfig::new(GameplayStrategy::Conservative, 4))
                .unwrap();
        assert_eq!(record.exhaustions, 0);
        assert!(record.summary.eco_points > 0);
        assert!(record.summary.sustainability_level > 0.0);
    }

    #[test]
    fn matrix_has_one_record_per_seed_and_strategy() {
        let engine = engine();
        let records = run_matrix(&engine, &GameplayStrategy::ALL, &[5, 6], 4).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].strategy, GameplayStrategy::Greedy);
        assert_eq!(records[5].seed, 6);
        let aggregates = aggregate_runs(&records);
        assert!(aggregates.iter().all(|a| a.runs == 2));
        assert!(aggregates.iter().all(|a| a.best_eco_points >= a.worst_eco_points));
    }

    #[test]
    fn running_stats_matches_sample_std() {
        let mut stats = RunningStats::new();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.add(value);
        }
        assert!((stats.mean() - 5.0).abs() < 1e-9);
        assert!((stats.std_dev() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-9);
    }
}
