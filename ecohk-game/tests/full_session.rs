use ecohk_game::{
    Catalog, ContentData, EmbeddedLoader, FinalTier, GameEngine, GameRules, LocationId,
    SessionError, SustainabilityTier,
};

fn engine() -> GameEngine {
    GameEngine::load(&EmbeddedLoader, GameRules::default()).unwrap()
}

#[test]
fn full_week_keeps_energy_in_bounds() {
    let engine = engine();
    for seed in 0..16_u64 {
        let mut session = engine.create_session("Mei", seed).unwrap();
        let mut day = session.state().day;
        while !session.is_over() {
            for index in 0..session.available_actions().len() {
                session.perform_action_at(index).unwrap();
                let energy = session.state().energy;
                assert!((1..=100).contains(&energy), "energy {energy} out of bounds");
            }
            let next = LocationId::ALL[(day as usize) % LocationId::ALL.len()];
            if next != session.state().location {
                session.travel(next).unwrap();
            }
            let report = session.end_day().unwrap();
            assert_eq!(report.day, day + 1);
            assert!(report.energy <= 100);
            day = report.day;
        }
        assert_eq!(session.state().day, 8);
        assert_eq!(session.summary().days_played, 7);
    }
}

#[test]
fn green_week_reaches_remarkable_status() {
    let engine = engine();
    let mut session = engine.create_session("Kai", 7).unwrap();
    session.travel(LocationId::Beach).unwrap();
    while !session.is_over() {
        for _ in 0..3 {
            session.perform_action("join_conservation").unwrap();
        }
        session.end_day().unwrap();
    }
    let summary = session.summary();
    assert!((summary.sustainability_level - 25.2).abs() < 1e-9);
    assert_eq!(summary.eco_points, 525);
    assert_eq!(summary.status, SustainabilityTier::Remarkable);
    assert_eq!(summary.final_tier, FinalTier::Great);
}

#[test]
fn convenience_week_loses_points() {
    let engine = engine();
    let mut session = engine.create_session("Ren", 3).unwrap();
    session.travel(LocationId::Market).unwrap();
    while !session.is_over() {
        session.perform_action("buy_fast_fashion").unwrap();
        session.end_day().unwrap();
    }
    let summary = session.summary();
    assert_eq!(summary.eco_points, -210);
    assert_eq!(summary.status, SustainabilityTier::Struggling);
    assert_eq!(summary.final_tier, FinalTier::Modest);
}

#[test]
fn custom_catalog_drives_the_save_energy_scenario() {
    let mut catalog = Catalog::embedded();
    let effect = catalog.actions.get_mut("save_energy").unwrap();
    effect.eco_points = 5;
    effect.energy = -10;
    effect.sustainability = 0.5;
    let engine = GameEngine::from_parts(catalog, ContentData::embedded(), GameRules::default());

    let mut session = engine.create_session("Mei", 1).unwrap();
    session.perform_action("save_energy").unwrap();
    let state = session.state();
    assert_eq!(state.eco_points, 5);
    assert_eq!(state.energy, 90);
    assert!((state.sustainability_level - 0.5).abs() < 1e-9);
}

#[test]
fn shorter_horizon_from_rules() {
    let rules = GameRules::from_json(r#"{ "horizon_days": 2, "day_recovery": 20 }"#).unwrap();
    let engine = GameEngine::load(&EmbeddedLoader, rules).unwrap();
    let mut session = engine.create_session("Mei", 1).unwrap();
    session.travel(LocationId::Beach).unwrap();
    session.perform_action("join_conservation").unwrap();
    let report = session.end_day().unwrap();
    assert_eq!(report.energy, 80);
    session.end_day().unwrap();
    assert!(session.is_over());
    assert_eq!(session.travel(LocationId::Home), Err(SessionError::GameOver));
}

#[test]
fn every_fact_is_seen_before_any_repeat() {
    let engine = engine();
    let pool = engine.content().facts.len();
    let mut session = engine.create_session("Mei", 99).unwrap();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..pool {
        assert!(seen.insert(session.random_fact().unwrap()));
    }
    assert_eq!(seen.len(), pool);
}
