//! Political directory scenarios: conservation, oversight and coercion

use kolkhoz::core::config::SimConfig;
use kolkhoz::core::rng::{RandomSource, SeededRng};
use kolkhoz::core::types::{CitizenClass, Era, GridPos, SettlementTier, Tick};
use kolkhoz::directory::{role_range, PoliticalDirectory};
use kolkhoz::world::building::BuildingKind;
use kolkhoz::world::citizen::Citizen;
use kolkhoz::world::World;

fn settlement(population: usize) -> World {
    let mut world = World::new();
    world.spawn_building(BuildingKind::Farm, GridPos::new(0, 0));
    world.spawn_building(BuildingKind::Mine, GridPos::new(1, 0));
    world.spawn_building(BuildingKind::Workshop, GridPos::new(2, 0));
    world.spawn_building(BuildingKind::Housing, GridPos::new(3, 0));
    for _ in 0..population {
        world.spawn_citizen(Citizen::adult(CitizenClass::Worker));
    }
    world
}

/// Every drafted worker is either back, still scheduled, or a casualty
#[test]
fn test_conscription_conservation_over_long_run() {
    let world = settlement(200);
    let mut directory = PoliticalDirectory::new(SimConfig::default());
    let mut rng = SeededRng::new(99);

    for t in 1..=2000u64 {
        if t % 150 == 0 {
            let count = rng.int_range(2, 8) as u32;
            let permanent = rng.coin_flip(0.3);
            directory.queue_conscription(count, permanent, "The district calls".into());
        }
        if t % 400 == 0 {
            directory.queue_orgnabor(3, 250, "Labor lent to the canal project".into());
        }
        directory.tick(&world, t, None, Some(&mut rng));

        assert_eq!(
            directory.total_conscripted(),
            directory.total_returned()
                + directory.outstanding_returns()
                + directory.total_casualties(),
            "conservation violated at tick {t}"
        );
    }
    assert!(directory.total_conscripted() > 0, "scenario must draft");
    assert!(directory.total_returned() > 0, "some drafts must return");
}

/// Repeated syncs keep role counts inside the tier table, wartime included
#[test]
fn test_role_counts_converge_across_tier_changes() {
    let world = settlement(80);
    let mut directory = PoliticalDirectory::new(SimConfig::default());
    let mut rng = SeededRng::new(5);

    let schedule = [
        (SettlementTier::Selo, Era::Nep),
        (SettlementTier::Posyolok, Era::Collectivization),
        (SettlementTier::Gorod, Era::GreatPatrioticWar),
        (SettlementTier::Gorodok, Era::Reconstruction),
    ];
    for (tier, era) in schedule {
        directory.sync_entities(&world, tier, era, 0.0, 0, Some(&mut rng));
        for role in [
            kolkhoz::core::types::PoliticalRole::Politruk,
            kolkhoz::core::types::PoliticalRole::KgbAgent,
            kolkhoz::core::types::PoliticalRole::MilitaryOfficer,
            kolkhoz::core::types::PoliticalRole::ConscriptionOfficer,
        ] {
            let range = role_range(tier, role);
            let cap = if era.is_wartime() {
                range.max * 2 + 2
            } else {
                range.max + 2
            };
            let count = directory.role_count(role);
            assert!(
                count <= cap,
                "{:?} at {:?}/{:?}: {} exceeds cap {}",
                role,
                tier,
                era,
                count,
                cap
            );
        }
    }
}

/// Directives issued on a visit and left unfulfilled charge their penalty
#[test]
fn test_directive_expiry_charges_marks() {
    let world = settlement(40);
    let config = SimConfig::default();
    let mut directory = PoliticalDirectory::new(config.clone());
    // No random source: Raikom creation and visits are fully deterministic
    directory.sync_entities(&world, SettlementTier::Posyolok, Era::Nep, 0.0, 0, None);
    assert!(directory.raikom().is_some());

    let visit = config.raikom_visit_interval as Tick;
    let result = directory.tick(&world, visit, None, None);
    assert_eq!(result.directives_issued.len(), 1);
    let directive = result.directives_issued[0].clone();
    let marks_before = directory.black_marks();

    let result = directory.tick(&world, directive.deadline_tick + 1, None, None);
    assert_eq!(result.directives_expired.len(), 1);
    assert_eq!(result.directives_expired[0].id, directive.id);
    assert_eq!(
        directory.black_marks(),
        marks_before + directive.penalty_marks,
        "expiry charges exactly the directive's penalty"
    );
}

/// A fulfilled directive expires silently
#[test]
fn test_fulfilled_directive_charges_nothing() {
    let world = settlement(40);
    let config = SimConfig::default();
    let mut directory = PoliticalDirectory::new(config.clone());
    directory.sync_entities(&world, SettlementTier::Posyolok, Era::Nep, 0.0, 0, None);

    let visit = config.raikom_visit_interval as Tick;
    let result = directory.tick(&world, visit, None, None);
    let directive = result.directives_issued[0].clone();
    assert!(directory.fulfill_directive(directive.id));

    let result = directory.tick(&world, directive.deadline_tick + 1, None, None);
    assert!(result.directives_expired.is_empty());
    assert_eq!(result.black_marks, 0);
}

/// High blat eventually draws an investigation; modest blat never does
#[test]
fn test_blat_risk_scenario() {
    let world = settlement(40);
    let config = SimConfig::default();
    let mut directory = PoliticalDirectory::new(config.clone());
    let mut rng = SeededRng::new(2);

    for _ in 0..200 {
        assert!(
            directory
                .check_blat_kgb_risk(&world, config.blat_safe_threshold, &mut rng)
                .is_none(),
            "blat at the safe threshold must never trigger"
        );
    }

    // 100 blat is an 85% chance per check; some check in this window fires
    let mut triggered = false;
    for _ in 0..50 {
        if directory.check_blat_kgb_risk(&world, 100.0, &mut rng).is_some() {
            triggered = true;
            break;
        }
    }
    assert!(triggered, "reckless blat must draw attention");
    assert!(!directory.active_investigations().is_empty());
}

/// Coin flips that always land heads drive disloyal citizens out and
/// investigations into arrests; the state machines stay well-formed
struct AlwaysFires;

impl RandomSource for AlwaysFires {
    fn uniform(&mut self) -> f32 {
        0.0
    }
    fn int_range(&mut self, min: i64, _max: i64) -> i64 {
        min
    }
    fn weighted_index(&mut self, _weights: &[f32]) -> usize {
        2
    }
    fn coin_flip(&mut self, _probability: f32) -> bool {
        true
    }
    fn next_id(&mut self) -> u64 {
        0
    }
}

#[test]
fn test_forced_purge_arrests_workers() {
    let world = settlement(40);
    let config = SimConfig::default();
    let mut directory = PoliticalDirectory::new(config.clone());
    let mut force = AlwaysFires;
    // Weighted index 2 makes every opened investigation a purge
    directory.sync_entities(
        &world,
        SettlementTier::Gorodok,
        Era::GreatTerror,
        0.0,
        0,
        Some(&mut force),
    );
    assert!(!directory.active_investigations().is_empty());

    let mut arrests = 0;
    for t in 1..=(config.investigation_min_ticks as Tick + 1) {
        let result = directory.tick(&world, t, None, Some(&mut force));
        arrests += result.arrests;
    }
    assert!(
        arrests >= config.arrest_count * 3,
        "a purge with flagged workers must arrest at triple rate"
    );
}

/// Agents posted mid-run schedule their informants from the current tick,
/// not from the start of the simulation
#[test]
fn test_midrun_posting_defers_informant_reports() {
    let world = settlement(40);
    let mut directory = PoliticalDirectory::new(SimConfig::default());
    let mut force = AlwaysFires;

    let posted_at: Tick = 1000;
    directory.sync_entities(
        &world,
        SettlementTier::Gorodok,
        Era::GreatTerror,
        0.0,
        posted_at,
        Some(&mut force),
    );
    assert!(directory.informant_count() > 0, "arrivals plant informants");

    // int_range pinned to its minimum puts the first report 60 ticks out
    let mut early_flags = 0;
    for t in (posted_at + 1)..(posted_at + 60) {
        let result = directory.tick(&world, t, None, Some(&mut force));
        early_flags += result.informant_flags;
    }
    assert_eq!(early_flags, 0, "no reports before the scheduled window opens");

    let result = directory.tick(&world, posted_at + 60, None, Some(&mut force));
    assert!(result.informant_flags > 0, "first report lands on schedule");
}
