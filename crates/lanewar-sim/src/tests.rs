//! Tests for the match engine: economy, spawning, combat, opponent and lifecycle.

use glam::DVec2;
use proptest::prelude::*;

use lanewar_core::catalog::{Catalog, UnitArchetype};
use lanewar_core::commands::{MatchCommand, SpawnResult};
use lanewar_core::components::Attack;
use lanewar_core::config::{Battlefield, MatchConfig};
use lanewar_core::constants::*;
use lanewar_core::enums::{Lane, Side};
use lanewar_core::error::{SpawnError, SpawnRejection};
use lanewar_core::events::MatchEvent;
use lanewar_core::types::UnitId;

use crate::economy::Ledger;
use crate::engine::MatchEngine;
use crate::systems::combat::{self, Action, Combatant};

const DT: f64 = MAX_FRAME_DT;

/// Default match with the opponent switched off and no opening jitter.
fn quiet_config() -> MatchConfig {
    let mut config = MatchConfig::default();
    config.opponent.enabled = false;
    config.opponent.opening_cooldown_jitter = 0.0;
    config
}

fn quiet_engine() -> MatchEngine {
    MatchEngine::new(quiet_config()).unwrap()
}

/// A single-archetype catalog: 50 damage every second, effectively unkillable.
fn siege_config() -> MatchConfig {
    let ram = UnitArchetype {
        id: "ram".into(),
        name: "Ram".into(),
        color: "#888888".into(),
        cost: 3.0,
        hp: 10_000.0,
        damage: 50.0,
        speed: 150.0,
        size: 10.0,
        range: 12.0,
        attack_interval: 1.0,
        spawn_cooldown: 0.0,
    };
    let mut config = quiet_config();
    config.catalog = Catalog::new(vec![ram]).unwrap();
    config
}

fn combatant(world: &mut hecs::World, id: u32, side: Side, lane: Lane, position: DVec2, hp: f64) -> Combatant {
    Combatant {
        entity: world.spawn(()),
        id: UnitId(id),
        side,
        lane,
        position,
        hp,
        attack: Attack {
            damage: 40.0,
            range: 16.0,
            interval: 0.9,
            last_attack: None,
        },
        speed: 50.0,
    }
}

fn snapshot_json(engine: &MatchEngine) -> String {
    serde_json::to_string(&engine.snapshot()).unwrap()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = MatchConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = MatchEngine::new(config.clone()).unwrap();
    let mut engine_b = MatchEngine::new(config).unwrap();

    for tick in 0..900 {
        if tick % 90 == 0 {
            let lane = Lane::from_index(tick / 90 % 3);
            let a = engine_a.attempt_spawn(Side::Player, "knight", lane).unwrap();
            let b = engine_b.attempt_spawn(Side::Player, "knight", lane).unwrap();
            assert_eq!(a, b);
        }
        let snap_a = engine_a.tick(DT);
        let snap_b = engine_b.tick(DT);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = MatchEngine::new(MatchConfig {
        seed: 111,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = MatchEngine::new(MatchConfig {
        seed: 222,
        ..Default::default()
    })
    .unwrap();

    let mut diverged = false;
    for _ in 0..900 {
        let json_a = serde_json::to_string(&engine_a.tick(DT)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT)).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent opponents");
}

#[test]
fn test_independent_matches_do_not_share_state() {
    let mut a = quiet_engine();
    let b = quiet_engine();
    a.attempt_spawn(Side::Player, "skirm", None).unwrap();
    a.advance(DT);
    assert_eq!(a.unit_count(), 1);
    assert_eq!(b.unit_count(), 0);
    assert_eq!(b.ledger().side(Side::Player).resource, STARTING_RESOURCE);
}

// ---- Economy ----

#[test]
fn test_regeneration_and_cap() {
    let mut engine = quiet_engine();
    engine.advance(0.5);
    let resource = engine.ledger().side(Side::Player).resource;
    assert!((resource - (STARTING_RESOURCE + 0.5 * RESOURCE_REGEN_RATE)).abs() < 1e-12);

    for _ in 0..1000 {
        engine.advance(DT);
    }
    for side in Side::ALL {
        assert_eq!(engine.ledger().side(side).resource, RESOURCE_CAP);
    }
}

#[test]
fn test_ledger_cooldowns_floor_at_zero() {
    let catalog = Catalog::standard();
    let mut ledger = Ledger::new(&Default::default(), &catalog);
    let giant = catalog.get("giant").unwrap();
    ledger.side_mut(Side::Player).resource = 10.0;
    ledger.charge(Side::Player, giant);
    assert_eq!(ledger.cooldown(Side::Player, "giant"), 5.0);
    assert!(!ledger.is_ready(Side::Player, giant));

    ledger.tick_cooldowns(Side::Player, 4.0);
    assert!((ledger.cooldown(Side::Player, "giant") - 1.0).abs() < 1e-12);
    ledger.tick_cooldowns(Side::Player, 4.0);
    assert_eq!(ledger.cooldown(Side::Player, "giant"), 0.0);
    assert!(ledger.is_ready(Side::Player, giant));
    // The other side is untouched.
    assert_eq!(ledger.cooldown(Side::Opponent, "giant"), 0.0);
}

#[test]
fn test_opening_cooldown_jitter_only_for_opponent() {
    let engine = MatchEngine::new(MatchConfig::default()).unwrap();
    let mut any_nonzero = false;
    for archetype in engine.catalog().iter() {
        let id = archetype.id.as_str();
        assert_eq!(engine.ledger().cooldown(Side::Player, id), 0.0);
        let cd = engine.ledger().cooldown(Side::Opponent, id);
        assert!((0.0..OPPONENT_OPENING_COOLDOWN_JITTER).contains(&cd));
        any_nonzero |= cd > 0.0;
    }
    assert!(any_nonzero);
}

// ---- Spawning ----

#[test]
fn test_exact_cost_spawn_empties_resource() {
    let mut config = quiet_config();
    config.economy.starting_resource = 3.0;
    let mut engine = MatchEngine::new(config).unwrap();

    let result = engine.attempt_spawn(Side::Player, "knight", None).unwrap();
    assert_eq!(result, SpawnResult::Spawned(UnitId(1)));
    assert_eq!(engine.ledger().side(Side::Player).resource, 0.0);
    assert_eq!(engine.ledger().cooldown(Side::Player, "knight"), 2.8);
    assert_eq!(engine.unit_count(), 1);
}

#[test]
fn test_successful_spawn_charges_exactly() {
    let mut engine = quiet_engine();
    let before = engine.ledger().side(Side::Player).resource;
    engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    assert_eq!(engine.ledger().side(Side::Player).resource, before - 2.0);
    assert_eq!(engine.ledger().cooldown(Side::Player, "skirm"), 1.8);
    // Other archetypes and the other side are unaffected.
    assert_eq!(engine.ledger().cooldown(Side::Player, "knight"), 0.0);
    assert_eq!(engine.ledger().side(Side::Opponent).resource, STARTING_RESOURCE);
}

#[test]
fn test_insufficient_resource_rejection_mutates_nothing() {
    let mut engine = quiet_engine();
    let ledger_before = engine.ledger().clone();

    let result = engine.attempt_spawn(Side::Player, "giant", Some(Lane::Left)).unwrap();
    assert_eq!(result, SpawnResult::Rejected(SpawnRejection::InsufficientResource));
    assert_eq!(engine.ledger(), &ledger_before);
    assert_eq!(engine.unit_count(), 0);

    let events = engine.drain_events();
    assert!(matches!(
        events.as_slice(),
        [MatchEvent::SpawnRejected {
            reason: SpawnRejection::InsufficientResource,
            ..
        }]
    ));
}

#[test]
fn test_on_cooldown_rejection_mutates_nothing() {
    let mut engine = quiet_engine();
    engine.select_lane(Lane::Right);
    engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    engine.select_lane(Lane::Left);
    let ledger_before = engine.ledger().clone();

    let result = engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    assert_eq!(result, SpawnResult::Rejected(SpawnRejection::OnCooldown));
    assert_eq!(engine.ledger(), &ledger_before);
    assert_eq!(engine.unit_count(), 1);
    // The pending lane selection survives a rejection.
    assert_eq!(engine.selected_lane(), Some(Lane::Left));
}

#[test]
fn test_afford_checked_before_cooldown() {
    let mut config = quiet_config();
    config.economy.starting_resource = 2.0;
    let mut engine = MatchEngine::new(config).unwrap();
    engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    // Now both broke and on cooldown: the resource check wins.
    let result = engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    assert_eq!(result, SpawnResult::Rejected(SpawnRejection::InsufficientResource));
}

#[test]
fn test_cooldown_expires() {
    let mut engine = quiet_engine();
    engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    let mut elapsed = 0.0;
    while elapsed < 1.9 {
        engine.advance(0.1);
        elapsed += 0.1;
    }
    assert_eq!(engine.ledger().cooldown(Side::Player, "skirm"), 0.0);
    assert!(engine
        .attempt_spawn(Side::Player, "skirm", None)
        .unwrap()
        .is_spawned());
}

#[test]
fn test_unknown_archetype_is_an_error() {
    let mut engine = quiet_engine();
    let ledger_before = engine.ledger().clone();
    let err = engine.attempt_spawn(Side::Player, "dragon", None).unwrap_err();
    assert_eq!(err, SpawnError::UnknownArchetype("dragon".into()));
    assert_eq!(engine.ledger(), &ledger_before);
    assert!(engine.force_spawn(Side::Player, "dragon", Lane::Left).is_err());
    assert_eq!(engine.unit_count(), 0);
}

#[test]
fn test_player_lane_resolution() {
    let mut config = quiet_config();
    config.economy.starting_resource = 10.0;
    let mut engine = MatchEngine::new(config).unwrap();

    engine.select_lane(Lane::Left);
    engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    // Selection consumed: next spawn defaults to the centre.
    engine.attempt_spawn(Side::Player, "knight", None).unwrap();
    // Explicit override wins over a pending selection.
    engine.select_lane(Lane::Left);
    engine.attempt_spawn(Side::Player, "archer", Some(Lane::Right)).unwrap();

    let lanes: Vec<Lane> = engine.snapshot().units.iter().map(|u| u.lane).collect();
    assert_eq!(lanes, vec![Lane::Left, Lane::Center, Lane::Right]);
    assert_eq!(engine.selected_lane(), None);
}

#[test]
fn test_spawn_position_and_ids() {
    let mut engine = quiet_engine();
    engine.force_spawn(Side::Player, "skirm", Lane::Center).unwrap();
    engine.force_spawn(Side::Opponent, "skirm", Lane::Center).unwrap();

    let snap = engine.snapshot();
    let field = Battlefield::default();
    assert_eq!(snap.units[0].id, UnitId(1));
    assert_eq!(snap.units[1].id, UnitId(2));
    assert_eq!(snap.units[0].position, field.spawn_point(Side::Player, Lane::Center));
    assert_eq!(snap.units[1].position, field.spawn_point(Side::Opponent, Lane::Center));
    assert_ne!(snap.units[0].position.x, snap.units[1].position.x);
    assert_eq!(snap.units[0].hp, snap.units[0].max_hp);
    assert_eq!(snap.units[0].name, "Skirm");
    assert!(!snap.units[0].is_ranged);
}

#[test]
fn test_force_spawn_bypasses_economy() {
    let mut engine = quiet_engine();
    for _ in 0..3 {
        engine.force_spawn(Side::Player, "giant", Lane::Right).unwrap();
    }
    assert_eq!(engine.unit_count(), 3);
    assert_eq!(engine.ledger().side(Side::Player).resource, STARTING_RESOURCE);
    // The cooldown still starts, so a normal spawn right after is refused.
    assert_eq!(engine.ledger().cooldown(Side::Player, "giant"), 5.0);
    assert_eq!(engine.ledger().cooldown(Side::Opponent, "giant"), 0.0);

    engine.force_spawn(Side::Player, "knight", Lane::Left).unwrap();
    let result = engine.attempt_spawn(Side::Player, "knight", None).unwrap();
    assert_eq!(result, SpawnResult::Rejected(SpawnRejection::OnCooldown));
}

#[test]
fn test_apply_command() {
    let mut engine = quiet_engine();
    let cmd: MatchCommand = serde_json::from_str(r#"{"type":"SelectLane","lane":2}"#).unwrap();
    assert_eq!(engine.apply_command(cmd).unwrap(), None);

    let result = engine
        .apply_command(MatchCommand::Spawn {
            archetype: "skirm".into(),
            lane: None,
        })
        .unwrap();
    assert_eq!(result, Some(SpawnResult::Spawned(UnitId(1))));
    assert_eq!(engine.snapshot().units[0].lane, Lane::Right);

    engine.apply_command(MatchCommand::Reset).unwrap();
    assert_eq!(engine.unit_count(), 0);
}

// ---- Combat ----

#[test]
fn test_target_tie_breaks_by_order() {
    let mut world = hecs::World::new();
    let units = vec![
        combatant(&mut world, 1, Side::Player, Lane::Center, DVec2::new(100.0, 100.0), 100.0),
        combatant(&mut world, 2, Side::Opponent, Lane::Center, DVec2::new(110.0, 100.0), 100.0),
        combatant(&mut world, 3, Side::Opponent, Lane::Center, DVec2::new(90.0, 100.0), 100.0),
    ];
    assert_eq!(combat::find_target(&units, 0), Some(1));
    assert_eq!(combat::find_target(&units, 2), Some(0));
}

#[test]
fn test_target_eligibility() {
    let mut world = hecs::World::new();
    let origin = DVec2::new(100.0, 400.0);
    let units = vec![
        combatant(&mut world, 1, Side::Player, Lane::Left, origin, 100.0),
        // Ally, closest.
        combatant(&mut world, 2, Side::Player, Lane::Left, origin + DVec2::new(1.0, 0.0), 100.0),
        // Enemy in another lane.
        combatant(&mut world, 3, Side::Opponent, Lane::Center, origin + DVec2::new(2.0, 0.0), 100.0),
        // Valid but far.
        combatant(&mut world, 4, Side::Opponent, Lane::Left, origin + DVec2::new(0.0, -200.0), 100.0),
        // Valid and nearer.
        combatant(&mut world, 5, Side::Opponent, Lane::Left, origin + DVec2::new(0.0, -50.0), 100.0),
    ];
    assert_eq!(combat::find_target(&units, 0), Some(4));
}

#[test]
fn test_no_enemy_means_no_target() {
    let mut world = hecs::World::new();
    let units = vec![combatant(&mut world, 1, Side::Player, Lane::Left, DVec2::ZERO, 100.0)];
    assert_eq!(combat::find_target(&units, 0), None);
}

#[test]
fn test_movement_toward_structure() {
    let mut engine = quiet_engine();
    engine.force_spawn(Side::Player, "skirm", Lane::Left).unwrap();
    let start = engine.snapshot().units[0].position;

    engine.advance(DT);

    let field = Battlefield::default();
    let goal = field.structure_position(Side::Opponent, Lane::Left);
    let expected = start + (goal - start).normalize() * 120.0 * DT;
    let actual = engine.snapshot().units[0].position;
    assert!(actual.distance(expected) < 1e-9, "{actual:?} != {expected:?}");
}

#[test]
fn test_structure_attack_and_recoil() {
    let mut world = hecs::World::new();
    let field = Battlefield::default();
    let catalog = Catalog::standard();
    let mut ledger = Ledger::new(&Default::default(), &catalog);
    let goal = field.structure_position(Side::Opponent, Lane::Right);
    let start = goal + DVec2::new(0.0, 20.0);
    let mut units = vec![combatant(&mut world, 1, Side::Player, Lane::Right, start, 100.0)];
    let mut events = Vec::new();

    let actions = combat::step(&mut units, &mut ledger, &field, 1.0, DT, &mut events);
    assert_eq!(actions, vec![Action::AttackStructure { fired: true }]);
    assert_eq!(ledger.side(Side::Opponent).structures, [1000.0, 1000.0, 960.0]);
    assert_eq!(units[0].attack.last_attack, Some(1.0));
    assert!(units[0].position.distance(start + DVec2::new(0.0, RECOIL_DISTANCE)) < 1e-9);
    assert_eq!(
        events,
        vec![MatchEvent::StructureDamaged {
            side: Side::Opponent,
            lane: Lane::Right,
            damage: 40.0,
            remaining: 960.0,
        }]
    );

    // Still in range but the attack clock has not run out.
    let actions = combat::step(&mut units, &mut ledger, &field, 1.5, DT, &mut events);
    assert_eq!(actions, vec![Action::AttackStructure { fired: false }]);
    assert_eq!(ledger.side(Side::Opponent).structures[2], 960.0);

    let actions = combat::step(&mut units, &mut ledger, &field, 2.0, DT, &mut events);
    assert_eq!(actions, vec![Action::AttackStructure { fired: true }]);
    assert_eq!(ledger.side(Side::Opponent).structures[2], 920.0);
}

#[test]
fn test_killed_unit_does_not_act() {
    let mut world = hecs::World::new();
    let field = Battlefield::default();
    let catalog = Catalog::standard();
    let mut ledger = Ledger::new(&Default::default(), &catalog);
    let mut units = vec![
        combatant(&mut world, 1, Side::Player, Lane::Center, DVec2::new(240.0, 400.0), 100.0),
        combatant(&mut world, 2, Side::Opponent, Lane::Center, DVec2::new(240.0, 390.0), 40.0),
    ];
    let mut events = Vec::new();

    let actions = combat::step(&mut units, &mut ledger, &field, 0.5, DT, &mut events);
    assert_eq!(actions[0], Action::AttackUnit { target: 1, fired: true });
    assert_eq!(actions[1], Action::None);
    assert_eq!(units[1].hp, 0.0);
    assert_eq!(units[0].hp, 100.0);
}

#[test]
fn test_corpse_absorbs_later_attack() {
    let mut world = hecs::World::new();
    let field = Battlefield::default();
    let catalog = Catalog::standard();
    let mut ledger = Ledger::new(&Default::default(), &catalog);
    let structure = field.structure_position(Side::Opponent, Lane::Center);
    let corpse_at = structure + DVec2::new(0.0, 20.0);
    let mut units = vec![
        combatant(&mut world, 1, Side::Player, Lane::Center, corpse_at + DVec2::new(0.0, 10.0), 100.0),
        combatant(&mut world, 2, Side::Opponent, Lane::Center, corpse_at, 10.0),
        // Within reach of both the doomed unit and the structure.
        combatant(&mut world, 3, Side::Player, Lane::Center, corpse_at + DVec2::new(10.0, 5.0), 100.0),
    ];
    assert!(units[2].position.distance(structure) <= 16.0 + STRUCTURE_PROXIMITY_ALLOWANCE);
    let mut events = Vec::new();

    let actions = combat::step(&mut units, &mut ledger, &field, 0.5, DT, &mut events);
    assert_eq!(
        actions,
        vec![
            Action::AttackUnit { target: 1, fired: true },
            Action::None,
            Action::AttackUnit { target: 1, fired: true },
        ]
    );
    assert_eq!(units[1].hp, -70.0);
    assert_eq!(ledger.side(Side::Opponent).structures, [STRUCTURE_START_HP; 3]);
    assert!(events.is_empty());
}

#[test]
fn test_cleanup_removes_dead_units() {
    let mut engine = quiet_engine();
    engine.force_spawn(Side::Player, "giant", Lane::Left).unwrap();
    engine.force_spawn(Side::Opponent, "skirm", Lane::Left).unwrap();
    engine.drain_events();

    let mut destroyed = Vec::new();
    for _ in 0..2000 {
        let snap = engine.tick(DT);
        for event in snap.events {
            if let MatchEvent::UnitDestroyed { unit_id, side, .. } = event {
                destroyed.push((unit_id, side));
            }
        }
        assert!(snap.units.iter().all(|u| u.hp > 0.0));
        if !destroyed.is_empty() {
            break;
        }
    }
    assert_eq!(destroyed, vec![(UnitId(2), Side::Opponent)]);
    assert_eq!(engine.unit_count(), 1);
}

#[test]
fn test_siege_destroys_structure_in_twenty_hits() {
    let mut engine = MatchEngine::new(siege_config()).unwrap();
    engine.force_spawn(Side::Player, "ram", Lane::Left).unwrap();

    let mut hit_times = Vec::new();
    let mut ended = None;
    for _ in 0..100_000 {
        let snap = engine.tick(DT);
        for event in &snap.events {
            match event {
                MatchEvent::StructureDamaged { side, lane, damage, .. } => {
                    assert_eq!(*side, Side::Opponent);
                    assert_eq!(*lane, Lane::Left);
                    assert_eq!(*damage, 50.0);
                    hit_times.push(snap.time.elapsed_secs);
                }
                MatchEvent::MatchEnded { .. } => ended = Some(event.clone()),
                _ => {}
            }
        }
        if !snap.running {
            break;
        }
    }

    assert_eq!(hit_times.len(), 20);
    for pair in hit_times.windows(2) {
        assert!(pair[1] - pair[0] >= 1.0, "attacks closer than the interval: {pair:?}");
    }
    assert_eq!(engine.ledger().side(Side::Opponent).structures, [0.0, 1000.0, 1000.0]);
    assert!(!engine.is_running());
    assert_eq!(engine.winner(), Some(Side::Player));
    assert_eq!(
        ended,
        Some(MatchEvent::MatchEnded {
            winner: Side::Player,
            destroyed_side: Side::Opponent,
            destroyed_lane: Lane::Left,
        })
    );
}

#[test]
fn test_symmetric_duel() {
    let mut engine = quiet_engine();
    let p = engine.force_spawn(Side::Player, "knight", Lane::Center).unwrap();
    let o = engine.force_spawn(Side::Opponent, "knight", Lane::Center).unwrap();

    // Each selects the other, not the structure.
    let units = combat::gather(engine.world());
    assert_eq!(combat::find_target(&units, 0), Some(1));
    assert_eq!(combat::find_target(&units, 1), Some(0));

    let field = Battlefield::default();
    let mut survivor = None;
    for _ in 0..5000 {
        let snap = engine.tick(DT);
        assert!(
            !snap.events.iter().any(|e| matches!(e, MatchEvent::StructureDamaged { .. })),
            "structures must not be hit while the duel lasts"
        );
        if snap.units.len() == 2 {
            let (a, b) = (&snap.units[0], &snap.units[1]);
            assert!((a.hp - b.hp).abs() <= 48.0, "damage diverged: {} vs {}", a.hp, b.hp);
        } else {
            assert_eq!(snap.units.len(), 1);
            survivor = Some(snap.units[0].clone());
            break;
        }
    }

    let survivor = survivor.expect("one knight should fall");
    assert!(survivor.id == p || survivor.id == o);
    assert!(survivor.hp > 0.0 && survivor.hp < survivor.max_hp);

    // Next tick the survivor heads for the enemy structure in its lane.
    let goal = field.structure_position(survivor.side.other(), Lane::Center);
    let before = survivor.position.distance(goal);
    let snap = engine.tick(DT);
    let after = snap.units[0].position.distance(goal);
    assert!(after < before);
    assert_eq!(combat::find_target(&combat::gather(engine.world()), 0), None);
}

// ---- Opponent ----

#[test]
fn test_opponent_unaffordable_decision_changes_nothing() {
    let mut config = MatchConfig::default();
    config.economy.starting_resource = 0.0;
    config.economy.regen_rate = 0.0;
    config.opponent.opening_cooldown_jitter = 0.0;
    let mut engine = MatchEngine::new(config).unwrap();
    let first_due = engine.opponent_clock().next_decision_at;

    let mut ticks = 0;
    while engine.opponent_clock().next_decision_at == first_due {
        let ledger_before = engine.ledger().clone();
        engine.advance(0.1);
        ticks += 1;
        assert!(ticks < 100);
        assert_eq!(engine.ledger(), &ledger_before);
        assert_eq!(engine.unit_count(), 0);
    }

    let now = engine.time().elapsed_secs;
    assert!(now >= first_due);
    let next = engine.opponent_clock().next_decision_at;
    assert!(next >= now + OPPONENT_DECISION_INTERVAL_MIN);
    assert!(next <= now + OPPONENT_DECISION_INTERVAL_MAX);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_opponent_deploys_through_spawn_path() {
    let mut engine = MatchEngine::new(MatchConfig::default()).unwrap();
    let mut opponent_spawns = 0;
    for _ in 0..600 {
        let snap = engine.tick(DT);
        for event in &snap.events {
            if let MatchEvent::UnitSpawned { side, archetype, .. } = event {
                assert_eq!(*side, Side::Opponent);
                assert!(engine.catalog().get(archetype.as_str()).is_ok());
                opponent_spawns += 1;
            }
        }
        assert!(snap.opponent.resource >= 0.0);
    }
    assert!(opponent_spawns > 0, "opponent never deployed in 20s");
}

#[test]
fn test_disabled_opponent_never_deploys() {
    let mut engine = quiet_engine();
    for _ in 0..600 {
        engine.advance(DT);
    }
    assert_eq!(engine.unit_count(), 0);
}

// ---- Lifecycle ----

#[test]
fn test_player_structures_checked_first() {
    let mut engine = quiet_engine();
    engine.ledger_mut().side_mut(Side::Opponent).structures[0] = 0.0;
    engine.ledger_mut().side_mut(Side::Player).structures[2] = -5.0;
    engine.advance(DT);

    assert!(!engine.is_running());
    assert_eq!(engine.winner(), Some(Side::Opponent));
    assert_eq!(
        engine.drain_events(),
        vec![MatchEvent::MatchEnded {
            winner: Side::Opponent,
            destroyed_side: Side::Player,
            destroyed_lane: Lane::Right,
        }]
    );
}

#[test]
fn test_running_and_winner_consistent() {
    let mut engine = quiet_engine();
    assert!(engine.is_running());
    assert_eq!(engine.winner(), None);
    engine.ledger_mut().side_mut(Side::Opponent).structures[1] = 0.0;
    engine.advance(DT);
    assert!(!engine.is_running());
    assert_eq!(engine.winner(), Some(Side::Player));
}

#[test]
fn test_frozen_after_match_end() {
    let mut engine = MatchEngine::new(MatchConfig::default()).unwrap();
    engine.force_spawn(Side::Player, "knight", Lane::Left).unwrap();
    engine.ledger_mut().side_mut(Side::Player).structures[0] = 0.0;
    engine.advance(DT);
    assert!(!engine.is_running());

    let frozen = snapshot_json(&engine);
    for _ in 0..100 {
        engine.advance(DT);
    }
    assert_eq!(snapshot_json(&engine), frozen);

    let result = engine.attempt_spawn(Side::Player, "skirm", None).unwrap();
    assert_eq!(result, SpawnResult::Rejected(SpawnRejection::MatchOver));
}

#[test]
fn test_invalid_dt_ignored() {
    let mut engine = quiet_engine();
    engine.advance(-1.0);
    engine.advance(f64::NAN);
    engine.advance(f64::INFINITY);
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.time().elapsed_secs, 0.0);
}

#[test]
fn test_reset_matches_fresh_match() {
    let mut config = MatchConfig::default();
    config.opponent.opening_cooldown_jitter = 0.0;
    let mut engine = MatchEngine::new(config.clone()).unwrap();
    let fresh = MatchEngine::new(config).unwrap();

    engine.select_lane(Lane::Left);
    for tick in 0..600 {
        if tick % 60 == 0 {
            let _ = engine.attempt_spawn(Side::Player, "archer", None).unwrap();
        }
        engine.advance(DT);
    }
    engine.select_lane(Lane::Right);
    assert_ne!(snapshot_json(&engine), snapshot_json(&fresh));

    engine.reset();
    assert_eq!(snapshot_json(&engine), snapshot_json(&fresh));
    assert_eq!(engine.ledger(), fresh.ledger());
    assert_eq!(engine.opponent_clock(), fresh.opponent_clock());
    assert_eq!(engine.selected_lane(), None);

    let id = engine.force_spawn(Side::Player, "skirm", Lane::Left).unwrap();
    assert_eq!(id, UnitId(1));
}

#[test]
fn test_reset_zeroes_jittered_cooldowns_and_revives_match() {
    let mut engine = MatchEngine::new(MatchConfig::default()).unwrap();
    engine.ledger_mut().side_mut(Side::Player).structures[1] = 0.0;
    engine.advance(DT);
    assert_eq!(engine.winner(), Some(Side::Opponent));

    engine.reset();
    assert!(engine.is_running());
    assert_eq!(engine.winner(), None);
    for side in Side::ALL {
        let state = engine.ledger().side(side);
        assert_eq!(state.structures, [STRUCTURE_START_HP; 3]);
        assert_eq!(state.resource, STARTING_RESOURCE);
        for archetype in engine.catalog().iter() {
            assert_eq!(engine.ledger().cooldown(side, archetype.id.as_str()), 0.0);
        }
    }
}

#[test]
fn test_snapshot_spawn_options() {
    let mut engine = quiet_engine();
    engine.attempt_spawn(Side::Player, "knight", None).unwrap();
    let snap = engine.snapshot();

    assert_eq!(snap.spawn_options.len(), 2 * engine.catalog().len());
    let knight = snap.spawn_option(Side::Player, "knight").unwrap();
    assert!(!knight.ready);
    assert_eq!(knight.cooldown_remaining, 2.8);
    assert_eq!(knight.cooldown_total, 2.8);
    assert!(!knight.available());

    // One resource left: nothing is affordable.
    let skirm = snap.spawn_option(Side::Player, "skirm").unwrap();
    assert!(skirm.ready && !skirm.affordable);

    let opp_skirm = snap.spawn_option(Side::Opponent, "skirm").unwrap();
    assert!(opp_skirm.available());
}

// ---- Invariants ----

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_ledger_and_unit_invariants(
        seed in any::<u64>(),
        steps in prop::collection::vec((0.0f64..0.05, 0usize..8, 0usize..3), 1..400),
    ) {
        let ids = ["skirm", "knight", "archer", "giant", "mage"];
        let mut engine = MatchEngine::new(MatchConfig { seed, ..Default::default() }).unwrap();

        for (dt, pick, lane) in steps {
            if let Some(id) = ids.get(pick) {
                let before = engine.ledger().clone();
                let units_before = engine.unit_count();
                let result = engine.attempt_spawn(Side::Player, id, Lane::from_index(lane)).unwrap();
                if let SpawnResult::Rejected(_) = result {
                    prop_assert_eq!(engine.ledger(), &before);
                    prop_assert_eq!(engine.unit_count(), units_before);
                }
            }
            engine.advance(dt);

            for side in Side::ALL {
                let state = engine.ledger().side(side);
                prop_assert!(state.resource >= 0.0 && state.resource <= state.resource_cap);
                prop_assert_eq!(state.structures.len(), 3);
                prop_assert!(state.structures.iter().all(|hp| *hp <= STRUCTURE_START_HP));
                for archetype in engine.catalog().iter() {
                    prop_assert!(engine.ledger().cooldown(side, archetype.id.as_str()) >= 0.0);
                }
            }
            prop_assert!(engine.snapshot().units.iter().all(|u| u.hp > 0.0));
            prop_assert_eq!(engine.is_running(), engine.winner().is_none());
        }
    }
}
