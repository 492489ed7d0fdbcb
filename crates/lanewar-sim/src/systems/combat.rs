//! Combat & movement system: targeting, attack-or-move, damage.
//!
//! Units act one at a time in ascending `UnitId` (spawn) order, and each
//! sees the effects of the units that acted before it in the same tick.
//! The hecs world is copied into a dense `Combatant` buffer, stepped, and
//! written back, which keeps iteration order independent of hecs storage.

use glam::DVec2;
use hecs::{Entity, World};

use lanewar_core::components::{Attack, Health, Mobility, Position, Unit};
use lanewar_core::config::Battlefield;
use lanewar_core::constants::{RECOIL_DISTANCE, STRUCTURE_PROXIMITY_ALLOWANCE};
use lanewar_core::enums::{Lane, Side};
use lanewar_core::events::MatchEvent;
use lanewar_core::types::UnitId;

use crate::economy::Ledger;

/// Working copy of one unit for the duration of a tick.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub entity: Entity,
    pub id: UnitId,
    pub side: Side,
    pub lane: Lane,
    pub position: DVec2,
    pub hp: f64,
    pub attack: Attack,
    pub speed: f64,
}

impl Combatant {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// What one unit did this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Dead before its turn.
    None,
    /// Hit (or waited to hit) another unit, by buffer index.
    AttackUnit { target: usize, fired: bool },
    /// Hit (or waited to hit) the enemy structure in its lane.
    AttackStructure { fired: bool },
    /// Walked toward its goal.
    Move,
}

/// Run combat for every unit in the world.
pub fn run(
    world: &mut World,
    ledger: &mut Ledger,
    battlefield: &Battlefield,
    now: f64,
    dt: f64,
    events: &mut Vec<MatchEvent>,
) {
    let mut combatants = gather(world);
    step(&mut combatants, ledger, battlefield, now, dt, events);
    write_back(world, &combatants);
}

/// Copy all units into a buffer sorted by id.
pub fn gather(world: &World) -> Vec<Combatant> {
    let mut combatants: Vec<Combatant> = world
        .query::<(&Unit, &Position, &Health, &Attack, &Mobility)>()
        .iter()
        .map(|(entity, (unit, pos, health, attack, mobility))| Combatant {
            entity,
            id: unit.id,
            side: unit.side,
            lane: unit.lane,
            position: pos.0,
            hp: health.current,
            attack: *attack,
            speed: mobility.speed,
        })
        .collect();

    combatants.sort_unstable_by_key(|c| c.id);
    combatants
}

fn write_back(world: &mut World, combatants: &[Combatant]) {
    for c in combatants {
        if let Ok((pos, health, attack)) =
            world.query_one_mut::<(&mut Position, &mut Health, &mut Attack)>(c.entity)
        {
            pos.0 = c.position;
            health.current = c.hp;
            *attack = c.attack;
        }
    }
}

/// Step every combatant once, in buffer order.
pub fn step(
    combatants: &mut [Combatant],
    ledger: &mut Ledger,
    battlefield: &Battlefield,
    now: f64,
    dt: f64,
    events: &mut Vec<MatchEvent>,
) -> Vec<Action> {
    let mut actions = Vec::with_capacity(combatants.len());
    for i in 0..combatants.len() {
        actions.push(act(combatants, i, ledger, battlefield, now, dt, events));
    }
    actions
}

/// Nearest enemy in the same lane. Equal distances resolve to the earliest
/// in buffer order. Units killed earlier in the tick are still candidates
/// until cleanup removes them.
pub fn find_target(combatants: &[Combatant], actor: usize) -> Option<usize> {
    let me = &combatants[actor];
    let mut best: Option<usize> = None;
    let mut best_dist = f64::INFINITY;

    for (idx, other) in combatants.iter().enumerate() {
        if idx == actor || other.side == me.side || other.lane != me.lane {
            continue;
        }
        let dist = me.position.distance(other.position);
        if dist < best_dist {
            best_dist = dist;
            best = Some(idx);
        }
    }
    best
}

fn act(
    combatants: &mut [Combatant],
    i: usize,
    ledger: &mut Ledger,
    battlefield: &Battlefield,
    now: f64,
    dt: f64,
    events: &mut Vec<MatchEvent>,
) -> Action {
    if !combatants[i].is_alive() {
        return Action::None;
    }

    let target = find_target(combatants, i);
    let me = &combatants[i];
    let (goal, reach) = match target {
        Some(t) => (combatants[t].position, me.attack.range),
        None => (
            battlefield.structure_position(me.side.other(), me.lane),
            me.attack.range + STRUCTURE_PROXIMITY_ALLOWANCE,
        ),
    };
    let to_goal = goal - me.position;
    let dist = to_goal.length();

    if dist > reach {
        let step = to_goal.normalize_or_zero() * me.speed * dt;
        combatants[i].position += step;
        return Action::Move;
    }

    let fired = me.attack.ready_at(now);
    let damage = me.attack.damage;
    let (side, lane) = (me.side, me.lane);
    if fired {
        combatants[i].attack.last_attack = Some(now);
    }

    match target {
        Some(t) => {
            if fired {
                combatants[t].hp -= damage;
            }
            Action::AttackUnit { target: t, fired }
        }
        None => {
            if fired {
                let remaining = ledger.damage_structure(side.other(), lane, damage);
                events.push(MatchEvent::StructureDamaged {
                    side: side.other(),
                    lane,
                    damage,
                    remaining,
                });
                combatants[i].position -= to_goal.normalize_or_zero() * RECOIL_DISTANCE;
            }
            Action::AttackStructure { fired }
        }
    }
}
