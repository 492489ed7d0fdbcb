//! Match engine — the core of the game.
//!
//! `MatchEngine` owns the hecs ECS world, the economy ledger and the seeded
//! RNG, resolves spawn attempts, runs all systems, and produces
//! `MatchSnapshot`s. Completely headless, enabling deterministic testing.
//! Each engine is independent; nothing is shared between matches.

use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use lanewar_core::catalog::Catalog;
use lanewar_core::commands::{MatchCommand, SpawnResult};
use lanewar_core::config::MatchConfig;
use lanewar_core::enums::{Lane, Side};
use lanewar_core::error::{ConfigError, SpawnError};
use lanewar_core::events::MatchEvent;
use lanewar_core::state::MatchSnapshot;
use lanewar_core::types::{SimTime, UnitId};

use lanewar_opponent_ai::policy::OpponentDecision;
use lanewar_opponent_ai::schedule::DecisionClock;

use crate::economy::Ledger;
use crate::spawn;
use crate::systems;

/// A single match. Owns all match state.
pub struct MatchEngine {
    config: MatchConfig,
    world: World,
    time: SimTime,
    running: bool,
    winner: Option<Side>,
    ledger: Ledger,
    rng: ChaCha8Rng,
    next_unit_id: u32,
    /// Lane from the most recent pointer selection, consumed by the next
    /// successful player spawn.
    selected_lane: Option<Lane>,
    opponent_clock: DecisionClock,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<MatchEvent>,
}

impl MatchEngine {
    /// Create a new match with the given config.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            running: true,
            winner: None,
            ledger: Ledger::new(&config.economy, &config.catalog),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_unit_id: 1,
            selected_lane: None,
            opponent_clock: DecisionClock::new(&config.opponent),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            config,
        };
        engine.seed_opening_cooldowns();
        Ok(engine)
    }

    /// Stagger the opponent's opening spawns with random initial cooldowns.
    fn seed_opening_cooldowns(&mut self) {
        let jitter = self.config.opponent.opening_cooldown_jitter;
        if jitter <= 0.0 {
            return;
        }
        for archetype in self.config.catalog.iter() {
            let secs = self.rng.gen_range(0.0..jitter);
            self.ledger
                .set_cooldown(Side::Opponent, archetype.id.as_str(), secs);
        }
    }

    /// Advance the match by `dt` seconds. No-op once the match has ended
    /// (and for negative or non-finite `dt`).
    pub fn advance(&mut self, dt: f64) {
        if !self.running || !dt.is_finite() || dt < 0.0 {
            return;
        }

        self.time.advance(dt);
        let now = self.time.elapsed_secs;

        // 1. Economy
        for side in Side::ALL {
            self.ledger.regenerate(side, dt);
        }
        for side in Side::ALL {
            self.ledger.tick_cooldowns(side, dt);
        }
        // 2. Opponent policy
        self.run_opponent(now);
        // 3. Combat & movement
        systems::combat::run(
            &mut self.world,
            &mut self.ledger,
            &self.config.battlefield,
            now,
            dt,
            &mut self.events,
        );
        // 4. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, &mut self.events);
        // 5. Termination
        if let Some((side, lane)) = systems::victory::first_destroyed(&self.ledger) {
            self.end_match(side, lane);
        }
    }

    /// Advance by `dt` and return the resulting snapshot, draining events.
    pub fn tick(&mut self, dt: f64) -> MatchSnapshot {
        self.advance(dt);
        let events = self.drain_events();
        systems::snapshot::build_snapshot(
            &self.world,
            &self.config.catalog,
            &self.ledger,
            &self.time,
            self.running,
            self.winner,
            events,
        )
    }

    /// Current state, including events not yet drained.
    pub fn snapshot(&self) -> MatchSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.config.catalog,
            &self.ledger,
            &self.time,
            self.running,
            self.winner,
            self.events.clone(),
        )
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Try to deploy `archetype_id` for `side`.
    ///
    /// Rejections (`InsufficientResource`, `OnCooldown`, `MatchOver`) leave
    /// the match untouched apart from a `SpawnRejected` event. For the
    /// player, a missing `lane_override` falls back to the last selected
    /// lane, then the centre lane.
    pub fn attempt_spawn(
        &mut self,
        side: Side,
        archetype_id: &str,
        lane_override: Option<Lane>,
    ) -> Result<SpawnResult, SpawnError> {
        let archetype = self.config.catalog.get(archetype_id)?;

        if let Err(reason) = spawn::check(&self.ledger, self.running, side, archetype) {
            debug!(%side, archetype = archetype_id, %reason, "spawn rejected");
            self.events.push(MatchEvent::SpawnRejected {
                side,
                archetype: archetype.id.clone(),
                reason,
            });
            return Ok(SpawnResult::Rejected(reason));
        }

        let lane = spawn::resolve_lane(side, lane_override, &mut self.selected_lane);
        self.ledger.charge(side, archetype);
        let unit_id = spawn::spawn_unit(
            &mut self.world,
            &self.config.battlefield,
            &mut self.next_unit_id,
            side,
            archetype,
            lane,
        );

        debug!(unit = %unit_id, %side, archetype = archetype_id, lane = lane.index(), "unit spawned");
        self.events.push(MatchEvent::UnitSpawned {
            unit_id,
            side,
            archetype: archetype.id.clone(),
            lane,
        });
        Ok(SpawnResult::Spawned(unit_id))
    }

    /// Debug/test surface: create a unit ignoring resource and cooldown.
    /// Nothing is charged, but the archetype's spawn cooldown still starts.
    pub fn force_spawn(
        &mut self,
        side: Side,
        archetype_id: &str,
        lane: Lane,
    ) -> Result<UnitId, SpawnError> {
        let archetype = self.config.catalog.get(archetype_id)?;
        self.ledger
            .set_cooldown(side, archetype.id.as_str(), archetype.spawn_cooldown);
        let unit_id = spawn::spawn_unit(
            &mut self.world,
            &self.config.battlefield,
            &mut self.next_unit_id,
            side,
            archetype,
            lane,
        );
        debug!(unit = %unit_id, %side, archetype = archetype_id, "unit force-spawned");
        self.events.push(MatchEvent::UnitSpawned {
            unit_id,
            side,
            archetype: archetype.id.clone(),
            lane,
        });
        Ok(unit_id)
    }

    /// Record the lane the player last pointed at.
    pub fn select_lane(&mut self, lane: Lane) {
        self.selected_lane = Some(lane);
    }

    /// Apply a serialized frontend command. Spawns are player spawns.
    pub fn apply_command(&mut self, command: MatchCommand) -> Result<Option<SpawnResult>, SpawnError> {
        match command {
            MatchCommand::Spawn { archetype, lane } => self
                .attempt_spawn(Side::Player, archetype.as_str(), lane)
                .map(Some),
            MatchCommand::SelectLane { lane } => {
                self.select_lane(lane);
                Ok(None)
            }
            MatchCommand::Reset => {
                self.reset();
                Ok(None)
            }
        }
    }

    /// Restore the initial match state. Cooldowns restart at zero for both
    /// sides; the RNG keeps its stream position.
    pub fn reset(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.running = true;
        self.winner = None;
        self.ledger = Ledger::new(&self.config.economy, &self.config.catalog);
        self.next_unit_id = 1;
        self.selected_lane = None;
        self.opponent_clock = DecisionClock::new(&self.config.opponent);
        self.despawn_buffer.clear();
        self.events.clear();
        info!("match reset");
    }

    fn run_opponent(&mut self, now: f64) {
        let decision = systems::opponent::run(
            &self.config.catalog,
            &self.ledger,
            &mut self.opponent_clock,
            &self.config.opponent,
            &mut self.rng,
            now,
        );

        if let OpponentDecision::Deploy { archetype, lane } = decision {
            // A refused spawn is absorbed; the next decision is already scheduled.
            if let Err(err) = self.attempt_spawn(Side::Opponent, archetype.as_str(), Some(lane)) {
                warn!(%err, "opponent chose an archetype outside the catalog");
            }
        }
    }

    fn end_match(&mut self, destroyed_side: Side, destroyed_lane: Lane) {
        let winner = destroyed_side.other();
        self.running = false;
        self.winner = Some(winner);
        info!(
            %winner,
            %destroyed_side,
            lane = destroyed_lane.index(),
            elapsed = self.time.elapsed_secs,
            "match ended"
        );
        self.events.push(MatchEvent::MatchEnded {
            winner,
            destroyed_side,
            destroyed_lane,
        });
    }

    /// Whether the match is still being played.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The winning side, once the match has ended.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.config.catalog
    }

    /// Read-only view of resources, structures and cooldowns.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of live units.
    pub fn unit_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn opponent_clock(&self) -> DecisionClock {
        self.opponent_clock
    }

    pub fn selected_lane(&self) -> Option<Lane> {
        self.selected_lane
    }

    /// Mutable ledger access for scripted test scenarios.
    #[cfg(test)]
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}
