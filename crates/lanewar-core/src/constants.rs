//! Simulation constants and tuning parameters.

/// Number of parallel lanes (and structures per side).
pub const LANE_COUNT: usize = 3;

/// Largest elapsed-time step a driver should feed into one tick (seconds).
pub const MAX_FRAME_DT: f64 = 0.033;

/// Default driver frame rate (Hz).
pub const FRAME_RATE: u32 = 30;

// --- Battlefield geometry ---

/// Default field width in world units.
pub const FIELD_WIDTH: f64 = 480.0;

/// Default field height in world units.
pub const FIELD_HEIGHT: f64 = 800.0;

/// Lane centre lines as fractions of the field width.
pub const LANE_X_FRACTIONS: [f64; LANE_COUNT] = [0.22, 0.5, 0.78];

/// Distance from the field edge to each side's home line (and structures).
pub const HOME_EDGE_INSET: f64 = 90.0;

/// Lateral offset from the lane centre line at which units spawn.
pub const SPAWN_LATERAL_OFFSET: f64 = 30.0;

// --- Economy ---

/// Resource each side starts the match with.
pub const STARTING_RESOURCE: f64 = 4.0;

/// Resource cap per side.
pub const RESOURCE_CAP: f64 = 10.0;

/// Resource regenerated per second.
pub const RESOURCE_REGEN_RATE: f64 = 1.0;

/// Starting (and maximum) hit points of every structure.
pub const STRUCTURE_START_HP: f64 = 1000.0;

// --- Combat ---

/// Attack range above which an archetype counts as ranged.
pub const RANGED_THRESHOLD: f64 = 40.0;

/// Extra engagement radius when a unit closes on a structure instead of a unit.
pub const STRUCTURE_PROXIMITY_ALLOWANCE: f64 = 12.0;

/// Displacement applied to a unit after it hits a structure.
pub const RECOIL_DISTANCE: f64 = 6.0;

/// Seconds between attacks of a single unit instance.
pub const DEFAULT_ATTACK_INTERVAL: f64 = 0.9;

// --- Opponent ---

/// Elapsed time of the opponent's first decision (seconds).
pub const OPPONENT_FIRST_DECISION_AT: f64 = 0.7;

/// Lower bound of the interval between opponent decisions (seconds).
pub const OPPONENT_DECISION_INTERVAL_MIN: f64 = 0.6;

/// Upper (exclusive) bound of the interval between opponent decisions.
pub const OPPONENT_DECISION_INTERVAL_MAX: f64 = 1.8;

/// Probability that the opponent plays its cheapest available unit.
pub const OPPONENT_CHEAPEST_BIAS: f64 = 0.4;

/// Probability that the opponent deploys into the centre lane.
pub const OPPONENT_CENTER_LANE_BIAS: f64 = 0.6;

/// Upper bound of the random cooldown seeded onto each opponent archetype
/// at match start, so its opening spawns do not all land at once.
pub const OPPONENT_OPENING_COOLDOWN_JITTER: f64 = 1.2;
