//! Pixel Platformer - A side-scrolling platformer engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, AI, game state)
//! - `level`: Hand-authored templates and the procedural level extender
//! - `engine`: Per-level engine facade (input, lifecycle, outcome events)
//! - `render`: State to draw-list conversion (no pixels)
//! - `progress`: Host-owned persisted progress record

pub mod engine;
pub mod input;
pub mod level;
pub mod progress;
pub mod render;
pub mod sim;

pub use engine::{Engine, EngineConfig, EngineObserver, EventLog};
pub use input::Control;
pub use level::{LevelData, generate_level};
pub use progress::{Progress, ProgressError};

/// Game configuration constants
///
/// Everything is expressed per simulation tick at `TICK_RATE`; durations are
/// tick counts named `*_TICKS`.
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Player physics (pixels per tick)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_FORCE: f32 = -12.0;
    pub const WALK_SPEED: f32 = 3.0;
    pub const SPRINT_SPEED: f32 = 6.0;
    pub const TERMINAL_VELOCITY: f32 = 15.0;
    /// Falling this far below the canvas counts as a death
    pub const FALL_DEATH_MARGIN: f32 = 200.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    pub const PLAYER_CROUCH_HEIGHT: f32 = 16.0;

    /// Post-hit / respawn invincibility (1.5 seconds)
    pub const INVINCIBILITY_TICKS: u32 = 90;
    /// Upward kick applied when the player takes a hit
    pub const HIT_BOUNCE: f32 = -8.0;
    /// Upward kick after stomping an enemy
    pub const STOMP_BOUNCE: f32 = -8.0;
    /// Upward kick after stomping the boss
    pub const BOSS_STOMP_BOUNCE: f32 = -10.0;

    /// Lives cap for heart pickups
    pub const MAX_LIVES: u32 = 5;

    /// Special-attack meter
    pub const SPECIAL_CHARGE_MAX: u32 = 100;
    /// Passive +1 charge every second
    pub const CHARGE_REGEN_TICKS: u64 = 60;
    pub const ROBOT_CHARGE_GAIN: u32 = 15;
    pub const BAT_CHARGE_GAIN: u32 = 10;
    pub const BOSS_CHARGE_GAIN: u32 = 20;
    /// Rolling window for chaining attacks into a combo
    pub const COMBO_WINDOW_TICKS: u32 = 30;

    /// Stomp detection: feet must be within this many pixels of the enemy top
    pub const ROBOT_STOMP_DEPTH: f32 = 16.0;
    pub const BAT_STOMP_DEPTH: f32 = 12.0;
    pub const BOSS_STOMP_DEPTH: f32 = 16.0;

    /// Enemy sizes
    pub const ROBOT_WIDTH: f32 = 24.0;
    pub const ROBOT_HEIGHT: f32 = 24.0;
    pub const BAT_WIDTH: f32 = 20.0;
    pub const BAT_HEIGHT: f32 = 16.0;
    pub const BOSS_SIZE: f32 = 48.0;
    /// Patrol speed for robots and bats
    pub const PATROL_SPEED: f32 = 1.0;

    /// Robot ranged attack
    pub const ROBOT_SHOOT_TICKS: u32 = 120;
    pub const ROBOT_FIRST_SHOT_MIN_TICKS: u32 = 90;
    pub const ROBOT_FIRST_SHOT_SPREAD_TICKS: u32 = 60;
    pub const ROBOT_BULLET_SPEED: f32 = 4.0;

    /// Boss tuning
    pub const BOSS_PATROL_SPEED: f32 = 1.2;
    pub const BOSS_ENRAGE_SPEEDUP: f32 = 1.5;
    pub const BOSS_ENRAGE_HP_FRACTION: f32 = 0.5;
    pub const BOSS_FIRST_SHOT_TICKS: u32 = 120;
    pub const BOSS_SHOOT_TICKS: u32 = 90;
    pub const BOSS_BULLET_SPEED: f32 = 3.0;
    pub const BOSS_MELEE_GRACE_TICKS: u32 = 20;
    pub const BOSS_STOMP_GRACE_TICKS: u32 = 30;

    /// Hazards and pickups
    pub const SPIKE_WIDTH: f32 = 32.0;
    pub const SPIKE_HEIGHT: f32 = 16.0;
    /// Spikes hurt slightly above their drawn tips
    pub const SPIKE_REACH: f32 = 8.0;
    pub const COIN_SIZE: f32 = 16.0;
    pub const HEART_SIZE: f32 = 16.0;
    pub const CHEST_WIDTH: f32 = 32.0;
    pub const CHEST_HEIGHT: f32 = 28.0;
    pub const FLAG_WIDTH: f32 = 32.0;
    pub const FLAG_HEIGHT: f32 = 48.0;

    /// Bullets farther than this outside the view are dropped
    pub const BULLET_DESPAWN_MARGIN: f32 = 100.0;

    /// Camera smoothing factor (fraction of remaining distance per tick)
    pub const CAMERA_LERP: f32 = 0.08;

    /// Level geometry
    pub const GROUND_Y: f32 = 368.0;
    pub const GROUND_HEIGHT: f32 = 32.0;
    pub const PLATFORM_HEIGHT: f32 = 24.0;
}

/// Convert a tick count into seconds at the fixed simulation rate
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 / consts::TICK_RATE as f32
}
