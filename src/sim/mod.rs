//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity list order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod camera;
pub mod combat;
pub mod contact;
pub mod geom;
pub mod player;
pub mod state;
pub mod tick;

pub use combat::{AttackHitbox, attack_hitbox};
pub use geom::Rect;
pub use state::{
    AttackKind, Boss, BossPhase, Bullet, Chest, Coin, Enemy, EnemyKind, Facing, GameEvent,
    GamePhase, GameState, Heart, LevelStats, MovingSpike, Player, chest_id,
};
pub use tick::{TickInput, tick};
