//! Level data: hand-authored templates and the procedural extender
//!
//! A `LevelTemplate` is static, curated content. `generate_level` copies a
//! template and appends a seeded, procedurally generated tail to it, producing
//! the owned `LevelData` the engine loads.

pub mod levelgen;
pub mod templates;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geom::Rect;

pub use levelgen::{extend_template, generate_level};
pub use templates::{LevelTemplate, TEMPLATES, template};

/// Robot spawn with its patrol bounds already resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotSpawn {
    pub pos: Vec2,
    pub patrol_start: f32,
    pub patrol_end: f32,
}

impl RobotSpawn {
    /// Robot patrolling `range` pixels either side of its spawn x
    pub const fn centered(x: f32, y: f32, range: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            patrol_start: x - range,
            patrol_end: x + range,
        }
    }
}

/// Bat spawn (horizontal patrol plus sinusoidal bob)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatSpawn {
    pub pos: Vec2,
    pub patrol_range: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

/// Spike sliding back and forth between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingSpikeSpawn {
    pub start: Vec2,
    pub end: Vec2,
    /// Progress gained per tick (fraction of the full path)
    pub speed: f32,
}

/// Treasure chest. `reward` is an opaque index the host turns into a prize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChestSpawn {
    pub pos: Vec2,
    pub reward: u32,
}

/// Cosmetic boss variety; all bosses share the same behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    SandWorm,
    Mummy,
    SandGolem,
    ScorpionKing,
    Pharaoh,
}

impl BossKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            BossKind::SandWorm => "Sand Worm",
            BossKind::Mummy => "Mummy",
            BossKind::SandGolem => "Sand Golem",
            BossKind::ScorpionKing => "Scorpion King",
            BossKind::Pharaoh => "Pharaoh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossSpawn {
    pub kind: BossKind,
    pub pos: Vec2,
    pub hp: u32,
    pub patrol_range: f32,
}

/// Color theme (CSS hex strings, only the renderer reads these)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub sky: String,
    pub ground: String,
    pub platform: String,
}

/// A fully built level, ready to be loaded by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub world: String,
    /// Total width in pixels (template + generated extension)
    pub width: f32,
    /// Width of the hand-authored opening
    pub template_width: f32,
    pub platforms: Vec<Rect>,
    pub coins: Vec<Vec2>,
    pub robots: Vec<RobotSpawn>,
    pub bats: Vec<BatSpawn>,
    pub spikes: Vec<Vec2>,
    pub moving_spikes: Vec<MovingSpikeSpawn>,
    pub chests: Vec<ChestSpawn>,
    pub hearts: Vec<Vec2>,
    pub boss: Option<BossSpawn>,
    pub player_spawn: Vec2,
    pub flag_pos: Vec2,
    pub theme: Theme,
}
