//! Hand-authored level templates

use glam::Vec2;

use super::{BatSpawn, BossKind, BossSpawn, ChestSpawn, LevelData, MovingSpikeSpawn, RobotSpawn, Theme};
use crate::consts::{GROUND_HEIGHT, GROUND_Y, PLATFORM_HEIGHT};
use crate::sim::geom::Rect;

/// Static level definition
#[derive(Debug)]
pub struct LevelTemplate {
    pub name: &'static str,
    pub world: &'static str,
    pub width: f32,
    pub platforms: &'static [Rect],
    pub coins: &'static [Vec2],
    pub robots: &'static [RobotSpawn],
    pub bats: &'static [BatSpawn],
    pub spikes: &'static [Vec2],
    pub moving_spikes: &'static [MovingSpikeSpawn],
    pub chests: &'static [ChestSpawn],
    pub hearts: &'static [Vec2],
    pub boss: Option<BossSpawn>,
    pub player_spawn: Vec2,
    pub flag_pos: Vec2,
    pub sky_color: &'static str,
    pub ground_color: &'static str,
    pub platform_color: &'static str,
}

impl LevelTemplate {
    /// Owned copy of the template with no extension applied
    pub fn to_level_data(&self) -> LevelData {
        LevelData {
            name: self.name.to_string(),
            world: self.world.to_string(),
            width: self.width,
            template_width: self.width,
            platforms: self.platforms.to_vec(),
            coins: self.coins.to_vec(),
            robots: self.robots.to_vec(),
            bats: self.bats.to_vec(),
            spikes: self.spikes.to_vec(),
            moving_spikes: self.moving_spikes.to_vec(),
            chests: self.chests.to_vec(),
            hearts: self.hearts.to_vec(),
            boss: self.boss,
            player_spawn: self.player_spawn,
            flag_pos: self.flag_pos,
            theme: Theme {
                sky: self.sky_color.to_string(),
                ground: self.ground_color.to_string(),
                platform: self.platform_color.to_string(),
            },
        }
    }
}

/// Ground segment starting at `x`
pub const fn ground(x: f32, w: f32) -> Rect {
    Rect::new(x, GROUND_Y, w, GROUND_HEIGHT)
}

/// Floating platform
pub const fn plat(x: f32, y: f32, w: f32) -> Rect {
    Rect::new(x, y, w, PLATFORM_HEIGHT)
}

const fn pt(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

const fn robot(x: f32, y: f32, range: f32) -> RobotSpawn {
    RobotSpawn::centered(x, y, range)
}

const fn bat(x: f32, y: f32, patrol_range: f32, amplitude: f32, frequency: f32) -> BatSpawn {
    BatSpawn {
        pos: Vec2::new(x, y),
        patrol_range,
        amplitude,
        frequency,
    }
}

const fn chest(x: f32, y: f32, reward: u32) -> ChestSpawn {
    ChestSpawn {
        pos: Vec2::new(x, y),
        reward,
    }
}

pub static TEMPLATES: [LevelTemplate; 3] = [
    // Level 1 - Desert Beginnings (Easy)
    LevelTemplate {
        name: "Desert Beginnings",
        world: "Desert",
        width: 2400.0,
        platforms: &[
            ground(0.0, 600.0),
            ground(660.0, 400.0),
            ground(1120.0, 500.0),
            ground(1680.0, 720.0),
            plat(280.0, 280.0, 120.0),
            plat(500.0, 220.0, 96.0),
            plat(800.0, 260.0, 128.0),
            plat(1000.0, 300.0, 80.0),
            plat(1300.0, 240.0, 120.0),
            plat(1500.0, 200.0, 96.0),
            plat(1800.0, 260.0, 128.0),
            plat(2050.0, 300.0, 96.0),
        ],
        coins: &[
            pt(150.0, 340.0), pt(180.0, 340.0), pt(210.0, 340.0),
            pt(700.0, 340.0), pt(730.0, 340.0),
            pt(1200.0, 340.0), pt(1230.0, 340.0), pt(1260.0, 340.0),
            pt(1750.0, 340.0), pt(1780.0, 340.0),
            pt(310.0, 252.0), pt(340.0, 252.0),
            pt(530.0, 192.0), pt(560.0, 192.0),
            pt(840.0, 232.0), pt(870.0, 232.0),
            pt(1340.0, 212.0), pt(1370.0, 212.0),
            pt(1530.0, 172.0), pt(1560.0, 172.0),
            pt(420.0, 160.0), pt(1100.0, 160.0),
        ],
        robots: &[robot(400.0, 344.0, 100.0), robot(1400.0, 344.0, 120.0)],
        bats: &[],
        spikes: &[],
        moving_spikes: &[],
        chests: &[chest(1520.0, 168.0, 1)],
        hearts: &[pt(850.0, 232.0)],
        boss: None,
        player_spawn: pt(60.0, 300.0),
        flag_pos: pt(2300.0, 320.0),
        sky_color: "#1a1a3a",
        ground_color: "#b8863a",
        platform_color: "#9a7030",
    },
    // Level 2 - Desert Ruins (Medium)
    LevelTemplate {
        name: "Desert Ruins",
        world: "Desert",
        width: 2800.0,
        platforms: &[
            ground(0.0, 400.0),
            ground(480.0, 300.0),
            ground(860.0, 250.0),
            ground(1200.0, 350.0),
            ground(1650.0, 200.0),
            ground(1950.0, 300.0),
            ground(2350.0, 450.0),
            plat(200.0, 280.0, 96.0),
            plat(420.0, 220.0, 80.0),
            plat(600.0, 260.0, 96.0),
            plat(750.0, 200.0, 80.0),
            plat(950.0, 280.0, 96.0),
            plat(1100.0, 180.0, 80.0),
            plat(1300.0, 240.0, 120.0),
            plat(1500.0, 300.0, 80.0),
            plat(1700.0, 200.0, 96.0),
            plat(1850.0, 150.0, 80.0),
            plat(2100.0, 260.0, 96.0),
            plat(2250.0, 200.0, 80.0),
            // Hidden ledge for the chest
            plat(1080.0, 100.0, 64.0),
        ],
        coins: &[
            pt(100.0, 340.0), pt(130.0, 340.0), pt(160.0, 340.0),
            pt(520.0, 340.0), pt(550.0, 340.0), pt(580.0, 340.0),
            pt(900.0, 340.0), pt(930.0, 340.0),
            pt(1250.0, 340.0), pt(1280.0, 340.0), pt(1310.0, 340.0),
            pt(1700.0, 340.0), pt(1730.0, 340.0),
            pt(2000.0, 340.0), pt(2030.0, 340.0), pt(2060.0, 340.0),
            pt(2400.0, 340.0), pt(2430.0, 340.0), pt(2460.0, 340.0),
            pt(230.0, 252.0), pt(260.0, 252.0),
            pt(440.0, 192.0), pt(470.0, 192.0),
            pt(630.0, 232.0), pt(660.0, 232.0),
            pt(770.0, 172.0), pt(800.0, 172.0),
            pt(1130.0, 152.0), pt(1160.0, 152.0),
            pt(1730.0, 172.0), pt(1760.0, 172.0),
            pt(1870.0, 122.0), pt(1900.0, 122.0),
            pt(2280.0, 172.0),
        ],
        robots: &[
            robot(300.0, 344.0, 80.0),
            robot(1000.0, 344.0, 100.0),
            robot(2100.0, 344.0, 120.0),
        ],
        bats: &[],
        spikes: &[
            pt(430.0, 360.0), pt(462.0, 360.0),
            pt(810.0, 360.0), pt(842.0, 360.0),
            pt(1160.0, 360.0), pt(1192.0, 360.0),
            pt(1600.0, 360.0),
            pt(1900.0, 360.0), pt(1932.0, 360.0),
        ],
        moving_spikes: &[],
        chests: &[chest(1096.0, 68.0, 2)],
        hearts: &[pt(770.0, 172.0), pt(2110.0, 232.0)],
        boss: None,
        player_spawn: pt(60.0, 300.0),
        flag_pos: pt(2700.0, 320.0),
        sky_color: "#1a1a3a",
        ground_color: "#b8863a",
        platform_color: "#9a7030",
    },
    // Level 3 - Scorpion's Den (Boss)
    LevelTemplate {
        name: "Scorpion's Den",
        world: "Desert",
        width: 3000.0,
        platforms: &[
            ground(0.0, 500.0),
            ground(560.0, 420.0),
            ground(1040.0, 360.0),
            ground(1460.0, 540.0),
            ground(2060.0, 940.0),
            plat(220.0, 270.0, 96.0),
            plat(620.0, 230.0, 96.0),
            plat(880.0, 280.0, 80.0),
            plat(1150.0, 220.0, 112.0),
            plat(1560.0, 260.0, 96.0),
            plat(1780.0, 200.0, 80.0),
            plat(2200.0, 280.0, 128.0),
        ],
        coins: &[
            pt(120.0, 340.0), pt(150.0, 340.0), pt(180.0, 340.0),
            pt(640.0, 340.0), pt(670.0, 340.0),
            pt(1100.0, 340.0), pt(1130.0, 340.0),
            pt(1500.0, 340.0), pt(1530.0, 340.0), pt(1560.0, 340.0),
            pt(250.0, 242.0), pt(280.0, 242.0),
            pt(650.0, 202.0), pt(680.0, 202.0),
            pt(1180.0, 192.0), pt(1210.0, 192.0),
            pt(1590.0, 232.0), pt(1620.0, 232.0),
            pt(2240.0, 252.0), pt(2270.0, 252.0),
        ],
        robots: &[robot(300.0, 344.0, 80.0), robot(1220.0, 344.0, 90.0)],
        bats: &[
            bat(760.0, 150.0, 100.0, 25.0, 0.03),
            bat(1650.0, 120.0, 120.0, 30.0, 0.035),
        ],
        spikes: &[pt(1300.0, 360.0), pt(1332.0, 360.0)],
        moving_spikes: &[MovingSpikeSpawn {
            start: pt(1520.0, 360.0),
            end: pt(1720.0, 360.0),
            speed: 0.006,
        }],
        chests: &[chest(1790.0, 172.0, 3)],
        hearts: &[pt(1190.0, 192.0), pt(2100.0, 340.0)],
        boss: Some(BossSpawn {
            kind: BossKind::ScorpionKing,
            pos: pt(2600.0, 320.0),
            hp: 10,
            patrol_range: 150.0,
        }),
        player_spawn: pt(60.0, 300.0),
        flag_pos: pt(2900.0, 320.0),
        sky_color: "#2a1a2a",
        ground_color: "#a8763a",
        platform_color: "#8a6030",
    },
];

/// Look up a template by index
pub fn template(index: usize) -> Option<&'static LevelTemplate> {
    TEMPLATES.get(index)
}
