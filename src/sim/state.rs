//! Game state and core simulation types
//!
//! One `GameState` holds everything mutable for a single level attempt. It is
//! built from a `LevelData` and then owned exclusively by the engine.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;
use crate::level::{BossKind, LevelData};

/// Current phase of the level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Flag reached
    Complete,
    /// Out of lives
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Melee attack types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Punch,
    Kick,
    Special,
}

impl AttackKind {
    /// Ticks the hitbox stays active
    pub fn duration(&self) -> u32 {
        match self {
            AttackKind::Punch => 12,
            AttackKind::Kick => 16,
            AttackKind::Special => 24,
        }
    }

    /// Ticks after the attack ends before another may start
    pub fn cooldown(&self) -> u32 {
        match self {
            AttackKind::Punch => 8,
            AttackKind::Kick => 12,
            AttackKind::Special => 60,
        }
    }

    pub fn damage(&self) -> i32 {
        match self {
            AttackKind::Punch => 1,
            AttackKind::Kick => 2,
            AttackKind::Special => 5,
        }
    }

    pub fn knockback(&self) -> f32 {
        match self {
            AttackKind::Punch => 4.0,
            AttackKind::Kick => 6.0,
            AttackKind::Special => 10.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    pub can_double_jump: bool,
    pub crouching: bool,
    pub facing: Facing,
    /// Walk-cycle frame (0-3) and its timer
    pub frame: u32,
    pub frame_timer: u32,
    /// Remaining invincibility ticks
    pub invincible: u32,
    /// Active attack; `None` exactly when `attack_timer` is zero
    pub attacking: Option<AttackKind>,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    pub combo_count: u32,
    pub combo_timer: u32,
    /// Special meter, 0..=SPECIAL_CHARGE_MAX
    pub special_charge: u32,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            on_ground: false,
            can_double_jump: false,
            crouching: false,
            facing: Facing::Right,
            frame: 0,
            frame_timer: 0,
            invincible: 0,
            attacking: None,
            attack_timer: 0,
            attack_cooldown: 0,
            combo_count: 0,
            combo_timer: 0,
            special_charge: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Add to the special meter, saturating at the cap
    pub fn add_charge(&mut self, amount: u32) {
        self.special_charge = (self.special_charge + amount).min(SPECIAL_CHARGE_MAX);
    }
}

/// Patrolling enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground walker that fires at the player
    Robot { shoot_timer: u32 },
    /// Flyer bobbing on a sine wave around `base_y`
    Bat {
        base_y: f32,
        amplitude: f32,
        frequency: f32,
    },
}

impl EnemyKind {
    /// How deep the player's feet may sink into the enemy and still stomp it
    pub fn stomp_depth(&self) -> f32 {
        match self {
            EnemyKind::Robot { .. } => ROBOT_STOMP_DEPTH,
            EnemyKind::Bat { .. } => BAT_STOMP_DEPTH,
        }
    }

    /// Special charge granted for a melee kill
    pub fn charge_gain(&self) -> u32 {
        match self {
            EnemyKind::Robot { .. } => ROBOT_CHARGE_GAIN,
            EnemyKind::Bat { .. } => BAT_CHARGE_GAIN,
        }
    }

    pub fn is_bat(&self) -> bool {
        matches!(self, EnemyKind::Bat { .. })
    }
}

/// A robot or bat. Dead enemies stay in the list but are inert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub vx: f32,
    pub patrol_start: f32,
    pub patrol_end: f32,
    pub alive: bool,
    pub frame: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Spike sliding between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingSpike {
    pub pos: Vec2,
    pub size: Vec2,
    pub start: Vec2,
    pub end: Vec2,
    pub speed: f32,
    /// Position along the path, 0..=1
    pub progress: f32,
    /// +1 toward `end`, -1 toward `start`
    pub direction: f32,
}

impl MovingSpike {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    Normal,
    Enraged,
}

/// Level boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vx: f32,
    pub patrol_start: f32,
    pub patrol_end: f32,
    /// Cruising speed; knockback temporarily overrides `vx`
    pub patrol_speed: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    pub phase: BossPhase,
    /// Post-hit grace ticks
    pub invincible: u32,
    pub attack_cooldown: u32,
    /// Direction the boss faces (+1/-1)
    pub direction: f32,
    pub frame: u32,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Ticks between shots in the current phase
    pub fn shoot_interval(&self) -> u32 {
        match self.phase {
            BossPhase::Normal => BOSS_SHOOT_TICKS,
            BossPhase::Enraged => BOSS_SHOOT_TICKS / 2,
        }
    }

    /// Subtract HP, enrage at half health, die at zero
    ///
    /// Returns true if this hit killed the boss.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.check_enrage();
        if self.hp <= 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }

    /// One-way transition to the enraged phase
    pub fn check_enrage(&mut self) {
        if self.phase == BossPhase::Normal
            && self.hp as f32 <= self.max_hp as f32 * BOSS_ENRAGE_HP_FRACTION
        {
            self.phase = BossPhase::Enraged;
            self.patrol_speed *= BOSS_ENRAGE_SPEEDUP;
            self.vx *= BOSS_ENRAGE_SPEEDUP;
            log::debug!("{} enraged at {} hp", self.kind.display_name(), self.hp);
        }
    }
}

/// Enemy projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vx: f32,
    pub size: Vec2,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub collected: bool,
    /// Phase offset for the idle bob animation
    pub bob_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heart {
    pub pos: Vec2,
    pub collected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chest {
    pub pos: Vec2,
    pub opened: bool,
    pub reward: u32,
}

/// End-of-level summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub coins_collected: u32,
    pub total_coins: u32,
    /// Seconds of simulated time
    pub time_taken: f32,
    /// Robots, bats and bosses defeated
    pub robots_killed: u32,
    pub was_hit: bool,
}

/// Outcome events emitted by a tick, drained by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelComplete { coins: u32, stats: LevelStats },
    GameOver,
    LivesChanged(u32),
    CoinsChanged(u32),
    ChestOpened { reward: u32 },
}

/// Identifier the host uses to remember opened chests
pub fn chest_id(level_index: usize, reward: u32) -> String {
    format!("{}-{}", level_index, reward)
}

/// Complete per-level simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed used to build this level
    pub seed: u64,
    pub level_index: usize,
    /// Level metadata; entity lists below are the mutable copies
    pub level: LevelData,
    /// Logical viewport size
    pub view: Vec2,
    pub player: Player,
    pub platforms: Vec<Rect>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub chests: Vec<Chest>,
    pub spikes: Vec<Rect>,
    pub moving_spikes: Vec<MovingSpike>,
    pub boss: Option<Boss>,
    pub hearts: Vec<Heart>,
    pub flag: Rect,
    pub camera_x: f32,
    pub lives: u32,
    pub level_coins: u32,
    pub robots_killed: u32,
    pub was_hit: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build the mutable world for one attempt at `level`
    pub fn new(
        level: LevelData,
        level_index: usize,
        lives: u32,
        opened_chests: &HashSet<String>,
        view: Vec2,
        seed: u64,
    ) -> Self {
        // Separate stream from the level generator so shot timing does not
        // shift the generated layout
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(1));

        let robots = level.robots.iter().map(|r| Enemy {
            pos: r.pos,
            size: Vec2::new(ROBOT_WIDTH, ROBOT_HEIGHT),
            vx: PATROL_SPEED,
            patrol_start: r.patrol_start,
            patrol_end: r.patrol_end,
            alive: true,
            frame: 0,
            kind: EnemyKind::Robot {
                shoot_timer: ROBOT_FIRST_SHOT_MIN_TICKS
                    + rng.random_range(0..ROBOT_FIRST_SHOT_SPREAD_TICKS),
            },
        });
        let robots: Vec<Enemy> = robots.collect();
        let bats = level.bats.iter().map(|b| Enemy {
            pos: b.pos,
            size: Vec2::new(BAT_WIDTH, BAT_HEIGHT),
            vx: PATROL_SPEED,
            patrol_start: b.pos.x - b.patrol_range,
            patrol_end: b.pos.x + b.patrol_range,
            alive: true,
            frame: 0,
            kind: EnemyKind::Bat {
                base_y: b.pos.y,
                amplitude: b.amplitude,
                frequency: b.frequency,
            },
        });
        let enemies = robots.into_iter().chain(bats).collect();

        let boss = level.boss.map(|b| Boss {
            kind: b.kind,
            pos: b.pos,
            size: Vec2::splat(BOSS_SIZE),
            vx: BOSS_PATROL_SPEED,
            patrol_start: b.pos.x - b.patrol_range,
            patrol_end: b.pos.x + b.patrol_range,
            patrol_speed: BOSS_PATROL_SPEED,
            hp: b.hp as i32,
            max_hp: b.hp as i32,
            alive: true,
            phase: BossPhase::Normal,
            invincible: 0,
            attack_cooldown: BOSS_FIRST_SHOT_TICKS,
            direction: 1.0,
            frame: 0,
        });

        Self {
            seed,
            level_index,
            view,
            player: Player::new(level.player_spawn),
            platforms: level.platforms.clone(),
            coins: level
                .coins
                .iter()
                .enumerate()
                .map(|(i, &pos)| Coin {
                    pos,
                    collected: false,
                    bob_offset: i as f32 * 0.7,
                })
                .collect(),
            enemies,
            bullets: Vec::new(),
            chests: level
                .chests
                .iter()
                .map(|c| Chest {
                    pos: c.pos,
                    opened: opened_chests.contains(&chest_id(level_index, c.reward)),
                    reward: c.reward,
                })
                .collect(),
            spikes: level
                .spikes
                .iter()
                .map(|s| Rect::new(s.x, s.y, SPIKE_WIDTH, SPIKE_HEIGHT))
                .collect(),
            moving_spikes: level
                .moving_spikes
                .iter()
                .map(|ms| MovingSpike {
                    pos: ms.start,
                    size: Vec2::new(SPIKE_WIDTH, SPIKE_HEIGHT),
                    start: ms.start,
                    end: ms.end,
                    speed: ms.speed,
                    progress: 0.0,
                    direction: 1.0,
                })
                .collect(),
            boss,
            hearts: level
                .hearts
                .iter()
                .map(|&pos| Heart {
                    pos,
                    collected: false,
                })
                .collect(),
            flag: Rect::new(level.flag_pos.x, level.flag_pos.y, FLAG_WIDTH, FLAG_HEIGHT),
            camera_x: 0.0,
            lives,
            level_coins: 0,
            robots_killed: 0,
            was_hit: false,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
            level,
        }
    }

    /// Build an empty flat test world around the given spawn
    #[cfg(test)]
    pub fn sandbox(spawn: Vec2) -> Self {
        use crate::level::Theme;

        let level = LevelData {
            name: "Sandbox".into(),
            world: "Test".into(),
            width: 2000.0,
            template_width: 2000.0,
            platforms: vec![Rect::new(0.0, GROUND_Y, 2000.0, GROUND_HEIGHT)],
            coins: Vec::new(),
            robots: Vec::new(),
            bats: Vec::new(),
            spikes: Vec::new(),
            moving_spikes: Vec::new(),
            chests: Vec::new(),
            hearts: Vec::new(),
            boss: None,
            player_spawn: spawn,
            flag_pos: Vec2::new(1900.0, 320.0),
            theme: Theme {
                sky: "#000000".into(),
                ground: "#ffffff".into(),
                platform: "#ffffff".into(),
            },
        };
        Self::new(
            level,
            0,
            3,
            &HashSet::new(),
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            0,
        )
    }

    #[inline]
    pub fn level_width(&self) -> f32 {
        self.level.width
    }

    /// Queue an outcome event for the host
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Snapshot of the end-of-level statistics
    pub fn stats(&self) -> LevelStats {
        LevelStats {
            coins_collected: self.level_coins,
            total_coins: self.coins.len() as u32,
            time_taken: crate::ticks_to_secs(self.time_ticks),
            robots_killed: self.robots_killed,
            was_hit: self.was_hit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::generate_level;
    use proptest::prelude::*;

    fn boss_with_hp(hp: i32) -> Boss {
        Boss {
            kind: BossKind::Mummy,
            pos: Vec2::new(500.0, 320.0),
            size: Vec2::splat(BOSS_SIZE),
            vx: BOSS_PATROL_SPEED,
            patrol_start: 400.0,
            patrol_end: 600.0,
            patrol_speed: BOSS_PATROL_SPEED,
            hp,
            max_hp: hp,
            alive: true,
            phase: BossPhase::Normal,
            invincible: 0,
            attack_cooldown: BOSS_FIRST_SHOT_TICKS,
            direction: 1.0,
            frame: 0,
        }
    }

    #[test]
    fn test_attack_table_ordering() {
        let kinds = [AttackKind::Punch, AttackKind::Kick, AttackKind::Special];
        for pair in kinds.windows(2) {
            assert!(pair[0].duration() < pair[1].duration());
            assert!(pair[0].cooldown() < pair[1].cooldown());
            assert!(pair[0].damage() < pair[1].damage());
        }
    }

    #[test]
    fn test_boss_enrages_once_at_half_hp() {
        let mut boss = boss_with_hp(10);
        for _ in 0..4 {
            boss.take_damage(1);
            assert_eq!(boss.phase, BossPhase::Normal);
        }
        let before = boss.vx.abs();
        boss.take_damage(1);
        assert_eq!(boss.hp, 5);
        assert_eq!(boss.phase, BossPhase::Enraged);
        assert!((boss.vx.abs() - before * BOSS_ENRAGE_SPEEDUP).abs() < 1e-5);
        assert_eq!(boss.shoot_interval(), BOSS_SHOOT_TICKS / 2);

        // No further speedups
        let enraged_speed = boss.patrol_speed;
        boss.take_damage(1);
        assert_eq!(boss.patrol_speed, enraged_speed);
    }

    #[test]
    fn test_boss_dies_exactly_once() {
        let mut boss = boss_with_hp(3);
        assert!(!boss.take_damage(2));
        assert!(boss.take_damage(5));
        assert!(!boss.alive);
        assert!(!boss.take_damage(1));
    }

    #[test]
    fn test_charge_saturates() {
        let mut player = Player::new(Vec2::ZERO);
        player.add_charge(90);
        player.add_charge(BOSS_CHARGE_GAIN);
        assert_eq!(player.special_charge, SPECIAL_CHARGE_MAX);
    }

    #[test]
    fn test_opened_chests_start_opened() {
        let level = generate_level(0, 3);
        let mut opened = HashSet::new();
        opened.insert(chest_id(0, 1));
        let state = GameState::new(
            level,
            0,
            3,
            &opened,
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            3,
        );
        let template_chest = state.chests.iter().find(|c| c.reward == 1).unwrap();
        assert!(template_chest.opened);
        assert!(state.chests.iter().any(|c| !c.opened));
    }

    #[test]
    fn test_entities_built_from_level() {
        let level = generate_level(2, 11);
        let robots = level.robots.len();
        let bats = level.bats.len();
        let state = GameState::new(
            level,
            2,
            3,
            &HashSet::new(),
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            11,
        );
        assert_eq!(state.enemies.len(), robots + bats);
        assert_eq!(state.enemies.iter().filter(|e| e.kind.is_bat()).count(), bats);
        let boss = state.boss.as_ref().unwrap();
        assert_eq!(boss.hp, boss.max_hp);
        for e in &state.enemies {
            if let EnemyKind::Robot { shoot_timer } = e.kind {
                assert!((90..150).contains(&shoot_timer));
            }
        }
    }

    proptest! {
        #[test]
        fn boss_phase_never_reverts(
            max_hp in 1i32..40,
            hits in prop::collection::vec(1i32..6, 0..30),
        ) {
            let mut boss = boss_with_hp(max_hp);
            let mut phase = boss.phase;
            let mut speedups = 0;
            for dmg in hits {
                let speed = boss.patrol_speed;
                boss.take_damage(dmg);
                boss.check_enrage();
                prop_assert!(boss.phase >= phase);
                if boss.patrol_speed != speed {
                    speedups += 1;
                }
                if boss.hp as f32 <= max_hp as f32 * BOSS_ENRAGE_HP_FRACTION {
                    prop_assert_eq!(boss.phase, BossPhase::Enraged);
                }
                phase = boss.phase;
            }
            prop_assert!(speedups <= 1);
        }
    }
}
