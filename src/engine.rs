//! Engine facade
//!
//! One `Engine` owns one level attempt: the generated level, the mutable
//! game state, buffered input and the host's observer. Hosts build a fresh
//! engine per level load, call `start`, feed input events, drive time with
//! `advance` (or `step`), and `stop` on teardown.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::input::{Control, InputState};
use crate::level::{generate_level, levelgen::resolve_index};
use crate::render::{Frame, build_frame};
use crate::sim::{GameEvent, GameState, LevelStats, chest_id, tick};

/// Multiplier that separates default seeds of levels loaded in the same ms
const LEVEL_SEED_STRIDE: u64 = 7919;

/// Upper bound on real time consumed per `advance` call (seconds)
const MAX_FRAME_TIME: f32 = 0.1;

/// Engine construction options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical view width in pixels
    pub width: f32,
    /// Logical view height in pixels
    pub height: f32,
    /// Level generation seed; derived from the clock when `None`
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Host callbacks for level outcomes. Every method defaults to a no-op.
pub trait EngineObserver {
    /// Player reached the flag
    fn on_level_complete(&mut self, _coins: u32, _stats: &LevelStats) {}
    /// Lives ran out
    fn on_game_over(&mut self) {}
    /// A life was gained or lost
    fn on_lives_change(&mut self, _lives: u32) {}
    /// A coin was collected; `coins` is this attempt's running total
    fn on_level_coins_change(&mut self, _coins: u32) {}
    /// A chest was touched. The host decides what `reward` pays out.
    fn on_chest_open(&mut self, _chest_id: &str, _reward: u32) {}
}

impl EngineObserver for () {}

/// Observer that records every outcome in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
    /// Ids of chests opened, in order
    pub chests: Vec<String>,
}

impl EngineObserver for EventLog {
    fn on_level_complete(&mut self, coins: u32, stats: &LevelStats) {
        self.events.push(GameEvent::LevelComplete {
            coins,
            stats: stats.clone(),
        });
    }

    fn on_game_over(&mut self) {
        self.events.push(GameEvent::GameOver);
    }

    fn on_lives_change(&mut self, lives: u32) {
        self.events.push(GameEvent::LivesChanged(lives));
    }

    fn on_level_coins_change(&mut self, coins: u32) {
        self.events.push(GameEvent::CoinsChanged(coins));
    }

    fn on_chest_open(&mut self, chest_id: &str, reward: u32) {
        self.chests.push(chest_id.to_owned());
        self.events.push(GameEvent::ChestOpened { reward });
    }
}

/// Clock-derived seed for hosts that do not inject one
fn default_seed(level_index: usize) -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    millis.wrapping_add((level_index as u64).wrapping_mul(LEVEL_SEED_STRIDE))
}

/// A single level attempt
pub struct Engine<O: EngineObserver = EventLog> {
    state: GameState,
    input: InputState,
    observer: O,
    /// Equipped cosmetic, passed through to the renderer
    skin: usize,
    running: bool,
    accumulator: f32,
}

impl<O: EngineObserver> Engine<O> {
    /// Load level `level_index` (falling back to level 0 if it does not exist)
    ///
    /// `opened_chests` holds ids from [`chest_id`] for chests the player has
    /// already opened; those start open.
    pub fn new(
        config: EngineConfig,
        level_index: usize,
        skin: usize,
        lives: u32,
        opened_chests: &HashSet<String>,
        observer: O,
    ) -> Self {
        let index = resolve_index(level_index);
        let seed = config.seed.unwrap_or_else(|| default_seed(index));
        let level = generate_level(index, seed);
        let state = GameState::new(
            level,
            index,
            lives,
            opened_chests,
            Vec2::new(config.width, config.height),
            seed,
        );
        log::info!(
            "Engine ready: level {} '{}' with {} lives (seed {})",
            index,
            state.level.name,
            lives,
            seed
        );

        Self {
            state,
            input: InputState::new(),
            observer,
            skin,
            running: false,
            accumulator: 0.0,
        }
    }

    /// Begin accepting input and advancing time
    pub fn start(&mut self) {
        if self.running || !self.state.is_running() {
            return;
        }
        self.running = true;
        self.accumulator = 0.0;
        log::info!("Engine started");
    }

    /// Stop accepting input and advancing time. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.input.clear();
        log::info!("Engine stopped after {} ticks", self.state.time_ticks);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Key press by code name; ignored while stopped
    pub fn key_down(&mut self, code: &str) {
        if self.running {
            self.input.key_down(code);
        }
    }

    /// Key release by code name; ignored while stopped
    pub fn key_up(&mut self, code: &str) {
        if self.running {
            self.input.key_up(code);
        }
    }

    /// On-screen button pressed; ignored while stopped
    pub fn touch_start(&mut self, control: Control) {
        if self.running {
            self.input.touch_start(control);
        }
    }

    /// On-screen button released; ignored while stopped
    pub fn touch_end(&mut self, control: Control) {
        if self.running {
            self.input.touch_end(control);
        }
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) {
        if !self.running {
            return;
        }
        let input = self.input.snapshot_and_consume();
        tick(&mut self.state, &input);
        self.dispatch_events();

        if !self.state.is_running() {
            self.stop();
        }
    }

    /// Feed real elapsed time; runs as many whole ticks as it covers
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_secs: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += elapsed_secs.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.running && self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::LevelComplete { coins, stats } => {
                    self.observer.on_level_complete(coins, &stats)
                }
                GameEvent::GameOver => self.observer.on_game_over(),
                GameEvent::LivesChanged(lives) => self.observer.on_lives_change(lives),
                GameEvent::CoinsChanged(coins) => self.observer.on_level_coins_change(coins),
                GameEvent::ChestOpened { reward } => {
                    let id = chest_id(self.state.level_index, reward);
                    self.observer.on_chest_open(&id, reward);
                }
            }
        }
    }

    /// Draw list for the current state
    pub fn frame(&self) -> Frame {
        build_frame(&self.state, self.skin)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.state.seed
    }

    pub fn level_index(&self) -> usize {
        self.state.level_index
    }

    pub fn skin(&self) -> usize {
        self.skin
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Tear down and hand back the observer
    pub fn into_observer(mut self) -> O {
        self.stop();
        self.observer
    }
}
