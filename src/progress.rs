//! Player progress record
//!
//! Owned and persisted by the host as one JSON document. The engine never
//! reads or writes it; hosts fold the engine's outcome events in with
//! [`Progress::apply`] and feed [`Progress::opened_chest_ids`] back into the
//! next engine they build.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, LevelStats, chest_id};

/// Current record layout
pub const PROGRESS_VERSION: u32 = 1;

/// Number of selectable skins: 30 free, 10 premium
pub const SKIN_COUNT: usize = 40;

/// Lives granted at the start of every attempt
pub const STARTING_LIVES: u32 = 3;

/// Coins paid per consecutive daily claim; the last entry repeats
pub const DAILY_REWARDS: [u32; 7] = [10, 20, 30, 50, 75, 100, 200];

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Finishing under this many seconds with every coin earns the third star
const FAST_CLEAR_SECS: f32 = 60.0;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Record was not valid JSON for this layout
    #[error("Malformed progress record: {0}")]
    Json(#[from] serde_json::Error),
    /// Record was written by a newer build
    #[error("Unsupported progress version {0} (expected at most {max})", max = PROGRESS_VERSION)]
    UnsupportedVersion(u32),
}

/// Persistent player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub version: u32,
    pub total_coins: u32,
    pub lives: u32,
    /// Level to offer next
    pub current_level: usize,
    /// Count of playable levels, starting at 1
    pub unlocked_levels: usize,
    pub unlocked_skins: Vec<bool>,
    pub equipped_skin: usize,
    pub daily_streak: u32,
    /// Unix ms of the last daily claim
    pub last_daily_claim: Option<u64>,
    pub achievements: Vec<String>,
    pub robots_killed: u32,
    pub levels_completed: u32,
    pub chests_opened: u32,
    /// Chest ids (see [`chest_id`]) already opened
    pub opened_chests: Vec<String>,
    /// Best completion time in seconds, by level index
    pub best_times: BTreeMap<usize, f32>,
}

impl Default for Progress {
    fn default() -> Self {
        let mut unlocked_skins = vec![false; SKIN_COUNT];
        unlocked_skins[0] = true;
        Self {
            version: PROGRESS_VERSION,
            total_coins: 0,
            lives: STARTING_LIVES,
            current_level: 0,
            unlocked_levels: 1,
            unlocked_skins,
            equipped_skin: 0,
            daily_streak: 0,
            last_daily_claim: None,
            achievements: Vec::new(),
            robots_killed: 0,
            levels_completed: 0,
            chests_opened: 0,
            opened_chests: Vec::new(),
            best_times: BTreeMap::new(),
        }
    }
}

/// Stars for a cleared level: 1 for finishing, 2 with every coin, 3 with
/// every coin in under a minute
pub fn stars(stats: &LevelStats) -> u8 {
    let all_coins = stats.coins_collected >= stats.total_coins;
    let fast = all_coins && stats.time_taken < FAST_CLEAR_SECS;
    1 + all_coins as u8 + fast as u8
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored record
    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        let progress: Progress = serde_json::from_str(json)?;
        if progress.version > PROGRESS_VERSION {
            return Err(ProgressError::UnsupportedVersion(progress.version));
        }
        Ok(progress)
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored record, starting fresh if it is missing or unreadable
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("No progress found, starting fresh");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(progress) => {
                log::info!(
                    "Loaded progress: {} coins, {} levels unlocked",
                    progress.total_coins,
                    progress.unlocked_levels
                );
                progress
            }
            Err(e) => {
                log::warn!("{}, starting fresh", e);
                Self::default()
            }
        }
    }

    /// Reset lives for a new attempt
    pub fn begin_attempt(&mut self) -> u32 {
        self.lives = STARTING_LIVES;
        self.lives
    }

    /// Fold one engine outcome for `level_index` into the record
    pub fn apply(&mut self, level_index: usize, event: &GameEvent) {
        match event {
            GameEvent::LevelComplete { coins, stats } => {
                self.total_coins += coins;
                self.current_level = level_index + 1;
                self.unlocked_levels = self.unlocked_levels.max(level_index + 2);
                self.levels_completed += 1;
                self.robots_killed += stats.robots_killed;
                let best = self.best_times.entry(level_index).or_insert(f32::MAX);
                *best = best.min(stats.time_taken);
            }
            GameEvent::LivesChanged(lives) => self.lives = *lives,
            GameEvent::ChestOpened { reward } => {
                let id = chest_id(level_index, *reward);
                if !self.opened_chests.contains(&id) {
                    self.opened_chests.push(id);
                }
                self.chests_opened += 1;
                self.unlock_skin(*reward as usize);
            }
            GameEvent::GameOver | GameEvent::CoinsChanged(_) => {}
        }
    }

    /// Ids to pass to the next engine so finished chests stay open
    pub fn opened_chest_ids(&self) -> HashSet<String> {
        self.opened_chests.iter().cloned().collect()
    }

    pub fn unlock_skin(&mut self, index: usize) {
        if index >= self.unlocked_skins.len() {
            self.unlocked_skins.resize(index + 1, false);
        }
        self.unlocked_skins[index] = true;
    }

    /// Equip an unlocked skin. Returns false if it is still locked.
    pub fn equip_skin(&mut self, index: usize) -> bool {
        if !self.unlocked_skins.get(index).copied().unwrap_or(false) {
            return false;
        }
        self.equipped_skin = index;
        true
    }

    /// Spend coins on a skin. Returns false if unaffordable or already owned.
    pub fn buy_skin(&mut self, index: usize, price: u32) -> bool {
        let owned = self.unlocked_skins.get(index).copied().unwrap_or(false);
        if owned || self.total_coins < price {
            return false;
        }
        self.total_coins -= price;
        self.unlock_skin(index);
        true
    }

    /// Record an achievement. Returns true the first time only.
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        if self.achievements.iter().any(|a| a == id) {
            return false;
        }
        self.achievements.push(id.to_owned());
        true
    }

    /// Claim today's reward at `now_ms`
    ///
    /// Returns the coins paid, or `None` if already claimed within a day.
    /// Missing a day (48 h since the last claim) restarts the streak.
    pub fn claim_daily(&mut self, now_ms: u64) -> Option<u32> {
        if let Some(last) = self.last_daily_claim {
            let since = now_ms.saturating_sub(last);
            if since < DAY_MS {
                return None;
            }
            if since >= 2 * DAY_MS {
                self.daily_streak = 0;
            }
        }
        let day = (self.daily_streak as usize).min(DAILY_REWARDS.len() - 1);
        let reward = DAILY_REWARDS[day];
        self.daily_streak += 1;
        self.last_daily_claim = Some(now_ms);
        self.total_coins += reward;
        Some(reward)
    }
}
