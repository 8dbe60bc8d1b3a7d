//! Pixel Platformer headless runner
//!
//! Loads a level, plays it with a simple scripted autopilot through the same
//! key-event path a browser host uses, and logs the outcome.
//!
//! Usage: `pixel-platformer [level] [seed]`

use pixel_platformer::consts::*;
use pixel_platformer::progress::stars;
use pixel_platformer::sim::{GameEvent, GameState};
use pixel_platformer::{Engine, EngineConfig, EventLog, Progress};

/// Give up after this much simulated time
const MAX_RUN_TICKS: u64 = TICK_RATE as u64 * 300;

/// How far ahead the autopilot looks for trouble
const LOOKAHEAD: f32 = 40.0;

/// Controls the autopilot wants this tick
#[derive(Debug, Default)]
struct Plan {
    jump: bool,
    punch: bool,
    special: bool,
}

/// Solid ground directly below `x`, within a jumpable drop
fn ground_below(state: &GameState, x: f32, feet: f32) -> bool {
    state
        .platforms
        .iter()
        .any(|p| x >= p.x && x <= p.right() && p.y >= feet - 1.0 && p.y <= feet + 120.0)
}

fn plan(state: &GameState) -> Plan {
    let p = &state.player;
    let body = p.rect();
    let ahead = body.right() + LOOKAHEAD;

    let near = |x: f32, y: f32| x > body.x && x < ahead && (y - body.y).abs() < 48.0;
    let enemy_ahead = state
        .enemies
        .iter()
        .any(|e| e.alive && near(e.pos.x, e.pos.y));
    let boss_ahead = state
        .boss
        .as_ref()
        .is_some_and(|b| b.alive && b.pos.x - body.right() < 120.0 && b.pos.x > body.x);
    let spike_ahead = state.spikes.iter().any(|s| near(s.x, s.y - 16.0))
        || state
            .moving_spikes
            .iter()
            .any(|m| near(m.pos.x, m.pos.y - 16.0));
    let wall_ahead = state.platforms.iter().any(|w| {
        w.x >= body.right() && w.x < ahead && w.y < body.bottom() - 4.0 && w.bottom() > body.y
    });
    let gap_ahead = !ground_below(state, ahead, body.bottom());

    let blocked = spike_ahead || wall_ahead || gap_ahead;
    let falling_into_gap =
        !p.on_ground && p.vel.y > 0.0 && !ground_below(state, body.center().x, body.bottom());

    Plan {
        jump: (p.on_ground && blocked) || (falling_into_gap && p.can_double_jump),
        punch: enemy_ahead && p.attacking.is_none(),
        special: boss_ahead && p.special_charge >= SPECIAL_CHARGE_MAX,
    }
}

/// Tap a key: the press latches an edge even though it is released at once
fn tap(engine: &mut Engine, code: &str) {
    engine.key_down(code);
    engine.key_up(code);
}

fn run(level: usize, seed: Option<u64>, progress: &mut Progress) -> Option<GameEvent> {
    let config = EngineConfig {
        seed,
        ..EngineConfig::default()
    };
    let lives = progress.begin_attempt();
    let mut engine = Engine::new(
        config,
        level,
        progress.equipped_skin,
        lives,
        &progress.opened_chest_ids(),
        EventLog::default(),
    );
    engine.start();
    engine.key_down("ArrowRight");

    while engine.is_running() && engine.state().time_ticks < MAX_RUN_TICKS {
        let wants = plan(engine.state());
        if wants.jump {
            tap(&mut engine, "Space");
        }
        if wants.special {
            tap(&mut engine, "KeyL");
        } else if wants.punch {
            tap(&mut engine, "KeyJ");
        }
        engine.advance(SIM_DT);
    }

    let frame = engine.frame();
    log::debug!(
        "Final frame: {} draw commands, camera at {:.0}",
        frame.commands.len(),
        frame.camera_x
    );

    let level_index = engine.level_index();
    let log = engine.into_observer();
    for event in &log.events {
        progress.apply(level_index, event);
    }
    log.events
        .into_iter()
        .rev()
        .find(|e| matches!(e, GameEvent::LevelComplete { .. } | GameEvent::GameOver))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pixel Platformer (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let seed = args.next().and_then(|a| a.parse().ok());

    let mut progress = Progress::default();
    match run(level, seed, &mut progress) {
        Some(GameEvent::LevelComplete { coins, stats }) => {
            log::info!(
                "Cleared with {} coins ({}/{}), {} enemies, {:.1}s, {} stars",
                coins,
                stats.coins_collected,
                stats.total_coins,
                stats.robots_killed,
                stats.time_taken,
                stars(&stats)
            );
        }
        Some(_) => log::info!("Game over"),
        None => log::info!("Autopilot ran out of time"),
    }

    match progress.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize progress: {}", e),
    }
}
