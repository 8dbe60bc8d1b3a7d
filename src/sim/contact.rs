//! Player contact resolution: pickups, the flag, hazards and stomps
//!
//! Runs once per tick after every entity has moved. Pickups are always
//! checked; hazards only while the player is vulnerable. The first hazard
//! that lands a hit ends the pass, so a tick costs at most one life.

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::sim::geom::Rect;

/// Player took damage from a hazard or enemy
pub fn player_hit(state: &mut GameState) {
    state.was_hit = true;
    if lose_life(state) {
        state.player.invincible = INVINCIBILITY_TICKS;
        state.player.vel.y = HIT_BOUNCE;
    }
}

/// Player dropped out of the world; respawn at the level start
pub fn player_fell(state: &mut GameState) {
    log::debug!("Player fell out of the world at x={}", state.player.pos.x);
    if lose_life(state) {
        let p = &mut state.player;
        p.pos = state.level.player_spawn;
        p.vel = glam::Vec2::ZERO;
        p.invincible = INVINCIBILITY_TICKS;
    }
}

/// Decrement lives; returns false when that was the last one
fn lose_life(state: &mut GameState) -> bool {
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LivesChanged(state.lives));
    if state.lives == 0 {
        log::info!("Game over on '{}'", state.level.name);
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver);
        return false;
    }
    true
}

/// Feet within `depth` of the target's top while falling
#[inline]
fn is_stomp(player: &Rect, vy: f32, target: &Rect, depth: f32) -> bool {
    vy > 0.0 && player.bottom() - target.y < depth
}

/// Check the player against everything it can touch this tick
pub fn resolve_contacts(state: &mut GameState) {
    let body = state.player.rect();

    for i in 0..state.coins.len() {
        let coin = &mut state.coins[i];
        if !coin.collected && body.overlaps(&pickup_rect(coin.pos, COIN_SIZE, COIN_SIZE)) {
            coin.collected = true;
            state.level_coins += 1;
            state.emit(GameEvent::CoinsChanged(state.level_coins));
        }
    }

    for i in 0..state.hearts.len() {
        let heart = &mut state.hearts[i];
        if !heart.collected && body.overlaps(&pickup_rect(heart.pos, HEART_SIZE, HEART_SIZE)) {
            heart.collected = true;
            state.lives = (state.lives + 1).min(MAX_LIVES);
            state.emit(GameEvent::LivesChanged(state.lives));
        }
    }

    for i in 0..state.chests.len() {
        let chest = &mut state.chests[i];
        if !chest.opened && body.overlaps(&pickup_rect(chest.pos, CHEST_WIDTH, CHEST_HEIGHT)) {
            chest.opened = true;
            let reward = chest.reward;
            log::debug!("Chest opened (reward {})", reward);
            state.emit(GameEvent::ChestOpened { reward });
        }
    }

    if body.overlaps(&state.flag) {
        complete_level(state);
        return;
    }

    if state.player.invincible > 0 {
        return;
    }

    let spike_hit = state
        .spikes
        .iter()
        .any(|s| body.overlaps(&s.extend_up(SPIKE_REACH)))
        || state
            .moving_spikes
            .iter()
            .any(|ms| body.overlaps(&ms.rect().extend_up(SPIKE_REACH)));
    if spike_hit {
        player_hit(state);
        return;
    }

    // Bats first, then robots
    for bats in [true, false] {
        for i in 0..state.enemies.len() {
            let enemy = &state.enemies[i];
            if !enemy.alive || enemy.kind.is_bat() != bats {
                continue;
            }
            let target = enemy.rect();
            if !body.overlaps(&target) {
                continue;
            }
            if is_stomp(&body, state.player.vel.y, &target, enemy.kind.stomp_depth()) {
                state.enemies[i].alive = false;
                state.player.vel.y = STOMP_BOUNCE;
                state.robots_killed += 1;
            } else {
                player_hit(state);
                return;
            }
        }
    }

    if let Some(boss) = state.boss.as_mut() {
        if boss.alive && boss.invincible == 0 && body.overlaps(&boss.rect()) {
            if is_stomp(&body, state.player.vel.y, &boss.rect(), BOSS_STOMP_DEPTH) {
                boss.invincible = BOSS_STOMP_GRACE_TICKS;
                state.player.vel.y = BOSS_STOMP_BOUNCE;
                if boss.take_damage(1) {
                    log::info!("{} defeated", boss.kind.display_name());
                    state.robots_killed += 1;
                }
            } else {
                player_hit(state);
                return;
            }
        }
    }

    if let Some(i) = state.bullets.iter().position(|b| body.overlaps(&b.rect())) {
        state.bullets.remove(i);
        player_hit(state);
    }
}

fn pickup_rect(pos: glam::Vec2, w: f32, h: f32) -> Rect {
    Rect::new(pos.x, pos.y, w, h)
}

fn complete_level(state: &mut GameState) {
    let stats = state.stats();
    log::info!(
        "Level '{}' complete: {}/{} coins in {:.1}s",
        state.level.name,
        stats.coins_collected,
        stats.total_coins,
        stats.time_taken
    );
    state.phase = GamePhase::Complete;
    state.emit(GameEvent::LevelComplete {
        coins: state.level_coins,
        stats,
    });
}
