//! Melee combat: attack triggering, hitboxes and hit resolution
//!
//! An attack opens a timed window. While the window is open, a fixed hitbox
//! anchored to the player is tested every tick (not swept). Enemies die on
//! the first hit, the boss is protected by a short grace window, so each
//! target is affected at most once per attack.

use glam::Vec2;

use super::state::{AttackKind, GameState, Player};
use crate::consts::*;
use crate::sim::geom::Rect;

/// Active attack area for the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackHitbox {
    pub rect: Rect,
    pub damage: i32,
    pub knockback: f32,
    pub kind: AttackKind,
}

/// Try to start an attack. Silently ignored mid-attack, on cooldown, or for
/// a special without a full meter.
///
/// Returns true if the attack started.
pub fn trigger_attack(player: &mut Player, kind: AttackKind) -> bool {
    if player.attack_cooldown > 0 || player.attacking.is_some() {
        return false;
    }
    if kind == AttackKind::Special {
        if player.special_charge < SPECIAL_CHARGE_MAX {
            return false;
        }
        player.special_charge = 0;
    }

    player.attacking = Some(kind);
    player.attack_timer = kind.duration();

    if player.combo_timer > 0 {
        player.combo_count += 1;
    } else {
        player.combo_count = 1;
    }
    player.combo_timer = COMBO_WINDOW_TICKS;
    true
}

/// Hitbox of the player's current attack, if any
pub fn attack_hitbox(player: &Player) -> Option<AttackHitbox> {
    let kind = player.attacking?;
    if player.attack_timer == 0 {
        return None;
    }

    let Vec2 { x, y } = player.pos;
    let Vec2 { x: w, y: h } = player.size;
    let front = |reach: f32| match player.facing {
        super::state::Facing::Right => x + w,
        super::state::Facing::Left => x - reach,
    };

    let rect = match kind {
        AttackKind::Punch => Rect::new(front(18.0), y + 6.0, 18.0, 12.0),
        AttackKind::Kick => Rect::new(front(24.0), y + 12.0, 24.0, 14.0),
        AttackKind::Special => Rect::new(x - 20.0, y - 10.0, w + 40.0, h + 20.0),
    };

    Some(AttackHitbox {
        rect,
        damage: kind.damage(),
        knockback: kind.knockback(),
        kind,
    })
}

/// Per-tick combat bookkeeping and hit resolution
pub fn update_combat(state: &mut GameState) {
    let p = &mut state.player;
    p.attack_cooldown = p.attack_cooldown.saturating_sub(1);
    if p.combo_timer > 0 {
        p.combo_timer -= 1;
    } else {
        p.combo_count = 0;
    }

    if state.time_ticks % CHARGE_REGEN_TICKS == 0 {
        p.add_charge(1);
    }

    let Some(kind) = p.attacking else {
        return;
    };
    p.attack_timer = p.attack_timer.saturating_sub(1);
    if p.attack_timer == 0 {
        p.attacking = None;
        p.attack_cooldown = kind.cooldown();
        return;
    }

    if let Some(hitbox) = attack_hitbox(&state.player) {
        apply_hits(state, &hitbox);
    }
}

fn apply_hits(state: &mut GameState, hitbox: &AttackHitbox) {
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if hitbox.rect.overlaps(&enemy.rect()) {
            enemy.alive = false;
            state.robots_killed += 1;
            state.player.add_charge(enemy.kind.charge_gain());
        }
    }

    if let Some(boss) = state.boss.as_mut() {
        if boss.alive && boss.invincible == 0 && hitbox.rect.overlaps(&boss.rect()) {
            boss.invincible = BOSS_MELEE_GRACE_TICKS;
            boss.vx = hitbox.knockback * state.player.facing.sign();
            state.player.add_charge(BOSS_CHARGE_GAIN);
            if boss.take_damage(hitbox.damage) {
                log::info!("{} defeated", boss.kind.display_name());
                state.robots_killed += 1;
            }
        }
    }

    // Deflect bullets
    state.bullets.retain(|b| !hitbox.rect.overlaps(&b.rect()));
}
