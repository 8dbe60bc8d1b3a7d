//! State to draw-list conversion
//!
//! `build_frame` turns a `GameState` into an ordered list of world-space
//! draw commands plus HUD values. It draws no pixels: hosts rasterize the
//! commands however they like, translating world space by `-camera_x`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::level::BossKind;
use crate::sim::{AttackKind, Facing, GameState, Rect, attack_hitbox};

/// Platforms this far outside the view are still drawn
const CULL_MARGIN: f32 = 50.0;
/// Invincible sprites are hidden on 2 of every 4 ticks
const FLICKER_PERIOD: u64 = 4;
/// Full special meter pulses on this period
const CHARGE_FLASH_PERIOD: u64 = 30;

/// A single world-space drawable, in back-to-front order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Platform {
        rect: Rect,
        color: String,
    },
    Spike {
        rect: Rect,
        moving: bool,
    },
    Bat {
        rect: Rect,
        frame: u32,
    },
    Coin {
        rect: Rect,
    },
    Heart {
        rect: Rect,
    },
    Chest {
        rect: Rect,
        opened: bool,
    },
    Flag {
        rect: Rect,
    },
    Robot {
        rect: Rect,
        facing: Facing,
        frame: u32,
    },
    Boss {
        rect: Rect,
        kind: BossKind,
        hp: i32,
        max_hp: i32,
        enraged: bool,
        facing: Facing,
    },
    Bullet {
        rect: Rect,
    },
    Player {
        rect: Rect,
        facing: Facing,
        frame: u32,
        crouching: bool,
        skin: usize,
    },
    /// Active melee hitbox; `progress` runs 1 -> 0 over the attack
    Attack {
        rect: Rect,
        kind: AttackKind,
        progress: f32,
    },
}

/// Overlay values drawn in screen space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub level_name: String,
    pub lives: u32,
    pub coins: u32,
    pub total_coins: u32,
    pub special_charge: u32,
    /// Meter is full and in the bright half of its pulse
    pub charge_flash: bool,
    pub attack: Option<AttackKind>,
    /// Combo count while a chain is live
    pub combo: Option<u32>,
    /// Boss health bar, while the boss lives
    pub boss: Option<(BossKind, i32, i32)>,
}

/// Everything a host needs to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub camera_x: f32,
    pub view: Vec2,
    pub sky: String,
    pub commands: Vec<DrawCommand>,
    pub hud: Hud,
}

fn facing_from(sign: f32) -> Facing {
    if sign < 0.0 { Facing::Left } else { Facing::Right }
}

/// Hidden this tick because of invincibility flicker
#[inline]
fn flickered_out(invincible: u32, tick: u64) -> bool {
    invincible > 0 && tick % FLICKER_PERIOD >= FLICKER_PERIOD / 2
}

/// Coin bob in pixels
fn bob(tick: u64, rate: f32, phase: f32, amplitude: f32) -> f32 {
    (tick as f32 * rate + phase).sin() * amplitude
}

/// Build the draw list for `state`
pub fn build_frame(state: &GameState, skin: usize) -> Frame {
    let tick = state.time_ticks;
    let cam = state.camera_x;
    let theme = &state.level.theme;
    let mut commands = Vec::new();

    let left = cam - CULL_MARGIN;
    let right = cam + state.view.x + CULL_MARGIN;
    commands.extend(
        state
            .platforms
            .iter()
            .filter(|p| p.right() > left && p.x < right)
            .map(|p| DrawCommand::Platform {
                rect: *p,
                color: if p.y >= GROUND_Y {
                    theme.ground.clone()
                } else {
                    theme.platform.clone()
                },
            }),
    );

    commands.extend(state.spikes.iter().map(|s| DrawCommand::Spike {
        rect: *s,
        moving: false,
    }));
    commands.extend(state.moving_spikes.iter().map(|ms| DrawCommand::Spike {
        rect: ms.rect(),
        moving: true,
    }));

    let alive = state.enemies.iter().filter(|e| e.alive);
    commands.extend(
        alive
            .clone()
            .filter(|e| e.kind.is_bat())
            .map(|e| DrawCommand::Bat {
                rect: e.rect(),
                frame: e.frame,
            }),
    );

    commands.extend(state.coins.iter().filter(|c| !c.collected).map(|c| {
        let dy = bob(tick, 0.05, c.bob_offset, 3.0);
        DrawCommand::Coin {
            rect: Rect::new(c.pos.x, c.pos.y + dy, COIN_SIZE, COIN_SIZE),
        }
    }));
    commands.extend(state.hearts.iter().filter(|h| !h.collected).map(|h| {
        let dy = bob(tick, 0.04, 1.0, 2.0);
        DrawCommand::Heart {
            rect: Rect::new(h.pos.x, h.pos.y + dy, HEART_SIZE, HEART_SIZE),
        }
    }));
    commands.extend(state.chests.iter().map(|c| DrawCommand::Chest {
        rect: Rect::new(c.pos.x, c.pos.y, CHEST_WIDTH, CHEST_HEIGHT),
        opened: c.opened,
    }));

    commands.push(DrawCommand::Flag { rect: state.flag });

    commands.extend(
        alive
            .filter(|e| !e.kind.is_bat())
            .map(|e| DrawCommand::Robot {
                rect: e.rect(),
                facing: facing_from(e.vx),
                frame: e.frame,
            }),
    );

    if let Some(boss) = state.boss.as_ref().filter(|b| b.alive) {
        if !flickered_out(boss.invincible, tick) {
            commands.push(DrawCommand::Boss {
                rect: boss.rect(),
                kind: boss.kind,
                hp: boss.hp,
                max_hp: boss.max_hp,
                enraged: boss.phase == crate::sim::BossPhase::Enraged,
                facing: facing_from(boss.direction),
            });
        }
    }

    commands.extend(
        state
            .bullets
            .iter()
            .map(|b| DrawCommand::Bullet { rect: b.rect() }),
    );

    let p = &state.player;
    if !flickered_out(p.invincible, tick) {
        commands.push(DrawCommand::Player {
            rect: p.rect(),
            facing: p.facing,
            frame: p.frame,
            crouching: p.crouching,
            skin,
        });
    }

    if let Some(hitbox) = attack_hitbox(p) {
        commands.push(DrawCommand::Attack {
            rect: hitbox.rect,
            kind: hitbox.kind,
            progress: p.attack_timer as f32 / hitbox.kind.duration() as f32,
        });
    }

    Frame {
        camera_x: cam,
        view: state.view,
        sky: theme.sky.clone(),
        commands,
        hud: build_hud(state),
    }
}

fn build_hud(state: &GameState) -> Hud {
    let p = &state.player;
    let full = p.special_charge >= SPECIAL_CHARGE_MAX;
    Hud {
        level_name: state.level.name.clone(),
        lives: state.lives,
        coins: state.level_coins,
        total_coins: state.coins.len() as u32,
        special_charge: p.special_charge,
        charge_flash: full && state.time_ticks % CHARGE_FLASH_PERIOD < CHARGE_FLASH_PERIOD / 2,
        attack: p.attacking,
        combo: (p.combo_count > 1 && p.combo_timer > 0).then_some(p.combo_count),
        boss: state
            .boss
            .as_ref()
            .filter(|b| b.alive)
            .map(|b| (b.kind, b.hp.max(0), b.max_hp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combat::trigger_attack;
    use crate::sim::{Coin, Enemy, EnemyKind};

    fn sandbox() -> GameState {
        GameState::sandbox(Vec2::new(100.0, 336.0))
    }

    fn count(frame: &Frame, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        frame.commands.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_platforms_culled_to_view() {
        let mut state = sandbox();
        state.platforms.push(Rect::new(820.0, 300.0, 100.0, 24.0));
        state.platforms.push(Rect::new(900.0, 300.0, 100.0, 24.0));
        let frame = build_frame(&state, 0);
        // Floor and the one starting inside the margin
        assert_eq!(
            count(&frame, |c| matches!(c, DrawCommand::Platform { .. })),
            2
        );
    }

    #[test]
    fn test_collected_and_dead_are_omitted() {
        let mut state = sandbox();
        state.coins.push(Coin {
            pos: Vec2::new(300.0, 340.0),
            collected: true,
            bob_offset: 0.0,
        });
        state.enemies.push(Enemy {
            pos: Vec2::new(400.0, 344.0),
            size: Vec2::new(ROBOT_WIDTH, ROBOT_HEIGHT),
            vx: -1.0,
            patrol_start: 350.0,
            patrol_end: 450.0,
            alive: false,
            frame: 0,
            kind: EnemyKind::Robot { shoot_timer: 10 },
        });
        let frame = build_frame(&state, 0);
        assert_eq!(count(&frame, |c| matches!(c, DrawCommand::Coin { .. })), 0);
        assert_eq!(count(&frame, |c| matches!(c, DrawCommand::Robot { .. })), 0);
    }

    #[test]
    fn test_invincible_player_flickers() {
        let mut state = sandbox();
        state.player.invincible = 30;
        let visible: Vec<bool> = (0..4)
            .map(|t| {
                state.time_ticks = t;
                let frame = build_frame(&state, 3);
                count(&frame, |c| matches!(c, DrawCommand::Player { .. })) == 1
            })
            .collect();
        assert_eq!(visible, vec![true, true, false, false]);
    }

    #[test]
    fn test_player_carries_skin() {
        let frame = build_frame(&sandbox(), 7);
        assert!(
            frame
                .commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Player { skin: 7, .. }))
        );
    }

    #[test]
    fn test_attack_drawn_while_active() {
        let mut state = sandbox();
        trigger_attack(&mut state.player, AttackKind::Kick);
        let frame = build_frame(&state, 0);
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Attack {
                kind: AttackKind::Kick,
                progress,
                ..
            } if *progress == 1.0
        )));
        assert_eq!(frame.hud.attack, Some(AttackKind::Kick));
    }

    #[test]
    fn test_hud_charge_flash_and_combo() {
        let mut state = sandbox();
        state.player.special_charge = SPECIAL_CHARGE_MAX;
        state.time_ticks = 10;
        assert!(build_frame(&state, 0).hud.charge_flash);
        state.time_ticks = 20;
        assert!(!build_frame(&state, 0).hud.charge_flash);

        state.player.combo_count = 1;
        state.player.combo_timer = 10;
        assert_eq!(build_frame(&state, 0).hud.combo, None);
        state.player.combo_count = 3;
        assert_eq!(build_frame(&state, 0).hud.combo, Some(3));
        state.player.combo_timer = 0;
        assert_eq!(build_frame(&state, 0).hud.combo, None);
    }
}
