//! Player controller
//!
//! Input to velocity, then axis-separated integration against the level's
//! platforms. One call is one fixed tick; there is no variable-dt path.

use super::contact;
use super::geom::{resolve_x, resolve_y};
use super::state::{Facing, GameState};
use super::tick::TickInput;
use crate::consts::*;

/// Ticks per walk-cycle frame
const WALK_FRAME_TICKS: u32 = 6;
const WALK_FRAMES: u32 = 4;

/// Advance the player one tick
pub fn update_player(state: &mut GameState, input: &TickInput) {
    let level_width = state.level_width();
    let p = &mut state.player;

    p.invincible = p.invincible.saturating_sub(1);

    // Horizontal intent; left wins when both are held
    let speed = if input.sprint { SPRINT_SPEED } else { WALK_SPEED };
    if input.left {
        p.vel.x = -speed;
        p.facing = Facing::Left;
    } else if input.right {
        p.vel.x = speed;
        p.facing = Facing::Right;
    } else {
        p.vel.x = 0.0;
    }

    // Crouch keeps the feet anchored: shrink from the top
    let crouch_delta = PLAYER_HEIGHT - PLAYER_CROUCH_HEIGHT;
    if input.crouch && !p.crouching && p.on_ground {
        p.crouching = true;
        p.size.y = PLAYER_CROUCH_HEIGHT;
        p.pos.y += crouch_delta;
    } else if !input.crouch && p.crouching {
        p.crouching = false;
        p.size.y = PLAYER_HEIGHT;
        p.pos.y -= crouch_delta;
    }

    // Jumps are refused while pinned against either level edge
    if input.jump {
        let at_left = p.pos.x <= 0.0;
        let at_right = p.pos.x >= level_width - p.size.x;
        if !at_left && !at_right {
            if p.on_ground {
                p.vel.y = JUMP_FORCE;
                p.on_ground = false;
                p.can_double_jump = true;
            } else if p.can_double_jump {
                p.vel.y = JUMP_FORCE;
                p.can_double_jump = false;
            }
        }
    }

    p.vel.y = (p.vel.y + GRAVITY).min(TERMINAL_VELOCITY);

    p.pos.x += p.vel.x;
    let res = resolve_x(p.rect(), p.vel.x, &state.platforms);
    p.pos.x = res.pos;
    p.vel.x = res.vel;

    p.pos.y += p.vel.y;
    let (res, grounded) = resolve_y(p.rect(), p.vel.y, &state.platforms);
    p.pos.y = res.pos;
    p.vel.y = res.vel;
    p.on_ground = grounded;

    animate(p);

    let fell = p.pos.y > state.view.y + FALL_DEATH_MARGIN;

    let max_x = level_width - p.size.x;
    p.pos.x = p.pos.x.clamp(0.0, max_x.max(0.0));

    if fell {
        contact::player_fell(state);
    }
}

fn animate(p: &mut super::state::Player) {
    if p.vel.x != 0.0 && p.on_ground {
        p.frame_timer += 1;
        if p.frame_timer > WALK_FRAME_TICKS {
            p.frame = (p.frame + 1) % WALK_FRAMES;
            p.frame_timer = 0;
        }
    } else if !p.on_ground {
        p.frame = 1;
    } else {
        p.frame = 0;
        p.frame_timer = 0;
    }
}
