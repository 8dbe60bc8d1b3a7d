//! Entity behaviour: patrols, bats, moving spikes, the boss and bullets
//!
//! Every patroller shares the same bounded ping-pong. Ranged attackers aim
//! by sign only, using the player's side at the moment they fire.

use glam::Vec2;

use super::geom::ping_pong;
use super::state::{Boss, Bullet, EnemyKind, GameState};
use crate::consts::*;

const ROBOT_BULLET_SIZE: Vec2 = Vec2::new(8.0, 4.0);
const BOSS_BULLET_SIZE: Vec2 = Vec2::new(10.0, 6.0);

/// Horizontal direction from `x` toward the player
#[inline]
fn toward(x: f32, player_x: f32) -> f32 {
    if player_x < x { -1.0 } else { 1.0 }
}

/// Step robots and bats
pub fn update_enemies(state: &mut GameState) {
    let player_x = state.player.pos.x;
    let bullets = &mut state.bullets;

    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        let (x, vx) = ping_pong(
            enemy.pos.x + enemy.vx,
            enemy.vx,
            enemy.patrol_start,
            enemy.patrol_end,
        );
        enemy.pos.x = x;
        enemy.vx = vx;
        enemy.frame = enemy.frame.wrapping_add(1);

        match &mut enemy.kind {
            EnemyKind::Robot { shoot_timer } => {
                *shoot_timer = shoot_timer.saturating_sub(1);
                if *shoot_timer == 0 {
                    *shoot_timer = ROBOT_SHOOT_TICKS;
                    let dir = toward(enemy.pos.x, player_x);
                    bullets.push(Bullet {
                        pos: Vec2::new(
                            enemy.pos.x + enemy.size.x / 2.0,
                            enemy.pos.y + enemy.size.y / 2.0,
                        ),
                        vx: dir * ROBOT_BULLET_SPEED,
                        size: ROBOT_BULLET_SIZE,
                    });
                }
            }
            EnemyKind::Bat {
                base_y,
                amplitude,
                frequency,
            } => {
                enemy.pos.y = *base_y + (enemy.frame as f32 * *frequency).sin() * *amplitude;
            }
        }
    }
}

/// Slide moving spikes along their paths
pub fn update_moving_spikes(state: &mut GameState) {
    for spike in &mut state.moving_spikes {
        let (progress, direction) = ping_pong(
            spike.progress + spike.speed * spike.direction,
            spike.direction,
            0.0,
            1.0,
        );
        spike.progress = progress;
        spike.direction = direction;
        spike.pos = spike.start.lerp(spike.end, progress);
    }
}

/// Step the boss: grace timer, patrol, phase check and ranged attack
pub fn update_boss(state: &mut GameState) {
    let player_x = state.player.pos.x;
    let Some(boss) = state.boss.as_mut().filter(|b| b.alive) else {
        return;
    };

    boss.frame = boss.frame.wrapping_add(1);

    if boss.invincible > 0 {
        boss.invincible -= 1;
        if boss.invincible == 0 {
            // Knockback over; back to cruising in whatever way it now faces
            boss.vx = boss.vx.signum() * boss.patrol_speed;
        }
    }

    let (x, vx) = ping_pong(
        boss.pos.x + boss.vx,
        boss.vx,
        boss.patrol_start,
        boss.patrol_end,
    );
    boss.pos.x = x;
    boss.vx = vx;
    if vx != 0.0 {
        boss.direction = vx.signum();
    }

    boss.check_enrage();

    boss.attack_cooldown = boss.attack_cooldown.saturating_sub(1);
    if boss.attack_cooldown == 0 {
        boss.attack_cooldown = boss.shoot_interval();
        let bullet = boss_bullet(boss, player_x);
        state.bullets.push(bullet);
    }
}

fn boss_bullet(boss: &Boss, player_x: f32) -> Bullet {
    let center = boss.rect().center();
    Bullet {
        pos: Vec2::new(center.x, center.y - BOSS_BULLET_SIZE.y / 2.0),
        vx: toward(boss.pos.x, player_x) * BOSS_BULLET_SPEED,
        size: BOSS_BULLET_SIZE,
    }
}

/// Move bullets and drop the ones far outside the view
pub fn update_bullets(state: &mut GameState) {
    let lo = state.camera_x - BULLET_DESPAWN_MARGIN;
    let hi = state.camera_x + state.view.x + BULLET_DESPAWN_MARGIN;
    state.bullets.retain_mut(|b| {
        b.pos.x += b.vx;
        b.pos.x >= lo && b.pos.x <= hi
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::BossKind;
    use crate::sim::state::{BossPhase, Enemy, MovingSpike};
    use proptest::prelude::*;

    fn robot(x: f32, start: f32, end: f32, vx: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, 344.0),
            size: Vec2::new(ROBOT_WIDTH, ROBOT_HEIGHT),
            vx,
            patrol_start: start,
            patrol_end: end,
            alive: true,
            frame: 0,
            kind: EnemyKind::Robot { shoot_timer: 500 },
        }
    }

    fn boss(hp: i32) -> Boss {
        Boss {
            kind: BossKind::Pharaoh,
            pos: Vec2::new(600.0, 320.0),
            size: Vec2::splat(BOSS_SIZE),
            vx: BOSS_PATROL_SPEED,
            patrol_start: 450.0,
            patrol_end: 750.0,
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
    fn test_patrol_turns_at_bounds() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        state.enemies.push(robot(109.5, 50.0, 110.0, 1.0));
        update_enemies(&mut state);
        assert_eq!(state.enemies[0].pos.x, 110.0);
        assert_eq!(state.enemies[0].vx, -1.0);
        update_enemies(&mut state);
        assert_eq!(state.enemies[0].pos.x, 109.0);
    }

    #[test]
    fn test_dead_enemies_are_inert() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        let mut e = robot(100.0, 50.0, 150.0, 1.0);
        e.alive = false;
        state.enemies.push(e);
        update_enemies(&mut state);
        assert_eq!(state.enemies[0].pos.x, 100.0);
        assert_eq!(state.enemies[0].frame, 0);
    }

    #[test]
    fn test_robot_shoots_toward_player_side() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        let mut e = robot(300.0, 250.0, 350.0, 1.0);
        e.kind = EnemyKind::Robot { shoot_timer: 1 };
        state.enemies.push(e);

        update_enemies(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].vx, -ROBOT_BULLET_SPEED);
        assert_eq!(
            state.enemies[0].kind,
            EnemyKind::Robot {
                shoot_timer: ROBOT_SHOOT_TICKS
            }
        );

        // Player moves to the other side; next shot follows
        state.player.pos.x = 900.0;
        state.enemies[0].kind = EnemyKind::Robot { shoot_timer: 1 };
        update_enemies(&mut state);
        assert_eq!(state.bullets[1].vx, ROBOT_BULLET_SPEED);
    }

    #[test]
    fn test_bat_bobs_around_baseline() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        state.enemies.push(Enemy {
            pos: Vec2::new(400.0, 200.0),
            size: Vec2::new(BAT_WIDTH, BAT_HEIGHT),
            vx: PATROL_SPEED,
            patrol_start: 300.0,
            patrol_end: 500.0,
            alive: true,
            frame: 0,
            kind: EnemyKind::Bat {
                base_y: 200.0,
                amplitude: 30.0,
                frequency: 0.05,
            },
        });
        for _ in 0..200 {
            update_enemies(&mut state);
            let y = state.enemies[0].pos.y;
            assert!((170.0..=230.0).contains(&y));
        }
        let expected = 200.0 + (200.0f32 * 0.05).sin() * 30.0;
        assert!((state.enemies[0].pos.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_moving_spike_ping_pongs() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        state.moving_spikes.push(MovingSpike {
            pos: Vec2::new(100.0, 352.0),
            size: Vec2::new(SPIKE_WIDTH, SPIKE_HEIGHT),
            start: Vec2::new(100.0, 352.0),
            end: Vec2::new(200.0, 352.0),
            speed: 0.3,
            progress: 0.0,
            direction: 1.0,
        });
        update_moving_spikes(&mut state);
        update_moving_spikes(&mut state);
        assert!((state.moving_spikes[0].pos.x - 160.0).abs() < 1e-3);
        update_moving_spikes(&mut state);
        update_moving_spikes(&mut state);
        let spike = &state.moving_spikes[0];
        assert_eq!(spike.progress, 1.0);
        assert_eq!(spike.direction, -1.0);
        assert_eq!(spike.pos.x, 200.0);
    }

    #[test]
    fn test_boss_resumes_patrol_after_knockback() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        let mut b = boss(10);
        b.vx = -6.0;
        b.invincible = 2;
        state.boss = Some(b);

        update_boss(&mut state);
        assert_eq!(state.boss.as_ref().unwrap().pos.x, 594.0);
        update_boss(&mut state);
        let b = state.boss.as_ref().unwrap();
        assert_eq!(b.invincible, 0);
        assert_eq!(b.vx, -BOSS_PATROL_SPEED);
        assert_eq!(b.direction, -1.0);
    }

    #[test]
    fn test_boss_shot_cadence_halves_when_enraged() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        let mut b = boss(10);
        b.attack_cooldown = 1;
        state.boss = Some(b);

        update_boss(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].vx, -BOSS_BULLET_SPEED);
        assert_eq!(state.boss.as_ref().unwrap().attack_cooldown, BOSS_SHOOT_TICKS);

        let b = state.boss.as_mut().unwrap();
        b.take_damage(5);
        b.attack_cooldown = 1;
        update_boss(&mut state);
        assert_eq!(
            state.boss.as_ref().unwrap().attack_cooldown,
            BOSS_SHOOT_TICKS / 2
        );
    }

    #[test]
    fn test_boss_enrages_through_repeated_stomps() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        state.boss = Some(boss(6));
        let mut phases = Vec::new();

        for _ in 0..6 {
            let b = state.boss.as_mut().unwrap();
            b.invincible = BOSS_STOMP_GRACE_TICKS;
            b.take_damage(1);
            for _ in 0..BOSS_STOMP_GRACE_TICKS {
                update_boss(&mut state);
            }
            phases.push(state.boss.as_ref().unwrap().phase);
        }

        assert_eq!(phases[1], BossPhase::Normal);
        assert_eq!(phases[2], BossPhase::Enraged);
        // Never returns to normal
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
        assert!(!state.boss.as_ref().unwrap().alive);
    }

    #[test]
    fn test_bullets_despawn_outside_view() {
        let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
        state.camera_x = 500.0;
        state.bullets.push(Bullet {
            pos: Vec2::new(401.0, 300.0),
            vx: -4.0,
            size: ROBOT_BULLET_SIZE,
        });
        state.bullets.push(Bullet {
            pos: Vec2::new(800.0, 300.0),
            vx: 4.0,
            size: ROBOT_BULLET_SIZE,
        });
        update_bullets(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.x, 804.0);
    }

    proptest! {
        #[test]
        fn patrol_stays_in_bounds(
            start in 0.0f32..2000.0,
            len in 0.0f32..400.0,
            offset in 0.0f32..1.0,
            speed in 0.1f32..8.0,
            steps in 1usize..800,
        ) {
            let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
            let end = start + len;
            state.enemies.push(robot(start + len * offset, start, end, speed));
            for _ in 0..steps {
                update_enemies(&mut state);
                let x = state.enemies[0].pos.x;
                prop_assert!(x >= start && x <= end);
            }
        }

        #[test]
        fn spike_progress_stays_in_unit_range(speed in 0.001f32..1.5, steps in 1usize..500) {
            let mut state = GameState::sandbox(Vec2::new(60.0, 300.0));
            state.moving_spikes.push(MovingSpike {
                pos: Vec2::new(0.0, 352.0),
                size: Vec2::new(SPIKE_WIDTH, SPIKE_HEIGHT),
                start: Vec2::new(0.0, 352.0),
                end: Vec2::new(120.0, 352.0),
                speed,
                progress: 0.0,
                direction: 1.0,
            });
            for _ in 0..steps {
                update_moving_spikes(&mut state);
                let s = &state.moving_spikes[0];
                prop_assert!((0.0..=1.0).contains(&s.progress));
                prop_assert!(s.direction == 1.0 || s.direction == -1.0);
            }
        }
    }
}
