//! Procedural level extension
//!
//! Every load of a level keeps the hand-authored opening intact and appends
//! 40-80% more width of generated terrain, built segment by segment: a gap,
//! a ground slab, then a handful of optional features rolled independently.
//! Optional features that would not fit their segment are skipped rather than
//! squeezed in.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::templates::{LevelTemplate, TEMPLATES, ground, plat};
use super::{BatSpawn, ChestSpawn, LevelData, MovingSpikeSpawn, RobotSpawn};
use crate::consts::{CHEST_HEIGHT, CHEST_WIDTH, GROUND_Y, ROBOT_HEIGHT, SPIKE_WIDTH};
use crate::sim::geom::Rect;

/// Generation starts this far before the template's right edge
const EXTENSION_OVERLAP: f32 = 200.0;
/// Stop placing segments once this close to the new right edge
const FINAL_SEGMENT_WIDTH: f32 = 300.0;
/// Flag sits this far in from the right edge; nothing generated goes past it
const FLAG_INSET: f32 = 100.0;

const SEGMENT_MIN_WIDTH: u32 = 150;
const SEGMENT_WIDTH_SPREAD: u32 = 250;
const GAP_MIN: u32 = 40;
const GAP_SPREAD: u32 = 80;

/// Robots keep this far away from both ends of their ground segment
pub const ROBOT_MARGIN: f32 = 60.0;
const SPIKE_MARGIN: f32 = 20.0;
const MOVING_SPIKE_MARGIN: f32 = 20.0;
const MOVING_SPIKE_MIN_TRAVEL: f32 = 50.0;
/// Largest random shift applied to every robot after generation
const ROBOT_JITTER: f32 = 20.0;

/// Ground-level y for coins, spikes and hearts sitting on a ground slab
const GROUND_ITEM_Y: f32 = 340.0;
const SPIKE_Y: f32 = 360.0;
/// Platforms above this line count as "elevated" when placing the chest
const ELEVATED_LINE: f32 = 300.0;

/// A generated ground slab
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub start: f32,
    pub end: f32,
}

impl Segment {
    fn width(&self) -> f32 {
        self.end - self.start
    }
}

/// Map an out-of-range level index to the first level
pub fn resolve_index(index: usize) -> usize {
    if index < TEMPLATES.len() {
        index
    } else {
        log::warn!(
            "Level {} does not exist ({} defined), falling back to level 0",
            index,
            TEMPLATES.len()
        );
        0
    }
}

/// Build level `index` with its procedural extension
///
/// The same `(index, seed)` pair always produces the same level.
pub fn generate_level(index: usize, seed: u64) -> LevelData {
    let index = resolve_index(index);
    let mut rng = Pcg32::seed_from_u64(seed);
    let level = extend_template(&TEMPLATES[index], &mut rng);
    log::info!(
        "Generated level {} '{}': width {} -> {} (seed {})",
        index,
        level.name,
        level.template_width,
        level.width,
        seed
    );
    level
}

/// Copy a template and append a generated extension
pub fn extend_template<R: Rng>(template: &LevelTemplate, rng: &mut R) -> LevelData {
    extend(template, rng, &mut Vec::new())
}

/// Uniform integer in `[0, n)` as a pixel offset; `n` is floored at 1
#[inline]
fn roll<R: Rng>(rng: &mut R, n: f32) -> f32 {
    let n = (n.floor() as i64).max(1) as u32;
    rng.random_range(0..n) as f32
}

#[inline]
fn chance<R: Rng>(rng: &mut R, p: f32) -> bool {
    rng.random::<f32>() < p
}

pub(crate) fn extend<R: Rng>(
    template: &LevelTemplate,
    rng: &mut R,
    segments: &mut Vec<Segment>,
) -> LevelData {
    let mut level = template.to_level_data();

    let extra_width = (template.width * (0.4 + rng.random::<f32>() * 0.4)).floor();
    let new_width = template.width + extra_width;

    let ext_start = template.width - EXTENSION_OVERLAP;
    let mut cursor = ext_start;

    while cursor < new_width - FINAL_SEGMENT_WIDTH {
        let seg_w = (SEGMENT_MIN_WIDTH + rng.random_range(0..SEGMENT_WIDTH_SPREAD)) as f32;
        let gap = (GAP_MIN + rng.random_range(0..GAP_SPREAD)) as f32;
        cursor += gap;
        // Anything past the flag could never be reached
        let seg_w = seg_w.min(new_width - FLAG_INSET - cursor);

        let seg = Segment {
            start: cursor,
            end: cursor + seg_w,
        };
        level.platforms.push(ground(seg.start, seg_w));
        segments.push(seg);

        place_elevated_platform(&mut level, rng, seg);
        place_ground_coins(&mut level, rng, seg);
        place_robot(&mut level, rng, seg);
        place_spikes(&mut level, rng, seg);
        place_bat(&mut level, rng, seg);
        place_moving_spike(&mut level, rng, seg);

        cursor += seg_w;
    }

    // Guaranteed landing strip in front of the flag
    level
        .platforms
        .push(ground(new_width - FINAL_SEGMENT_WIDTH, FINAL_SEGMENT_WIDTH));

    if chance(rng, 0.6) {
        let hx = ext_start + roll(rng, extra_width * 0.5);
        level.hearts.push(Vec2::new(hx, GROUND_ITEM_Y));
    }

    place_chest(&mut level, rng, ext_start, extra_width);

    // Run-to-run variety, kept inside each robot's own patrol range
    for robot in &mut level.robots {
        let shift = ((rng.random::<f32>() - 0.5) * ROBOT_JITTER * 2.0).floor();
        robot.pos.x = (robot.pos.x + shift).clamp(robot.patrol_start, robot.patrol_end);
    }

    level.width = new_width;
    level.flag_pos = Vec2::new(new_width - FLAG_INSET, 320.0);
    level
}

fn place_elevated_platform<R: Rng>(level: &mut LevelData, rng: &mut R, seg: Segment) {
    if !chance(rng, 0.6) {
        return;
    }
    let py = 140.0 + roll(rng, 160.0);
    let pw = 64.0 + roll(rng, 80.0);
    let px = seg.start + roll(rng, seg.width() - pw);
    level.platforms.push(plat(px, py, pw));

    if chance(rng, 0.7) {
        level.coins.push(Vec2::new(px + 10.0, py - 28.0));
        level.coins.push(Vec2::new(px + 40.0, py - 28.0));
    }
}

fn place_ground_coins<R: Rng>(level: &mut LevelData, rng: &mut R, seg: Segment) {
    if !chance(rng, 0.5) {
        return;
    }
    let cx = seg.start + 30.0 + roll(rng, seg.width() - 60.0);
    level.coins.push(Vec2::new(cx, GROUND_ITEM_Y));
    level.coins.push(Vec2::new(cx + 30.0, GROUND_ITEM_Y));
}

/// Patrol range is chosen first, then the center is drawn so the whole
/// range fits inside the margin-trimmed segment.
fn place_robot<R: Rng>(level: &mut LevelData, rng: &mut R, seg: Segment) {
    if !chance(rng, 0.4) {
        return;
    }
    let usable = seg.width() - ROBOT_MARGIN * 2.0;
    let range = (60.0 + roll(rng, 60.0)).min((usable / 2.0).floor());
    if range <= 0.0 {
        return;
    }
    let lo = seg.start + ROBOT_MARGIN + range;
    let hi = seg.end - ROBOT_MARGIN - range;
    let x = lo + roll(rng, hi - lo);
    level.robots.push(RobotSpawn::centered(x, GROUND_Y - ROBOT_HEIGHT, range));
}

fn place_spikes<R: Rng>(level: &mut LevelData, rng: &mut R, seg: Segment) {
    if !chance(rng, 0.5) {
        return;
    }
    let min_x = seg.start + SPIKE_MARGIN;
    let max_x = seg.end - SPIKE_WIDTH * 2.0 - SPIKE_MARGIN;
    if max_x <= min_x {
        return;
    }
    let sx = min_x + roll(rng, max_x - min_x);
    level.spikes.push(Vec2::new(sx, SPIKE_Y));
    if chance(rng, 0.5) && sx + SPIKE_WIDTH < seg.end - SPIKE_MARGIN {
        level.spikes.push(Vec2::new(sx + SPIKE_WIDTH, SPIKE_Y));
    }
}

fn place_bat<R: Rng>(level: &mut LevelData, rng: &mut R, seg: Segment) {
    if !chance(rng, 0.35) {
        return;
    }
    let x = seg.start + roll(rng, seg.width());
    let y = 80.0 + roll(rng, 100.0);
    let patrol_range = 80.0 + roll(rng, 60.0);
    let amplitude = 20.0 + roll(rng, 20.0);
    let frequency = 0.025 + rng.random::<f32>() * 0.02;
    level.bats.push(BatSpawn {
        pos: Vec2::new(x, y),
        patrol_range,
        amplitude,
        frequency,
    });
}

fn place_moving_spike<R: Rng>(level: &mut LevelData, rng: &mut R, seg: Segment) {
    if !chance(rng, 0.25) {
        return;
    }
    let travel = 100.0 + roll(rng, 100.0);
    let start_x = seg.start
        + MOVING_SPIKE_MARGIN
        + roll(rng, seg.width() - travel - MOVING_SPIKE_MARGIN * 2.0);
    // Clamp the far edge of the spike box, not its left corner
    let end_x = (start_x + travel).min(seg.end - MOVING_SPIKE_MARGIN - SPIKE_WIDTH);
    let speed = 0.004 + rng.random::<f32>() * 0.005;
    if end_x - start_x < MOVING_SPIKE_MIN_TRAVEL {
        return;
    }
    level.moving_spikes.push(MovingSpikeSpawn {
        start: Vec2::new(start_x, SPIKE_Y),
        end: Vec2::new(end_x, SPIKE_Y),
        speed,
    });
}

/// One chest per extension, on an elevated platform under the rolled x if
/// there is one, otherwise on the ground.
fn place_chest<R: Rng>(level: &mut LevelData, rng: &mut R, ext_start: f32, extra_width: f32) {
    let chest_x = ext_start + 100.0 + roll(rng, extra_width - 400.0);
    let perch = level
        .platforms
        .iter()
        .find(|p| p.y < ELEVATED_LINE && p.x <= chest_x && p.right() >= chest_x + CHEST_WIDTH)
        .copied();
    let y = match perch {
        Some(Rect { y, .. }) => y - CHEST_HEIGHT,
        None => GROUND_ITEM_Y,
    };
    level.chests.push(ChestSpawn {
        pos: Vec2::new(chest_x, y),
        reward: 0,
    });
}
