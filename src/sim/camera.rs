//! Horizontal camera follow

use super::state::GameState;
use crate::consts::CAMERA_LERP;

/// Ease the camera toward the player and keep it inside the level
///
/// First-order smoothing, so it never overshoots. When the level is narrower
/// than the view the upper bound goes negative and the camera pins to 0.
pub fn update_camera(state: &mut GameState) {
    let target = state.player.rect().center().x - state.view.x / 2.0;
    let max_cam = state.level_width() - state.view.x;
    let cam = state.camera_x + (target - state.camera_x) * CAMERA_LERP;
    state.camera_x = cam.min(max_cam).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_camera_moves_eight_percent() {
        let mut state = GameState::sandbox(Vec2::new(990.0, 300.0));
        // Player center at 1000, target 600
        update_camera(&mut state);
        assert!((state.camera_x - 48.0).abs() < 1e-4);
    }

    #[test]
    fn test_camera_never_overshoots() {
        let mut state = GameState::sandbox(Vec2::new(990.0, 300.0));
        let mut last = 0.0;
        for _ in 0..500 {
            update_camera(&mut state);
            assert!(state.camera_x >= last);
            assert!(state.camera_x <= 600.0);
            last = state.camera_x;
        }
        assert!((state.camera_x - 600.0).abs() < 0.01);
    }

    #[test]
    fn test_camera_clamped_to_level() {
        let mut state = GameState::sandbox(Vec2::new(10.0, 300.0));
        update_camera(&mut state);
        assert_eq!(state.camera_x, 0.0);

        state.player.pos.x = 1980.0;
        state.camera_x = 1199.0;
        update_camera(&mut state);
        assert_eq!(state.camera_x, 1200.0);
    }

    #[test]
    fn test_narrow_level_pins_to_zero() {
        let mut state = GameState::sandbox(Vec2::new(500.0, 300.0));
        state.level.width = 600.0;
        state.camera_x = 50.0;
        update_camera(&mut state);
        assert_eq!(state.camera_x, 0.0);
    }
}
