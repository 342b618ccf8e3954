//! The observer controller: accumulates input into an [`ObserverState`].

use glam::{Mat3, Mat4, Vec2, Vec3};
use orrery_input::{ControlAction, InputSink};

use crate::state::{MoveDirection, ObserverParams, ObserverState, WORLD_UP};

/// Owns the camera pose and the input-derived state that drives it.
#[derive(Debug, Clone)]
pub struct ObserverController {
    state: ObserverState,
    params: ObserverParams,
    capture_enabled: bool,
    /// `None` until the first pointer sample arrives.
    last_pointer: Option<Vec2>,
    held: [bool; 6],
}

impl ObserverController {
    /// Build a controller at `position` looking along `front`.
    ///
    /// Yaw and pitch are derived from `front`, so later look updates continue
    /// from that direction. A zero or non-finite `front` falls back to -Z.
    #[must_use]
    pub fn new(params: ObserverParams, position: Vec3, front: Vec3) -> Self {
        let front = front.try_normalize().unwrap_or(Vec3::NEG_Z);
        let yaw = front.z.atan2(front.x).to_degrees();
        let pitch = front
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-params.pitch_limit, params.pitch_limit);

        let mut state = ObserverState {
            position,
            front,
            up: WORLD_UP,
            right: Vec3::X,
            yaw: if params.wrap_yaw { wrap_degrees(yaw) } else { yaw },
            pitch,
            fov: params.fov.clamp(params.fov_min, params.fov_max),
            movement_speed: params.movement_speed,
        };
        state.update_vectors();

        Self {
            state,
            params,
            capture_enabled: true,
            last_pointer: None,
            held: [false; 6],
        }
    }

    #[must_use]
    pub fn state(&self) -> &ObserverState {
        &self.state
    }

    #[must_use]
    pub fn params(&self) -> &ObserverParams {
        &self.params
    }

    /// Translate along `direction` for `dt` seconds.
    pub fn move_in(&mut self, direction: MoveDirection, dt: f32) {
        let velocity = self.state.movement_speed * dt;
        let s = &mut self.state;
        match direction {
            MoveDirection::Forward => s.position += s.front * velocity,
            MoveDirection::Backward => s.position -= s.front * velocity,
            MoveDirection::Left => s.position -= s.right * velocity,
            MoveDirection::Right => s.position += s.right * velocity,
            MoveDirection::Up => s.position += s.up * velocity,
            MoveDirection::Down => s.position -= s.up * velocity,
        }
    }

    /// Rotate by pointer offsets. Pitch saturates at the limit; yaw wraps
    /// into `[0, 360)` when enabled.
    pub fn look(&mut self, x_offset: f32, y_offset: f32) {
        let limit = self.params.pitch_limit;
        self.state.yaw += x_offset * self.params.sensitivity;
        self.state.pitch =
            (self.state.pitch + y_offset * self.params.sensitivity).clamp(-limit, limit);
        if self.params.wrap_yaw {
            self.state.yaw = wrap_degrees(self.state.yaw);
        }
        self.state.update_vectors();
    }

    /// Narrow (positive scroll) or widen the field of view.
    pub fn zoom(&mut self, scroll: f32) {
        self.state.fov = (self.state.fov - scroll).clamp(self.params.fov_min, self.params.fov_max);
    }

    /// Feed an absolute pointer sample in screen coordinates (y down).
    ///
    /// The first sample only sets the reference. The reference always
    /// follows the pointer, but the offset turns the camera only while
    /// capture is enabled, so re-enabling never causes a jump.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let sample = Vec2::new(x, y);
        let Some(last) = self.last_pointer.replace(sample) else {
            return;
        };
        if !self.capture_enabled {
            return;
        }
        let x_offset = sample.x - last.x;
        let y_offset = if self.params.invert_y {
            last.y - sample.y
        } else {
            sample.y - last.y
        };
        self.look(x_offset, y_offset);
    }

    pub fn set_capture_enabled(&mut self, enabled: bool) {
        self.capture_enabled = enabled;
    }

    /// Flip capture and return the new value.
    pub fn toggle_capture(&mut self) -> bool {
        self.capture_enabled = !self.capture_enabled;
        self.capture_enabled
    }

    #[must_use]
    pub fn capture_enabled(&self) -> bool {
        self.capture_enabled
    }

    pub fn set_held(&mut self, direction: MoveDirection, held: bool) {
        self.held[direction.index()] = held;
    }

    #[must_use]
    pub fn is_held(&self, direction: MoveDirection) -> bool {
        self.held[direction.index()]
    }

    /// Forget held keys, e.g. after focus loss.
    pub fn release_all(&mut self) {
        self.held = [false; 6];
    }

    /// Apply one `move_in` per held direction.
    pub fn advance(&mut self, dt: f32) {
        for direction in MoveDirection::ALL {
            if self.is_held(direction) {
                self.move_in(direction, dt);
            }
        }
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let s = &self.state;
        Mat4::look_at_rh(s.position, s.position + s.front, s.up)
    }

    /// Perspective projection with `[0, 1]` depth.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.state.fov.to_radians(),
            aspect,
            self.params.near,
            self.params.far,
        )
    }

    /// View matrix with the translation removed, for far-away backdrops.
    #[must_use]
    pub fn skybox_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }
}

impl InputSink for ObserverController {
    fn on_key(&mut self, action: ControlAction, pressed: bool) {
        if let Some(direction) = MoveDirection::from_action(action) {
            self.set_held(direction, pressed);
        }
    }

    fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.pointer_moved(x, y);
    }

    fn on_scroll(&mut self, delta: f32) {
        self.zoom(delta);
    }
}

/// Map an angle in degrees into `[0, 360)`.
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_config::{DEFAULT_CAMERA_FRONT, DEFAULT_CAMERA_POSITION};

    fn controller() -> ObserverController {
        ObserverController::new(
            ObserverParams::default(),
            DEFAULT_CAMERA_POSITION,
            DEFAULT_CAMERA_FRONT,
        )
    }

    #[test]
    fn test_new_derives_angles_from_front() {
        let c = controller();
        assert!((c.state().yaw - 270.0).abs() < 1e-3);
        assert!(c.state().pitch.abs() < 1e-5);
        assert!(c.state().front.abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(c.state().up.abs_diff_eq(Vec3::Y, 1e-5));
        assert!(c.state().right.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_new_with_tilted_front_round_trips() {
        let front = Vec3::new(0.3, 0.4, -0.5).normalize();
        let c = ObserverController::new(ObserverParams::default(), Vec3::ZERO, front);
        assert!(c.state().front.abs_diff_eq(front, 1e-5));
    }

    #[test]
    fn test_new_with_degenerate_front_faces_neg_z() {
        let c = ObserverController::new(ObserverParams::default(), Vec3::ZERO, Vec3::ZERO);
        assert!(c.state().front.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_pitch_saturates_at_limit() {
        let mut c = controller();
        for _ in 0..100 {
            c.look(0.0, 10_000.0);
        }
        assert_eq!(c.state().pitch, 89.0);
        for _ in 0..100 {
            c.look(0.0, -10_000.0);
        }
        assert_eq!(c.state().pitch, -89.0);
    }

    #[test]
    fn test_yaw_wraps_into_range() {
        let mut c = controller();
        c.look(1000.0, 0.0);
        let yaw = c.state().yaw;
        assert!((0.0..360.0).contains(&yaw), "yaw = {yaw}");
        for _ in 0..50 {
            c.look(-7777.0, 0.0);
            let yaw = c.state().yaw;
            assert!((0.0..360.0).contains(&yaw), "yaw = {yaw}");
        }
    }

    #[test]
    fn test_yaw_unbounded_when_wrapping_disabled() {
        let params = ObserverParams {
            wrap_yaw: false,
            ..ObserverParams::default()
        };
        let mut c = ObserverController::new(params, Vec3::ZERO, Vec3::NEG_Z);
        c.look(10_000.0, 0.0);
        assert!(c.state().yaw > 360.0);
    }

    #[test]
    fn test_fov_saturates() {
        let mut c = controller();
        c.zoom(1000.0);
        assert_eq!(c.state().fov, 1.0);
        c.zoom(-1000.0);
        assert_eq!(c.state().fov, 90.0);
        c.zoom(45.0);
        assert_eq!(c.state().fov, 45.0);
    }

    #[test]
    fn test_hand_edited_camera_bounds_do_not_panic() {
        use orrery_config::CameraConfig;

        let negative_pitch = CameraConfig {
            pitch_limit_deg: -10.0,
            ..Default::default()
        };
        let mut c = ObserverController::new(
            ObserverParams::from(&negative_pitch),
            DEFAULT_CAMERA_POSITION,
            Vec3::new(0.0, 1.0, -1.0),
        );
        assert_eq!(c.state().pitch, 10.0);
        c.look(0.0, 1000.0);
        assert_eq!(c.state().pitch, 10.0);

        let inverted_fov = CameraConfig {
            fov_min_deg: 90.0,
            fov_max_deg: 1.0,
            ..Default::default()
        };
        let mut c = ObserverController::new(
            ObserverParams::from(&inverted_fov),
            DEFAULT_CAMERA_POSITION,
            DEFAULT_CAMERA_FRONT,
        );
        assert_eq!(c.state().fov, 45.0);
        c.zoom(-1000.0);
        assert_eq!(c.state().fov, 90.0);
    }

    #[test]
    fn test_first_pointer_sample_does_not_turn() {
        let mut c = controller();
        let before = *c.state();
        c.pointer_moved(512.0, 300.0);
        assert_eq!(c.state().yaw, before.yaw);
        assert_eq!(c.state().pitch, before.pitch);
    }

    #[test]
    fn test_pointer_offsets_turn_and_invert_y() {
        let mut c = controller();
        c.pointer_moved(100.0, 100.0);
        c.pointer_moved(110.0, 90.0);
        // Moving up the screen looks up.
        assert!((c.state().pitch - 1.0).abs() < 1e-4);
        assert!((c.state().yaw - 271.0).abs() < 1e-3);
    }

    #[test]
    fn test_disabled_capture_tracks_reference_without_turning() {
        let mut c = controller();
        c.pointer_moved(0.0, 0.0);
        c.set_capture_enabled(false);
        c.pointer_moved(400.0, 400.0);
        assert!(c.state().pitch.abs() < 1e-5);
        c.set_capture_enabled(true);
        c.pointer_moved(401.0, 400.0);
        // Only the 1px move after re-enabling counts.
        assert!((c.state().yaw - 270.1).abs() < 1e-3);
    }

    #[test]
    fn test_move_forward_uses_full_front() {
        let front = Vec3::new(0.0, 1.0, -1.0).normalize();
        let mut c = ObserverController::new(ObserverParams::default(), Vec3::ZERO, front);
        c.move_in(MoveDirection::Forward, 1.0);
        let expected = c.state().front * 17.5;
        assert!(c.state().position.abs_diff_eq(expected, 1e-3));
        assert!(c.state().position.y > 0.0);
    }

    #[test]
    fn test_strafe_and_vertical_axes() {
        let mut c = ObserverController::new(ObserverParams::default(), Vec3::ZERO, Vec3::NEG_Z);
        c.move_in(MoveDirection::Right, 0.5);
        assert!(c.state().position.abs_diff_eq(Vec3::new(8.75, 0.0, 0.0), 1e-4));
        c.move_in(MoveDirection::Left, 0.5);
        c.move_in(MoveDirection::Up, 1.0);
        assert!(c.state().position.abs_diff_eq(Vec3::new(0.0, 17.5, 0.0), 1e-3));
    }

    #[test]
    fn test_held_keys_through_sink() {
        let mut c = ObserverController::new(ObserverParams::default(), Vec3::ZERO, Vec3::NEG_Z);
        c.on_key(ControlAction::MoveForward, true);
        c.on_key(ControlAction::ToggleBlinn, true);
        c.advance(0.1);
        c.advance(0.1);
        assert!(c.state().position.abs_diff_eq(Vec3::new(0.0, 0.0, -3.5), 1e-4));
        c.on_key(ControlAction::MoveForward, false);
        c.advance(1.0);
        assert!(c.state().position.abs_diff_eq(Vec3::new(0.0, 0.0, -3.5), 1e-4));
    }

    #[test]
    fn test_scroll_through_sink_zooms() {
        let mut c = controller();
        c.on_scroll(5.0);
        assert_eq!(c.state().fov, 40.0);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let c = controller();
        let eye = c.view_matrix().transform_point3(DEFAULT_CAMERA_POSITION);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));
    }

    #[test]
    fn test_skybox_view_has_no_translation() {
        let c = controller();
        let m = c.skybox_view_matrix();
        assert_eq!(m.w_axis, glam::Vec4::W);
        let dir = Vec3::new(0.2, 0.3, -1.0);
        assert!(
            m.transform_vector3(dir)
                .abs_diff_eq(c.view_matrix().transform_vector3(dir), 1e-5)
        );
    }

    #[test]
    fn test_projection_depth_range() {
        let c = controller();
        let proj = c.projection_matrix(1000.0 / 700.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_degrees_edges() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }
}
