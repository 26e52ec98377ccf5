use crate::model_viewer::scene::ViewerCamera;
use crate::model_viewer::{DEFAULT_CAMERA_DISTANCE, DEFAULT_CAMERA_PITCH_DEG, DEFAULT_CAMERA_YAW_DEG};
use bevy::camera::Viewport;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, Window};

const ORBIT_SPEED: f32 = 0.006;
const PAN_SPEED: f32 = 0.0015;
const ZOOM_SPEED: f32 = 0.10;
const PITCH_LIMIT: f32 = 1.45;

/// Orbit controls around a target point, Y up.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCameraState {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 10.0, 0.0),
            distance: DEFAULT_CAMERA_DISTANCE,
            yaw: DEFAULT_CAMERA_YAW_DEG.to_radians(),
            pitch: DEFAULT_CAMERA_PITCH_DEG.to_radians(),
            min_distance: 5.0,
            max_distance: 800.0,
        }
    }
}

impl OrbitCameraState {
    pub fn recenter(&mut self) {
        let defaults = Self::default();
        self.target = defaults.target;
        self.distance = defaults.distance;
        self.yaw = defaults.yaw;
        self.pitch = defaults.pitch;
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SPEED;
        self.pitch = (self.pitch + delta.y * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn pan(&mut self, delta: Vec2) {
        let offset = orbit_offset(self.yaw, self.pitch);
        let right = Vec3::Y.cross(offset).normalize_or(Vec3::X);
        let up = offset.cross(right).normalize_or_zero();
        self.target += (-delta.x * right + delta.y * up) * self.distance * PAN_SPEED;
    }

    pub fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * ZOOM_SPEED).clamp(0.2, 5.0);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn camera_transform(&self) -> Transform {
        let position = self.target + orbit_offset(self.yaw, self.pitch) * self.distance;
        Transform::from_translation(position).looking_at(self.target, Vec3::Y)
    }
}

#[derive(Resource, Default)]
pub struct UiInteractionState {
    pub wants_pointer_input: bool,
    pub side_panel_width: f32,
}

/// Unit vector from the orbit target towards the camera.
fn orbit_offset(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        pitch.cos() * yaw.sin(),
        pitch.sin(),
        pitch.cos() * yaw.cos(),
    )
}

/// Keeps the 3D viewport to the right of the side panel, also across window resizes.
pub fn update_camera_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut camera_query: Query<&mut Camera, With<ViewerCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let physical_width = window.physical_width();
    let physical_height = window.physical_height().max(1);
    if physical_width == 0 {
        return;
    }

    let panel_px = (ui_state.side_panel_width.max(0.0) * window.scale_factor() as f32) as u32;
    let viewport_x = panel_px.min(physical_width.saturating_sub(1));
    let viewport_width = physical_width.saturating_sub(viewport_x).max(1);

    let viewport = Some(Viewport {
        physical_position: UVec2::new(viewport_x, 0),
        physical_size: UVec2::new(viewport_width, physical_height),
        depth: 0.0..1.0,
    });

    for mut camera in &mut camera_query {
        camera.viewport = viewport.clone();
    }
}

/// Left drag orbits, right or middle drag pans, the wheel zooms.
pub fn orbit_camera_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut orbit: ResMut<OrbitCameraState>,
    mut camera_query: Query<&mut Transform, With<ViewerCamera>>,
) {
    let mouse_delta = Vec2::new(mouse_motion.delta.x, -mouse_motion.delta.y);
    let scroll_delta = mouse_scroll.delta.y;

    let pointer_in_window = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .is_some();

    if pointer_in_window && !ui_state.wants_pointer_input {
        if mouse_delta.length_squared() > 0.0 {
            if mouse_buttons.pressed(MouseButton::Left) {
                orbit.orbit(mouse_delta);
            } else if mouse_buttons.any_pressed([MouseButton::Right, MouseButton::Middle]) {
                orbit.pan(mouse_delta);
            }
        }

        if scroll_delta.abs() > f32::EPSILON {
            orbit.zoom(scroll_delta);
        }
    }

    let camera_transform = orbit.camera_transform();
    for mut transform in &mut camera_query {
        *transform = camera_transform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn level_camera_at_zero_yaw_sits_on_positive_z() {
        let orbit = OrbitCameraState {
            target: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            ..Default::default()
        };
        let transform = orbit.camera_transform();
        assert_relative_eq!(transform.translation.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(transform.translation.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(transform.translation.z, 10.0, epsilon = 1e-5);
        assert_relative_eq!(transform.forward().z, -1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut orbit = OrbitCameraState::default();
        orbit.orbit(Vec2::new(0.0, 10_000.0));
        assert_relative_eq!(orbit.pitch, PITCH_LIMIT);
        orbit.orbit(Vec2::new(0.0, -20_000.0));
        assert_relative_eq!(orbit.pitch, -PITCH_LIMIT);
    }

    #[rstest]
    #[case(100.0)]
    #[case(-100.0)]
    fn zoom_stays_within_limits(#[case] scroll: f32) {
        let mut orbit = OrbitCameraState::default();
        for _ in 0..50 {
            orbit.zoom(scroll);
        }
        assert!(orbit.distance >= orbit.min_distance);
        assert!(orbit.distance <= orbit.max_distance);
    }

    #[rstest]
    fn pan_moves_target_in_screen_plane() {
        let mut orbit = OrbitCameraState {
            target: Vec3::ZERO,
            distance: 100.0,
            yaw: 0.0,
            pitch: 0.0,
            ..Default::default()
        };
        orbit.pan(Vec2::new(-10.0, 0.0));
        assert!(orbit.target.x > 0.0);
        assert_relative_eq!(orbit.target.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(orbit.target.z, 0.0, epsilon = 1e-5);
    }

    #[rstest]
    fn recenter_restores_defaults() {
        let mut orbit = OrbitCameraState::default();
        orbit.orbit(Vec2::new(40.0, 25.0));
        orbit.pan(Vec2::new(3.0, 7.0));
        orbit.zoom(2.0);
        orbit.recenter();
        assert_eq!(orbit, OrbitCameraState::default());
    }
}
