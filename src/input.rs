//! Windowing-agnostic input events and the keyboard camera controller.

use std::f32::consts::PI;

use log::debug;

use crate::camera::Camera;
use crate::config::Config;
use crate::math::Vec3;

/// Keys the controller understands. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Z,
    C,
    R,
    F,
    Space,
    LShift,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyPressed(Key),
    MouseMoved { x: i32, y: i32 },
    MousePressed { button: MouseButton, x: i32, y: i32 },
    Resized { width: u32, height: u32 },
    FocusGained,
    FocusLost,
}

// =============================================================================
// Camera Controller
// =============================================================================

/// Maps key presses onto relative camera motion.
///
/// # Input Mapping
/// - W/S: forward/back along z by `depth_step`
/// - D/A: right/left along x by `pan_step`
/// - Space/LShift: up/down along y by `pan_step`
/// - E/Q: yaw (y axis) by `rotation_step`
/// - C/Z: roll (z axis) by `rotation_step`
/// - R/F: pitch (x axis) by `rotation_step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Translation per key press along z.
    pub depth_step: f32,
    /// Translation per key press along x and y.
    pub pan_step: f32,
    /// Rotation per key press in radians.
    pub rotation_step: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            depth_step: 0.1,
            pan_step: 2.0,
            rotation_step: PI / 180.0,
        }
    }
}

impl CameraController {
    pub fn new(depth_step: f32, pan_step: f32, rotation_step: f32) -> Self {
        Self {
            depth_step,
            pan_step,
            rotation_step,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.depth_step, config.pan_step, config.rotation_step)
    }

    /// Applies `event` to `camera`. Returns whether the camera changed.
    pub fn handle(&self, event: &InputEvent, camera: &mut Camera) -> bool {
        match *event {
            InputEvent::KeyPressed(key) => {
                if let Some(velocity) = self.translation(key) {
                    camera.move_camera(velocity);
                    true
                } else if let Some(delta) = self.rotation(key) {
                    camera.rotate_camera(delta);
                    true
                } else {
                    false
                }
            }
            other => {
                debug!("input: {other:?}");
                false
            }
        }
    }

    fn translation(&self, key: Key) -> Option<Vec3> {
        let v = match key {
            Key::W => Vec3::new(0.0, 0.0, self.depth_step),
            Key::S => Vec3::new(0.0, 0.0, -self.depth_step),
            Key::D => Vec3::new(self.pan_step, 0.0, 0.0),
            Key::A => Vec3::new(-self.pan_step, 0.0, 0.0),
            Key::Space => Vec3::new(0.0, self.pan_step, 0.0),
            Key::LShift => Vec3::new(0.0, -self.pan_step, 0.0),
            _ => return None,
        };
        Some(v)
    }

    fn rotation(&self, key: Key) -> Option<Vec3> {
        let step = self.rotation_step;
        let v = match key {
            Key::E => Vec3::new(0.0, step, 0.0),
            Key::Q => Vec3::new(0.0, -step, 0.0),
            Key::C => Vec3::new(0.0, 0.0, step),
            Key::Z => Vec3::new(0.0, 0.0, -step),
            Key::R => Vec3::new(step, 0.0, 0.0),
            Key::F => Vec3::new(-step, 0.0, 0.0),
            _ => return None,
        };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn press(controller: &CameraController, camera: &mut Camera, key: Key) -> bool {
        controller.handle(&InputEvent::KeyPressed(key), camera)
    }

    #[test]
    fn movement_keys_translate() {
        let controller = CameraController::default();
        let mut camera = Camera::default();

        assert!(press(&controller, &mut camera, Key::W));
        assert!(press(&controller, &mut camera, Key::D));
        assert!(press(&controller, &mut camera, Key::Space));
        assert_relative_eq!(camera.position(), Vec3::new(2.0, 2.0, 0.1));

        press(&controller, &mut camera, Key::S);
        press(&controller, &mut camera, Key::A);
        press(&controller, &mut camera, Key::LShift);
        assert_relative_eq!(camera.position(), Vec3::ZERO, epsilon = 1e-6);
        assert_eq!(camera.orientation(), Vec3::ZERO);
    }

    #[test]
    fn rotation_keys_map_to_axes() {
        let controller = CameraController::new(0.1, 2.0, 0.5);
        let mut camera = Camera::default();

        press(&controller, &mut camera, Key::E);
        assert_relative_eq!(camera.orientation(), Vec3::new(0.0, 0.5, 0.0));
        press(&controller, &mut camera, Key::C);
        assert_relative_eq!(camera.orientation(), Vec3::new(0.0, 0.5, 0.5));
        press(&controller, &mut camera, Key::F);
        assert_relative_eq!(camera.orientation(), Vec3::new(-0.5, 0.5, 0.5));
        press(&controller, &mut camera, Key::Q);
        press(&controller, &mut camera, Key::Z);
        press(&controller, &mut camera, Key::R);
        assert_relative_eq!(camera.orientation(), Vec3::ZERO);
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    fn other_events_leave_camera_alone() {
        let controller = CameraController::default();
        let mut camera = Camera::new(Vec3::ONE);
        let events = [
            InputEvent::KeyPressed(Key::Other),
            InputEvent::KeyPressed(Key::Escape),
            InputEvent::MouseMoved { x: 3, y: 4 },
            InputEvent::MousePressed { button: MouseButton::Left, x: 0, y: 0 },
            InputEvent::Resized { width: 10, height: 10 },
            InputEvent::FocusLost,
            InputEvent::Quit,
        ];
        for event in &events {
            assert!(!controller.handle(event, &mut camera));
        }
        assert_eq!(camera.position(), Vec3::ONE);
        assert_eq!(camera.orientation(), Vec3::ZERO);
    }

    #[test]
    fn steps_come_from_config() {
        let config = Config {
            pan_step: 5.0,
            ..Config::default()
        };
        let controller = CameraController::from_config(&config);
        assert_eq!(controller.pan_step, 5.0);
        assert_eq!(controller.depth_step, config.depth_step);
    }
}
