use glam::Vec3;
use liminal_common::ViewerPose;
use serde::{Deserialize, Serialize};

use crate::state::InputState;

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// First-person viewer driven by semantic input.
///
/// Yaw is measured in the XZ plane from +X towards +Z, so the default
/// yaw of 90° looks down +Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPersonViewer {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second at full stick deflection.
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// Radians per unit of look input.
    pub turn_speed: f32,
}

impl Default for FirstPersonViewer {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 90.0_f32.to_radians(),
            pitch: 0.0,
            speed: 5.0,
            sprint_multiplier: 2.0,
            turn_speed: 1.0,
        }
    }
}

impl FirstPersonViewer {
    /// Place the viewer at `pose`, looking along its forward direction.
    pub fn from_pose(pose: ViewerPose) -> Self {
        let mut viewer = Self {
            position: pose.position,
            ..Self::default()
        };
        viewer.look_along(pose.forward);
        viewer
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    /// Point the viewer along `direction`. Zero directions are ignored.
    pub fn look_along(&mut self, direction: Vec3) {
        let Some(d) = direction.try_normalize() else {
            return;
        };
        self.yaw = d.z.atan2(d.x);
        self.pitch = d.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta * self.turn_speed;
        self.pitch = (self.pitch + pitch_delta * self.turn_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Integrate one frame of look and movement input.
    pub fn apply(&mut self, input: &InputState, dt: f32) {
        self.rotate(input.look_horizontal(), input.look_vertical());

        let movement = input.move_input();
        if movement == Vec3::ZERO {
            return;
        }
        let flat_forward = Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin());
        let flat_right = flat_forward.cross(Vec3::Y);
        let speed = if input.sprint_held() {
            self.speed * self.sprint_multiplier
        } else {
            self.speed
        };
        self.position += (flat_right * movement.x + flat_forward * movement.z) * speed * dt;
    }

    pub fn pose(&self) -> ViewerPose {
        ViewerPose::new(self.position, self.forward())
    }
}
