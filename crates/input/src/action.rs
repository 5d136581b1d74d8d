use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A high-level gameplay action derived from one frame of input.
///
/// Gameplay systems consume actions, never raw input events, so keyboard,
/// mouse and gamepad share the same world logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Planar movement in viewer space, magnitude ≤ 1.
    Move(Vec3),
    /// Look deltas, already scaled by sensitivity.
    Look { yaw: f32, pitch: f32 },
    Jump,
    Crouch,
    /// Primary interaction. Toggles holding an object.
    Fire,
    Aim,
    /// Held modifier for faster movement.
    Sprint,
}

impl Action {
    /// Whether this action is a single-frame edge rather than a continuous value.
    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Jump | Self::Crouch | Self::Fire | Self::Aim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_move_is_constructible() {
        let a = Action::Move(Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(a, Action::Move(_)));
        assert!(!a.is_edge());
    }

    #[test]
    fn edges_and_continuous_actions() {
        assert!(Action::Fire.is_edge());
        assert!(Action::Jump.is_edge());
        assert!(!Action::Sprint.is_edge());
        assert!(!Action::Look { yaw: 0.1, pitch: 0.0 }.is_edge());
    }
}
