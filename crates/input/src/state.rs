use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::action::Action;

/// Mouse to stick equivalence factor applied to look axes.
const LOOK_AXIS_SCALE: f32 = 0.01;

/// Digital controls the gameplay layer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Fire,
    Aim,
    Jump,
    Sprint,
    Crouch,
}

/// Raw device state for one frame, as reported by the platform layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInput {
    /// Strafe axis, -1 (left) to 1 (right).
    pub horizontal: f32,
    /// Forward axis, -1 (back) to 1 (forward).
    pub vertical: f32,
    /// Mouse or right-stick delta.
    pub look_x: f32,
    pub look_y: f32,
    /// Analog fire trigger, 0 to 1.
    pub fire_trigger: f32,
    pub pressed: BTreeSet<Button>,
}

impl RawInput {
    pub fn with_button(mut self, button: Button) -> Self {
        self.pressed.insert(button);
        self
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

/// Tuning for the semantic mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Multiplier for look input.
    pub look_sensitivity: f32,
    /// Trigger values at or above this count as a held fire button.
    pub trigger_axis_threshold: f32,
    /// Flip the vertical look axis.
    pub invert_y: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: 1.0,
            trigger_axis_threshold: 0.4,
            invert_y: false,
        }
    }
}

/// Semantic view over the current frame's raw input.
///
/// The host calls [`InputState::begin_frame`] before gameplay updates and
/// [`InputState::end_frame`] after them; edge queries compare against what
/// was held when the previous frame ended.
#[derive(Debug, Clone)]
pub struct InputState {
    pub config: InputConfig,
    cursor_locked: bool,
    current: RawInput,
    /// Held state latched at the end of the previous frame.
    fire_was_held: bool,
    aim_was_held: bool,
    jump_was_held: bool,
    crouch_was_held: bool,
}

impl InputState {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            cursor_locked: true,
            current: RawInput::default(),
            fire_was_held: false,
            aim_was_held: false,
            jump_was_held: false,
            crouch_was_held: false,
        }
    }

    /// Install this frame's raw device state.
    pub fn begin_frame(&mut self, raw: RawInput) {
        tracing::trace!(pressed = ?raw.pressed, "input frame");
        self.current = raw;
    }

    /// Latch held state for next frame's edge detection.
    pub fn end_frame(&mut self) {
        self.fire_was_held = self.fire_held();
        self.aim_was_held = self.aim_held();
        self.jump_was_held = self.button_held(Button::Jump);
        self.crouch_was_held = self.button_held(Button::Crouch);
    }

    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    /// Input is only processed while the cursor is captured by the game.
    pub fn can_process_input(&self) -> bool {
        self.cursor_locked
    }

    /// Planar movement in viewer space, X = strafe, Z = forward, magnitude ≤ 1.
    pub fn move_input(&self) -> Vec3 {
        if !self.can_process_input() {
            return Vec3::ZERO;
        }
        Vec3::new(self.current.horizontal, 0.0, self.current.vertical).clamp_length_max(1.0)
    }

    pub fn look_horizontal(&self) -> f32 {
        self.look_axis(self.current.look_x, false)
    }

    pub fn look_vertical(&self) -> f32 {
        self.look_axis(self.current.look_y, self.config.invert_y)
    }

    fn look_axis(&self, raw: f32, invert: bool) -> f32 {
        if !self.can_process_input() {
            return 0.0;
        }
        let sign = if invert { -1.0 } else { 1.0 };
        raw * sign * self.config.look_sensitivity * LOOK_AXIS_SCALE
    }

    fn button_held(&self, button: Button) -> bool {
        self.can_process_input() && self.current.is_pressed(button)
    }

    pub fn fire_held(&self) -> bool {
        self.can_process_input()
            && (self.current.is_pressed(Button::Fire)
                || self.current.fire_trigger >= self.config.trigger_axis_threshold)
    }

    /// True only on the frame fire goes from released to held.
    pub fn fire_down(&self) -> bool {
        self.fire_held() && !self.fire_was_held
    }

    pub fn aim_held(&self) -> bool {
        self.button_held(Button::Aim)
    }

    pub fn aim_down(&self) -> bool {
        self.aim_held() && !self.aim_was_held
    }

    pub fn jump_down(&self) -> bool {
        self.button_held(Button::Jump) && !self.jump_was_held
    }

    pub fn crouch_down(&self) -> bool {
        self.button_held(Button::Crouch) && !self.crouch_was_held
    }

    pub fn sprint_held(&self) -> bool {
        self.button_held(Button::Sprint)
    }

    /// Semantic actions produced this frame, in a fixed order.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        let movement = self.move_input();
        if movement != Vec3::ZERO {
            actions.push(Action::Move(movement));
        }
        let (yaw, pitch) = (self.look_horizontal(), self.look_vertical());
        if yaw != 0.0 || pitch != 0.0 {
            actions.push(Action::Look { yaw, pitch });
        }
        if self.jump_down() {
            actions.push(Action::Jump);
        }
        if self.crouch_down() {
            actions.push(Action::Crouch);
        }
        if self.fire_down() {
            actions.push(Action::Fire);
        }
        if self.aim_down() {
            actions.push(Action::Aim);
        }
        if self.sprint_held() {
            actions.push(Action::Sprint);
        }
        actions
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: Button) -> RawInput {
        RawInput::default().with_button(button)
    }

    #[test]
    fn fire_down_fires_once_per_press() {
        let mut input = InputState::default();

        input.begin_frame(press(Button::Fire));
        assert!(input.fire_down());
        assert!(input.fire_held());
        input.end_frame();

        input.begin_frame(press(Button::Fire));
        assert!(!input.fire_down());
        assert!(input.fire_held());
        input.end_frame();

        input.begin_frame(RawInput::default());
        assert!(!input.fire_down());
        input.end_frame();

        input.begin_frame(press(Button::Fire));
        assert!(input.fire_down());
    }

    #[test]
    fn trigger_axis_counts_as_fire() {
        let mut input = InputState::default();
        input.begin_frame(RawInput {
            fire_trigger: 0.39,
            ..RawInput::default()
        });
        assert!(!input.fire_held());
        input.begin_frame(RawInput {
            fire_trigger: 0.4,
            ..RawInput::default()
        });
        assert!(input.fire_held());
    }

    #[test]
    fn move_input_is_clamped() {
        let mut input = InputState::default();
        input.begin_frame(RawInput {
            horizontal: 1.0,
            vertical: 1.0,
            ..RawInput::default()
        });
        let m = input.move_input();
        assert!((m.length() - 1.0).abs() < 1e-5);
        assert_eq!(m.y, 0.0);
    }

    #[test]
    fn small_move_input_is_untouched() {
        let mut input = InputState::default();
        input.begin_frame(RawInput {
            vertical: 0.5,
            ..RawInput::default()
        });
        assert_eq!(input.move_input(), Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn look_axes_apply_sensitivity_and_invert() {
        let mut input = InputState::new(InputConfig {
            look_sensitivity: 2.0,
            invert_y: true,
            ..InputConfig::default()
        });
        input.begin_frame(RawInput {
            look_x: 10.0,
            look_y: 10.0,
            ..RawInput::default()
        });
        assert!((input.look_horizontal() - 0.2).abs() < 1e-6);
        assert!((input.look_vertical() + 0.2).abs() < 1e-6);
    }

    #[test]
    fn unlocked_cursor_suppresses_everything() {
        let mut input = InputState::default();
        input.set_cursor_locked(false);
        input.begin_frame(RawInput {
            horizontal: 1.0,
            look_x: 5.0,
            ..press(Button::Fire)
        });
        assert_eq!(input.move_input(), Vec3::ZERO);
        assert_eq!(input.look_horizontal(), 0.0);
        assert!(!input.fire_down());
        assert!(input.actions().is_empty());
    }

    #[test]
    fn actions_reflect_frame() {
        let mut input = InputState::default();
        input.begin_frame(RawInput {
            vertical: 1.0,
            ..press(Button::Jump).with_button(Button::Sprint)
        });
        let actions = input.actions();
        assert_eq!(
            actions,
            vec![Action::Move(Vec3::Z), Action::Jump, Action::Sprint]
        );
    }

    #[test]
    fn crouch_is_an_edge() {
        let mut input = InputState::default();
        input.begin_frame(press(Button::Crouch));
        assert!(input.crouch_down());
        input.end_frame();
        input.begin_frame(press(Button::Crouch));
        assert!(!input.crouch_down());
    }
}
