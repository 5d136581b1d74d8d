use liminal_common::{Layer, LayerMask};
use serde::{Deserialize, Serialize};

use crate::manipulator::ManipulateError;

/// What the clipping guard does when the repositioned object would touch
/// geometry in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipFallback {
    /// Recompute the same candidate position. The object stays where the
    /// sightline put it; the guard only reports the contact.
    #[default]
    Reapply,
    /// Put the object back where it was before this frame's move.
    RevertToPrevious,
}

/// Tuning for [`crate::DepthRescaleManipulator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulatorConfig {
    /// Layers an object must be on to be picked up.
    pub targetable_mask: LayerMask,
    /// Layers positioning rays collide with. The held object is excluded
    /// from these rays regardless of its layer.
    pub occlusion_mask: LayerMask,
    /// How far in front of the struck surface the object is placed, per
    /// unit of its current scale ratio.
    pub offset_factor: f32,
    /// Length of the clipping-guard ray cast from the object's new position.
    pub collision_check_distance: f32,
    pub clip_fallback: ClipFallback,
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self {
            targetable_mask: LayerMask::layer(Layer::TARGETABLE),
            occlusion_mask: LayerMask::ALL
                .without(Layer::TARGETABLE)
                .without(Layer::PLAYER),
            offset_factor: 0.0,
            collision_check_distance: 0.05,
            clip_fallback: ClipFallback::Reapply,
        }
    }
}

impl ManipulatorConfig {
    pub fn validate(&self) -> Result<(), ManipulateError> {
        if self.targetable_mask.is_empty() {
            return Err(ManipulateError::InvalidConfig(
                "targetable_mask selects no layers",
            ));
        }
        if self.occlusion_mask.is_empty() {
            return Err(ManipulateError::InvalidConfig(
                "occlusion_mask selects no layers",
            ));
        }
        if !self.offset_factor.is_finite() {
            return Err(ManipulateError::InvalidConfig("offset_factor must be finite"));
        }
        if !(self.collision_check_distance.is_finite() && self.collision_check_distance >= 0.0) {
            return Err(ManipulateError::InvalidConfig(
                "collision_check_distance must be finite and non-negative",
            ));
        }
        Ok(())
    }
}
