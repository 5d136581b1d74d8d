use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.short())
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity rotation, unit scale, placed at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same transform with every axis scaled by `scale`.
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..self
        }
    }

    /// The uniform scale of the transform, read from the X axis.
    ///
    /// Objects are expected to be scaled uniformly; Y and Z are ignored.
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Where the viewer is and which way it is looking, sampled once per frame.
///
/// `forward` is kept normalized by the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl ViewerPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or(Vec3::NEG_Z),
        }
    }
}

impl Default for ViewerPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_short_form() {
        let id = EntityId::new();
        assert_eq!(id.short().len(), 8);
        assert_eq!(id.to_string(), id.short());
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn uniform_scale_reads_x_axis() {
        let t = Transform::from_position(Vec3::new(0.0, 0.0, 5.0)).with_uniform_scale(2.5);
        assert_eq!(t.uniform_scale(), 2.5);
        assert_eq!(t.scale, Vec3::splat(2.5));
        assert_eq!(t.position.z, 5.0);
    }

    #[test]
    fn viewer_pose_normalizes_forward() {
        let pose = ViewerPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0));
        assert!((pose.forward.length() - 1.0).abs() < 1e-6);
        assert_eq!(pose.forward, Vec3::Z);
    }

    #[test]
    fn viewer_pose_zero_forward_falls_back() {
        let pose = ViewerPose::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(pose.forward, Vec3::NEG_Z);
    }
}
