use glam::Vec3;
use liminal_common::EntityId;

use crate::world::World;

/// Errors from scene object access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("entity {0} has no rigid body")]
    MissingPhysicsBody(EntityId),
}

/// The object model gameplay systems act through.
///
/// Positions and scales are world-space. Every setter logs through the
/// world's event log, so callers never touch storage directly.
pub trait SceneObjects {
    fn position(&self, id: EntityId) -> Result<Vec3, SceneError>;

    fn scale(&self, id: EntityId) -> Result<Vec3, SceneError>;

    /// Scale along X; objects are assumed to be uniformly scaled.
    fn uniform_scale(&self, id: EntityId) -> Result<f32, SceneError> {
        self.scale(id).map(|s| s.x)
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) -> Result<(), SceneError>;

    fn set_scale(&mut self, id: EntityId, scale: Vec3) -> Result<(), SceneError>;

    fn has_physics_body(&self, id: EntityId) -> bool;

    fn is_kinematic(&self, id: EntityId) -> Result<bool, SceneError>;

    /// Switch the body between simulated and gameplay-driven. Returns the
    /// previous flag.
    fn set_kinematic(&mut self, id: EntityId, kinematic: bool) -> Result<bool, SceneError>;
}

impl SceneObjects for World {
    fn position(&self, id: EntityId) -> Result<Vec3, SceneError> {
        self.get(id)
            .map(|d| d.transform.position)
            .ok_or(SceneError::EntityNotFound(id))
    }

    fn scale(&self, id: EntityId) -> Result<Vec3, SceneError> {
        self.get(id)
            .map(|d| d.transform.scale)
            .ok_or(SceneError::EntityNotFound(id))
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) -> Result<(), SceneError> {
        let mut transform = self.get(id).ok_or(SceneError::EntityNotFound(id))?.transform;
        transform.position = position;
        self.set_transform(id, transform);
        Ok(())
    }

    fn set_scale(&mut self, id: EntityId, scale: Vec3) -> Result<(), SceneError> {
        let mut transform = self.get(id).ok_or(SceneError::EntityNotFound(id))?.transform;
        transform.scale = scale;
        self.set_transform(id, transform);
        Ok(())
    }

    fn has_physics_body(&self, id: EntityId) -> bool {
        self.components().get_rigid_body(id).is_some()
    }

    fn is_kinematic(&self, id: EntityId) -> Result<bool, SceneError> {
        self.components()
            .get_rigid_body(id)
            .map(|b| b.is_kinematic)
            .ok_or(SceneError::MissingPhysicsBody(id))
    }

    fn set_kinematic(&mut self, id: EntityId, kinematic: bool) -> Result<bool, SceneError> {
        if self.get(id).is_none() {
            return Err(SceneError::EntityNotFound(id));
        }
        self.components_mut()
            .set_kinematic(id, kinematic)
            .ok_or(SceneError::MissingPhysicsBody(id))
    }
}
