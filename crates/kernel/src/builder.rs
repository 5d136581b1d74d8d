use liminal_common::{EntityId, Layer, LayerMask, Transform};
use liminal_ecs::{Collider, RigidBody};

use crate::scene::SceneError;
use crate::world::World;

/// Assembles a scene object and its components in one step.
///
/// Objects on a targetable layer can be picked up, which requires a rigid
/// body; [`ObjectBuilder::spawn_checked`] refuses to build one without.
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    transform: Transform,
    name: Option<String>,
    collider: Option<Collider>,
    layer: Layer,
    rigid_body: Option<RigidBody>,
}

impl ObjectBuilder {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn rigid_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = Some(body);
        self
    }

    /// Put the object on the targetable layer.
    pub fn targetable(self) -> Self {
        self.layer(Layer::TARGETABLE)
    }

    /// Insert the object, treating only [`Layer::TARGETABLE`] as pickable.
    pub fn spawn(self, world: &mut World) -> Result<EntityId, SceneError> {
        self.spawn_checked(world, LayerMask::layer(Layer::TARGETABLE))
    }

    /// Validate against the layers a manipulator may pick from, then insert
    /// the object. Nothing is written on failure.
    pub fn spawn_checked(
        self,
        world: &mut World,
        targetable_mask: LayerMask,
    ) -> Result<EntityId, SceneError> {
        let id = EntityId::new();
        if targetable_mask.contains(self.layer) && self.rigid_body.is_none() {
            tracing::warn!(layer = self.layer.0, "targetable object has no rigid body");
            return Err(SceneError::MissingPhysicsBody(id));
        }

        world.spawn_with_id(id, self.transform);
        let components = world.components_mut();
        if let Some(name) = self.name {
            components.set_name(id, name);
        }
        if let Some(collider) = self.collider {
            components.set_collider(id, collider);
        }
        if let Some(body) = self.rigid_body {
            components.set_rigid_body(id, body);
        }
        components.set_layer(id, self.layer);

        tracing::debug!(entity = %id, layer = self.layer.0, "spawned object");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn builds_all_components() {
        let mut w = World::new();
        let id = ObjectBuilder::new(Transform::from_position(Vec3::new(0.0, 0.0, 5.0)))
            .name("cube")
            .collider(Collider::default())
            .rigid_body(RigidBody::default())
            .targetable()
            .spawn(&mut w)
            .unwrap();

        assert_eq!(w.find_by_name("cube"), Some(id));
        assert_eq!(w.components().layer(id), Layer::TARGETABLE);
        assert!(w.components().get_collider(id).is_some());
        assert!(w.components().get_rigid_body(id).is_some());
    }

    #[test]
    fn targetable_without_body_fails_at_construction() {
        let mut w = World::new();
        let result = ObjectBuilder::new(Transform::default())
            .collider(Collider::default())
            .targetable()
            .spawn(&mut w);

        assert!(matches!(result, Err(SceneError::MissingPhysicsBody(_))));
        assert_eq!(w.entity_count(), 0);
        assert!(w.events().is_empty());
    }

    #[test]
    fn custom_targetable_mask_requires_body() {
        let mut w = World::new();
        let mask = LayerMask::layer(Layer(3));
        let result = ObjectBuilder::new(Transform::default())
            .collider(Collider::default())
            .layer(Layer(3))
            .spawn_checked(&mut w, mask);
        assert!(matches!(result, Err(SceneError::MissingPhysicsBody(_))));
        assert_eq!(w.entity_count(), 0);

        // Layer 1 is ordinary geometry under this mask.
        let id = ObjectBuilder::new(Transform::default())
            .collider(Collider::default())
            .targetable()
            .spawn_checked(&mut w, mask)
            .unwrap();
        assert!(w.components().get_rigid_body(id).is_none());
    }

    #[test]
    fn static_geometry_needs_no_body() {
        let mut w = World::new();
        let id = ObjectBuilder::new(Transform::default())
            .collider(Collider::default())
            .spawn(&mut w)
            .unwrap();
        assert_eq!(w.components().layer(id), Layer::DEFAULT);
        assert!(w.components().get_rigid_body(id).is_none());
    }
}
