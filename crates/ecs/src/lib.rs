//! Minimal deterministic component model for scene objects.
//!
//! Components are stored in BTreeMap for deterministic iteration order.
//! Each component type has its own storage keyed by EntityId.
//!
//! # Invariants
//! - All component mutations produce events.
//! - Iteration order is deterministic (BTreeMap).
//! - An entity has at most one component of each type.

use glam::Vec3;
use liminal_common::{EntityId, Layer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Physics body marker.
///
/// Bodies are simulated by the host's physics step unless `is_kinematic` is
/// set, in which case their transform is driven directly by gameplay code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBody {
    pub mass: f32,
    pub is_kinematic: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            is_kinematic: false,
        }
    }
}

/// Collision shape in the object's local space, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collider {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Default for Collider {
    fn default() -> Self {
        Self::Box {
            half_extents: Vec3::splat(0.5),
        }
    }
}

/// Events produced by component mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentEvent {
    NameAdded { entity: EntityId, name: String },
    NameRemoved { entity: EntityId, name: String },
    RigidBodyAdded { entity: EntityId, body: RigidBody },
    RigidBodyUpdated { entity: EntityId, old: RigidBody, new: RigidBody },
    RigidBodyRemoved { entity: EntityId, body: RigidBody },
    ColliderAdded { entity: EntityId, collider: Collider },
    ColliderRemoved { entity: EntityId, collider: Collider },
    LayerChanged { entity: EntityId, old: Layer, new: Layer },
}

/// Deterministic component storage for all component types.
///
/// Entities without an explicit layer live on [`Layer::DEFAULT`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    names: BTreeMap<EntityId, Name>,
    rigid_bodies: BTreeMap<EntityId, RigidBody>,
    colliders: BTreeMap<EntityId, Collider>,
    layers: BTreeMap<EntityId, Layer>,
    #[serde(skip)]
    events: Vec<ComponentEvent>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending component events.
    pub fn drain_events(&mut self) -> Vec<ComponentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: String) {
        if let Some(old) = self.names.remove(&entity) {
            self.events.push(ComponentEvent::NameRemoved {
                entity,
                name: old.0,
            });
        }
        self.events.push(ComponentEvent::NameAdded {
            entity,
            name: name.clone(),
        });
        self.names.insert(entity, Name(name));
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    /// Find the first entity (in id order) carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.names
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(id, _)| *id)
    }

    // --- RigidBody ---
    pub fn set_rigid_body(&mut self, entity: EntityId, body: RigidBody) {
        match self.rigid_bodies.insert(entity, body) {
            Some(old) => self.events.push(ComponentEvent::RigidBodyUpdated {
                entity,
                old,
                new: body,
            }),
            None => self
                .events
                .push(ComponentEvent::RigidBodyAdded { entity, body }),
        }
    }

    pub fn remove_rigid_body(&mut self, entity: EntityId) -> Option<RigidBody> {
        let removed = self.rigid_bodies.remove(&entity);
        if let Some(body) = removed {
            self.events
                .push(ComponentEvent::RigidBodyRemoved { entity, body });
        }
        removed
    }

    pub fn get_rigid_body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.rigid_bodies.get(&entity)
    }

    /// Toggle whether the body is driven by gameplay code instead of the
    /// physics step. Returns the previous flag, or `None` without a body.
    ///
    /// Writing the value the body already has produces no event.
    pub fn set_kinematic(&mut self, entity: EntityId, kinematic: bool) -> Option<bool> {
        let body = self.rigid_bodies.get_mut(&entity)?;
        let old = *body;
        if old.is_kinematic != kinematic {
            body.is_kinematic = kinematic;
            tracing::trace!(entity = %entity, kinematic, "rigid body mode changed");
            self.events.push(ComponentEvent::RigidBodyUpdated {
                entity,
                old,
                new: *body,
            });
        }
        Some(old.is_kinematic)
    }

    // --- Collider ---
    pub fn set_collider(&mut self, entity: EntityId, collider: Collider) {
        self.events.push(ComponentEvent::ColliderAdded { entity, collider });
        self.colliders.insert(entity, collider);
    }

    pub fn remove_collider(&mut self, entity: EntityId) -> Option<Collider> {
        let removed = self.colliders.remove(&entity);
        if let Some(collider) = removed {
            self.events
                .push(ComponentEvent::ColliderRemoved { entity, collider });
        }
        removed
    }

    pub fn get_collider(&self, entity: EntityId) -> Option<&Collider> {
        self.colliders.get(&entity)
    }

    /// All colliders in id order.
    pub fn colliders(&self) -> &BTreeMap<EntityId, Collider> {
        &self.colliders
    }

    // --- Layer ---
    pub fn set_layer(&mut self, entity: EntityId, layer: Layer) {
        let old = self.layer(entity);
        if old != layer {
            self.events.push(ComponentEvent::LayerChanged {
                entity,
                old,
                new: layer,
            });
        }
        self.layers.insert(entity, layer);
    }

    pub fn layer(&self, entity: EntityId) -> Layer {
        self.layers.get(&entity).copied().unwrap_or_default()
    }

    /// Remove all components for an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        if let Some(name) = self.names.remove(&entity) {
            self.events.push(ComponentEvent::NameRemoved {
                entity,
                name: name.0,
            });
        }
        self.remove_rigid_body(entity);
        self.remove_collider(entity);
        self.layers.remove(&entity);
    }
}
