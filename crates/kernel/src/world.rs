use liminal_common::{EntityId, Transform};
use liminal_ecs::ComponentStore;
use liminal_physics::{QueryFilter, Ray, RayCaster, RayHit, closest_hit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An event record produced by every mutation to object transforms.
///
/// Component mutations are logged separately by the [`ComponentStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was spawned with the given transform.
    Spawned { id: EntityId, transform: Transform },
    /// Entity was despawned.
    Despawned { id: EntityId, transform: Transform },
    /// Entity transform was updated.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// The host advanced one frame.
    Stepped { tick: u64 },
}

/// The authoritative scene state.
///
/// All mutations go through explicit operations. The world owns the truth;
/// gameplay systems such as the manipulator only request changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    components: ComponentStore,
    tick: u64,
    /// Append-only event log of all transform mutations.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub transform: Transform,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame counter.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the transform event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the transform event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Spawn a new entity with the given transform. Returns its id.
    ///
    /// The entity has no components; use [`crate::ObjectBuilder`] for
    /// objects that collide or can be picked up.
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, transform);
        id
    }

    /// Spawn an entity with a specific id.
    pub fn spawn_with_id(&mut self, id: EntityId, transform: Transform) {
        self.entities.insert(id, EntityData { transform });
        self.event_log.push(WorldEvent::Spawned { id, transform });
    }

    /// Remove an entity and all its components. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(ref d) = data {
            self.components.remove_entity(id);
            self.event_log.push(WorldEvent::Despawned {
                id,
                transform: d.transform,
            });
        }
        data
    }

    /// Get a reference to entity data.
    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Look an entity up by its name component.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.components.find_by_name(name)
    }

    /// Update an entity's transform and log the change.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            let old = data.transform;
            data.transform = new;
            self.event_log
                .push(WorldEvent::TransformUpdated { id, old, new });
            true
        } else {
            false
        }
    }

    /// Advance the frame counter.
    pub fn step(&mut self) {
        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
    }
}

impl RayCaster for World {
    fn raycast(&self, ray: &Ray, max_distance: f32, filter: &QueryFilter) -> Option<RayHit> {
        let candidates = self
            .components
            .colliders()
            .iter()
            .filter_map(|(id, collider)| {
                let data = self.entities.get(id)?;
                Some((*id, self.components.layer(*id), collider, &data.transform))
            });
        closest_hit(ray, max_distance, filter, candidates)
    }
}
