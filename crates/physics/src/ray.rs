use glam::Vec3;
use liminal_common::{EntityId, Layer, LayerMask, Transform};
use liminal_ecs::Collider;
use serde::{Deserialize, Serialize};

use crate::shapes::intersect_collider;

/// A half-line in world space. `direction` is unit length, or zero for a
/// degenerate ray that hits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

/// The first thing a ray struck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub entity: EntityId,
    pub point: Vec3,
    pub distance: f32,
}

/// Which objects a ray query may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    pub mask: LayerMask,
    /// Never reported, regardless of layer.
    pub exclude: Option<EntityId>,
}

impl QueryFilter {
    pub fn new(mask: LayerMask) -> Self {
        Self {
            mask,
            exclude: None,
        }
    }

    pub fn excluding(self, entity: EntityId) -> Self {
        Self {
            exclude: Some(entity),
            ..self
        }
    }

    pub fn accepts(&self, entity: EntityId, layer: Layer) -> bool {
        self.mask.contains(layer) && self.exclude != Some(entity)
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::new(LayerMask::ALL)
    }
}

/// Synchronous ray queries against a scene.
///
/// Pass `f32::INFINITY` as `max_distance` for an unbounded ray.
pub trait RayCaster {
    fn raycast(&self, ray: &Ray, max_distance: f32, filter: &QueryFilter) -> Option<RayHit>;
}

/// Closest accepted hit among `candidates`, scanning them all.
///
/// Candidates are `(entity, layer, collider, transform)`. When they arrive in
/// `EntityId` order, ties on distance resolve to the first one seen.
pub fn closest_hit<'a>(
    ray: &Ray,
    max_distance: f32,
    filter: &QueryFilter,
    candidates: impl IntoIterator<Item = (EntityId, Layer, &'a Collider, &'a Transform)>,
) -> Option<RayHit> {
    if ray.is_degenerate() || max_distance.is_nan() || max_distance < 0.0 {
        return None;
    }

    let mut best: Option<(EntityId, f32)> = None;
    for (entity, layer, collider, transform) in candidates {
        if !filter.accepts(entity, layer) {
            continue;
        }
        let Some(t) = intersect_collider(ray, collider, transform) else {
            continue;
        };
        if t > max_distance {
            continue;
        }
        if best.is_none_or(|(_, best_t)| t < best_t) {
            best = Some((entity, t));
        }
    }

    best.map(|(entity, distance)| RayHit {
        entity,
        point: ray.at(distance),
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(z: f32) -> Transform {
        Transform::from_position(Vec3::new(0.0, 0.0, z + 0.5))
    }

    #[test]
    fn ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(ray.direction, Vec3::Y);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn filter_respects_mask_and_exclusion() {
        let id = EntityId::new();
        let filter = QueryFilter::new(LayerMask::layer(Layer::TARGETABLE));
        assert!(filter.accepts(id, Layer::TARGETABLE));
        assert!(!filter.accepts(id, Layer::DEFAULT));
        assert!(!filter.excluding(id).accepts(id, Layer::TARGETABLE));
    }

    #[test]
    fn nearest_of_two_walls_wins() {
        let near = EntityId::new();
        let far = EntityId::new();
        let collider = Collider::default();
        let (t_near, t_far) = (wall(3.0), wall(8.0));
        let hit = closest_hit(
            &Ray::new(Vec3::ZERO, Vec3::Z),
            f32::INFINITY,
            &QueryFilter::default(),
            [
                (far, Layer::DEFAULT, &collider, &t_far),
                (near, Layer::DEFAULT, &collider, &t_near),
            ],
        )
        .unwrap();
        assert_eq!(hit.entity, near);
        assert_eq!(hit.distance, 3.0);
        assert_eq!(hit.point, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn masked_out_wall_is_transparent() {
        let near = EntityId::new();
        let far = EntityId::new();
        let collider = Collider::default();
        let (t_near, t_far) = (wall(3.0), wall(8.0));
        let hit = closest_hit(
            &Ray::new(Vec3::ZERO, Vec3::Z),
            f32::INFINITY,
            &QueryFilter::new(LayerMask::ALL.without(Layer::TARGETABLE)),
            [
                (near, Layer::TARGETABLE, &collider, &t_near),
                (far, Layer::DEFAULT, &collider, &t_far),
            ],
        )
        .unwrap();
        assert_eq!(hit.entity, far);
    }

    #[test]
    fn max_distance_bounds_the_query() {
        let id = EntityId::new();
        let collider = Collider::default();
        let t = wall(3.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let filter = QueryFilter::default();
        assert!(closest_hit(&ray, 2.9, &filter, [(id, Layer::DEFAULT, &collider, &t)]).is_none());
        assert!(closest_hit(&ray, 3.0, &filter, [(id, Layer::DEFAULT, &collider, &t)]).is_some());
    }

    #[test]
    fn degenerate_ray_hits_nothing() {
        let id = EntityId::new();
        let collider = Collider::default();
        let t = wall(3.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        let hit = closest_hit(
            &ray,
            f32::INFINITY,
            &QueryFilter::default(),
            [(id, Layer::DEFAULT, &collider, &t)],
        );
        assert!(hit.is_none());
    }
}
