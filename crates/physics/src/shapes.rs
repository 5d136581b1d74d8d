use glam::{Quat, Vec3};
use liminal_common::Transform;
use liminal_ecs::Collider;

use crate::ray::Ray;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Distance along `ray` to the first entry point of a sphere.
///
/// Returns `None` when the ray misses or starts strictly inside the sphere.
/// A ray starting on the surface and heading inward hits at distance 0.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Distance along `ray` to the first entry point of an oriented box.
///
/// Slab test in the box's local frame. Same inside/surface rules as
/// [`ray_sphere`].
pub fn ray_obb(ray: &Ray, center: Vec3, rotation: Quat, half_extents: Vec3) -> Option<f32> {
    let inv = rotation.inverse();
    let origin = inv * (ray.origin - center);
    let dir = inv * ray.direction;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], half_extents[axis]);
        if d.abs() < PARALLEL_EPSILON {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 || t_enter < 0.0 {
        return None;
    }
    Some(t_enter)
}

/// Intersect a ray with a collider placed by `transform`.
///
/// Box extents scale per axis; sphere radii scale by the largest axis.
pub fn intersect_collider(ray: &Ray, collider: &Collider, transform: &Transform) -> Option<f32> {
    let scale = transform.scale.abs();
    match *collider {
        Collider::Box { half_extents } => ray_obb(
            ray,
            transform.position,
            transform.rotation,
            half_extents * scale,
        ),
        Collider::Sphere { radius } => ray_sphere(ray, transform.position, radius * scale.max_element()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_ray(origin: Vec3) -> Ray {
        Ray::new(origin, Vec3::Z)
    }

    #[test]
    fn sphere_hit_in_front() {
        let t = ray_sphere(&forward_ray(Vec3::ZERO), Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_behind_is_missed() {
        assert!(ray_sphere(&forward_ray(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn sphere_from_inside_is_missed() {
        assert!(ray_sphere(&forward_ray(Vec3::ZERO), Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn sphere_off_axis_is_missed() {
        let t = ray_sphere(&forward_ray(Vec3::new(3.0, 0.0, 0.0)), Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn box_face_distance() {
        let t = ray_obb(
            &forward_ray(Vec3::ZERO),
            Vec3::new(0.0, 0.0, 10.5),
            Quat::IDENTITY,
            Vec3::splat(0.5),
        );
        assert_eq!(t, Some(10.0));
    }

    #[test]
    fn box_from_surface_hits_at_zero() {
        let t = ray_obb(
            &forward_ray(Vec3::new(0.0, 0.0, 10.0)),
            Vec3::new(0.0, 0.0, 10.5),
            Quat::IDENTITY,
            Vec3::splat(0.5),
        );
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn box_from_inside_is_missed() {
        let t = ray_obb(
            &forward_ray(Vec3::new(0.0, 0.0, 10.5)),
            Vec3::new(0.0, 0.0, 10.5),
            Quat::IDENTITY,
            Vec3::splat(0.5),
        );
        assert!(t.is_none());
    }

    #[test]
    fn rotated_box_uses_local_extents() {
        // A thin slab, 4 wide along X, rotated 90° about Y so its long side faces the ray.
        let rot = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let t = ray_obb(
            &forward_ray(Vec3::ZERO),
            Vec3::new(0.0, 0.0, 6.0),
            rot,
            Vec3::new(2.0, 1.0, 0.1),
        );
        assert!((t.unwrap() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn collider_scale_grows_box() {
        let transform = Transform::from_position(Vec3::new(0.0, 0.0, 10.0)).with_uniform_scale(2.0);
        let t = intersect_collider(&forward_ray(Vec3::ZERO), &Collider::default(), &transform);
        assert!((t.unwrap() - 9.0).abs() < 1e-5);
    }

    #[test]
    fn collider_scale_grows_sphere() {
        let transform = Transform::from_position(Vec3::new(0.0, 0.0, 10.0)).with_uniform_scale(3.0);
        let t = intersect_collider(
            &forward_ray(Vec3::ZERO),
            &Collider::Sphere { radius: 1.0 },
            &transform,
        );
        assert!((t.unwrap() - 7.0).abs() < 1e-5);
    }
}
