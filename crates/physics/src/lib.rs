//! Geometry queries: rays against collider shapes.
//!
//! This crate answers "what does this ray hit first?" and nothing else. It does
//! not simulate bodies; rigid bodies are only flags consulted by gameplay code.
//!
//! # Invariants
//! - A ray whose origin lies strictly inside a collider does not hit it.
//! - Closest hit wins; equal distances resolve to the lowest `EntityId`.

pub mod ray;
pub mod shapes;

pub use ray::{QueryFilter, Ray, RayCaster, RayHit, closest_hit};
pub use shapes::{intersect_collider, ray_obb, ray_sphere};
