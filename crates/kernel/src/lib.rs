//! Scene kernel: authoritative object transforms, components and ray queries.
//!
//! # Invariants
//! - All state mutations flow through explicit operations and are logged.
//! - Targetable objects always carry a rigid body (enforced at construction).
//! - Iteration order is deterministic (BTreeMap), so ray ties resolve stably.

pub mod builder;
pub mod scene;
pub mod world;

pub use builder::ObjectBuilder;
pub use scene::{SceneError, SceneObjects};
pub use world::{EntityData, World, WorldEvent};
