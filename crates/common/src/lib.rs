//! Shared types for the liminal workspace.
//!
//! Everything here is plain data: identifiers, spatial transforms, collision
//! layers and the per-frame viewer pose. No crate-level state.

pub mod layer;
pub mod types;

pub use layer::{Layer, LayerMask};
pub use types::{EntityId, Transform, ViewerPose};
