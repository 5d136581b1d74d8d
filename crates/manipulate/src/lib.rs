//! Depth-rescale manipulation.
//!
//! Picking an object up freezes its apparent size: every frame it is moved onto
//! whatever surface lies along the viewer's sightline and scaled by how much
//! farther (or nearer) that is than where it was picked up.
//!
//! # Invariants
//! - At most one object is held at a time.
//! - A held session always has `original_distance > 0`.
//! - Input is handled before the resize step within a frame.
//! - Only the held object's transform and rigid body are ever written.

pub mod config;
pub mod frame;
pub mod manipulator;

pub use config::{ClipFallback, ManipulatorConfig};
pub use frame::{FrameInput, FrameSource, PlayerFrame};
pub use manipulator::{
    DepthRescaleManipulator, FrameReport, InputOutcome, ManipulateError, ManipulationSession,
    ManipulatorState, ResizeOutcome,
};
