//! Input state provider: raw per-frame device state mapped to semantic queries.
//!
//! # Invariants
//! - Gameplay code consumes semantic queries and actions, never raw device state.
//! - Edge queries (`*_down`) fire on exactly one frame per press.
//! - While the cursor is unlocked every query reports neutral input.

pub mod action;
pub mod state;
pub mod viewer;

pub use action::Action;
pub use state::{Button, InputConfig, InputState, RawInput};
pub use viewer::FirstPersonViewer;
