//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (raw keys and clicks to player commands)
//! - Screen ↔ tile coordinate mapping
//! - Storage lives in `persistence`

pub mod input;

pub use input::{GridLayout, Handled, InputAction, PlayerController};
