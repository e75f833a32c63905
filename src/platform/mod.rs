//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard events (shared)
//! - Canvas 2D drawing and image loading (web only)

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::KeyboardState;
