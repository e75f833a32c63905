//! Star Invaders - a formation shooter arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formations, collisions, tick)
//! - `renderer`: Draw-surface abstraction and per-frame draw calls
//! - `platform`: Keyboard state and browser bindings
//! - `settings`: Key bindings and presentation preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{KeyBindings, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Player ship
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_TILT: f32 = 0.15; // radians while strafing
    pub const PLAYER_SCALE: f32 = 1.2;
    /// Gap between the ship's bottom edge and the viewport bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Player shots
    pub const PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_RADIUS: f32 = 10.0;

    /// Enemy shots
    pub const INVADER_PROJECTILE_SPEED: f32 = 5.0;
    pub const INVADER_PROJECTILE_RADIUS: f32 = 3.0;
    /// Ticks between enemy volleys (shared by every grid)
    pub const INVADER_FIRE_INTERVAL: u64 = 100;

    /// Formation layout
    pub const INVADER_SCALE: f32 = 1.0;
    pub const GRID_SPACING: f32 = 40.0;
    pub const GRID_MIN_COLUMNS: usize = 5;
    pub const GRID_MAX_COLUMNS: usize = 14;
    pub const GRID_MIN_ROWS: usize = 1;
    pub const GRID_MAX_ROWS: usize = 2;

    /// Formation motion
    pub const GRID_SPEED: f32 = 3.0;
    /// One-tick vertical drop after bouncing off a wall
    pub const GRID_DESCENT: f32 = 40.0;

    /// Ticks between formation spawns, drawn uniformly from this range
    pub const GRID_SPAWN_MIN_TICKS: u64 = 500;
    pub const GRID_SPAWN_MAX_TICKS: u64 = 999;

    /// Destruction feedback
    pub const PARTICLE_BURST: usize = 15;
    pub const PARTICLE_FADE: f32 = 0.01;
    pub const PARTICLE_MAX_RADIUS: f32 = 3.0;
    /// Each velocity component is drawn from [-max, max)
    pub const PARTICLE_MAX_SPEED: f32 = 1.0;
}
