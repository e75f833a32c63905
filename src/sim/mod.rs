//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display refresh, no wall-clock time
//! - Seeded RNG only
//! - Asset readiness is polled, never pushed in by callbacks
//! - No rendering or platform dependencies

pub mod asset;
pub mod collision;
pub mod entities;
pub mod grid;
pub mod resolve;
pub mod state;
pub mod tick;

pub use asset::{AssetProvider, AssetState, Footprint, ImmediateAssets, Sprite};
pub use collision::{Rect, invader_projectile_hits_player, projectile_hits_invader};
pub use entities::{Invader, InvaderProjectile, Particle, ParticleColor, Player, Projectile};
pub use grid::Grid;
pub use resolve::{Applied, Hit, PendingChanges};
pub use state::{Snapshot, Viewport, World};
pub use tick::{TickInput, tick};
