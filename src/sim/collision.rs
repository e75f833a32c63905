//! Axis-aligned bounding-box collision detection
//!
//! Every collision in the game is a rectangle overlap test with inclusive
//! edges: touching boxes count as a hit.

use glam::Vec2;

use super::asset::Footprint;
use super::entities::{Invader, InvaderProjectile, Player, Projectile};

/// Screen-space rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn from_origin(origin: Vec2, size: Footprint) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.width,
            bottom: origin.y + size.height,
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered(center: Vec2, size: Footprint) -> Self {
        Self::from_origin(
            center - Vec2::new(size.width, size.height) * 0.5,
            size,
        )
    }

    /// Square enclosing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            left: center.x - radius,
            top: center.y - radius,
            right: center.x + radius,
            bottom: center.y + radius,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Inclusive overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.bottom >= other.top
            && self.right >= other.left
            && self.left <= other.right
            && self.top <= other.bottom
    }
}

/// Player shot against an invader.
///
/// The shot is treated as the square around its radius. Either side still
/// loading means no hit.
pub fn projectile_hits_invader(projectile: &Projectile, invader: &Invader) -> bool {
    if !projectile.sprite.is_ready() {
        return false;
    }
    match invader.rect() {
        Some(target) => projectile.bounds().overlaps(&target),
        None => false,
    }
}

/// Enemy shot against the player ship
pub fn invader_projectile_hits_player(projectile: &InvaderProjectile, player: &Player) -> bool {
    match (projectile.rect(), player.rect()) {
        (Some(shot), Some(ship)) => shot.overlaps(&ship),
        _ => false,
    }
}
