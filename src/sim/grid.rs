//! Invader formations
//!
//! A grid sweeps sideways at a constant speed, drops one row-height when it
//! touches a wall, and shrinks its bounds as members are shot down.

use glam::Vec2;
use rand::Rng;

use super::entities::{IdAllocator, Invader};
use crate::consts::*;

/// A formation of invaders moving as one
#[derive(Debug, Clone)]
pub struct Grid {
    pub id: u32,
    /// Left edge of the formation
    pub pos: Vec2,
    /// `y` is non-zero for exactly one tick after a bounce
    pub vel: Vec2,
    /// Column-major: all rows of column 0, then column 1, ...
    pub invaders: Vec<Invader>,
    /// Horizontal extent used for wall bounces
    pub width: f32,
}

impl Grid {
    /// Build a `columns` x `rows` formation at the origin
    pub fn new(id: u32, columns: usize, rows: usize, ids: &mut IdAllocator) -> Self {
        let mut invaders = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                let pos = Vec2::new(column as f32 * GRID_SPACING, row as f32 * GRID_SPACING);
                invaders.push(Invader::new(ids.next_id(), pos));
            }
        }

        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::new(GRID_SPEED, 0.0),
            invaders,
            width: columns as f32 * GRID_SPACING,
        }
    }

    /// Random layout within the configured column/row ranges
    pub fn random(id: u32, rng: &mut impl Rng, ids: &mut IdAllocator) -> Self {
        let columns = rng.random_range(GRID_MIN_COLUMNS..=GRID_MAX_COLUMNS);
        let rows = rng.random_range(GRID_MIN_ROWS..=GRID_MAX_ROWS);
        Self::new(id, columns, rows, ids)
    }

    pub fn is_empty(&self) -> bool {
        self.invaders.is_empty()
    }

    /// At least one member has its sprite
    pub fn is_ready(&self) -> bool {
        self.invaders.iter().any(|invader| invader.sprite.is_ready())
    }

    /// Advance one tick and return the displacement to hand each invader.
    ///
    /// The drop impulse lasts one tick: it is cleared right after being
    /// applied. A wall only reverses a grid that is heading into it, so a grid
    /// left past an edge by a shrink does not flip back and forth.
    ///
    /// A formation whose members are all still loading holds its place.
    pub fn update(&mut self, viewport_width: f32) -> Vec2 {
        if !self.is_ready() {
            return Vec2::ZERO;
        }

        let displacement = self.vel;
        self.pos += displacement;
        self.vel.y = 0.0;

        let hit_right = self.pos.x + self.width >= viewport_width && self.vel.x > 0.0;
        let hit_left = self.pos.x <= 0.0 && self.vel.x < 0.0;
        if hit_right || hit_left {
            self.vel.x = -self.vel.x;
            self.vel.y = GRID_DESCENT;
        }

        for invader in &mut self.invaders {
            invader.update(displacement);
        }

        displacement
    }

    /// Pick a random ready invader to return fire
    pub fn pick_shooter(&self, rng: &mut impl Rng) -> Option<&Invader> {
        let ready: Vec<&Invader> = self
            .invaders
            .iter()
            .filter(|invader| invader.sprite.is_ready())
            .collect();
        if ready.is_empty() {
            return None;
        }
        Some(ready[rng.random_range(0..ready.len())])
    }

    /// Drop the given invaders and refit the bounds to the survivors.
    ///
    /// Returns the number removed.
    pub fn remove_invaders(&mut self, ids: &[u32]) -> usize {
        let before = self.invaders.len();
        self.invaders.retain(|invader| !ids.contains(&invader.id));
        let removed = before - self.invaders.len();
        if removed > 0 {
            self.refit();
        }
        removed
    }

    /// Snap `pos.x` and `width` to the leftmost/rightmost survivors
    pub fn refit(&mut self) {
        let left = self
            .invaders
            .iter()
            .map(|invader| invader.pos.x)
            .reduce(f32::min);
        let right = self
            .invaders
            .iter()
            .map(|invader| invader.right())
            .reduce(f32::max);

        if let (Some(left), Some(right)) = (left, right) {
            self.pos.x = left;
            self.width = right - left;
        }
    }
}
