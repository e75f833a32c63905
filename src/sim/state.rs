//! World state
//!
//! Everything the tick loop reads or writes lives in one owned [`World`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::asset::{AssetProvider, Sprite};
use super::entities::{IdAllocator, InvaderProjectile, Particle, Player, Projectile};
use super::grid::Grid;
use crate::consts::*;

/// Drawable area, fixed for the lifetime of a world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Collection sizes at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub frames: u64,
    pub grids: usize,
    pub invaders: usize,
    pub projectiles: usize,
    pub invader_projectiles: usize,
    pub particles: usize,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub viewport: Viewport,
    pub player: Player,
    /// Player shots
    pub projectiles: Vec<Projectile>,
    /// Active formations (spawn order)
    pub grids: Vec<Grid>,
    /// Enemy shots
    pub invader_projectiles: Vec<InvaderProjectile>,
    /// Destruction sparks (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Ticks elapsed
    pub frames: u64,
    /// A grid spawns whenever `frames` is a multiple of this
    pub spawn_interval: u64,
    pub rng: Pcg32,
    pub ids: IdAllocator,
}

impl World {
    /// Create an empty world. The first grid appears on the first tick.
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn_interval = random_spawn_interval(&mut rng);
        Self {
            viewport,
            player: Player::new(),
            projectiles: Vec::new(),
            grids: Vec::new(),
            invader_projectiles: Vec::new(),
            particles: Vec::new(),
            frames: 0,
            spawn_interval,
            rng,
            ids: IdAllocator::default(),
        }
    }

    /// Resolve any sprites still loading
    pub fn poll_assets(&mut self, assets: &impl AssetProvider) {
        self.player.poll_asset(assets, self.viewport);

        for projectile in &mut self.projectiles {
            if projectile.sprite.poll(Sprite::Projectile, 1.0, assets) {
                log::warn!("Projectile {} sprite failed to load", projectile.id);
            }
        }
        for projectile in &mut self.invader_projectiles {
            if projectile.sprite.poll(Sprite::InvaderProjectile, 1.0, assets) {
                log::warn!("Invader projectile {} sprite failed to load", projectile.id);
            }
        }
        for grid in &mut self.grids {
            for invader in &mut grid.invaders {
                if invader.sprite.poll(Sprite::Invader, INVADER_SCALE, assets) {
                    log::warn!("Invader {} sprite failed to load", invader.id);
                }
            }
        }
    }

    /// Fire a shot from the ship's top-center. No-op until the ship is ready.
    pub fn fire(&mut self) -> Option<u32> {
        let muzzle = self.player.muzzle()?;
        Some(self.spawn_projectile(muzzle))
    }

    /// Add a player shot centered at `pos`
    pub fn spawn_projectile(&mut self, pos: Vec2) -> u32 {
        let id = self.ids.next_id();
        self.projectiles.push(Projectile::new(id, pos));
        id
    }

    /// Add a random formation at the origin
    pub fn spawn_grid(&mut self) -> u32 {
        let id = self.ids.next_id();
        let grid = Grid::random(id, &mut self.rng, &mut self.ids);
        log::debug!(
            "Spawned grid {} with {} invaders at frame {}",
            id,
            grid.invaders.len(),
            self.frames
        );
        self.grids.push(grid);
        id
    }

    /// Add a formation with a fixed layout
    pub fn spawn_grid_with(&mut self, columns: usize, rows: usize) -> u32 {
        let id = self.ids.next_id();
        let grid = Grid::new(id, columns, rows, &mut self.ids);
        self.grids.push(grid);
        id
    }

    /// Spawn a grid if this frame lands on the interval, then draw a new one
    pub fn maybe_spawn_grid(&mut self) -> bool {
        if self.frames % self.spawn_interval != 0 {
            return false;
        }
        self.spawn_grid();
        self.spawn_interval = random_spawn_interval(&mut self.rng);
        true
    }

    pub fn invader_count(&self) -> usize {
        self.grids.iter().map(|grid| grid.invaders.len()).sum()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frames: self.frames,
            grids: self.grids.len(),
            invaders: self.invader_count(),
            projectiles: self.projectiles.len(),
            invader_projectiles: self.invader_projectiles.len(),
            particles: self.particles.len(),
        }
    }
}

fn random_spawn_interval(rng: &mut impl Rng) -> u64 {
    rng.random_range(GRID_SPAWN_MIN_TICKS..=GRID_SPAWN_MAX_TICKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asset::ImmediateAssets;

    #[test]
    fn test_new_world_is_empty() {
        let world = World::new(Viewport::new(800.0, 600.0), 1);
        assert_eq!(world.frames, 0);
        assert!(world.grids.is_empty());
        assert!(world.projectiles.is_empty());
        assert!((GRID_SPAWN_MIN_TICKS..=GRID_SPAWN_MAX_TICKS).contains(&world.spawn_interval));
    }

    #[test]
    fn test_fire_needs_ready_player() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 1);
        assert!(world.fire().is_none());

        world.poll_assets(&ImmediateAssets::default());
        let id = world.fire().unwrap();
        let shot = &world.projectiles[0];
        assert_eq!(shot.id, id);
        // 60-wide ship at x = 370
        assert!((shot.pos.x - 400.0).abs() < 1e-3);
        assert_eq!(shot.pos.y, world.player.pos.y);
    }

    #[test]
    fn test_poll_assets_readies_everything() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 1);
        world.spawn_grid_with(3, 2);
        world.spawn_projectile(Vec2::new(10.0, 10.0));
        world.poll_assets(&ImmediateAssets::default());
        assert!(world.player.is_ready());
        assert!(world.projectiles[0].sprite.is_ready());
        assert!(world.grids[0].invaders.iter().all(|i| i.sprite.is_ready()));
    }

    #[test]
    fn test_spawn_interval_redrawn() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 5);
        assert!(world.maybe_spawn_grid()); // frame 0
        assert_eq!(world.grids.len(), 1);

        world.frames = world.spawn_interval + 1;
        assert!(!world.maybe_spawn_grid());
        assert_eq!(world.grids.len(), 1);

        world.frames = world.spawn_interval * 2;
        assert!(world.maybe_spawn_grid());
        assert_eq!(world.grids.len(), 2);
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = World::new(Viewport::new(800.0, 600.0), 42);
        let mut b = World::new(Viewport::new(800.0, 600.0), 42);
        a.spawn_grid();
        b.spawn_grid();
        assert_eq!(a.spawn_interval, b.spawn_interval);
        assert_eq!(a.grids[0].invaders.len(), b.grids[0].invaders.len());
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
