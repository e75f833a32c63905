//! Deferred removals and spawns
//!
//! The tick walks the collections read-only with respect to membership and
//! records what should happen in a [`PendingChanges`]. Once every entity has
//! moved, [`PendingChanges::apply`] commits removals and insertions in one go,
//! so nothing is removed while it is being iterated.

use glam::Vec2;

use super::entities::{InvaderProjectile, Particle, ParticleColor};
use super::state::World;

/// A player shot striking an invader
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub grid_id: u32,
    pub invader_id: u32,
    pub projectile_id: u32,
    /// Invader center at the moment of impact
    pub center: Vec2,
}

/// Outcome counts of one commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub invaders_destroyed: usize,
    pub grids_cleared: usize,
    pub particles_spawned: usize,
}

/// Everything decided during a tick, applied at its end
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    pub expired_particles: Vec<u32>,
    pub expired_projectiles: Vec<u32>,
    pub expired_invader_projectiles: Vec<u32>,
    pub hits: Vec<Hit>,
    /// Bursts not tied to a hit (player struck)
    pub bursts: Vec<(Vec2, ParticleColor)>,
    pub invader_projectiles: Vec<InvaderProjectile>,
}

impl PendingChanges {
    pub fn expire_particle(&mut self, id: u32) {
        if !self.expired_particles.contains(&id) {
            self.expired_particles.push(id);
        }
    }

    pub fn expire_projectile(&mut self, id: u32) {
        if !self.expired_projectiles.contains(&id) {
            self.expired_projectiles.push(id);
        }
    }

    pub fn expire_invader_projectile(&mut self, id: u32) {
        if !self.expired_invader_projectiles.contains(&id) {
            self.expired_invader_projectiles.push(id);
        }
    }

    /// Whether the shot is already spent this tick
    pub fn projectile_claimed(&self, projectile_id: u32) -> bool {
        self.expired_projectiles.contains(&projectile_id)
            || self.hits.iter().any(|hit| hit.projectile_id == projectile_id)
    }

    pub fn invader_claimed(&self, invader_id: u32) -> bool {
        self.hits.iter().any(|hit| hit.invader_id == invader_id)
    }

    /// Record a hit unless either party is already spoken for.
    ///
    /// One shot destroys one invader and one invader absorbs one shot, so a
    /// pair can never be removed or rewarded twice.
    pub fn record_hit(&mut self, hit: Hit) -> bool {
        if self.projectile_claimed(hit.projectile_id) || self.invader_claimed(hit.invader_id) {
            return false;
        }
        log::trace!(
            "Projectile {} hit invader {} (grid {})",
            hit.projectile_id,
            hit.invader_id,
            hit.grid_id
        );
        self.hits.push(hit);
        true
    }

    pub fn burst(&mut self, center: Vec2, color: ParticleColor) {
        self.bursts.push((center, color));
    }

    pub fn spawn_invader_projectile(&mut self, projectile: InvaderProjectile) {
        self.invader_projectiles.push(projectile);
    }

    /// Commit every recorded change to `world`
    pub fn apply(self, world: &mut World) -> Applied {
        let mut applied = Applied::default();

        world
            .particles
            .retain(|particle| !self.expired_particles.contains(&particle.id));
        world
            .invader_projectiles
            .retain(|projectile| !self.expired_invader_projectiles.contains(&projectile.id));
        world.projectiles.retain(|projectile| {
            !self.expired_projectiles.contains(&projectile.id)
                && !self.hits.iter().any(|hit| hit.projectile_id == projectile.id)
        });

        for grid in &mut world.grids {
            let doomed: Vec<u32> = self
                .hits
                .iter()
                .filter(|hit| hit.grid_id == grid.id)
                .map(|hit| hit.invader_id)
                .collect();
            if doomed.is_empty() {
                continue;
            }
            applied.invaders_destroyed += grid.remove_invaders(&doomed);
            if grid.is_empty() {
                log::debug!("Grid {} cleared", grid.id);
                applied.grids_cleared += 1;
            }
        }
        world.grids.retain(|grid| !grid.is_empty());

        let hit_bursts = self
            .hits
            .iter()
            .map(|hit| (hit.center, ParticleColor::Yellow));
        for (center, color) in self.bursts.iter().copied().chain(hit_bursts) {
            let burst = Particle::burst(center, color, &mut world.rng, &mut world.ids);
            applied.particles_spawned += burst.len();
            world.particles.extend(burst);
        }

        world.invader_projectiles.extend(self.invader_projectiles);

        applied
    }
}
