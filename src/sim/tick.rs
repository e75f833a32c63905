//! One simulation step
//!
//! Core game loop that advances the world by exactly one display refresh.

use super::asset::AssetProvider;
use super::collision::{invader_projectile_hits_player, projectile_hits_invader};
use super::entities::ParticleColor;
use super::resolve::{Applied, Hit, PendingChanges};
use super::state::World;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Strafe left key held
    pub move_negative: bool,
    /// Strafe right key held
    pub move_positive: bool,
    /// Fire key presses since the previous tick
    pub fire_presses: u32,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput, assets: &impl AssetProvider) -> Applied {
    // Shots fired between frames join before anything moves
    for _ in 0..input.fire_presses {
        world.fire();
    }
    world.poll_assets(assets);

    let mut pending = PendingChanges::default();

    world.player.update();

    for particle in &mut world.particles {
        particle.update();
        if particle.is_expired() {
            pending.expire_particle(particle.id);
        }
    }

    for projectile in &mut world.invader_projectiles {
        projectile.update();
        if projectile.is_expired(world.viewport.height) {
            pending.expire_invader_projectile(projectile.id);
        }
        // The shot is not consumed: it keeps sparking while it overlaps
        if invader_projectile_hits_player(projectile, &world.player) {
            if let Some(rect) = world.player.rect() {
                pending.burst(rect.center(), ParticleColor::White);
            }
        }
    }

    for projectile in &mut world.projectiles {
        projectile.update();
        if projectile.is_expired() {
            pending.expire_projectile(projectile.id);
        }
    }

    let volley = world.frames % INVADER_FIRE_INTERVAL == 0;
    for grid in &mut world.grids {
        grid.update(world.viewport.width);

        if volley {
            if let Some(shooter) = grid.pick_shooter(&mut world.rng) {
                if let Some(shot) = shooter.shoot(world.ids.next_id()) {
                    pending.spawn_invader_projectile(shot);
                }
            }
        }

        for invader in &grid.invaders {
            for projectile in &world.projectiles {
                if projectile_hits_invader(projectile, invader) {
                    pending.record_hit(Hit {
                        grid_id: grid.id,
                        invader_id: invader.id,
                        projectile_id: projectile.id,
                        center: invader.center(),
                    });
                }
            }
        }
    }

    let applied = pending.apply(world);

    world
        .player
        .steer(input.move_negative, input.move_positive, world.viewport.width);

    world.maybe_spawn_grid();
    world.frames += 1;

    applied
}
