//! Rendering
//!
//! The game draws through a small immediate-mode surface modelled on the
//! Canvas 2D API. [`draw_world`] walks the world in simulation order and issues
//! one group of calls per ready entity plus a full-surface background.

use crate::settings::Settings;
use crate::sim::{ParticleColor, Sprite, World};

/// Immediate-mode 2D drawing target
pub trait RenderSurface {
    /// Draw `sprite` stretched into the given rectangle. Sprites that have not
    /// loaded yet are skipped by the surface.
    fn draw_image(&mut self, sprite: Sprite, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: ParticleColor);
    /// Push transform and alpha state
    fn save(&mut self);
    /// Pop transform and alpha state
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn set_global_alpha(&mut self, alpha: f32);
}

/// Draw one frame
pub fn draw_world(world: &World, surface: &mut impl RenderSurface, settings: &Settings) {
    surface.draw_image(
        Sprite::Background,
        0.0,
        0.0,
        world.viewport.width,
        world.viewport.height,
    );

    // Ship tilts around its own center
    if let Some(rect) = world.player.rect() {
        let center = rect.center();
        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(world.player.rotation);
        surface.translate(-center.x, -center.y);
        surface.draw_image(Sprite::Player, rect.left, rect.top, rect.width(), rect.height());
        surface.restore();
    }

    if settings.particles {
        for particle in world.particles.iter().filter(|p| !p.is_expired()) {
            surface.save();
            surface.set_global_alpha(particle.opacity);
            surface.fill_circle(particle.pos.x, particle.pos.y, particle.radius, particle.color);
            surface.restore();
        }
    }

    for rect in world.invader_projectiles.iter().filter_map(|p| p.rect()) {
        surface.draw_image(
            Sprite::InvaderProjectile,
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
        );
    }

    for rect in world.projectiles.iter().filter_map(|p| p.rect()) {
        surface.draw_image(Sprite::Projectile, rect.left, rect.top, rect.width(), rect.height());
    }

    for grid in &world.grids {
        for rect in grid.invaders.iter().filter_map(|i| i.rect()) {
            surface.draw_image(Sprite::Invader, rect.left, rect.top, rect.width(), rect.height());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ImmediateAssets, TickInput, Viewport, tick};
    use glam::Vec2;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Image(Sprite, f32, f32, f32, f32),
        Circle(ParticleColor),
        Save,
        Restore,
        Translate(f32, f32),
        Rotate(f32),
        Alpha(f32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn images(&self, sprite: Sprite) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Image(s, ..) if *s == sprite))
                .count()
        }
    }

    impl RenderSurface for Recorder {
        fn draw_image(&mut self, sprite: Sprite, x: f32, y: f32, width: f32, height: f32) {
            self.calls.push(Call::Image(sprite, x, y, width, height));
        }
        fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32, color: ParticleColor) {
            self.calls.push(Call::Circle(color));
        }
        fn save(&mut self) {
            self.calls.push(Call::Save);
        }
        fn restore(&mut self) {
            self.calls.push(Call::Restore);
        }
        fn translate(&mut self, x: f32, y: f32) {
            self.calls.push(Call::Translate(x, y));
        }
        fn rotate(&mut self, angle: f32) {
            self.calls.push(Call::Rotate(angle));
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.calls.push(Call::Alpha(alpha));
        }
    }

    #[test]
    fn test_unloaded_world_draws_background_only() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 1);
        world.spawn_grid_with(5, 1);
        world.spawn_projectile(Vec2::new(10.0, 10.0));

        let mut recorder = Recorder::default();
        draw_world(&world, &mut recorder, &Settings::default());
        assert_eq!(
            recorder.calls,
            vec![Call::Image(Sprite::Background, 0.0, 0.0, 800.0, 600.0)]
        );
    }

    #[test]
    fn test_player_drawn_with_tilt() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 1);
        world.poll_assets(&ImmediateAssets::default());
        world.player.rotation = 0.15;

        let mut recorder = Recorder::default();
        draw_world(&world, &mut recorder, &Settings::default());
        let rect = world.player.rect().unwrap();
        let center = rect.center();
        assert_eq!(
            &recorder.calls[1..6],
            &[
                Call::Save,
                Call::Translate(center.x, center.y),
                Call::Rotate(0.15),
                Call::Translate(-center.x, -center.y),
                Call::Image(Sprite::Player, rect.left, rect.top, rect.width(), rect.height()),
            ]
        );
        assert_eq!(recorder.calls[6], Call::Restore);
    }

    #[test]
    fn test_every_ready_entity_drawn() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 3);
        let assets = ImmediateAssets::default();
        world.frames = 1;
        world.spawn_grid_with(4, 2);
        world.spawn_projectile(Vec2::new(700.0, 300.0));
        tick(&mut world, &TickInput::default(), &assets);

        let mut recorder = Recorder::default();
        draw_world(&world, &mut recorder, &Settings::default());
        assert_eq!(recorder.images(Sprite::Background), 1);
        assert_eq!(recorder.images(Sprite::Player), 1);
        assert_eq!(recorder.images(Sprite::Projectile), 1);
        assert_eq!(recorder.images(Sprite::Invader), 8);
    }

    #[test]
    fn test_particles_respect_settings() {
        let mut world = World::new(Viewport::new(800.0, 600.0), 3);
        let burst = crate::sim::Particle::burst(
            Vec2::new(50.0, 50.0),
            ParticleColor::Yellow,
            &mut world.rng,
            &mut world.ids,
        );
        world.particles.extend(burst);

        let mut recorder = Recorder::default();
        draw_world(&world, &mut recorder, &Settings::default());
        let circles = recorder
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Circle(ParticleColor::Yellow)))
            .count();
        assert_eq!(circles, crate::consts::PARTICLE_BURST);
        assert!(recorder.calls.contains(&Call::Alpha(1.0)));

        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let mut recorder = Recorder::default();
        draw_world(&world, &mut recorder, &settings);
        assert_eq!(recorder.calls.len(), 1);
    }
}
