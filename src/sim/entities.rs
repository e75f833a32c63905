//! Simulation entities
//!
//! Every entity with a sprite carries an [`AssetState`]; until it reads
//! `Ready` the entity neither moves, draws nor collides.

use glam::Vec2;
use rand::Rng;

use super::asset::{AssetProvider, AssetState, Footprint, Sprite};
use super::collision::Rect;
use super::state::Viewport;
use crate::consts::*;

/// Opacity below this is treated as fully faded (absorbs f32 drift from
/// repeated subtraction of `PARTICLE_FADE`).
const OPACITY_EPSILON: f32 = 1e-4;

/// Hands out entity IDs in creation order
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner; placed once the sprite resolves
    pub pos: Vec2,
    pub vel: Vec2,
    /// Tilt while strafing (radians)
    pub rotation: f32,
    pub sprite: AssetState,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            sprite: AssetState::Loading,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.sprite.is_ready()
    }

    pub fn rect(&self) -> Option<Rect> {
        self.sprite
            .footprint()
            .map(|size| Rect::from_origin(self.pos, size))
    }

    /// Spawn point for shots: top-center of the ship
    pub fn muzzle(&self) -> Option<Vec2> {
        self.sprite
            .footprint()
            .map(|size| Vec2::new(self.pos.x + size.width / 2.0, self.pos.y))
    }

    /// Poll the sprite; on first readiness, park the ship bottom-center.
    pub fn poll_asset(&mut self, assets: &impl AssetProvider, viewport: Viewport) {
        let was_loading = self.sprite == AssetState::Loading;
        if self.sprite.poll(Sprite::Player, PLAYER_SCALE, assets) {
            log::warn!("Player sprite failed to load; ship stays inert");
        }
        if let (true, Some(size)) = (was_loading, self.sprite.footprint()) {
            self.pos = Vec2::new(
                viewport.width / 2.0 - size.width / 2.0,
                viewport.height - size.height - PLAYER_BOTTOM_MARGIN,
            );
        }
    }

    pub fn update(&mut self) {
        if self.is_ready() {
            self.pos += self.vel;
        }
    }

    /// Set velocity and tilt from held movement keys.
    ///
    /// A blocked direction zeroes velocity instead of clamping position, so
    /// the ship may end up to 5 units past an edge.
    pub fn steer(&mut self, move_negative: bool, move_positive: bool, viewport_width: f32) {
        let Some(rect) = self.rect() else {
            self.vel.x = 0.0;
            self.rotation = 0.0;
            return;
        };

        if move_negative && rect.left >= 0.0 {
            self.vel.x = -PLAYER_SPEED;
            self.rotation = -PLAYER_TILT;
        } else if move_positive && rect.right <= viewport_width {
            self.vel.x = PLAYER_SPEED;
            self.rotation = PLAYER_TILT;
        } else {
            self.vel.x = 0.0;
            self.rotation = 0.0;
        }
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub sprite: AssetState,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, -PROJECTILE_SPEED),
            radius: PROJECTILE_RADIUS,
            sprite: AssetState::Loading,
        }
    }

    pub fn update(&mut self) {
        if self.sprite.is_ready() {
            self.pos += self.vel;
        }
    }

    /// Collision square derived from the radius
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Drawn rectangle (sprite-sized, centered)
    pub fn rect(&self) -> Option<Rect> {
        self.sprite
            .footprint()
            .map(|size| Rect::centered(self.pos, size))
    }

    /// Entirely above the viewport, or its sprite will never load
    pub fn is_expired(&self) -> bool {
        self.sprite == AssetState::Failed || self.pos.y + self.radius <= 0.0
    }
}

/// An enemy shot travelling straight down
#[derive(Debug, Clone)]
pub struct InvaderProjectile {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub sprite: AssetState,
}

impl InvaderProjectile {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, INVADER_PROJECTILE_SPEED),
            radius: INVADER_PROJECTILE_RADIUS,
            sprite: AssetState::Loading,
        }
    }

    pub fn update(&mut self) {
        if self.sprite.is_ready() {
            self.pos += self.vel;
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        self.sprite
            .footprint()
            .map(|size| Rect::centered(self.pos, size))
    }

    /// Bottom edge has reached the viewport bottom, or its sprite will never
    /// load
    pub fn is_expired(&self, viewport_height: f32) -> bool {
        self.sprite == AssetState::Failed
            || self
                .rect()
                .is_some_and(|rect| rect.bottom >= viewport_height)
    }
}

/// Burst color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    /// Invader destroyed
    Yellow,
    /// Player struck
    White,
}

impl ParticleColor {
    /// CSS color name
    pub fn as_css(&self) -> &'static str {
        match self {
            ParticleColor::Yellow => "yellow",
            ParticleColor::White => "white",
        }
    }
}

/// A fading spark
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: ParticleColor,
    /// 1.0 when spawned, fades to 0
    pub opacity: f32,
}

impl Particle {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, color: ParticleColor) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            color,
            opacity: 1.0,
        }
    }

    /// `PARTICLE_BURST` sparks around `center` with random drift and size
    pub fn burst(
        center: Vec2,
        color: ParticleColor,
        rng: &mut impl Rng,
        ids: &mut IdAllocator,
    ) -> Vec<Particle> {
        (0..PARTICLE_BURST)
            .map(|_| {
                let vel = Vec2::new(
                    (rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
                    (rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
                );
                let radius = rng.random::<f32>() * PARTICLE_MAX_RADIUS;
                Particle::new(ids.next_id(), center, vel, radius, color)
            })
            .collect()
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.opacity -= PARTICLE_FADE;
        if self.opacity < OPACITY_EPSILON {
            self.opacity = 0.0;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// A formation member. Moves only by the displacement its grid hands it.
#[derive(Debug, Clone)]
pub struct Invader {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub sprite: AssetState,
}

impl Invader {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            sprite: AssetState::Loading,
        }
    }

    pub fn update(&mut self, displacement: Vec2) {
        if self.sprite.is_ready() {
            self.pos += displacement;
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        self.sprite
            .footprint()
            .map(|size| Rect::from_origin(self.pos, size))
    }

    /// Sprite center, or the origin while loading
    pub fn center(&self) -> Vec2 {
        self.rect().map(|rect| rect.center()).unwrap_or(self.pos)
    }

    /// Right edge used for formation bounds (origin while loading)
    pub fn right(&self) -> f32 {
        self.pos.x + self.sprite.footprint().map_or(0.0, |size| size.width)
    }

    /// Fire a shot downward from the lower-center point
    pub fn shoot(&self, id: u32) -> Option<InvaderProjectile> {
        let size: Footprint = self.sprite.footprint()?;
        let muzzle = Vec2::new(self.pos.x + size.width / 2.0, self.pos.y + size.height);
        Some(InvaderProjectile::new(id, muzzle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asset::ImmediateAssets;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn ready_player() -> Player {
        let mut player = Player::new();
        player.poll_asset(&ImmediateAssets::default(), viewport());
        player
    }

    #[test]
    fn test_player_placed_when_ready() {
        let player = ready_player();
        // 50x40 sprite at 1.2 scale => 60x48
        assert!((player.pos.x - 370.0).abs() < 1e-3);
        assert!((player.pos.y - 532.0).abs() < 1e-3);
    }

    #[test]
    fn test_loading_player_does_not_move() {
        let mut player = Player::new();
        player.vel = Vec2::new(5.0, 0.0);
        player.update();
        assert_eq!(player.pos, Vec2::ZERO);
        assert!(player.muzzle().is_none());
    }

    #[test]
    fn test_steer_left_and_right() {
        let mut player = ready_player();
        player.steer(true, false, 800.0);
        assert_eq!(player.vel.x, -PLAYER_SPEED);
        assert_eq!(player.rotation, -PLAYER_TILT);

        player.steer(false, true, 800.0);
        assert_eq!(player.vel.x, PLAYER_SPEED);
        assert_eq!(player.rotation, PLAYER_TILT);

        player.steer(false, false, 800.0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.rotation, 0.0);
    }

    #[test]
    fn test_steer_soft_clamp_at_edges() {
        let mut player = ready_player();
        player.pos.x = -2.0;
        player.steer(true, false, 800.0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.rotation, 0.0);
        // Position is left alone
        assert_eq!(player.pos.x, -2.0);

        player.pos.x = 800.0 - 60.0 + 1.0;
        player.steer(false, true, 800.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_negative_wins_when_both_held() {
        let mut player = ready_player();
        player.steer(true, true, 800.0);
        assert_eq!(player.vel.x, -PLAYER_SPEED);
    }

    #[test]
    fn test_projectile_expiry() {
        let mut projectile = Projectile::new(1, Vec2::new(10.0, 11.0));
        projectile.sprite = AssetState::Ready(Footprint::new(8.0, 20.0));
        assert!(!projectile.is_expired());
        projectile.update(); // y = 6
        assert!(!projectile.is_expired());
        projectile.update(); // y = 1
        assert!(!projectile.is_expired());
        projectile.update(); // y = -4, -4 + 10 > 0
        assert!(!projectile.is_expired());
        projectile.update(); // y = -9
        assert!(!projectile.is_expired());
        projectile.update(); // y = -14
        assert!(projectile.is_expired());
    }

    #[test]
    fn test_invader_projectile_expiry() {
        let mut shot = InvaderProjectile::new(1, Vec2::new(10.0, 590.0));
        assert!(!shot.is_expired(600.0)); // loading
        shot.sprite = AssetState::Ready(Footprint::new(6.0, 12.0));
        assert!(!shot.is_expired(600.0)); // bottom at 596
        shot.update();
        assert!(shot.is_expired(600.0));
    }

    #[test]
    fn test_failed_shots_expire_in_place() {
        let mut projectile = Projectile::new(1, Vec2::new(100.0, 300.0));
        let mut shot = InvaderProjectile::new(2, Vec2::new(100.0, 300.0));
        projectile.sprite = AssetState::Failed;
        shot.sprite = AssetState::Failed;

        projectile.update();
        shot.update();
        assert_eq!(projectile.pos, Vec2::new(100.0, 300.0));
        assert!(projectile.is_expired());
        assert!(shot.is_expired(600.0));
    }

    #[test]
    fn test_particle_fades_in_exactly_100_updates() {
        let mut particle = Particle::new(1, Vec2::ZERO, Vec2::ZERO, 1.0, ParticleColor::Yellow);
        for _ in 0..99 {
            particle.update();
            assert!(!particle.is_expired());
        }
        particle.update();
        assert!(particle.is_expired());
    }

    #[test]
    fn test_burst_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ids = IdAllocator::default();
        let burst = Particle::burst(Vec2::new(5.0, 5.0), ParticleColor::White, &mut rng, &mut ids);
        assert_eq!(burst.len(), PARTICLE_BURST);
        for particle in &burst {
            assert_eq!(particle.pos, Vec2::new(5.0, 5.0));
            assert_eq!(particle.opacity, 1.0);
            assert_eq!(particle.color.as_css(), "white");
            assert!(particle.radius >= 0.0 && particle.radius < PARTICLE_MAX_RADIUS);
            assert!(particle.vel.x.abs() <= PARTICLE_MAX_SPEED);
            assert!(particle.vel.y.abs() <= PARTICLE_MAX_SPEED);
        }
    }

    #[test]
    fn test_invader_shoots_from_lower_center() {
        let mut invader = Invader::new(1, Vec2::new(40.0, 80.0));
        assert!(invader.shoot(2).is_none());
        invader.sprite = AssetState::Ready(Footprint::new(32.0, 24.0));
        let shot = invader.shoot(2).unwrap();
        assert_eq!(shot.pos, Vec2::new(56.0, 104.0));
        assert_eq!(shot.vel, Vec2::new(0.0, INVADER_PROJECTILE_SPEED));
    }

    #[test]
    fn test_loading_invader_ignores_displacement() {
        let mut invader = Invader::new(1, Vec2::new(40.0, 80.0));
        invader.update(Vec2::new(3.0, 0.0));
        assert_eq!(invader.pos, Vec2::new(40.0, 80.0));
        assert_eq!(invader.right(), 40.0);
    }
}
