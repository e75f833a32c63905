//! Sprite readiness
//!
//! Images load asynchronously on the host. The simulation never sees the
//! load callbacks: every tick it asks an [`AssetProvider`] where each sprite
//! stands and flips `Loading` entities to `Ready` or `Failed`.

/// Every image the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Player,
    Projectile,
    InvaderProjectile,
    Invader,
}

impl Sprite {
    pub const ALL: [Sprite; 5] = [
        Sprite::Background,
        Sprite::Player,
        Sprite::Projectile,
        Sprite::InvaderProjectile,
        Sprite::Invader,
    ];

    /// Path relative to the page root
    pub fn path(&self) -> &'static str {
        match self {
            Sprite::Background => "./img/bg.png",
            Sprite::Player => "./img/playerc.png",
            Sprite::Projectile => "./img/tir.png",
            Sprite::InvaderProjectile => "./img/tireen.png",
            Sprite::Invader => "./img/enemyb.png",
        }
    }
}

/// Drawable size of a loaded sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, scale: f32) -> Self {
        Self {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Load state of an entity's sprite
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AssetState {
    #[default]
    Loading,
    Ready(Footprint),
    /// Load failed for good; the entity stays inert
    Failed,
}

impl AssetState {
    pub fn footprint(&self) -> Option<Footprint> {
        match self {
            AssetState::Ready(footprint) => Some(*footprint),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready(_))
    }

    /// Advance a `Loading` state from the provider's report.
    ///
    /// Returns true when this call moved the state to `Failed`, so the caller
    /// can log the failure once.
    pub fn poll(&mut self, sprite: Sprite, scale: f32, assets: &impl AssetProvider) -> bool {
        if *self != AssetState::Loading {
            return false;
        }
        match assets.status(sprite) {
            AssetState::Loading => false,
            AssetState::Ready(footprint) => {
                *self = AssetState::Ready(footprint.scaled(scale));
                false
            }
            AssetState::Failed => {
                *self = AssetState::Failed;
                true
            }
        }
    }
}

/// Host-side image loader, queried once per entity per tick while loading
pub trait AssetProvider {
    /// Unscaled state of `sprite`
    fn status(&self, sprite: Sprite) -> AssetState;
}

/// Provider with every sprite already decoded at fixed sizes.
///
/// Used by the headless host and by tests.
#[derive(Debug, Clone)]
pub struct ImmediateAssets {
    pub player: Footprint,
    pub projectile: Footprint,
    pub invader_projectile: Footprint,
    pub invader: Footprint,
}

impl Default for ImmediateAssets {
    fn default() -> Self {
        Self {
            player: Footprint::new(50.0, 40.0),
            projectile: Footprint::new(8.0, 20.0),
            invader_projectile: Footprint::new(6.0, 12.0),
            invader: Footprint::new(32.0, 32.0),
        }
    }
}

impl AssetProvider for ImmediateAssets {
    fn status(&self, sprite: Sprite) -> AssetState {
        AssetState::Ready(match sprite {
            Sprite::Background => Footprint::new(1.0, 1.0),
            Sprite::Player => self.player,
            Sprite::Projectile => self.projectile,
            Sprite::InvaderProjectile => self.invader_projectile,
            Sprite::Invader => self.invader,
        })
    }
}
