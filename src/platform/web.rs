//! Browser bindings: Canvas 2D drawing and `<img>` sprite loading

use std::collections::HashMap;
use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::renderer::RenderSurface;
use crate::sim::{AssetProvider, AssetState, Footprint, ParticleColor, Sprite};

/// One `<img>` per sprite, fetched at startup and polled every tick
pub struct WebAssets {
    images: HashMap<Sprite, HtmlImageElement>,
}

impl WebAssets {
    /// Kick off every sprite fetch. Failures to create an element leave that
    /// sprite permanently `Failed`.
    pub fn load_all() -> Self {
        let mut images = HashMap::new();
        for sprite in Sprite::ALL {
            match HtmlImageElement::new() {
                Ok(image) => {
                    image.set_src(sprite.path());
                    images.insert(sprite, image);
                }
                Err(e) => log::error!("Could not create image for {:?}: {:?}", sprite, e),
            }
        }
        Self { images }
    }

    fn image(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
        self.images
            .get(&sprite)
            .filter(|image| image.complete() && image.natural_width() > 0)
    }
}

impl AssetProvider for WebAssets {
    fn status(&self, sprite: Sprite) -> AssetState {
        let Some(image) = self.images.get(&sprite) else {
            return AssetState::Failed;
        };
        if !image.complete() {
            return AssetState::Loading;
        }
        // A completed image with no size is a broken one
        if image.natural_width() == 0 {
            return AssetState::Failed;
        }
        AssetState::Ready(Footprint::new(
            image.natural_width() as f32,
            image.natural_height() as f32,
        ))
    }
}

/// Render surface over a `CanvasRenderingContext2d`
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    assets: &'a WebAssets,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, assets: &'a WebAssets) -> Self {
        Self { ctx, assets }
    }
}

impl RenderSurface for CanvasSurface<'_> {
    fn draw_image(&mut self, sprite: Sprite, x: f32, y: f32, width: f32, height: f32) {
        let Some(image) = self.assets.image(sprite) else {
            return;
        };
        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            x as f64,
            y as f64,
            width as f64,
            height as f64,
        ) {
            log::warn!("drawImage failed for {:?}: {:?}", sprite, e);
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: ParticleColor) {
        self.ctx.begin_path();
        match self.ctx.arc(x as f64, y as f64, radius as f64, 0.0, TAU) {
            Ok(()) => {
                self.ctx.set_fill_style_str(color.as_css());
                self.ctx.fill();
            }
            Err(e) => log::warn!("arc failed: {:?}", e),
        }
        self.ctx.close_path();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        if let Err(e) = self.ctx.translate(x as f64, y as f64) {
            log::warn!("translate failed: {:?}", e);
        }
    }

    fn rotate(&mut self, angle: f32) {
        if let Err(e) = self.ctx.rotate(angle as f64) {
            log::warn!("rotate failed: {:?}", e);
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }
}
