//! Star Invaders entry point
//!
//! Web: Canvas 2D host driven by requestAnimationFrame, one tick per refresh.
//! Native: headless autopilot session that logs progress and prints a JSON
//! snapshot of the final world.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use star_invaders::Settings;
    use star_invaders::platform::KeyboardState;
    use star_invaders::platform::web::{CanvasSurface, WebAssets};
    use star_invaders::renderer::draw_world;
    use star_invaders::sim::{Viewport, World, tick};

    /// Game instance holding all state
    struct Game {
        world: World,
        keyboard: KeyboardState,
        assets: WebAssets,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// One tick and one draw
        fn frame(&mut self, time: f64) {
            let input = self.keyboard.take_input();
            let applied = tick(&mut self.world, &input, &self.assets);
            if applied.grids_cleared > 0 {
                log::info!(
                    "Formation destroyed at frame {} ({} grids left)",
                    self.world.frames,
                    self.world.grids.len()
                );
            }

            let mut surface = CanvasSurface::new(&self.ctx, &self.assets);
            draw_world(&self.world, &mut surface, &self.settings);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            if !self.settings.show_fps {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")
            .ok()
            .flatten()
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fill the window; the viewport is fixed from here on
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let viewport = Viewport::new(width as f32, height as f32);

        let game = Rc::new(RefCell::new(Game {
            world: World::new(viewport, seed),
            keyboard: KeyboardState::new(settings.keys.clone()),
            assets: WebAssets::load_all(),
            ctx,
            settings,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        log::info!(
            "Game initialized with seed {} ({}x{})",
            seed,
            viewport.width,
            viewport.height
        );

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Star Invaders running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let handled = game
                    .borrow_mut()
                    .keyboard
                    .key_down(&event.key(), event.repeat());
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events are lost, so release everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keyboard.clear();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use star_invaders::Settings;

    env_logger::init();
    log::info!("Star Invaders (native) starting...");
    log::info!("Native mode runs a headless session - serve the wasm build for the playable game");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load_from(Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    if let Ok(json) = settings.to_json() {
        log::debug!("Effective settings:\n{}", json);
    }

    headless::run(&settings);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use star_invaders::Settings;
    use star_invaders::platform::KeyboardState;
    use star_invaders::sim::{ImmediateAssets, Viewport, World, tick};

    /// Ticks between autopilot trigger pulls
    const FIRE_EVERY: u64 = 12;
    /// Ticks between progress lines
    const REPORT_EVERY: u64 = 600;

    /// Play a session with every sprite pre-loaded and a simple autopilot
    /// tracking the lowest formation.
    pub fn run(settings: &Settings) {
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let mut world = World::new(Viewport::new(1280.0, 720.0), seed);
        let assets = ImmediateAssets::default();
        let mut keyboard = KeyboardState::new(settings.keys.clone());

        log::info!("Headless session: seed {}, {} ticks", seed, settings.headless_ticks);

        let mut destroyed = 0;
        let mut cleared = 0;
        for _ in 0..settings.headless_ticks {
            steer(&world, &mut keyboard, settings);

            let applied = tick(&mut world, &keyboard.take_input(), &assets);
            destroyed += applied.invaders_destroyed;
            cleared += applied.grids_cleared;

            if world.frames % REPORT_EVERY == 0 {
                log::info!(
                    "frame {}: {} grids, {} invaders, {} destroyed",
                    world.frames,
                    world.grids.len(),
                    world.invader_count(),
                    destroyed
                );
            }
        }

        log::info!(
            "Session over: {} invaders destroyed, {} formations cleared",
            destroyed,
            cleared
        );
        match serde_json::to_string_pretty(&world.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize snapshot: {}", e),
        }
    }

    /// Press keys the way a player would: chase the lowest invader's column
    /// and tap fire at a steady rhythm.
    fn steer(world: &World, keyboard: &mut KeyboardState, settings: &Settings) {
        let (Some(left), Some(right), Some(fire)) = (
            settings.keys.move_negative.first(),
            settings.keys.move_positive.first(),
            settings.keys.fire.first(),
        ) else {
            return;
        };

        let target = world
            .grids
            .iter()
            .flat_map(|grid| grid.invaders.iter())
            .filter_map(|invader| invader.rect())
            .max_by(|a, b| a.bottom.total_cmp(&b.bottom))
            .map(|rect| rect.center().x);
        let ship = world.player.rect().map(|rect| rect.center().x);

        keyboard.key_up(left);
        keyboard.key_up(right);
        if let (Some(target), Some(ship)) = (target, ship) {
            if target < ship - 5.0 {
                keyboard.key_down(left, false);
            } else if target > ship + 5.0 {
                keyboard.key_down(right, false);
            }
        }

        if world.frames % FIRE_EVERY == 0 {
            keyboard.key_down(fire, false);
            keyboard.key_up(fire);
        }
    }
}
