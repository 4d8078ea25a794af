//! Star Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::PI;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use star_pop::audio::{AudioManager, cue_for};
    use star_pop::consts::*;
    use star_pop::hud::{self, PopupKind};
    use star_pop::sim::SessionPhase;
    use star_pop::{GameRunner, Settings};

    /// Star drawn at display scale 1.0
    const STAR_OUTER_RADIUS: f64 = 64.0;
    const STAR_INNER_RADIUS: f64 = 28.0;

    struct Game {
        runner: GameRunner,
        audio: AudioManager,
        settings: Settings,
        ctx: CanvasRenderingContext2d,
        /// Canvas pixels per logical unit
        pixel_scale: f64,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Run simulation ticks and route their events to audio
        fn update(&mut self, dt: f32, time: f64) {
            for event in self.runner.update(dt) {
                if let Some(cue) = cue_for(&event) {
                    self.audio.handle(cue);
                }
            }

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

        /// Convert canvas CSS pixels to logical screen units
        fn to_logical(&self, canvas: &HtmlCanvasElement, x: f32, y: f32) -> glam::Vec2 {
            let w = canvas.client_width().max(1) as f32;
            let h = canvas.client_height().max(1) as f32;
            glam::Vec2::new(x * SCREEN_WIDTH / w, y * SCREEN_HEIGHT / h)
        }

        fn tap(&mut self, point: glam::Vec2) {
            // Every tap is a user gesture, so the browser lets audio resume here
            self.audio.resume();
            self.runner.tap(point);
        }

        fn render(&self) {
            let ctx = &self.ctx;
            let _ = ctx.set_transform(self.pixel_scale, 0.0, 0.0, self.pixel_scale, 0.0, 0.0);
            ctx.clear_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);

            self.draw_background();
            if let Some(star) = self.runner.state.stars.current() {
                let angle = if self.settings.reduced_motion { 0.0 } else { star.spin_angle() };
                let scale = if self.settings.reduced_motion { 0.8 } else { star.display_scale() };
                draw_star(ctx, star.pos.x as f64, star.pos.y as f64, angle as f64, scale as f64);
            }
            self.draw_hud();
        }

        fn draw_background(&self) {
            let ctx = &self.ctx;
            let bg = &self.runner.state.background;
            let h = SCREEN_HEIGHT as f64;
            for strip in &bg.strips {
                let x = strip.x as f64;
                let w = bg.width as f64;
                ctx.set_fill_style_str("#6ec6ff");
                ctx.fill_rect(x, 0.0, w + 1.0, h);
                // Rolling hills give the scroll something to show
                ctx.set_fill_style_str("#4caf50");
                for i in 0..4 {
                    ctx.begin_path();
                    let cx = x + w * (0.125 + 0.25 * i as f64);
                    let _ = ctx.arc(cx, h + 60.0, w * 0.18, PI, 2.0 * PI);
                    ctx.fill();
                }
                ctx.set_fill_style_str("rgba(255,255,255,0.85)");
                for (fx, fy, r) in [(0.2, 70.0, 26.0), (0.55, 110.0, 20.0), (0.85, 60.0, 30.0)] {
                    ctx.begin_path();
                    let _ = ctx.arc(x + w * fx, fy, r, 0.0, 2.0 * PI);
                    let _ = ctx.arc(x + w * fx + r, fy + 6.0, r * 0.8, 0.0, 2.0 * PI);
                    ctx.fill();
                }
            }
        }

        fn draw_hud(&self) {
            let ctx = &self.ctx;
            let hud = &self.runner.hud;
            let reduced = self.settings.reduced_motion;

            ctx.set_text_align("left");
            ctx.set_text_baseline("top");
            draw_text(ctx, &hud.score_text, hud::SCORE_POS.x as f64, hud::SCORE_POS.y as f64, 32.0, "#fff", 3.0);

            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");

            if hud.start_prompt {
                let p = hud::START_PROMPT_POS;
                draw_text(ctx, hud::START_PROMPT_TEXT, p.x as f64, p.y as f64, 30.0, "#ff0", 4.0);
            }

            for popup in &hud.popups {
                let pos = popup.pos(reduced);
                let (size, color, stroke) = match popup.kind {
                    PopupKind::Points => (32.0, "#ff0", 4.0),
                    PopupKind::Praise => (48.0, "#00ffcc", 6.0),
                };
                ctx.save();
                ctx.set_global_alpha(popup.alpha() as f64);
                let _ = ctx.translate(pos.x as f64, pos.y as f64);
                let s = popup.scale().max(0.001) as f64;
                let _ = ctx.scale(s, s);
                draw_text(ctx, &popup.text, 0.0, 0.0, size, color, stroke);
                ctx.restore();
            }

            if hud.banner.is_some() {
                ctx.save();
                ctx.set_global_alpha(hud.banner_alpha() as f64);
                let _ = ctx.translate(hud::BANNER_POS.x as f64, hud::BANNER_POS.y as f64);
                let s = hud.banner_scale().max(0.001) as f64;
                let _ = ctx.scale(s, s);
                draw_text(ctx, hud::BANNER_TEXT, 0.0, 0.0, 48.0, "#ffff00", 8.0);
                ctx.restore();
            }

            if hud.replay_button.is_some() {
                let pos = hud.replay_pos();
                let (hw, hh) = REPLAY_BUTTON_HALF_SIZE;
                ctx.save();
                ctx.set_global_alpha(hud.replay_alpha() as f64);
                let _ = ctx.translate(pos.x as f64, pos.y as f64);
                let s = hud.replay_scale() as f64;
                let _ = ctx.scale(s, s);
                ctx.set_fill_style_str("rgba(0,0,0,0.4)");
                ctx.fill_rect(-hw as f64, -hh as f64, 2.0 * hw as f64, 2.0 * hh as f64);
                draw_text(ctx, hud::REPLAY_TEXT, 0.0, 0.0, 36.0, "#00ffcc", 4.0);
                ctx.restore();
            }

            if self.settings.show_fps {
                ctx.set_text_align("right");
                ctx.set_text_baseline("top");
                let fps = format!("{} fps", self.fps);
                draw_text(ctx, &fps, SCREEN_WIDTH as f64 - 16.0, 16.0, 16.0, "#fff", 2.0);
            }

            if self.runner.input.idle_mode && self.runner.state.phase() == SessionPhase::Active {
                ctx.set_text_align("center");
                ctx.set_text_baseline("bottom");
                draw_text(ctx, "DEMO", SCREEN_WIDTH as f64 / 2.0, SCREEN_HEIGHT as f64 - 12.0, 20.0, "#fff", 2.0);
            }
        }
    }

    fn draw_text(
        ctx: &CanvasRenderingContext2d,
        text: &str,
        x: f64,
        y: f64,
        size: f64,
        fill: &str,
        stroke: f64,
    ) {
        ctx.set_font(&format!("bold {}px sans-serif", size));
        ctx.set_line_width(stroke);
        ctx.set_stroke_style_str("#000");
        let _ = ctx.stroke_text(text, x, y);
        ctx.set_fill_style_str(fill);
        let _ = ctx.fill_text(text, x, y);
    }

    fn draw_star(ctx: &CanvasRenderingContext2d, x: f64, y: f64, angle: f64, scale: f64) {
        ctx.save();
        ctx.set_global_alpha(0.8);
        let _ = ctx.translate(x, y);
        let _ = ctx.rotate(angle);
        let _ = ctx.scale(scale, scale);
        ctx.begin_path();
        for i in 0..10 {
            let r = if i % 2 == 0 { STAR_OUTER_RADIUS } else { STAR_INNER_RADIUS };
            let a = -PI / 2.0 + i as f64 * PI / 5.0;
            let (px, py) = (r * a.cos(), r * a.sin());
            if i == 0 {
                ctx.move_to(px, py);
            } else {
                ctx.line_to(px, py);
            }
        }
        ctx.close_path();
        ctx.set_fill_style_str("#ffd700");
        ctx.fill();
        ctx.set_line_width(4.0);
        ctx.set_stroke_style_str("#ff9800");
        ctx.stroke();
        ctx.restore();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size the backing store to the CSS size times device pixel ratio
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (width as f64 * (SCREEN_HEIGHT / SCREEN_WIDTH) as f64) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);
        let audio_unlocked = !audio.is_locked();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            runner: GameRunner::new(seed, audio_unlocked, &settings),
            audio,
            settings,
            ctx,
            pixel_scale: width as f64 / SCREEN_WIDTH as f64,
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        log::info!("Game initialized with seed: {} (audio unlocked: {})", seed, audio_unlocked);

        setup_input_handlers(game.clone(), &canvas);
        request_animation_frame(game);

        log::info!("Star Pop running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        let window = web_sys::window().expect("no window");

        // Mouse click
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.to_logical(&canvas_clone, event.offset_x() as f32, event.offset_y() as f32);
                g.tap(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let point = g.to_logical(&canvas_clone, x, y);
                    g.tap(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "i" | "I" => {
                        let idle = !g.runner.input.idle_mode;
                        g.runner.set_idle(idle);
                        g.audio.resume();
                        log::info!("Idle mode: {}", idle);
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur/focus (mute while in background)
        for (name, muted) in [("blur", true), ("focus", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(muted);
                    log::info!("Audio {} ({})", if muted { "muted" } else { "unmuted" }, name);
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Pop (native) starting...");
    log::info!("Native mode runs a headless demo session - run with `trunk serve` to play");

    let mut args = std::env::args().skip(1);
    let rounds = match args.next().map(|a| a.parse::<u32>()) {
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            log::warn!("Rounds must be a positive number, using 1");
            1
        }
        None => 1,
    };
    let seed = match args.next().map(|a| a.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({}), using 0", e);
            0
        }
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default(),
    };

    let report = headless::run_demo(seed, rounds, &star_pop::Settings::load());
    println!(
        "Seed {}: {} round(s), {} stars popped, {} praise message(s), {:.1}s simulated",
        seed, report.rounds, report.pops, report.praise, report.seconds
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use star_pop::audio::cue_for;
    use star_pop::consts::SIM_DT;
    use star_pop::sim::GameEvent;
    use star_pop::{GameRunner, Settings};

    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    pub struct DemoReport {
        pub rounds: u32,
        pub pops: u32,
        pub praise: u32,
        pub seconds: f32,
    }

    /// Play idle-mode sessions until `rounds` celebrations have finished
    pub fn run_demo(seed: u64, rounds: u32, settings: &Settings) -> DemoReport {
        let mut runner = GameRunner::new(seed, false, settings);
        runner.set_idle(true);

        let mut report = DemoReport {
            rounds: 0,
            pops: 0,
            praise: 0,
            seconds: 0.0,
        };

        for _ in 0..MAX_FRAMES {
            let mut control_shown = false;
            for event in runner.update(1.0 / 60.0) {
                if let Some(cue) = cue_for(&event) {
                    log::debug!("audio: {:?}", cue);
                }
                match event {
                    GameEvent::StarPopped { .. } => report.pops += 1,
                    GameEvent::Milestone { message, .. } => {
                        report.praise += 1;
                        log::info!("{}", message);
                    }
                    GameEvent::CelebrationStarted { score } => {
                        log::info!("Celebrating with {} points", score)
                    }
                    GameEvent::ReplayControlShown => control_shown = true,
                    GameEvent::ReplayStarted => log::info!("Playing again"),
                    _ => {}
                }
            }

            report.rounds = runner.state.rounds_completed;
            // Stop once the final round's Play Again control is up
            if report.rounds >= rounds && control_shown {
                break;
            }
        }

        report.seconds = runner.state.time_ticks as f32 * SIM_DT;
        if report.rounds < rounds {
            log::warn!("Demo stopped after {} of {} rounds", report.rounds, rounds);
        }
        report
    }
}
