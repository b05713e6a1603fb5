//! Bengaluru Chronicles entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build paints to a canvas; the native build plays the three levels
//! headless with the autopilot and logs how far it got.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use bengaluru_chronicles::audio::{AudioManager, SoundEffect};
    use bengaluru_chronicles::platform::{FixedTimestep, InputLatch, KeyCommand, map_key};
    use bengaluru_chronicles::renderer::{CanvasRenderer, build_scene};
    use bengaluru_chronicles::{Game, Settings};

    /// Browser app holding all state
    struct App {
        game: Game,
        settings: Settings,
        clock: FixedTimestep,
        input: InputLatch,
        renderer: CanvasRenderer,
        audio: AudioManager,
        last_time: f64,
    }

    impl App {
        /// Run the simulation steps this frame owes
        fn update(&mut self, dt: f32) {
            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                let input = self.input.next_input();
                self.game.update(&input, self.clock.step());
            }

            for event in self.game.drain_events() {
                log::debug!("{:?}", event);
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        fn render(&self) {
            let scene = build_scene(&self.game, &self.settings);
            if let Err(e) = self.renderer.render(&scene) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn set_focused(&mut self, focused: bool) {
            if focused {
                self.audio.set_volume(self.settings.effective_volume());
            } else {
                self.input.clear();
                if self.settings.mute_on_blur {
                    self.audio.set_volume(0.0);
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Bengaluru Chronicles starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(canvas)?;
        renderer.resize(window.device_pixel_ratio());

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::default();
        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed),
            settings,
            clock: FixedTimestep::default(),
            input: InputLatch::new(),
            renderer,
            audio,
            last_time: 0.0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(&window, app.clone());
        setup_focus_handling(&window, app.clone());
        setup_resize(&window, app.clone());

        request_animation_frame(app);
        log::info!("Bengaluru Chronicles running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let Some(command) = map_key(event.key().as_str()) else {
                return;
            };
            // Arrow keys would scroll the page
            if matches!(command, KeyCommand::Move(_)) {
                event.prevent_default();
            }
            let mut app = app.borrow_mut();
            // First key press is the user gesture browsers want before audio
            app.audio.resume();
            app.input.press(command);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_handling(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Window blur (click outside)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().set_focused(false);
                log::info!("Window lost focus");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().set_focused(true);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tab switch: drop the backlog instead of fast-forwarding on return
        if let Some(document) = window.document() {
            let document_clone = document.clone();
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                    let mut app = app.borrow_mut();
                    app.clock.reset();
                    app.last_time = 0.0;
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                app.borrow().renderer.resize(window.device_pixel_ratio());
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();

            let dt = if app.last_time > 0.0 {
                ((time - app.last_time) / 1000.0) as f32
            } else {
                app.clock.step()
            };
            app.last_time = time;

            app.update(dt);
            app.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bengaluru_chronicles::consts::SIM_DT;
    use bengaluru_chronicles::sim::{GameOverCause, LevelId, LevelPhase, TickInput};
    use bengaluru_chronicles::{Game, GameEvent, Tuning};

    /// Simulated time allowed per run before giving up (ten minutes)
    const MAX_TICKS_PER_RUN: u64 = 60 * 60 * 10;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Summary {
        pub seed: u64,
        pub runs: u32,
        pub victory: bool,
        /// Highest level reached in any run
        pub furthest: LevelId,
        pub failures: Vec<(LevelId, GameOverCause)>,
        pub ticks: u64,
    }

    /// Play up to `max_runs` runs with the autopilot, stopping at the first victory
    pub fn run(seed: u64, tuning: Tuning, max_runs: u32) -> Summary {
        let mut game = Game::with_tuning(seed, tuning);
        let mut summary = Summary {
            seed,
            runs: 1,
            victory: false,
            furthest: LevelId::TrafficDodge,
            failures: Vec::new(),
            ticks: 0,
        };
        let mut run_ticks = 0;

        loop {
            let waiting = game
                .current_level()
                .is_some_and(|level| level.phase == LevelPhase::Welcome);
            let input = TickInput {
                start: waiting && !game.is_game_over(),
                restart: game.is_game_over(),
                idle_mode: true,
                ..Default::default()
            };
            game.update(&input, SIM_DT);
            summary.ticks += 1;
            run_ticks += 1;

            for event in game.drain_events() {
                match event {
                    GameEvent::LevelStarted(id) => {
                        if id.number() > summary.furthest.number() {
                            summary.furthest = id;
                        }
                    }
                    GameEvent::LevelFailed(id, cause) => {
                        log::info!("Run {} failed on {}: {:?}", summary.runs, id.name(), cause);
                        summary.failures.push((id, cause));
                    }
                    GameEvent::Victory => summary.victory = true,
                    GameEvent::NewGame => {
                        summary.runs += 1;
                        run_ticks = 0;
                    }
                    GameEvent::LevelCompleted(_) | GameEvent::BonusCollected(_) => {}
                }
            }

            if summary.victory {
                break;
            }
            if game.is_game_over() && summary.runs >= max_runs {
                break;
            }
            if run_ticks >= MAX_TICKS_PER_RUN {
                log::warn!("Run {} timed out", summary.runs);
                if summary.runs >= max_runs {
                    break;
                }
                game.new_game();
            }
        }
        summary
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        /// Level 1 without traffic always clears; the train always leaves
        /// Level 2 before the first obstacle can spawn
        fn doomed_at_the_metro() -> Tuning {
            let mut tuning = Tuning::default();
            tuning.traffic.spawn_interval_ms = 1.0e9;
            tuning.metro.departure_chance = 1.0;
            tuning.metro.min_departure_ms = 100.0;
            tuning.metro.max_departure_ms = 200.0;
            tuning
        }

        #[test]
        fn test_headless_is_deterministic() {
            let a = run(7, Tuning::default(), 2);
            let b = run(7, Tuning::default(), 2);
            assert_eq!(a, b);
            assert!(a.runs <= 2);
        }

        #[test]
        fn test_headless_records_each_failed_run() {
            let summary = run(11, doomed_at_the_metro(), 2);
            assert!(!summary.victory);
            assert_eq!(summary.runs, 2);
            assert_eq!(summary.furthest, LevelId::MetroRush);
            assert_eq!(
                summary.failures,
                vec![
                    (LevelId::MetroRush, GameOverCause::TrainDeparted),
                    (LevelId::MetroRush, GameOverCause::TrainDeparted),
                ]
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(name = "bengaluru-chronicles")]
    #[command(about = "Play Bengaluru Chronicles headless with the autopilot")]
    pub struct Cli {
        /// Run seed; the same seed replays the same run
        #[arg(long, default_value_t = 2025)]
        pub seed: u64,
        /// JSON file overriding the default tuning
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// Give up after this many runs without a victory
        #[arg(long, default_value_t = 5)]
        pub max_runs: u32,
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["bengaluru-chronicles"]).unwrap();
            assert_eq!(cli.seed, 2025);
            assert_eq!(cli.tuning, None);
            assert_eq!(cli.max_runs, 5);
        }

        #[test]
        fn test_flags() {
            let cli = Cli::try_parse_from([
                "bengaluru-chronicles",
                "--seed",
                "42",
                "--tuning",
                "hard.json",
                "--max-runs",
                "1",
            ])
            .unwrap();
            assert_eq!(cli.seed, 42);
            assert_eq!(cli.tuning, Some(PathBuf::from("hard.json")));
            assert_eq!(cli.max_runs, 1);
        }

        #[test]
        fn test_bad_seed_is_rejected() {
            assert!(Cli::try_parse_from(["bengaluru-chronicles", "--seed", "abc"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bengaluru_chronicles::Tuning;
    use clap::Parser;

    let cli = cli::Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bengaluru Chronicles (native, headless) starting...");

    let tuning = match &cli.tuning {
        Some(path) => match Tuning::from_file(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let summary = headless::run(cli.seed, tuning, cli.max_runs.max(1));
    log::info!(
        "Seed {}: {} after {} run(s), furthest level {} ({}), {} ticks simulated",
        summary.seed,
        if summary.victory { "victory" } else { "no victory" },
        summary.runs,
        summary.furthest.number(),
        summary.furthest.name(),
        summary.ticks
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
