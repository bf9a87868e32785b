//! Rift Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use rift_runner::audio::{MusicPlayer, PercussionKind};
    use rift_runner::consts::*;
    use rift_runner::renderer::CanvasRenderer;
    use rift_runner::sim::{GameEvent, GamePhase, GameState, InputEvent, tick};
    use rift_runner::{Settings, TopScore};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        music: MusicPlayer,
        settings: Settings,
        top_score: TopScore,
        /// Previous phase, to catch transitions that start/stop the music
        last_phase: GamePhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let music = MusicPlayer::new(settings.effective_music_volume());
            music.set_muted(settings.muted);
            Self {
                state: GameState::new(seed),
                renderer,
                music,
                settings,
                top_score: TopScore::load(),
                last_phase: GamePhase::Splash,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// One animation frame: simulate, react to what happened, draw.
        fn frame(&mut self, time: f64) {
            tick(&mut self.state);
            self.watch_phase();
            self.play_event_sfx();

            if self.top_score.submit(self.state.score) {
                log::info!("New top score: {}", self.state.score);
            }

            self.track_fps(time);
            self.renderer.draw(
                &self.state,
                &self.settings,
                self.top_score.best(),
                self.fps,
                time,
            );
        }

        /// The sequencer is started/stopped only by phase transitions.
        fn watch_phase(&mut self) {
            let phase = self.state.phase;
            if phase == self.last_phase {
                return;
            }
            match phase {
                GamePhase::Playing => {
                    self.music.set_volume(self.settings.effective_music_volume());
                    self.music.start();
                    log::info!("Run started (seed {})", self.state.seed);
                }
                GamePhase::GameOver | GamePhase::Splash => {
                    self.music.stop();
                }
            }
            self.last_phase = phase;
        }

        /// Map tick events to percussive hits on the shared audio output.
        fn play_event_sfx(&self) {
            if self.settings.effective_sfx_volume() <= 0.0 {
                return;
            }
            for event in &self.state.events {
                match event {
                    GameEvent::AdversaryStomped => self.music.percussion(PercussionKind::Kick),
                    GameEvent::AdversarySlashed => self.music.percussion(PercussionKind::Snare),
                    GameEvent::PlayerHurt => self.music.percussion(PercussionKind::Hat),
                    GameEvent::PlayerHealed => {}
                    GameEvent::PlayerDied => self.music.percussion(PercussionKind::Kick),
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Rift Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(VIEW_W as u32);
        canvas.set_height(VIEW_H as u32);

        let renderer = CanvasRenderer::new(&canvas).expect("Failed to get 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer)));
        log::info!("Game initialized with seed: {seed}");

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Rift Runner running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown: movement intent, jump/confirm, slash, toggles
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" => g.state.handle_input(InputEvent::MoveRightStart),
                    "ArrowLeft" => g.state.handle_input(InputEvent::MoveLeftStart),
                    " " => {
                        // Space confirms outside gameplay, jumps inside
                        let intent = if g.state.phase == GamePhase::Playing {
                            InputEvent::Jump
                        } else {
                            InputEvent::Confirm
                        };
                        g.state.handle_input(intent);
                        event.prevent_default();
                    }
                    "x" | "X" => g.state.handle_input(InputEvent::Attack),
                    "m" | "M" => {
                        g.settings.muted = !g.settings.muted;
                        g.settings.save();
                        g.music.set_muted(g.settings.muted);
                        log::info!("Muted: {}", g.settings.muted);
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

        // Keyup: end of movement intent
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" => g.state.handle_input(InputEvent::MoveRightStop),
                    "ArrowLeft" => g.state.handle_input(InputEvent::MoveLeftStop),
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
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
    use rift_runner::sim::{GamePhase, GameState, InputEvent, tick};

    env_logger::init();
    log::info!("Rift Runner (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: hold right, hop periodically, simulate a minute
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed);
    state.handle_input(InputEvent::Confirm);
    state.handle_input(InputEvent::MoveRightStart);

    let mut ticks = 0u32;
    for t in 0..3600u32 {
        if t % 240 == 0 {
            state.handle_input(InputEvent::Jump);
        }
        tick(&mut state);
        ticks = t + 1;
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "seed {seed}: {ticks} ticks, distance {:.0}px, score {}, health {}, {} blocks live",
        state.player.body.rect.x - 50.0,
        state.score,
        state.player.health,
        state.blocks.len()
    );
    assert!(state.generator.last_generated_x() >= state.player.body.rect.x);
    println!("✓ Headless smoke run passed");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
