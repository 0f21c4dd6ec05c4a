//! Flapurr entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use flapurr::audio::{AudioManager, SoundEffect};
    use flapurr::leaderboard::{LocalScoreStore, ScoreEntry, ScoreStore, StoreUpdate};
    use flapurr::leaderboard::remote::RemoteScoreStore;
    use flapurr::persistence::Profile;
    use flapurr::platform;
    use flapurr::settings::Settings;
    use flapurr::sim::{FrameInput, GameEvent, GameState, Phase, Snapshot, World, tick};

    // JS binding for the canvas renderer. The simulation side of the
    // boundary only ever hands over a serialized snapshot.
    #[wasm_bindgen(inline_js = "
        let ctx = null;

        export function init_renderer() {
            const canvas = document.getElementById('canvas');
            if (canvas) {
                ctx = canvas.getContext('2d');
            }
            return ctx !== null;
        }

        export function render_snapshot(json) {
            if (!ctx) return;
            const snap = JSON.parse(json);
            const w = snap.world.width, h = snap.world.height;
            const floorY = h - snap.world.ground_h;

            ctx.fillStyle = '#8ed0f0';
            ctx.fillRect(0, 0, w, h);

            ctx.fillStyle = '#3faf4e';
            for (const gate of snap.gates) {
                ctx.fillRect(gate.x, 0, snap.world.gate_w, gate.top_h);
                ctx.fillRect(gate.x, gate.bottom_y, snap.world.gate_w, gate.bottom_h);
            }

            ctx.fillStyle = '#c9a36a';
            ctx.fillRect(0, floorY, w, snap.world.ground_h);

            ctx.save();
            ctx.translate(snap.actor.x, snap.actor.y);
            ctx.rotate(snap.actor.rot);
            ctx.fillStyle = '#f2b01e';
            ctx.beginPath();
            ctx.arc(0, 0, snap.actor.radius, 0, Math.PI * 2);
            ctx.fill();
            ctx.restore();
        }
    ")]
    extern "C" {
        fn init_renderer() -> bool;
        fn render_snapshot(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: FrameInput,
        settings: Settings,
        profile: Profile,
        audio: AudioManager,
        store: Box<dyn ScoreStore>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for panel show/hide
        last_phase: Phase,
    }

    impl Game {
        fn new(seed: u32) -> Result<Self, JsValue> {
            let world = World::default();
            let state = GameState::new(world, seed)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let settings = Settings::load();
            let profile = Profile::load();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());

            let store: Box<dyn ScoreStore> = match leaderboard_url() {
                Some(url) => {
                    log::info!("Using remote leaderboard at {url}");
                    Box::new(RemoteScoreStore::new(&url))
                }
                None => Box::new(LocalScoreStore::new()),
            };

            let mut game = Self {
                state,
                input: FrameInput::default(),
                settings,
                profile,
                audio,
                store,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: Phase::Ready,
            };
            game.state.best = game.profile.best;
            Ok(game)
        }

        /// Run exactly one simulation tick and react to what it emitted
        fn update(&mut self, time: f64) {
            let input = self.input;
            tick(&mut self.state, &input);
            self.input = FrameInput::default();

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::Started => self.store.increment_plays(),
                    GameEvent::SessionEnded {
                        score, new_best, ..
                    } => {
                        self.profile.record_session(score);
                        if new_best {
                            log::info!("New best: {score}");
                        }
                    }
                    _ => {}
                }
            }

            for update in self.store.poll() {
                match update {
                    StoreUpdate::Top(entries) => render_leaderboard(&entries),
                    StoreUpdate::Plays(n) => set_text("hud-plays", &n.to_string()),
                    StoreUpdate::Submitted => {
                        set_status("Score submitted!");
                        self.store.request_top();
                    }
                    StoreUpdate::Failed(err) => {
                        set_status("Leaderboard unavailable");
                        log::warn!("store error: {err}");
                    }
                }
            }

            self.track_fps(time);
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

        /// Serialize the frame snapshot across the render boundary
        fn render(&self) {
            let mut snap = Snapshot::capture(&self.state);
            if self.settings.reduced_motion {
                snap.actor.rot = 0.0;
            }
            match serde_json::to_string(&snap) {
                Ok(json) => render_snapshot(&json),
                Err(e) => log::error!("snapshot encode failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            set_text("hud-score", &self.state.score.to_string());
            set_text("hud-best", &self.state.best.to_string());
            if self.settings.show_fps {
                set_text("hud-fps", &self.fps.to_string());
            }

            let phase = self.state.phase;
            if phase != self.last_phase {
                set_panel_visible("ready-prompt", phase == Phase::Ready);
                set_panel_visible("game-over", phase == Phase::GameOver);
                match phase {
                    Phase::Ready => {
                        set_status(&format!("Ready. Best: {}", self.state.best));
                    }
                    Phase::Playing => set_status("Go!"),
                    Phase::GameOver => {
                        set_text("final-score", &self.state.score.to_string());
                        set_text("final-best", &self.state.best.to_string());
                        set_status(&format!("Game over. Score: {}", self.state.score));
                    }
                }
                self.last_phase = phase;
            }
        }

        /// A tap/click/Space press. During game over this both rearms the
        /// session and queues the first flap.
        fn press(&mut self) {
            if self.state.phase == Phase::GameOver {
                self.input.reset = true;
            }
            self.input.flap = true;
            self.audio.resume();
        }

        fn set_blur_mute(&mut self, blurred: bool) {
            if self.settings.mute_on_blur {
                self.audio.set_muted(blurred);
            }
        }
    }

    /// Remote endpoint from the `?board=` query parameter, if any
    fn leaderboard_url() -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        let query = search.strip_prefix('?')?;
        query
            .split('&')
            .find_map(|kv| kv.strip_prefix("board="))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_status(text: &str) {
        set_text("status-line", text);
    }

    fn set_panel_visible(id: &str, visible: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let class = if visible { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    fn render_leaderboard(entries: &[ScoreEntry]) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        list.set_text_content(None);
        for (i, entry) in entries.iter().enumerate() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&format!(
                    "{}. {} - {}",
                    i + 1,
                    entry.name,
                    entry.score
                )));
                let _ = list.append_child(&li);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|_| JsValue::from_str("failed to init logger"))?;

        log::info!("Flapurr starting...");

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
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;

        let world = World::default();
        canvas.set_width(world.width as u32);
        canvas.set_height(world.height as u32);

        if !init_renderer() {
            return Err(JsValue::from_str("could not get 2d context"));
        }

        let seed = platform::session_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)?));
        log::info!("Game initialized with seed: {seed}");

        game.borrow_mut().store.request_top();

        setup_input_handlers(&canvas, game.clone());
        setup_submit_button(game.clone());
        setup_fullscreen_button(&canvas);
        setup_blur_mute(game.clone());

        request_animation_frame(game);

        log::info!("Flapurr running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().press();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Leave typing in the name field alone
                if let Some(target) = event.target() {
                    if target.dyn_ref::<HtmlInputElement>().is_some() {
                        return;
                    }
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        g.press();
                    }
                    "r" | "R" => g.input.reset = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_submit_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Prefill the name field from the saved profile
        if let Some(input) = document
            .get_element_by_id("name-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&game.borrow().profile.name);
        }

        if let Some(btn) = document.get_element_by_id("submit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let name = document
                    .get_element_by_id("name-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();

                let mut g = game.borrow_mut();
                if g.state.phase != Phase::GameOver || name.trim().is_empty() {
                    return;
                }
                g.profile.set_name(&name);
                let entry = ScoreEntry::new(&name, g.state.score);
                g.store.submit(entry);
                set_status("Submitting...");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_fullscreen_button(canvas: &HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("fullscreen-btn") {
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if document.fullscreen_element().is_some() {
                    document.exit_fullscreen();
                } else if canvas.request_fullscreen().is_err() {
                    log::warn!("fullscreen request rejected");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_blur_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab hidden
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden =
                    document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                game.borrow_mut().set_blur_mute(hidden);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur/focus
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().set_blur_mute(true);
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().set_blur_mute(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();
            // One tick per frame, always
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flapurr (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_smoke_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a short scripted session to exercise the simulation end to end
#[cfg(not(target_arch = "wasm32"))]
fn run_smoke_session() {
    use flapurr::platform;
    use flapurr::sim::{FrameInput, GameState, Phase, World, tick};

    let seed = platform::session_seed();
    let world = World::default();
    let mut state = match GameState::new(world, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("invalid world configuration: {e}");
            return;
        }
    };

    log::info!("Scripted session with seed {seed}");

    // Flap every 20 ticks until the session ends or we give up
    for tick_no in 0..10_000u32 {
        let input = FrameInput {
            flap: tick_no % 20 == 0,
            reset: false,
        };
        tick(&mut state, &input);
        for event in state.drain_events() {
            log::debug!("tick {tick_no}: {event:?}");
        }
        if state.phase == Phase::GameOver {
            break;
        }
    }

    println!(
        "Session over after {} ticks: score {}, best {}",
        state.ticks, state.score, state.best
    );
}
