//! Red Light entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//!
//! The browser build expects the page to provide `#game-board` containing
//! `#player`, `#game-master`, `#finish-line`, `#timer` and a `#controls`
//! container whose `.control-btn` children carry the ids `up`, `down`, `left`
//! and `right`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

    use red_light::consts::*;
    use red_light::sim::{Direction, GameState, InputEvent, TickInput, start, tick};
    use red_light::tuning::BoardLayout;
    use red_light::view::{Placement, Scene, notification};
    use red_light::Tuning;

    /// Live DOM handles
    struct Dom {
        document: Document,
        board: HtmlElement,
        player: HtmlElement,
        timer: Option<Element>,
        obstacles: HashMap<u32, HtmlElement>,
        projectiles: HashMap<u32, HtmlElement>,
    }

    impl Dom {
        fn new(document: Document) -> Result<Self, JsValue> {
            let board = html_by_id(&document, "game-board")?;
            let player = html_by_id(&document, "player")?;
            let timer = document.get_element_by_id("timer");
            Ok(Self {
                document,
                board,
                player,
                timer,
                obstacles: HashMap::new(),
                projectiles: HashMap::new(),
            })
        }

        /// Size the board and pin the static pieces to the simulated layout
        fn apply_layout(&self, layout: &BoardLayout) -> Result<(), JsValue> {
            set_box(&self.board, None, layout.width, layout.height)?;
            set_box(&self.player, None, layout.player_size.x, layout.player_size.y)?;
            if let Ok(guard) = html_by_id(&self.document, "game-master") {
                let origin = Placement::px(layout.guard_origin.y, layout.guard_origin.x);
                set_box(&guard, Some(origin), layout.guard_size.x, layout.guard_size.y)?;
            }
            if let Ok(finish) = html_by_id(&self.document, "finish-line") {
                let line = layout.finish_line;
                let origin = Placement::px(line.min.y, line.min.x);
                set_box(&finish, Some(origin), line.size.x, line.size.y)?;
            }
            Ok(())
        }

        fn render(&mut self, scene: &Scene, layout: &BoardLayout) -> Result<(), JsValue> {
            self.board
                .style()
                .set_property("background-color", scene.board_color)?;
            if let Some(timer) = &self.timer {
                timer.set_text_content(Some(&scene.timer_text));
            }
            if let Some(placement) = scene.player {
                place(&self.player, placement)?;
            }

            reconcile(
                &self.document,
                &self.board,
                &mut self.obstacles,
                &scene.obstacles,
                "obstacle",
                (layout.obstacle_size.x, layout.obstacle_size.y),
            )?;
            reconcile(
                &self.document,
                &self.board,
                &mut self.projectiles,
                &scene.projectiles,
                "bullet",
                (layout.projectile_size.x, layout.projectile_size.y),
            )
        }
    }

    fn html_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
    }

    fn place(el: &HtmlElement, placement: Placement) -> Result<(), JsValue> {
        let style = el.style();
        style.set_property("top", &placement.css_top())?;
        style.set_property("left", &placement.css_left())
    }

    fn set_box(
        el: &HtmlElement,
        origin: Option<Placement>,
        width: f32,
        height: f32,
    ) -> Result<(), JsValue> {
        if let Some(origin) = origin {
            place(el, origin)?;
        }
        let style = el.style();
        style.set_property("width", &format!("{width}px"))?;
        style.set_property("height", &format!("{height}px"))
    }

    /// Make the board's `class_name` children match the scene entities by id
    fn reconcile(
        document: &Document,
        board: &HtmlElement,
        live: &mut HashMap<u32, HtmlElement>,
        wanted: &[(u32, Placement)],
        class_name: &str,
        size: (f32, f32),
    ) -> Result<(), JsValue> {
        live.retain(|id, el| {
            let keep = wanted.iter().any(|(w, _)| w == id);
            if !keep {
                el.remove();
            }
            keep
        });

        for &(id, placement) in wanted {
            let el = match live.get(&id) {
                Some(el) => el.clone(),
                None => {
                    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
                    el.set_class_name(class_name);
                    set_box(&el, None, size.0, size.1)?;
                    board.append_child(&el)?;
                    live.insert(id, el.clone());
                    el
                }
            };
            place(&el, placement)?;
        }
        Ok(())
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        dom: Dom,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Events are one-shot
                self.input.events.clear();
            }
        }

        /// Show modal notifications for terminal events
        fn notify(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            for event in self.state.drain_events() {
                if let Some(message) = notification(&event) {
                    let _ = window.alert_with_message(message);
                }
            }
        }

        fn render(&mut self) {
            let scene = Scene::from_state(&self.state);
            if let Err(e) = self.dom.render(&scene, &self.state.tuning.board) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Red Light starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let tuning = Tuning::load();
        let dom = Dom::new(document.clone())?;
        dom.apply_layout(&tuning.board)?;

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, tuning);
        start(&mut state);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
            dom,
        }));

        setup_keyboard(&document, game.clone())?;
        setup_controls(&document, game.clone())?;

        request_animation_frame(game);

        log::info!("Red Light running!");
        Ok(())
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if let Some(dir) = Direction::from_key(&key) {
                    event.prevent_default();
                    g.input.events.push(InputEvent::KeyDown(dir));
                } else if key.eq_ignore_ascii_case("i") && !event.repeat() {
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Idle mode: {}", g.input.idle_mode);
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(dir) = Direction::from_key(&event.key()) {
                    game.borrow_mut().input.events.push(InputEvent::KeyUp(dir));
                }
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_controls(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(controls) = document.get_element_by_id("controls") else {
            log::warn!("No #controls element, on-screen buttons disabled");
            return Ok(());
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if !target.class_list().contains("control-btn") {
                return;
            }
            if let Some(dir) = Direction::from_button_id(&target.id()) {
                game.borrow_mut().input.events.push(InputEvent::Button(dir));
            }
        });
        controls.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.notify();
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
    use red_light::Tuning;
    use red_light::consts::SIM_HZ;
    use red_light::sim::{GameEvent, GameState, LossReason, TickInput, start, tick};
    use red_light::view::{Scene, notification};

    /// Simulated minutes the headless demo plays
    const DEMO_MINUTES: u64 = 10;

    env_logger::init();
    log::info!("Red Light (native) starting...");
    log::info!("Native mode plays a headless demo; build for wasm32 to play in a browser");

    let tuning = Tuning::load();
    let seed = std::env::var("RED_LIGHT_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

    let mut state = GameState::new(seed, tuning);
    start(&mut state);
    log::info!("Game initialized with seed: {}", seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let (mut wins, mut hits, mut timeouts) = (0u32, 0u32, 0u32);
    for _ in 0..DEMO_MINUTES * 60 * SIM_HZ as u64 {
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::Won => wins += 1,
                GameEvent::Lost(LossReason::Hit) => hits += 1,
                GameEvent::Lost(LossReason::TimeUp) => timeouts += 1,
                _ => {}
            }
            if let Some(message) = notification(&event) {
                log::info!("{}", message);
            }
        }
    }

    match serde_json::to_string(&Scene::from_state(&state)) {
        Ok(json) => log::debug!("Final scene: {}", json),
        Err(e) => log::warn!("Could not serialize scene: {}", e),
    }
    println!(
        "Seed {seed}: {} rounds in {DEMO_MINUTES} min - {wins} won, {hits} shot, {timeouts} timed out",
        state.round
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
