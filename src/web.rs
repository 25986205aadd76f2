//! Browser bridge
//!
//! Exposes a [`WebGame`] to JavaScript. The page owns the canvas, the
//! render loop and the DOM; it forwards raw input here, calls `frame` from
//! `requestAnimationFrame` and draws whatever snapshot comes back through
//! the frame callback.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::consts::NOMINAL_DT;
use crate::game::{GameController, Presenter};
use crate::input::InputAdapter;
use crate::sim::{GamePhase, Snapshot, StepOutcome};
use crate::tuning::{Tuning, TuningPreset};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Starbugs starting...");
}

/// Forwards presentation calls to JS callbacks
#[derive(Default)]
struct JsPresenter {
    on_frame: Option<Function>,
    on_game_start: Option<Function>,
    on_game_over: Option<Function>,
}

fn invoke(callback: &Option<Function>, arg: &JsValue) {
    if let Some(f) = callback {
        if let Err(e) = f.call1(&JsValue::NULL, arg) {
            log::warn!("JS callback failed: {:?}", e);
        }
    }
}

impl Presenter for JsPresenter {
    fn present(&mut self, snapshot: &Snapshot) {
        if self.on_frame.is_none() {
            return;
        }
        match serde_json::to_string(snapshot) {
            Ok(json) => invoke(&self.on_frame, &JsValue::from_str(&json)),
            Err(e) => log::error!("Snapshot serialization failed: {}", e),
        }
    }

    fn on_game_start(&mut self) {
        invoke(&self.on_game_start, &JsValue::UNDEFINED);
    }

    fn on_game_over(&mut self, score: u64) {
        invoke(&self.on_game_over, &JsValue::from_f64(score as f64));
    }
}

/// One game instance driven from the page
#[wasm_bindgen]
pub struct WebGame {
    controller: GameController<JsPresenter>,
    input: InputAdapter,
    last_time: f64,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game. `preset` is "web", "mobile" or "classic"; `tuning_json`
    /// overrides individual values.
    #[wasm_bindgen(constructor)]
    pub fn new(preset: Option<String>, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match (tuning_json, preset) {
            (Some(json), _) => Tuning::from_json(&json),
            (None, Some(name)) => name.parse::<TuningPreset>().map(Tuning::from_preset),
            (None, None) => Ok(Tuning::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let seed = js_sys::Date::now() as u64;
        let input = InputAdapter::new(tuning.pointer_span);
        let controller = GameController::new(tuning, seed, JsPresenter::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(WebGame {
            controller,
            input,
            last_time: 0.0,
        })
    }

    /// Called with the snapshot JSON after every simulated frame
    #[wasm_bindgen(js_name = setOnFrame)]
    pub fn set_on_frame(&mut self, callback: Function) {
        self.controller.presenter_mut().on_frame = Some(callback);
    }

    #[wasm_bindgen(js_name = setOnGameStart)]
    pub fn set_on_game_start(&mut self, callback: Function) {
        self.controller.presenter_mut().on_game_start = Some(callback);
    }

    /// Called with the final score
    #[wasm_bindgen(js_name = setOnGameOver)]
    pub fn set_on_game_over(&mut self, callback: Function) {
        self.controller.presenter_mut().on_game_over = Some(callback);
    }

    /// Start (or restart) a run
    pub fn start(&mut self) {
        self.input.clear();
        self.last_time = 0.0;
        self.controller.start_game();
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.controller.reset();
    }

    /// Advance one animation frame. `time_ms` is the rAF timestamp.
    /// Returns false once the run is over.
    pub fn frame(&mut self, time_ms: f64) -> bool {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            NOMINAL_DT
        };
        self.last_time = time_ms;

        let intent = self.input.take_intent();
        self.controller.frame(dt, &intent) == StepOutcome::Continue
    }

    /// Returns true if the key is bound (the page should preventDefault)
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        self.is_running() && self.input.key_down(key)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, touches: u32) {
        if self.is_running() {
            self.input.touch_start(touches);
        }
    }

    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, client_x: f32, viewport_width: f32, touches: u32) {
        if self.is_running() {
            self.input.touch_move(client_x, viewport_width, touches);
        }
    }

    #[wasm_bindgen(js_name = setLeft)]
    pub fn set_left(&mut self, pressed: bool) {
        self.input.set_left(pressed);
    }

    #[wasm_bindgen(js_name = setRight)]
    pub fn set_right(&mut self, pressed: bool) {
        self.input.set_right(pressed);
    }

    pub fn score(&self) -> f64 {
        self.controller.score() as f64
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.controller.phase() == GamePhase::Running
    }

    /// Events since the last call as a JSON array, oldest first
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.drain_events())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current snapshot as JSON, for pages that poll instead of subscribing
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
