//! JavaScript-facing handle around the game context.
use checkpoint_game::{GameContext, PlayerAction, TickReport, generate_code_from_entropy};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::bridge::{self, BridgeError};

fn js_error(err: &BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Owns one game and everything the page needs to drive it.
#[wasm_bindgen]
pub struct GameHandle {
    ctx: GameContext,
    play_effect: Option<Function>,
    last_frame_ms: Option<f64>,
}

#[wasm_bindgen]
impl GameHandle {
    /// Start from a run code such as `CP-LANTERN42`, or a fresh one when empty.
    #[wasm_bindgen(constructor)]
    pub fn new(code: Option<String>) -> Result<GameHandle, JsValue> {
        let code = match code.filter(|c| !c.trim().is_empty()) {
            Some(code) => code,
            None => generate_code_from_entropy(entropy()),
        };
        let seed = bridge::seed_from_code(&code).map_err(|err| js_error(&err))?;
        log::info!("new game {code} (seed {seed:#x})");
        Ok(Self {
            ctx: GameContext::with_seed(seed),
            play_effect: None,
            last_frame_ms: None,
        })
    }

    /// Register the host's `playEffect(name)` callback.
    #[wasm_bindgen(js_name = setPlayEffect)]
    pub fn set_play_effect(&mut self, callback: Function) {
        self.play_effect = Some(callback);
    }

    #[wasm_bindgen(js_name = runCode)]
    pub fn run_code(&self) -> String {
        checkpoint_game::encode_friendly(self.ctx.seed())
    }

    pub fn screen(&self) -> String {
        self.ctx.screen.to_string()
    }

    /// `keydown`/`keyup` forwarding. Returns whether the key was consumed.
    pub fn key(&mut self, code: &str, down: bool, repeat: bool) -> bool {
        bridge::apply_key(&mut self.ctx.input, code, down, repeat)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, dx: f32, dy: f32) {
        self.ctx.input.add_look(dx, dy);
    }

    /// Horizontal aim in `[-1, 1]` for the highway gun.
    #[wasm_bindgen(js_name = setAim)]
    pub fn set_aim(&mut self, aim_x: f32) {
        self.ctx.input.set_aim(aim_x);
    }

    /// Pointer-lock or visibility changes. Losing focus pauses the simulation.
    #[wasm_bindgen(js_name = setFocused)]
    pub fn set_focused(&mut self, focused: bool) {
        self.ctx.input.set_focused(focused);
        if !focused {
            self.last_frame_ms = None;
        }
    }

    /// Queue an action object coming from on-screen buttons.
    pub fn action(&mut self, value: JsValue) -> Result<(), JsValue> {
        let action: PlayerAction = serde_wasm_bindgen::from_value(value)?;
        self.ctx.input.push(action);
        Ok(())
    }

    /// Advance one animation frame. `now_ms` is the `requestAnimationFrame`
    /// timestamp; returns the tick's events.
    pub fn frame(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let delta = self.last_frame_ms.map_or(0.0, |last| now_ms - last);
        self.last_frame_ms = Some(now_ms);
        let report = self.ctx.tick_buffered(bridge::frame_seconds(delta));
        self.forward_cues(&report);
        Ok(serde_wasm_bindgen::to_value(&report.events)?)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.ctx.snapshot())?)
    }

    /// Run summary once the ending screen is up, otherwise `null`.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.ctx.summary)?)
    }

    /// Damage from highway hazards simulated by the page.
    #[wasm_bindgen(js_name = externalDamage)]
    pub fn external_damage(&mut self, amount: f32) -> Result<JsValue, JsValue> {
        let report = self.ctx.apply_external_damage(amount);
        self.forward_cues(&report);
        Ok(serde_wasm_bindgen::to_value(&report.events)?)
    }
}

impl GameHandle {
    fn forward_cues(&self, report: &TickReport) {
        let Some(callback) = self.play_effect.as_ref() else {
            return;
        };
        for name in bridge::cue_names(report) {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(name)) {
                log::warn!("playEffect({name}) threw: {err:?}");
            }
        }
    }
}

/// Clock plus `Math.random` folded into one value for fresh run codes.
fn entropy() -> u64 {
    let now = web_sys::window()
        .and_then(|window| window.performance())
        .map_or(0.0, |performance| performance.now());
    let noise = js_sys::Math::random();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mixed = (now * 1_000.0) as u64 ^ ((noise * f64::from(u32::MAX)) as u64).rotate_left(21);
    mixed
}
