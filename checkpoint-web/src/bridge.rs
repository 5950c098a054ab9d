//! Platform-neutral translation between DOM-shaped input and the core types.
//!
//! Everything here is plain Rust so the mapping can be tested off the browser.
use checkpoint_game::{
    Decision, HeldKey, InputBuffer, InputFrame, PlayerAction, TickReport, decode_to_seed,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed input payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unrecognised run code `{0}`")]
    BadRunCode(String),
}

/// What a physical key does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyBinding {
    Held(HeldKey),
    Action(PlayerAction),
}

/// Map a `KeyboardEvent.code` to its binding.
#[must_use]
pub fn key_binding(code: &str) -> Option<KeyBinding> {
    let held = |key| Some(KeyBinding::Held(key));
    let action = |action| Some(KeyBinding::Action(action));
    match code {
        "KeyW" | "ArrowUp" => held(HeldKey::Forward),
        "KeyS" | "ArrowDown" => held(HeldKey::Back),
        "KeyA" | "ArrowLeft" => held(HeldKey::Left),
        "KeyD" | "ArrowRight" => held(HeldKey::Right),
        "Digit1" => action(PlayerAction::Decide {
            decision: Decision::Approve,
        }),
        "Digit2" => action(PlayerAction::Decide {
            decision: Decision::Detain,
        }),
        "Digit3" => action(PlayerAction::Decide {
            decision: Decision::Terminate,
        }),
        "KeyF" => action(PlayerAction::Scan),
        "KeyQ" => action(PlayerAction::Question),
        "KeyI" | "Tab" => action(PlayerAction::ToggleId),
        "KeyR" => action(PlayerAction::Rest),
        "KeyE" => action(PlayerAction::Interact),
        "Space" => action(PlayerAction::Fire),
        "Enter" => action(PlayerAction::StartRun),
        "KeyB" => action(PlayerAction::OpenShop),
        "Escape" => action(PlayerAction::CloseShop),
        "KeyN" => action(PlayerAction::NextShift),
        "KeyM" => action(PlayerAction::ReturnToMenu),
        _ => None,
    }
}

/// Feed a key event into the buffer. Returns `true` when the key is bound.
///
/// Held keys track both edges; one-shot actions fire on the initial press only.
pub fn apply_key(buffer: &mut InputBuffer, code: &str, down: bool, repeat: bool) -> bool {
    match key_binding(code) {
        Some(KeyBinding::Held(key)) => {
            buffer.set_held(key, down);
            true
        }
        Some(KeyBinding::Action(action)) => {
            if down && !repeat {
                buffer.push(action);
            }
            true
        }
        None => false,
    }
}

/// Parse a whole frame supplied by the host, clamping out-of-range values.
///
/// # Errors
///
/// Returns [`BridgeError::Malformed`] when the payload is not an input frame.
pub fn parse_frame(json: &str) -> Result<InputFrame, BridgeError> {
    let frame: InputFrame = serde_json::from_str(json)?;
    Ok(frame.sanitized())
}

/// Parse a single queued action, e.g. `{"type":"buy","item":"coffee"}`.
///
/// # Errors
///
/// Returns [`BridgeError::Malformed`] for unknown action shapes.
pub fn parse_action(json: &str) -> Result<PlayerAction, BridgeError> {
    Ok(serde_json::from_str(json)?)
}

/// Resolve a run code typed by the player into a seed.
///
/// # Errors
///
/// Returns [`BridgeError::BadRunCode`] when the code does not decode.
pub fn seed_from_code(code: &str) -> Result<u64, BridgeError> {
    decode_to_seed(code).ok_or_else(|| BridgeError::BadRunCode(code.trim().to_string()))
}

/// Names handed to the host's `playEffect` callback, in emission order.
#[must_use]
pub fn cue_names(report: &TickReport) -> Vec<&'static str> {
    report.cues.iter().map(|cue| cue.as_str()).collect()
}

/// Turn a `requestAnimationFrame` timestamp delta in milliseconds into seconds.
#[must_use]
pub fn frame_seconds(delta_ms: f64) -> f32 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        #[allow(clippy::cast_possible_truncation)]
        let seconds = (delta_ms / 1000.0) as f32;
        seconds
    } else {
        0.0
    }
}
