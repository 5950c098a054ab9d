//! Per-tick input frames and the buffer that accumulates them between ticks.
use serde::{Deserialize, Serialize};

use crate::adjudicator::Decision;
use crate::geometry::Vec2;

/// One-shot player intents queued between ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PlayerAction {
    Decide { decision: Decision },
    Scan,
    Question,
    ToggleId,
    Rest,
    Interact,
    Fire,
    StartRun,
    OpenShop,
    CloseShop,
    Buy { item: String },
    NextShift,
    ReturnToMenu,
}

/// Everything the simulation reads from the player in one tick.
///
/// `movement` is strafe/forward in `[-1, 1]`, `look` is the raw pointer delta
/// accumulated since the last tick, and `aim_x` is the horizontal aim used by
/// the highway weapon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    pub movement: Vec2,
    pub look: Vec2,
    pub aim_x: f32,
    pub focused: bool,
    pub actions: Vec<PlayerAction>,
}

impl InputFrame {
    /// Focused frame with no movement and no actions.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_action(action: PlayerAction) -> Self {
        Self {
            focused: true,
            actions: vec![action],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has(&self, action: &PlayerAction) -> bool {
        self.actions.contains(action)
    }

    /// Clamp movement and aim, replacing non-finite values.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.movement = self.movement.clamp_unit();
        if !self.look.x.is_finite() {
            self.look.x = 0.0;
        }
        if !self.look.y.is_finite() {
            self.look.y = 0.0;
        }
        self.aim_x = if self.aim_x.is_nan() {
            0.0
        } else {
            self.aim_x.clamp(-1.0, 1.0)
        };
        self
    }
}

/// Directional keys that can be held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeldKey {
    Forward,
    Back,
    Left,
    Right,
}

/// Accumulates device events until the next tick drains them into a frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputBuffer {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    look: Vec2,
    aim_x: f32,
    focused: bool,
    queued: Vec<PlayerAction>,
}

impl InputBuffer {
    pub fn set_held(&mut self, key: HeldKey, down: bool) {
        match key {
            HeldKey::Forward => self.forward = down,
            HeldKey::Back => self.back = down,
            HeldKey::Left => self.left = down,
            HeldKey::Right => self.right = down,
        }
    }

    pub fn add_look(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.look += Vec2::new(dx, dy);
        }
    }

    pub fn set_aim(&mut self, aim_x: f32) {
        self.aim_x = aim_x;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.forward = false;
            self.back = false;
            self.left = false;
            self.right = false;
        }
    }

    pub fn push(&mut self, action: PlayerAction) {
        self.queued.push(action);
    }

    /// Build this tick's frame. Held keys and aim persist; deltas and actions do not.
    pub fn drain(&mut self) -> InputFrame {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        InputFrame {
            movement: Vec2::new(axis(self.right, self.left), axis(self.forward, self.back)),
            look: std::mem::take(&mut self.look),
            aim_x: self.aim_x,
            focused: self.focused,
            actions: std::mem::take(&mut self.queued),
        }
        .sanitized()
    }

    /// Forget everything, keeping only focus. Used on screen changes.
    pub fn reset(&mut self) {
        *self = Self {
            focused: self.focused,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_consumes_one_shot_state_only() {
        let mut buffer = InputBuffer::default();
        buffer.set_focused(true);
        buffer.set_held(HeldKey::Forward, true);
        buffer.set_held(HeldKey::Left, true);
        buffer.add_look(4.0, -2.0);
        buffer.push(PlayerAction::Scan);

        let frame = buffer.drain();
        assert_eq!(frame.movement, Vec2::new(-1.0, 1.0));
        assert_eq!(frame.look, Vec2::new(4.0, -2.0));
        assert_eq!(frame.actions, vec![PlayerAction::Scan]);

        let next = buffer.drain();
        assert_eq!(next.movement, Vec2::new(-1.0, 1.0));
        assert_eq!(next.look, Vec2::ZERO);
        assert!(next.actions.is_empty());
    }

    #[test]
    fn losing_focus_releases_keys_and_reset_clears_queue() {
        let mut buffer = InputBuffer::default();
        buffer.set_focused(true);
        buffer.set_held(HeldKey::Right, true);
        buffer.push(PlayerAction::Fire);
        buffer.set_focused(false);
        assert_eq!(buffer.drain().movement, Vec2::ZERO);

        buffer.push(PlayerAction::Interact);
        buffer.reset();
        let frame = buffer.drain();
        assert!(frame.actions.is_empty());
        assert!(!frame.focused);
    }

    #[test]
    fn sanitize_clamps_aim_and_drops_nan() {
        let frame = InputFrame {
            aim_x: 3.0,
            look: Vec2::new(f32::NAN, 1.0),
            movement: Vec2::new(2.0, -5.0),
            ..InputFrame::idle()
        }
        .sanitized();
        assert!((frame.aim_x - 1.0).abs() < f32::EPSILON);
        assert_eq!(frame.look, Vec2::new(0.0, 1.0));
        assert_eq!(frame.movement, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let frame: InputFrame = serde_json::from_str(
            r#"{"focused":true,"actions":[{"type":"decide","decision":"detain"},{"type":"buy","item":"coffee"}]}"#,
        )
        .unwrap();
        assert!(frame.has(&PlayerAction::Decide {
            decision: Decision::Detain
        }));
        assert!(frame.has(&PlayerAction::Buy {
            item: "coffee".to_string()
        }));
    }
}
