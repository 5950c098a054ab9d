//! Closed set of sound cues the host is asked to play.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Approve,
    Detain,
    Terminate,
    Jumpscare,
    EntityCatch,
    GunFire,
    DoorClose,
    Footstep,
    Rest,
    Error,
    Hallucination,
}

impl SoundCue {
    pub const ALL: [Self; 11] = [
        Self::Approve,
        Self::Detain,
        Self::Terminate,
        Self::Jumpscare,
        Self::EntityCatch,
        Self::GunFire,
        Self::DoorClose,
        Self::Footstep,
        Self::Rest,
        Self::Error,
        Self::Hallucination,
    ];

    /// Name passed to the host's `playEffect` callback.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Detain => "detain",
            Self::Terminate => "terminate",
            Self::Jumpscare => "jumpscare",
            Self::EntityCatch => "entity_catch",
            Self::GunFire => "gun_fire",
            Self::DoorClose => "door_close",
            Self::Footstep => "footstep",
            Self::Rest => "rest",
            Self::Error => "error",
            Self::Hallucination => "hallucination",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
