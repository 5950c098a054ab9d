//! Checkpoint Game Engine
//!
//! Platform-agnostic core of the Checkpoint horror game: subject generation,
//! decision adjudication, the shift state machine, the escape chase, the
//! highway run and the screen flow tying them together. Rendering, audio and
//! device input live with the host.

pub mod adjudicator;
pub mod audio;
pub mod config;
pub(crate) mod constants;
pub mod escape;
pub mod events;
pub mod flow;
pub mod geometry;
pub mod highway;
pub mod horror;
pub mod input;
pub mod motion;
pub mod numbers;
pub mod personality;
pub mod result;
pub mod rng;
pub mod seed;
pub mod shift;
pub mod snapshot;
pub mod store;
pub mod subject;
pub mod tables;
pub mod upgrades;

// Re-export commonly used types
pub use adjudicator::{
    AdjudicationContext, Decision, DecisionHistory, DecisionRecord, Verdict, adjudicate,
};
pub use audio::SoundCue;
pub use config::GameConfig;
pub use escape::{EscapeController, EscapeEntity, EscapeOutcome, EscapePhase};
pub use events::{GameEvent, TickReport};
pub use flow::{GameContext, Screen, reduce, sanitize_dt};
pub use geometry::Vec2;
pub use highway::{HighwayOutcome, HighwayRun, Obstacle};
pub use horror::EnvironmentParams;
pub use input::{HeldKey, InputBuffer, InputFrame, PlayerAction};
pub use personality::{DialogueSet, DialogueStage, Personality};
pub use result::{Ending, RunSummary};
pub use rng::{CountingRng, RngBundle};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy};
pub use shift::{Carryover, JumpscareClass, JumpscareGate, ShiftOutcome, ShiftPhase, ShiftSession};
pub use snapshot::{CameraPose, EntityView, HighwayView, HudView, RenderSnapshot, SubjectView};
pub use store::{Economy, ItemKind, PurchaseError, Store, StoreItem};
pub use subject::{
    Biometrics, Deviation, Discrepancy, IdCard, Subject, SubjectId, SubjectType, VerbalClaims,
    generate,
};
pub use tables::{ConfigError, ShiftConfig, ShiftTable};
pub use upgrades::{EffectSet, UpgradeEffect};
