//! Events and cues produced by a single tick.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::adjudicator::Decision;
use crate::audio::SoundCue;
use crate::escape::EscapeOutcome;
use crate::flow::Screen;
use crate::subject::SubjectId;

/// Notable things that happened during a tick, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum GameEvent {
    ScreenChanged { from: Screen, to: Screen },
    ShiftStarted { number: u8 },
    SubjectSpawned { id: SubjectId },
    SubjectArrived { id: SubjectId },
    SubjectScanned { id: SubjectId },
    SubjectQuestioned { id: SubjectId },
    SubjectResolved {
        id: SubjectId,
        decision: Decision,
        auto: bool,
        correct: bool,
        pay_delta: i64,
    },
    Jumpscare,
    RestStarted,
    RestFinished,
    Hallucination,
    GhostAccusation { subject_name: String },
    ShiftComplete { number: u8, shift_money: i64 },
    EscapeTriggered,
    EntitySpawned,
    EntityStunned { until: f32 },
    DoorClosing,
    EscapeResolved { outcome: EscapeOutcome },
    ObstaclePancaked { id: u32 },
    ObstacleDestroyed { id: u32 },
    HighwayFinished { won: bool },
    Purchased { item: String },
    PurchaseRejected { reason: String },
    BreakRest { health: f32 },
}

/// Output of one call to the tick entry point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub cues: SmallVec<[SoundCue; 4]>,
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    pub fn event(&mut self, event: GameEvent) {
        log::trace!("event {event:?}");
        self.events.push(event);
    }

    pub fn extend(&mut self, other: Self) {
        self.cues.extend(other.cues);
        self.events.extend(other.events);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty() && self.events.is_empty()
    }

    #[must_use]
    pub fn has_cue(&self, cue: SoundCue) -> bool {
        self.cues.contains(&cue)
    }
}
