//! End-of-run result summary
use serde::{Deserialize, Serialize};

use crate::highway::HighwayRun;
use crate::seed::encode_friendly;
use crate::shift::ShiftOutcome;

const CORRECT_DECISION_POINTS: i64 = 100;
const WRONG_DECISION_POINTS: i64 = 50;

/// How the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// Finished the highway run
    Survived,
    /// Caught by the entity during an escape
    Caught,
    /// Escape clock ran out before the door closed
    TimedOut,
    /// Killed on the highway by external damage
    Crashed,
}

impl Ending {
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Survived)
    }

    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Survived => "You made it out. The checkpoint lights fade behind you.",
            Self::Caught => "It found you in the corridor.",
            Self::TimedOut => "The door never closed.",
            Self::Crashed => "The road claimed you before the border did.",
        }
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Survived => write!(f, "survived"),
            Self::Caught => write!(f, "caught"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::Crashed => write!(f, "crashed"),
        }
    }
}

/// Complete summary of a run for the ending screen and the tester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ending: Ending,
    pub headline: String,
    pub seed: u64,
    pub run_code: String,
    pub shifts_cleared: u8,
    pub escapes_survived: u32,
    pub processed: u32,
    pub correct_decisions: u32,
    pub wrong_decisions: u32,
    pub money: i64,
    pub items: Vec<String>,
    pub highway_score: u32,
    pub highway_distance: f32,
    pub score: i64,
}

impl RunSummary {
    /// Build the summary from the finished run's pieces.
    #[must_use]
    pub fn collect(
        ending: Ending,
        seed: u64,
        shifts: &[ShiftOutcome],
        money: i64,
        items: Vec<String>,
        highway: Option<&HighwayRun>,
    ) -> Self {
        let processed = shifts.iter().map(|s| s.processed).sum();
        let correct_decisions: u32 = shifts.iter().map(|s| s.correct_decisions).sum();
        let wrong_decisions: u32 = shifts.iter().map(|s| s.wrong_decisions).sum();
        let escapes_survived = u32::try_from(shifts.iter().filter(|s| s.escaped).count()).unwrap_or(u32::MAX);
        let highway_score = highway.map_or(0, |run| run.score);
        let score = i64::from(correct_decisions) * CORRECT_DECISION_POINTS
            - i64::from(wrong_decisions) * WRONG_DECISION_POINTS
            + i64::from(highway_score)
            + money.max(0);
        Self {
            ending,
            headline: ending.headline().to_string(),
            seed,
            run_code: encode_friendly(seed),
            shifts_cleared: u8::try_from(shifts.len()).unwrap_or(u8::MAX),
            escapes_survived,
            processed,
            correct_decisions,
            wrong_decisions,
            money,
            items,
            highway_score,
            highway_distance: highway.map_or(0.0, |run| run.distance),
            score,
        }
    }
}
