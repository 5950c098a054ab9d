//! Decision adjudication and the bounded decision history.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::constants::{
    CORRECT_STRESS_RELIEF, CRIMINAL_APPROVE_PENALTY, DECISION_HISTORY_CAPACITY,
    WRONG_COMPROMISE_GAIN, WRONG_CRIMINAL_COMPROMISE_GAIN, WRONG_CRIMINAL_STRESS_GAIN,
    WRONG_DECISION_FINE, WRONG_HEALTH_DAMAGE, WRONG_HEALTH_DAMAGE_REDUCED, WRONG_STRESS_GAIN,
};
use crate::subject::{Deviation, Subject};
use crate::upgrades::{EffectSet, UpgradeEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Detain,
    Terminate,
}

impl Decision {
    pub const ALL: [Self; 3] = [Self::Approve, Self::Detain, Self::Terminate];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Detain => "detain",
            Self::Terminate => "terminate",
        }
    }

    /// Whether this decision is the right call for the subject.
    #[must_use]
    pub const fn is_correct_for(self, is_anomaly: bool, is_criminal: bool) -> bool {
        match self {
            Self::Approve => !is_anomaly,
            Self::Detain => is_anomaly || is_criminal,
            Self::Terminate => is_anomaly,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift-level inputs the adjudicator needs beyond the subject itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjudicationContext {
    pub base_pay: i64,
    pub effects: EffectSet,
}

/// Meter and money deltas produced by one decision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    pub pay_delta: i64,
    pub health_delta: f32,
    pub stress_delta: f32,
    pub compromise_delta: f32,
    pub criminal_penalty: bool,
    pub jumpscare: bool,
}

/// Judge a decision against the subject's hidden truth.
#[must_use]
pub fn adjudicate(subject: &Subject, decision: Decision, ctx: &AdjudicationContext) -> Verdict {
    if decision.is_correct_for(subject.is_anomaly, subject.is_criminal) {
        let criminal_penalty = decision == Decision::Approve && subject.is_criminal;
        let pay_delta = if criminal_penalty {
            ctx.base_pay - CRIMINAL_APPROVE_PENALTY
        } else {
            ctx.base_pay
        };
        return Verdict {
            correct: true,
            pay_delta,
            stress_delta: -CORRECT_STRESS_RELIEF,
            criminal_penalty,
            ..Verdict::default()
        };
    }

    if subject.is_criminal {
        return Verdict {
            correct: false,
            pay_delta: -WRONG_DECISION_FINE,
            stress_delta: WRONG_CRIMINAL_STRESS_GAIN,
            compromise_delta: WRONG_CRIMINAL_COMPROMISE_GAIN,
            ..Verdict::default()
        };
    }

    let damage = if ctx.effects.contains(UpgradeEffect::DamageReduction) {
        WRONG_HEALTH_DAMAGE_REDUCED
    } else {
        WRONG_HEALTH_DAMAGE
    };
    Verdict {
        correct: false,
        pay_delta: -WRONG_DECISION_FINE,
        health_delta: -damage,
        stress_delta: WRONG_STRESS_GAIN,
        compromise_delta: WRONG_COMPROMISE_GAIN,
        criminal_penalty: false,
        jumpscare: true,
    }
}

/// One resolved subject as remembered by the shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub subject_name: String,
    pub action: Decision,
    pub auto: bool,
    pub was_anomaly: bool,
    pub was_criminal: bool,
    pub correct: bool,
    pub defect: Option<Deviation>,
}

impl DecisionRecord {
    #[must_use]
    pub fn from_subject(subject: &Subject, action: Decision, auto: bool, correct: bool) -> Self {
        Self {
            subject_name: subject.display_name(),
            action,
            auto,
            was_anomaly: subject.is_anomaly,
            was_criminal: subject.is_criminal,
            correct,
            defect: subject.defect(),
        }
    }
}

/// FIFO of the most recent decisions, oldest dropped first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionHistory {
    entries: VecDeque<DecisionRecord>,
}

impl Default for DecisionHistory {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(DECISION_HISTORY_CAPACITY),
        }
    }
}

impl DecisionHistory {
    pub fn push(&mut self, record: DecisionRecord) {
        while self.entries.len() >= DECISION_HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DecisionRecord> {
        self.entries.back()
    }

    /// Records of decisions that turned out wrong, oldest first.
    pub fn mistakes(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.entries.iter().filter(|record| !record.correct)
    }
}
