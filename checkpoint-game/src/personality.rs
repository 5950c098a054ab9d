//! Subject personalities and their dialogue pools.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversational temperament of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Nervous,
    Calm,
    Aggressive,
    Confused,
    Suspicious,
    Friendly,
    Robotic,
}

impl Personality {
    pub const ALL: [Self; 7] = [
        Self::Nervous,
        Self::Calm,
        Self::Aggressive,
        Self::Confused,
        Self::Suspicious,
        Self::Friendly,
        Self::Robotic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nervous => "nervous",
            Self::Calm => "calm",
            Self::Aggressive => "aggressive",
            Self::Confused => "confused",
            Self::Suspicious => "suspicious",
            Self::Friendly => "friendly",
            Self::Robotic => "robotic",
        }
    }

    /// Uniform draw over every personality.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL.choose(rng).copied().unwrap_or(Self::Calm)
    }

    /// Full dialogue set; every stage is required for every personality.
    #[must_use]
    pub const fn dialogue(self) -> DialogueSet {
        match self {
            Self::Nervous => DialogueSet {
                initial: &[
                    "H-hello. Is this the right line? I was told this line.",
                    "Sorry, sorry. I have my papers, somewhere.",
                ],
                under_pressure: &[
                    "Please, I just want to get home before curfew.",
                    "Why are you looking at me like that?",
                ],
                after_scan: &[
                    "Is it bad? It's bad, isn't it.",
                    "That machine always makes my teeth hurt.",
                ],
                contradictions: &[
                    "Did I say that? I meant... I'm tired, I mix things up.",
                    "The card is right. Or I am. One of us is.",
                ],
            },
            Self::Calm => DialogueSet {
                initial: &[
                    "Good evening, officer. Take your time.",
                    "Here are my documents.",
                ],
                under_pressure: &[
                    "I understand you have a job to do.",
                    "Ask whatever you need to ask.",
                ],
                after_scan: &[
                    "Everything in order, I assume.",
                    "I have always scanned clean.",
                ],
                contradictions: &[
                    "A clerical error, surely.",
                    "People misspeak. It happens.",
                ],
            },
            Self::Aggressive => DialogueSet {
                initial: &[
                    "Open the gate. I don't have all night.",
                    "You again. Hurry up.",
                ],
                under_pressure: &[
                    "You think you scare me? Stamp it.",
                    "Keep asking and see what happens.",
                ],
                after_scan: &[
                    "Satisfied? Point that thing somewhere else.",
                    "Your scanner is broken. Everyone knows it.",
                ],
                contradictions: &[
                    "So I said something different. So what.",
                    "Check your own paperwork before you check mine.",
                ],
            },
            Self::Confused => DialogueSet {
                initial: &[
                    "Where... is this the station? I was asleep on the bus.",
                    "I don't remember standing up.",
                ],
                under_pressure: &[
                    "My name? It's on the card. It should be on the card.",
                    "I keep hearing a humming. Do you hear it?",
                ],
                after_scan: &[
                    "The light was warm. I think I've seen it before.",
                    "What did it show you? Please tell me.",
                ],
                contradictions: &[
                    "That's not... that's not what I meant to say.",
                    "Somebody else was talking. Not me.",
                ],
            },
            Self::Suspicious => DialogueSet {
                initial: &[
                    "Why do you need to see my face?",
                    "Just the card. I'm not answering questions.",
                ],
                under_pressure: &[
                    "Who are you reporting to?",
                    "I know my rights at this gate.",
                ],
                after_scan: &[
                    "Where does that data go?",
                    "Delete it when you're done.",
                ],
                contradictions: &[
                    "You're trying to trip me up.",
                    "I won't repeat myself for your recorder.",
                ],
            },
            Self::Friendly => DialogueSet {
                initial: &[
                    "Evening! Quiet night, huh?",
                    "Long shift? I brought you a biscuit.",
                ],
                under_pressure: &[
                    "Hey, no trouble from me, friend.",
                    "Anything you need, just say.",
                ],
                after_scan: &[
                    "Ha, tickles. All good?",
                    "Clean as a whistle, I bet.",
                ],
                contradictions: &[
                    "Oops, did I get that wrong? Long day.",
                    "My memory, honestly. Ask my wife.",
                ],
            },
            Self::Robotic => DialogueSet {
                initial: &[
                    "GREETINGS. I AM A RESIDENT. I REQUEST ENTRY.",
                    "Good. Evening. Officer.",
                ],
                under_pressure: &[
                    "I have answered. I will answer again.",
                    "Your question is noted.",
                ],
                after_scan: &[
                    "The scan is within parameters.",
                    "Result: human.",
                ],
                contradictions: &[
                    "Correction accepted. The card is correct.",
                    "Both statements are true.",
                ],
            },
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation stage a subject is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    #[default]
    Initial,
    UnderPressure,
    AfterScan,
    Contradiction,
}

/// Dialogue pool per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueSet {
    pub initial: &'static [&'static str],
    pub under_pressure: &'static [&'static str],
    pub after_scan: &'static [&'static str],
    pub contradictions: &'static [&'static str],
}

impl DialogueSet {
    #[must_use]
    pub const fn lines(&self, stage: DialogueStage) -> &'static [&'static str] {
        match stage {
            DialogueStage::Initial => self.initial,
            DialogueStage::UnderPressure => self.under_pressure,
            DialogueStage::AfterScan => self.after_scan,
            DialogueStage::Contradiction => self.contradictions,
        }
    }

    /// Pick a line deterministically from a per-subject variant index.
    #[must_use]
    pub fn line(&self, stage: DialogueStage, variant: usize) -> &'static str {
        let pool = self.lines(stage);
        if pool.is_empty() {
            return "...";
        }
        pool[variant % pool.len()]
    }
}
