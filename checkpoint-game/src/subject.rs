//! Procedural subject generation.
//!
//! A subject is classified by a single uniform roll bucketed against the
//! shift's anomaly and criminal chances, then dressed with a personality,
//! biometrics, an ID card and verbal claims that may contradict the card.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{
    AMBIGUOUS_ANOMALY_CHANCE, AUTO_APPROVE_SECONDS, BASELINE_EYES, BASELINE_FINGERS,
    BASELINE_LIMBS, DEVIANT_EYES_MAX, DEVIANT_EYES_MIN, DEVIANT_FINGERS, DEVIANT_LIMBS,
    EXTRA_TIME_SECONDS, ORIGIN_LIE_CHANCE, PHOTO_MISMATCH_CHANCE, ROBOTIC_ANOMALY_CHANCE,
    SLICE_ANOMALY, SLICE_DOPPELGANGER, SLICE_INFECTED, SLICE_INSIDER, SLICE_REFUGEE,
    SLICE_SLEEPER, STOLEN_ID_CHANCE, SUBJECT_AGE_MAX, SUBJECT_AGE_MIN, VERBAL_AGE_DRIFT_MAX,
    VERBAL_AGE_DRIFT_MIN, VERBAL_SLIP_CHANCE, WALK_IN_SECONDS,
};
use crate::personality::{DialogueStage, Personality};
use crate::tables::{FIRST_NAMES, ORIGINS, SURNAMES, ShiftConfig};
use crate::upgrades::{EffectSet, UpgradeEffect};

/// Monotonic identifier assigned by the shift session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SubjectId(pub u64);

impl SubjectId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Human,
    Anomaly,
    Criminal,
    Refugee,
    Insider,
    Infected,
    Doppelganger,
    Sleeper,
}

impl SubjectType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Anomaly => "anomaly",
            Self::Criminal => "criminal",
            Self::Refugee => "refugee",
            Self::Insider => "insider",
            Self::Infected => "infected",
            Self::Doppelganger => "doppelganger",
            Self::Sleeper => "sleeper",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Biometrics {
    pub limbs: u8,
    pub eyes: u8,
    pub fingers: u8,
}

impl Biometrics {
    pub const BASELINE: Self = Self {
        limbs: BASELINE_LIMBS,
        eyes: BASELINE_EYES,
        fingers: BASELINE_FINGERS,
    };

    /// First dimension that differs from the human baseline.
    #[must_use]
    pub const fn deviation(&self) -> Option<Deviation> {
        if self.limbs != BASELINE_LIMBS {
            Some(Deviation::Limbs(self.limbs))
        } else if self.eyes != BASELINE_EYES {
            Some(Deviation::Eyes(self.eyes))
        } else if self.fingers != BASELINE_FINGERS {
            Some(Deviation::Fingers(self.fingers))
        } else {
            None
        }
    }
}

impl Default for Biometrics {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Biometric dimension that gives an anomaly away, with the observed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "count")]
pub enum Deviation {
    Limbs(u8),
    Eyes(u8),
    Fingers(u8),
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limbs(n) => write!(f, "{n} limbs"),
            Self::Eyes(n) => write!(f, "{n} eyes"),
            Self::Fingers(n) => write!(f, "{n} fingers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCard {
    pub name: String,
    pub surname: String,
    pub age: u8,
    pub place_of_birth: String,
    pub photo_matches: bool,
    pub is_stolen: bool,
}

impl IdCard {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// What the subject says when questioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbalClaims {
    pub name: String,
    pub age: u8,
    pub origin: String,
}

/// Field where the verbal claim contradicts the ID card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discrepancy {
    Name,
    Age,
    Origin,
}

impl Discrepancy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Origin => "origin",
        }
    }
}

pub type Discrepancies = SmallVec<[Discrepancy; 3]>;

/// A person (or something wearing one) waiting at the booth window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub subject_type: SubjectType,
    pub is_anomaly: bool,
    pub is_criminal: bool,
    pub personality: Personality,
    pub actual: Biometrics,
    pub reported: Biometrics,
    pub claimed_origin: String,
    pub actual_origin: String,
    pub story_consistent: bool,
    pub id_card: IdCard,
    pub verbal: VerbalClaims,
    pub discrepancies: Discrepancies,
    pub dialogue_variant: usize,
    pub stage: DialogueStage,
    pub walk_in_elapsed: f32,
    pub auto_approve_remaining: f32,
    pub scanned: bool,
    pub questioned: bool,
    pub id_visible: bool,
}

impl Subject {
    #[must_use]
    pub fn display_name(&self) -> String {
        self.id_card.full_name()
    }

    /// Walk-in progress in `[0, 1]`.
    #[must_use]
    pub fn walk_in_progress(&self) -> f32 {
        (self.walk_in_elapsed / WALK_IN_SECONDS).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.walk_in_elapsed >= WALK_IN_SECONDS
    }

    /// Advance the walk-in; returns `true` on the tick the subject arrives.
    pub fn advance_walk_in(&mut self, dt: f32) -> bool {
        let was_arrived = self.has_arrived();
        self.walk_in_elapsed = (self.walk_in_elapsed + dt).min(WALK_IN_SECONDS);
        !was_arrived && self.has_arrived()
    }

    /// Biometrics the operator currently sees.
    #[must_use]
    pub const fn visible_biometrics(&self) -> Biometrics {
        if self.scanned { self.actual } else { self.reported }
    }

    #[must_use]
    pub fn defect(&self) -> Option<Deviation> {
        self.actual.deviation()
    }

    /// Mark as scanned; returns `false` if it had already been scanned.
    pub fn scan(&mut self) -> bool {
        if self.scanned {
            return false;
        }
        self.scanned = true;
        self.stage = DialogueStage::AfterScan;
        true
    }

    /// Mark as questioned; returns `false` if it had already been questioned.
    pub fn question(&mut self) -> bool {
        if self.questioned {
            return false;
        }
        self.questioned = true;
        self.stage = if self.discrepancies.is_empty() {
            DialogueStage::UnderPressure
        } else {
            DialogueStage::Contradiction
        };
        true
    }

    pub fn toggle_id(&mut self) {
        self.id_visible = !self.id_visible;
    }

    #[must_use]
    pub fn current_line(&self) -> &'static str {
        self.personality
            .dialogue()
            .line(self.stage, self.dialogue_variant)
    }
}

/// Auto-approve budget for a fresh subject given the active upgrades.
#[must_use]
pub fn auto_approve_budget(effects: EffectSet) -> f32 {
    if effects.contains(UpgradeEffect::ExtraTime) {
        AUTO_APPROVE_SECONDS + EXTRA_TIME_SECONDS
    } else {
        AUTO_APPROVE_SECONDS
    }
}

/// Generate a fresh subject for the given shift.
pub fn generate<R: Rng + ?Sized>(
    id: SubjectId,
    shift: &ShiftConfig,
    effects: EffectSet,
    rng: &mut R,
) -> Subject {
    let roll: f32 = rng.r#gen();
    let (subject_type, is_anomaly, is_criminal) =
        classify(roll, shift.anomaly_chance, shift.criminal_chance, rng);
    let personality = pick_personality(subject_type, is_anomaly, is_criminal, rng);
    let suspect = is_anomaly || is_criminal;

    let actual = if is_anomaly {
        deviant_biometrics(rng)
    } else {
        Biometrics::BASELINE
    };

    let claimed_origin = pick(ORIGINS, rng).to_string();
    let actual_origin = if suspect && rng.gen_bool(ORIGIN_LIE_CHANCE) {
        pick_other(ORIGINS, &claimed_origin, rng).to_string()
    } else {
        claimed_origin.clone()
    };
    let story_consistent = claimed_origin == actual_origin;

    let is_stolen = is_criminal && rng.gen_bool(STOLEN_ID_CHANCE);
    let photo_fails = is_anomaly
        && subject_type != SubjectType::Doppelganger
        && rng.gen_bool(PHOTO_MISMATCH_CHANCE);
    let id_card = IdCard {
        name: pick(FIRST_NAMES, rng).to_string(),
        surname: pick(SURNAMES, rng).to_string(),
        age: rng.gen_range(SUBJECT_AGE_MIN..=SUBJECT_AGE_MAX),
        place_of_birth: claimed_origin.clone(),
        photo_matches: !(is_stolen || photo_fails),
        is_stolen,
    };

    let mut discrepancies = Discrepancies::new();
    let mut verbal = VerbalClaims {
        name: id_card.name.clone(),
        age: id_card.age,
        origin: claimed_origin.clone(),
    };
    if suspect {
        if rng.gen_bool(VERBAL_SLIP_CHANCE) {
            verbal.name = pick_other(FIRST_NAMES, &id_card.name, rng).to_string();
            discrepancies.push(Discrepancy::Name);
        }
        if rng.gen_bool(VERBAL_SLIP_CHANCE) {
            let drift = rng.gen_range(VERBAL_AGE_DRIFT_MIN..=VERBAL_AGE_DRIFT_MAX);
            verbal.age = if rng.r#gen::<bool>() {
                id_card.age.saturating_add(drift)
            } else {
                id_card.age.saturating_sub(drift)
            };
            discrepancies.push(Discrepancy::Age);
        }
        if rng.gen_bool(VERBAL_SLIP_CHANCE) {
            verbal.origin = pick_other(ORIGINS, &claimed_origin, rng).to_string();
            discrepancies.push(Discrepancy::Origin);
        }
    }

    let dialogue_variant = rng.gen_range(0..8);

    Subject {
        id,
        subject_type,
        is_anomaly,
        is_criminal,
        personality,
        actual,
        reported: Biometrics::BASELINE,
        claimed_origin,
        actual_origin,
        story_consistent,
        id_card,
        verbal,
        discrepancies,
        dialogue_variant,
        stage: DialogueStage::Initial,
        walk_in_elapsed: 0.0,
        auto_approve_remaining: auto_approve_budget(effects),
        scanned: false,
        questioned: false,
        id_visible: false,
    }
}

/// Bucket a roll into a subject type and resolve its anomaly/criminal flags.
fn classify<R: Rng + ?Sized>(
    roll: f32,
    anomaly_chance: f32,
    criminal_chance: f32,
    rng: &mut R,
) -> (SubjectType, bool, bool) {
    let slices = [
        (SLICE_ANOMALY, SubjectType::Anomaly),
        (SLICE_DOPPELGANGER, SubjectType::Doppelganger),
        (SLICE_INFECTED, SubjectType::Infected),
        (SLICE_SLEEPER, SubjectType::Sleeper),
        (SLICE_REFUGEE, SubjectType::Refugee),
        (SLICE_INSIDER, SubjectType::Insider),
    ];
    let mut edge = 0.0_f32;
    for (width, subject_type) in slices {
        edge += width * anomaly_chance;
        if roll < edge {
            return match subject_type {
                SubjectType::Infected | SubjectType::Refugee => {
                    (subject_type, rng.gen_bool(AMBIGUOUS_ANOMALY_CHANCE), false)
                }
                SubjectType::Insider => {
                    let anomalous = rng.gen_bool(AMBIGUOUS_ANOMALY_CHANCE);
                    (subject_type, anomalous, !anomalous)
                }
                _ => (subject_type, true, false),
            };
        }
    }
    edge += criminal_chance;
    if roll < edge {
        return (SubjectType::Criminal, false, true);
    }
    (SubjectType::Human, false, false)
}

fn pick_personality<R: Rng + ?Sized>(
    subject_type: SubjectType,
    is_anomaly: bool,
    is_criminal: bool,
    rng: &mut R,
) -> Personality {
    if is_criminal {
        return if rng.r#gen::<bool>() {
            Personality::Suspicious
        } else {
            Personality::Aggressive
        };
    }
    match subject_type {
        SubjectType::Sleeper => Personality::Confused,
        SubjectType::Doppelganger => Personality::Calm,
        _ if is_anomaly => {
            if rng.gen_bool(ROBOTIC_ANOMALY_CHANCE) {
                Personality::Robotic
            } else {
                Personality::random(rng)
            }
        }
        _ => Personality::random(rng),
    }
}

/// Baseline biometrics with exactly one dimension pushed off-baseline.
fn deviant_biometrics<R: Rng + ?Sized>(rng: &mut R) -> Biometrics {
    let mut bio = Biometrics::BASELINE;
    match rng.gen_range(0..3) {
        0 => bio.limbs = DEVIANT_LIMBS.choose(rng).copied().unwrap_or(DEVIANT_LIMBS[0]),
        1 => bio.eyes = rng.gen_range(DEVIANT_EYES_MIN..=DEVIANT_EYES_MAX),
        _ => {
            bio.fingers = DEVIANT_FINGERS
                .choose(rng)
                .copied()
                .unwrap_or(DEVIANT_FINGERS[0]);
        }
    }
    bio
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or("Unknown")
}

/// Uniform pick that is guaranteed to differ from `current` when the pool allows it.
fn pick_other<'a, R: Rng + ?Sized>(pool: &[&'a str], current: &str, rng: &mut R) -> &'a str {
    let Some(index) = pool.iter().position(|entry| *entry == current) else {
        return pick(pool, rng);
    };
    if pool.len() < 2 {
        return pool[index];
    }
    let offset = rng.gen_range(1..pool.len());
    pool[(index + offset) % pool.len()]
}
