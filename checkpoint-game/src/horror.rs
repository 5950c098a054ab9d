//! Cosmetic horror events and the environment parameters they drive.
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::adjudicator::DecisionHistory;
use crate::audio::SoundCue;
use crate::constants::{
    FLASHLIGHT_LIGHT_BONUS, FLICKER_COMPROMISE_WEIGHT, FLICKER_STRESS_WEIGHT,
    GHOST_ACCUSATION_THRESHOLD, GHOST_RATE_PER_POINT, HALLUCINATION_RATE_PER_POINT,
    HALLUCINATION_THRESHOLD, VIGNETTE_COMPROMISE_WEIGHT, VIGNETTE_STRESS_WEIGHT,
};
use crate::events::{GameEvent, TickReport};

const HALLUCINATION_SECONDS: f32 = 1.5;

/// Lighting and post-processing knobs for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentParams {
    pub light_intensity: f32,
    pub flicker: f32,
    pub vignette: f32,
    pub hallucination: bool,
}

impl EnvironmentParams {
    /// Derive environment parameters from the operator's meters.
    #[must_use]
    pub fn from_meters(stress: f32, compromise: f32, flashlight: bool, hallucinating: bool) -> Self {
        let flicker = compromise
            .mul_add(FLICKER_COMPROMISE_WEIGHT, stress * FLICKER_STRESS_WEIGHT)
            .clamp(0.0, 1.0);
        let vignette = (stress.mul_add(
            VIGNETTE_STRESS_WEIGHT,
            compromise * VIGNETTE_COMPROMISE_WEIGHT,
        ) / 100.0)
            .clamp(0.0, 1.0);
        let bonus = if flashlight { FLASHLIGHT_LIGHT_BONUS } else { 0.0 };
        Self {
            light_intensity: (1.0 - flicker * 0.5 + bonus).clamp(0.0, 1.0),
            flicker,
            vignette,
            hallucination: hallucinating,
        }
    }
}

/// Timers for in-flight horror effects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HorrorState {
    hallucination_remaining: f32,
}

impl HorrorState {
    #[must_use]
    pub fn hallucinating(&self) -> bool {
        self.hallucination_remaining > 0.0
    }

    /// Roll hallucinations and ghost accusations for this tick.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        compromise: f32,
        history: &DecisionHistory,
        dt: f32,
        rng: &mut R,
        report: &mut TickReport,
    ) {
        self.hallucination_remaining = (self.hallucination_remaining - dt).max(0.0);
        let weight = f64::from(compromise) * f64::from(dt);

        if compromise >= HALLUCINATION_THRESHOLD
            && !self.hallucinating()
            && rng.gen_bool((HALLUCINATION_RATE_PER_POINT * weight).clamp(0.0, 1.0))
        {
            self.hallucination_remaining = HALLUCINATION_SECONDS;
            report.cue(SoundCue::Hallucination);
            report.event(GameEvent::Hallucination);
        }

        if compromise >= GHOST_ACCUSATION_THRESHOLD
            && rng.gen_bool((GHOST_RATE_PER_POINT * weight).clamp(0.0, 1.0))
            && let Some(record) = history.mistakes().choose(rng)
        {
            report.event(GameEvent::GhostAccusation {
                subject_name: record.subject_name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjudicator::{Decision, DecisionRecord};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn wrong_record(name: &str) -> DecisionRecord {
        DecisionRecord {
            subject_name: name.to_string(),
            action: Decision::Approve,
            auto: false,
            was_anomaly: true,
            was_criminal: false,
            correct: false,
            defect: None,
        }
    }

    #[test]
    fn calm_booth_has_no_effects() {
        let env = EnvironmentParams::from_meters(0.0, 0.0, false, false);
        assert!(env.flicker.abs() < f32::EPSILON);
        assert!(env.vignette.abs() < f32::EPSILON);
        assert!((env.light_intensity - 1.0).abs() < f32::EPSILON);
        let dark = EnvironmentParams::from_meters(100.0, 100.0, false, false);
        let lit = EnvironmentParams::from_meters(100.0, 100.0, true, false);
        assert!(lit.light_intensity > dark.light_intensity);
        assert!((dark.vignette - 1.0).abs() < 1e-5);
    }

    #[test]
    fn nothing_happens_below_thresholds() {
        let mut state = HorrorState::default();
        let mut history = DecisionHistory::default();
        history.push(wrong_record("Vera Novak"));
        let mut rng = SmallRng::seed_from_u64(3);
        let mut report = TickReport::default();
        for _ in 0..10_000 {
            state.tick(20.0, &history, 0.1, &mut rng, &mut report);
        }
        assert!(report.is_empty());
    }

    #[test]
    fn high_compromise_produces_events_naming_mistakes() {
        let mut state = HorrorState::default();
        let mut history = DecisionHistory::default();
        history.push(wrong_record("Vera Novak"));
        let mut rng = SmallRng::seed_from_u64(4);
        let mut report = TickReport::default();
        for _ in 0..10_000 {
            state.tick(100.0, &history, 0.1, &mut rng, &mut report);
        }
        assert!(report.events.contains(&GameEvent::Hallucination));
        assert!(report.events.iter().any(|e| matches!(
            e,
            GameEvent::GhostAccusation { subject_name } if subject_name == "Vera Novak"
        )));
    }

    #[test]
    fn ghosts_need_a_mistake_to_point_at() {
        let mut state = HorrorState::default();
        let history = DecisionHistory::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut report = TickReport::default();
        for _ in 0..10_000 {
            state.tick(100.0, &history, 0.1, &mut rng, &mut report);
        }
        assert!(
            !report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GhostAccusation { .. }))
        );
    }
}
