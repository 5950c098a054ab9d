//! Per-shift simulation: subject queue, meters, rest and escape trigger.
use serde::{Deserialize, Serialize};

use crate::adjudicator::{
    AdjudicationContext, Decision, DecisionHistory, DecisionRecord, Verdict, adjudicate,
};
use crate::audio::SoundCue;
use crate::constants::{
    BETTER_REST_MULTIPLIER, BOOTH_HALF_DEPTH, BOOTH_HALF_WIDTH, BOOTH_REST_ZONE,
    COFFEE_STRESS_MULTIPLIER, COMPROMISE_RATE, CRITICAL_HEALTH, ESCAPE_RECOVERY_HEALTH,
    FIRST_SUBJECT_DELAY_SECONDS, HEALTH_STRESS_DIVISOR, JUMPSCARE_COOLDOWN_SECONDS, METER_MAX,
    OPERATOR_WALK_SPEED, QUESTION_STRESS_COST, RESOLVE_DELAY_SECONDS, REST_COMPROMISE_RELIEF,
    REST_STEP_SECONDS, REST_STEPS, REST_STRESS_PER_STEP, REST_ZONE_RADIUS, STARTING_HEALTH,
};
use crate::events::{GameEvent, TickReport};
use crate::geometry::Vec2;
use crate::horror::HorrorState;
use crate::input::{InputFrame, PlayerAction};
use crate::motion::{Bounds, OperatorBody};
use crate::numbers::clamp_meter;
use crate::rng::RngBundle;
use crate::subject::{Subject, SubjectId, generate};
use crate::tables::ShiftConfig;
use crate::upgrades::{EffectSet, UpgradeEffect};

/// Where the shift is in its subject cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum ShiftPhase {
    AwaitingSubject { delay: f32 },
    SubjectPresented,
    Resolving { remaining: f32 },
    Complete,
    EscapeTriggered,
}

/// Source of a jump-scare request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpscareClass {
    WrongDecision,
    EntityCatch,
}

/// Cooldown gate for jump-scares. Entity catches bypass it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JumpscareGate {
    cooldown: f32,
}

impl JumpscareGate {
    pub fn tick(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    /// Try to fire; returns `true` if the scare plays.
    pub fn fire(&mut self, class: JumpscareClass, report: &mut TickReport) -> bool {
        if class != JumpscareClass::EntityCatch && self.cooldown > 0.0 {
            log::trace!("jumpscare suppressed, {:.2}s cooldown left", self.cooldown);
            return false;
        }
        self.cooldown = JUMPSCARE_COOLDOWN_SECONDS;
        report.cue(match class {
            JumpscareClass::WrongDecision => SoundCue::Jumpscare,
            JumpscareClass::EntityCatch => SoundCue::EntityCatch,
        });
        report.event(GameEvent::Jumpscare);
        true
    }

    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.cooldown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
struct RestState {
    elapsed: f32,
    steps_done: u8,
}

/// State that survives from one shift to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carryover {
    pub health: f32,
    pub compromise: f32,
    pub escape_armed: bool,
    pub next_subject_id: SubjectId,
    pub history: DecisionHistory,
}

impl Default for Carryover {
    fn default() -> Self {
        Self {
            health: STARTING_HEALTH,
            compromise: 0.0,
            escape_armed: true,
            next_subject_id: SubjectId(1),
            history: DecisionHistory::default(),
        }
    }
}

/// Tally handed to the flow when a shift ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftOutcome {
    pub number: u8,
    pub processed: u32,
    pub correct_decisions: u32,
    pub wrong_decisions: u32,
    pub shift_money: i64,
    pub escaped: bool,
}

/// One shift at the booth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSession {
    pub config: ShiftConfig,
    pub effects: EffectSet,
    pub phase: ShiftPhase,
    pub health: f32,
    pub stress: f32,
    pub compromise: f32,
    pub processed: u32,
    pub correct_decisions: u32,
    pub wrong_decisions: u32,
    pub shift_money: i64,
    pub subject: Option<Subject>,
    pub history: DecisionHistory,
    pub body: OperatorBody,
    pub jumpscares: JumpscareGate,
    pub elapsed: f32,
    next_subject_id: SubjectId,
    rest: Option<RestState>,
    escape_armed: bool,
    escaped: bool,
    horror: HorrorState,
}

impl ShiftSession {
    /// Open a shift. Stress starts at zero and carried compromise is halved.
    #[must_use]
    pub fn begin(config: ShiftConfig, effects: EffectSet, carry: Carryover) -> Self {
        log::info!(
            "shift {} ({}) begins: quota {}, health {:.1}",
            config.number,
            config.name,
            config.quota,
            carry.health
        );
        Self {
            config,
            effects,
            phase: ShiftPhase::AwaitingSubject {
                delay: FIRST_SUBJECT_DELAY_SECONDS,
            },
            health: clamp_meter(carry.health),
            stress: 0.0,
            compromise: clamp_meter(carry.compromise * 0.5),
            processed: 0,
            correct_decisions: 0,
            wrong_decisions: 0,
            shift_money: 0,
            subject: None,
            history: carry.history,
            body: OperatorBody::default(),
            jumpscares: JumpscareGate::default(),
            elapsed: 0.0,
            next_subject_id: carry.next_subject_id,
            rest: None,
            escape_armed: carry.escape_armed,
            escaped: false,
            horror: HorrorState::default(),
        }
    }

    #[must_use]
    pub const fn is_resting(&self) -> bool {
        self.rest.is_some()
    }

    /// Rest progress in `[0, 1]`, if resting.
    #[must_use]
    pub fn rest_progress(&self) -> Option<f32> {
        self.rest
            .map(|rest| f32::from(rest.steps_done) / f32::from(REST_STEPS))
    }

    #[must_use]
    pub fn hallucinating(&self) -> bool {
        self.horror.hallucinating()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.phase, ShiftPhase::Complete)
    }

    #[must_use]
    pub const fn escape_triggered(&self) -> bool {
        matches!(self.phase, ShiftPhase::EscapeTriggered)
    }

    #[must_use]
    pub const fn escape_armed(&self) -> bool {
        self.escape_armed
    }

    #[must_use]
    pub fn in_rest_zone(&self) -> bool {
        self.body.position.distance(Vec2::from_tuple(BOOTH_REST_ZONE)) <= REST_ZONE_RADIUS
    }

    /// Advance the shift by one tick. Unfocused frames pause the simulation.
    pub fn tick(
        &mut self,
        frame: &InputFrame,
        dt: f32,
        rng: &mut RngBundle,
        report: &mut TickReport,
    ) {
        if !frame.focused || matches!(self.phase, ShiftPhase::Complete | ShiftPhase::EscapeTriggered)
        {
            return;
        }
        self.elapsed += dt;
        self.jumpscares.tick(dt);

        let bounds = Bounds::centered(BOOTH_HALF_WIDTH, BOOTH_HALF_DEPTH);
        if self.body.integrate(frame, dt, OPERATOR_WALK_SPEED, &bounds) {
            report.cue(SoundCue::Footstep);
        }

        for action in &frame.actions {
            self.handle_action(action, report);
            if self.escape_triggered() {
                return;
            }
        }

        self.advance_rest(dt, report);
        self.accumulate_meters(dt);
        self.advance_subject(dt, rng, report);
        if self.escape_triggered() {
            return;
        }

        self.horror
            .tick(self.compromise, &self.history, dt, rng.horror(), report);
        self.check_escape(report);
    }

    fn handle_action(&mut self, action: &PlayerAction, report: &mut TickReport) {
        match action {
            PlayerAction::Decide { decision } => self.submit_decision(*decision, report),
            PlayerAction::Rest => self.request_rest(report),
            PlayerAction::Scan => {
                if let Some(subject) = self.inspectable_subject()
                    && subject.scan()
                {
                    let id = subject.id;
                    report.event(GameEvent::SubjectScanned { id });
                }
            }
            PlayerAction::Question => {
                if let Some(subject) = self.inspectable_subject()
                    && subject.question()
                {
                    let id = subject.id;
                    report.event(GameEvent::SubjectQuestioned { id });
                    self.stress = clamp_meter(self.stress + QUESTION_STRESS_COST);
                }
            }
            PlayerAction::ToggleId => {
                if let Some(subject) = self.inspectable_subject() {
                    subject.toggle_id();
                }
            }
            other => log::trace!("shift ignores {other:?}"),
        }
    }

    fn inspectable_subject(&mut self) -> Option<&mut Subject> {
        if self.phase != ShiftPhase::SubjectPresented || self.is_resting() {
            return None;
        }
        self.subject.as_mut().filter(|subject| subject.has_arrived())
    }

    /// Manual decision. Ignored outside `SubjectPresented`, while resting,
    /// or before the subject reaches the window.
    pub fn submit_decision(&mut self, decision: Decision, report: &mut TickReport) {
        if self.inspectable_subject().is_none() {
            log::debug!("decision {decision} ignored in {:?}", self.phase);
            return;
        }
        self.resolve(decision, false, report);
    }

    /// Begin resting when standing in the rest zone.
    pub fn request_rest(&mut self, report: &mut TickReport) {
        if self.is_resting() || !self.in_rest_zone() {
            log::trace!("rest refused");
            return;
        }
        self.rest = Some(RestState::default());
        report.cue(SoundCue::Rest);
        report.event(GameEvent::RestStarted);
    }

    fn advance_rest(&mut self, dt: f32, report: &mut TickReport) {
        let Some(mut rest) = self.rest else {
            return;
        };
        let per_step = if self.effects.contains(UpgradeEffect::BetterRest) {
            REST_STRESS_PER_STEP * BETTER_REST_MULTIPLIER
        } else {
            REST_STRESS_PER_STEP
        };
        rest.elapsed += dt;
        while rest.elapsed >= REST_STEP_SECONDS && rest.steps_done < REST_STEPS {
            rest.elapsed -= REST_STEP_SECONDS;
            rest.steps_done += 1;
            self.stress = clamp_meter(self.stress - per_step);
        }
        if rest.steps_done >= REST_STEPS {
            self.rest = None;
            self.compromise = clamp_meter(self.compromise - REST_COMPROMISE_RELIEF);
            report.event(GameEvent::RestFinished);
        } else {
            self.rest = Some(rest);
        }
    }

    fn accumulate_meters(&mut self, dt: f32) {
        let missing_health = METER_MAX - self.health;
        let coffee = if self.effects.contains(UpgradeEffect::StressReduction) {
            COFFEE_STRESS_MULTIPLIER
        } else {
            1.0
        };
        let stress_gain =
            dt * self.config.stress_rate * (1.0 + missing_health / HEALTH_STRESS_DIVISOR) * coffee;
        self.stress = clamp_meter(self.stress + stress_gain);

        let pressure = self.stress / METER_MAX + missing_health / METER_MAX;
        self.compromise = clamp_meter(self.compromise + dt * COMPROMISE_RATE * pressure);
    }

    fn advance_subject(&mut self, dt: f32, rng: &mut RngBundle, report: &mut TickReport) {
        if let ShiftPhase::Resolving { remaining } = self.phase {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.phase = ShiftPhase::Resolving { remaining };
                return;
            }
            if self.processed >= self.config.quota {
                self.complete(report);
                return;
            }
            self.phase = ShiftPhase::AwaitingSubject { delay: 0.0 };
        }

        if let ShiftPhase::AwaitingSubject { delay } = self.phase {
            let delay = delay - dt;
            if delay > 0.0 {
                self.phase = ShiftPhase::AwaitingSubject { delay };
                return;
            }
            self.spawn_subject(rng, report);
            return;
        }

        if self.phase != ShiftPhase::SubjectPresented {
            return;
        }
        let resting = self.is_resting();
        let Some(subject) = self.subject.as_mut() else {
            return;
        };
        if !subject.has_arrived() {
            if subject.advance_walk_in(dt) {
                report.event(GameEvent::SubjectArrived { id: subject.id });
            }
            return;
        }
        if resting {
            return;
        }
        subject.auto_approve_remaining -= dt;
        if subject.auto_approve_remaining <= 0.0 {
            log::debug!("subject {} auto-approved", subject.id);
            self.resolve(Decision::Approve, true, report);
        }
    }

    fn spawn_subject(&mut self, rng: &mut RngBundle, report: &mut TickReport) {
        let id = self.next_subject_id;
        self.next_subject_id = id.next();
        let subject = generate(id, &self.config, self.effects, rng.subjects());
        log::debug!(
            "subject {id} spawned as {} (anomaly={}, criminal={})",
            subject.subject_type,
            subject.is_anomaly,
            subject.is_criminal
        );
        self.subject = Some(subject);
        self.phase = ShiftPhase::SubjectPresented;
        report.event(GameEvent::SubjectSpawned { id });
    }

    fn resolve(&mut self, decision: Decision, auto: bool, report: &mut TickReport) {
        let Some(subject) = self.subject.take() else {
            return;
        };
        let ctx = AdjudicationContext {
            base_pay: self.config.base_pay,
            effects: self.effects,
        };
        let verdict = adjudicate(&subject, decision, &ctx);
        self.apply_verdict(&verdict);
        self.processed += 1;
        if verdict.correct {
            self.correct_decisions += 1;
        } else {
            self.wrong_decisions += 1;
        }
        self.history.push(DecisionRecord::from_subject(
            &subject,
            decision,
            auto,
            verdict.correct,
        ));

        report.cue(match decision {
            Decision::Approve => SoundCue::Approve,
            Decision::Detain => SoundCue::Detain,
            Decision::Terminate => SoundCue::Terminate,
        });
        report.event(GameEvent::SubjectResolved {
            id: subject.id,
            decision,
            auto,
            correct: verdict.correct,
            pay_delta: verdict.pay_delta,
        });
        if verdict.jumpscare {
            self.jumpscares.fire(JumpscareClass::WrongDecision, report);
        }

        self.phase = ShiftPhase::Resolving {
            remaining: RESOLVE_DELAY_SECONDS,
        };
        if verdict.health_delta < 0.0 {
            self.check_escape(report);
        }
    }

    fn apply_verdict(&mut self, verdict: &Verdict) {
        self.shift_money += verdict.pay_delta;
        self.health = clamp_meter(self.health + verdict.health_delta);
        self.stress = clamp_meter(self.stress + verdict.stress_delta);
        self.compromise = clamp_meter(self.compromise + verdict.compromise_delta);
    }

    /// Fire the escape once per crossing of the critical threshold.
    fn check_escape(&mut self, report: &mut TickReport) {
        if self.health > CRITICAL_HEALTH {
            self.escape_armed = true;
            return;
        }
        if !self.escape_armed {
            return;
        }
        self.escape_armed = false;
        self.rest = None;
        self.phase = ShiftPhase::EscapeTriggered;
        log::info!(
            "shift {}: health {:.1} critical, escape triggered",
            self.config.number,
            self.health
        );
        report.event(GameEvent::EscapeTriggered);
    }

    fn complete(&mut self, report: &mut TickReport) {
        self.phase = ShiftPhase::Complete;
        self.rest = None;
        log::info!(
            "shift {} complete: {} processed, {} correct, money {}",
            self.config.number,
            self.processed,
            self.correct_decisions,
            self.shift_money
        );
        report.event(GameEvent::ShiftComplete {
            number: self.config.number,
            shift_money: self.shift_money,
        });
    }

    /// Close the shift after a successful escape.
    pub fn complete_after_escape(&mut self, report: &mut TickReport) {
        self.subject = None;
        self.escaped = true;
        self.health = self.health.max(ESCAPE_RECOVERY_HEALTH);
        self.escape_armed = true;
        self.complete(report);
    }

    /// Externally applied health change (tests, hosts, scripted events).
    pub fn apply_damage(&mut self, amount: f32, report: &mut TickReport) {
        self.health = clamp_meter(self.health - amount.max(0.0));
        self.check_escape(report);
    }

    #[must_use]
    pub fn outcome(&self) -> ShiftOutcome {
        ShiftOutcome {
            number: self.config.number,
            processed: self.processed,
            correct_decisions: self.correct_decisions,
            wrong_decisions: self.wrong_decisions,
            shift_money: self.shift_money,
            escaped: self.escaped,
        }
    }

    /// State to carry into the next shift.
    #[must_use]
    pub fn into_carryover(self) -> Carryover {
        Carryover {
            health: self.health,
            compromise: self.compromise,
            escape_armed: self.escape_armed,
            next_subject_id: self.next_subject_id,
            history: self.history,
        }
    }
}
