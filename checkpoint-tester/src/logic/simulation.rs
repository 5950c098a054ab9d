//! Headless run driver: feeds a `GameContext` with frames chosen by an
//! operator policy and watches every tick for broken invariants.
use std::collections::BTreeMap;

use checkpoint_game::{
    Ending, EscapeOutcome, GameContext, GameEvent, InputFrame, PlayerAction, RunSummary, Screen,
    ShiftPhase, TickReport, Vec2,
};
use serde::{Deserialize, Serialize};

use super::policy::{OperatorPolicy, OperatorStrategy};

pub const DEFAULT_DT: f32 = 0.05;
pub const DEFAULT_MAX_TICKS: usize = 40_000;
const MAX_VIOLATIONS: usize = 25;

// Mirrors the road half-width used by the highway aim mapping.
const HIGHWAY_AIM_RANGE: f32 = 4.5;
const STUN_TRIGGER_DISTANCE: f32 = 8.0;
const HISTORY_CAPACITY: usize = 20;
const PANCAKE_POINTS: u32 = 150;
const SHOT_POINTS: u32 = 100;

/// Running counts of everything notable that happened in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTally {
    pub shifts_started: u32,
    pub shifts_completed: u32,
    pub subjects: u32,
    pub manual_decisions: u32,
    pub auto_approvals: u32,
    pub correct: u32,
    pub wrong: u32,
    pub scans: u32,
    pub questions: u32,
    pub jumpscares: u32,
    pub hallucinations: u32,
    pub ghost_accusations: u32,
    pub break_rests: u32,
    pub escapes_triggered: u32,
    pub escapes_survived: u32,
    pub stuns: u32,
    pub purchases: u32,
    pub purchase_rejections: u32,
    pub pancakes: u32,
    pub shots: u32,
}

impl EventTally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShiftStarted { .. } => self.shifts_started += 1,
            GameEvent::ShiftComplete { .. } => self.shifts_completed += 1,
            GameEvent::SubjectSpawned { .. } => self.subjects += 1,
            GameEvent::SubjectScanned { .. } => self.scans += 1,
            GameEvent::SubjectQuestioned { .. } => self.questions += 1,
            GameEvent::SubjectResolved { auto, correct, .. } => {
                if *auto {
                    self.auto_approvals += 1;
                } else {
                    self.manual_decisions += 1;
                }
                if *correct {
                    self.correct += 1;
                } else {
                    self.wrong += 1;
                }
            }
            GameEvent::Jumpscare => self.jumpscares += 1,
            GameEvent::Hallucination => self.hallucinations += 1,
            GameEvent::GhostAccusation { .. } => self.ghost_accusations += 1,
            GameEvent::BreakRest { .. } => self.break_rests += 1,
            GameEvent::EscapeTriggered => self.escapes_triggered += 1,
            GameEvent::EscapeResolved {
                outcome: EscapeOutcome::Success,
            } => self.escapes_survived += 1,
            GameEvent::EntityStunned { .. } => self.stuns += 1,
            GameEvent::Purchased { .. } => self.purchases += 1,
            GameEvent::PurchaseRejected { .. } => self.purchase_rejections += 1,
            GameEvent::ObstaclePancaked { .. } => self.pancakes += 1,
            GameEvent::ObstacleDestroyed { .. } => self.shots += 1,
            _ => {}
        }
    }
}

/// Result of one simulated run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: OperatorStrategy,
    pub ticks: usize,
    pub final_screen: Screen,
    pub run: Option<RunSummary>,
    pub tally: EventTally,
    pub cues: BTreeMap<String, u32>,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    #[must_use]
    pub fn ending(&self) -> Option<Ending> {
        self.run.as_ref().map(|run| run.ending)
    }

    #[must_use]
    pub fn ending_label(&self) -> String {
        self.ending()
            .map_or_else(|| "unfinished".to_string(), |ending| ending.to_string())
    }
}

/// Check applied to a finished run; `Err` carries the failure message.
pub type Expectation = fn(&SimulationSummary) -> anyhow::Result<()>;

/// Everything needed to play and judge one kind of run.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: OperatorStrategy,
    pub dt: f32,
    pub max_ticks: usize,
    /// Play every seed twice and require identical summaries.
    pub replay: bool,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: OperatorStrategy) -> Self {
        Self {
            strategy,
            dt: DEFAULT_DT,
            max_ticks: DEFAULT_MAX_TICKS,
            replay: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_replay(mut self) -> Self {
        self.replay = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    #[must_use]
    pub fn run(&self, seed: u64) -> SimulationSummary {
        simulate(self.strategy, seed, self.dt, self.max_ticks)
    }
}

/// Screen-level driver wrapped around a policy.
struct Operator {
    policy: Box<dyn OperatorPolicy + Send>,
    shopped_in_shift: Option<u8>,
}

impl Operator {
    fn frame(&mut self, ctx: &GameContext) -> InputFrame {
        match ctx.screen {
            Screen::Menu => InputFrame::with_action(PlayerAction::StartRun),
            Screen::Shift => self.shift_frame(ctx),
            Screen::Escape => self.escape_frame(ctx),
            Screen::Break => self.break_frame(ctx),
            Screen::Shop => self.shop_frame(ctx),
            Screen::Highway => self.highway_frame(ctx),
            Screen::Ending => InputFrame::idle(),
        }
    }

    fn shift_frame(&mut self, ctx: &GameContext) -> InputFrame {
        let Some(session) = ctx.shift.as_ref() else {
            return InputFrame::idle();
        };
        let Some(subject) = session
            .subject
            .as_ref()
            .filter(|s| session.phase == ShiftPhase::SubjectPresented && s.has_arrived())
        else {
            return InputFrame::idle();
        };
        if self.policy.inspects() {
            if !subject.scanned {
                return InputFrame::with_action(PlayerAction::Scan);
            }
            if !subject.questioned {
                return InputFrame::with_action(PlayerAction::Question);
            }
        }
        match self.policy.decide(subject) {
            Some(decision) => InputFrame::with_action(PlayerAction::Decide { decision }),
            None => InputFrame::idle(),
        }
    }

    fn escape_frame(&self, ctx: &GameContext) -> InputFrame {
        let mut frame = InputFrame::idle();
        let Some(escape) = ctx.escape.as_ref().filter(|_| self.policy.flees()) else {
            return frame;
        };
        if escape.in_safe_zone() {
            frame.actions.push(PlayerAction::Interact);
            return frame;
        }
        let body = &escape.body;
        let heading = (escape.safe_zone - body.position).normalize_or_zero();
        frame.movement = Vec2::new(heading.dot(body.right()), heading.dot(body.forward()));

        let threatened = escape.entity.is_some_and(|entity| {
            entity.active
                && !entity.is_stunned(escape.clock)
                && entity.position.distance(body.position) < STUN_TRIGGER_DISTANCE
        });
        if threatened && escape.stun_cooldown() <= 0.0 {
            frame.actions.push(PlayerAction::Fire);
        }
        frame
    }

    fn break_frame(&mut self, ctx: &GameContext) -> InputFrame {
        if !ctx.break_rest_used && ctx.carry.health < 100.0 {
            return InputFrame::with_action(PlayerAction::Rest);
        }
        if self.shopped_in_shift != Some(ctx.shift_number) {
            self.shopped_in_shift = Some(ctx.shift_number);
            return InputFrame::with_action(PlayerAction::OpenShop);
        }
        InputFrame::with_action(PlayerAction::NextShift)
    }

    fn shop_frame(&mut self, ctx: &GameContext) -> InputFrame {
        let mut frame = InputFrame::idle();
        for item in self
            .policy
            .shopping_list(ctx.economy.money, &ctx.config.store)
        {
            frame.actions.push(PlayerAction::Buy { item });
        }
        frame.actions.push(PlayerAction::NextShift);
        frame
    }

    fn highway_frame(&self, ctx: &GameContext) -> InputFrame {
        let mut frame = InputFrame::idle();
        let Some(run) = ctx.highway.as_ref().filter(|_| self.policy.shoots()) else {
            return frame;
        };
        let target = run
            .obstacles
            .iter()
            .filter(|o| o.is_live() && o.depth > 0.0)
            .min_by(|a, b| a.depth.total_cmp(&b.depth));
        if let Some(obstacle) = target {
            frame.aim_x = (obstacle.lateral / HIGHWAY_AIM_RANGE).clamp(-1.0, 1.0);
            if run.gun_cooldown <= 0.0 {
                frame.actions.push(PlayerAction::Fire);
            }
        }
        frame
    }
}

/// Play one run to the ending screen or until `max_ticks` runs out.
#[must_use]
pub fn simulate(strategy: OperatorStrategy, seed: u64, dt: f32, max_ticks: usize) -> SimulationSummary {
    let mut ctx = GameContext::with_seed(seed);
    let mut operator = Operator {
        policy: strategy.create_policy(seed),
        shopped_in_shift: None,
    };
    log::debug!("simulating seed {seed} with {} operator", operator.policy.name());

    let mut tally = EventTally::default();
    let mut cues: BTreeMap<String, u32> = BTreeMap::new();
    let mut violations = Vec::new();
    let mut ticks = 0;

    while ticks < max_ticks {
        let frame = operator.frame(&ctx);
        let report = ctx.tick(&frame, dt);
        ticks += 1;

        for cue in &report.cues {
            *cues.entry(cue.as_str().to_string()).or_default() += 1;
        }
        for event in &report.events {
            tally.record(event);
        }
        if violations.len() < MAX_VIOLATIONS {
            violations.extend(
                check_tick(&ctx, &report)
                    .into_iter()
                    .map(|v| format!("tick {ticks}: {v}")),
            );
        }
        if ctx.screen == Screen::Ending {
            break;
        }
    }

    if let Some(run) = ctx.summary.as_ref() {
        violations.extend(check_summary(run, &tally));
    }
    if ctx.screen != Screen::Ending {
        log::warn!("seed {seed}: run still on {} after {ticks} ticks", ctx.screen);
    }

    SimulationSummary {
        seed,
        strategy,
        ticks,
        final_screen: ctx.screen,
        run: ctx.summary.clone(),
        tally,
        cues,
        violations,
    }
}

const fn transition_allowed(from: Screen, to: Screen) -> bool {
    matches!(
        (from, to),
        (Screen::Menu | Screen::Ending | Screen::Break | Screen::Shop, Screen::Shift)
            | (Screen::Shift, Screen::Escape | Screen::Break | Screen::Highway)
            | (Screen::Escape, Screen::Break | Screen::Highway | Screen::Ending)
            | (Screen::Break, Screen::Shop)
            | (Screen::Shop, Screen::Break)
            | (Screen::Highway, Screen::Ending)
            | (Screen::Ending, Screen::Menu)
    )
}

fn in_meter_range(value: f32) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Per-tick invariants of the whole context.
fn check_tick(ctx: &GameContext, report: &TickReport) -> Vec<String> {
    let mut problems = Vec::new();

    for event in &report.events {
        if let GameEvent::ScreenChanged { from, to } = event
            && !transition_allowed(*from, *to)
        {
            problems.push(format!("illegal screen change {from} -> {to}"));
        }
    }

    let owner_missing = match ctx.screen {
        Screen::Shift => ctx.shift.is_none(),
        Screen::Escape => ctx.escape.is_none() || ctx.shift.is_none(),
        Screen::Highway => ctx.highway.is_none(),
        Screen::Ending => ctx.summary.is_none(),
        Screen::Menu | Screen::Break | Screen::Shop => false,
    };
    if owner_missing {
        problems.push(format!("screen {} has no state behind it", ctx.screen));
    }
    if ctx.screen != Screen::Escape && ctx.escape.is_some() {
        problems.push(format!("escape state leaked into {}", ctx.screen));
    }
    if ctx.screen == Screen::Ending && ctx.shift.is_some() {
        problems.push("shift state leaked into the ending".to_string());
    }

    if let Some(session) = ctx.shift.as_ref() {
        for (name, value) in [
            ("health", session.health),
            ("stress", session.stress),
            ("compromise", session.compromise),
        ] {
            if !in_meter_range(value) {
                problems.push(format!("{name} out of range: {value}"));
            }
        }
        if session.processed > session.config.quota {
            problems.push(format!(
                "processed {} exceeds quota {}",
                session.processed, session.config.quota
            ));
        }
        if session.history.len() > HISTORY_CAPACITY {
            problems.push(format!("decision history grew to {}", session.history.len()));
        }
        if session.subject.is_some()
            && !matches!(
                session.phase,
                ShiftPhase::SubjectPresented | ShiftPhase::EscapeTriggered
            )
        {
            problems.push(format!("subject present during {:?}", session.phase));
        }
    }
    if !in_meter_range(ctx.carry.health) {
        problems.push(format!("carried health out of range: {}", ctx.carry.health));
    }
    if ctx.economy.money < 0 {
        problems.push(format!("money went negative: {}", ctx.economy.money));
    }
    if let Some(escape) = ctx.escape.as_ref()
        && escape.outcome().is_none()
        && escape.clock > escape.duration
    {
        problems.push(format!("escape clock overran: {:.2}", escape.clock));
    }
    problems
}

/// Cross-check the run summary against what the events said.
fn check_summary(run: &RunSummary, tally: &EventTally) -> Vec<String> {
    let mut problems = Vec::new();
    if run.correct_decisions + run.wrong_decisions != run.processed {
        problems.push(format!(
            "summary decisions {} + {} != processed {}",
            run.correct_decisions, run.wrong_decisions, run.processed
        ));
    }
    if run.escapes_survived != tally.escapes_survived {
        problems.push(format!(
            "summary escapes {} != observed {}",
            run.escapes_survived, tally.escapes_survived
        ));
    }
    let expected_highway = tally.pancakes * PANCAKE_POINTS + tally.shots * SHOT_POINTS;
    if run.highway_score != expected_highway {
        problems.push(format!(
            "highway score {} != {expected_highway} from events",
            run.highway_score
        ));
    }
    if run.ending == Ending::Survived && run.highway_distance < 2_000.0 {
        problems.push(format!(
            "survived after only {:.0}m of highway",
            run.highway_distance
        ));
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_run_survives_cleanly() {
        let summary = simulate(OperatorStrategy::Perfect, 1337, DEFAULT_DT, DEFAULT_MAX_TICKS);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert_eq!(summary.ending(), Some(Ending::Survived));
        assert_eq!(summary.tally.wrong, 0);
        assert_eq!(summary.tally.shifts_completed, 5);
        assert!(summary.tally.scans > 0);
        assert!(summary.tally.purchases > 0);
        assert!(summary.cues.contains_key("approve") || summary.cues.contains_key("detain"));
    }

    #[test]
    fn idle_operator_never_decides() {
        let summary = simulate(OperatorStrategy::Idle, 7, DEFAULT_DT, DEFAULT_MAX_TICKS);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert_eq!(summary.tally.manual_decisions, 0);
        assert!(summary.tally.auto_approvals > 0);
    }

    #[test]
    fn transitions_table_rejects_shortcuts() {
        assert!(transition_allowed(Screen::Menu, Screen::Shift));
        assert!(transition_allowed(Screen::Escape, Screen::Ending));
        assert!(!transition_allowed(Screen::Menu, Screen::Highway));
        assert!(!transition_allowed(Screen::Shop, Screen::Ending));
        assert!(!transition_allowed(Screen::Break, Screen::Escape));
    }

    #[test]
    fn tally_counts_auto_and_manual_separately() {
        let mut tally = EventTally::default();
        for auto in [true, false, false] {
            tally.record(&GameEvent::SubjectResolved {
                id: checkpoint_game::SubjectId(1),
                decision: checkpoint_game::Decision::Approve,
                auto,
                correct: !auto,
                pay_delta: 0,
            });
        }
        assert_eq!(tally.auto_approvals, 1);
        assert_eq!(tally.manual_decisions, 2);
        assert_eq!(tally.correct, 2);
        assert_eq!(tally.wrong, 1);
    }
}
