//! Screen flow and the game context that owns every sub-state machine.
//!
//! `GameContext::tick` is the single mutator: it sanitizes `dt`, routes the
//! frame to whichever sub-state the current screen owns, and performs screen
//! transitions. Leaving a screen drops its sub-state together with its timers.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audio::SoundCue;
use crate::config::GameConfig;
use crate::constants::{BETTER_REST_MULTIPLIER, BREAK_REST_HEALTH, MAX_TICK_DT};
use crate::escape::{EscapeController, EscapeOutcome};
use crate::events::{GameEvent, TickReport};
use crate::highway::{HighwayOutcome, HighwayRun};
use crate::input::{InputBuffer, InputFrame, PlayerAction};
use crate::numbers::clamp_meter;
use crate::result::{Ending, RunSummary};
use crate::rng::RngBundle;
use crate::shift::{Carryover, ShiftOutcome, ShiftSession};
use crate::store::Economy;
use crate::tables::ConfigError;
use crate::upgrades::UpgradeEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Menu,
    Shift,
    Escape,
    Break,
    Shop,
    Highway,
    Ending,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Menu => "menu",
            Self::Shift => "shift",
            Self::Escape => "escape",
            Self::Break => "break",
            Self::Shop => "shop",
            Self::Highway => "highway",
            Self::Ending => "ending",
        })
    }
}

/// Clamp a frame delta into `[0, MAX_TICK_DT]`, treating garbage as zero.
#[must_use]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_TICK_DT)
    } else {
        0.0
    }
}

/// Explicit owner of all game state.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub config: GameConfig,
    pub screen: Screen,
    pub rng: RngBundle,
    pub economy: Economy,
    pub shift_number: u8,
    pub shift: Option<ShiftSession>,
    pub escape: Option<EscapeController>,
    pub highway: Option<HighwayRun>,
    pub carry: Carryover,
    pub outcomes: Vec<ShiftOutcome>,
    pub break_rest_used: bool,
    pub summary: Option<RunSummary>,
    pub input: InputBuffer,
    pub ticks: u64,
}

impl GameContext {
    /// Build a context after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any table fails validation.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config, seed))
    }

    /// Context over the compiled-in tables.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(GameConfig::default(), seed)
    }

    fn with_config(config: GameConfig, seed: u64) -> Self {
        let economy = Economy::with_money(config.starting_money);
        Self {
            config,
            screen: Screen::Menu,
            rng: RngBundle::from_user_seed(seed),
            economy,
            shift_number: 0,
            shift: None,
            escape: None,
            highway: None,
            carry: Carryover::default(),
            outcomes: Vec::new(),
            break_rest_used: false,
            summary: None,
            input: InputBuffer::default(),
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Drain the input buffer into a frame and tick with it.
    pub fn tick_buffered(&mut self, dt: f32) -> TickReport {
        let frame = self.input.drain();
        self.tick(&frame, dt)
    }

    /// Advance the whole game by one frame.
    pub fn tick(&mut self, frame: &InputFrame, dt: f32) -> TickReport {
        let dt = sanitize_dt(dt);
        let mut report = TickReport::default();
        self.ticks = self.ticks.saturating_add(1);
        match self.screen {
            Screen::Menu => self.tick_menu(frame, &mut report),
            Screen::Shift => self.tick_shift(frame, dt, &mut report),
            Screen::Escape => self.tick_escape(frame, dt, &mut report),
            Screen::Break => self.tick_break(frame, &mut report),
            Screen::Shop => self.tick_shop(frame, &mut report),
            Screen::Highway => self.tick_highway(frame, dt, &mut report),
            Screen::Ending => self.tick_ending(frame, &mut report),
        }
        report
    }

    fn change_screen(&mut self, to: Screen, report: &mut TickReport) {
        let from = self.screen;
        if from == to {
            return;
        }
        log::debug!("screen {from} -> {to}");
        self.screen = to;
        self.input.reset();
        report.event(GameEvent::ScreenChanged { from, to });
    }

    fn tick_menu(&mut self, frame: &InputFrame, report: &mut TickReport) {
        if frame.has(&PlayerAction::StartRun) {
            self.start_run(report);
        }
    }

    /// Reset run state and open the first shift.
    pub fn start_run(&mut self, report: &mut TickReport) {
        let seed = self.seed();
        self.rng = RngBundle::from_user_seed(seed);
        self.economy = Economy::with_money(self.config.starting_money);
        self.carry = Carryover::default();
        self.outcomes.clear();
        self.shift = None;
        self.escape = None;
        self.highway = None;
        self.summary = None;
        self.shift_number = 0;
        log::info!("run started with seed {seed:#x}");
        self.begin_next_shift(report);
    }

    fn begin_next_shift(&mut self, report: &mut TickReport) {
        let number = self.shift_number.saturating_add(1);
        let Some(config) = self.config.shifts.get(number).cloned() else {
            self.enter_highway(report);
            return;
        };
        self.shift_number = number;
        let effects = self.economy.begin_shift();
        let carry = std::mem::take(&mut self.carry);
        self.shift = Some(ShiftSession::begin(config, effects, carry));
        report.event(GameEvent::ShiftStarted { number });
        self.change_screen(Screen::Shift, report);
    }

    fn tick_shift(&mut self, frame: &InputFrame, dt: f32, report: &mut TickReport) {
        let Some(session) = self.shift.as_mut() else {
            return;
        };
        session.tick(frame, dt, &mut self.rng, report);
        if session.escape_triggered() {
            let effects = session.effects;
            self.escape = Some(EscapeController::new(effects, self.rng.escape()));
            self.change_screen(Screen::Escape, report);
        } else if session.is_complete() {
            self.finish_shift(report);
        }
    }

    fn tick_escape(&mut self, frame: &InputFrame, dt: f32, report: &mut TickReport) {
        let (Some(escape), Some(session)) = (self.escape.as_mut(), self.shift.as_mut()) else {
            return;
        };
        escape.tick(frame, dt, &mut session.jumpscares, report);
        match escape.outcome() {
            None => {}
            Some(EscapeOutcome::Success) => {
                session.complete_after_escape(report);
                self.escape = None;
                self.finish_shift(report);
            }
            Some(EscapeOutcome::Caught) => self.end_run(Ending::Caught, report),
            Some(EscapeOutcome::TimedOut) => self.end_run(Ending::TimedOut, report),
        }
    }

    fn finish_shift(&mut self, report: &mut TickReport) {
        let Some(session) = self.shift.take() else {
            return;
        };
        let outcome = session.outcome();
        self.economy.deposit(outcome.shift_money);
        self.outcomes.push(outcome);
        self.carry = session.into_carryover();
        self.escape = None;

        if self.config.shifts.is_final(outcome.number) {
            self.enter_highway(report);
        } else {
            self.break_rest_used = false;
            self.change_screen(Screen::Break, report);
        }
    }

    fn tick_break(&mut self, frame: &InputFrame, report: &mut TickReport) {
        for action in &frame.actions {
            match action {
                PlayerAction::Rest => self.break_rest(report),
                PlayerAction::OpenShop => {
                    self.change_screen(Screen::Shop, report);
                    return;
                }
                PlayerAction::NextShift => {
                    self.begin_next_shift(report);
                    return;
                }
                other => log::trace!("break room ignores {other:?}"),
            }
        }
    }

    /// One rest per break, restoring health.
    pub fn break_rest(&mut self, report: &mut TickReport) {
        if self.break_rest_used {
            report.cue(SoundCue::Error);
            return;
        }
        self.break_rest_used = true;
        let gain = if self.economy.pending.contains(UpgradeEffect::BetterRest) {
            BREAK_REST_HEALTH * BETTER_REST_MULTIPLIER
        } else {
            BREAK_REST_HEALTH
        };
        self.carry.health = clamp_meter(self.carry.health + gain);
        report.cue(SoundCue::Rest);
        report.event(GameEvent::BreakRest {
            health: self.carry.health,
        });
    }

    fn tick_shop(&mut self, frame: &InputFrame, report: &mut TickReport) {
        for action in &frame.actions {
            match action {
                PlayerAction::Buy { item } => self.buy(item, report),
                PlayerAction::CloseShop => {
                    self.change_screen(Screen::Break, report);
                    return;
                }
                PlayerAction::NextShift => {
                    self.begin_next_shift(report);
                    return;
                }
                other => log::trace!("shop ignores {other:?}"),
            }
        }
    }

    /// Attempt a purchase; failures only cue an error.
    pub fn buy(&mut self, item: &str, report: &mut TickReport) {
        match self.economy.purchase(&self.config.store, item) {
            Ok(bought) => {
                report.event(GameEvent::Purchased {
                    item: bought.id.clone(),
                });
            }
            Err(err) => {
                log::debug!("purchase refused: {err}");
                report.cue(SoundCue::Error);
                report.event(GameEvent::PurchaseRejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn enter_highway(&mut self, report: &mut TickReport) {
        log::info!("all shifts cleared, entering the highway");
        self.highway = Some(HighwayRun::default());
        self.change_screen(Screen::Highway, report);
    }

    fn tick_highway(&mut self, frame: &InputFrame, dt: f32, report: &mut TickReport) {
        let Some(run) = self.highway.as_mut() else {
            return;
        };
        run.tick(frame, dt, self.rng.highway(), report);
        match run.outcome {
            None => {}
            Some(HighwayOutcome::Escaped) => self.end_run(Ending::Survived, report),
            Some(HighwayOutcome::Died) => self.end_run(Ending::Crashed, report),
        }
    }

    /// Host hook for highway hazards the core does not simulate.
    pub fn apply_external_damage(&mut self, amount: f32) -> TickReport {
        let mut report = TickReport::default();
        if self.screen != Screen::Highway {
            return report;
        }
        if let Some(run) = self.highway.as_mut() {
            run.apply_external_damage(amount, &mut report);
            if run.outcome == Some(HighwayOutcome::Died) {
                self.end_run(Ending::Crashed, &mut report);
            }
        }
        report
    }

    fn end_run(&mut self, ending: Ending, report: &mut TickReport) {
        let summary = RunSummary::collect(
            ending,
            self.seed(),
            &self.outcomes,
            self.economy.money,
            self.economy.purchased.iter().cloned().collect(),
            self.highway.as_ref(),
        );
        log::info!("run ended: {ending}, score {}", summary.score);
        self.summary = Some(summary);
        self.escape = None;
        if let Some(session) = self.shift.take() {
            self.carry = session.into_carryover();
        }
        self.change_screen(Screen::Ending, report);
    }

    fn tick_ending(&mut self, frame: &InputFrame, report: &mut TickReport) {
        if frame.has(&PlayerAction::ReturnToMenu) {
            self.shift = None;
            self.highway = None;
            self.change_screen(Screen::Menu, report);
        } else if frame.has(&PlayerAction::StartRun) {
            self.start_run(report);
        }
    }
}

/// By-value form of [`GameContext::tick`].
#[must_use]
pub fn reduce(mut ctx: GameContext, frame: &InputFrame, dt: f32) -> (GameContext, TickReport) {
    let report = ctx.tick(frame, dt);
    (ctx, report)
}
