//! Read-only view of the game handed to the renderer each frame.
use serde::{Deserialize, Serialize};

use crate::constants::EYE_HEIGHT;
use crate::flow::{GameContext, Screen};
use crate::highway::HighwayRun;
use crate::horror::EnvironmentParams;
use crate::motion::OperatorBody;
use crate::personality::{DialogueStage, Personality};
use crate::shift::ShiftSession;
use crate::subject::{Biometrics, Discrepancy, IdCard, Subject, VerbalClaims};
use crate::upgrades::UpgradeEffect;

const FLASHLIGHT_ITEM: &str = "flashlight";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl From<&OperatorBody> for CameraPose {
    fn from(body: &OperatorBody) -> Self {
        Self {
            x: body.position.x,
            y: EYE_HEIGHT,
            z: body.position.y,
            yaw: body.yaw,
            pitch: body.pitch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectView {
    pub id: u64,
    pub walk_in: f32,
    pub arrived: bool,
    pub personality: Personality,
    pub stage: DialogueStage,
    pub line: String,
    pub biometrics: Biometrics,
    pub scanned: bool,
    pub id_card: Option<IdCard>,
    pub verbal: Option<VerbalClaims>,
    pub hint: Option<Discrepancy>,
    pub auto_approve_remaining: f32,
}

impl SubjectView {
    fn build(subject: &Subject, hints: bool) -> Self {
        Self {
            id: subject.id.0,
            walk_in: subject.walk_in_progress(),
            arrived: subject.has_arrived(),
            personality: subject.personality,
            stage: subject.stage,
            line: subject.current_line().to_string(),
            biometrics: subject.visible_biometrics(),
            scanned: subject.scanned,
            id_card: subject.id_visible.then(|| subject.id_card.clone()),
            verbal: subject.questioned.then(|| subject.verbal.clone()),
            hint: if hints {
                subject.discrepancies.first().copied()
            } else {
                None
            },
            auto_approve_remaining: subject.auto_approve_remaining.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub x: f32,
    pub z: f32,
    pub stunned: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HudView {
    pub shift_number: u8,
    pub shift_name: String,
    pub health: f32,
    pub stress: f32,
    pub compromise: f32,
    pub processed: u32,
    pub quota: u32,
    pub shift_money: i64,
    pub money: i64,
    pub resting: bool,
    pub rest_progress: f32,
    pub can_rest: bool,
    pub escape_time_remaining: Option<f32>,
    pub stun_cooldown: f32,
    pub break_rest_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub x: f32,
    pub depth: f32,
    pub pancaked: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighwayView {
    pub player_x: f32,
    pub speed: f32,
    pub distance: f32,
    pub target_distance: f32,
    pub score: u32,
    pub health: f32,
    pub gun_cooldown: f32,
    pub obstacles: Vec<ObstacleView>,
}

impl From<&HighwayRun> for HighwayView {
    fn from(run: &HighwayRun) -> Self {
        Self {
            player_x: run.player_x,
            speed: run.speed,
            distance: run.distance,
            target_distance: run.target_distance,
            score: run.score,
            health: run.health,
            gun_cooldown: run.gun_cooldown,
            obstacles: run
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    x: o.lateral,
                    depth: o.depth,
                    pancaked: o.pancaked,
                    destroyed: o.destroyed,
                })
                .collect(),
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub screen: Screen,
    pub camera: CameraPose,
    pub subject: Option<SubjectView>,
    pub entities: Vec<EntityView>,
    pub environment: EnvironmentParams,
    pub hud: HudView,
    pub highway: Option<HighwayView>,
}

impl GameContext {
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        let flashlight = self.economy.owns(FLASHLIGHT_ITEM);
        let mut hud = HudView {
            shift_number: self.shift_number,
            health: self.carry.health,
            compromise: self.carry.compromise,
            money: self.economy.money,
            break_rest_available: self.screen == Screen::Break && !self.break_rest_used,
            ..HudView::default()
        };
        let mut camera = CameraPose::default();
        let mut subject = None;
        let mut environment = EnvironmentParams::from_meters(0.0, hud.compromise, flashlight, false);

        if let Some(session) = self.shift.as_ref() {
            fill_shift_hud(&mut hud, session);
            camera = CameraPose::from(&session.body);
            let hints = session.effects.contains(UpgradeEffect::AnomalyHint);
            subject = session
                .subject
                .as_ref()
                .map(|s| SubjectView::build(s, hints));
            environment = EnvironmentParams::from_meters(
                session.stress,
                session.compromise,
                flashlight,
                session.hallucinating(),
            );
        }

        let mut entities = Vec::new();
        if let Some(escape) = self.escape.as_ref() {
            camera = CameraPose::from(&escape.body);
            hud.escape_time_remaining = Some(escape.time_remaining());
            hud.stun_cooldown = escape.stun_cooldown();
            subject = None;
            entities.extend(escape.entity.iter().map(|e| EntityView {
                x: e.position.x,
                z: e.position.y,
                stunned: e.is_stunned(escape.clock),
                active: e.active,
            }));
        }

        let highway = self
            .highway
            .as_ref()
            .filter(|_| self.screen == Screen::Highway)
            .map(HighwayView::from);

        RenderSnapshot {
            screen: self.screen,
            camera,
            subject,
            entities,
            environment,
            hud,
            highway,
        }
    }
}

fn fill_shift_hud(hud: &mut HudView, session: &ShiftSession) {
    hud.shift_name.clone_from(&session.config.name);
    hud.health = session.health;
    hud.stress = session.stress;
    hud.compromise = session.compromise;
    hud.processed = session.processed;
    hud.quota = session.config.quota;
    hud.shift_money = session.shift_money;
    hud.resting = session.is_resting();
    hud.rest_progress = session.rest_progress().unwrap_or(0.0);
    hud.can_rest = !session.is_resting() && session.in_rest_zone();
}
