use std::fmt::Write as _;
use std::hash::Hasher;

use checkpoint_game::{
    GameConfig, GameContext, InputFrame, ItemKind, PlayerAction, RenderSnapshot, RunSummary,
    ShiftTable, Store,
};
use twox_hash::XxHash64;

const SNAPSHOT_HASH: u64 = 0x32b2_e294_659c_5d59;

#[test]
fn compiled_tables_snapshot_stable() {
    let canonical = canonical_tables(&ShiftTable::default(), &Store::default());
    let digest = snapshot_hash(canonical.as_bytes());
    assert_eq!(
        digest, SNAPSHOT_HASH,
        "compiled table snapshot changed\n{canonical}"
    );
}

#[test]
fn shipped_data_files_match_compiled_defaults() {
    let shifts =
        ShiftTable::from_json(include_str!("../../checkpoint-web/static/assets/data/shifts.json"))
            .unwrap();
    let store =
        Store::from_json(include_str!("../../checkpoint-web/static/assets/data/store.json"))
            .unwrap();
    shifts.validate().unwrap();
    store.validate().unwrap();
    assert_eq!(shifts, ShiftTable::default());
    assert_eq!(store, Store::default());
    assert_eq!(shifts.final_shift(), 5);
}

#[test]
fn config_round_trips_through_json() {
    let config = GameConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let restored = GameConfig::from_json(&json).unwrap();
    assert_eq!(config, restored);
}

#[test]
fn render_snapshot_serialization_is_lossless_mid_shift() {
    let mut ctx = GameContext::with_seed(0xFACE_B00C);
    ctx.tick(&InputFrame::with_action(PlayerAction::StartRun), 0.016);
    for _ in 0..60 {
        ctx.tick(&InputFrame::idle(), 0.05);
    }
    ctx.tick(&InputFrame::with_action(PlayerAction::Scan), 0.016);
    ctx.tick(&InputFrame::with_action(PlayerAction::ToggleId), 0.016);

    let snapshot = ctx.snapshot();
    let saved = serde_json::to_string(&snapshot).unwrap();
    let restored: RenderSnapshot = serde_json::from_str(&saved).unwrap();
    assert_eq!(
        serde_json::to_value(&snapshot).unwrap(),
        serde_json::to_value(&restored).unwrap(),
        "round-trip mismatch"
    );
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["screen"], "shift");
    assert!(value["hud"]["quota"].is_u64());
}

#[test]
fn input_frames_accept_host_json() {
    let json = r#"{
        "movement": {"x": 0.0, "y": 1.0},
        "focused": true,
        "actions": [{"type": "decide", "decision": "detain"}, {"type": "buy", "item": "coffee"}]
    }"#;
    let frame: InputFrame = serde_json::from_str(json).unwrap();
    assert!(frame.focused);
    assert!(frame.look.x.abs() < f32::EPSILON);
    assert_eq!(frame.actions.len(), 2);
    assert!(frame.has(&PlayerAction::Buy {
        item: "coffee".to_string()
    }));
}

#[test]
fn run_summary_field_names_are_stable() {
    let summary = RunSummary::collect(
        checkpoint_game::Ending::TimedOut,
        7,
        &[],
        0,
        Vec::new(),
        None,
    );
    let value = serde_json::to_value(&summary).unwrap();
    for key in [
        "ending",
        "headline",
        "seed",
        "run_code",
        "shifts_cleared",
        "escapes_survived",
        "processed",
        "correct_decisions",
        "wrong_decisions",
        "money",
        "items",
        "highway_score",
        "highway_distance",
        "score",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["ending"], "timed_out");
}

fn canonical_tables(shifts: &ShiftTable, store: &Store) -> String {
    let mut out = String::new();
    for shift in &shifts.shifts {
        let _ = writeln!(
            out,
            "shift|{}|{}|{}|{:.2}|{:.2}|{:.2}|{}",
            shift.number,
            shift.name,
            shift.quota,
            shift.stress_rate,
            shift.anomaly_chance,
            shift.criminal_chance,
            shift.base_pay
        );
    }
    for item in &store.items {
        let kind = match item.kind {
            ItemKind::Consumable(effect) => format!("consumable:{}", effect.as_str()),
            ItemKind::Permanent => "permanent".to_string(),
        };
        let _ = writeln!(out, "item|{}|{}|{kind}", item.id, item.price);
    }
    out
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
