use checkpoint_game::{
    Decision, GameContext, InputBuffer, PlayerAction, Screen, SoundCue, TickReport,
    encode_friendly, generate_code_from_entropy,
};
use checkpoint_web::bridge::{
    self, BridgeError, KeyBinding, apply_key, cue_names, key_binding, parse_action, parse_frame,
    seed_from_code,
};

#[test]
fn host_frames_are_sanitized() {
    let frame = parse_frame(
        r#"{"movement":{"x":3.0,"y":-0.5},"aim_x":-7.0,"focused":true,"actions":[{"type":"fire"}]}"#,
    )
    .unwrap();
    assert!((frame.movement.x - 1.0).abs() < f32::EPSILON);
    assert!((frame.movement.y + 0.5).abs() < f32::EPSILON);
    assert!((frame.aim_x + 1.0).abs() < f32::EPSILON);
    assert_eq!(frame.actions, vec![PlayerAction::Fire]);
}

#[test]
fn malformed_payloads_are_errors() {
    assert!(matches!(parse_frame("{"), Err(BridgeError::Malformed(_))));
    assert!(matches!(
        parse_action(r#"{"type":"dance"}"#),
        Err(BridgeError::Malformed(_))
    ));
    assert_eq!(
        parse_action(r#"{"type":"decide","decision":"terminate"}"#).unwrap(),
        PlayerAction::Decide {
            decision: Decision::Terminate
        }
    );
}

#[test]
fn run_codes_resolve_to_seeds() {
    let code = generate_code_from_entropy(0x1234_5678);
    let seed = seed_from_code(&code).unwrap();
    assert_eq!(encode_friendly(seed), code);
    assert_eq!(seed_from_code(&code.to_lowercase()).unwrap(), seed);
    let err = seed_from_code("  nonsense ").unwrap_err();
    assert_eq!(err.to_string(), "unrecognised run code `nonsense`");
}

#[test]
fn cue_names_follow_emission_order() {
    let mut report = TickReport::default();
    report.cue(SoundCue::GunFire);
    report.cue(SoundCue::EntityCatch);
    assert_eq!(cue_names(&report), vec!["gun_fire", "entity_catch"]);
}

#[test]
fn every_bound_key_maps_to_a_distinct_binding() {
    let codes = [
        "KeyW", "KeyS", "KeyA", "KeyD", "Digit1", "Digit2", "Digit3", "KeyF", "KeyQ", "KeyI",
        "KeyR", "KeyE", "Space", "Enter", "KeyB", "Escape", "KeyN", "KeyM",
    ];
    let bindings: Vec<KeyBinding> = codes.iter().filter_map(|c| key_binding(c)).collect();
    assert_eq!(bindings.len(), codes.len());
    for (i, a) in bindings.iter().enumerate() {
        for b in &bindings[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn keyboard_drives_the_context_through_the_buffer() {
    let mut ctx = GameContext::with_seed(7);
    ctx.input.set_focused(true);
    assert!(apply_key(&mut ctx.input, "Enter", true, false));
    ctx.tick_buffered(bridge::frame_seconds(16.0));
    assert_eq!(ctx.screen, Screen::Shift);

    // Screen changes reset held keys.
    let mut buffer = InputBuffer::default();
    buffer.set_focused(true);
    apply_key(&mut buffer, "KeyW", true, false);
    buffer.reset();
    assert!(buffer.drain().movement.y.abs() < f32::EPSILON);
}
