use checkpoint_game::{
    Biometrics, DialogueStage, EffectSet, Personality, ShiftConfig, ShiftTable, SubjectId,
    SubjectType, UpgradeEffect, generate,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SAMPLE_SIZE: u32 = 10_000;
const TOLERANCE: f64 = 0.02;

fn shift_with(anomaly: f32, criminal: f32) -> ShiftConfig {
    let mut shift = ShiftTable::default().shifts[3].clone();
    shift.anomaly_chance = anomaly;
    shift.criminal_chance = criminal;
    shift
}

fn rate(hits: u32) -> f64 {
    f64::from(hits) / f64::from(SAMPLE_SIZE)
}

#[test]
fn anomaly_and_criminal_rates_track_shift_chances() {
    let shift = shift_with(0.45, 0.15);
    let mut rng = SmallRng::seed_from_u64(0xD15C_0B01);
    let mut anomalies = 0u32;
    let mut criminals = 0u32;
    for i in 0..SAMPLE_SIZE {
        let subject = generate(SubjectId(u64::from(i)), &shift, EffectSet::empty(), &mut rng);
        anomalies += u32::from(subject.is_anomaly);
        criminals += u32::from(subject.is_criminal);
    }
    // Ambiguous types (infected, refugee, insider) are anomalous half the time.
    let expected_anomaly = 0.45 * (0.40 + 0.15 + 0.10 + 0.5 * (0.15 + 0.10 + 0.10));
    let expected_criminal = 0.15 + 0.45 * 0.10 * 0.5;
    assert!(
        (rate(anomalies) - expected_anomaly).abs() < TOLERANCE,
        "anomaly rate {} expected {expected_anomaly}",
        rate(anomalies)
    );
    assert!(
        (rate(criminals) - expected_criminal).abs() < TOLERANCE,
        "criminal rate {} expected {expected_criminal}",
        rate(criminals)
    );
}

#[test]
fn humans_are_always_clean() {
    let shift = shift_with(0.30, 0.10);
    let mut rng = SmallRng::seed_from_u64(77);
    let mut humans = 0u32;
    for i in 0..SAMPLE_SIZE {
        let subject = generate(SubjectId(u64::from(i)), &shift, EffectSet::empty(), &mut rng);
        if subject.subject_type != SubjectType::Human {
            continue;
        }
        humans += 1;
        assert!(!subject.is_anomaly);
        assert!(!subject.is_criminal);
        assert_eq!(subject.actual, Biometrics::BASELINE);
        assert!(subject.discrepancies.is_empty());
        assert!(subject.story_consistent);
        assert!(subject.id_card.photo_matches);
        assert_eq!(subject.verbal.name, subject.id_card.name);
        assert_eq!(subject.verbal.age, subject.id_card.age);
    }
    // 1 - 0.30 - 0.10 of the pool lands on plain humans.
    assert!((rate(humans) - 0.60).abs() < TOLERANCE);
}

#[test]
fn anomalies_always_carry_a_biometric_defect() {
    let shift = shift_with(1.0, 0.0);
    let mut rng = SmallRng::seed_from_u64(9);
    for i in 0..2_000 {
        let subject = generate(SubjectId(i), &shift, EffectSet::empty(), &mut rng);
        if subject.is_anomaly {
            assert!(subject.defect().is_some(), "{:?}", subject.subject_type);
            assert_eq!(subject.reported, Biometrics::BASELINE);
        } else {
            assert_eq!(subject.defect(), None);
        }
    }
}

#[test]
fn fixed_personalities_follow_subject_type() {
    let shift = shift_with(1.0, 0.0);
    let mut rng = SmallRng::seed_from_u64(31);
    for i in 0..3_000 {
        let subject = generate(SubjectId(i), &shift, EffectSet::empty(), &mut rng);
        match subject.subject_type {
            SubjectType::Sleeper => assert_eq!(subject.personality, Personality::Confused),
            SubjectType::Doppelganger => {
                assert_eq!(subject.personality, Personality::Calm);
                assert!(subject.id_card.photo_matches);
            }
            _ => {}
        }
        if subject.is_criminal {
            assert!(matches!(
                subject.personality,
                Personality::Suspicious | Personality::Aggressive
            ));
        }
    }
}

#[test]
fn fresh_subjects_start_unrevealed() {
    let shift = shift_with(0.45, 0.15);
    let mut rng = SmallRng::seed_from_u64(5);
    let extra: EffectSet = [UpgradeEffect::ExtraTime].into_iter().collect();
    let plain = generate(SubjectId(1), &shift, EffectSet::empty(), &mut rng);
    let patient = generate(SubjectId(2), &shift, extra, &mut rng);
    for subject in [&plain, &patient] {
        assert_eq!(subject.stage, DialogueStage::Initial);
        assert!(!subject.scanned);
        assert!(!subject.questioned);
        assert!(!subject.id_visible);
        assert!(!subject.has_arrived());
        assert!(!subject.current_line().is_empty());
    }
    assert!(patient.auto_approve_remaining > plain.auto_approve_remaining);
}

#[test]
fn generation_is_deterministic_per_seed() {
    let shift = shift_with(0.45, 0.15);
    let run = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..50)
            .map(|i| generate(SubjectId(i), &shift, EffectSet::empty(), &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}
