use checkpoint_game::{
    AdjudicationContext, Biometrics, Decision, DecisionHistory, DecisionRecord, EffectSet, ShiftTable, Subject,
    SubjectId, UpgradeEffect, adjudicate, generate,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const BASE_PAY: i64 = 80;

fn subject_with(anomaly: bool, criminal: bool) -> Subject {
    let shift = ShiftTable::default().shifts[0].clone();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut subject = generate(SubjectId(1), &shift, EffectSet::empty(), &mut rng);
    subject.is_anomaly = anomaly;
    subject.is_criminal = criminal;
    subject.actual = if anomaly {
        Biometrics {
            limbs: 6,
            ..Biometrics::BASELINE
        }
    } else {
        Biometrics::BASELINE
    };
    subject
}

fn ctx(effects: EffectSet) -> AdjudicationContext {
    AdjudicationContext {
        base_pay: BASE_PAY,
        effects,
    }
}

#[test]
fn every_truth_has_a_correct_decision() {
    for (anomaly, criminal) in [(false, false), (true, false), (false, true)] {
        let subject = subject_with(anomaly, criminal);
        let correct: Vec<_> = Decision::ALL
            .into_iter()
            .filter(|d| adjudicate(&subject, *d, &ctx(EffectSet::empty())).correct)
            .collect();
        assert!(!correct.is_empty(), "anomaly={anomaly} criminal={criminal}");
    }
}

#[test]
fn correct_decisions_pay_and_relieve_stress() {
    let human = subject_with(false, false);
    let verdict = adjudicate(&human, Decision::Approve, &ctx(EffectSet::empty()));
    assert!(verdict.correct);
    assert_eq!(verdict.pay_delta, BASE_PAY);
    assert!(verdict.stress_delta < 0.0);
    assert!(verdict.health_delta.abs() < f32::EPSILON);
    assert!(!verdict.jumpscare);

    let anomaly = subject_with(true, false);
    for decision in [Decision::Detain, Decision::Terminate] {
        let verdict = adjudicate(&anomaly, decision, &ctx(EffectSet::empty()));
        assert!(verdict.correct);
        assert_eq!(verdict.pay_delta, BASE_PAY);
    }
}

#[test]
fn approving_a_criminal_is_correct_but_docked() {
    let criminal = subject_with(false, true);
    let approve = adjudicate(&criminal, Decision::Approve, &ctx(EffectSet::empty()));
    let detain = adjudicate(&criminal, Decision::Detain, &ctx(EffectSet::empty()));
    assert!(approve.correct);
    assert!(approve.criminal_penalty);
    assert!(approve.pay_delta < detain.pay_delta);
    assert!(detain.correct);
    assert!(!detain.criminal_penalty);
}

#[test]
fn wrong_calls_on_criminals_skip_the_jumpscare() {
    let criminal = subject_with(false, true);
    let verdict = adjudicate(&criminal, Decision::Terminate, &ctx(EffectSet::empty()));
    assert!(!verdict.correct);
    assert!(!verdict.jumpscare);
    assert!(verdict.health_delta.abs() < f32::EPSILON);
    assert!(verdict.pay_delta < 0);
    assert!(verdict.compromise_delta > 0.0);
}

#[test]
fn wrong_calls_hurt_less_with_damage_reduction() {
    let anomaly = subject_with(true, false);
    let vest: EffectSet = [UpgradeEffect::DamageReduction].into_iter().collect();
    let plain = adjudicate(&anomaly, Decision::Approve, &ctx(EffectSet::empty()));
    let padded = adjudicate(&anomaly, Decision::Approve, &ctx(vest));
    assert!(!plain.correct);
    assert!(plain.jumpscare);
    assert!(plain.health_delta < padded.health_delta);
    assert!(padded.health_delta < 0.0);
    assert!(plain.stress_delta > 0.0);
    assert!(plain.compromise_delta > 0.0);

    let human = subject_with(false, false);
    let verdict = adjudicate(&human, Decision::Terminate, &ctx(EffectSet::empty()));
    assert!(verdict.jumpscare);
}

#[test]
fn history_keeps_only_recent_mistakes() {
    let mut history = DecisionHistory::default();
    let anomaly = subject_with(true, false);
    for i in 0..30 {
        let correct = i % 3 != 0;
        history.push(DecisionRecord::from_subject(
            &anomaly,
            Decision::Approve,
            false,
            correct,
        ));
    }
    assert_eq!(history.len(), 20);
    assert!(history.mistakes().all(|r| !r.correct));
    assert!(history.mistakes().count() > 0);
    let latest = history.latest().unwrap();
    assert_eq!(latest.subject_name, anomaly.display_name());
    assert!(latest.was_anomaly);
    assert!(latest.defect.is_some());
}
