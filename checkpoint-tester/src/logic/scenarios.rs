//! Named scenarios: an operator strategy plus the expectations its runs
//! must meet.
use anyhow::{Result, ensure};
use checkpoint_game::{Ending, decode_to_seed, encode_friendly};

use super::policy::OperatorStrategy;
use super::simulation::{SimulationPlan, SimulationSummary};

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub plan: SimulationPlan,
}

impl TestScenario {
    fn new(key: &'static str, name: &'static str, plan: SimulationPlan) -> Self {
        Self { key, name, plan }
    }
}

pub fn catalog() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Smoke Test",
            SimulationPlan::new(OperatorStrategy::Perfect)
                .with_expectation(no_violations)
                .with_expectation(survived),
        ),
        TestScenario::new(
            "determinism",
            "Deterministic Replay",
            SimulationPlan::new(OperatorStrategy::Careless)
                .with_replay()
                .with_expectation(no_violations)
                .with_expectation(finished),
        ),
        TestScenario::new(
            "perfect-operator",
            "Perfect Operator",
            SimulationPlan::new(OperatorStrategy::Perfect)
                .with_expectation(no_violations)
                .with_expectation(survived)
                .with_expectation(flawless)
                .with_expectation(went_shopping)
                .with_expectation(run_code_matches_seed),
        ),
        TestScenario::new(
            "careless-operator",
            "Careless Operator",
            SimulationPlan::new(OperatorStrategy::Careless)
                .with_expectation(no_violations)
                .with_expectation(finished)
                .with_expectation(mostly_right),
        ),
        TestScenario::new(
            "random-operator",
            "Random Operator",
            SimulationPlan::new(OperatorStrategy::Random)
                .with_expectation(no_violations)
                .with_expectation(finished),
        ),
        TestScenario::new(
            "idle-operator",
            "Idle Operator",
            SimulationPlan::new(OperatorStrategy::Idle)
                .with_expectation(no_violations)
                .with_expectation(finished)
                .with_expectation(idle_run_is_lost_to_the_clock),
        ),
        TestScenario::new(
            "highway",
            "Highway Gunner",
            SimulationPlan::new(OperatorStrategy::Perfect)
                .with_expectation(survived)
                .with_expectation(shot_something),
        ),
    ]
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = key.to_lowercase();
    catalog().into_iter().find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

/// Expand `all` into every catalog key, keeping explicit keys in order.
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = requested
        .iter()
        .filter(|key| !key.eq_ignore_ascii_case("all"))
        .cloned()
        .collect();
    if requested.iter().any(|key| key.eq_ignore_ascii_case("all")) {
        for (key, _) in list_scenarios() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

fn no_violations(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "invariant violations: {}",
        summary.violations.join("; ")
    );
    Ok(())
}

fn finished(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.run.is_some(),
        "run did not reach an ending after {} ticks (stuck on {})",
        summary.ticks,
        summary.final_screen
    );
    Ok(())
}

fn survived(summary: &SimulationSummary) -> Result<()> {
    finished(summary)?;
    ensure!(
        summary.ending() == Some(Ending::Survived),
        "expected to survive, ended {}",
        summary.ending_label()
    );
    Ok(())
}

fn flawless(summary: &SimulationSummary) -> Result<()> {
    let tally = &summary.tally;
    ensure!(tally.wrong == 0, "{} wrong calls", tally.wrong);
    ensure!(tally.auto_approvals == 0, "{} subjects timed out", tally.auto_approvals);
    ensure!(tally.escapes_triggered == 0, "escape triggered on a clean run");
    Ok(())
}

fn went_shopping(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.tally.purchases > 0, "never bought anything");
    let items = summary.run.as_ref().map_or(0, |run| run.items.len());
    ensure!(items > 0, "summary lists no items");
    Ok(())
}

fn run_code_matches_seed(summary: &SimulationSummary) -> Result<()> {
    let Some(run) = summary.run.as_ref() else {
        anyhow::bail!("no run summary");
    };
    ensure!(run.seed == summary.seed, "summary seed {} != {}", run.seed, summary.seed);
    let decoded = decode_to_seed(&run.run_code);
    ensure!(decoded.is_some(), "run code {} does not decode", run.run_code);
    ensure!(
        decoded.map(encode_friendly).as_deref() == Some(run.run_code.as_str()),
        "run code {} is not stable",
        run.run_code
    );
    Ok(())
}

fn mostly_right(summary: &SimulationSummary) -> Result<()> {
    let tally = &summary.tally;
    ensure!(
        tally.manual_decisions == 0 || tally.correct > tally.wrong,
        "careless operator was wrong more than right ({} vs {})",
        tally.wrong,
        tally.correct
    );
    Ok(())
}

fn idle_run_is_lost_to_the_clock(summary: &SimulationSummary) -> Result<()> {
    let tally = &summary.tally;
    ensure!(tally.manual_decisions == 0, "idle operator made decisions");
    ensure!(tally.auto_approvals > 0, "no subject was auto-approved");
    if tally.escapes_triggered > 0 {
        ensure!(
            matches!(summary.ending(), Some(Ending::Caught | Ending::TimedOut)),
            "idle operator left the escape alive ({})",
            summary.ending_label()
        );
    }
    Ok(())
}

fn shot_something(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.tally.shots > 0, "no obstacle was shot");
    let score = summary.run.as_ref().map_or(0, |run| run.highway_score);
    ensure!(score > 0, "highway score stayed at zero");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_resolvable() {
        let listed = list_scenarios();
        for (key, name) in &listed {
            let scenario = get_scenario(key).unwrap();
            assert_eq!(scenario.name, *name);
        }
        let mut keys: Vec<_> = listed.iter().map(|(key, _)| *key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), listed.len());
        assert!(get_scenario("SMOKE").is_some());
        assert!(get_scenario("nope").is_none());
    }

    #[test]
    fn all_expands_without_duplicates() {
        let expanded = expand_scenarios(&["idle-operator".to_string(), "all".to_string()]);
        assert_eq!(expanded.first().map(String::as_str), Some("idle-operator"));
        assert_eq!(expanded.len(), catalog().len());
    }
}
