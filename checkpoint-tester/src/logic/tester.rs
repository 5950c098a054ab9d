use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::scenarios::TestScenario;
use super::seeds::SeedInfo;
use super::simulation::{SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub run_code: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Runs per ending label, including `unfinished`.
    pub endings: BTreeMap<String, usize>,
    pub average_score: f64,
    pub average_ticks: f64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
    max_ticks: Option<usize>,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            max_ticks: None,
        }
    }

    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: Option<usize>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[SeedInfo],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut plan = scenario.plan.clone();
        if let Some(max_ticks) = self.max_ticks {
            plan.max_ticks = max_ticks;
        }

        seeds
            .iter()
            .map(|seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (operator: {} seed: {})",
                        scenario.name.bright_white(),
                        plan.strategy,
                        seed.label()
                    );
                }
                self.run_single_scenario(scenario.name, &plan, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        name: &str,
        plan: &SimulationPlan,
        seed: &SeedInfo,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut endings: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_score = 0_i64;
        let mut total_ticks = 0_usize;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed
                .seed
                .wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let summary = plan.run(iteration_seed);

            *endings.entry(summary.ending_label()).or_default() += 1;
            total_score += summary.run.as_ref().map_or(0, |run| run.score);
            total_ticks += summary.ticks;

            let verdict = evaluate_expectations(plan, &summary).or_else(|| {
                plan.replay
                    .then(|| replay_mismatch(plan, &summary))
                    .flatten()
            });

            if let Some(err) = verdict {
                failures.push(format!(
                    "Iteration {} (operator {}, seed {}, ticks {}, screen {}, ending {}): {} | {}",
                    i + 1,
                    summary.strategy,
                    summary.seed,
                    summary.ticks,
                    summary.final_screen,
                    summary.ending_label(),
                    err,
                    describe_tally(&summary)
                ));
                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);
                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) ticks:{} ending:{} score:{}",
                        i + 1,
                        iterations,
                        summary.ticks,
                        summary.ending_label(),
                        summary.run.as_ref().map_or(0, |run| run.score)
                    );
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };
        #[allow(clippy::cast_precision_loss)]
        let (average_score, average_ticks) = {
            let runs = iterations.max(1) as f64;
            (total_score as f64 / runs, total_ticks as f64 / runs)
        };

        ScenarioResult {
            scenario_name: name.to_string(),
            seed: seed.seed,
            run_code: seed.label(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            endings,
            average_score,
            average_ticks,
            average_duration,
            performance_data,
        }
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation(summary).err().map(|err| err.to_string()))
}

fn replay_mismatch(plan: &SimulationPlan, first: &SimulationSummary) -> Option<String> {
    let second = plan.run(first.seed);
    if &second == first {
        return None;
    }
    Some(format!(
        "replay diverged: ticks {} vs {}, ending {} vs {}, score {:?} vs {:?}",
        first.ticks,
        second.ticks,
        first.ending_label(),
        second.ending_label(),
        first.run.as_ref().map(|run| run.score),
        second.run.as_ref().map(|run| run.score),
    ))
}

fn describe_tally(summary: &SimulationSummary) -> String {
    let tally = &summary.tally;
    format!(
        "shifts {}/{} subjects {} correct {} wrong {} auto {} escapes {}/{} bought {} highway {}p {}s",
        tally.shifts_completed,
        tally.shifts_started,
        tally.subjects,
        tally.correct,
        tally.wrong,
        tally.auto_approvals,
        tally.escapes_survived,
        tally.escapes_triggered,
        tally.purchases,
        tally.pancakes,
        tally.shots
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenarios::get_scenario;

    #[test]
    fn smoke_scenario_passes_on_default_seed() {
        let scenario = get_scenario("smoke").unwrap();
        let results = LogicTester::new(false).run_scenario(
            &scenario,
            &[SeedInfo::from_numeric(1337)],
            1,
        );
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.passed, "{:?}", result.failures);
        assert_eq!(result.endings.get("survived"), Some(&1));
        assert!(result.average_score > 0.0);
    }

    #[test]
    fn tick_cap_turns_runs_into_failures() {
        let scenario = get_scenario("smoke").unwrap();
        let results = LogicTester::new(false)
            .with_max_ticks(Some(10))
            .run_scenario(&scenario, &[SeedInfo::from_numeric(3)], 2);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.endings.get("unfinished"), Some(&2));
    }

    #[test]
    fn result_serializes_durations_as_millis() {
        let result = ScenarioResult {
            scenario_name: "x".to_string(),
            seed: 1,
            run_code: "CP-LANTERN00".to_string(),
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            endings: BTreeMap::new(),
            average_score: 0.0,
            average_ticks: 0.0,
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_duration"], 12);
        assert_eq!(value["performance_data"][0], 12);
    }
}
