use std::fmt;

use checkpoint_game::{Decision, ItemKind, Store, Subject};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Policy interface for automated operators.
///
/// The simulation driver owns screen navigation; a policy only answers the
/// questions where operators actually differ.
pub trait OperatorPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Verdict for a subject standing at the window, or `None` to let the
    /// auto-approve clock run.
    fn decide(&mut self, subject: &Subject) -> Option<Decision>;

    /// Whether to scan and question before deciding.
    fn inspects(&self) -> bool {
        false
    }

    /// Item ids to try buying during a break.
    fn shopping_list(&mut self, _money: i64, _store: &Store) -> Vec<String> {
        Vec::new()
    }

    /// Whether to run for the door switch when the entity comes.
    fn flees(&self) -> bool {
        true
    }

    /// Whether to shoot at highway obstacles.
    fn shoots(&self) -> bool {
        true
    }
}

/// Built-in operator behaviours for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorStrategy {
    Perfect,
    Careless,
    Random,
    Idle,
}

impl OperatorStrategy {
    pub const ALL: [Self; 4] = [Self::Perfect, Self::Careless, Self::Random, Self::Idle];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Careless => "Careless",
            Self::Random => "Random",
            Self::Idle => "Idle",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn OperatorPolicy + Send> {
        match self {
            Self::Perfect => Box::new(PerfectPolicy),
            Self::Careless => Box::new(CarelessPolicy::new(seed)),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Idle => Box::new(IdlePolicy),
        }
    }
}

impl fmt::Display for OperatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The right call given the subject's hidden truth.
#[must_use]
pub const fn truthful_decision(subject: &Subject) -> Decision {
    if subject.is_anomaly {
        Decision::Terminate
    } else if subject.is_criminal {
        Decision::Detain
    } else {
        Decision::Approve
    }
}

struct PerfectPolicy;

impl OperatorPolicy for PerfectPolicy {
    fn name(&self) -> &'static str {
        "Perfect"
    }

    fn decide(&mut self, subject: &Subject) -> Option<Decision> {
        Some(truthful_decision(subject))
    }

    fn inspects(&self) -> bool {
        true
    }

    fn shopping_list(&mut self, money: i64, store: &Store) -> Vec<String> {
        // Cheapest consumable first, then anything permanent that still fits.
        let mut budget = money;
        let mut items: Vec<_> = store.items.iter().collect();
        items.sort_by_key(|item| (matches!(item.kind, ItemKind::Permanent), item.price));
        let mut list = Vec::new();
        for item in items {
            if item.price <= budget {
                budget -= item.price;
                list.push(item.id.clone());
            }
        }
        list
    }
}

/// Knows the truth but slips up now and then.
struct CarelessPolicy {
    rng: ChaCha20Rng,
    mistake_rate: f64,
}

impl CarelessPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            mistake_rate: 0.35,
        }
    }
}

impl OperatorPolicy for CarelessPolicy {
    fn name(&self) -> &'static str {
        "Careless"
    }

    fn decide(&mut self, subject: &Subject) -> Option<Decision> {
        let right = truthful_decision(subject);
        if !self.rng.gen_bool(self.mistake_rate) {
            return Some(right);
        }
        let wrong: Vec<_> = Decision::ALL
            .into_iter()
            .filter(|d| !d.is_correct_for(subject.is_anomaly, subject.is_criminal))
            .collect();
        Some(wrong.choose(&mut self.rng).copied().unwrap_or(right))
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl OperatorPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn decide(&mut self, _subject: &Subject) -> Option<Decision> {
        Decision::ALL.choose(&mut self.rng).copied()
    }

    fn inspects(&self) -> bool {
        true
    }

    fn shopping_list(&mut self, _money: i64, store: &Store) -> Vec<String> {
        // Deliberately ignores the budget so refusals get exercised.
        let count = self.rng.gen_range(0..=2);
        store
            .items
            .choose_multiple(&mut self.rng, count)
            .map(|item| item.id.clone())
            .collect()
    }

    fn shoots(&self) -> bool {
        false
    }
}

/// Never touches the controls during a shift.
struct IdlePolicy;

impl OperatorPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn decide(&mut self, _subject: &Subject) -> Option<Decision> {
        None
    }

    fn flees(&self) -> bool {
        false
    }

    fn shoots(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkpoint_game::{EffectSet, ShiftTable, SubjectId, generate};
    use rand::rngs::SmallRng;

    fn subjects(count: u64) -> Vec<Subject> {
        let shift = ShiftTable::default().shifts[4].clone();
        let mut rng = SmallRng::seed_from_u64(12);
        (0..count)
            .map(|i| generate(SubjectId(i), &shift, EffectSet::empty(), &mut rng))
            .collect()
    }

    #[test]
    fn perfect_policy_is_always_right() {
        let mut policy = OperatorStrategy::Perfect.create_policy(1);
        for subject in subjects(200) {
            let decision = policy.decide(&subject).unwrap();
            assert!(decision.is_correct_for(subject.is_anomaly, subject.is_criminal));
        }
    }

    #[test]
    fn careless_policy_makes_some_mistakes() {
        let mut policy = OperatorStrategy::Careless.create_policy(2);
        let wrong = subjects(200)
            .iter()
            .filter(|s| {
                let d = policy.decide(s).unwrap();
                !d.is_correct_for(s.is_anomaly, s.is_criminal)
            })
            .count();
        assert!(wrong > 20 && wrong < 120, "wrong {wrong}");
    }

    #[test]
    fn perfect_shopping_stays_within_budget() {
        let store = Store::default();
        let mut policy = OperatorStrategy::Perfect.create_policy(3);
        let list = policy.shopping_list(100, &store);
        let spent: i64 = list
            .iter()
            .filter_map(|id| store.find(id))
            .map(|item| item.price)
            .sum();
        assert!(spent <= 100);
        assert!(!list.is_empty());
        assert!(policy.shopping_list(0, &store).is_empty());
    }

    #[test]
    fn idle_policy_never_decides() {
        let mut policy = OperatorStrategy::Idle.create_policy(4);
        assert!(subjects(10).iter().all(|s| policy.decide(s).is_none()));
        assert!(!policy.flees());
    }
}
