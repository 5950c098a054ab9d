//! Consumable upgrade effects and the compact set that carries them.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Effect granted by a consumable upgrade for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeEffect {
    StressReduction,
    DamageReduction,
    ExtraTime,
    LongerStun,
    SlowEntities,
    BetterRest,
    AnomalyHint,
}

impl UpgradeEffect {
    pub const ALL: [Self; 7] = [
        Self::StressReduction,
        Self::DamageReduction,
        Self::ExtraTime,
        Self::LongerStun,
        Self::SlowEntities,
        Self::BetterRest,
        Self::AnomalyHint,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StressReduction => "stress_reduction",
            Self::DamageReduction => "damage_reduction",
            Self::ExtraTime => "extra_time",
            Self::LongerStun => "longer_stun",
            Self::SlowEntities => "slow_entities",
            Self::BetterRest => "better_rest",
            Self::AnomalyHint => "anomaly_hint",
        }
    }
}

impl fmt::Display for UpgradeEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of upgrade effects stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<UpgradeEffect>", into = "Vec<UpgradeEffect>")]
pub struct EffectSet {
    bits: u8,
}

impl EffectSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn contains(self, effect: UpgradeEffect) -> bool {
        self.bits & effect.bit() != 0
    }

    /// Insert an effect, returning `false` when it was already present.
    pub const fn insert(&mut self, effect: UpgradeEffect) -> bool {
        let present = self.contains(effect);
        self.bits |= effect.bit();
        !present
    }

    pub const fn clear(&mut self) {
        self.bits = 0;
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn iter(self) -> impl Iterator<Item = UpgradeEffect> {
        UpgradeEffect::ALL
            .into_iter()
            .filter(move |effect| self.contains(*effect))
    }
}

impl FromIterator<UpgradeEffect> for EffectSet {
    fn from_iter<T: IntoIterator<Item = UpgradeEffect>>(iter: T) -> Self {
        let mut set = Self::empty();
        for effect in iter {
            set.insert(effect);
        }
        set
    }
}

impl From<Vec<UpgradeEffect>> for EffectSet {
    fn from(value: Vec<UpgradeEffect>) -> Self {
        value.into_iter().collect()
    }
}

impl From<EffectSet> for Vec<UpgradeEffect> {
    fn from(value: EffectSet) -> Self {
        value.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty_and_iterates_in_order() {
        let mut set = EffectSet::empty();
        assert!(set.insert(UpgradeEffect::BetterRest));
        assert!(set.insert(UpgradeEffect::StressReduction));
        assert!(!set.insert(UpgradeEffect::BetterRest));
        assert_eq!(set.len(), 2);
        let listed: Vec<_> = set.iter().collect();
        assert_eq!(
            listed,
            vec![UpgradeEffect::StressReduction, UpgradeEffect::BetterRest]
        );
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn serializes_as_effect_names() {
        let set: EffectSet = [UpgradeEffect::ExtraTime, UpgradeEffect::AnomalyHint]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["extra_time","anomaly_hint"]"#);
        let back: EffectSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
