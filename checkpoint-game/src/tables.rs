//! Static lookup data: shift configurations, names and origins.
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SHIFT_DATA: &str =
    include_str!("../../checkpoint-web/static/assets/data/shifts.json");

/// Errors raised when table invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("shift {shift}: quota must be at least 1")]
    EmptyQuota { shift: u8 },
    #[error("shift {shift}: {field} must be between 0 and 1 (got {value:.3})")]
    ProbabilityRange {
        shift: u8,
        field: &'static str,
        value: f32,
    },
    #[error("shift {shift}: anomaly {anomaly:.3} + criminal {criminal:.3} exceeds 1")]
    ProbabilitySum {
        shift: u8,
        anomaly: f32,
        criminal: f32,
    },
    #[error("shift {shift}: stress rate must be positive (got {value:.3})")]
    StressRate { shift: u8, value: f32 },
    #[error("shift {shift}: base pay must not be negative")]
    NegativePay { shift: u8 },
    #[error("shift table is empty")]
    EmptyTable,
    #[error("shift table out of order at position {position} (found shift {found})")]
    ShiftOrder { position: usize, found: u8 },
    #[error("store item {id} has invalid price {price}")]
    ItemPrice { id: String, price: i64 },
    #[error("store item id {id} is duplicated")]
    DuplicateItem { id: String },
    #[error("starting money must not be negative (got {value})")]
    NegativeStartingMoney { value: i64 },
}

/// Difficulty parameters for a single shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub number: u8,
    pub name: String,
    pub quota: u32,
    pub stress_rate: f32,
    pub anomaly_chance: f32,
    pub criminal_chance: f32,
    pub base_pay: i64,
}

impl ShiftConfig {
    /// Validate the shift invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the quota is zero, a probability leaves
    /// `[0, 1]`, the probabilities sum past 1, or the stress rate is not positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let shift = self.number;
        if self.quota == 0 {
            return Err(ConfigError::EmptyQuota { shift });
        }
        for (field, value) in [
            ("anomaly_chance", self.anomaly_chance),
            ("criminal_chance", self.criminal_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityRange {
                    shift,
                    field,
                    value,
                });
            }
        }
        if self.anomaly_chance + self.criminal_chance > 1.0 + f32::EPSILON {
            return Err(ConfigError::ProbabilitySum {
                shift,
                anomaly: self.anomaly_chance,
                criminal: self.criminal_chance,
            });
        }
        if !(self.stress_rate > 0.0) {
            return Err(ConfigError::StressRate {
                shift,
                value: self.stress_rate,
            });
        }
        if self.base_pay < 0 {
            return Err(ConfigError::NegativePay { shift });
        }
        Ok(())
    }
}

/// Ordered shift table, indexed by shift number starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTable {
    pub shifts: Vec<ShiftConfig>,
}

impl Default for ShiftTable {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_SHIFT_DATA).unwrap_or_else(|err| {
            log::warn!("embedded shift table unreadable ({err}); using built-in fallback");
            Self::fallback()
        })
    }
}

impl ShiftTable {
    /// Load a shift table from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a shift table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn fallback() -> Self {
        let row = |number: u8,
                   name: &str,
                   quota: u32,
                   stress_rate: f32,
                   anomaly: f32,
                   criminal: f32,
                   pay: i64| ShiftConfig {
            number,
            name: name.to_string(),
            quota,
            stress_rate,
            anomaly_chance: anomaly,
            criminal_chance: criminal,
            base_pay: pay,
        };
        Self {
            shifts: vec![
                row(1, "Orientation", 4, 0.6, 0.30, 0.10, 60),
                row(2, "Night Intake", 5, 0.8, 0.35, 0.12, 70),
                row(3, "Quarantine Week", 6, 1.0, 0.40, 0.15, 80),
                row(4, "Containment Breach", 7, 1.2, 0.45, 0.15, 90),
                row(5, "Final Count", 8, 1.5, 0.50, 0.20, 120),
            ],
        }
    }

    /// Validate every shift and the ordering of the table.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shifts.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        for (position, shift) in self.shifts.iter().enumerate() {
            if usize::from(shift.number) != position + 1 {
                return Err(ConfigError::ShiftOrder {
                    position,
                    found: shift.number,
                });
            }
            shift.validate()?;
        }
        Ok(())
    }

    /// Shift by one-based number.
    #[must_use]
    pub fn get(&self, number: u8) -> Option<&ShiftConfig> {
        self.shifts.get(usize::from(number).checked_sub(1)?)
    }

    #[must_use]
    pub fn final_shift(&self) -> u8 {
        u8::try_from(self.shifts.len()).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn is_final(&self, number: u8) -> bool {
        number >= self.final_shift()
    }
}

pub(crate) const FIRST_NAMES: &[&str] = &[
    "Anton", "Berta", "Cyril", "Dana", "Emil", "Fenna", "Gregor", "Hana", "Ivo", "Jana", "Karel",
    "Lenka", "Milan", "Nadia", "Oskar", "Petra", "Radek", "Sonja", "Tomas", "Vera", "Walter",
    "Zora",
];

pub(crate) const SURNAMES: &[&str] = &[
    "Adler", "Brandt", "Cerny", "Dvorak", "Engel", "Fischer", "Graf", "Horak", "Jelinek",
    "Kovac", "Lang", "Marek", "Novak", "Orel", "Pohl", "Richter", "Svoboda", "Toth", "Urban",
    "Vogel", "Weiss", "Zeman",
];

pub(crate) const ORIGINS: &[&str] = &[
    "Sector 4",
    "Old Harbor",
    "The Flats",
    "Eastern Quarry",
    "Millbrook",
    "Relay Station 9",
    "North Barracks",
    "Saltmarsh",
    "Grey Orchard",
    "The Underpass",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_and_validates() {
        let table = ShiftTable::from_json(DEFAULT_SHIFT_DATA).unwrap();
        assert_eq!(table, ShiftTable::fallback());
        table.validate().unwrap();
        assert_eq!(table.final_shift(), 5);
        assert!(table.is_final(5));
        assert!(!table.is_final(4));
        assert_eq!(table.get(1).map(|s| s.quota), Some(4));
        assert!(table.get(0).is_none());
        assert!(table.get(6).is_none());
    }

    #[test]
    fn probability_sum_is_rejected() {
        let mut shift = ShiftTable::fallback().shifts[0].clone();
        shift.anomaly_chance = 0.8;
        shift.criminal_chance = 0.3;
        assert!(matches!(
            shift.validate(),
            Err(ConfigError::ProbabilitySum { shift: 1, .. })
        ));
    }

    #[test]
    fn zero_quota_and_bad_rates_are_rejected() {
        let base = ShiftTable::fallback().shifts[1].clone();
        let empty = ShiftConfig {
            quota: 0,
            ..base.clone()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyQuota { shift: 2 }));

        let frozen = ShiftConfig {
            stress_rate: 0.0,
            ..base.clone()
        };
        assert!(matches!(
            frozen.validate(),
            Err(ConfigError::StressRate { .. })
        ));

        let negative = ShiftConfig {
            criminal_chance: -0.1,
            ..base
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::ProbabilityRange {
                field: "criminal_chance",
                ..
            })
        ));
    }

    #[test]
    fn table_order_is_checked() {
        let mut table = ShiftTable::fallback();
        table.shifts.swap(0, 1);
        assert!(matches!(
            table.validate(),
            Err(ConfigError::ShiftOrder { position: 0, found: 2 })
        ));
        let empty = ShiftTable { shifts: Vec::new() };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyTable));
    }
}
