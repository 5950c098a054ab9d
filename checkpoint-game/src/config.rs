//! Top-level game configuration bundle.
use serde::{Deserialize, Serialize};

use crate::store::Store;
use crate::tables::{ConfigError, ShiftTable};

/// Data tables the run is played against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub shifts: ShiftTable,
    pub store: Store,
    pub starting_money: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shifts: ShiftTable::default(),
            store: Store::default(),
            starting_money: 0,
        }
    }
}

impl GameConfig {
    /// Parse a configuration, filling missing sections with the compiled-in tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate every table.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found in the shift table or store catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shifts.validate()?;
        self.store.validate()?;
        if self.starting_money < 0 {
            return Err(ConfigError::NegativeStartingMoney {
                value: self.starting_money,
            });
        }
        Ok(())
    }
}
