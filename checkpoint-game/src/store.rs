//! Break-room shop catalog and the run economy.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::tables::ConfigError;
use crate::upgrades::{EffectSet, UpgradeEffect};

const DEFAULT_STORE_DATA: &str = include_str!("../../checkpoint-web/static/assets/data/store.json");

/// What buying an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Queued for the next shift only.
    Consumable(UpgradeEffect),
    /// Kept for the rest of the run.
    Permanent,
}

/// A single item available in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub price: i64,
    pub kind: ItemKind,
}

/// Complete shop catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub items: Vec<StoreItem>,
}

impl Default for Store {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_STORE_DATA).unwrap_or_else(|err| {
            log::warn!("embedded store catalog unreadable ({err}); using built-in fallback");
            Self::fallback()
        })
    }
}

impl Store {
    /// Load a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a store catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn fallback() -> Self {
        let consumable = |id: &str, name: &str, price: i64, effect: UpgradeEffect| StoreItem {
            id: id.to_string(),
            name: name.to_string(),
            desc: String::new(),
            price,
            kind: ItemKind::Consumable(effect),
        };
        let permanent = |id: &str, name: &str, price: i64| StoreItem {
            id: id.to_string(),
            name: name.to_string(),
            desc: String::new(),
            price,
            kind: ItemKind::Permanent,
        };
        Self {
            items: vec![
                consumable("coffee", "Burnt Coffee", 40, UpgradeEffect::StressReduction),
                consumable("vest", "Kevlar Vest", 60, UpgradeEffect::DamageReduction),
                consumable("timer_patch", "Timer Patch", 50, UpgradeEffect::ExtraTime),
                consumable("stun_battery", "Overcharged Battery", 45, UpgradeEffect::LongerStun),
                consumable("sedative", "Sedative Gas", 55, UpgradeEffect::SlowEntities),
                consumable("pillow", "Memory Foam Pillow", 30, UpgradeEffect::BetterRest),
                consumable("thermal_lens", "Thermal Lens", 70, UpgradeEffect::AnomalyHint),
                permanent("flashlight", "Flashlight", 80),
                permanent("radio", "Pocket Radio", 25),
                permanent("lucky_charm", "Lucky Charm", 15),
                permanent("desk_plant", "Desk Plant", 20),
            ],
        }
    }

    /// Validate prices and id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a non-positive price or a duplicated id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.price <= 0 {
                return Err(ConfigError::ItemPrice {
                    id: item.id.clone(),
                    price: item.price,
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(ConfigError::DuplicateItem {
                    id: item.id.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&StoreItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Reasons a purchase is refused. The economy is never mutated on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("no store item with id {id}")]
    UnknownItem { id: String },
    #[error("{id} costs {price} but only {available} is available")]
    InsufficientFunds {
        id: String,
        price: i64,
        available: i64,
    },
    #[error("{id} is already owned")]
    AlreadyOwned { id: String },
    #[error("{id} is already queued for the next shift")]
    AlreadyPending { id: String },
}

/// Persistent money and upgrade state for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Economy {
    pub money: i64,
    pub pending: EffectSet,
    pub active: EffectSet,
    pub purchased: BTreeSet<String>,
}

impl Economy {
    #[must_use]
    pub fn with_money(money: i64) -> Self {
        Self {
            money,
            ..Self::default()
        }
    }

    /// Buy an item from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError` when the item is unknown, unaffordable, already
    /// owned (permanent) or already queued (consumable).
    pub fn purchase<'a>(&mut self, store: &'a Store, id: &str) -> Result<&'a StoreItem, PurchaseError> {
        let item = store.find(id).ok_or_else(|| PurchaseError::UnknownItem { id: id.to_string() })?;
        match item.kind {
            ItemKind::Permanent if self.purchased.contains(&item.id) => {
                return Err(PurchaseError::AlreadyOwned {
                    id: item.id.clone(),
                });
            }
            ItemKind::Consumable(effect) if self.pending.contains(effect) => {
                return Err(PurchaseError::AlreadyPending {
                    id: item.id.clone(),
                });
            }
            _ => {}
        }
        if item.price > self.money {
            return Err(PurchaseError::InsufficientFunds {
                id: item.id.clone(),
                price: item.price,
                available: self.money,
            });
        }

        self.money -= item.price;
        match item.kind {
            ItemKind::Consumable(effect) => {
                self.pending.insert(effect);
            }
            ItemKind::Permanent => {
                self.purchased.insert(item.id.clone());
            }
        }
        log::debug!("purchased {} for {}, {} left", item.id, item.price, self.money);
        Ok(item)
    }

    /// Swap the pending consumables in as the active set for a new shift.
    pub fn begin_shift(&mut self) -> EffectSet {
        self.active = std::mem::take(&mut self.pending);
        self.active
    }

    /// Bank a shift's earnings. Losses never reduce persistent money.
    pub fn deposit(&mut self, shift_money: i64) {
        self.money = self.money.saturating_add(shift_money.max(0));
    }

    #[must_use]
    pub fn owns(&self, id: &str) -> bool {
        self.purchased.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_matches_fallback_and_validates() {
        let store = Store::from_json(DEFAULT_STORE_DATA).unwrap();
        store.validate().unwrap();
        assert_eq!(store.items.len(), Store::fallback().items.len());
        for (embedded, fallback) in store.items.iter().zip(Store::fallback().items) {
            assert_eq!(embedded.id, fallback.id);
            assert_eq!(embedded.price, fallback.price);
            assert_eq!(embedded.kind, fallback.kind);
        }
    }

    #[test]
    fn validate_rejects_duplicates_and_free_items() {
        let mut store = Store::fallback();
        store.items[1].id = "coffee".to_string();
        assert_eq!(
            store.validate(),
            Err(ConfigError::DuplicateItem {
                id: "coffee".to_string()
            })
        );
        let mut store = Store::fallback();
        store.items[0].price = 0;
        assert!(matches!(store.validate(), Err(ConfigError::ItemPrice { .. })));
    }

    #[test]
    fn purchase_rules() {
        let store = Store::default();
        let mut economy = Economy::with_money(100);

        let err = economy.purchase(&store, "jetpack").unwrap_err();
        assert!(matches!(err, PurchaseError::UnknownItem { .. }));

        economy.purchase(&store, "coffee").unwrap();
        assert_eq!(economy.money, 60);
        assert!(economy.pending.contains(UpgradeEffect::StressReduction));
        assert!(matches!(
            economy.purchase(&store, "coffee"),
            Err(PurchaseError::AlreadyPending { .. })
        ));

        let before = economy.clone();
        assert!(matches!(
            economy.purchase(&store, "flashlight"),
            Err(PurchaseError::InsufficientFunds { price: 80, available: 60, .. })
        ));
        assert_eq!(economy, before);

        economy.purchase(&store, "radio").unwrap();
        assert!(economy.owns("radio"));
        assert!(matches!(
            economy.purchase(&store, "radio"),
            Err(PurchaseError::AlreadyOwned { .. })
        ));
    }

    #[test]
    fn begin_shift_swaps_pending_into_active() {
        let store = Store::default();
        let mut economy = Economy::with_money(500);
        economy.purchase(&store, "vest").unwrap();
        let active = economy.begin_shift();
        assert!(active.contains(UpgradeEffect::DamageReduction));
        assert!(economy.pending.is_empty());

        let next = economy.begin_shift();
        assert!(next.is_empty());
    }

    #[test]
    fn deposit_ignores_losses() {
        let mut economy = Economy::with_money(40);
        economy.deposit(-75);
        assert_eq!(economy.money, 40);
        economy.deposit(120);
        assert_eq!(economy.money, 160);
    }
}
