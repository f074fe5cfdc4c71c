//! Remote resource pool adapter.
//!
//! The ledger is shared with other consumers and keeps its own consistency.
//! The engine treats `simulate` as advisory: a later commit may still
//! grant less than was simulated.

use crate::resource::*;
use fnv::FnvHashMap;
use log::*;
use serde::{Deserialize, Serialize};

pub trait Ledger {
    /// Amount of `key` that could be extracted right now, capped at `amount`.
    /// Never mutates.
    fn simulate(&self, key: &ResourceKey, amount: u64) -> u64;

    /// Remove up to `amount` of `key`. With `commit == false` nothing is
    /// removed and the result matches `simulate`. Returns the amount granted.
    fn extract(&mut self, key: &ResourceKey, amount: u64, commit: bool) -> u64;

    /// Return resources to the pool.
    fn insert(&mut self, key: &ResourceKey, amount: u64);
}

/// In-memory ledger for offline use and tests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    stock: FnvHashMap<ResourceKey, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock(mut self, key: ResourceKey, amount: u64) -> Self {
        self.insert(&key, amount);
        self
    }

    pub fn amount(&self, key: &ResourceKey) -> u64 {
        self.stock.get(key).copied().unwrap_or(0)
    }

    /// Sum of every stocked amount.
    pub fn total(&self) -> u64 {
        self.stock.values().sum()
    }
}

impl Ledger for MemoryLedger {
    fn simulate(&self, key: &ResourceKey, amount: u64) -> u64 {
        self.amount(key).min(amount)
    }

    fn extract(&mut self, key: &ResourceKey, amount: u64, commit: bool) -> u64 {
        let granted = self.simulate(key, amount);
        if commit && granted > 0 {
            if let Some(stored) = self.stock.get_mut(key) {
                *stored -= granted;
                if *stored == 0 {
                    self.stock.remove(key);
                }
            }
            trace!("Ledger: extracted {} x{}", key, granted);
        }
        granted
    }

    fn insert(&mut self, key: &ResourceKey, amount: u64) {
        if amount == 0 {
            return;
        }
        *self.stock.entry(key.clone()).or_insert(0) += amount;
    }
}
