use serde::{Deserialize, Serialize};

/// Numeric energy balance charged per placed unit.
pub trait EnergyAccount {
    fn has(&self, amount: f64) -> bool;

    /// Remove `amount`. Returns false (and changes nothing) if the balance
    /// is too low.
    fn debit(&mut self, amount: f64) -> bool;
}

/// Simple capacity-bounded buffer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyBuffer {
    stored: f64,
    capacity: f64,
}

impl EnergyBuffer {
    pub fn new(capacity: f64) -> Self {
        EnergyBuffer {
            stored: 0.0,
            capacity,
        }
    }

    pub fn full(capacity: f64) -> Self {
        EnergyBuffer {
            stored: capacity,
            capacity,
        }
    }

    pub fn stored(&self) -> f64 {
        self.stored
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Add energy up to capacity. Returns the amount accepted.
    pub fn charge(&mut self, amount: f64) -> f64 {
        let accepted = amount.max(0.0).min(self.capacity - self.stored);
        self.stored += accepted;
        accepted
    }
}

impl EnergyAccount for EnergyBuffer {
    fn has(&self, amount: f64) -> bool {
        self.stored >= amount
    }

    fn debit(&mut self, amount: f64) -> bool {
        if !self.has(amount) {
            return false;
        }
        self.stored -= amount;
        true
    }
}
