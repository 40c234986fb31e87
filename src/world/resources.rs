//! Resource ledger - settlement-level stockpile
//!
//! Mutated by multiple subsystems within one tick; callers apply deltas in
//! a fixed order (ledger pipeline, then directory effects, then doctrine
//! effects) since later subsystems read levels set by earlier ones.

use serde::{Deserialize, Serialize};

/// Named resource fields of the settlement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resources {
    pub food: f64,
    pub money: f64,
    pub power: f64,
    pub coal: f64,
    pub peat: f64,
    pub vodka: f64,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a delta to food, clamped at zero
    pub fn adjust_food(&mut self, delta: f64) {
        self.food = (self.food + delta).max(0.0);
    }

    /// Apply a delta to money, clamped at zero
    pub fn adjust_money(&mut self, delta: f64) {
        self.money = (self.money + delta).max(0.0);
    }

    /// Apply a delta to vodka, clamped at zero
    pub fn adjust_vodka(&mut self, delta: f64) {
        self.vodka = (self.vodka + delta).max(0.0);
    }

    /// Remove up to `amount` of food, returns what was actually taken
    pub fn take_food(&mut self, amount: f64) -> f64 {
        let taken = amount.min(self.food).max(0.0);
        self.food -= taken;
        taken
    }

    /// Remove up to `amount` of vodka, returns what was actually taken
    pub fn take_vodka(&mut self, amount: f64) -> f64 {
        let taken = amount.min(self.vodka).max(0.0);
        self.vodka -= taken;
        taken
    }
}
