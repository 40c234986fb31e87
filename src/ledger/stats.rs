//! Per-citizen extended simulation stats owned by the ledger

use serde::{Deserialize, Serialize};

use crate::core::types::{clamp_stat, AssignmentSource};

/// Extended stats for one citizen, keyed to a world citizen entity
///
/// morale/loyalty/skill/vodka_dependency stay clamped to [0, 100] at every
/// mutation site; use the adjust helpers instead of writing fields raw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStats {
    pub morale: f32,
    pub loyalty: f32,
    pub skill: f32,
    pub vodka_dependency: f32,
    #[serde(default)]
    pub ticks_since_vodka: u32,
    pub name: String,
    #[serde(default)]
    pub assignment_duration: u32,
    #[serde(default)]
    pub assignment_source: AssignmentSource,
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self {
            morale: 50.0,
            loyalty: 50.0,
            skill: 20.0,
            vodka_dependency: 0.0,
            ticks_since_vodka: 0,
            name: String::new(),
            assignment_duration: 0,
            assignment_source: AssignmentSource::Auto,
        }
    }
}

impl WorkerStats {
    pub fn adjust_morale(&mut self, delta: f32) {
        self.morale = clamp_stat(self.morale + delta);
    }

    pub fn adjust_loyalty(&mut self, delta: f32) {
        self.loyalty = clamp_stat(self.loyalty + delta);
    }

    pub fn adjust_skill(&mut self, delta: f32) {
        self.skill = clamp_stat(self.skill + delta);
    }

    pub fn adjust_dependency(&mut self, delta: f32) {
        self.vodka_dependency = clamp_stat(self.vodka_dependency + delta);
    }

    /// Reset assignment bookkeeping after any reassignment
    pub fn reset_assignment(&mut self, source: AssignmentSource) {
        self.assignment_duration = 0;
        self.assignment_source = source;
    }

    /// True if all four stats sit inside [0, 100]
    pub fn in_bounds(&self) -> bool {
        let ok = |v: f32| (0.0..=100.0).contains(&v);
        ok(self.morale) && ok(self.loyalty) && ok(self.skill) && ok(self.vodka_dependency)
    }
}
