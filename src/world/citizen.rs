//! Citizen entity - the world-owned half of a settlement inhabitant
//!
//! Extended simulation stats (morale, loyalty, skill, dependency) live in
//! the ledger; the fields here are the ones visible to the rest of the game.

use serde::{Deserialize, Serialize};

use crate::core::types::{AssignmentSource, BuildingId, CitizenClass, GridPos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// A citizen entity in the shared world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citizen {
    pub name: String,
    pub class: CitizenClass,
    /// Hunger [0, 100], 0 = fed
    pub hunger: f32,
    /// Happiness [0, 100], mirrored from ledger morale every tick
    pub happiness: f32,
    pub home: Option<GridPos>,
    pub assignment: Option<BuildingId>,
    pub assignment_source: AssignmentSource,
    pub age: u32,
    pub gender: Gender,
}

impl Citizen {
    /// A working-age citizen with neutral visible stats
    pub fn adult(class: CitizenClass) -> Self {
        Self {
            name: String::new(),
            class,
            hunger: 0.0,
            happiness: 50.0,
            home: None,
            assignment: None,
            assignment_source: AssignmentSource::Auto,
            age: 30,
            gender: Gender::Male,
        }
    }
}
