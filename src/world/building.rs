//! Building entities consumed read-only for placement and occupancy queries

use serde::{Deserialize, Serialize};

use crate::core::types::{CitizenClass, GridPos};

/// What a building does for the settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Farm,
    Mine,
    PeatBog,
    Distillery,
    Workshop,
    PowerStation,
    Barracks,
    Housing,
    PartyHouse,
    ConstructionSite,
}

impl BuildingKind {
    /// Production buildings need staffing for the trudodni priority
    pub fn is_production(&self) -> bool {
        matches!(
            self,
            BuildingKind::Farm
                | BuildingKind::Mine
                | BuildingKind::PeatBog
                | BuildingKind::Distillery
                | BuildingKind::Workshop
                | BuildingKind::PowerStation
        )
    }

    /// Class/building affinity for the production efficiency bonus
    pub fn favors_class(&self, class: CitizenClass) -> bool {
        match self {
            BuildingKind::Farm => class == CitizenClass::Farmer,
            BuildingKind::Workshop | BuildingKind::PowerStation => {
                class == CitizenClass::Engineer
            }
            BuildingKind::Mine | BuildingKind::PeatBog => class == CitizenClass::Worker,
            BuildingKind::Barracks => class == CitizenClass::Soldier,
            _ => false,
        }
    }
}

/// A building in the shared world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub pos: GridPos,
    pub operational: bool,
    /// Durability [0, 100]; low durability attracts repair crews
    pub durability: f32,
    /// How many workers the building can hold
    pub capacity: u32,
}

impl Building {
    pub fn new(kind: BuildingKind, pos: GridPos) -> Self {
        let capacity = match kind {
            BuildingKind::Farm => 6,
            BuildingKind::Mine => 8,
            BuildingKind::PeatBog => 6,
            BuildingKind::Distillery => 4,
            BuildingKind::Workshop => 5,
            BuildingKind::PowerStation => 4,
            BuildingKind::Barracks => 10,
            BuildingKind::Housing => 0,
            BuildingKind::PartyHouse => 2,
            BuildingKind::ConstructionSite => 12,
        };
        Self {
            kind,
            pos,
            operational: true,
            durability: 100.0,
            capacity,
        }
    }
}
