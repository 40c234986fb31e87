//! Shared mutable world state
//!
//! The resource ledger plus the queryable citizen/building registries the
//! simulation core reads and mutates but does not own the storage policy of.

pub mod building;
pub mod citizen;
pub mod resources;

use ahash::AHashMap;

use crate::core::types::{BuildingId, CitizenId, GridPos};
use crate::world::building::{Building, BuildingKind};
use crate::world::citizen::Citizen;
use crate::world::resources::Resources;

/// The settlement world containing all entities and the resource ledger
#[derive(Debug, Default)]
pub struct World {
    pub resources: Resources,
    citizens: AHashMap<CitizenId, Citizen>,
    buildings: AHashMap<BuildingId, Building>,
    position_index: AHashMap<GridPos, BuildingId>,
    next_citizen_id: u64,
    next_building_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // === CITIZENS ===

    pub fn spawn_citizen(&mut self, citizen: Citizen) -> CitizenId {
        let id = CitizenId(self.next_citizen_id);
        self.next_citizen_id += 1;
        self.citizens.insert(id, citizen);
        id
    }

    pub fn remove_citizen(&mut self, id: CitizenId) -> Option<Citizen> {
        self.citizens.remove(&id)
    }

    pub fn citizen(&self, id: CitizenId) -> Option<&Citizen> {
        self.citizens.get(&id)
    }

    pub fn citizen_mut(&mut self, id: CitizenId) -> Option<&mut Citizen> {
        self.citizens.get_mut(&id)
    }

    pub fn population(&self) -> usize {
        self.citizens.len()
    }

    /// Citizen ids in stable ascending order
    ///
    /// Hash-map iteration order must never leak into RNG draws or output
    /// ordering; every pass over citizens goes through this.
    pub fn citizen_ids_sorted(&self) -> Vec<CitizenId> {
        let mut ids: Vec<CitizenId> = self.citizens.keys().copied().collect();
        ids.sort();
        ids
    }

    // === BUILDINGS ===

    pub fn spawn_building(&mut self, kind: BuildingKind, pos: GridPos) -> BuildingId {
        let id = BuildingId(self.next_building_id);
        self.next_building_id += 1;
        self.position_index.insert(pos, id);
        self.buildings.insert(id, Building::new(kind, pos));
        id
    }

    pub fn remove_building(&mut self, id: BuildingId) -> Option<Building> {
        let removed = self.buildings.remove(&id);
        if let Some(b) = &removed {
            self.position_index.remove(&b.pos);
        }
        removed
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(&id)
    }

    pub fn building_id_at(&self, pos: GridPos) -> Option<BuildingId> {
        self.position_index.get(&pos).copied()
    }

    pub fn building_at(&self, pos: GridPos) -> Option<&Building> {
        self.building_id_at(pos).and_then(|id| self.buildings.get(&id))
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Building ids in stable ascending order
    pub fn building_ids_sorted(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.buildings.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Operational buildings of one kind, in stable order
    pub fn buildings_of_kind(&self, kind: BuildingKind) -> Vec<BuildingId> {
        self.building_ids_sorted()
            .into_iter()
            .filter(|id| {
                self.buildings
                    .get(id)
                    .map(|b| b.kind == kind && b.operational)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Number of citizens currently assigned to a building
    pub fn assigned_count(&self, building: BuildingId) -> u32 {
        self.citizens
            .values()
            .filter(|c| c.assignment == Some(building))
            .count() as u32
    }

    /// Per-building assignment counts for all buildings
    pub fn assignment_counts(&self) -> AHashMap<BuildingId, u32> {
        let mut counts = AHashMap::new();
        for citizen in self.citizens.values() {
            if let Some(b) = citizen.assignment {
                *counts.entry(b).or_insert(0) += 1;
            }
        }
        counts
    }

    /// True if any living party official keeps ambient morale up
    pub fn has_party_official(&self) -> bool {
        use crate::core::types::CitizenClass;
        self.citizens
            .values()
            .any(|c| c.class == CitizenClass::PartyOfficial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CitizenClass;

    #[test]
    fn test_spawn_and_remove_citizen() {
        let mut world = World::new();
        let id = world.spawn_citizen(Citizen::adult(CitizenClass::Worker));
        assert_eq!(world.population(), 1);
        assert!(world.citizen(id).is_some());

        world.remove_citizen(id);
        assert_eq!(world.population(), 0);
        assert!(world.citizen(id).is_none());
    }

    #[test]
    fn test_building_position_index() {
        let mut world = World::new();
        let pos = GridPos::new(3, 4);
        let id = world.spawn_building(BuildingKind::Farm, pos);

        assert_eq!(world.building_id_at(pos), Some(id));
        assert!(world.building_at(GridPos::new(9, 9)).is_none());

        world.remove_building(id);
        assert_eq!(world.building_id_at(pos), None);
    }

    #[test]
    fn test_assigned_count() {
        let mut world = World::new();
        let farm = world.spawn_building(BuildingKind::Farm, GridPos::new(0, 0));
        let a = world.spawn_citizen(Citizen::adult(CitizenClass::Farmer));
        world.spawn_citizen(Citizen::adult(CitizenClass::Worker));

        world.citizen_mut(a).unwrap().assignment = Some(farm);
        assert_eq!(world.assigned_count(farm), 1);
    }

    #[test]
    fn test_sorted_ids_are_stable() {
        let mut world = World::new();
        for _ in 0..20 {
            world.spawn_citizen(Citizen::adult(CitizenClass::Worker));
        }
        let first = world.citizen_ids_sorted();
        let second = world.citizen_ids_sorted();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }
}
