//! Ledger save/load
//!
//! Stats round-trip through plain JSON. On load, saved entries re-link to
//! live citizens by stable id, then exact name, then
//! first-available-of-same-class, then any remaining; entries that match
//! nothing are dropped, never a load failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::Result;
use crate::core::types::{AssignmentSource, CitizenClass, CitizenId, CollectiveFocus};
use crate::ledger::stats::WorkerStats;
use crate::ledger::CitizenLedger;
use crate::world::World;

#[derive(Debug, Serialize, Deserialize)]
struct SavedWorker {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    class: CitizenClass,
    morale: f32,
    loyalty: f32,
    skill: f32,
    vodka_dependency: f32,
    #[serde(default)]
    ticks_since_vodka: u32,
    #[serde(default)]
    assignment_duration: u32,
    #[serde(default)]
    assignment_source: AssignmentSource,
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerSave {
    tick_count: u64,
    #[serde(default)]
    focus: CollectiveFocus,
    workers: Vec<SavedWorker>,
}

impl CitizenLedger {
    /// Serialize every owned stat entry to a plain structured value
    pub fn serialize(&self, world: &World) -> Result<Value> {
        let mut workers = Vec::new();
        for id in world.citizen_ids_sorted() {
            let (Some(citizen), Some(stats)) = (world.citizen(id), self.stats.get(&id)) else {
                continue;
            };
            workers.push(SavedWorker {
                id: Some(id.0),
                name: stats.name.clone(),
                class: citizen.class,
                morale: stats.morale,
                loyalty: stats.loyalty,
                skill: stats.skill,
                vodka_dependency: stats.vodka_dependency,
                ticks_since_vodka: stats.ticks_since_vodka,
                assignment_duration: stats.assignment_duration,
                assignment_source: stats.assignment_source,
            });
        }
        Ok(serde_json::to_value(LedgerSave {
            tick_count: self.tick_count,
            focus: self.focus,
            workers,
        })?)
    }

    /// Restore stats from a saved value, re-linking to live citizens
    pub fn deserialize(&mut self, value: Value, world: &World) -> Result<()> {
        let save: LedgerSave = serde_json::from_value(value)?;
        self.tick_count = save.tick_count;
        self.focus = save.focus;
        self.stats.clear();

        let mut unclaimed: Vec<CitizenId> = world.citizen_ids_sorted();
        for saved in save.workers {
            let matched = saved
                .id
                .map(CitizenId)
                .filter(|cid| unclaimed.contains(cid))
                .or_else(|| {
                    unclaimed.iter().copied().find(|cid| {
                        world
                            .citizen(*cid)
                            .map(|c| c.name == saved.name)
                            .unwrap_or(false)
                    })
                })
                .or_else(|| {
                    unclaimed.iter().copied().find(|cid| {
                        world
                            .citizen(*cid)
                            .map(|c| c.class == saved.class)
                            .unwrap_or(false)
                    })
                })
                .or_else(|| unclaimed.first().copied());

            let Some(cid) = matched else {
                // Unmatched saved stat is dropped, not treated as a failure
                continue;
            };
            unclaimed.retain(|c| *c != cid);
            self.stats.insert(
                cid,
                WorkerStats {
                    morale: saved.morale,
                    loyalty: saved.loyalty,
                    skill: saved.skill,
                    vodka_dependency: saved.vodka_dependency,
                    ticks_since_vodka: saved.ticks_since_vodka,
                    name: saved.name,
                    assignment_duration: saved.assignment_duration,
                    assignment_source: saved.assignment_source,
                },
            );
        }
        Ok(())
    }
}
