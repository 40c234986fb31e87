//! Directory save/load
//!
//! Unlike citizen stats, political state has no live objects to re-link
//! against; the whole directory round-trips as plain data. Entities are
//! written in id order so equal states serialize identically.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::Result;
use crate::directory::entity::PoliticalEntityStats;
use crate::directory::kgb::{Informant, Investigation};
use crate::directory::military::{ConscriptionEvent, OrgnaborEvent, ReturnQueue};
use crate::directory::raikom::RaikomState;
use crate::directory::PoliticalDirectory;

#[derive(Debug, Serialize, Deserialize)]
struct DirectorySave {
    entities: Vec<PoliticalEntityStats>,
    #[serde(default)]
    investigations: Vec<Investigation>,
    #[serde(default)]
    informants: Vec<Informant>,
    #[serde(default)]
    conscription_queue: Vec<ConscriptionEvent>,
    #[serde(default)]
    orgnabor_queue: Vec<OrgnaborEvent>,
    #[serde(default)]
    return_queue: ReturnQueue,
    #[serde(default)]
    raikom: Option<RaikomState>,
    #[serde(default)]
    known_black_marks: u32,
    #[serde(default)]
    total_conscripted: u32,
    #[serde(default)]
    total_returned: u32,
    #[serde(default)]
    total_casualties: u32,
    #[serde(default)]
    next_entity_id: u64,
    #[serde(default)]
    next_event_id: u64,
    #[serde(default)]
    spawn_counter: u64,
}

impl PoliticalDirectory {
    /// Serialize the full directory state to a plain structured value
    pub fn serialize(&self) -> Result<Value> {
        let mut entities: Vec<PoliticalEntityStats> = self.entities.values().cloned().collect();
        entities.sort_unstable_by_key(|e| e.id);

        Ok(serde_json::to_value(DirectorySave {
            entities,
            investigations: self.investigations.clone(),
            informants: self.informants.clone(),
            conscription_queue: self.conscription_queue.clone(),
            orgnabor_queue: self.orgnabor_queue.clone(),
            return_queue: self.return_queue.clone(),
            raikom: self.raikom.clone(),
            known_black_marks: self.known_black_marks,
            total_conscripted: self.total_conscripted,
            total_returned: self.total_returned,
            total_casualties: self.total_casualties,
            next_entity_id: self.next_entity_id,
            next_event_id: self.next_event_id,
            spawn_counter: self.spawn_counter,
        })?)
    }

    /// Restore directory state from a saved value
    ///
    /// Missing fields fall back to empty defaults so older saves load.
    pub fn deserialize(&mut self, value: Value) -> Result<()> {
        let save: DirectorySave = serde_json::from_value(value)?;

        self.entities.clear();
        for entity in save.entities {
            self.entities.insert(entity.id, entity);
        }
        self.investigations = save.investigations;
        self.informants = save.informants;
        self.conscription_queue = save.conscription_queue;
        self.orgnabor_queue = save.orgnabor_queue;
        self.return_queue = save.return_queue;
        self.raikom = save.raikom;
        self.known_black_marks = save.known_black_marks;
        self.total_conscripted = save.total_conscripted;
        self.total_returned = save.total_returned;
        self.total_casualties = save.total_casualties;
        // Counters never move backward, even against a stale save
        self.next_entity_id = self.next_entity_id.max(save.next_entity_id);
        self.next_event_id = self.next_event_id.max(save.next_event_id);
        self.spawn_counter = self.spawn_counter.max(save.spawn_counter);
        Ok(())
    }
}
