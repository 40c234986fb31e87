//! Political entity directory
//!
//! Owns every political actor in the settlement and advances their state
//! machines once per tick. The directory never mutates the world; it
//! returns a result struct of deltas and records the caller applies.
//!
//! Tick order is fixed: returns, role dispatch, investigations,
//! informants, conscription, orgnabor, Raikom, doctrine. Entity iteration
//! goes through sorted id vectors so a seed fully determines the outcome.

pub mod entity;
pub mod kgb;
pub mod military;
pub mod politruk;
pub mod raikom;
pub mod serialize;

use ahash::AHashMap;
use tracing::debug;

use crate::core::config::SimConfig;
use crate::core::rng::{pick, RandomSource};
use crate::core::types::{
    Era, EntityId, GridPos, PoliticalRole, PolitrukPersonality, RaikomPersonality, SettlementTier,
    Tick,
};
use crate::doctrine::{self, DoctrineContext, DoctrineMechanicEffect};
use crate::ledger::names::generate_name;
use crate::world::citizen::Gender;
use crate::world::World;

pub use entity::{role_range, PoliticalEntityStats, RoleRange};
pub use kgb::{Informant, Investigation, InvestigationOutcome};
pub use military::{ConscriptionEvent, OrgnaborEvent, ReturnQueue};
pub use politruk::SessionRecord;
pub use raikom::{RaikomDirective, RaikomState};

/// Role processing order, fixed for determinism
const ROLE_ORDER: [PoliticalRole; 4] = [
    PoliticalRole::Politruk,
    PoliticalRole::KgbAgent,
    PoliticalRole::MilitaryOfficer,
    PoliticalRole::ConscriptionOfficer,
];

const POLITRUK_PERSONALITIES: [PolitrukPersonality; 4] = [
    PolitrukPersonality::Zealous,
    PolitrukPersonality::Lazy,
    PolitrukPersonality::Paranoid,
    PolitrukPersonality::Corrupt,
];

const RAIKOM_PERSONALITIES: [RaikomPersonality; 4] = [
    RaikomPersonality::Hardliner,
    RaikomPersonality::Pragmatist,
    RaikomPersonality::Careerist,
    RaikomPersonality::Reformist,
];

/// Everything one directory tick produced
///
/// Population and resource deltas are advisory; the caller applies them to
/// the world so the directory stays a pure consumer of world state.
#[derive(Debug, Clone)]
pub struct PoliticalTickResult {
    pub workers_returned: u32,
    pub workers_conscripted: u32,
    pub arrests: u32,
    pub black_marks: u32,
    pub informant_flags: u32,
    pub sessions: Vec<SessionRecord>,
    pub investigations_resolved: Vec<InvestigationOutcome>,
    pub directives_issued: Vec<RaikomDirective>,
    pub directives_expired: Vec<RaikomDirective>,
    pub doctrine_effects: Vec<DoctrineMechanicEffect>,
    pub food_delta: f64,
    pub money_delta: f64,
    pub vodka_delta: f64,
    pub population_delta: i32,
    pub production_mult: f32,
    pub announcements: Vec<String>,
}

impl Default for PoliticalTickResult {
    fn default() -> Self {
        Self {
            workers_returned: 0,
            workers_conscripted: 0,
            arrests: 0,
            black_marks: 0,
            informant_flags: 0,
            sessions: Vec::new(),
            investigations_resolved: Vec::new(),
            directives_issued: Vec::new(),
            directives_expired: Vec::new(),
            doctrine_effects: Vec::new(),
            food_delta: 0.0,
            money_delta: 0.0,
            vodka_delta: 0.0,
            population_delta: 0,
            production_mult: 1.0,
            announcements: Vec::new(),
        }
    }
}

/// Directory of political actors and their machinery
pub struct PoliticalDirectory {
    pub(crate) entities: AHashMap<EntityId, PoliticalEntityStats>,
    pub(crate) investigations: Vec<Investigation>,
    pub(crate) informants: Vec<Informant>,
    pub(crate) conscription_queue: Vec<ConscriptionEvent>,
    pub(crate) orgnabor_queue: Vec<OrgnaborEvent>,
    pub(crate) return_queue: ReturnQueue,
    pub(crate) raikom: Option<RaikomState>,
    /// Accumulated black marks, feeds investigation escalation
    pub(crate) known_black_marks: u32,
    /// Lifetime workers taken by conscription or orgnabor
    pub(crate) total_conscripted: u32,
    /// Lifetime workers released by the return queue
    pub(crate) total_returned: u32,
    /// Wartime drafts that will never return
    pub(crate) total_casualties: u32,
    pub(crate) next_entity_id: u64,
    pub(crate) next_event_id: u64,
    pub(crate) spawn_counter: u64,
    config: SimConfig,
}

impl PoliticalDirectory {
    pub fn new(config: SimConfig) -> Self {
        Self {
            entities: AHashMap::new(),
            investigations: Vec::new(),
            informants: Vec::new(),
            conscription_queue: Vec::new(),
            orgnabor_queue: Vec::new(),
            return_queue: ReturnQueue::new(),
            raikom: None,
            known_black_marks: 0,
            total_conscripted: 0,
            total_returned: 0,
            total_casualties: 0,
            next_entity_id: 0,
            next_event_id: 0,
            spawn_counter: 0,
            config,
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&PoliticalEntityStats> {
        self.entities.get(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Ids of every actor with this role, in stable id order
    pub fn entities_of_role(&self, role: PoliticalRole) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.role == role)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn role_count(&self, role: PoliticalRole) -> u32 {
        self.entities.values().filter(|e| e.role == role).count() as u32
    }

    pub fn black_marks(&self) -> u32 {
        self.known_black_marks
    }

    /// Charge black marks from an outside source (e.g. failed quotas)
    pub fn add_black_marks(&mut self, count: u32) {
        self.known_black_marks += count;
    }

    pub fn active_investigations(&self) -> &[Investigation] {
        &self.investigations
    }

    pub fn informant_count(&self) -> usize {
        self.informants.len()
    }

    pub fn raikom(&self) -> Option<&RaikomState> {
        self.raikom.as_ref()
    }

    /// Workers currently away on conscription or orgnabor
    pub fn outstanding_returns(&self) -> u32 {
        self.return_queue.outstanding()
    }

    pub fn total_conscripted(&self) -> u32 {
        self.total_conscripted
    }

    pub fn total_returned(&self) -> u32 {
        self.total_returned
    }

    pub fn total_casualties(&self) -> u32 {
        self.total_casualties
    }

    /// Reconcile actor counts against the tier scaling table
    ///
    /// Wartime doubles military and conscription targets; corruption above
    /// the threshold warrants an extra KGB agent. Each role converges by
    /// spawning the shortfall or retiring the oldest actors. `now` anchors
    /// the schedules of anything the new actors set up.
    pub fn sync_entities(
        &mut self,
        world: &World,
        tier: SettlementTier,
        era: Era,
        corruption: f32,
        now: Tick,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) {
        for role in ROLE_ORDER {
            let range = role_range(tier, role);
            let mut target = match rng.as_deref_mut() {
                Some(r) => r.int_range(range.min as i64, range.max as i64) as u32,
                None => range.min,
            };
            if era.is_wartime()
                && matches!(
                    role,
                    PoliticalRole::MilitaryOfficer | PoliticalRole::ConscriptionOfficer
                )
            {
                target = (target * 2).min(range.max * 2);
            }
            if role == PoliticalRole::KgbAgent && corruption > self.config.corruption_kgb_threshold
            {
                target = (target + 1).min(range.max + 2);
            }
            self.reconcile_role(world, role, target, now, rng.as_deref_mut());
        }
        self.ensure_raikom(tier, now, rng);
    }

    /// Override the politruk count from population pressure
    ///
    /// One politruk per `politruk_population_divisor` citizens, scaled by
    /// the doctrine and difficulty multipliers.
    pub fn sync_politruks_by_population(
        &mut self,
        world: &World,
        doctrine_mult: f32,
        difficulty_mult: f32,
        now: Tick,
        rng: Option<&mut (dyn RandomSource + '_)>,
    ) {
        let base = world.population() as f32 / self.config.politruk_population_divisor as f32;
        let target = (base * doctrine_mult * difficulty_mult).round().max(0.0) as u32;
        self.reconcile_role(world, PoliticalRole::Politruk, target, now, rng);
    }

    fn reconcile_role(
        &mut self,
        world: &World,
        role: PoliticalRole,
        target: u32,
        now: Tick,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) {
        let current = self.role_count(role);
        if current < target {
            for _ in current..target {
                self.spawn_entity(world, role, now, rng.as_deref_mut());
            }
            return;
        }
        if current > target {
            // Retire oldest first
            let mut members: Vec<(u64, EntityId)> = self
                .entities
                .values()
                .filter(|e| e.role == role)
                .map(|e| (e.spawned_order, e.id))
                .collect();
            members.sort_unstable();
            for (_, id) in members.into_iter().take((current - target) as usize) {
                self.entities.remove(&id);
            }
        }
    }

    fn spawn_entity(
        &mut self,
        world: &World,
        role: PoliticalRole,
        now: Tick,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        let order = self.spawn_counter;
        self.spawn_counter += 1;

        let building_ids = world.building_ids_sorted();
        let (name, stationed_at, ticks_remaining, effectiveness, personality) =
            match rng.as_deref_mut() {
                Some(r) => {
                    let name = generate_name(r, Gender::Male);
                    let pos = pick(r, &building_ids)
                        .and_then(|bid| world.building(*bid))
                        .map(|b| b.pos)
                        .unwrap_or_default();
                    let ticks = r.int_range(
                        self.config.station_duration_min,
                        self.config.station_duration_max,
                    );
                    let eff = r.int_range(30, 90) as f32;
                    let personality = (role == PoliticalRole::Politruk).then(|| {
                        *pick(r, &POLITRUK_PERSONALITIES).unwrap_or(&PolitrukPersonality::Zealous)
                    });
                    (name, pos, ticks, eff, personality)
                }
                None => (
                    String::from("Tovarishch Ivanov"),
                    GridPos::default(),
                    self.config.station_duration_min,
                    50.0,
                    (role == PoliticalRole::Politruk).then_some(PolitrukPersonality::Zealous),
                ),
            };

        let target_building = world.building_id_at(stationed_at);
        self.entities.insert(
            id,
            PoliticalEntityStats {
                id,
                role,
                name,
                stationed_at,
                target_building,
                ticks_remaining,
                effectiveness,
                personality,
                spawned_order: order,
            },
        );

        // A newly arrived agent goes straight to work
        if role == PoliticalRole::KgbAgent {
            self.kgb_arrival(stationed_at, effectiveness, now, rng);
        }
        id
    }

    /// Opening moves of a KGB agent at a fresh station
    fn kgb_arrival(
        &mut self,
        pos: GridPos,
        effectiveness: f32,
        now: Tick,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) {
        let escalated = self.known_black_marks > self.config.escalation_mark_threshold;
        self.investigations.push(kgb::open_investigation(
            pos,
            effectiveness,
            escalated,
            &self.config,
            rng.as_deref_mut(),
        ));
        if let Some(r) = rng {
            if r.coin_flip(self.config.informant_plant_chance) {
                let informant_id = self.next_event_id;
                self.next_event_id += 1;
                self.informants
                    .push(Informant::plant(informant_id, pos, now, r));
            }
        }
    }

    fn ensure_raikom(
        &mut self,
        tier: SettlementTier,
        now: Tick,
        rng: Option<&mut (dyn RandomSource + '_)>,
    ) {
        if !tier.outranks(&SettlementTier::Selo) || self.raikom.is_some() {
            return;
        }
        let (name, personality) = match rng {
            Some(r) => {
                let name = generate_name(r, Gender::Male);
                let personality =
                    *pick(r, &RAIKOM_PERSONALITIES).unwrap_or(&RaikomPersonality::Pragmatist);
                (name, personality)
            }
            None => (
                String::from("Tovarishch Suslov"),
                RaikomPersonality::Pragmatist,
            ),
        };
        self.raikom = Some(RaikomState::new(
            name,
            personality,
            now + self.config.raikom_visit_interval,
        ));
    }

    /// Queue a conscription order; returns the event id
    pub fn queue_conscription(
        &mut self,
        target_count: u32,
        permanent: bool,
        announcement: String,
    ) -> u64 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.conscription_queue.push(ConscriptionEvent {
            id,
            target_count,
            permanent,
            announcement,
            responded: false,
        });
        id
    }

    /// Queue an orgnabor labor borrowing; returns the event id
    pub fn queue_orgnabor(
        &mut self,
        borrowed_count: u32,
        return_duration: u64,
        announcement: String,
    ) -> u64 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.orgnabor_queue.push(OrgnaborEvent {
            id,
            borrowed_count,
            return_duration,
            announcement,
        });
        id
    }

    /// Refuse a pending conscription order
    ///
    /// The event stays queued and is consumed normally, drafting nobody.
    pub fn reject_conscription(&mut self, event_id: u64) -> bool {
        match self
            .conscription_queue
            .iter_mut()
            .find(|e| e.id == event_id && !e.responded)
        {
            Some(event) => {
                event.target_count = 0;
                event.responded = true;
                true
            }
            None => false,
        }
    }

    /// Roll whether the current blat level draws KGB attention
    ///
    /// Returns the investigated building position when an investigation
    /// opens. Blat at or below the safe threshold never triggers.
    pub fn check_blat_kgb_risk(
        &mut self,
        world: &World,
        blat: f32,
        rng: &mut dyn RandomSource,
    ) -> Option<GridPos> {
        let chance = kgb::blat_investigation_chance(blat, &self.config);
        if chance <= 0.0 || !rng.coin_flip(chance) {
            return None;
        }
        let building_ids = world.building_ids_sorted();
        let pos = pick(rng, &building_ids)
            .and_then(|bid| world.building(*bid))
            .map(|b| b.pos)
            .unwrap_or_default();
        let escalated = self.known_black_marks > self.config.escalation_mark_threshold;
        self.investigations.push(kgb::open_investigation(
            pos,
            50.0,
            escalated,
            &self.config,
            Some(rng),
        ));
        Some(pos)
    }

    /// Offer blat to the Raikom; false when no Raikom exists yet
    pub fn offer_blat(&mut self, units: f64) -> bool {
        match self.raikom.as_mut() {
            Some(raikom) => {
                raikom.offer_blat(units, &self.config);
                true
            }
            None => false,
        }
    }

    /// Mark a Raikom directive fulfilled
    pub fn fulfill_directive(&mut self, id: u64) -> bool {
        self.raikom
            .as_mut()
            .map(|r| r.fulfill_directive(id))
            .unwrap_or(false)
    }

    /// Advance every political state machine one tick
    pub fn tick(
        &mut self,
        world: &World,
        total_ticks: Tick,
        doctrine_ctx: Option<&DoctrineContext>,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) -> PoliticalTickResult {
        let mut result = PoliticalTickResult::default();
        let cfg = self.config.clone();

        // 1. Scheduled returns land first so this tick's drafts cannot
        //    cancel them out
        let released = self.return_queue.resolve(total_ticks);
        if released > 0 {
            self.total_returned += released;
            result.workers_returned = released;
            result.population_delta += released as i32;
            result
                .announcements
                .push(format!("{released} workers return to the settlement"));
        }

        // 2. Role dispatch in sorted id order
        let mut entity_ids: Vec<EntityId> = self.entities.keys().copied().collect();
        entity_ids.sort_unstable();
        let building_ids = world.building_ids_sorted();
        let mut arrivals: Vec<(GridPos, f32)> = Vec::new();

        for id in entity_ids {
            let Some(e) = self.entities.get_mut(&id) else {
                continue;
            };
            // Conscription officers are purely event-driven; they neither
            // count down nor rotate
            if e.role == PoliticalRole::ConscriptionOfficer {
                continue;
            }
            e.ticks_remaining -= 1;

            if e.role == PoliticalRole::Politruk
                && cfg.session_interval != 0
                && total_ticks % cfg.session_interval == 0
            {
                if let Some(r) = rng.as_deref_mut() {
                    let prof = politruk::profile(
                        e.personality.unwrap_or(PolitrukPersonality::Zealous),
                    );
                    if !r.coin_flip(prof.skip_chance) {
                        let workers = e
                            .target_building
                            .map(|b| world.assigned_count(b))
                            .unwrap_or(0);
                        let attendees = (workers as f32 * cfg.session_pull_ratio).ceil() as u32
                            + prof.extra_attendees;
                        if attendees > 0 {
                            let record = politruk::run_session(e, attendees, &cfg, r);
                            result.announcements.push(format!(
                                "{} holds an ideology session: {} attendees, {} failures",
                                record.politruk, record.attendees, record.failures
                            ));
                            result.sessions.push(record);
                        }
                    }
                }
            }

            if e.ticks_remaining <= 0 {
                let new_pos = match rng.as_deref_mut() {
                    Some(r) => pick(r, &building_ids)
                        .and_then(|bid| world.building(*bid))
                        .map(|b| b.pos)
                        .unwrap_or(e.stationed_at),
                    None => e.stationed_at,
                };
                e.stationed_at = new_pos;
                e.target_building = world.building_id_at(new_pos);
                e.ticks_remaining = match rng.as_deref_mut() {
                    Some(r) => r.int_range(cfg.station_duration_min, cfg.station_duration_max),
                    None => cfg.station_duration_min,
                };
                if e.role == PoliticalRole::KgbAgent {
                    arrivals.push((new_pos, e.effectiveness));
                }
            }
        }
        for (pos, effectiveness) in arrivals {
            self.kgb_arrival(pos, effectiveness, total_ticks, rng.as_deref_mut());
        }

        // 3. Investigations: flag, count down, resolve
        if let Some(r) = rng.as_deref_mut() {
            for inv in &mut self.investigations {
                if r.coin_flip(cfg.investigation_flag_chance) {
                    inv.flagged_workers += 1;
                }
            }
        }
        for inv in &mut self.investigations {
            inv.ticks_remaining -= 1;
        }
        let (finished, active): (Vec<Investigation>, Vec<Investigation>) =
            std::mem::take(&mut self.investigations)
                .into_iter()
                .partition(|inv| inv.ticks_remaining <= 0);
        self.investigations = active;
        for inv in finished {
            let outcome = kgb::resolve_investigation(&inv, &cfg, rng.as_deref_mut());
            if outcome.black_mark {
                result.black_marks += 1;
                result
                    .announcements
                    .push("The investigation's findings travel upward".to_string());
            }
            if outcome.arrests > 0 {
                result.arrests += outcome.arrests;
                result.population_delta -= outcome.arrests as i32;
                result.announcements.push(format!(
                    "{} workers are taken away in the night",
                    outcome.arrests
                ));
            }
            result.investigations_resolved.push(outcome);
        }

        // 4. Informant reports feed whatever investigation covers their
        //    building
        for informant in &mut self.informants {
            if total_ticks < informant.next_report_tick {
                continue;
            }
            if informant.report(total_ticks, rng.as_deref_mut()) {
                result.informant_flags += 1;
                if let Some(inv) = self
                    .investigations
                    .iter_mut()
                    .find(|i| i.target_building == informant.building_pos)
                {
                    inv.flagged_workers += 1;
                }
            }
        }

        // 5. Conscription: each queued event is consumed exactly once
        let mut available = world.population() as u32;
        let conscriptions: Vec<ConscriptionEvent> = self.conscription_queue.drain(..).collect();
        for event in conscriptions {
            let drafted = event.target_count.min(available);
            if drafted == 0 {
                continue;
            }
            available -= drafted;
            self.total_conscripted += drafted;
            result.workers_conscripted += drafted;
            result.population_delta -= drafted as i32;
            result.announcements.push(event.announcement.clone());
            if event.permanent {
                let casualties = (drafted as f32 * cfg.wartime_casualty_rate).floor() as u32;
                self.total_casualties += casualties;
                let delay = match rng.as_deref_mut() {
                    Some(r) => r.int_range(cfg.wartime_return_min, cfg.wartime_return_max),
                    None => cfg.wartime_return_min,
                };
                self.return_queue
                    .schedule(total_ticks + delay as Tick, drafted - casualties);
            } else {
                let delay = match rng.as_deref_mut() {
                    Some(r) => r.int_range(cfg.conscription_return_min, cfg.conscription_return_max),
                    None => cfg.conscription_return_min,
                };
                self.return_queue
                    .schedule(total_ticks + delay as Tick, drafted);
            }
        }

        // 6. Orgnabor borrowings come with their own return duration
        let borrowings: Vec<OrgnaborEvent> = self.orgnabor_queue.drain(..).collect();
        for event in borrowings {
            let borrowed = event.borrowed_count.min(available);
            if borrowed == 0 {
                continue;
            }
            available -= borrowed;
            self.total_conscripted += borrowed;
            result.workers_conscripted += borrowed;
            result.population_delta -= borrowed as i32;
            result.announcements.push(event.announcement.clone());
            self.return_queue
                .schedule(total_ticks + event.return_duration, borrowed);
        }

        // 7. Raikom oversight
        if let Some(raikom) = self.raikom.as_mut() {
            let raikom_result = raikom.tick(total_ticks, &cfg, rng.as_deref_mut());
            result.black_marks += raikom_result.black_marks;
            result.directives_issued.extend(raikom_result.directives_issued);
            result
                .directives_expired
                .extend(raikom_result.directives_expired);
            result.announcements.extend(raikom_result.announcements);
        }

        // 8. Doctrine mechanics
        if let Some(ctx) = doctrine_ctx {
            for effect in doctrine::evaluate(ctx, rng.as_deref_mut()) {
                result.food_delta += effect.food_delta;
                result.money_delta += effect.money_delta;
                result.vodka_delta += effect.vodka_delta;
                result.population_delta += effect.population_delta;
                result.production_mult *= effect.production_mult;
                result.announcements.push(effect.description.clone());
                result.doctrine_effects.push(effect);
            }
        }

        self.known_black_marks += result.black_marks;

        debug!(
            tick = total_ticks,
            returned = result.workers_returned,
            conscripted = result.workers_conscripted,
            arrests = result.arrests,
            marks = result.black_marks,
            "directory tick"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeededRng;
    use crate::core::types::CitizenClass;
    use crate::world::building::BuildingKind;
    use crate::world::citizen::Citizen;

    fn settlement(population: usize) -> World {
        let mut world = World::new();
        world.spawn_building(BuildingKind::Farm, GridPos::new(0, 0));
        world.spawn_building(BuildingKind::Mine, GridPos::new(1, 0));
        world.spawn_building(BuildingKind::Workshop, GridPos::new(2, 0));
        for _ in 0..population {
            world.spawn_citizen(Citizen::adult(CitizenClass::Worker));
        }
        world
    }

    #[test]
    fn test_sync_entities_within_range() {
        let world = settlement(30);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        let mut rng = SeededRng::new(4);
        directory.sync_entities(
            &world,
            SettlementTier::Gorodok,
            Era::Nep,
            0.0,
            0,
            Some(&mut rng),
        );

        for role in ROLE_ORDER {
            let range = role_range(SettlementTier::Gorodok, role);
            let count = directory.role_count(role);
            assert!(
                count >= range.min && count <= range.max,
                "{:?} count {} outside [{}, {}]",
                role,
                count,
                range.min,
                range.max
            );
        }
    }

    #[test]
    fn test_wartime_doubles_military() {
        let world = settlement(30);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        directory.sync_entities(
            &world,
            SettlementTier::Gorod,
            Era::GreatPatrioticWar,
            0.0,
            0,
            None,
        );
        let range = role_range(SettlementTier::Gorod, PoliticalRole::MilitaryOfficer);
        assert_eq!(
            directory.role_count(PoliticalRole::MilitaryOfficer),
            range.min * 2
        );
    }

    #[test]
    fn test_corruption_adds_kgb_agent() {
        let world = settlement(30);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        directory.sync_entities(&world, SettlementTier::Posyolok, Era::Nep, 80.0, 0, None);
        let range = role_range(SettlementTier::Posyolok, PoliticalRole::KgbAgent);
        assert_eq!(directory.role_count(PoliticalRole::KgbAgent), range.min + 1);
    }

    #[test]
    fn test_sync_converges_on_repeat() {
        let world = settlement(30);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        directory.sync_entities(&world, SettlementTier::Posyolok, Era::Nep, 0.0, 0, None);
        let first = directory.entity_count();
        directory.sync_entities(&world, SettlementTier::Posyolok, Era::Nep, 0.0, 0, None);
        assert_eq!(directory.entity_count(), first, "idempotent without rng");
    }

    #[test]
    fn test_politruk_population_sync() {
        let world = settlement(60);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        directory.sync_politruks_by_population(&world, 1.0, 1.0, 0, None);
        // 60 citizens / 20 per politruk
        assert_eq!(directory.role_count(PoliticalRole::Politruk), 3);

        directory.sync_politruks_by_population(&world, 2.0, 1.0, 0, None);
        assert_eq!(directory.role_count(PoliticalRole::Politruk), 6);
    }

    #[test]
    fn test_conscription_drafts_and_schedules_return() {
        let world = settlement(20);
        let config = SimConfig::default();
        let mut directory = PoliticalDirectory::new(config.clone());
        directory.queue_conscription(5, false, "The district demands men".into());

        let result = directory.tick(&world, 10, None, None);
        assert_eq!(result.workers_conscripted, 5);
        assert_eq!(result.population_delta, -5);
        assert_eq!(directory.outstanding_returns(), 5);

        // Return lands at min delay without a random source
        let return_tick = 10 + config.conscription_return_min as Tick;
        let result = directory.tick(&world, return_tick, None, None);
        assert_eq!(result.workers_returned, 5);
        assert_eq!(directory.outstanding_returns(), 0);
        assert_eq!(directory.total_conscripted(), directory.total_returned());
    }

    #[test]
    fn test_rejected_conscription_drafts_nobody() {
        let world = settlement(20);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        let event_id = directory.queue_conscription(5, false, "Demand".into());
        assert!(directory.reject_conscription(event_id));
        assert!(!directory.reject_conscription(event_id), "already responded");

        let result = directory.tick(&world, 10, None, None);
        assert_eq!(result.workers_conscripted, 0);
        assert_eq!(directory.outstanding_returns(), 0);
    }

    #[test]
    fn test_wartime_casualties_never_return() {
        let world = settlement(50);
        let config = SimConfig::default();
        let mut directory = PoliticalDirectory::new(config.clone());
        directory.queue_conscription(10, true, "To the front".into());

        directory.tick(&world, 0, None, None);
        assert_eq!(directory.total_casualties(), 3, "30% of 10, floored");
        assert_eq!(directory.outstanding_returns(), 7);

        directory.tick(&world, config.wartime_return_min as Tick, None, None);
        assert_eq!(
            directory.total_conscripted(),
            directory.total_returned() + directory.total_casualties()
        );
    }

    #[test]
    fn test_conscription_capped_by_population() {
        let world = settlement(3);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        directory.queue_conscription(10, false, "Demand".into());
        let result = directory.tick(&world, 0, None, None);
        assert_eq!(result.workers_conscripted, 3);
    }

    #[test]
    fn test_blat_below_threshold_never_triggers() {
        let world = settlement(10);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        let mut rng = SeededRng::new(1);
        for _ in 0..100 {
            assert!(directory
                .check_blat_kgb_risk(&world, 10.0, &mut rng)
                .is_none());
        }
        assert!(directory.active_investigations().is_empty());
    }

    #[test]
    fn test_raikom_created_above_selo_only() {
        let world = settlement(10);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        directory.sync_entities(&world, SettlementTier::Selo, Era::Nep, 0.0, 0, None);
        assert!(directory.raikom().is_none());

        directory.sync_entities(&world, SettlementTier::Posyolok, Era::Nep, 0.0, 0, None);
        assert!(directory.raikom().is_some());
    }

    #[test]
    fn test_investigations_terminate() {
        let world = settlement(10);
        let config = SimConfig::default();
        let mut directory = PoliticalDirectory::new(config.clone());
        let mut rng = SeededRng::new(33);
        directory.sync_entities(
            &world,
            SettlementTier::Gorod,
            Era::GreatTerror,
            0.0,
            0,
            Some(&mut rng),
        );
        let open = directory.active_investigations().len();
        assert!(open > 0, "agents open investigations on arrival");

        // Every investigation must resolve within the configured maximum
        let mut resolved = 0;
        for tick in 0..(config.investigation_max_ticks as Tick + 1) {
            let result = directory.tick(&world, tick, None, Some(&mut rng));
            resolved += result.investigations_resolved.len();
        }
        assert!(resolved >= open, "initial investigations all resolved");
    }

    #[test]
    fn test_doctrine_effects_flow_into_result() {
        let world = settlement(10);
        let mut directory = PoliticalDirectory::new(SimConfig::default());
        let ctx = DoctrineContext {
            era: Era::WarCommunism,
            total_ticks: 120,
            population: 10,
            food: 200.0,
            quota_progress: 1.0,
        };
        let result = directory.tick(&world, 120, Some(&ctx), None);
        assert_eq!(result.doctrine_effects.len(), 1);
        assert_eq!(result.food_delta, -50.0);
    }
}
