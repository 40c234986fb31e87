//! Citizen population ledger
//!
//! Owns per-citizen extended stats keyed to world citizen entities and runs
//! the per-tick consumption/morale/defection/production pipeline. Removal
//! and the governor run after the per-citizen loop so the iteration set is
//! never mutated mid-pass.

pub mod governor;
pub mod names;
pub mod serialize;
pub mod stats;

use ahash::AHashMap;

use crate::core::config::SimConfig;
use crate::core::rng::RandomSource;
use crate::core::types::{
    AssignmentSource, BuildingId, CitizenClass, CitizenId, CollectiveFocus, GridPos,
};
use crate::ledger::governor::{recommend, GovernorContext, WorkPriority};
use crate::ledger::stats::WorkerStats;
use crate::world::building::BuildingKind;
use crate::world::citizen::{Citizen, Gender};
use crate::world::World;

/// Spawn class weights: worker 40, engineer 15, farmer 25, party official 5,
/// soldier 10, prisoner 5
const CLASS_WEIGHTS: [(CitizenClass, f32); 6] = [
    (CitizenClass::Worker, 40.0),
    (CitizenClass::Engineer, 15.0),
    (CitizenClass::Farmer, 25.0),
    (CitizenClass::PartyOfficial, 5.0),
    (CitizenClass::Soldier, 10.0),
    (CitizenClass::Prisoner, 5.0),
];

/// A citizen lost to defection or escape this tick
#[derive(Debug, Clone, PartialEq)]
pub struct DefectionRecord {
    pub citizen: CitizenId,
    pub name: String,
    pub class: CitizenClass,
    pub escaped: bool,
}

/// A high-morale worker overfulfilled the norm
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionalRecord {
    pub citizen: CitizenId,
    pub name: String,
    pub building: BuildingId,
}

/// The governor moved a citizen to a new building
#[derive(Debug, Clone, PartialEq)]
pub struct ReassignmentRecord {
    pub citizen: CitizenId,
    pub building: BuildingId,
    pub priority: WorkPriority,
}

/// Aggregated output of one ledger tick; callers never observe partial
/// mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerTickResult {
    pub vodka_consumed: f64,
    pub food_consumed: f64,
    pub defections: Vec<DefectionRecord>,
    pub exceptional: Vec<ExceptionalRecord>,
    pub reassignments: Vec<ReassignmentRecord>,
    /// Mean production efficiency per citizen class this tick
    pub efficiency_by_class: AHashMap<CitizenClass, f32>,
    pub announcements: Vec<String>,
}

/// Owner of per-citizen extended stats and the tick pipeline
#[derive(Debug)]
pub struct CitizenLedger {
    stats: AHashMap<CitizenId, WorkerStats>,
    tick_count: u64,
    focus: CollectiveFocus,
    config: SimConfig,
}

impl CitizenLedger {
    pub fn new(config: SimConfig) -> Self {
        Self {
            stats: AHashMap::new(),
            tick_count: 0,
            focus: CollectiveFocus::default(),
            config,
        }
    }

    pub fn set_focus(&mut self, focus: CollectiveFocus) {
        self.focus = focus;
    }

    pub fn focus(&self) -> CollectiveFocus {
        self.focus
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn stats(&self, id: CitizenId) -> Option<&WorkerStats> {
        self.stats.get(&id)
    }

    pub fn stats_mut(&mut self, id: CitizenId) -> Option<&mut WorkerStats> {
        self.stats.get_mut(&id)
    }

    pub fn tracked_count(&self) -> usize {
        self.stats.len()
    }

    /// Spawn or remove citizens until the population matches `target`
    ///
    /// Removal prefers unassigned citizens first, in stable id order.
    pub fn sync_population(
        &mut self,
        world: &mut World,
        target: usize,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) {
        let pop = world.population();
        if pop < target {
            for _ in 0..(target - pop) {
                self.spawn_worker(world, None, rng.as_deref_mut());
            }
        } else if pop > target {
            let mut ids = world.citizen_ids_sorted();
            // Stable sort: unassigned citizens sort first, id order preserved
            ids.sort_by_key(|id| {
                world
                    .citizen(*id)
                    .map(|c| c.assignment.is_some())
                    .unwrap_or(false)
            });
            for id in ids.into_iter().take(pop - target) {
                self.remove_citizen(world, id);
            }
        }
    }

    /// Spawn one citizen with weighted-random class and randomized stats
    ///
    /// With no bound random source this degrades to a default worker.
    pub fn spawn_worker(
        &mut self,
        world: &mut World,
        home: Option<GridPos>,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) -> CitizenId {
        let (class, gender, age, worker_stats) = if let Some(r) = rng.as_deref_mut() {
            let weights: Vec<f32> = CLASS_WEIGHTS.iter().map(|(_, w)| *w).collect();
            let class = CLASS_WEIGHTS[r.weighted_index(&weights)].0;
            let gender = if r.coin_flip(0.5) {
                Gender::Female
            } else {
                Gender::Male
            };
            let name = names::generate_name(r, gender);
            let age = r.int_range(16, 60) as u32;
            let worker_stats = WorkerStats {
                morale: r.int_range(40, 70) as f32,
                loyalty: r.int_range(40, 80) as f32,
                skill: r.int_range(10, 40) as f32,
                vodka_dependency: r.int_range(0, 30) as f32,
                name,
                ..Default::default()
            };
            (class, gender, age, worker_stats)
        } else {
            let worker_stats = WorkerStats {
                name: "Comrade".into(),
                ..Default::default()
            };
            (CitizenClass::Worker, Gender::Male, 30, worker_stats)
        };

        let citizen = Citizen {
            name: worker_stats.name.clone(),
            class,
            hunger: 0.0,
            happiness: worker_stats.morale,
            home,
            assignment: None,
            assignment_source: AssignmentSource::Auto,
            age,
            gender,
        };
        let id = world.spawn_citizen(citizen);
        self.stats.insert(id, worker_stats);
        id
    }

    /// Assign a citizen to the building at `pos`
    ///
    /// Returns false (no mutation) if no building exists there.
    pub fn assign_worker(
        &mut self,
        world: &mut World,
        id: CitizenId,
        pos: GridPos,
        source: AssignmentSource,
    ) -> bool {
        let Some(building) = world.building_id_at(pos) else {
            return false;
        };
        let Some(citizen) = world.citizen_mut(id) else {
            return false;
        };
        citizen.assignment = Some(building);
        citizen.assignment_source = source;
        if let Some(s) = self.stats.get_mut(&id) {
            s.reset_assignment(source);
        }
        true
    }

    pub fn unassign_worker(&mut self, world: &mut World, id: CitizenId) {
        if let Some(citizen) = world.citizen_mut(id) {
            citizen.assignment = None;
            citizen.assignment_source = AssignmentSource::Auto;
        }
        if let Some(s) = self.stats.get_mut(&id) {
            s.reset_assignment(AssignmentSource::Auto);
        }
    }

    /// Remove a citizen and its stats entry atomically
    pub fn remove_citizen(&mut self, world: &mut World, id: CitizenId) {
        world.remove_citizen(id);
        self.stats.remove(&id);
    }

    /// Run the per-tick citizen pipeline
    ///
    /// Per citizen: vodka consumption, food consumption, morale adjustment
    /// and clamping, defection/escape check, production efficiency plus
    /// skill growth. Defectors are excluded from further processing and
    /// removed after the loop. The governor runs every
    /// `config.governor_interval` ticks.
    pub fn tick(
        &mut self,
        world: &mut World,
        vodka_available: f64,
        food_available: f64,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) -> WorkerTickResult {
        self.tick_count += 1;
        let cfg = self.config.clone();
        let mut result = WorkerTickResult::default();

        let ids = world.citizen_ids_sorted();
        let has_party = world.has_party_official();
        let building_kinds: AHashMap<BuildingId, BuildingKind> = world
            .building_ids_sorted()
            .into_iter()
            .filter_map(|id| world.building(id).map(|b| (id, b.kind)))
            .collect();

        let mut vodka_pool = vodka_available.min(world.resources.vodka);
        let mut food_pool = food_available.min(world.resources.food);

        let mut removals: Vec<(CitizenId, bool)> = Vec::new();
        let mut eff_sums: AHashMap<CitizenClass, (f32, u32)> = AHashMap::new();

        for id in &ids {
            let Some(c) = world.citizen(*id) else { continue };
            let class = c.class;
            let assignment = c.assignment;
            let has_home = c.home.is_some();
            let mut hunger = c.hunger;
            let citizen_name = c.name.clone();

            let stats = self.stats.entry(*id).or_insert_with(|| WorkerStats {
                name: citizen_name,
                ..Default::default()
            });

            // 1. Vodka, demand scales with dependency
            let demand = (stats.vodka_dependency as f64 / 100.0) * cfg.vodka_ration;
            if demand > 0.0 {
                if vodka_pool >= demand {
                    vodka_pool -= demand;
                    result.vodka_consumed += demand;
                    stats.ticks_since_vodka = 0;
                    stats.adjust_morale(cfg.vodka_morale_gain * stats.vodka_dependency / 100.0);
                    // Addiction ratchets upward on every satisfied draw
                    stats.adjust_dependency(cfg.addiction_ratchet);
                } else {
                    stats.ticks_since_vodka += 1;
                    let withdrawal = cfg.withdrawal_morale_penalty
                        * (stats.vodka_dependency / 100.0)
                        * (1.0 + stats.ticks_since_vodka as f32 * 0.1);
                    stats.adjust_morale(-withdrawal);
                    stats.adjust_loyalty(-cfg.withdrawal_loyalty_penalty);
                }
            }

            // 2. Food
            if food_pool >= cfg.food_ration {
                food_pool -= cfg.food_ration;
                result.food_consumed += cfg.food_ration;
                hunger = (hunger - cfg.hunger_step).max(0.0);
            } else {
                hunger = (hunger + cfg.hunger_step).min(100.0);
                stats.adjust_morale(-cfg.hunger_morale_penalty);
                stats.adjust_loyalty(-cfg.hunger_loyalty_penalty);
            }

            // 3. Housing and ambient party presence, then mirror to the
            // citizen's visible happiness
            if has_home {
                stats.adjust_morale(cfg.housing_morale_bonus);
            } else {
                stats.adjust_morale(-cfg.homeless_morale_penalty);
            }
            if has_party {
                stats.adjust_morale(cfg.party_official_morale_boost);
            }

            // 4. Defection/escape check
            let mut doomed = false;
            let mut escaped = false;
            if let Some(r) = rng.as_deref_mut() {
                if class == CitizenClass::Prisoner {
                    if r.coin_flip(cfg.prisoner_escape_chance) {
                        doomed = true;
                        escaped = true;
                    }
                } else if stats.loyalty < cfg.defection_loyalty_threshold {
                    let p = (cfg.defection_loyalty_threshold - stats.loyalty)
                        / cfg.defection_loyalty_threshold
                        * cfg.defection_max_chance;
                    if r.coin_flip(p) {
                        doomed = true;
                    }
                }
            }
            if doomed {
                result.defections.push(DefectionRecord {
                    citizen: *id,
                    name: stats.name.clone(),
                    class,
                    escaped,
                });
                removals.push((*id, escaped));
                continue;
            }

            // 5. Production efficiency, exceptional performance, skill growth
            let mut efficiency = stats.morale / 100.0 * 0.6 + stats.skill / 100.0 * 0.4;
            if let Some(building) = assignment {
                if let Some(kind) = building_kinds.get(&building) {
                    if kind.favors_class(class) {
                        efficiency += cfg.affinity_bonus;
                    }
                }
                if stats.morale > cfg.exceptional_morale_threshold {
                    if let Some(r) = rng.as_deref_mut() {
                        if r.coin_flip(cfg.exceptional_chance) {
                            result.exceptional.push(ExceptionalRecord {
                                citizen: *id,
                                name: stats.name.clone(),
                                building,
                            });
                            result
                                .announcements
                                .push(format!("{} overfulfilled the shift norm", stats.name));
                        }
                    }
                }
                stats.adjust_skill(cfg.skill_growth_rate);
                stats.assignment_duration += 1;
            }
            let entry = eff_sums.entry(class).or_insert((0.0, 0));
            entry.0 += efficiency;
            entry.1 += 1;

            let happiness = stats.morale;
            if let Some(c) = world.citizen_mut(*id) {
                c.hunger = hunger;
                c.happiness = happiness;
            }
        }

        // Removal runs after the loop; entity and stats go together
        for (id, escaped) in &removals {
            let name = self
                .stats
                .get(id)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            if *escaped {
                result
                    .announcements
                    .push(format!("Prisoner {} escaped the camp", name));
            } else {
                result
                    .announcements
                    .push(format!("{} defected in the night", name));
            }
            world.remove_citizen(*id);
            self.stats.remove(id);
        }

        world.resources.take_vodka(result.vodka_consumed);
        world.resources.take_food(result.food_consumed);

        for (class, (sum, count)) in eff_sums {
            result
                .efficiency_by_class
                .insert(class, sum / count.max(1) as f32);
        }

        if self.tick_count % cfg.governor_interval == 0 {
            self.run_governor(world, &mut result);
        }

        result
    }

    /// Throttled governor pass over all auto-assigned citizens
    fn run_governor(&mut self, world: &mut World, result: &mut WorkerTickResult) {
        let mut assignments = world.assignment_counts();
        let pop = world.population().max(1) as f64;
        let food_per_capita = world.resources.food / pop;

        for id in world.citizen_ids_sorted() {
            let decision = {
                let Some(citizen) = world.citizen(id) else { continue };
                let ctx = GovernorContext {
                    world,
                    assignments: &assignments,
                    focus: self.focus,
                    food_per_capita,
                    config: &self.config,
                };
                recommend(&ctx, citizen)
            };
            let Some(decision) = decision else { continue };

            let current = world.citizen(id).and_then(|c| c.assignment);
            if current == Some(decision.target) {
                continue;
            }

            if let Some(prev) = current {
                if let Some(n) = assignments.get_mut(&prev) {
                    *n = n.saturating_sub(1);
                }
            }
            *assignments.entry(decision.target).or_insert(0) += 1;

            if let Some(c) = world.citizen_mut(id) {
                c.assignment = Some(decision.target);
            }
            if let Some(s) = self.stats.get_mut(&id) {
                s.reset_assignment(AssignmentSource::Auto);
            }
            result.reassignments.push(ReassignmentRecord {
                citizen: id,
                building: decision.target,
                priority: decision.priority,
            });
        }

        if !result.reassignments.is_empty() {
            tracing::debug!(
                "governor reassigned {} citizens",
                result.reassignments.len()
            );
        }
    }
}
