//! Behavioral governor - autonomous labor assignment
//!
//! A pure decision function invoked by the ledger on a throttled cadence.
//! Evaluates a 5-level priority stack per eligible citizen and recommends
//! a building, or nothing when the citizen should keep its current state.

use ahash::AHashMap;

use crate::core::config::SimConfig;
use crate::core::types::{AssignmentSource, BuildingId, CollectiveFocus};
use crate::world::building::Building;
use crate::world::citizen::Citizen;
use crate::world::World;

/// Priority levels, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkPriority {
    /// Individual starvation or collective food crisis
    Survive,
    /// Active construction, when the collective focus allows
    StateDemand,
    /// Operational production buildings need staffing
    Trudodni,
    /// Buildings below the durability threshold need repair
    Improve,
    /// No state claim on this citizen's labor
    Private,
}

/// A reassignment recommendation
#[derive(Debug, Clone, Copy)]
pub struct GovernorDecision {
    pub priority: WorkPriority,
    pub target: BuildingId,
}

/// Everything the governor reads; it mutates nothing
pub struct GovernorContext<'a> {
    pub world: &'a World,
    /// Current per-building assignment counts, updated by the caller as it
    /// applies decisions so capacity is respected within one pass
    pub assignments: &'a AHashMap<BuildingId, u32>,
    pub focus: CollectiveFocus,
    /// Food per citizen after this tick's consumption
    pub food_per_capita: f64,
    pub config: &'a SimConfig,
}

/// Recommend an assignment for one citizen
///
/// Returns `None` (citizen keeps current state) when the citizen is below
/// working age, not auto-assigned, or no building matches the chosen
/// priority level.
pub fn recommend(ctx: &GovernorContext, citizen: &Citizen) -> Option<GovernorDecision> {
    if citizen.age < ctx.config.min_working_age {
        return None;
    }
    if citizen.assignment_source != AssignmentSource::Auto {
        return None;
    }

    let priority = choose_priority(ctx, citizen);
    let target = match priority {
        WorkPriority::Survive => first_open_building(ctx, |b| {
            b.kind == crate::world::building::BuildingKind::Farm && b.operational
        }),
        WorkPriority::StateDemand => first_open_building(ctx, |b| {
            b.kind == crate::world::building::BuildingKind::ConstructionSite
        }),
        WorkPriority::Trudodni => {
            first_open_building(ctx, |b| b.kind.is_production() && b.operational)
        }
        WorkPriority::Improve => first_open_building(ctx, |b| {
            b.durability < ctx.config.repair_durability_threshold
        }),
        WorkPriority::Private => None,
    }?;

    Some(GovernorDecision { priority, target })
}

/// Walk the stack top-down and pick the first level that applies
fn choose_priority(ctx: &GovernorContext, citizen: &Citizen) -> WorkPriority {
    let starving = citizen.hunger > ctx.config.starvation_hunger_threshold;
    let food_crisis = ctx.food_per_capita < ctx.config.food_crisis_per_capita;
    if starving || food_crisis {
        return WorkPriority::Survive;
    }

    let focus_allows_construction = matches!(
        ctx.focus,
        CollectiveFocus::Balanced | CollectiveFocus::Construction
    );
    let construction_active = !ctx
        .world
        .buildings_of_kind(crate::world::building::BuildingKind::ConstructionSite)
        .is_empty();
    if focus_allows_construction && construction_active {
        return WorkPriority::StateDemand;
    }

    let production_needs_staff = ctx.world.building_ids_sorted().iter().any(|id| {
        ctx.world
            .building(*id)
            .map(|b| b.kind.is_production() && b.operational && understaffed(ctx, *id, b))
            .unwrap_or(false)
    });
    if production_needs_staff {
        return WorkPriority::Trudodni;
    }

    let repairs_needed = ctx.world.building_ids_sorted().iter().any(|id| {
        ctx.world
            .building(*id)
            .map(|b| b.durability < ctx.config.repair_durability_threshold)
            .unwrap_or(false)
    });
    if repairs_needed {
        return WorkPriority::Improve;
    }

    WorkPriority::Private
}

fn understaffed(ctx: &GovernorContext, id: BuildingId, building: &Building) -> bool {
    let assigned = ctx.assignments.get(&id).copied().unwrap_or(0);
    assigned < building.capacity
}

/// First understaffed building matching the predicate, in stable id order
fn first_open_building(
    ctx: &GovernorContext,
    matches: impl Fn(&Building) -> bool,
) -> Option<BuildingId> {
    ctx.world.building_ids_sorted().into_iter().find(|id| {
        ctx.world
            .building(*id)
            .map(|b| matches(b) && understaffed(ctx, *id, b))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CitizenClass, GridPos};
    use crate::world::building::BuildingKind;

    #[test]
    fn test_underage_gets_nothing() {
        let config = SimConfig::default();
        let mut world = World::new();
        world.spawn_building(BuildingKind::Farm, GridPos::new(0, 0));
        let assignments = AHashMap::new();
        let ctx = GovernorContext {
            world: &world,
            assignments: &assignments,
            focus: CollectiveFocus::Balanced,
            food_per_capita: 0.0,
            config: &config,
        };

        let mut child = Citizen::adult(CitizenClass::Worker);
        child.age = 10;
        assert!(recommend(&ctx, &child).is_none());
    }

    #[test]
    fn test_survive_beats_construction() {
        let config = SimConfig::default();
        let mut world = World::new();
        let farm = world.spawn_building(BuildingKind::Farm, GridPos::new(0, 0));
        world.spawn_building(BuildingKind::ConstructionSite, GridPos::new(1, 0));
        let assignments = AHashMap::new();
        let ctx = GovernorContext {
            world: &world,
            assignments: &assignments,
            focus: CollectiveFocus::Construction,
            food_per_capita: 0.1, // collective crisis
            config: &config,
        };

        let citizen = Citizen::adult(CitizenClass::Worker);
        let decision = recommend(&ctx, &citizen).expect("crisis should recommend");
        assert_eq!(decision.priority, WorkPriority::Survive);
        assert_eq!(decision.target, farm);
    }

    #[test]
    fn test_no_matching_building_yields_none() {
        let config = SimConfig::default();
        let world = World::new(); // no farm anywhere
        let assignments = AHashMap::new();
        let ctx = GovernorContext {
            world: &world,
            assignments: &assignments,
            focus: CollectiveFocus::Balanced,
            food_per_capita: 0.0,
            config: &config,
        };

        let mut citizen = Citizen::adult(CitizenClass::Worker);
        citizen.hunger = 95.0;
        assert!(
            recommend(&ctx, &citizen).is_none(),
            "survive priority with no farm must keep the citizen as-is"
        );
    }

    #[test]
    fn test_player_assignment_untouched() {
        let config = SimConfig::default();
        let mut world = World::new();
        world.spawn_building(BuildingKind::Mine, GridPos::new(0, 0));
        let assignments = AHashMap::new();
        let ctx = GovernorContext {
            world: &world,
            assignments: &assignments,
            focus: CollectiveFocus::Balanced,
            food_per_capita: 10.0,
            config: &config,
        };

        let mut citizen = Citizen::adult(CitizenClass::Worker);
        citizen.assignment_source = AssignmentSource::Player;
        assert!(recommend(&ctx, &citizen).is_none());
    }

    #[test]
    fn test_trudodni_fills_production() {
        let config = SimConfig::default();
        let mut world = World::new();
        let mine = world.spawn_building(BuildingKind::Mine, GridPos::new(0, 0));
        let assignments = AHashMap::new();
        let ctx = GovernorContext {
            world: &world,
            assignments: &assignments,
            focus: CollectiveFocus::Production,
            food_per_capita: 10.0,
            config: &config,
        };

        let citizen = Citizen::adult(CitizenClass::Worker);
        let decision = recommend(&ctx, &citizen).expect("mine needs staff");
        assert_eq!(decision.priority, WorkPriority::Trudodni);
        assert_eq!(decision.target, mine);
    }
}
