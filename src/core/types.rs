//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for citizens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CitizenId(pub u64);

/// Unique identifier for buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u64);

/// Unique identifier for political actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Grid position on the settlement map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Citizen class determines labor affinity and political weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitizenClass {
    Worker,
    Engineer,
    Farmer,
    PartyOfficial,
    Soldier,
    Prisoner,
}

/// Who made a citizen's current labor assignment
///
/// Forced and Player assignments are never overwritten by the governor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    #[default]
    Auto,
    Player,
    Forced,
}

/// Settlement tier (ascending administrative rank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettlementTier {
    Selo = 1,
    Posyolok = 2,
    Gorodok = 3,
    Gorod = 4,
}

impl SettlementTier {
    /// Returns true if this tier outranks the other
    pub fn outranks(&self, other: &SettlementTier) -> bool {
        (*self as u8) > (*other as u8)
    }
}

/// Historical era governing doctrine mechanics and entity scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era {
    WarCommunism,
    Nep,
    Collectivization,
    GreatTerror,
    GreatPatrioticWar,
    Reconstruction,
    Stagnation,
}

impl Era {
    /// Wartime eras double military and conscription officer counts
    pub fn is_wartime(&self) -> bool {
        matches!(self, Era::GreatPatrioticWar)
    }
}

/// Role of a political actor
///
/// The four roles have fundamentally different per-tick logic; dispatch is
/// an exhaustive match, not a shared behavioral trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoliticalRole {
    Politruk,
    KgbAgent,
    MilitaryOfficer,
    ConscriptionOfficer,
}

/// Politruk personality, tunes session strictness and corruption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolitrukPersonality {
    Zealous,
    Lazy,
    Paranoid,
    Corrupt,
}

/// Raikom secretary personality, tunes directive pools and favor swings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaikomPersonality {
    Hardliner,
    Pragmatist,
    Careerist,
    Reformist,
}

/// Kind of directive the Raikom can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveKind {
    Build,
    Produce,
    Purge,
    Celebrate,
}

/// Investigation intensity, rolled at creation from agent effectiveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Routine,
    Thorough,
    Purge,
}

/// Player-chosen collective focus, gates the governor's state-demand priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectiveFocus {
    #[default]
    Balanced,
    Construction,
    Production,
    Food,
}

/// Clamp a stat to the [0, 100] range every mutation site must respect
pub fn clamp_stat(value: f32) -> f32 {
    value.clamp(0.0, 100.0)
}
