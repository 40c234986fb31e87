//! Political actor stats and role-count scaling tables

use serde::{Deserialize, Serialize};

use crate::core::types::{
    BuildingId, EntityId, GridPos, PoliticalRole, PolitrukPersonality, SettlementTier,
};

/// Per-actor stats owned by the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliticalEntityStats {
    pub id: EntityId,
    pub role: PoliticalRole,
    pub name: String,
    pub stationed_at: GridPos,
    pub target_building: Option<BuildingId>,
    /// Countdown to reassignment
    pub ticks_remaining: i64,
    /// Effectiveness [0, 100]
    pub effectiveness: f32,
    /// Politruks only
    pub personality: Option<PolitrukPersonality>,
    /// Monotonic spawn order; reconciliation deletes oldest first
    #[serde(default)]
    pub spawned_order: u64,
}

/// [min, max] actor count for one role at one tier
#[derive(Debug, Clone, Copy)]
pub struct RoleRange {
    pub min: u32,
    pub max: u32,
}

/// Tier scaling table: how many actors of each role a settlement warrants
pub fn role_range(tier: SettlementTier, role: PoliticalRole) -> RoleRange {
    use PoliticalRole::*;
    use SettlementTier::*;
    let (min, max) = match (tier, role) {
        (Selo, Politruk) => (0, 1),
        (Selo, KgbAgent) => (0, 1),
        (Selo, MilitaryOfficer) => (0, 1),
        (Selo, ConscriptionOfficer) => (0, 0),

        (Posyolok, Politruk) => (1, 2),
        (Posyolok, KgbAgent) => (1, 2),
        (Posyolok, MilitaryOfficer) => (1, 2),
        (Posyolok, ConscriptionOfficer) => (0, 1),

        (Gorodok, Politruk) => (2, 4),
        (Gorodok, KgbAgent) => (2, 3),
        (Gorodok, MilitaryOfficer) => (2, 3),
        (Gorodok, ConscriptionOfficer) => (1, 2),

        (Gorod, Politruk) => (3, 6),
        (Gorod, KgbAgent) => (3, 5),
        (Gorod, MilitaryOfficer) => (3, 4),
        (Gorod, ConscriptionOfficer) => (2, 3),
    };
    RoleRange { min, max }
}
