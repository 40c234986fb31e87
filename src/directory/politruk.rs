//! Politruk behavior: ideology sessions
//!
//! Personality tunes everything: how often a due session is actually held,
//! how strict the loyalty screening is, and how readily failures get
//! reported upward to the KGB.

use serde::{Deserialize, Serialize};

use crate::core::config::SimConfig;
use crate::core::rng::RandomSource;
use crate::core::types::{GridPos, PolitrukPersonality};
use crate::directory::entity::PoliticalEntityStats;

/// Base fail threshold for a session loyalty screening roll, before
/// personality scaling
const SESSION_FAIL_BASE: f32 = 25.0;

/// How one personality runs its sessions
#[derive(Debug, Clone, Copy)]
pub struct PersonalityProfile {
    /// Chance to skip a session that is due
    pub skip_chance: f32,
    /// Scales the loyalty fail threshold
    pub threshold_scale: f32,
    /// Scales the chance a failure is reported to the KGB
    pub flag_mult: f32,
    /// Chance a failed attendee buys their way out of the record
    pub bribe_acceptance: f32,
    /// Attendees pulled beyond the building's share
    pub extra_attendees: u32,
    /// Production lost at the host building for the tick
    pub production_penalty: f32,
}

pub fn profile(personality: PolitrukPersonality) -> PersonalityProfile {
    match personality {
        PolitrukPersonality::Zealous => PersonalityProfile {
            skip_chance: 0.0,
            threshold_scale: 1.3,
            flag_mult: 1.2,
            bribe_acceptance: 0.0,
            extra_attendees: 2,
            production_penalty: 0.15,
        },
        PolitrukPersonality::Lazy => PersonalityProfile {
            skip_chance: 0.4,
            threshold_scale: 0.7,
            flag_mult: 0.5,
            bribe_acceptance: 0.1,
            extra_attendees: 0,
            production_penalty: 0.05,
        },
        PolitrukPersonality::Paranoid => PersonalityProfile {
            skip_chance: 0.1,
            threshold_scale: 1.1,
            flag_mult: 2.0,
            bribe_acceptance: 0.05,
            extra_attendees: 1,
            production_penalty: 0.10,
        },
        PolitrukPersonality::Corrupt => PersonalityProfile {
            skip_chance: 0.25,
            threshold_scale: 0.6,
            flag_mult: 0.3,
            bribe_acceptance: 0.5,
            extra_attendees: 0,
            production_penalty: 0.05,
        },
    }
}

/// What one ideology session produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub politruk: String,
    pub building: GridPos,
    pub attendees: u32,
    pub failures: u32,
    /// Failures reported upward to the KGB
    pub flagged: u32,
    pub production_penalty: f32,
}

/// Run one session with `attendees` workers pulled off the floor
///
/// Each attendee rolls a loyalty screening; rolls under the
/// personality-scaled threshold fail, and each failure may be flagged.
pub fn run_session(
    entity: &PoliticalEntityStats,
    attendees: u32,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> SessionRecord {
    let personality = entity.personality.unwrap_or(PolitrukPersonality::Zealous);
    let prof = profile(personality);
    let threshold = SESSION_FAIL_BASE * prof.threshold_scale;

    let mut failures = 0;
    let mut flagged = 0;
    for _ in 0..attendees {
        let roll = rng.uniform() * 100.0;
        if roll < threshold {
            // A failed attendee may buy their way out of the record
            if rng.coin_flip(prof.bribe_acceptance) {
                continue;
            }
            failures += 1;
            if rng.coin_flip(config.investigation_flag_chance * prof.flag_mult) {
                flagged += 1;
            }
        }
    }

    SessionRecord {
        politruk: entity.name.clone(),
        building: entity.stationed_at,
        attendees,
        failures,
        flagged,
        production_penalty: prof.production_penalty,
    }
}
