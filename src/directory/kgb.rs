//! KGB investigations and informant network
//!
//! Investigations are rolled at creation: intensity, duration and the
//! arrest decision are fixed up front, the countdown and worker flagging
//! play out over ticks. Informants report on their own schedule and feed
//! flags into whatever investigation covers their building.

use serde::{Deserialize, Serialize};

use crate::core::config::SimConfig;
use crate::core::rng::RandomSource;
use crate::core::types::{GridPos, Intensity, Tick};

/// Informant report scheduling window (ticks)
const REPORT_INTERVAL_MIN: i64 = 60;
const REPORT_INTERVAL_MAX: i64 = 120;

/// An active investigation of one building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigation {
    pub target_building: GridPos,
    pub ticks_remaining: i64,
    pub intensity: Intensity,
    pub flagged_workers: u32,
    /// Decided at creation from intensity
    pub should_arrest: bool,
    /// Skill level the investigation nominally hunts for
    pub target_skill_level: f32,
}

/// Terminal outcome of one investigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationOutcome {
    pub building: GridPos,
    pub intensity: Intensity,
    pub flagged_workers: u32,
    pub black_mark: bool,
    pub arrests: u32,
}

/// A planted informant, reporting on its own cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Informant {
    pub id: u64,
    pub building_pos: GridPos,
    pub next_report_tick: Tick,
    /// Reliability [0, 100]; report flag chance is reliability / 200
    pub reliability: f32,
}

impl Informant {
    pub fn plant(
        id: u64,
        building_pos: GridPos,
        now: Tick,
        rng: &mut dyn RandomSource,
    ) -> Self {
        Self {
            id,
            building_pos,
            next_report_tick: now + rng.int_range(REPORT_INTERVAL_MIN, REPORT_INTERVAL_MAX) as Tick,
            reliability: rng.int_range(40, 90) as f32,
        }
    }

    /// Whether this report flags a worker; reschedules either way
    pub fn report(&mut self, now: Tick, rng: Option<&mut (dyn RandomSource + '_)>) -> bool {
        match rng {
            Some(r) => {
                self.next_report_tick =
                    now + r.int_range(REPORT_INTERVAL_MIN, REPORT_INTERVAL_MAX) as Tick;
                r.coin_flip(self.reliability / 200.0)
            }
            None => {
                self.next_report_tick = now + REPORT_INTERVAL_MIN as Tick;
                false
            }
        }
    }
}

/// Open an investigation at a target building
///
/// Intensity is weighted by the agent's effectiveness; marks above the
/// escalation threshold shift the weights toward purges. Without a random
/// source the investigation is routine and minimum length.
pub fn open_investigation(
    target: GridPos,
    effectiveness: f32,
    escalated: bool,
    config: &SimConfig,
    rng: Option<&mut (dyn RandomSource + '_)>,
) -> Investigation {
    let (intensity, ticks, skill) = match rng {
        Some(r) => {
            let weights: [f32; 3] = if escalated {
                [0.3, 0.4, 0.3]
            } else if effectiveness > 70.0 {
                [0.4, 0.4, 0.2]
            } else {
                [0.6, 0.3, 0.1]
            };
            let intensity = match r.weighted_index(&weights) {
                0 => Intensity::Routine,
                1 => Intensity::Thorough,
                _ => Intensity::Purge,
            };
            let ticks = r.int_range(config.investigation_min_ticks, config.investigation_max_ticks);
            let skill = r.int_range(20, 80) as f32;
            (intensity, ticks, skill)
        }
        None => (Intensity::Routine, config.investigation_min_ticks, 50.0),
    };

    Investigation {
        target_building: target,
        ticks_remaining: ticks,
        intensity,
        flagged_workers: 0,
        should_arrest: intensity != Intensity::Routine,
        target_skill_level: skill,
    }
}

/// Black mark chance on resolution, by intensity
fn mark_chance(intensity: Intensity) -> f32 {
    match intensity {
        Intensity::Routine => 0.0,
        Intensity::Thorough => 0.3,
        Intensity::Purge => 0.6,
    }
}

/// Resolve a finished investigation
///
/// Arrests are deterministic given the flag count; only the black mark is
/// a roll, so an unbound random source yields no mark.
pub fn resolve_investigation(
    investigation: &Investigation,
    config: &SimConfig,
    rng: Option<&mut (dyn RandomSource + '_)>,
) -> InvestigationOutcome {
    let black_mark = match rng {
        Some(r) => r.coin_flip(mark_chance(investigation.intensity)),
        None => false,
    };

    let arrests = if investigation.should_arrest && investigation.flagged_workers > 0 {
        let multiplier = if investigation.intensity == Intensity::Purge {
            3
        } else {
            1
        };
        config.arrest_count * multiplier
    } else {
        0
    };

    InvestigationOutcome {
        building: investigation.target_building,
        intensity: investigation.intensity,
        flagged_workers: investigation.flagged_workers,
        black_mark,
        arrests,
    }
}

/// Per-call chance that the current blat level draws an investigation
///
/// Blat at or below the safe threshold never draws attention.
pub fn blat_investigation_chance(blat: f32, config: &SimConfig) -> f32 {
    if blat <= config.blat_safe_threshold {
        return 0.0;
    }
    (blat - config.blat_safe_threshold) * config.blat_risk_per_point
}
