//! Simulation configuration with documented constants
//!
//! All tuning knobs are collected here with explanations of their purpose.
//! These are design knobs, not physical law; changing them shifts pacing
//! and pressure, never correctness.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::Result;

/// Configuration for the simulation core
///
/// Every probability and threshold the tick pipeline, the governor and the
/// political state machines consult lives here so test scenarios can pin
/// exact values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === POPULATION LEDGER ===
    /// Citizens younger than this are never touched by the governor
    pub min_working_age: u32,

    /// The governor runs every Nth ledger tick
    ///
    /// Throttling is a cost/behavior trade-off, not a correctness
    /// requirement. The interval is fixed so tests know exactly which
    /// ticks reassign.
    pub governor_interval: u64,

    /// Vodka units one fully dependent citizen drinks per tick
    ///
    /// Actual demand scales linearly with vodka_dependency / 100.
    pub vodka_ration: f64,

    /// Food units one citizen eats per tick
    pub food_ration: f64,

    /// Dependency gained on every satisfied vodka draw (addiction ratchets
    /// upward, it never decays on its own)
    pub addiction_ratchet: f32,

    /// Morale gained per satisfied vodka draw at full dependency
    ///
    /// Scales linearly with vodka_dependency / 100.
    pub vodka_morale_gain: f32,

    /// Morale lost per tick of withdrawal, scaled by dependency
    pub withdrawal_morale_penalty: f32,

    /// Loyalty lost per unsatisfied vodka draw
    pub withdrawal_loyalty_penalty: f32,

    /// Morale lost per unsatisfied food draw
    pub hunger_morale_penalty: f32,

    /// Loyalty lost per unsatisfied food draw
    pub hunger_loyalty_penalty: f32,

    /// Hunger moved per tick, down on a full ration and up on a missed one
    pub hunger_step: f32,

    /// Morale gained per tick for housed citizens
    pub housing_morale_bonus: f32,

    /// Morale lost per tick for homeless citizens
    pub homeless_morale_penalty: f32,

    /// Ambient morale boost per tick when any party official lives in the
    /// settlement
    pub party_official_morale_boost: f32,

    /// Loyalty below this starts the defection check
    pub defection_loyalty_threshold: f32,

    /// Per-tick defection chance at loyalty 0 (scales linearly up from the
    /// threshold)
    pub defection_max_chance: f32,

    /// Fixed per-tick escape chance for prisoners
    pub prisoner_escape_chance: f32,

    /// Morale above which assigned workers may have an exceptional shift
    pub exceptional_morale_threshold: f32,

    /// Per-tick chance of an exceptional performance event
    pub exceptional_chance: f32,

    /// Skill gained per tick while assigned
    pub skill_growth_rate: f32,

    /// Production efficiency bonus for class/building affinity
    pub affinity_bonus: f32,

    /// Hunger above this makes survival the citizen's top priority
    pub starvation_hunger_threshold: f32,

    /// Food-per-capita below this is a collective crisis (survive priority
    /// for everyone)
    pub food_crisis_per_capita: f64,

    /// Buildings below this durability attract the improve priority
    pub repair_durability_threshold: f32,

    // === POLITICAL DIRECTORY ===
    /// Ticks a political actor stays at one station, lower bound
    pub station_duration_min: i64,

    /// Ticks a political actor stays at one station, upper bound
    pub station_duration_max: i64,

    /// Politruks may hold an ideology session every Nth tick
    pub session_interval: u64,

    /// Fraction of a building's workers pulled into a session
    pub session_pull_ratio: f32,

    /// Chance a newly stationed KGB agent plants an informant
    pub informant_plant_chance: f32,

    /// Per-tick chance an active investigation flags another worker
    pub investigation_flag_chance: f32,

    /// Investigation duration bounds (ticks)
    pub investigation_min_ticks: i64,
    pub investigation_max_ticks: i64,

    /// Accumulated black marks above this escalate new investigations
    pub escalation_mark_threshold: u32,

    /// Workers removed by an arrest (tripled for purge intensity)
    pub arrest_count: u32,

    /// Blat at or below this never draws KGB attention
    pub blat_safe_threshold: f32,

    /// Investigation chance per point of blat above the safe threshold
    pub blat_risk_per_point: f32,

    /// Corruption above this adds one extra KGB agent to the target count
    pub corruption_kgb_threshold: f32,

    /// One politruk per this many citizens
    pub politruk_population_divisor: u32,

    /// Conscription return window (ticks)
    pub conscription_return_min: i64,
    pub conscription_return_max: i64,

    /// Wartime permanent-draft survivor return window (ticks)
    pub wartime_return_min: i64,
    pub wartime_return_max: i64,

    /// Fraction of wartime drafts that never return
    pub wartime_casualty_rate: f32,

    // === RAIKOM ===
    /// Base ticks between Raikom visits
    pub raikom_visit_interval: u64,

    /// Visit rescheduling jitter, +/- ticks
    pub raikom_visit_jitter: i64,

    /// Maximum simultaneously active directives
    pub raikom_directive_cap: usize,

    /// Favor lost when a directive expires unfulfilled
    pub raikom_expiry_favor_penalty: f32,

    /// Favor at or above this sends a good report to Moscow
    pub raikom_good_report_threshold: f32,

    /// Favor below this sends a bad report to Moscow
    pub raikom_bad_report_threshold: f32,

    /// Favor lost on a bad Moscow report
    pub raikom_bad_report_favor_penalty: f32,

    /// Favor gained per unit of blat offered
    pub blat_favor_rate: f32,

    /// Favor drifts one step of this size toward 50 on every visit
    pub raikom_favor_drift: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Population ledger
            min_working_age: 16,
            governor_interval: 5,
            vodka_ration: 0.05,
            food_ration: 0.1,
            addiction_ratchet: 0.5,
            vodka_morale_gain: 2.0,
            withdrawal_morale_penalty: 1.0,
            withdrawal_loyalty_penalty: 0.5,
            hunger_morale_penalty: 1.0,
            hunger_loyalty_penalty: 0.5,
            hunger_step: 5.0,
            housing_morale_bonus: 0.5,
            homeless_morale_penalty: 0.5,
            party_official_morale_boost: 0.2,
            defection_loyalty_threshold: 30.0,
            defection_max_chance: 0.02,
            prisoner_escape_chance: 0.002,
            exceptional_morale_threshold: 90.0,
            exceptional_chance: 0.005,
            skill_growth_rate: 0.05,
            affinity_bonus: 0.25,
            starvation_hunger_threshold: 80.0,
            food_crisis_per_capita: 0.5,
            repair_durability_threshold: 50.0,

            // Political directory
            station_duration_min: 40,
            station_duration_max: 120,
            session_interval: 20,
            session_pull_ratio: 0.3,
            informant_plant_chance: 0.3,
            investigation_flag_chance: 0.1,
            investigation_min_ticks: 30,
            investigation_max_ticks: 90,
            escalation_mark_threshold: 3,
            arrest_count: 2,
            blat_safe_threshold: 15.0,
            blat_risk_per_point: 0.01,
            corruption_kgb_threshold: 50.0,
            politruk_population_divisor: 20,
            conscription_return_min: 180,
            conscription_return_max: 360,
            wartime_return_min: 360,
            wartime_return_max: 720,
            wartime_casualty_rate: 0.30,

            // Raikom
            raikom_visit_interval: 600,
            raikom_visit_jitter: 120,
            raikom_directive_cap: 3,
            raikom_expiry_favor_penalty: 10.0,
            raikom_good_report_threshold: 70.0,
            raikom_bad_report_threshold: 30.0,
            raikom_bad_report_favor_penalty: 5.0,
            blat_favor_rate: 2.0,
            raikom_favor_drift: 5.0,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        use crate::core::error::KolkhozError;

        if self.governor_interval == 0 {
            return Err(KolkhozError::InvalidConfig(
                "governor_interval must be >= 1".into(),
            ));
        }
        if self.investigation_min_ticks > self.investigation_max_ticks {
            return Err(KolkhozError::InvalidConfig(format!(
                "investigation_min_ticks ({}) must be <= investigation_max_ticks ({})",
                self.investigation_min_ticks, self.investigation_max_ticks
            )));
        }
        if self.conscription_return_min > self.conscription_return_max {
            return Err(KolkhozError::InvalidConfig(
                "conscription return window is inverted".into(),
            ));
        }
        if self.raikom_bad_report_threshold >= self.raikom_good_report_threshold {
            return Err(KolkhozError::InvalidConfig(format!(
                "raikom_bad_report_threshold ({}) must be < raikom_good_report_threshold ({})",
                self.raikom_bad_report_threshold, self.raikom_good_report_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.wartime_casualty_rate) {
            return Err(KolkhozError::InvalidConfig(
                "wartime_casualty_rate must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = SimConfig::from_toml_str("governor_interval = 10\nblat_safe_threshold = 20.0")
            .expect("partial toml should parse");
        assert_eq!(config.governor_interval, 10);
        assert_eq!(config.blat_safe_threshold, 20.0);
        // Untouched fields keep defaults
        assert_eq!(config.min_working_age, 16);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut config = SimConfig::default();
        config.investigation_min_ticks = 100;
        config.investigation_max_ticks = 10;
        assert!(config.validate().is_err());
    }
}
