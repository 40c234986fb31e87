//! Raikom secretary: district oversight, directives and favor
//!
//! The Raikom exists only above the lowest settlement tier and interacts on
//! a long visit cadence. Between visits the only moving parts are directive
//! deadlines; favor drifts back toward neutral on each visit so neither
//! grace nor disgrace is permanent.

use serde::{Deserialize, Serialize};

use crate::core::config::SimConfig;
use crate::core::rng::RandomSource;
use crate::core::types::{clamp_stat, DirectiveKind, RaikomPersonality, Tick};

/// Neutral favor, the drift target
const FAVOR_NEUTRAL: f32 = 50.0;

/// One directive handed down by the Raikom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaikomDirective {
    pub id: u64,
    pub description: String,
    pub kind: DirectiveKind,
    pub deadline_tick: Tick,
    /// Black marks charged if the deadline passes unfulfilled
    pub penalty_marks: u32,
    pub fulfilled: bool,
}

/// What one Raikom tick produced
#[derive(Debug, Clone, Default)]
pub struct RaikomTickResult {
    pub directives_issued: Vec<RaikomDirective>,
    pub directives_expired: Vec<RaikomDirective>,
    pub black_marks: u32,
    pub good_report: bool,
    pub bad_report: bool,
    pub announcements: Vec<String>,
}

/// District committee state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaikomState {
    pub name: String,
    pub personality: RaikomPersonality,
    /// Favor [0, 100]
    pub favor: f32,
    /// Lifetime blat units accepted
    pub blat_accepted: f64,
    pub next_visit_tick: Tick,
    pub active_directives: Vec<RaikomDirective>,
    pub reports_to_moscow: u32,
    #[serde(default)]
    next_directive_id: u64,
}

struct DirectiveTemplate {
    kind: DirectiveKind,
    description: &'static str,
    deadline_offset: u64,
    penalty_marks: u32,
}

/// Personality-specific directive pool
fn templates(personality: RaikomPersonality) -> &'static [DirectiveTemplate] {
    use DirectiveKind::*;
    match personality {
        RaikomPersonality::Hardliner => &[
            DirectiveTemplate {
                kind: Purge,
                description: "Root out wreckers and saboteurs",
                deadline_offset: 400,
                penalty_marks: 2,
            },
            DirectiveTemplate {
                kind: Produce,
                description: "Exceed the production quota without excuse",
                deadline_offset: 300,
                penalty_marks: 2,
            },
            DirectiveTemplate {
                kind: Produce,
                description: "Deliver grain to the district depot",
                deadline_offset: 250,
                penalty_marks: 1,
            },
        ],
        RaikomPersonality::Pragmatist => &[
            DirectiveTemplate {
                kind: Produce,
                description: "Meet the quarterly output plan",
                deadline_offset: 350,
                penalty_marks: 1,
            },
            DirectiveTemplate {
                kind: Build,
                description: "Complete the pending construction projects",
                deadline_offset: 450,
                penalty_marks: 1,
            },
            DirectiveTemplate {
                kind: Produce,
                description: "Raise distillery throughput",
                deadline_offset: 300,
                penalty_marks: 1,
            },
        ],
        RaikomPersonality::Careerist => &[
            DirectiveTemplate {
                kind: Celebrate,
                description: "Stage a May Day demonstration worthy of the district",
                deadline_offset: 200,
                penalty_marks: 1,
            },
            DirectiveTemplate {
                kind: Produce,
                description: "Produce figures the district can report upward",
                deadline_offset: 300,
                penalty_marks: 1,
            },
            DirectiveTemplate {
                kind: Celebrate,
                description: "Erect a monument to socialist labor",
                deadline_offset: 350,
                penalty_marks: 1,
            },
        ],
        RaikomPersonality::Reformist => &[
            DirectiveTemplate {
                kind: Build,
                description: "Expand worker housing",
                deadline_offset: 500,
                penalty_marks: 1,
            },
            DirectiveTemplate {
                kind: Build,
                description: "Modernize the workshop floor",
                deadline_offset: 450,
                penalty_marks: 1,
            },
            DirectiveTemplate {
                kind: Celebrate,
                description: "Hold a congress of shock workers",
                deadline_offset: 250,
                penalty_marks: 1,
            },
        ],
    }
}

impl RaikomState {
    pub fn new(name: String, personality: RaikomPersonality, first_visit: Tick) -> Self {
        Self {
            name,
            personality,
            favor: FAVOR_NEUTRAL,
            blat_accepted: 0.0,
            next_visit_tick: first_visit,
            active_directives: Vec::new(),
            reports_to_moscow: 0,
            next_directive_id: 0,
        }
    }

    /// Mark a directive fulfilled; it is removed on the next tick
    pub fn fulfill_directive(&mut self, id: u64) -> bool {
        match self
            .active_directives
            .iter_mut()
            .find(|d| d.id == id && !d.fulfilled)
        {
            Some(directive) => {
                directive.fulfilled = true;
                true
            }
            None => false,
        }
    }

    /// Accept a blat offering and convert it to favor
    pub fn offer_blat(&mut self, units: f64, config: &SimConfig) {
        self.blat_accepted += units;
        self.favor = clamp_stat(self.favor + units as f32 * config.blat_favor_rate);
    }

    /// Advance one tick: expire overdue directives, handle a due visit
    pub fn tick(
        &mut self,
        now: Tick,
        config: &SimConfig,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
    ) -> RaikomTickResult {
        let mut result = RaikomTickResult::default();

        let mut kept = Vec::with_capacity(self.active_directives.len());
        for directive in self.active_directives.drain(..) {
            if directive.fulfilled {
                continue;
            }
            if now > directive.deadline_tick {
                result.black_marks += directive.penalty_marks;
                self.favor = clamp_stat(self.favor - config.raikom_expiry_favor_penalty);
                result.announcements.push(format!(
                    "Directive unfulfilled: {}. The Raikom is displeased.",
                    directive.description
                ));
                result.directives_expired.push(directive);
            } else {
                kept.push(directive);
            }
        }
        self.active_directives = kept;

        if now >= self.next_visit_tick {
            self.visit(now, config, rng.as_deref_mut(), &mut result);
        }

        result
    }

    fn visit(
        &mut self,
        now: Tick,
        config: &SimConfig,
        mut rng: Option<&mut (dyn RandomSource + '_)>,
        result: &mut RaikomTickResult,
    ) {
        result
            .announcements
            .push(format!("Raikom secretary {} arrives for inspection", self.name));

        // New directives, bounded by the active cap
        let wanted = match rng.as_deref_mut() {
            Some(r) => r.int_range(1, 2) as usize,
            None => 1,
        };
        let pool = templates(self.personality);
        for i in 0..wanted {
            if self.active_directives.len() >= config.raikom_directive_cap {
                break;
            }
            let template = match rng.as_deref_mut() {
                Some(r) => &pool[r.int_range(0, pool.len() as i64 - 1) as usize],
                None => &pool[i % pool.len()],
            };
            let directive = RaikomDirective {
                id: self.next_directive_id,
                description: template.description.to_string(),
                kind: template.kind,
                deadline_tick: now + template.deadline_offset,
                penalty_marks: template.penalty_marks,
                fulfilled: false,
            };
            self.next_directive_id += 1;
            result
                .announcements
                .push(format!("New directive: {}", directive.description));
            self.active_directives.push(directive.clone());
            result.directives_issued.push(directive);
        }

        // Report to Moscow based on standing favor
        if self.favor >= config.raikom_good_report_threshold {
            self.reports_to_moscow += 1;
            result.good_report = true;
            result
                .announcements
                .push("A favorable report travels to Moscow".to_string());
        } else if self.favor < config.raikom_bad_report_threshold {
            self.reports_to_moscow += 1;
            self.favor = clamp_stat(self.favor - config.raikom_bad_report_favor_penalty);
            result.black_marks += 1;
            result.bad_report = true;
            result
                .announcements
                .push("An unfavorable report travels to Moscow".to_string());
        }

        // Favor drifts one step back toward neutral
        if self.favor > FAVOR_NEUTRAL {
            self.favor = (self.favor - config.raikom_favor_drift).max(FAVOR_NEUTRAL);
        } else if self.favor < FAVOR_NEUTRAL {
            self.favor = (self.favor + config.raikom_favor_drift).min(FAVOR_NEUTRAL);
        }

        let jitter = match rng {
            Some(r) => r.int_range(-config.raikom_visit_jitter, config.raikom_visit_jitter),
            None => 0,
        };
        self.next_visit_tick =
            now + (config.raikom_visit_interval as i64 + jitter).max(1) as Tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeededRng;

    fn raikom(personality: RaikomPersonality) -> RaikomState {
        RaikomState::new("Comrade Orlov".into(), personality, 600)
    }

    #[test]
    fn test_expiry_charges_penalty_marks() {
        let config = SimConfig::default();
        let mut state = raikom(RaikomPersonality::Hardliner);
        state.active_directives.push(RaikomDirective {
            id: 0,
            description: "Deliver grain".into(),
            kind: DirectiveKind::Produce,
            deadline_tick: 100,
            penalty_marks: 2,
            fulfilled: false,
        });

        let favor_before = state.favor;
        let result = state.tick(101, &config, None);
        assert_eq!(result.black_marks, 2);
        assert_eq!(result.directives_expired.len(), 1);
        assert!(state.active_directives.is_empty());
        assert_eq!(
            state.favor,
            favor_before - config.raikom_expiry_favor_penalty
        );
    }

    #[test]
    fn test_fulfilled_directive_removed_without_penalty() {
        let config = SimConfig::default();
        let mut state = raikom(RaikomPersonality::Pragmatist);
        state.active_directives.push(RaikomDirective {
            id: 7,
            description: "Meet the plan".into(),
            kind: DirectiveKind::Produce,
            deadline_tick: 100,
            penalty_marks: 1,
            fulfilled: false,
        });
        assert!(state.fulfill_directive(7));
        assert!(!state.fulfill_directive(7), "already fulfilled");

        let result = state.tick(101, &config, None);
        assert_eq!(result.black_marks, 0);
        assert!(state.active_directives.is_empty());
    }

    #[test]
    fn test_visit_respects_directive_cap() {
        let config = SimConfig::default();
        let mut state = raikom(RaikomPersonality::Careerist);
        let mut rng = SeededRng::new(21);
        // Run enough visits to hit the cap
        for _ in 0..6 {
            let visit_at = state.next_visit_tick;
            state.tick(visit_at, &config, Some(&mut rng));
            // Keep directives alive so they pile up against the cap
            for d in &mut state.active_directives {
                d.deadline_tick = visit_at + 100_000;
            }
            assert!(state.active_directives.len() <= config.raikom_directive_cap);
        }
    }

    #[test]
    fn test_blat_buys_favor() {
        let config = SimConfig::default();
        let mut state = raikom(RaikomPersonality::Careerist);
        state.offer_blat(10.0, &config);
        assert_eq!(state.favor, 70.0);
        assert_eq!(state.blat_accepted, 10.0);
        state.offer_blat(100.0, &config);
        assert_eq!(state.favor, 100.0, "favor clamps at 100");
    }

    #[test]
    fn test_bad_report_below_threshold() {
        let config = SimConfig::default();
        let mut state = raikom(RaikomPersonality::Hardliner);
        state.favor = 10.0;
        let result = state.tick(state.next_visit_tick, &config, None);
        assert!(result.bad_report);
        assert_eq!(result.black_marks, 1);
        assert_eq!(state.reports_to_moscow, 1);
    }

    #[test]
    fn test_favor_drifts_toward_neutral() {
        let config = SimConfig::default();
        let mut state = raikom(RaikomPersonality::Reformist);
        state.favor = 90.0;
        state.tick(state.next_visit_tick, &config, None);
        assert_eq!(state.favor, 90.0 - config.raikom_favor_drift);
    }
}
