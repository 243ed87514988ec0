//! Engine policy configuration.
//!
//! Every tunable the evaluator, scorer, and planner use lives here: blend
//! weights, redundancy targets, score bands, and the role-fit and
//! motivation lookup tables. Loaded from a JSON policy file; tests and
//! callers without one use the defaults.

use crate::types::Level;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnginePolicy {
    pub readiness: ReadinessPolicy,
    pub scoring: ScoringPolicy,
    pub planning: PlanningPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    /// Weight of the critical-requirement bucket in the readiness blend.
    pub critical_weight: f64,
    pub non_critical_weight: f64,
    /// Qualified-member target for critical requirements (redundancy).
    pub critical_target_count: u32,
    pub standard_target_count: u32,
    /// "High interest" gate used when ranking capable members.
    pub high_interest_max_rank: u32,
    pub high_interest_min_involvement_pct: f64,
    /// At most this many critical gaps are named in recommendations.
    pub max_named_gaps: usize,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            critical_weight: 0.70,
            non_critical_weight: 0.30,
            critical_target_count: 2,
            standard_target_count: 1,
            high_interest_max_rank: 3,
            high_interest_min_involvement_pct: 50.0,
            max_named_gaps: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorWeights {
    pub interest: f64,
    pub skill: f64,
    pub experience: f64,
    pub capacity: f64,
    pub learning_style: f64,
    pub team_role: f64,
    pub motivation: f64,
    pub eq: f64,
}

impl FactorWeights {
    /// Combined weight of the factors that never depend on a behavioral
    /// profile: interest, skill, experience, capacity, learning style.
    pub fn baseline_total(&self) -> f64 {
        self.interest + self.skill + self.experience + self.capacity + self.learning_style
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            interest: 0.30,
            skill: 0.25,
            experience: 0.15,
            capacity: 0.10,
            learning_style: 0.05,
            team_role: 0.05,
            motivation: 0.05,
            eq: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierThresholds {
    pub immediate: f64,
    pub short_term: f64,
    pub medium_term: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DevelopmentNeedThresholds {
    pub skill_below: f64,
    pub experience_below: f64,
    pub interest_below: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weights: FactorWeights,
    /// Interest factor decay per preference rank step below the top.
    pub rank_decay: f64,
    pub recommend_threshold: f64,
    pub tiers: TierThresholds,
    pub needs: DevelopmentNeedThresholds,
    /// Factor value used where no signal exists.
    pub neutral_score: f64,
    /// Team-role fit: archetype (lowercase) -> service line (lowercase) -> fit.
    pub role_fit: HashMap<String, HashMap<String, f64>>,
    /// Fit used when an archetype has no entry for a line.
    pub role_fit_default: f64,
    /// Service line (lowercase) -> motivational driver the line rewards.
    pub line_drivers: HashMap<String, String>,
    /// Slope applied to (driver_score - neutral) when driver and line align.
    pub motivation_slope: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            rank_decay: 12.5,
            recommend_threshold: 60.0,
            tiers: TierThresholds {
                immediate: 75.0,
                short_term: 50.0,
                medium_term: 25.0,
            },
            needs: DevelopmentNeedThresholds {
                skill_below: 60.0,
                experience_below: 40.0,
                interest_below: 50.0,
            },
            neutral_score: 50.0,
            role_fit: default_role_fit(),
            role_fit_default: 60.0,
            line_drivers: default_line_drivers(),
            motivation_slope: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningPolicy {
    /// Match score at or above which a member joins the current team.
    pub core_team_threshold: f64,
    /// Match score at or above which a member is a recommended addition.
    pub addition_threshold: f64,
    pub training_max_members: usize,
    pub training_interest_above: f64,
    pub training_skill_below: f64,
    pub training_top_gaps: usize,
    /// Estimated training hours per unit of proficiency gap.
    pub training_hours_per_level: f64,
    /// Minimum skill level assumed by ad-hoc candidate searches.
    pub default_minimum_level: Level,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            core_team_threshold: 70.0,
            addition_threshold: 60.0,
            training_max_members: 5,
            training_interest_above: 60.0,
            training_skill_below: 60.0,
            training_top_gaps: 3,
            training_hours_per_level: 10.0,
            default_minimum_level: 3,
        }
    }
}

impl EnginePolicy {
    /// Load from the data/ directory. In tests, use EnginePolicy::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/policy/engine_policy.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let policy: EnginePolicy = serde_json::from_str(&content)?;
        Ok(policy)
    }
}

fn default_role_fit() -> HashMap<String, HashMap<String, f64>> {
    let table: &[(&str, &[(&str, f64)])] = &[
        ("coordinator", &[("virtual cfo", 75.0), ("business advisory", 70.0)]),
        ("shaper", &[("business advisory", 70.0), ("virtual cfo", 65.0)]),
        ("specialist", &[("tax advisory", 75.0), ("cloud accounting setup", 70.0)]),
        ("implementer", &[("cloud accounting setup", 75.0), ("management reporting", 70.0)]),
        ("completer finisher", &[("management reporting", 75.0), ("tax advisory", 70.0)]),
        ("monitor evaluator", &[("management reporting", 70.0), ("virtual cfo", 65.0)]),
        ("plant", &[("business advisory", 70.0)]),
        ("resource investigator", &[("business advisory", 75.0)]),
        ("team worker", &[("cloud accounting setup", 65.0)]),
    ];
    table
        .iter()
        .map(|(role, lines)| {
            let fits = lines.iter().map(|(l, v)| (l.to_string(), *v)).collect();
            (role.to_string(), fits)
        })
        .collect()
}

fn default_line_drivers() -> HashMap<String, String> {
    [
        ("business advisory", "achievement"),
        ("virtual cfo", "autonomy"),
        ("tax advisory", "autonomy"),
        ("management reporting", "achievement"),
        ("cloud accounting setup", "affiliation"),
    ]
    .iter()
    .map(|(l, d)| (l.to_string(), d.to_string()))
    .collect()
}
