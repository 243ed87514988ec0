//! Deployment planning — team composition, gaps, and training priorities.
//!
//! This module:
//!   1. Scores every member against a service-line requirement
//!   2. Splits the ranked matches into current team / recommended additions
//!   3. Quantifies per-skill gaps against the deployment proficiency bar
//!   4. Picks training priorities (interested but under-skilled members)
//!   5. Ranks plans across many lines by urgency (comprehensive variant)
//!
//! The only module that calls both the snapshot's coverage joins and the
//! match scorer. Data flows one way; nothing here feeds back upstream.

use crate::{
    config::EnginePolicy,
    error::EngineResult,
    model::{DeploymentRequirement, ServiceOffering, ServicePriority},
    scoring::{self, DeploymentMatch},
    snapshot::{EngineSnapshot, SkillResolution},
    types::{Level, MemberId},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ── Public types ─────────────────────────────────────────────────────────────

/// One skill the roster is collectively short on for a service line,
/// measured against the deployment requirement's proficiency bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapSummary {
    pub skill_name: String,
    pub category: String,
    /// Mean assessed level across everyone assessed in the skill.
    pub average_level: f64,
    pub required_level: Level,
    /// required - average, always > 0 for reported gaps.
    pub gap: f64,
}

/// A member worth investing training hours in for this line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPriority {
    pub member_id: MemberId,
    pub member_name: String,
    /// The line's largest gaps, attached as this member's focus areas.
    pub focus: Vec<SkillGapSummary>,
    pub estimated_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLineDeploymentPlan {
    pub service_line: String,
    pub priority: ServicePriority,
    pub current_team: Vec<DeploymentMatch>,
    pub recommended_additions: Vec<DeploymentMatch>,
    pub skill_gaps: Vec<SkillGapSummary>,
    pub training_priorities: Vec<TrainingPriority>,
}

impl ServiceLineDeploymentPlan {
    /// Total gap magnitude, the within-tier urgency measure.
    pub fn total_gap(&self) -> f64 {
        self.skill_gaps.iter().map(|g| g.gap).sum()
    }
}

// ── Planning ─────────────────────────────────────────────────────────────────

/// Build the deployment plan for one service line.
///
/// Degrades, never errors, on absent data: an empty roster or an unknown
/// service line yields empty team, gap, and training lists.
pub fn plan(
    requirement: &DeploymentRequirement,
    snapshot: &EngineSnapshot,
    policy: &EnginePolicy,
) -> EngineResult<ServiceLineDeploymentPlan> {
    let offering = snapshot.service_by_name(&requirement.service_line);
    let matches = score_roster(requirement, offering, snapshot, policy)?;

    let current_team: Vec<DeploymentMatch> = matches
        .iter()
        .filter(|m| m.match_score as f64 >= policy.planning.core_team_threshold)
        .cloned()
        .collect();
    let recommended_additions: Vec<DeploymentMatch> = matches
        .iter()
        .filter(|m| {
            (m.match_score as f64) >= policy.planning.addition_threshold
                && (m.match_score as f64) < policy.planning.core_team_threshold
        })
        .cloned()
        .collect();

    let skill_gaps = skill_gaps(requirement, offering, snapshot);
    let training_priorities = training_priorities(&matches, &skill_gaps, policy);

    log::info!(
        "planning: {} team={} additions={} gaps={} training={}",
        requirement.service_line,
        current_team.len(),
        recommended_additions.len(),
        skill_gaps.len(),
        training_priorities.len(),
    );

    Ok(ServiceLineDeploymentPlan {
        service_line: requirement.service_line.clone(),
        priority: requirement.priority,
        current_team,
        recommended_additions,
        skill_gaps,
        training_priorities,
    })
}

/// Plan every requirement and order the results by urgency: priority tier
/// first (critical before high before medium before low), then total gap
/// magnitude descending within a tier.
pub fn comprehensive_plan(
    requirements: &[DeploymentRequirement],
    snapshot: &EngineSnapshot,
    policy: &EnginePolicy,
) -> EngineResult<Vec<ServiceLineDeploymentPlan>> {
    let mut plans = Vec::with_capacity(requirements.len());
    for requirement in requirements {
        plans.push(plan(requirement, snapshot, policy)?);
    }

    plans.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(
                b.total_gap()
                    .partial_cmp(&a.total_gap())
                    .unwrap_or(Ordering::Equal),
            )
            .then_with(|| a.service_line.cmp(&b.service_line))
    });
    Ok(plans)
}

/// Top N matches for a line under the fixed default requirement — the
/// ad-hoc path for urgent deployment decisions.
pub fn best_candidates(
    service_line: &str,
    count: usize,
    snapshot: &EngineSnapshot,
    policy: &EnginePolicy,
) -> EngineResult<Vec<DeploymentMatch>> {
    let requirement =
        DeploymentRequirement::default_for(service_line, policy.planning.default_minimum_level);
    let offering = snapshot.service_by_name(service_line);
    let mut matches = score_roster(&requirement, offering, snapshot, policy)?;
    matches.truncate(count);
    Ok(matches)
}

// ── Internals ────────────────────────────────────────────────────────────────

/// Score every staff member against the requirement, highest first.
/// Member name is the deterministic tie-break.
fn score_roster(
    requirement: &DeploymentRequirement,
    offering: Option<&ServiceOffering>,
    snapshot: &EngineSnapshot,
    policy: &EnginePolicy,
) -> EngineResult<Vec<DeploymentMatch>> {
    let mut matches = Vec::with_capacity(snapshot.staff().len());
    for member in snapshot.staff() {
        let coverage = snapshot.member_coverage(member, &requirement.service_line, offering);
        let utilization = snapshot.utilization_for(&member.member_id);
        let profile = snapshot.profile_for(&member.member_id);
        matches.push(scoring::score(
            &coverage,
            requirement,
            utilization,
            profile,
            &policy.scoring,
        )?);
    }

    matches.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.member_name.cmp(&b.member_name))
    });
    Ok(matches)
}

/// Roster-wide gaps across the offering's skills, measured against the
/// deployment requirement's uniform proficiency bar: mean assessed level
/// vs the bar, kept only where positive, largest first. Unknown lines and
/// unresolvable skill names contribute nothing.
fn skill_gaps(
    requirement: &DeploymentRequirement,
    offering: Option<&ServiceOffering>,
    snapshot: &EngineSnapshot,
) -> Vec<SkillGapSummary> {
    let Some(offering) = offering else {
        return Vec::new();
    };

    let mut gaps = Vec::new();
    for req in &offering.required_skills {
        let SkillResolution::Resolved(skill) = snapshot.resolve_skill(&req.skill_name) else {
            continue;
        };

        let mut assessed = 0u32;
        let mut level_total = 0u32;
        for a in snapshot.assessments_for_skill(&skill.skill_id) {
            assessed += 1;
            level_total += a.current_level as u32;
        }
        let average_level = if assessed > 0 {
            level_total as f64 / assessed as f64
        } else {
            0.0
        };

        let gap = requirement.minimum_skill_level as f64 - average_level;
        if gap > 0.0 {
            gaps.push(SkillGapSummary {
                skill_name: skill.name.clone(),
                category: skill.category.clone(),
                average_level,
                required_level: requirement.minimum_skill_level,
                gap,
            });
        }
    }

    gaps.sort_by(|a, b| {
        b.gap
            .partial_cmp(&a.gap)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.skill_name.cmp(&b.skill_name))
    });
    gaps
}

/// Members worth training: interested in the line but under-skilled for
/// it. Each carries the line's top gaps and a linear hours estimate.
fn training_priorities(
    matches: &[DeploymentMatch],
    gaps: &[SkillGapSummary],
    policy: &EnginePolicy,
) -> Vec<TrainingPriority> {
    let focus: Vec<SkillGapSummary> = gaps
        .iter()
        .take(policy.planning.training_top_gaps)
        .cloned()
        .collect();
    let estimated_hours: f64 = focus
        .iter()
        .map(|g| g.gap * policy.planning.training_hours_per_level)
        .sum();

    let mut out = Vec::new();
    for m in matches {
        if m.factors.interest > policy.planning.training_interest_above
            && m.factors.skill < policy.planning.training_skill_below
        {
            out.push(TrainingPriority {
                member_id: m.member_id.clone(),
                member_name: m.member_name.clone(),
                focus: focus.clone(),
                estimated_hours,
            });
            if out.len() == policy.planning.training_max_members {
                break;
            }
        }
    }
    out
}
