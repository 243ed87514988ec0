//! Skill readiness evaluation — per-service coverage and deliverability.
//!
//! This module:
//!   1. Resolves each skill requirement against the catalogue
//!   2. Counts members meeting the minimum and ideal levels per requirement
//!   3. Quantifies the gap to the redundancy target
//!   4. Blends critical / non-critical coverage into one readiness percent
//!   5. Applies the hard critical-coverage gate for `can_deliver_now`
//!   6. Ranks capable members and emits recommendation strings
//!
//! Stateless: a pure function of the snapshot and the readiness policy.

use crate::{
    config::ReadinessPolicy,
    model::{ServiceOffering, SkillRequirement},
    snapshot::{EngineSnapshot, SkillResolution},
    types::{Level, MemberId, ServiceId},
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

// ── Public types ─────────────────────────────────────────────────────────────

/// Coverage of one skill requirement across the whole roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillReadiness {
    pub skill_name: String,
    /// False when the requirement names a skill the catalogue does not
    /// carry — a misconfigured requirement, not a genuine coverage hole.
    pub resolved: bool,
    pub critical: bool,
    pub minimum_level: Level,
    pub ideal_level: Level,
    pub recommended_seniority: Vec<String>,
    pub members_meeting_minimum: u32,
    pub members_meeting_ideal: u32,
    /// Mean assessed level across everyone assessed in the skill; 0 when
    /// nobody is.
    pub average_level: f64,
    /// Additional qualified people needed to hit the redundancy target.
    pub gap: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapableMember {
    pub member_id: MemberId,
    pub member_name: String,
    /// Required skills this member holds at or above the minimum.
    pub skills_covered: u32,
    /// Recorded strong preference for this line (top rank and majority
    /// desired involvement).
    pub high_interest: bool,
    pub experience_level: Level,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReadiness {
    pub service_id: ServiceId,
    pub service_name: String,
    pub readiness_percent: f64,
    pub can_deliver_now: bool,
    pub skills: Vec<SkillReadiness>,
    pub capable_members: Vec<CapableMember>,
    pub recommendations: Vec<String>,
}

// ── Evaluation ───────────────────────────────────────────────────────────────

/// Evaluate one service offering against the current roster.
///
/// Total over all well-shaped input: empty staff or assessments yield zero
/// coverage everywhere, never an error.
pub fn evaluate(
    offering: &ServiceOffering,
    snapshot: &EngineSnapshot,
    policy: &ReadinessPolicy,
) -> ServiceReadiness {
    let skills: Vec<SkillReadiness> = offering
        .required_skills
        .iter()
        .map(|req| evaluate_requirement(req, snapshot, policy))
        .collect();

    let readiness_percent = blend_readiness(&skills, policy);
    let can_deliver_now = skills
        .iter()
        .filter(|r| r.critical)
        .all(|r| r.members_meeting_minimum >= 1);

    let capable_members = rank_capable_members(offering, snapshot, policy);
    let recommendations = build_recommendations(&offering.name, &skills, can_deliver_now, policy);

    log::info!(
        "readiness: {} {:.1}% deliverable={} critical_gaps={}",
        offering.name,
        readiness_percent,
        can_deliver_now,
        skills.iter().filter(|r| r.critical && r.gap > 0).count(),
    );

    ServiceReadiness {
        service_id: offering.service_id.clone(),
        service_name: offering.name.clone(),
        readiness_percent,
        can_deliver_now,
        skills,
        capable_members,
        recommendations,
    }
}

fn evaluate_requirement(
    req: &SkillRequirement,
    snapshot: &EngineSnapshot,
    policy: &ReadinessPolicy,
) -> SkillReadiness {
    let target = if req.critical_to_delivery {
        policy.critical_target_count
    } else {
        policy.standard_target_count
    };

    let skill = match snapshot.resolve_skill(&req.skill_name) {
        SkillResolution::Resolved(skill) => skill,
        SkillResolution::Unresolved => {
            log::warn!(
                "readiness: requirement '{}' does not match any catalogue skill",
                req.skill_name
            );
            // Automatically unmet: zero coverage, one missing person.
            return SkillReadiness {
                skill_name: req.skill_name.clone(),
                resolved: false,
                critical: req.critical_to_delivery,
                minimum_level: req.minimum_level,
                ideal_level: req.ideal_level,
                recommended_seniority: req.recommended_seniority.clone(),
                members_meeting_minimum: 0,
                members_meeting_ideal: 0,
                average_level: 0.0,
                gap: 1,
            };
        }
    };

    let mut meeting_minimum = 0u32;
    let mut meeting_ideal = 0u32;
    let mut assessed = 0u32;
    let mut level_total = 0u32;

    for a in snapshot.assessments_for_skill(&skill.skill_id) {
        assessed += 1;
        level_total += a.current_level as u32;
        if a.current_level >= req.minimum_level {
            meeting_minimum += 1;
        }
        if a.current_level >= req.ideal_level {
            meeting_ideal += 1;
        }
    }

    let average_level = if assessed > 0 {
        level_total as f64 / assessed as f64
    } else {
        0.0
    };

    SkillReadiness {
        skill_name: req.skill_name.clone(),
        resolved: true,
        critical: req.critical_to_delivery,
        minimum_level: req.minimum_level,
        ideal_level: req.ideal_level,
        recommended_seniority: req.recommended_seniority.clone(),
        members_meeting_minimum: meeting_minimum,
        members_meeting_ideal: meeting_ideal,
        average_level,
        gap: target.saturating_sub(meeting_minimum),
    }
}

/// Weighted blend of critical vs non-critical requirement coverage. Within
/// a bucket, readiness is the fraction of requirements with at least one
/// member at minimum. An empty bucket cedes its weight to the other; a
/// service with no requirements at all is vacuously ready.
fn blend_readiness(skills: &[SkillReadiness], policy: &ReadinessPolicy) -> f64 {
    let covered_fraction = |critical: bool| -> Option<f64> {
        let bucket: Vec<&SkillReadiness> = skills.iter().filter(|r| r.critical == critical).collect();
        if bucket.is_empty() {
            return None;
        }
        let covered = bucket.iter().filter(|r| r.members_meeting_minimum >= 1).count();
        Some(covered as f64 / bucket.len() as f64)
    };

    match (covered_fraction(true), covered_fraction(false)) {
        (Some(crit), Some(non)) => {
            (crit * policy.critical_weight + non * policy.non_critical_weight) * 100.0
        }
        (Some(frac), None) | (None, Some(frac)) => frac * 100.0,
        (None, None) => 100.0,
    }
}

fn rank_capable_members(
    offering: &ServiceOffering,
    snapshot: &EngineSnapshot,
    policy: &ReadinessPolicy,
) -> Vec<CapableMember> {
    let mut out: Vec<CapableMember> = Vec::new();

    for member in snapshot.staff() {
        let mut covered = 0u32;
        for req in &offering.required_skills {
            let SkillResolution::Resolved(skill) = snapshot.resolve_skill(&req.skill_name) else {
                continue;
            };
            if let Some(a) = snapshot.assessment_of(&member.member_id, &skill.skill_id) {
                if a.current_level >= req.minimum_level {
                    covered += 1;
                }
            }
        }
        if covered == 0 {
            continue;
        }

        let interest = snapshot.interest_for(&member.member_id, &offering.name);
        let high_interest = interest.is_some_and(|i| {
            i.interest_rank <= policy.high_interest_max_rank
                && i.desired_involvement_pct > policy.high_interest_min_involvement_pct
        });
        let experience_level = interest.map(|i| i.experience_level).unwrap_or(0);

        out.push(CapableMember {
            member_id: member.member_id.clone(),
            member_name: member.name.clone(),
            skills_covered: covered,
            high_interest,
            experience_level,
        });
    }

    // Interested people first, then breadth of coverage, then experience.
    // Name is the deterministic final tie-break.
    out.sort_by(|a, b| {
        b.high_interest
            .cmp(&a.high_interest)
            .then(b.skills_covered.cmp(&a.skills_covered))
            .then(b.experience_level.cmp(&a.experience_level))
            .then(a.member_name.cmp(&b.member_name))
    });
    out
}

fn build_recommendations(
    service_name: &str,
    skills: &[SkillReadiness],
    can_deliver_now: bool,
    policy: &ReadinessPolicy,
) -> Vec<String> {
    let mut recs = Vec::new();

    if can_deliver_now {
        recs.push(format!(
            "{service_name} can be delivered with the current team."
        ));
        let thin: Vec<&str> = skills
            .iter()
            .filter(|r| r.critical && r.gap > 0)
            .map(|r| r.skill_name.as_str())
            .collect();
        if !thin.is_empty() {
            recs.push(format!(
                "Coverage of {} rests on a single person; develop a second practitioner for redundancy.",
                thin.join(", ")
            ));
        }
    } else {
        let mut blockers: Vec<&SkillReadiness> = skills
            .iter()
            .filter(|r| r.critical && r.members_meeting_minimum == 0)
            .collect();
        blockers.sort_by_key(|r| (Reverse(r.gap), r.skill_name.clone()));
        let named: Vec<&str> = blockers
            .iter()
            .take(policy.max_named_gaps)
            .map(|r| r.skill_name.as_str())
            .collect();
        recs.push(format!(
            "{service_name} is not deliverable yet: no coverage for {}.",
            named.join(", ")
        ));
    }

    recs
}
