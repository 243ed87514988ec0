//! The in-memory snapshot the engine computes over.
//!
//! One snapshot = one consistent view of the reference data. Assembly:
//!   1. Rejects invalid shapes (levels outside 1-5, rank 0, bad percentages)
//!   2. Keeps only the most recent assessment per (member, skill) pair
//!   3. Builds the lookup indexes the evaluator and scorer need
//!
//! Nothing here mutates after construction, and nothing here scores —
//! the snapshot only answers "who / what / how assessed" questions.

use crate::{
    error::{EngineError, EngineResult},
    model::{
        MemberProfile, MemberUtilization, ServiceLineInterest, ServiceOffering, Skill,
        SkillAssessment, StaffMember,
    },
    types::{Level, MemberId, SkillId},
};
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of resolving a requirement's skill name against the catalogue.
/// Distinguishes "no such skill configured" (a misconfigured requirement)
/// from "skill exists but nobody covers it" — callers must not conflate
/// the two.
#[derive(Debug, Clone, Copy)]
pub enum SkillResolution<'a> {
    Resolved(&'a Skill),
    Unresolved,
}

/// One member's aggregated standing against one service line — the match
/// scorer's input contract.
#[derive(Debug, Clone, Serialize)]
pub struct MemberServiceCoverage {
    pub member_id: MemberId,
    pub member_name: String,
    pub service_line: String,
    pub interest_rank: Option<u32>,
    pub desired_involvement_pct: Option<f64>,
    /// Self-reported experience in the line (0 when no interest record).
    pub experience_level: Level,
    /// Mean current level across the line's resolved requirements;
    /// unassessed skills count as 0.
    pub avg_skill_level: f64,
    /// How many of the line's resolved requirements this member holds at
    /// or above the requirement minimum.
    pub requirements_met: u32,
}

pub struct EngineSnapshot {
    skills: Vec<Skill>,
    staff: Vec<StaffMember>,
    assessments: Vec<SkillAssessment>,
    services: Vec<ServiceOffering>,
    interests: Vec<ServiceLineInterest>,
    profiles: HashMap<MemberId, MemberProfile>,
    utilization: HashMap<MemberId, f64>,
    skill_by_name: HashMap<String, usize>,
    assessments_by_skill: HashMap<SkillId, Vec<usize>>,
    assessments_by_pair: HashMap<(MemberId, SkillId), usize>,
}

impl EngineSnapshot {
    /// Assemble a snapshot from raw provider records. Fails on the first
    /// shape violation; data absence is always fine.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        skills: Vec<Skill>,
        staff: Vec<StaffMember>,
        assessments: Vec<SkillAssessment>,
        services: Vec<ServiceOffering>,
        interests: Vec<ServiceLineInterest>,
        profiles: Vec<MemberProfile>,
        utilization: Vec<MemberUtilization>,
    ) -> EngineResult<Self> {
        validate_shapes(&skills, &assessments, &services, &interests, &profiles, &utilization)?;

        let raw_count = assessments.len();
        let assessments = dedupe_latest(assessments);
        if assessments.len() < raw_count {
            log::debug!(
                "snapshot: discarded {} superseded assessment rows",
                raw_count - assessments.len()
            );
        }

        let skill_by_name = skills
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.name.to_lowercase(), idx))
            .collect();

        let mut assessments_by_skill: HashMap<SkillId, Vec<usize>> = HashMap::new();
        let mut assessments_by_pair = HashMap::new();
        for (idx, a) in assessments.iter().enumerate() {
            assessments_by_skill
                .entry(a.skill_id.clone())
                .or_default()
                .push(idx);
            assessments_by_pair.insert((a.member_id.clone(), a.skill_id.clone()), idx);
        }

        let profiles = profiles
            .into_iter()
            .map(|p| (p.member_id.clone(), p))
            .collect();
        let utilization = utilization
            .into_iter()
            .map(|u| (u.member_id.clone(), u.utilization_pct))
            .collect();

        Ok(Self {
            skills,
            staff,
            assessments,
            services,
            interests,
            profiles,
            utilization,
            skill_by_name,
            assessments_by_skill,
            assessments_by_pair,
        })
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    pub fn services(&self) -> &[ServiceOffering] {
        &self.services
    }

    pub fn assessments(&self) -> &[SkillAssessment] {
        &self.assessments
    }

    /// Case-insensitive exact-name lookup against the catalogue.
    pub fn resolve_skill(&self, name: &str) -> SkillResolution<'_> {
        match self.skill_by_name.get(&name.to_lowercase()) {
            Some(&idx) => SkillResolution::Resolved(&self.skills[idx]),
            None => SkillResolution::Unresolved,
        }
    }

    /// Case-insensitive offering lookup by id or display name.
    pub fn service_by_name(&self, line: &str) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| {
            s.service_id.eq_ignore_ascii_case(line) || s.name.eq_ignore_ascii_case(line)
        })
    }

    /// All current assessments for one skill.
    pub fn assessments_for_skill(&self, skill_id: &str) -> impl Iterator<Item = &SkillAssessment> {
        self.assessments_by_skill
            .get(skill_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.assessments[idx])
    }

    /// The authoritative assessment for one (member, skill) pair.
    pub fn assessment_of(&self, member_id: &str, skill_id: &str) -> Option<&SkillAssessment> {
        self.assessments_by_pair
            .get(&(member_id.to_string(), skill_id.to_string()))
            .map(|&idx| &self.assessments[idx])
    }

    /// A member's stated interest in a service line, matched by line name
    /// or offering id, case-insensitively.
    pub fn interest_for(&self, member_id: &str, line: &str) -> Option<&ServiceLineInterest> {
        let offering = self.service_by_name(line);
        self.interests.iter().find(|i| {
            if i.member_id != member_id {
                return false;
            }
            if i.service_line.eq_ignore_ascii_case(line) {
                return true;
            }
            offering.is_some_and(|o| {
                i.service_line.eq_ignore_ascii_case(&o.service_id)
                    || i.service_line.eq_ignore_ascii_case(&o.name)
            })
        })
    }

    pub fn profile_for(&self, member_id: &str) -> Option<&MemberProfile> {
        self.profiles.get(member_id)
    }

    /// Current utilization percentage; absence means fully available.
    pub fn utilization_for(&self, member_id: &str) -> f64 {
        self.utilization.get(member_id).copied().unwrap_or(0.0)
    }

    /// Derive one member's coverage row for a service line. `offering` is
    /// the resolved catalogue entry when one exists; without it the skill
    /// aggregates stay at zero but interest data still applies.
    pub fn member_coverage(
        &self,
        member: &StaffMember,
        line: &str,
        offering: Option<&ServiceOffering>,
    ) -> MemberServiceCoverage {
        let mut total_level = 0u32;
        let mut resolved_count = 0u32;
        let mut requirements_met = 0u32;

        if let Some(off) = offering {
            for req in &off.required_skills {
                let SkillResolution::Resolved(skill) = self.resolve_skill(&req.skill_name) else {
                    continue;
                };
                resolved_count += 1;
                let level = self
                    .assessment_of(&member.member_id, &skill.skill_id)
                    .map(|a| a.current_level)
                    .unwrap_or(0);
                total_level += level as u32;
                if level >= req.minimum_level {
                    requirements_met += 1;
                }
            }
        }

        let avg_skill_level = if resolved_count > 0 {
            total_level as f64 / resolved_count as f64
        } else {
            0.0
        };

        let interest = self.interest_for(&member.member_id, line);

        MemberServiceCoverage {
            member_id: member.member_id.clone(),
            member_name: member.name.clone(),
            service_line: line.to_string(),
            interest_rank: interest.map(|i| i.interest_rank),
            desired_involvement_pct: interest.map(|i| i.desired_involvement_pct),
            experience_level: interest.map(|i| i.experience_level).unwrap_or(0),
            avg_skill_level,
            requirements_met,
        }
    }
}

fn validate_level(context: &str, level: Level, allow_zero: bool) -> EngineResult<()> {
    let min = if allow_zero { 0 } else { 1 };
    if level < min || level > 5 {
        return Err(EngineError::InvalidLevel {
            context: context.to_string(),
            level: level as i64,
        });
    }
    Ok(())
}

fn validate_pct(field: &'static str, value: f64) -> EngineResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(EngineError::InvalidPercentage { field, value });
    }
    Ok(())
}

fn validate_shapes(
    skills: &[Skill],
    assessments: &[SkillAssessment],
    services: &[ServiceOffering],
    interests: &[ServiceLineInterest],
    profiles: &[MemberProfile],
    utilization: &[MemberUtilization],
) -> EngineResult<()> {
    for s in skills {
        validate_level(&format!("skill '{}'", s.name), s.required_level, false)?;
    }
    for a in assessments {
        let ctx = format!("assessment ({}, {})", a.member_id, a.skill_id);
        validate_level(&ctx, a.current_level, false)?;
        validate_level(&ctx, a.interest_level, false)?;
    }
    for svc in services {
        for req in &svc.required_skills {
            let ctx = format!("requirement '{}' on {}", req.skill_name, svc.name);
            validate_level(&ctx, req.minimum_level, false)?;
            validate_level(&ctx, req.ideal_level, false)?;
        }
    }
    for i in interests {
        if i.interest_rank == 0 {
            return Err(EngineError::InvalidRank { rank: 0 });
        }
        validate_level(
            &format!("interest ({}, {})", i.member_id, i.service_line),
            i.experience_level,
            true,
        )?;
        validate_pct("desired_involvement_pct", i.desired_involvement_pct)?;
    }
    for p in profiles {
        if let Some(v) = p.driver_score {
            validate_pct("driver_score", v)?;
        }
        if let Some(v) = p.eq_score {
            validate_pct("eq_score", v)?;
        }
    }
    for u in utilization {
        validate_pct("utilization_pct", u.utilization_pct)?;
    }
    Ok(())
}

/// Latest-wins dedup per (member, skill), ties broken in favor of the row
/// seen later in provider order. Output order is stable (first-seen order
/// of each pair) so identical inputs produce identical snapshots.
fn dedupe_latest(assessments: Vec<SkillAssessment>) -> Vec<SkillAssessment> {
    let mut by_pair: HashMap<(MemberId, SkillId), usize> = HashMap::new();
    let mut kept: Vec<SkillAssessment> = Vec::with_capacity(assessments.len());

    for a in assessments {
        let key = (a.member_id.clone(), a.skill_id.clone());
        match by_pair.get(&key) {
            Some(&idx) => {
                if a.assessed_at >= kept[idx].assessed_at {
                    kept[idx] = a;
                }
            }
            None => {
                by_pair.insert(key, kept.len());
                kept.push(a);
            }
        }
    }

    kept
}
