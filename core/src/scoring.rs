//! Member-to-service match scoring.
//!
//! This module:
//!   1. Normalizes interest, skill, experience, and capacity to 0-100
//!   2. Folds in secondary behavioral signals when a profile exists
//!   3. Blends the factors with fixed policy weights into one match score
//!   4. Classifies deployment readiness and development needs
//!
//! Stateless: one call scores one (member, service line) pair. Invalid
//! shapes (rank 0, utilization outside 0-100) are rejected here rather
//! than clamped — silent clamping would hide upstream data defects.

use crate::{
    config::ScoringPolicy,
    error::{EngineError, EngineResult},
    model::{DeploymentRequirement, MemberProfile},
    snapshot::MemberServiceCoverage,
    types::MemberId,
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

/// How soon a member could be deployed to the line, derived from the
/// unweighted mean of the skill and experience factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    Immediate,
    ShortTerm,
    MediumTerm,
    LongTerm,
}

/// Per-factor breakdown behind a match score, each value 0-100. The three
/// profile-backed factors are absent when the member has no behavioral
/// profile; their weight is then redistributed across the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub interest: f64,
    pub skill: f64,
    pub experience: f64,
    pub capacity: f64,
    pub learning_style: f64,
    pub team_role: Option<f64>,
    pub motivation: Option<f64>,
    pub eq: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentMatch {
    pub member_id: MemberId,
    pub member_name: String,
    pub service_line: String,
    pub match_score: u32,
    pub factors: FactorBreakdown,
    pub recommended: bool,
    pub readiness_tier: ReadinessTier,
    pub development_needs: Vec<String>,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Score one member against one service-line requirement.
pub fn score(
    coverage: &MemberServiceCoverage,
    requirement: &DeploymentRequirement,
    utilization_pct: f64,
    profile: Option<&MemberProfile>,
    policy: &ScoringPolicy,
) -> EngineResult<DeploymentMatch> {
    if !(0.0..=100.0).contains(&utilization_pct) {
        return Err(EngineError::InvalidPercentage {
            field: "utilization_pct",
            value: utilization_pct,
        });
    }

    let interest = interest_factor(coverage.interest_rank, policy)?;
    let skill = coverage.avg_skill_level / 5.0 * 100.0;
    let experience = coverage.experience_level as f64 / 5.0 * 100.0;
    let capacity = 100.0 - utilization_pct;
    let learning_style = policy.neutral_score;

    let line_key = requirement.service_line.to_lowercase();
    let w = &policy.weights;

    let (factors, weighted) = match profile {
        Some(p) => {
            let team_role = role_fit_factor(p, &line_key, policy);
            let motivation = motivation_factor(p, &line_key, policy);
            let eq = p.eq_score.unwrap_or(policy.neutral_score);
            let weighted = w.interest * interest
                + w.skill * skill
                + w.experience * experience
                + w.capacity * capacity
                + w.learning_style * learning_style
                + w.team_role * team_role
                + w.motivation * motivation
                + w.eq * eq;
            let factors = FactorBreakdown {
                interest,
                skill,
                experience,
                capacity,
                learning_style,
                team_role: Some(team_role),
                motivation: Some(motivation),
                eq: Some(eq),
            };
            (factors, weighted)
        }
        None => {
            // No behavioral profile: the three profile-backed factors are
            // unavailable, and their weight is redistributed pro-rata over
            // the remaining five.
            let weighted = (w.interest * interest
                + w.skill * skill
                + w.experience * experience
                + w.capacity * capacity
                + w.learning_style * learning_style)
                / w.baseline_total();
            let factors = FactorBreakdown {
                interest,
                skill,
                experience,
                capacity,
                learning_style,
                team_role: None,
                motivation: None,
                eq: None,
            };
            (factors, weighted)
        }
    };

    let match_score = weighted.round().clamp(0.0, 100.0) as u32;
    let recommended = match_score as f64 >= policy.recommend_threshold;

    let deployment_basis = (skill + experience) / 2.0;
    let readiness_tier = if deployment_basis >= policy.tiers.immediate {
        ReadinessTier::Immediate
    } else if deployment_basis >= policy.tiers.short_term {
        ReadinessTier::ShortTerm
    } else if deployment_basis >= policy.tiers.medium_term {
        ReadinessTier::MediumTerm
    } else {
        ReadinessTier::LongTerm
    };

    // Independent threshold checks — zero to three needs may apply.
    let mut development_needs = Vec::new();
    if skill < policy.needs.skill_below {
        development_needs.push("technical skills development".to_string());
    }
    if experience < policy.needs.experience_below {
        development_needs.push("hands-on experience".to_string());
    }
    if interest < policy.needs.interest_below {
        development_needs.push("interest cultivation".to_string());
    }

    log::debug!(
        "scoring: {} vs {} -> {} (interest={:.1} skill={:.1} exp={:.1} cap={:.1})",
        coverage.member_name,
        requirement.service_line,
        match_score,
        interest,
        skill,
        experience,
        capacity,
    );

    Ok(DeploymentMatch {
        member_id: coverage.member_id.clone(),
        member_name: coverage.member_name.clone(),
        service_line: coverage.service_line.clone(),
        match_score,
        factors,
        recommended,
        readiness_tier,
        development_needs,
    })
}

/// Top preference scores full marks; each rank step below it sheds
/// `rank_decay` points, floored at zero. No recorded preference scores
/// zero — neutrality earns no interest credit.
fn interest_factor(rank: Option<u32>, policy: &ScoringPolicy) -> EngineResult<f64> {
    match rank {
        None => Ok(0.0),
        Some(0) => Err(EngineError::InvalidRank { rank: 0 }),
        Some(r) => Ok((100.0 - (r - 1) as f64 * policy.rank_decay).max(0.0)),
    }
}

fn role_fit_factor(profile: &MemberProfile, line_key: &str, policy: &ScoringPolicy) -> f64 {
    match &profile.team_role {
        None => policy.neutral_score,
        Some(archetype) => policy
            .role_fit
            .get(&archetype.to_lowercase())
            .and_then(|fits| fits.get(line_key))
            .copied()
            .unwrap_or(policy.role_fit_default),
    }
}

/// Base neutral, adjusted only when the line rewards the member's own
/// dominant driver.
fn motivation_factor(profile: &MemberProfile, line_key: &str, policy: &ScoringPolicy) -> f64 {
    let base = policy.neutral_score;
    match (
        policy.line_drivers.get(line_key),
        &profile.primary_driver,
        profile.driver_score,
    ) {
        (Some(tag), Some(driver), Some(score)) if tag.eq_ignore_ascii_case(driver) => {
            base + policy.motivation_slope * (score - policy.neutral_score)
        }
        _ => base,
    }
}
