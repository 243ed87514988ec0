//! Reference data consumed from the external data provider.
//!
//! These records are immutable during a computation pass. The engine only
//! reads them; validation and assembly into a queryable view happen in
//! snapshot.rs. All types are plain serializable records with no behavior.

use crate::types::{Level, MemberId, ServiceId, SkillId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: SkillId,
    pub name: String,
    pub category: String,
    /// Organization-wide required proficiency (1-5).
    pub required_level: Level,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub member_id: MemberId,
    pub name: String,
    pub role: String,
    pub unit: String,
}

/// One (member, skill) assessment. The most recent row per pair is
/// authoritative; older rows are discarded during snapshot assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub member_id: MemberId,
    pub skill_id: SkillId,
    pub current_level: Level,
    pub interest_level: Level,
    pub assessed_at: DateTime<Utc>,
}

/// A skill requirement on a service offering. References the catalogue by
/// display name; resolution is case-insensitive and happens at evaluation
/// time via the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill_name: String,
    pub minimum_level: Level,
    pub ideal_level: Level,
    pub critical_to_delivery: bool,
    #[serde(default)]
    pub recommended_seniority: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub service_id: ServiceId,
    pub name: String,
    pub required_skills: Vec<SkillRequirement>,
}

/// A member's stated preference for one service line. Optional — absence
/// means no preference, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLineInterest {
    pub member_id: MemberId,
    pub service_line: String,
    /// 1 = most preferred. Ranks are 1-based; 0 is rejected at the boundary.
    pub interest_rank: u32,
    /// Self-reported experience in this line (0-5).
    pub experience_level: Level,
    pub desired_involvement_pct: f64,
}

/// Secondary behavioral signals for one member: team-role archetype,
/// dominant motivational driver, emotional-intelligence score. Optional
/// bundle — scoring degrades gracefully when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfile {
    pub member_id: MemberId,
    #[serde(default)]
    pub team_role: Option<String>,
    #[serde(default)]
    pub primary_driver: Option<String>,
    #[serde(default)]
    pub driver_score: Option<f64>,
    #[serde(default)]
    pub eq_score: Option<f64>,
}

/// Current workload booking for one member, feeding the capacity factor.
/// Absence means fully available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUtilization {
    pub member_id: MemberId,
    pub utilization_pct: f64,
}

/// Urgency tier for a service-line deployment. Ordering is by urgency:
/// critical sorts before high, high before medium, medium before low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePriority {
    Critical,
    High,
    Medium,
    Low,
}

/// The orchestrator's per-service input: which line to plan, the baseline
/// proficiency expected of deployed members, and how urgent the line is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequirement {
    pub service_line: String,
    pub minimum_skill_level: Level,
    pub priority: ServicePriority,
}

impl DeploymentRequirement {
    /// The fixed default used by ad-hoc candidate searches when no fully
    /// specified requirement exists yet.
    pub fn default_for(service_line: &str, minimum_skill_level: Level) -> Self {
        Self {
            service_line: service_line.to_string(),
            minimum_skill_level,
            priority: ServicePriority::High,
        }
    }
}
