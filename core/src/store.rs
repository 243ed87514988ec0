//! SQLite data-provider seam.
//!
//! RULE: Only store.rs talks to the database.
//! The engine consumes the loaded snapshot and never writes. The insert
//! methods exist for the seeding runner and the test fixtures.

use crate::{
    error::EngineResult,
    model::{
        MemberProfile, MemberUtilization, ServiceLineInterest, ServiceOffering, Skill,
        SkillAssessment, SkillRequirement, StaffMember,
    },
    snapshot::EngineSnapshot,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

pub struct SnapshotStore {
    conn: Connection,
    path: Option<String>,
}

impl SnapshotStore {
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Seed side (runner and tests only) ──────────────────────

    pub fn insert_skill(&self, skill: &Skill) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO skill (skill_id, name, category, required_level, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                skill.skill_id,
                skill.name,
                skill.category,
                skill.required_level as i64,
                skill.is_active as i64,
            ],
        )?;
        Ok(())
    }

    pub fn insert_staff_member(&self, member: &StaffMember) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO staff_member (member_id, name, role, unit) VALUES (?1, ?2, ?3, ?4)",
            params![member.member_id, member.name, member.role, member.unit],
        )?;
        Ok(())
    }

    pub fn insert_assessment(
        &self,
        assessment_id: &str,
        assessment: &SkillAssessment,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO skill_assessment
             (assessment_id, member_id, skill_id, current_level, interest_level, assessed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                assessment_id,
                assessment.member_id,
                assessment.skill_id,
                assessment.current_level as i64,
                assessment.interest_level as i64,
                assessment.assessed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_service(&self, service: &ServiceOffering) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO service_offering (service_id, name) VALUES (?1, ?2)",
            params![service.service_id, service.name],
        )?;
        for (position, req) in service.required_skills.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO skill_requirement
                 (service_id, position, skill_name, minimum_level, ideal_level,
                  critical_to_delivery, recommended_seniority)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    service.service_id,
                    position as i64,
                    req.skill_name,
                    req.minimum_level as i64,
                    req.ideal_level as i64,
                    req.critical_to_delivery as i64,
                    serde_json::to_string(&req.recommended_seniority)?,
                ],
            )?;
        }
        Ok(())
    }

    pub fn insert_interest(&self, interest: &ServiceLineInterest) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO service_line_interest
             (member_id, service_line, interest_rank, experience_level, desired_involvement_pct)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                interest.member_id,
                interest.service_line,
                interest.interest_rank as i64,
                interest.experience_level as i64,
                interest.desired_involvement_pct,
            ],
        )?;
        Ok(())
    }

    pub fn insert_profile(&self, profile: &MemberProfile) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO member_profile
             (member_id, team_role, primary_driver, driver_score, eq_score)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                profile.member_id,
                profile.team_role,
                profile.primary_driver,
                profile.driver_score,
                profile.eq_score,
            ],
        )?;
        Ok(())
    }

    pub fn insert_utilization(&self, utilization: &MemberUtilization) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO member_utilization (member_id, utilization_pct) VALUES (?1, ?2)",
            params![utilization.member_id, utilization.utilization_pct],
        )?;
        Ok(())
    }

    // ── Load side (the engine's view) ──────────────────────────

    /// Read every reference table and assemble the engine snapshot.
    pub fn load_snapshot(&self) -> EngineResult<EngineSnapshot> {
        let skills = self.load_skills()?;
        let staff = self.load_staff()?;
        let assessments = self.load_assessments()?;
        let services = self.load_services()?;
        let interests = self.load_interests()?;
        let profiles = self.load_profiles()?;
        let utilization = self.load_utilization()?;

        log::debug!(
            "store: loaded {} skills, {} staff, {} assessments, {} services",
            skills.len(),
            staff.len(),
            assessments.len(),
            services.len(),
        );

        EngineSnapshot::new(
            skills,
            staff,
            assessments,
            services,
            interests,
            profiles,
            utilization,
        )
    }

    fn load_skills(&self) -> EngineResult<Vec<Skill>> {
        let mut stmt = self.conn.prepare(
            "SELECT skill_id, name, category, required_level, is_active
             FROM skill WHERE is_active = 1 ORDER BY skill_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Skill {
                    skill_id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                    required_level: row.get::<_, i64>(3)? as u8,
                    is_active: row.get::<_, i64>(4)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn load_staff(&self) -> EngineResult<Vec<StaffMember>> {
        let mut stmt = self
            .conn
            .prepare("SELECT member_id, name, role, unit FROM staff_member ORDER BY member_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StaffMember {
                    member_id: row.get(0)?,
                    name: row.get(1)?,
                    role: row.get(2)?,
                    unit: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn load_assessments(&self) -> EngineResult<Vec<SkillAssessment>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, skill_id, current_level, interest_level, assessed_at
             FROM skill_assessment ORDER BY assessment_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut assessments = Vec::with_capacity(rows.len());
        for (member_id, skill_id, current_level, interest_level, assessed_at) in rows {
            let assessed_at = parse_timestamp(&assessed_at)?;
            assessments.push(SkillAssessment {
                member_id,
                skill_id,
                current_level: current_level as u8,
                interest_level: interest_level as u8,
                assessed_at,
            });
        }
        Ok(assessments)
    }

    fn load_services(&self) -> EngineResult<Vec<ServiceOffering>> {
        let mut stmt = self
            .conn
            .prepare("SELECT service_id, name FROM service_offering ORDER BY service_id")?;
        let headers = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut req_stmt = self.conn.prepare(
            "SELECT skill_name, minimum_level, ideal_level, critical_to_delivery,
                    recommended_seniority
             FROM skill_requirement WHERE service_id = ?1 ORDER BY position",
        )?;

        let mut services = Vec::with_capacity(headers.len());
        for (service_id, name) in headers {
            let raw_reqs = req_stmt
                .query_map(params![service_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut required_skills = Vec::with_capacity(raw_reqs.len());
            for (skill_name, minimum, ideal, critical, seniority) in raw_reqs {
                required_skills.push(SkillRequirement {
                    skill_name,
                    minimum_level: minimum as u8,
                    ideal_level: ideal as u8,
                    critical_to_delivery: critical != 0,
                    recommended_seniority: serde_json::from_str(&seniority)?,
                });
            }

            services.push(ServiceOffering {
                service_id,
                name,
                required_skills,
            });
        }
        Ok(services)
    }

    fn load_interests(&self) -> EngineResult<Vec<ServiceLineInterest>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, service_line, interest_rank, experience_level,
                    desired_involvement_pct
             FROM service_line_interest ORDER BY member_id, service_line",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ServiceLineInterest {
                    member_id: row.get(0)?,
                    service_line: row.get(1)?,
                    interest_rank: row.get::<_, i64>(2)? as u32,
                    experience_level: row.get::<_, i64>(3)? as u8,
                    desired_involvement_pct: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn load_profiles(&self) -> EngineResult<Vec<MemberProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, team_role, primary_driver, driver_score, eq_score
             FROM member_profile ORDER BY member_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(MemberProfile {
                    member_id: row.get(0)?,
                    team_role: row.get(1)?,
                    primary_driver: row.get(2)?,
                    driver_score: row.get(3)?,
                    eq_score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn load_utilization(&self) -> EngineResult<Vec<MemberUtilization>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, utilization_pct FROM member_utilization ORDER BY member_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(MemberUtilization {
                    member_id: row.get(0)?,
                    utilization_pct: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_timestamp(raw: &str) -> EngineResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow::anyhow!("Bad assessed_at timestamp '{raw}': {e}").into())
}
