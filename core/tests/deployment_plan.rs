//! Integration tests: deployment planning and the comprehensive ranking.

use chrono::{DateTime, TimeZone, Utc};
use readiness_core::{
    config::EnginePolicy,
    model::{
        DeploymentRequirement, ServiceLineInterest, ServiceOffering, ServicePriority, Skill,
        SkillAssessment, SkillRequirement, StaffMember,
    },
    planning,
    store::SnapshotStore,
    EngineSnapshot,
};

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn skill(id: &str, name: &str) -> Skill {
    Skill {
        skill_id: id.into(),
        name: name.into(),
        category: "Advisory".into(),
        required_level: 3,
        is_active: true,
    }
}

fn member(id: &str, name: &str) -> StaffMember {
    StaffMember {
        member_id: id.into(),
        name: name.into(),
        role: "Manager".into(),
        unit: "Advisory".into(),
    }
}

fn assessment(member: &str, skill: &str, level: u8) -> SkillAssessment {
    SkillAssessment {
        member_id: member.into(),
        skill_id: skill.into(),
        current_level: level,
        interest_level: 3,
        assessed_at: ts(),
    }
}

fn req(name: &str, min: u8, critical: bool) -> SkillRequirement {
    SkillRequirement {
        skill_name: name.into(),
        minimum_level: min,
        ideal_level: min.saturating_add(1).min(5),
        critical_to_delivery: critical,
        recommended_seniority: Vec::new(),
    }
}

fn offering(id: &str, name: &str, reqs: Vec<SkillRequirement>) -> ServiceOffering {
    ServiceOffering {
        service_id: id.into(),
        name: name.into(),
        required_skills: reqs,
    }
}

fn interest(member: &str, line: &str, rank: u32, experience: u8) -> ServiceLineInterest {
    ServiceLineInterest {
        member_id: member.into(),
        service_line: line.into(),
        interest_rank: rank,
        experience_level: experience,
        desired_involvement_pct: 75.0,
    }
}

fn seeded_snapshot(
    skills: Vec<Skill>,
    staff: Vec<StaffMember>,
    assessments: Vec<SkillAssessment>,
    services: Vec<ServiceOffering>,
    interests: Vec<ServiceLineInterest>,
) -> EngineSnapshot {
    let store = SnapshotStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    for s in &skills {
        store.insert_skill(s).expect("insert skill");
    }
    for m in &staff {
        store.insert_staff_member(m).expect("insert member");
    }
    for (i, a) in assessments.iter().enumerate() {
        store
            .insert_assessment(&format!("a-{i}"), a)
            .expect("insert assessment");
    }
    for s in &services {
        store.insert_service(s).expect("insert service");
    }
    for i in &interests {
        store.insert_interest(i).expect("insert interest");
    }
    store.load_snapshot().expect("load snapshot")
}

/// Three archetypes: a star lands in the current team, a middling member
/// in recommended additions, an unassessed outsider in neither.
fn three_member_snapshot() -> EngineSnapshot {
    seeded_snapshot(
        vec![
            skill("s-cf", "Cash Flow Forecasting"),
            skill("s-mr", "Management Reporting"),
            skill("s-fm", "Financial Modelling"),
        ],
        vec![
            member("m-ava", "Ava Star"),
            member("m-ben", "Ben Middle"),
            member("m-cara", "Cara Outside"),
        ],
        vec![
            assessment("m-ava", "s-cf", 5),
            assessment("m-ava", "s-mr", 5),
            assessment("m-ava", "s-fm", 5),
            assessment("m-ben", "s-cf", 3),
            assessment("m-ben", "s-mr", 3),
        ],
        vec![offering(
            "svc-vcfo",
            "Virtual CFO",
            vec![
                req("Cash Flow Forecasting", 3, true),
                req("Management Reporting", 3, true),
                req("Financial Modelling", 3, false),
            ],
        )],
        vec![
            interest("m-ava", "Virtual CFO", 1, 5),
            interest("m-ben", "Virtual CFO", 2, 3),
        ],
    )
}

#[test]
fn plan_partitions_members_by_score() {
    let snapshot = three_member_snapshot();
    let policy = EnginePolicy::default();
    let requirement = DeploymentRequirement {
        service_line: "Virtual CFO".into(),
        minimum_skill_level: 3,
        priority: ServicePriority::High,
    };

    let plan = planning::plan(&requirement, &snapshot, &policy).unwrap();

    let team: Vec<&str> = plan.current_team.iter().map(|m| m.member_id.as_str()).collect();
    let additions: Vec<&str> = plan
        .recommended_additions
        .iter()
        .map(|m| m.member_id.as_str())
        .collect();

    assert_eq!(team, vec!["m-ava"], "the star carries the line");
    assert_eq!(additions, vec!["m-ben"], "the middling member is an addition");
    assert!(
        !team.contains(&"m-cara") && !additions.contains(&"m-cara"),
        "the outsider appears in neither list"
    );

    // Scores inside each list stay within their bands.
    for m in &plan.current_team {
        assert!(m.match_score >= 70);
    }
    for m in &plan.recommended_additions {
        assert!((60..70).contains(&m.match_score));
    }
}

#[test]
fn excluded_members_remain_visible_to_best_candidates() {
    let snapshot = three_member_snapshot();
    let policy = EnginePolicy::default();

    let candidates = planning::best_candidates("Virtual CFO", 10, &snapshot, &policy).unwrap();
    let ids: Vec<&str> = candidates.iter().map(|m| m.member_id.as_str()).collect();

    assert_eq!(ids.len(), 3, "every member is scored");
    assert!(ids.contains(&"m-cara"), "low scorers still show up here");
    assert_eq!(ids[0], "m-ava", "sorted by score descending");
}

#[test]
fn best_candidates_truncates_to_count() {
    let snapshot = three_member_snapshot();
    let policy = EnginePolicy::default();

    let candidates = planning::best_candidates("Virtual CFO", 2, &snapshot, &policy).unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates[0].match_score >= candidates[1].match_score);
}

#[test]
fn skill_gaps_are_positive_and_sorted_descending() {
    // Thin coverage everywhere: averages fall below the deployment bar.
    let snapshot = seeded_snapshot(
        vec![
            skill("s-cf", "Cash Flow Forecasting"),
            skill("s-mr", "Management Reporting"),
            skill("s-fm", "Financial Modelling"),
        ],
        vec![member("m-1", "Ava Khan"), member("m-2", "Ben Singh")],
        vec![
            assessment("m-1", "s-cf", 2),
            assessment("m-2", "s-cf", 2),
            assessment("m-1", "s-mr", 1),
        ],
        vec![offering(
            "svc-vcfo",
            "Virtual CFO",
            vec![
                req("Cash Flow Forecasting", 3, true),
                req("Management Reporting", 4, true),
                req("Financial Modelling", 3, false),
            ],
        )],
        Vec::new(),
    );
    let policy = EnginePolicy::default();
    let requirement = DeploymentRequirement {
        service_line: "Virtual CFO".into(),
        minimum_skill_level: 3,
        priority: ServicePriority::High,
    };

    let plan = planning::plan(&requirement, &snapshot, &policy).unwrap();

    // Averages: CF 2.0, MR 1.0, FM unassessed 0.0 — all below the bar of 3.
    assert_eq!(plan.skill_gaps.len(), 3);
    for g in &plan.skill_gaps {
        assert!(g.gap > 0.0);
        assert_eq!(g.required_level, 3);
    }
    for pair in plan.skill_gaps.windows(2) {
        assert!(pair[0].gap >= pair[1].gap, "gaps must sort descending");
    }
    // Financial Modelling is unassessed: average 0, gap = the full bar.
    assert_eq!(plan.skill_gaps[0].skill_name, "Financial Modelling");
    assert_eq!(plan.skill_gaps[0].gap, 3.0);
    assert_eq!(plan.skill_gaps[1].skill_name, "Management Reporting");
    assert_eq!(plan.skill_gaps[1].gap, 2.0);
    assert_eq!(plan.skill_gaps[2].gap, 1.0);
}

#[test]
fn training_priorities_use_the_hours_heuristic() {
    // One interested but under-skilled member.
    let snapshot = seeded_snapshot(
        vec![
            skill("s-cf", "Cash Flow Forecasting"),
            skill("s-mr", "Management Reporting"),
        ],
        vec![member("m-keen", "Keen Learner")],
        vec![
            assessment("m-keen", "s-cf", 1),
            assessment("m-keen", "s-mr", 2),
        ],
        vec![offering(
            "svc-vcfo",
            "Virtual CFO",
            vec![
                req("Cash Flow Forecasting", 3, true),
                req("Management Reporting", 4, true),
            ],
        )],
        vec![interest("m-keen", "Virtual CFO", 1, 2)],
    );
    let policy = EnginePolicy::default();
    let requirement = DeploymentRequirement {
        service_line: "Virtual CFO".into(),
        minimum_skill_level: 3,
        priority: ServicePriority::High,
    };

    let plan = planning::plan(&requirement, &snapshot, &policy).unwrap();

    assert_eq!(plan.training_priorities.len(), 1);
    let t = &plan.training_priorities[0];
    assert_eq!(t.member_id, "m-keen");
    assert_eq!(t.focus.len(), 2, "both gaps attach as focus areas");

    // Against the bar of 3: CF 3 - 1 = 2, MR 3 - 2 = 1; hours = (2 + 1) * 10.
    let expected: f64 = t.focus.iter().map(|g| g.gap * 10.0).sum();
    assert_eq!(t.estimated_hours, expected);
    assert_eq!(t.estimated_hours, 30.0);
}

#[test]
fn training_priorities_cap_at_five_members() {
    let skills = vec![skill("s-cf", "Cash Flow Forecasting")];
    let staff: Vec<StaffMember> = (0..8)
        .map(|i| member(&format!("m-{i}"), &format!("Member {i}")))
        .collect();
    let assessments: Vec<SkillAssessment> = (0..8)
        .map(|i| assessment(&format!("m-{i}"), "s-cf", 1))
        .collect();
    let interests: Vec<ServiceLineInterest> = (0..8)
        .map(|i| interest(&format!("m-{i}"), "Virtual CFO", 1, 2))
        .collect();

    let snapshot = seeded_snapshot(
        skills,
        staff,
        assessments,
        vec![offering(
            "svc-vcfo",
            "Virtual CFO",
            vec![req("Cash Flow Forecasting", 4, true)],
        )],
        interests,
    );
    let policy = EnginePolicy::default();
    let requirement = DeploymentRequirement {
        service_line: "Virtual CFO".into(),
        minimum_skill_level: 3,
        priority: ServicePriority::High,
    };

    let plan = planning::plan(&requirement, &snapshot, &policy).unwrap();
    assert_eq!(plan.training_priorities.len(), 5);
}

/// A critical-priority line with small gaps must outrank a low-priority
/// line with larger gaps.
#[test]
fn comprehensive_plan_orders_by_priority_then_gap() {
    let snapshot = seeded_snapshot(
        vec![
            skill("s-cf", "Cash Flow Forecasting"),
            skill("s-val", "Business Valuation"),
            skill("s-mr", "Management Reporting"),
        ],
        vec![member("m-1", "Ava Khan")],
        vec![
            assessment("m-1", "s-cf", 2),
            assessment("m-1", "s-val", 1),
            assessment("m-1", "s-mr", 2),
        ],
        vec![
            offering("svc-a", "Line A", vec![req("Cash Flow Forecasting", 3, true)]),
            offering("svc-b", "Line B", vec![req("Business Valuation", 5, true)]),
            offering("svc-c", "Line C", vec![req("Management Reporting", 4, true)]),
        ],
        Vec::new(),
    );
    let policy = EnginePolicy::default();

    let requirements = vec![
        DeploymentRequirement {
            service_line: "Line B".into(),
            minimum_skill_level: 5,
            priority: ServicePriority::Low,
        },
        DeploymentRequirement {
            service_line: "Line A".into(),
            minimum_skill_level: 3,
            priority: ServicePriority::Critical,
        },
        DeploymentRequirement {
            service_line: "Line C".into(),
            minimum_skill_level: 5,
            priority: ServicePriority::Critical,
        },
    ];

    let plans = planning::comprehensive_plan(&requirements, &snapshot, &policy).unwrap();
    let order: Vec<&str> = plans.iter().map(|p| p.service_line.as_str()).collect();

    // Critical tier first; within it, Line C's larger gap (3.0) beats
    // Line A's (1.0); the low-priority line trails despite its 4.0 gap.
    assert_eq!(order, vec!["Line C", "Line A", "Line B"]);
}

#[test]
fn unknown_service_line_degrades_to_empty_lists() {
    let snapshot = three_member_snapshot();
    let policy = EnginePolicy::default();
    let requirement = DeploymentRequirement {
        service_line: "Forensic Astrology".into(),
        minimum_skill_level: 3,
        priority: ServicePriority::High,
    };

    let plan = planning::plan(&requirement, &snapshot, &policy).unwrap();
    assert!(plan.current_team.is_empty());
    assert!(plan.recommended_additions.is_empty());
    assert!(plan.skill_gaps.is_empty());
    assert!(plan.training_priorities.is_empty());
}

#[test]
fn empty_roster_produces_an_empty_plan() {
    let snapshot = seeded_snapshot(
        vec![skill("s-cf", "Cash Flow Forecasting")],
        Vec::new(),
        Vec::new(),
        vec![offering(
            "svc-vcfo",
            "Virtual CFO",
            vec![req("Cash Flow Forecasting", 3, true)],
        )],
        Vec::new(),
    );
    let policy = EnginePolicy::default();
    let requirement = DeploymentRequirement {
        service_line: "Virtual CFO".into(),
        minimum_skill_level: 3,
        priority: ServicePriority::High,
    };

    let plan = planning::plan(&requirement, &snapshot, &policy).unwrap();
    assert!(plan.current_team.is_empty());
    assert!(plan.recommended_additions.is_empty());
    assert!(plan.training_priorities.is_empty());
}
