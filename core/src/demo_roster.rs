//! Deterministic demo-practice generation using curated lists.
//!
//! Builds a small advisory practice — skills, staff, assessments,
//! interests, behavioral profiles, utilization — for the runner and the
//! test fixtures. Same master seed = same roster, byte for byte.
//! Production callers feed the engine from their own data store instead.

use crate::{
    model::{
        MemberProfile, MemberUtilization, ServiceLineInterest, ServiceOffering, Skill,
        SkillAssessment, SkillRequirement, StaffMember,
    },
    rng::{RngBank, StreamRng, StreamSlot},
};
use chrono::{Duration, TimeZone, Utc};

pub struct DemoRoster {
    pub skills: Vec<Skill>,
    pub staff: Vec<StaffMember>,
    pub assessments: Vec<SkillAssessment>,
    pub services: Vec<ServiceOffering>,
    pub interests: Vec<ServiceLineInterest>,
    pub profiles: Vec<MemberProfile>,
    pub utilization: Vec<MemberUtilization>,
}

impl DemoRoster {
    /// Generate a full demo practice with `staff_count` members.
    pub fn generate(master_seed: u64, staff_count: usize) -> Self {
        let bank = RngBank::new(master_seed);
        let skills = Self::skill_catalogue();
        let services = Self::service_catalogue();

        let mut staff_rng = bank.for_stream(StreamSlot::Staff);
        let staff: Vec<StaffMember> = (0..staff_count)
            .map(|i| {
                let first = *staff_rng.pick(FIRST_NAMES);
                let last = *staff_rng.pick(LAST_NAMES);
                StaffMember {
                    member_id: format!("m-{i:04}"),
                    name: format!("{first} {last}"),
                    role: staff_rng.pick(ROLES).to_string(),
                    unit: staff_rng.pick(UNITS).to_string(),
                }
            })
            .collect();

        let mut assess_rng = bank.for_stream(StreamSlot::Assessment);
        let base_date = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let mut assessments = Vec::new();
        for member in &staff {
            for skill in &skills {
                if !assess_rng.chance(0.6) {
                    continue;
                }
                let assessed_at =
                    base_date + Duration::days(assess_rng.next_u64_below(180) as i64);
                let current_level = assess_rng.level_between(1, 5);
                // Occasionally an older, superseded row survives in the
                // provider data; the snapshot must keep only the latest.
                if assess_rng.chance(0.15) {
                    assessments.push(SkillAssessment {
                        member_id: member.member_id.clone(),
                        skill_id: skill.skill_id.clone(),
                        current_level: assess_rng.level_between(1, 5),
                        interest_level: assess_rng.level_between(1, 5),
                        assessed_at: assessed_at - Duration::days(90),
                    });
                }
                assessments.push(SkillAssessment {
                    member_id: member.member_id.clone(),
                    skill_id: skill.skill_id.clone(),
                    current_level,
                    interest_level: assess_rng.level_between(1, 5),
                    assessed_at,
                });
            }
        }

        let mut interest_rng = bank.for_stream(StreamSlot::Interest);
        let mut interests = Vec::new();
        for member in &staff {
            if !interest_rng.chance(0.7) {
                continue;
            }
            let mut order: Vec<usize> = (0..services.len()).collect();
            shuffle(&mut order, &mut interest_rng);
            let ranked = 1 + interest_rng.next_u64_below(services.len() as u64) as usize;
            for (rank, &svc_idx) in order.iter().take(ranked).enumerate() {
                interests.push(ServiceLineInterest {
                    member_id: member.member_id.clone(),
                    service_line: services[svc_idx].name.clone(),
                    interest_rank: rank as u32 + 1,
                    experience_level: interest_rng.level_between(0, 5),
                    desired_involvement_pct: interest_rng.next_u64_below(21) as f64 * 5.0,
                });
            }
        }

        let mut profile_rng = bank.for_stream(StreamSlot::Profile);
        let mut profiles = Vec::new();
        for member in &staff {
            if !profile_rng.chance(0.8) {
                continue;
            }
            profiles.push(MemberProfile {
                member_id: member.member_id.clone(),
                team_role: Some(profile_rng.pick(TEAM_ROLES).to_string()),
                primary_driver: Some(profile_rng.pick(DRIVERS).to_string()),
                driver_score: Some(30.0 + profile_rng.next_u64_below(61) as f64),
                eq_score: Some(30.0 + profile_rng.next_u64_below(66) as f64),
            });
        }

        let mut util_rng = bank.for_stream(StreamSlot::Utilization);
        let mut utilization = Vec::new();
        for member in &staff {
            if !util_rng.chance(0.9) {
                continue;
            }
            utilization.push(MemberUtilization {
                member_id: member.member_id.clone(),
                utilization_pct: util_rng.next_u64_below(21) as f64 * 5.0,
            });
        }

        Self {
            skills,
            staff,
            assessments,
            services,
            interests,
            profiles,
            utilization,
        }
    }

    /// The fixed advisory skill catalogue.
    pub fn skill_catalogue() -> Vec<Skill> {
        CATALOGUE
            .iter()
            .map(|(id, name, category, required_level)| Skill {
                skill_id: (*id).to_string(),
                name: (*name).to_string(),
                category: (*category).to_string(),
                required_level: *required_level,
                is_active: true,
            })
            .collect()
    }

    /// The fixed service-offering catalogue.
    pub fn service_catalogue() -> Vec<ServiceOffering> {
        vec![
            offering(
                "svc-vcfo",
                "Virtual CFO",
                &[
                    req("Cash Flow Forecasting", 3, 4, true, &["Director", "Manager"]),
                    req("Management Reporting", 3, 4, true, &["Manager"]),
                    req("Financial Modelling", 3, 5, false, &[]),
                    req("Client Communication", 3, 4, false, &[]),
                ],
            ),
            offering(
                "svc-tax",
                "Tax Advisory",
                &[
                    req("Tax Planning", 4, 5, true, &["Partner", "Director"]),
                    req("Corporation Tax Compliance", 3, 4, true, &[]),
                    req("Client Communication", 3, 4, false, &[]),
                ],
            ),
            offering(
                "svc-cloud",
                "Cloud Accounting Setup",
                &[
                    req("Cloud Accounting Platforms", 3, 4, true, &[]),
                    req("Bookkeeping", 2, 3, false, &[]),
                    req("Data Analytics", 2, 3, false, &[]),
                ],
            ),
            offering(
                "svc-advisory",
                "Business Advisory",
                &[
                    req("Business Valuation", 4, 5, true, &["Partner"]),
                    req("Financial Modelling", 3, 4, true, &[]),
                    req("Cash Flow Forecasting", 3, 4, false, &[]),
                    req("Client Communication", 3, 4, false, &[]),
                ],
            ),
            offering(
                "svc-reporting",
                "Management Reporting",
                &[
                    req("Management Reporting", 3, 4, true, &[]),
                    req("Data Analytics", 3, 4, false, &[]),
                    req("Cloud Accounting Platforms", 2, 3, false, &[]),
                ],
            ),
        ]
    }
}

fn offering(id: &str, name: &str, reqs: &[SkillRequirement]) -> ServiceOffering {
    ServiceOffering {
        service_id: id.to_string(),
        name: name.to_string(),
        required_skills: reqs.to_vec(),
    }
}

fn req(
    skill_name: &str,
    minimum_level: u8,
    ideal_level: u8,
    critical_to_delivery: bool,
    recommended_seniority: &[&str],
) -> SkillRequirement {
    SkillRequirement {
        skill_name: skill_name.to_string(),
        minimum_level,
        ideal_level,
        critical_to_delivery,
        recommended_seniority: recommended_seniority.iter().map(|s| s.to_string()).collect(),
    }
}

/// Fisher-Yates with the stream RNG, so shuffles are reproducible.
fn shuffle(items: &mut [usize], rng: &mut StreamRng) {
    for i in (1..items.len()).rev() {
        let j = rng.next_u64_below(i as u64 + 1) as usize;
        items.swap(i, j);
    }
}

const CATALOGUE: &[(&str, &str, &str, u8)] = &[
    ("s-tax-planning", "Tax Planning", "Tax", 4),
    ("s-corp-tax", "Corporation Tax Compliance", "Tax", 3),
    ("s-personal-tax", "Personal Tax Compliance", "Tax", 3),
    ("s-client-comms", "Client Communication", "Advisory", 3),
    ("s-cashflow", "Cash Flow Forecasting", "Advisory", 3),
    ("s-fin-model", "Financial Modelling", "Advisory", 4),
    ("s-valuation", "Business Valuation", "Advisory", 4),
    ("s-mgmt-reporting", "Management Reporting", "Reporting", 3),
    ("s-cloud", "Cloud Accounting Platforms", "Technology", 3),
    ("s-data-analytics", "Data Analytics", "Technology", 3),
    ("s-bookkeeping", "Bookkeeping", "Compliance", 2),
    ("s-payroll", "Payroll Operations", "Compliance", 2),
];

const ROLES: &[&str] = &["Partner", "Director", "Manager", "Senior", "Junior", "Admin"];

const UNITS: &[&str] = &["Advisory", "Tax", "Audit", "Outsourcing"];

const TEAM_ROLES: &[&str] = &[
    "Coordinator",
    "Shaper",
    "Specialist",
    "Implementer",
    "Completer Finisher",
    "Monitor Evaluator",
    "Plant",
    "Resource Investigator",
    "Team Worker",
];

const DRIVERS: &[&str] = &[
    "achievement",
    "autonomy",
    "affiliation",
    "security",
    "recognition",
];

const FIRST_NAMES: &[&str] = &[
    "Aisha", "Alex", "Amara", "Ben", "Carmen", "Chloe", "Daniel", "Deepa", "Elena", "Ethan",
    "Farah", "Gareth", "Grace", "Hannah", "Ibrahim", "Isla", "James", "Jasmine", "Kofi", "Laura",
    "Liam", "Maya", "Mohammed", "Niamh", "Oliver", "Priya", "Rachel", "Rhys", "Sofia", "Samuel",
    "Tara", "Tomasz", "Uma", "Victor", "Wendy", "Xander", "Yusuf", "Zara",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Ahmed", "Baker", "Bennett", "Chen", "Clarke", "Davies", "Evans", "Fletcher",
    "Garcia", "Griffiths", "Hughes", "Jenkins", "Khan", "Kowalski", "Lewis", "Martin", "Morgan",
    "Murphy", "Nguyen", "O'Brien", "Okafor", "Patel", "Price", "Roberts", "Singh", "Taylor",
    "Thomas", "Walker", "Williams", "Wilson", "Wright",
];
