//! readiness-runner: headless runner for the readiness engine.
//!
//! Usage:
//!   readiness-runner --seed 12345 --staff 25 --db practice.db
//!   readiness-runner --seed 12345 --service "Virtual CFO" --top 5
//!   readiness-runner --json

use anyhow::Result;
use readiness_core::{
    demo_roster::DemoRoster,
    model::{DeploymentRequirement, ServicePriority},
    planning::{self, ServiceLineDeploymentPlan},
    readiness::{self, ServiceReadiness},
    store::SnapshotStore,
    EnginePolicy, EngineSnapshot,
};
use std::env;
use uuid::Uuid;

#[derive(serde::Serialize)]
struct Report {
    run_id: String,
    generated_at: String,
    readiness: Vec<ServiceReadiness>,
    plans: Vec<ServiceLineDeploymentPlan>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let staff_count = parse_arg(&args, "--staff", 25usize);
    let top = parse_arg(&args, "--top", 5usize);
    let json_mode = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");
    let service = args
        .windows(2)
        .find(|w| w[0] == "--service")
        .map(|w| w[1].as_str());

    if !json_mode {
        println!("readiness-runner");
        println!("  seed:     {seed}");
        println!("  staff:    {staff_count}");
        println!("  db:       {db}");
        println!("  data_dir: {data_dir}");
        println!();
    }

    let store = SnapshotStore::open(db)?;
    store.migrate()?;

    let policy = match EnginePolicy::load(data_dir) {
        Ok(p) => p,
        Err(e) => {
            log::info!("No policy file ({e}); using built-in defaults");
            EnginePolicy::default()
        }
    };

    seed_if_empty(&store, seed, staff_count)?;
    let snapshot = store.load_snapshot()?;

    let readiness: Vec<ServiceReadiness> = snapshot
        .services()
        .iter()
        .map(|svc| readiness::evaluate(svc, &snapshot, &policy.readiness))
        .collect();

    let requirements = demo_requirements(&snapshot, &readiness);
    let plans = planning::comprehensive_plan(&requirements, &snapshot, &policy)?;

    if json_mode {
        let report = Report {
            run_id: Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            readiness,
            plans,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_readiness(&readiness);
    print_plans(&plans);

    if let Some(line) = service {
        let candidates = planning::best_candidates(line, top, &snapshot, &policy)?;
        print_candidates(line, &candidates);
    }

    Ok(())
}

/// Seed the demo practice unless the database already carries a roster.
fn seed_if_empty(store: &SnapshotStore, seed: u64, staff_count: usize) -> Result<()> {
    if !store.load_snapshot()?.staff().is_empty() {
        log::info!("Database already seeded; reusing existing roster");
        return Ok(());
    }

    let roster = DemoRoster::generate(seed, staff_count);
    for skill in &roster.skills {
        store.insert_skill(skill)?;
    }
    for member in &roster.staff {
        store.insert_staff_member(member)?;
    }
    for assessment in &roster.assessments {
        store.insert_assessment(&Uuid::new_v4().to_string(), assessment)?;
    }
    for service in &roster.services {
        store.insert_service(service)?;
    }
    for interest in &roster.interests {
        store.insert_interest(interest)?;
    }
    for profile in &roster.profiles {
        store.insert_profile(profile)?;
    }
    for utilization in &roster.utilization {
        store.insert_utilization(utilization)?;
    }
    log::info!(
        "Seeded {} staff, {} assessments, {} services",
        roster.staff.len(),
        roster.assessments.len(),
        roster.services.len(),
    );
    Ok(())
}

/// Demo urgency mapping: undeliverable lines are critical, thin lines
/// high, the rest medium.
fn demo_requirements(
    snapshot: &EngineSnapshot,
    readiness: &[ServiceReadiness],
) -> Vec<DeploymentRequirement> {
    snapshot
        .services()
        .iter()
        .map(|svc| {
            let r = readiness
                .iter()
                .find(|r| r.service_id == svc.service_id);
            let priority = match r {
                Some(r) if !r.can_deliver_now => ServicePriority::Critical,
                Some(r) if r.readiness_percent < 100.0 => ServicePriority::High,
                _ => ServicePriority::Medium,
            };
            DeploymentRequirement {
                service_line: svc.name.clone(),
                minimum_skill_level: 3,
                priority,
            }
        })
        .collect()
}

fn print_readiness(readiness: &[ServiceReadiness]) {
    println!("=== SERVICE READINESS ===");
    for r in readiness {
        let verdict = if r.can_deliver_now { "ready" } else { "NOT READY" };
        let critical_gaps = r.skills.iter().filter(|s| s.critical && s.gap > 0).count();
        println!(
            "  {:<28} {:>5.1}%  {:<10} capable={} critical_gaps={}",
            r.service_name,
            r.readiness_percent,
            verdict,
            r.capable_members.len(),
            critical_gaps,
        );
        for rec in &r.recommendations {
            println!("      - {rec}");
        }
    }
    println!();
}

fn print_plans(plans: &[ServiceLineDeploymentPlan]) {
    println!("=== DEPLOYMENT PLANS (most urgent first) ===");
    for p in plans {
        println!(
            "  {:<28} priority={:<9?} team={} additions={} total_gap={:.1}",
            p.service_line,
            p.priority,
            p.current_team.len(),
            p.recommended_additions.len(),
            p.total_gap(),
        );
        for m in &p.current_team {
            println!("      core:     {} ({})", m.member_name, m.match_score);
        }
        for m in &p.recommended_additions {
            println!("      addition: {} ({})", m.member_name, m.match_score);
        }
        for t in &p.training_priorities {
            println!(
                "      train:    {} (~{:.0}h over {} gaps)",
                t.member_name,
                t.estimated_hours,
                t.focus.len(),
            );
        }
    }
    println!();
}

fn print_candidates(line: &str, candidates: &[readiness_core::scoring::DeploymentMatch]) {
    println!("=== BEST CANDIDATES: {line} ===");
    for (i, m) in candidates.iter().enumerate() {
        println!(
            "  {}. {:<24} score={:<3} tier={:?} recommended={}",
            i + 1,
            m.member_name,
            m.match_score,
            m.readiness_tier,
            m.recommended,
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
