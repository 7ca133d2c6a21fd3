//! cubespace Headless Simulation Harness
//!
//! Drives a machine dimension through allocation, escapes, confinement and
//! a save/restart cycle without any game host. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p cubespace-simtest
//!   cargo run -p cubespace-simtest -- --verbose
//!   RUST_LOG=info cargo run -p cubespace-simtest

use cubespace_core::prelude::*;
use cubespace_logic::config::MachinesConfig;
use cubespace_logic::constants::machine_sizes::{self, MAXIMUM, TINY};
use cubespace_logic::geometry::Vec3;
use rand::Rng;

const OCCUPANTS: usize = 24;
const TICKS: u64 = 600;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== cubespace Simulation Harness ===\n");

    let config = MachinesConfig::default();
    if verbose {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("config: {}\n", json),
            Err(e) => println!("config: <unprintable: {}>\n", e),
        }
    }

    let mut results = Vec::new();
    let mut engine = MachineEngine::new(config);
    log::info!("Simulating {} occupants for {} ticks", OCCUPANTS, TICKS);

    // 1. One machine of every size, one occupant per machine
    let population = populate(&mut engine);
    results.extend(validate_allocation(&engine, &population, verbose));

    // 2. Random escapes over many ticks
    results.extend(validate_confinement(&mut engine, &population, verbose));

    // 3. Save, restart, load
    results.extend(validate_restart(&mut engine, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

struct Population {
    machines: Vec<hecs::Entity>,
    occupants: Vec<OccupantId>,
    admin: OccupantId,
}

fn populate(engine: &mut MachineEngine) -> Population {
    let machines: Vec<_> = (TINY..=MAXIMUM).map(|m| engine.spawn_machine(m)).collect();

    let mut occupants = Vec::new();
    for i in 0..OCCUPANTS {
        let id = engine.spawn_occupant(format!("occupant-{i}"), Pose::new(0.0, 64.0, i as f64));
        engine.enter_machine(id, machines[i % machines.len()]);
        occupants.push(id);
    }

    let admin = engine.spawn_occupant("admin", Pose::new(0.0, 64.0, -1.0));
    engine.set_privileges(admin, true, GameMode::Creative);
    engine.enter_machine(admin, machines[0]);

    Population {
        machines,
        occupants,
        admin,
    }
}

// ── 1. Allocation ───────────────────────────────────────────────────────

fn validate_allocation(
    engine: &MachineEngine,
    population: &Population,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Allocation ---");
    let mut results = Vec::new();
    let registry = &engine.registry;

    results.push(TestResult {
        name: "alloc_one_room_per_machine".into(),
        passed: registry.room_count() == population.machines.len()
            && registry.next_coordinate() as usize == population.machines.len(),
        detail: format!(
            "{} rooms, next coordinate {}",
            registry.room_count(),
            registry.next_coordinate()
        ),
    });

    let sizes_match = registry
        .rooms()
        .all(|(c, size)| size == machine_sizes::box_size(c as u8));
    results.push(TestResult {
        name: "alloc_sizes_follow_meta".into(),
        passed: sizes_match,
        detail: "room c has the size of machine variant c".into(),
    });

    let mut overlaps = 0;
    let rooms: Vec<_> = registry
        .rooms()
        .filter_map(|(c, _)| registry.bounds_of(c))
        .collect();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            if rooms[i].intersects(&rooms[j]) {
                overlaps += 1;
            }
        }
    }
    results.push(TestResult {
        name: "alloc_rooms_disjoint".into(),
        passed: overlaps == 0,
        detail: format!("{} overlapping pairs", overlaps),
    });

    let everyone_inside = population.occupants.iter().all(|&id| {
        match (engine.occupant_coordinate(id), engine.occupant_pose(id)) {
            (Some(c), Some(pose)) => registry
                .bounds_of(c)
                .map(|b| b.contains(&pose.position))
                .unwrap_or(false),
            _ => false,
        }
    });
    results.push(TestResult {
        name: "alloc_entry_lands_inside".into(),
        passed: everyone_inside,
        detail: format!("{} occupants placed", population.occupants.len()),
    });

    if verbose {
        for (c, size) in registry.rooms() {
            println!("  room {:>2}: size {:>2} {:?}", c, size, registry.bounds_of(c));
        }
    }

    results
}

// ── 2. Confinement ──────────────────────────────────────────────────────

fn validate_confinement(
    engine: &mut MachineEngine,
    population: &Population,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Confinement ---");
    let mut results = Vec::new();
    let mut rng = rand::thread_rng();
    let interval = engine.registry.config().check_interval;

    let mut escapes = 0usize;
    let mut returns = 0usize;
    let mut late_returns = 0usize;
    let mut admin_moved = false;

    for _ in 0..TICKS {
        // Someone makes a run for it now and then
        if rng.gen_bool(0.05) {
            let who = population.occupants[rng.gen_range(0..population.occupants.len())];
            let x = rng.gen_range(-500.0..500.0);
            engine.move_occupant(who, Vec3::new(x, 80.0, rng.gen_range(20.0..60.0)));
            escapes += 1;
        }
        // The admin wanders freely
        let admin_target = Vec3::new(rng.gen_range(-500.0..500.0), 90.0, 90.0);
        engine.move_occupant(population.admin, admin_target);

        engine.update();

        if engine.tick() % interval == 0 {
            if let Some(report) = engine.last_report() {
                returns += report.confined.len();
                if report.confined.iter().any(|(id, _)| *id == population.admin) {
                    admin_moved = true;
                }
            }
            // After a check, every non-exempt occupant is back inside
            for &id in &population.occupants {
                let inside = match (engine.occupant_coordinate(id), engine.occupant_pose(id)) {
                    (Some(c), Some(pose)) => engine
                        .registry
                        .bounds_of(c)
                        .map(|b| b.contains(&pose.position))
                        .unwrap_or(false),
                    _ => false,
                };
                if !inside {
                    late_returns += 1;
                }
            }
        }
    }

    results.push(TestResult {
        name: "confine_all_back_after_check".into(),
        passed: late_returns == 0,
        detail: format!("{} escapes, {} returns, {} still outside", escapes, returns, late_returns),
    });

    results.push(TestResult {
        name: "confine_returns_bounded_by_escapes".into(),
        passed: returns <= escapes,
        detail: "at most one return per escape".into(),
    });

    results.push(TestResult {
        name: "confine_admin_exempt".into(),
        passed: !admin_moved,
        detail: "creative operator never teleported".into(),
    });

    if verbose {
        println!("  {} ticks, {} escapes, {} returns", TICKS, escapes, returns);
    }

    results
}

// ── 3. Restart ──────────────────────────────────────────────────────────

fn validate_restart(engine: &mut MachineEngine, verbose: bool) -> Vec<TestResult> {
    println!("--- Restart ---");
    let mut results = Vec::new();

    let mut save = Vec::new();
    if let Err(e) = engine.save(&mut save) {
        results.push(TestResult {
            name: "restart_save".into(),
            passed: false,
            detail: format!("save failed: {}", e),
        });
        return results;
    }

    let mut restarted = MachineEngine::new(engine.registry.config().clone());
    let loaded = restarted.load(&save[..]);
    results.push(TestResult {
        name: "restart_load".into(),
        passed: loaded.is_ok(),
        detail: match &loaded {
            Ok(()) => format!("{} bytes", save.len()),
            Err(e) => format!("load failed: {}", e),
        },
    });

    results.push(TestResult {
        name: "restart_registry_equal".into(),
        passed: restarted.registry == engine.registry,
        detail: format!(
            "{} rooms, next coordinate {}",
            restarted.registry.room_count(),
            restarted.registry.next_coordinate()
        ),
    });

    if verbose {
        println!("  save size: {} bytes", save.len());
    }

    results
}
