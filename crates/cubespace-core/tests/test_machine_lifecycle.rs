//! Integration tests for the machine room lifecycle.
//!
//! Exercises: placement → first entry (allocation) → spawnpoint → escape
//! and confinement → save → restart → load.

use cubespace_core::config::load_config;
use cubespace_core::persistence::{apply_state, export_json, import_json};
use cubespace_core::prelude::*;
use cubespace_logic::constants::machine_sizes::{box_size, LARGE, NORMAL, SMALL, TINY};
use cubespace_logic::geometry::{bounding_box_for, Vec3};

// ── Helpers ────────────────────────────────────────────────────────────

fn outside() -> Pose {
    Pose::new(100.0, 70.0, -40.0)
}

/// Engine with rooms 0..=3 allocated; room 3 is a NORMAL (size 7) machine.
fn engine_with_four_rooms() -> (MachineEngine, Vec<hecs::Entity>) {
    let mut engine = MachineEngine::default();
    let builder = engine.spawn_occupant("builder", outside());
    let machines: Vec<_> = [TINY, SMALL, LARGE, NORMAL]
        .into_iter()
        .map(|meta| engine.spawn_machine(meta))
        .collect();
    for &machine in &machines {
        engine.enter_machine(builder, machine);
        engine.leave_machine(builder);
    }
    (engine, machines)
}

fn run_ticks(engine: &mut MachineEngine, ticks: u64) -> usize {
    let mut confined = 0;
    for _ in 0..ticks {
        engine.update();
        if engine.tick() % 10 == 0 {
            confined += engine.last_report().map(|r| r.confined.len()).unwrap_or(0);
        }
    }
    confined
}

// ── Allocation ─────────────────────────────────────────────────────────

#[test]
fn rooms_are_sized_by_machine_variant() {
    let (engine, _) = engine_with_four_rooms();
    let sizes: Vec<(u32, u32)> = engine.registry.rooms().collect();
    assert_eq!(
        sizes,
        vec![
            (0, box_size(TINY)),
            (1, box_size(SMALL)),
            (2, box_size(LARGE)),
            (3, box_size(NORMAL)),
        ]
    );
    assert_eq!(engine.host.generated.len(), 4);
    assert_eq!(engine.host.forced_regions.len(), 4);
}

#[test]
fn generated_shells_match_registry_bounds() {
    let (engine, _) = engine_with_four_rooms();
    for cube in &engine.host.generated {
        assert_eq!(Some(cube.bounds), engine.registry.bounds_of(cube.coordinate));
    }
}

// ── Confinement ────────────────────────────────────────────────────────

#[test]
fn escapee_in_room_three_is_returned_once_per_check() {
    let (mut engine, machines) = engine_with_four_rooms();
    let visitor = engine.spawn_occupant("visitor", outside());
    assert_eq!(engine.enter_machine(visitor, machines[3]), Some(3));

    let bounds = bounding_box_for(3, 7, 32.0);
    let home = engine.registry.spawn_location(3).position;

    // Escape, then stay escaped by walking out again right after each return.
    let mut returns = 0;
    for _ in 0..3 {
        engine.move_occupant(visitor, Vec3::new(bounds.max.x + 4.0, 42.0, 3.0));
        returns += run_ticks(&mut engine, 10);
        assert_eq!(engine.occupant_pose(visitor).map(|p| p.position), Some(home));
    }

    assert_eq!(returns, 3);
    assert_eq!(engine.active_effects(visitor).len(), 2);
}

#[test]
fn occupants_outside_any_machine_are_ignored() {
    let (mut engine, _) = engine_with_four_rooms();
    let wanderer = engine.spawn_occupant("wanderer", Pose::new(5000.0, 64.0, 5000.0));

    assert_eq!(run_ticks(&mut engine, 30), 0);
    assert_eq!(
        engine.occupant_pose(wanderer).map(|p| p.position.x),
        Some(5000.0)
    );
    assert!(engine.last_report().map(|r| r.unknown_coordinate >= 1).unwrap_or(false));
}

#[test]
fn disabled_confinement_never_teleports() {
    let config = load_config(r#"{ "keep_occupants_inside": false }"#.as_bytes()).expect("config");
    let mut engine = MachineEngine::new(config);
    let machine = engine.spawn_machine(SMALL);
    let visitor = engine.spawn_occupant("visitor", outside());
    engine.enter_machine(visitor, machine);
    engine.move_occupant(visitor, Vec3::new(60.0, 42.0, 3.0));

    run_ticks(&mut engine, 50);

    assert_eq!(engine.occupant_pose(visitor).map(|p| p.position.x), Some(60.0));
    assert!(engine.last_report().is_none());
}

// ── Restart ────────────────────────────────────────────────────────────

#[test]
fn registry_survives_restart() {
    let (mut engine, machines) = engine_with_four_rooms();
    let visitor = engine.spawn_occupant("visitor", outside());
    engine.enter_machine(visitor, machines[2]);
    engine.move_occupant(visitor, Vec3::new(68.0, 43.0, 4.0));
    engine.set_spawnpoint(visitor);

    let mut save = Vec::new();
    engine.save(&mut save).expect("save");

    let mut restarted = MachineEngine::default();
    restarted.load(&save[..]).expect("load");

    assert_eq!(restarted.registry, engine.registry);
    assert_eq!(restarted.registry.next_coordinate(), 4);
    assert_eq!(
        restarted.registry.spawn_location(2).position,
        Vec3::new(68.0, 43.0, 4.0)
    );

    // New allocations continue after the saved rooms.
    let fresh = restarted.spawn_machine(TINY);
    let newcomer = restarted.spawn_occupant("newcomer", outside());
    assert_eq!(restarted.enter_machine(newcomer, fresh), Some(4));
}

#[test]
fn json_dump_round_trips() {
    let (engine, _) = engine_with_four_rooms();
    let mut json = Vec::new();
    export_json(&mut json, &engine.registry).expect("export");

    let mut copy = RoomRegistry::default();
    apply_state(&mut copy, import_json(&json[..]).expect("import")).expect("apply");

    assert_eq!(copy, engine.registry);
}

#[test]
fn counter_at_its_limit_stops_allocating() {
    let json = r#"{ "nextMachineCoord": 4294967295, "roomsizes": [], "spawnpoints": [] }"#;
    let mut engine = MachineEngine::default();
    apply_state(&mut engine.registry, import_json(json.as_bytes()).expect("import"))
        .expect("apply");

    let a = engine.spawn_machine(TINY);
    let b = engine.spawn_machine(TINY);
    let visitor = engine.spawn_occupant("visitor", outside());

    assert_eq!(engine.enter_machine(visitor, a), None);
    assert_eq!(engine.enter_machine(visitor, b), None);
    assert_eq!(engine.registry.next_coordinate(), u32::MAX);
    assert!(engine.registry.bounds_of(0).is_none());
}
