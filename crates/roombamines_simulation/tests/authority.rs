//! Authority gate инварианты
//!
//! Non-authoritative процесс никогда не мутирует позицию/ориентацию/state:
//! прогон шага симуляции с authority=false оставляет все поля агента
//! byte-identical (сравнение через world_snapshot).

use std::time::Duration;

use bevy::prelude::*;
use roombamines_simulation::{
    create_headless_app, mine_bundle, world_snapshot, DisplayName, LevelLoaded, MineSpawned,
    MovementState, NetworkRole, PrefabBlueprint, PrefabComponent, PrefabNode, ProbeWorld, Roomba,
    SpawnEntry, SpawnTable, TickTimer,
};

const FIXED_DT: Duration = Duration::from_micros(16_667);

fn run_fixed_ticks(app: &mut App, count: usize) {
    for _ in 0..count {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(FIXED_DT);
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn run_update_pass(app: &mut App) {
    app.world_mut().run_schedule(Update);
}

fn setup_level(app: &mut App) {
    let world = app.world_mut();

    let mut probe_world = world.resource_mut::<ProbeWorld>();
    probe_world.add_solid(Vec3::new(0.0, -50.5, 0.0), Vec3::new(20.0, 0.5, 20.0));

    let mut table = world.resource_mut::<SpawnTable>();
    table.entries.push(SpawnEntry {
        kind: "landmine".into(),
        blueprint: PrefabBlueprint {
            name: "LandminePrefab".into(),
            root: PrefabNode::named("root")
                .with_child(PrefabNode::named("mine").with_component(PrefabComponent::Landmine)),
        },
    });
}

/// Снимок всех полей агентов, которыми владеет authority
fn agent_snapshot(app: &mut App) -> Vec<Vec<u8>> {
    vec![
        world_snapshot::<Transform>(app.world_mut()),
        world_snapshot::<MovementState>(app.world_mut()),
        world_snapshot::<TickTimer>(app.world_mut()),
        world_snapshot::<DisplayName>(app.world_mut()),
    ]
}

#[test]
fn test_client_never_activates_spawned_mines() {
    let mut app = create_headless_app(1);
    app.insert_resource(NetworkRole::Client);
    setup_level(&mut app);

    app.world_mut().send_event(LevelLoaded);
    let mine = app
        .world_mut()
        .spawn(mine_bundle(Vec3::new(0.0, -49.5, 0.0)))
        .id();
    app.world_mut().send_event(MineSpawned { mine });

    run_update_pass(&mut app);
    run_update_pass(&mut app);

    // Observer не трогает spawn table и не вешает agent-компоненты
    assert!(app.world().get::<Roomba>(mine).is_none());
    assert!(app.world().get::<MovementState>(mine).is_none());
    assert!(app.world().get::<DisplayName>(mine).is_none());
}

#[test]
fn test_client_simulation_step_is_byte_identical() {
    let mut app = create_headless_app(2);
    setup_level(&mut app);

    // Агент, активированный заранее (как будто реплицирован с host)
    app.world_mut().spawn((
        mine_bundle(Vec3::new(0.0, -49.5, 0.0)),
        Roomba::default(),
        MovementState::RotateRight,
        TickTimer::default(),
        DisplayName("Fred".into()),
    ));

    app.insert_resource(NetworkRole::Client);

    let before = agent_snapshot(&mut app);

    // Полный шаг симуляции: visual pass + много fixed ticks
    run_update_pass(&mut app);
    run_fixed_ticks(&mut app, 120);
    run_update_pass(&mut app);

    let after = agent_snapshot(&mut app);
    assert_eq!(before, after, "observer мутировал поля агента");
}

#[test]
fn test_host_simulation_step_does_mutate() {
    let mut app = create_headless_app(2);
    setup_level(&mut app);

    app.world_mut().spawn((
        mine_bundle(Vec3::new(0.0, -49.5, 0.0)),
        Roomba::default(),
        MovementState::RotateRight,
        TickTimer::default(),
        DisplayName("Fred".into()),
    ));

    // Host (default) — контраст к client-тесту
    let before = agent_snapshot(&mut app);
    run_fixed_ticks(&mut app, 120);
    let after = agent_snapshot(&mut app);

    assert_ne!(before, after, "host обязан продвигать симуляцию");
}
