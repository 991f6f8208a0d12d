//! Headless симуляция ROOMBAMINES
//!
//! Запускает Bevy App без рендера: демо-уровень (подземный зал), подмена
//! template, спавн мин, 1000 тиков симуляции

use std::path::Path;

use bevy::prelude::*;
use roombamines_simulation::{
    create_headless_app, mine_bundle, DisplayName, LevelLoaded, MineSpawned, MovementState,
    NamePool, PrefabBlueprint, PrefabComponent, PrefabNode, ProbeWorld, SimulationConfig,
    SpawnEntry, SpawnTable,
};

fn main() {
    let seed = 42;
    println!("Starting ROOMBAMINES headless simulation (seed: {})", seed);

    // Sidecar файлы: отсутствующие пересоздаются с defaults
    let config = SimulationConfig::load_or_default(Path::new("roombamines_config.json"));
    let names = NamePool::load_or_create(Path::new("roombamines_names.txt"));

    let mut app = create_headless_app(seed);
    app.insert_resource(config).insert_resource(names);

    setup_demo_level(&mut app);

    // Spawn hook контракт: LevelLoaded раз на уровень, MineSpawned раз на объект
    app.world_mut().send_event(LevelLoaded);

    let spawn_points = [
        Vec3::new(0.0, -49.0, 0.0),
        Vec3::new(5.0, -49.0, 5.0),
        Vec3::new(-6.0, -49.0, 3.0),
    ];
    for point in spawn_points {
        let mine = app.world_mut().spawn(mine_bundle(point)).id();
        app.world_mut().send_event(MineSpawned { mine });
    }

    // Прогоняем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    let mut agents = app.world_mut().query::<(&DisplayName, &MovementState)>();
    for (name, state) in agents.iter(app.world()) {
        println!("Roomba '{}' is in state {:?}", name.0, state);
    }

    println!("Simulation complete!");
}

/// Демо-уровень: подземный зал 40x40 с полом и четырьмя стенами
fn setup_demo_level(app: &mut App) {
    let world = app.world_mut();

    let mut probe_world = world.resource_mut::<ProbeWorld>();
    // Пол на y = -50
    probe_world.add_solid(Vec3::new(0.0, -50.5, 0.0), Vec3::new(20.0, 0.5, 20.0));
    // Стены по периметру
    probe_world.add_solid(Vec3::new(20.5, -48.0, 0.0), Vec3::new(0.5, 3.0, 20.0));
    probe_world.add_solid(Vec3::new(-20.5, -48.0, 0.0), Vec3::new(0.5, 3.0, 20.0));
    probe_world.add_solid(Vec3::new(0.0, -48.0, 20.5), Vec3::new(20.0, 3.0, 0.5));
    probe_world.add_solid(Vec3::new(0.0, -48.0, -20.5), Vec3::new(20.0, 3.0, 0.5));

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
