//! ROOMBAMINES Simulation Core
//!
//! ECS-симуляция roomba-агентов на Bevy 0.16 (strategic layer):
//! бродящая по уровню мина-roomba, обходящая препятствия и обрывы,
//! host-authoritative, с репликацией имени наблюдателям.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (FSM движения, activation gate, substitution)
//! - Engine = tactical layer (physics scene, rendering, transform-sync) —
//!   в headless-режиме его probe-часть заменяет ProbeWorld

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod authority;
pub mod components;
pub mod config;
pub mod logger;
pub mod naming;
pub mod physics;
pub mod replication;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::RoombaAiPlugin;
pub use authority::{is_authoritative, NetworkRole};
pub use components::*;
pub use config::{SimulationConfig, SubstitutionMode};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use naming::NamePool;
pub use physics::{ProbeWorld, RayHit};
pub use replication::{NameAnnounced, ReplicationPlugin};
pub use spawn::{
    mine_bundle, spawn_mine, LevelLoaded, MineSpawned, NetworkPrefabs, PrefabBlueprint,
    PrefabComponent, PrefabNode, SpawnEntry, SpawnPlugin, SpawnTable, TemplateRegistry,
    TemplateResolution,
};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Host по умолчанию: headless-симуляция без сети authoritative
            .init_resource::<NetworkRole>()
            .init_resource::<SimulationConfig>()
            .init_resource::<NamePool>()
            .init_resource::<ProbeWorld>()
            // Подсистемы (ECS strategic layer)
            .add_plugins((SpawnPlugin, RoombaAiPlugin, ReplicationPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все вероятностные решения (activation roll, left/right coin flip, выбор
/// имени) тянут из него — одинаковый seed даёт одинаковую симуляцию.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для byte-compare (детерминизм, authority-инварианты)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
