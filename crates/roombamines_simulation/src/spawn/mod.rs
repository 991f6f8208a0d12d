//! Spawn / substitution controller
//!
//! Два контракта spawn hook'а (внешний collaborator):
//! - LevelLoaded: максимум раз на уровень — template substitution
//! - MineSpawned: ровно раз на инстанцированный governed объект — activation
//!   gate + placement correction
//!
//! Всё на authority; observers видят только реплицированный результат.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod activation;
pub mod template;

// Re-export основных операций
pub use activation::{
    activate_spawned_mines, activation_roll, declip_placement, despawn_lifeless_agents,
};
pub use template::{
    ensure_augmented_template, NetworkPrefabs, PrefabBlueprint, PrefabComponent, PrefabNode,
    SpawnEntry, SpawnTable, TemplateRegistry, TemplateResolution,
};

use crate::authority::is_authoritative;
use crate::components::Mine;
use crate::physics::collision::{GROUP_TRIGGERS, AGENT_HALF_HEIGHT};

/// Событие: уровень загружен (template substitution pass)
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LevelLoaded;

/// Событие: governed объект инстанцирован
#[derive(Event, Debug, Clone, Copy)]
pub struct MineSpawned {
    pub mine: Entity,
}

/// Bundle стоковой мины в точке position
///
/// Trigger-коллайдер: мина не препятствие для clearance probes. Активация
/// может позже перезаписать body kinematic-контроллером (InPlace mode).
pub fn mine_bundle(position: Vec3) -> impl Bundle {
    (
        Mine::default(),
        Transform::from_translation(position),
        RigidBody::Fixed,
        Collider::cylinder(AGENT_HALF_HEIGHT, 0.3),
        CollisionGroups::new(GROUP_TRIGGERS, Group::NONE),
        Sensor,
    )
}

/// Spawn helper: стоковая мина через Commands
pub fn spawn_mine(commands: &mut Commands, position: Vec3) -> Entity {
    commands.spawn(mine_bundle(position)).id()
}

/// Система: substitution pass на загрузке уровня
pub fn resolve_template_on_level_load(
    mut events: EventReader<LevelLoaded>,
    mut table: ResMut<SpawnTable>,
    mut registry: ResMut<TemplateRegistry>,
    mut prefabs: ResMut<NetworkPrefabs>,
) {
    for _ in events.read() {
        ensure_augmented_template(&mut table, &mut registry, &mut prefabs);
    }
}

/// Spawn Plugin
///
/// Порядок выполнения (Update, authority only):
/// 1. resolve_template_on_level_load — substitution pass
/// 2. activate_spawned_mines — gate + placement + имя
/// 3. despawn_lifeless_agents — liveness
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LevelLoaded>()
            .add_event::<MineSpawned>()
            .init_resource::<SpawnTable>()
            .init_resource::<TemplateRegistry>()
            .init_resource::<NetworkPrefabs>()
            .add_systems(
                Update,
                (
                    resolve_template_on_level_load,
                    activate_spawned_mines,
                    despawn_lifeless_agents,
                )
                    .chain()
                    .run_if(is_authoritative),
            );
    }
}
