//! Per-instance activation gate + placement correction
//!
//! Вызывается ровно один раз на инстанцированный governed объект
//! (Awake-эквивалент, до первого tick'а), только на authority:
//! 1. Gate: spawn НЕ под землёй или random draw мимо activation_probability
//!    ⇒ принудительный Idle, setup пропускается (entity ведёт себя как
//!    немодифицированный оригинал)
//! 2. De-clip: probes по четырём горизонтальным осям на один радиус; hit ⇒
//!    смещение в hit.point + hit.normal * 2 * radius
//! 3. Grounding snap (тот же guarded probe, что и в ticker)
//! 4. Косметика: вертикальный scale меша слегка увеличен
//! 5. Имя из пула + анонс observers

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::ai::ticker::correct_grounding;
use crate::components::{
    DisplayName, LinkedMine, Mine, MovementState, ObservedLabel, Replicated, Roomba, RoombaVisual,
    TickTimer,
};
use crate::config::{SimulationConfig, SubstitutionMode};
use crate::logger::log;
use crate::naming::NamePool;
use crate::physics::{agent_collider, agent_groups, ProbeWorld};
use crate::replication::NameAnnounced;
use crate::spawn::{MineSpawned, TemplateRegistry};
use crate::DeterministicRng;

/// Множитель вертикального scale корпуса при активации (косметика)
const VISUAL_Y_LIFT: f32 = 1.1;

/// Gate активации: активируемся только под землёй и при удачном draw
///
/// Draw равномерный [0, 1): probability 1.0 активирует всегда, 0.0 — никогда.
pub fn activation_roll(rng: &mut impl Rng, config: &SimulationConfig, spawn_y: f32) -> bool {
    if spawn_y >= config.underground_y_threshold {
        return false;
    }
    rng.gen_range(0.0..1.0f32) < config.activation_probability
}

/// De-clip начального размещения: четыре горизонтальные оси на один радиус
///
/// На hit смещаемся наружу вдоль нормали поверхности на два радиуса.
/// Позиция обновляется сразу, следующая ось probe'ится уже из неё.
pub fn declip_placement(probe_world: &ProbeWorld, transform: &mut Transform, radius: f32) -> bool {
    let axes: [Vec3; 4] = [
        transform.right().into(),
        (-transform.right()).into(),
        transform.forward().into(),
        (-transform.forward()).into(),
    ];

    let mut moved = false;
    for axis in axes {
        if let Some(hit) = probe_world.raycast(transform.translation, axis, radius) {
            transform.translation = hit.point + hit.normal * (2.0 * radius);
            moved = true;
        }
    }
    moved
}

/// Система: активация заспавненных мин (MineSpawned, ровно раз на объект)
pub fn activate_spawned_mines(
    mut events: EventReader<MineSpawned>,
    mut commands: Commands,
    mut mines: Query<&mut Transform, With<Mine>>,
    registry: Res<TemplateRegistry>,
    config: Res<SimulationConfig>,
    probe_world: Res<ProbeWorld>,
    pool: Res<NamePool>,
    mut rng: ResMut<DeterministicRng>,
    mut announcements: EventWriter<NameAnnounced>,
) {
    for event in events.read() {
        // Аугментация не активна на этом уровне (no eligible template)
        if !registry.is_augmented() {
            continue;
        }

        let Ok(mut mine_transform) = mines.get_mut(event.mine) else {
            continue;
        };

        let roomba = Roomba::default();

        if !activation_roll(&mut rng.rng, &config, mine_transform.translation.y) {
            // Idle instance: ведёт себя как немодифицированный оригинал
            match config.substitution_mode {
                SubstitutionMode::InPlace => {
                    commands.entity(event.mine).insert((
                        roomba,
                        MovementState::Idle,
                        TickTimer::default(),
                        RoombaVisual::default(),
                        ObservedLabel::default(),
                    ));
                }
                SubstitutionMode::Companion => {
                    // Companion для Idle instance не создаётся вовсе
                }
            }
            continue;
        }

        // Placement correction на authoritative стороне
        declip_placement(&probe_world, &mut mine_transform, roomba.radius);
        correct_grounding(&probe_world, &mut mine_transform.translation);

        let name = pool.random_name(&mut rng.rng);

        let visual = RoombaVisual {
            mesh_scale: Vec3::new(1.0, VISUAL_Y_LIFT, 1.0),
        };

        let agent = match config.substitution_mode {
            SubstitutionMode::InPlace => {
                // Movement capability вешается на саму мину; RigidBody::Fixed
                // мины перезаписывается kinematic-контроллером
                commands
                    .entity(event.mine)
                    .insert((
                        roomba,
                        MovementState::RotateRight,
                        TickTimer::default(),
                        visual,
                        DisplayName(name.clone()),
                        ObservedLabel::default(),
                        Replicated,
                        RigidBody::KinematicPositionBased,
                        agent_collider(roomba.radius),
                        Velocity::default(),
                        agent_groups(),
                    ))
                    .id()
            }
            SubstitutionMode::Companion => {
                // Отдельная companion entity в трансформе родителя, мина
                // re-parent'ится под неё
                let companion = commands
                    .spawn((
                        *mine_transform,
                        roomba,
                        MovementState::RotateRight,
                        TickTimer::default(),
                        visual,
                        DisplayName(name.clone()),
                        ObservedLabel::default(),
                        LinkedMine(event.mine),
                        Replicated,
                        RigidBody::KinematicPositionBased,
                        agent_collider(roomba.radius),
                        Velocity::default(),
                        agent_groups(),
                    ))
                    .id();
                commands.entity(companion).add_child(event.mine);
                companion
            }
        };

        // Fire-and-forget анонс имени (at-most-once, вокруг спавна)
        announcements.write(NameAnnounced {
            agent,
            name: name.clone(),
        });
        log(&format!("roomba: spawned '{}' ({:?})", name, agent));
    }
}

/// Система: liveness — отключённая/исчезнувшая мина завершает агента
///
/// has_exploded НЕ завершает жизнь (симуляция замораживается, entity
/// остаётся); только enabled == false или despawn мины.
pub fn despawn_lifeless_agents(
    mut commands: Commands,
    agents: Query<(Entity, Option<&LinkedMine>), With<Roomba>>,
    mines: Query<&Mine>,
) {
    for (entity, linked) in agents.iter() {
        let mine_entity = linked.map(|l| l.0).unwrap_or(entity);
        let gone = match mines.get(mine_entity) {
            Ok(mine) => !mine.enabled,
            Err(_) => true,
        };
        if gone {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn test_zero_probability_never_activates() {
        let config = SimulationConfig {
            activation_probability: 0.0,
            ..Default::default()
        };
        let mut rng = rng();
        for _ in 0..1_000 {
            assert!(!activation_roll(&mut rng, &config, -50.0));
        }
    }

    #[test]
    fn test_full_probability_always_activates_underground() {
        let config = SimulationConfig::default(); // probability 1.0
        let mut rng = rng();
        for _ in 0..1_000 {
            assert!(activation_roll(&mut rng, &config, -50.0));
        }
    }

    #[test]
    fn test_surface_spawn_never_activates() {
        let config = SimulationConfig::default();
        let mut rng = rng();
        // Над порогом «под землёй» — gate закрыт независимо от probability
        assert!(!activation_roll(&mut rng, &config, 0.0));
        assert!(!activation_roll(&mut rng, &config, -9.9));
    }

    #[test]
    fn test_declip_pushes_out_by_two_radii() {
        let mut world = ProbeWorld::default();
        // Стена справа от агента: ближняя грань на x = 0.3
        world.add_solid(Vec3::new(1.3, 0.0, 0.0), Vec3::new(1.0, 2.0, 2.0));

        let radius = 0.55;
        let mut transform = Transform::IDENTITY; // right = +X

        assert!(declip_placement(&world, &mut transform, radius));

        // hit.point (0.3, 0, 0) + normal (-1, 0, 0) * 1.1
        let expected = Vec3::new(0.3, 0.0, 0.0) + Vec3::NEG_X * (2.0 * radius);
        assert!((transform.translation - expected).length() < 1e-5);
    }

    #[test]
    fn test_declip_noop_without_nearby_geometry() {
        let world = ProbeWorld::default();
        let mut transform = Transform::from_translation(Vec3::new(2.0, 1.0, 3.0));
        assert!(!declip_placement(&world, &mut transform, 0.55));
        assert_eq!(transform.translation, Vec3::new(2.0, 1.0, 3.0));
    }
}
