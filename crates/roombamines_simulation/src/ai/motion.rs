//! Per-frame интеграция движения из MovementState
//!
//! Visual-rate шаг: только authoritative процесс, только пока мина жива.
//! Observers получают transform через внешний transform-sync (вне scope).

use bevy::prelude::*;

use crate::components::{LinkedMine, Mine, MovementState, Roomba};
use crate::config::SimulationConfig;

/// Чистая интеграция одного шага движения
///
/// Конвенция знаков: RotateRight = отрицательный yaw вокруг +Y (по часовой
/// стрелке сверху), RotateLeft = положительный. MoveForward двигает вдоль
/// локального forward, ориентацию не трогает.
pub fn advance_motion(
    state: MovementState,
    transform: &mut Transform,
    config: &SimulationConfig,
    dt: f32,
) {
    match state {
        MovementState::Idle => {}
        MovementState::MoveForward => {
            let step = transform.forward() * (config.move_speed * dt);
            transform.translation += step;
        }
        MovementState::RotateRight => {
            transform.rotate_y(-config.turn_speed.to_radians() * dt);
        }
        MovementState::RotateLeft => {
            transform.rotate_y(config.turn_speed.to_radians() * dt);
        }
    }
}

/// Система: интеграция движения всех агентов (Update)
pub fn apply_movement_state(
    mut agents: Query<(Entity, &MovementState, &mut Transform, Option<&LinkedMine>), With<Roomba>>,
    mines: Query<&Mine>,
    config: Res<SimulationConfig>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (entity, state, mut transform, linked) in agents.iter_mut() {
        // Liveness: взорванная/отключённая мина замораживает симуляцию
        let mine_entity = linked.map(|l| l.0).unwrap_or(entity);
        let Ok(mine) = mines.get(mine_entity) else {
            continue;
        };
        if !mine.is_live() {
            continue;
        }

        advance_motion(*state, &mut transform, &config, dt);
    }
}
