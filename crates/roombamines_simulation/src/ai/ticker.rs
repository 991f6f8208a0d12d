//! Fixed-tick шаг: accumulator, environment probes, FSM transitions
//!
//! Переоценка препятствий происходит только на reset-тике accumulator'а
//! (каждые tick_length fixed ticks), никогда между ними.
//!
//! Probe-последовательность reset-тика:
//! 1. Grounding correction — короткий probe вниз как fast path, длинный на
//!    промахе; total miss гардится, позиция остаётся без изменений
//! 2. Forward clearance — overlap box на один радиус вперёд + дистанция
//!    полного tick'а на текущей move rate
//! 3. Forward ground — probe вниз под той же спроецированной точкой
//! 4. Transition rule (см. next_state)

use bevy::prelude::*;
use rand::Rng;

use crate::components::{LinkedMine, Mine, MovementState, Roomba, TickTimer};
use crate::config::SimulationConfig;
use crate::physics::{ProbeWorld, AGENT_HALF_HEIGHT, LONG_GROUND_PROBE, SHORT_GROUND_PROBE};
use crate::DeterministicRng;

/// Дистанция forward-ground probe (вниз от спроецированной точки)
pub const FORWARD_GROUND_PROBE: f32 = 1.0;

/// Результат environment probes на reset-тике
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surroundings {
    /// Overlap box впереди ничего не задел (solid non-trigger)
    pub clear_ahead: bool,
    /// Под спроецированной точкой есть опора (не ledge)
    pub ground_ahead: bool,
}

/// Grounding correction: прижать агента к полу после spawn-jitter
///
/// Короткий probe — «достаточно близко, не паримся» (perf fast path).
/// На промахе длинный probe; на hit снап Y к точке попадания.
/// Total miss — позиция без изменений (guard обязателен).
pub fn correct_grounding(probe_world: &ProbeWorld, translation: &mut Vec3) -> bool {
    if probe_world
        .raycast_down(*translation, SHORT_GROUND_PROBE)
        .is_some()
    {
        return false;
    }
    match probe_world.raycast_down(*translation, LONG_GROUND_PROBE) {
        Some(hit) => {
            translation.y = hit.point.y;
            true
        }
        None => false,
    }
}

/// Environment probes перед спроецированной позицией агента
///
/// travel = дистанция, которую агент пройдёт за один полный tick-интервал
/// на текущей move rate (move_speed * tick_length * fixed_dt).
pub fn probe_surroundings(
    probe_world: &ProbeWorld,
    transform: &Transform,
    radius: f32,
    travel: f32,
) -> Surroundings {
    let ahead = transform.translation + transform.forward() * (radius + travel);

    // Origin агента — подошва корпуса; clearance box поднят на половину
    // высоты, чтобы пол под агентом препятствием не считался
    let clear_ahead = !probe_world.overlap_box(
        ahead + Vec3::Y * AGENT_HALF_HEIGHT,
        Vec3::new(radius, AGENT_HALF_HEIGHT, radius),
    );
    let ground_ahead = probe_world.raycast_down(ahead, FORWARD_GROUND_PROBE).is_some();

    Surroundings {
        clear_ahead,
        ground_ahead,
    }
}

/// Выбор направления поворота при столкновении
///
/// Всегда RotateRight; при allow_left_turn — равномерная монетка 50/50,
/// ничем больше не взвешенная.
pub fn choose_turn(rng: &mut impl Rng, allow_left_turn: bool) -> MovementState {
    if allow_left_turn && rng.gen_bool(0.5) {
        MovementState::RotateLeft
    } else {
        MovementState::RotateRight
    }
}

/// Transition rule reset-тика
///
/// - clearance И ground ⇒ MoveForward (детерминированно, из любого state)
/// - только что упёрлись (были в MoveForward) ⇒ выбор поворота
/// - уже поворачиваем и всё ещё заблокированы ⇒ остаёмся в текущем rotate
pub fn next_state(
    current: MovementState,
    surroundings: Surroundings,
    allow_left_turn: bool,
    rng: &mut impl Rng,
) -> MovementState {
    if surroundings.clear_ahead && surroundings.ground_ahead {
        MovementState::MoveForward
    } else if current == MovementState::MoveForward {
        choose_turn(rng, allow_left_turn)
    } else {
        current
    }
}

/// Система: fixed tick всех агентов (FixedUpdate)
pub fn advance_tick(
    mut agents: Query<(
        Entity,
        &mut MovementState,
        &mut TickTimer,
        &mut Transform,
        &Roomba,
        Option<&LinkedMine>,
    )>,
    mines: Query<&Mine>,
    config: Res<SimulationConfig>,
    probe_world: Res<ProbeWorld>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let fixed_dt = time.delta_secs();

    for (entity, mut state, mut timer, mut transform, roomba, linked) in agents.iter_mut() {
        // Idle = аугментация выключена, state machine не работает
        if *state == MovementState::Idle {
            continue;
        }

        let mine_entity = linked.map(|l| l.0).unwrap_or(entity);
        let Ok(mine) = mines.get(mine_entity) else {
            continue;
        };
        if !mine.is_live() {
            continue;
        }

        if !timer.advance(config.tick_length) {
            continue;
        }

        correct_grounding(&probe_world, &mut transform.translation);

        let travel = config.move_speed * config.tick_length as f32 * fixed_dt;
        let surroundings = probe_surroundings(&probe_world, &transform, roomba.radius, travel);

        let new_state = next_state(*state, surroundings, config.allow_left_turn, &mut rng.rng);
        if new_state != *state {
            *state = new_state;
        }
    }
}
