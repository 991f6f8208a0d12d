//! Компоненты roomba-агента: состояние движения, tick timer, имя

use bevy::prelude::*;

/// Roomba-агент — маркер мобильной entity
///
/// Radius используется probe-системами (clearance box, de-clip) и
/// соответствует половине ширины корпуса.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Roomba {
    /// Радиус корпуса (метры)
    pub radius: f32,
}

impl Default for Roomba {
    fn default() -> Self {
        Self { radius: 0.55 }
    }
}

/// FSM состояния движения агента
///
/// Idle = аугментация выключена для этого instance (entity ведёт себя как
/// немодифицированная мина). Активированный агент стартует в RotateRight.
///
/// Инвариант: state читает/пишет только authoritative процесс.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum MovementState {
    /// Без движения — аугментация неактивна
    Idle,
    /// Движение вперёд вдоль forward axis
    MoveForward,
    /// Поворот направо вокруг up axis
    RotateRight,
    /// Поворот налево (только при allow_left_turn)
    RotateLeft,
}

impl Default for MovementState {
    fn default() -> Self {
        Self::Idle
    }
}

impl MovementState {
    pub fn is_rotating(&self) -> bool {
        matches!(self, Self::RotateRight | Self::RotateLeft)
    }
}

/// Счётчик fixed ticks до следующей переоценки препятствий
///
/// accumulator: 0 при спавне, сбрасывается в 0 каждый раз при достижении
/// tick_length (из SimulationConfig). Переоценка происходит ТОЛЬКО на
/// reset-тике, никогда между ними.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TickTimer {
    pub accumulator: u32,
}

impl TickTimer {
    /// Инкремент счётчика; true когда достигнут tick_length (счётчик сброшен)
    pub fn advance(&mut self, tick_length: u32) -> bool {
        self.accumulator += 1;
        if self.accumulator >= tick_length {
            self.accumulator = 0;
            true
        } else {
            false
        }
    }
}

/// Display name агента — назначается один раз при спавне из name pool
///
/// Authority назначает и анонсирует observers (см. replication).
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct DisplayName(pub String);

/// Back-reference на мину (companion mode)
///
/// Non-owning: в in-place mode агент и мина — одна entity, компонент
/// отсутствует. Liveness-системы резолвят linked, иначе self.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LinkedMine(pub Entity);

/// Косметический scale визуального меша (не влияет на коллизии)
///
/// При активации вертикальный scale слегка увеличивается, чтобы корпус
/// roomba выглядывал из-под мины.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct RoombaVisual {
    pub mesh_scale: Vec3,
}

impl Default for RoombaVisual {
    fn default() -> Self {
        Self {
            mesh_scale: Vec3::ONE,
        }
    }
}

/// Маркер: instance зарегистрирован в сетевом слое (transform-sync снаружи)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Replicated;

/// Label, который observer показывает рядом с агентом
///
/// Заполняется ТОЛЬКО из полученного NameAnnounced — observer никогда не
/// читает DisplayName напрямую.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ObservedLabel {
    pub text: String,
}
