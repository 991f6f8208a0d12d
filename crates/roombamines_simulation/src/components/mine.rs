//! Компонент исходной мины (linked object агента)

use bevy::prelude::*;

/// Мина — исходный объект, который агент со-локализует/подменяет
///
/// Liveness signal для агента:
/// - `has_exploded == true` — симуляция замораживается, entity остаётся
/// - `enabled == false` — конец жизни, агент уничтожает себя
///
/// Оба флага читаются каждый visual step и каждый fixed tick.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Mine {
    pub has_exploded: bool,
    pub enabled: bool,
}

impl Default for Mine {
    fn default() -> Self {
        Self {
            has_exploded: false,
            enabled: true,
        }
    }
}

impl Mine {
    /// Жива ли мина для целей симуляции (не взорвана и не отключена)
    pub fn is_live(&self) -> bool {
        !self.has_exploded && self.enabled
    }
}
