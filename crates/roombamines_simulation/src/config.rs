//! Конфигурация симуляции
//!
//! Читается один раз при старте процесса, read-only после init.
//! Изменения вступают в силу только при следующем запуске (не live).
//! Отсутствующий/битый файл — self-healing: defaults записываются обратно.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::logger::log_warning;

/// Стратегия подмены (две ревизии исходного дизайна, выбор — build-time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum SubstitutionMode {
    /// Подмена template на месте: agent-компоненты вешаются на саму мину
    /// (поздняя ревизия, предпочтительная)
    #[default]
    InPlace,
    /// Companion object: отдельная entity-агент, мина re-parent'ится под неё
    /// (ранняя ревизия)
    Companion,
}

/// Параметры симуляции roomba-агентов
///
/// Каждая опция с default и описанием; все читаются каждым агентом на
/// каждом update.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SimulationConfig {
    /// Скорость движения вперёд (m/s)
    pub move_speed: f32,
    /// Скорость поворота (deg/s)
    pub turn_speed: f32,
    /// Длина tick-интервала между переоценками препятствий (fixed ticks)
    pub tick_length: u32,
    /// Разрешены ли повороты налево (иначе всегда направо)
    pub allow_left_turn: bool,
    /// Вероятность активации агента при спавне, [0, 1]
    pub activation_probability: f32,
    /// Proxy-порог «под землёй»: активация только при spawn y ниже порога
    pub underground_y_threshold: f32,
    /// Стратегия подмены (InPlace / Companion)
    pub substitution_mode: SubstitutionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.5,             // 0.5 m/s — скорость roomba
            turn_speed: 50.0,            // 50 deg/s
            tick_length: 30,             // переоценка каждые 30 fixed ticks
            allow_left_turn: false,
            activation_probability: 1.0, // все eligible instances активируются
            underground_y_threshold: -10.0,
            substitution_mode: SubstitutionMode::InPlace,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SimulationConfig {
    /// Загрузка из JSON файла
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&text)?;
        config.sanitize();
        Ok(config)
    }

    /// Загрузка с self-healing: отсутствующий или битый файл заменяется
    /// defaults (и записывается обратно, чтобы у игрока был шаблон)
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log_warning(&format!(
                    "config: {} unreadable ({}), falling back to defaults",
                    path.display(),
                    err
                ));
                let config = Self::default();
                if let Ok(text) = serde_json::to_string_pretty(&config) {
                    // Ошибку записи глотаем: defaults уже в руках
                    let _ = std::fs::write(path, text);
                }
                config
            }
        }
    }

    /// Зажимаем значения в валидные диапазоны
    pub fn sanitize(&mut self) {
        self.activation_probability = self.activation_probability.clamp(0.0, 1.0);
        self.move_speed = self.move_speed.max(0.0);
        self.turn_speed = self.turn_speed.max(0.0);
        self.tick_length = self.tick_length.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.move_speed, 0.5);
        assert_eq!(config.turn_speed, 50.0);
        assert_eq!(config.tick_length, 30);
        assert!(!config.allow_left_turn);
        assert_eq!(config.activation_probability, 1.0);
        assert_eq!(config.substitution_mode, SubstitutionMode::InPlace);
    }

    #[test]
    fn test_sanitize_clamps_probability() {
        let mut config = SimulationConfig {
            activation_probability: 1.7,
            tick_length: 0,
            ..default()
        };
        config.sanitize();
        assert_eq!(config.activation_probability, 1.0);
        assert_eq!(config.tick_length, 1);
    }

    #[test]
    fn test_load_or_default_self_heals() {
        let path = std::env::temp_dir().join("roombamines_config_missing_test.json");
        let _ = std::fs::remove_file(&path);

        let config = SimulationConfig::load_or_default(&path);
        assert_eq!(config.move_speed, 0.5);

        // Defaults записаны обратно и теперь парсятся
        let reloaded = SimulationConfig::from_file(&path).expect("written defaults parse");
        assert_eq!(reloaded.tick_length, 30);

        let _ = std::fs::remove_file(&path);
    }
}
