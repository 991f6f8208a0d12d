//! Authority gate: кто authoritative simulator в сессии
//!
//! Host/server считает симуляцию, clients — чистые observers реплицированного
//! state. Все мутирующие системы и все physics probes гейтятся на этот check.

use bevy::prelude::*;

/// Роль процесса в сетевой сессии
///
/// Владеет внешний сетевой слой; симуляция только читает.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum NetworkRole {
    /// Host/server — designated authoritative simulator
    #[default]
    Host,
    /// Observer: применяет реплицированные имена/трансформы, ничего не пишет
    Client,
}

impl NetworkRole {
    /// Pure query, без side effects
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Self::Host)
    }
}

/// Run condition для мутирующих систем (см. RoombaAiPlugin, SpawnPlugin)
pub fn is_authoritative(role: Res<NetworkRole>) -> bool {
    role.is_authoritative()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_is_authoritative() {
        assert!(NetworkRole::Host.is_authoritative());
        assert!(!NetworkRole::Client.is_authoritative());
    }

    #[test]
    fn test_default_role_is_host() {
        // Headless-симуляция без сети ведёт себя как host
        assert_eq!(NetworkRole::default(), NetworkRole::Host);
    }
}
