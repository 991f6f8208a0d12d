//! Replication channel: authority → observers
//!
//! Fire-and-forget one-way анонс display name вокруг спавна, at-most-once.
//! Без ack, без retry, без ordering между агентами (имена независимы).
//! Positional replication — внешний transform-sync механизм, вне scope.

use bevy::prelude::*;

use crate::components::ObservedLabel;

/// Анонс имени от authority всем observers
///
/// Message-passing контракт: authority пишет announce, observer применяет
/// apply. Сетевой транспорт подставляет внешний слой; в одном процессе
/// events доставляются локально.
#[derive(Event, Debug, Clone)]
pub struct NameAnnounced {
    pub agent: Entity,
    pub name: String,
}

/// Система: observer применяет полученное имя к label агента
///
/// Работает на любой роли (host тоже рисует labels); источник текста —
/// только сам анонс, не DisplayName. Анонс для уже умершей entity молча
/// теряется (at-most-once, без retry).
pub fn apply_announced_names(
    mut events: EventReader<NameAnnounced>,
    mut labels: Query<&mut ObservedLabel>,
) {
    for event in events.read() {
        if let Ok(mut label) = labels.get_mut(event.agent) {
            label.text = event.name.clone();
        }
    }
}

/// Replication Plugin
pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NameAnnounced>()
            .add_systems(Update, apply_announced_names);
    }
}
