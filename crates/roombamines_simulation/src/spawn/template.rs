//! Template substitution: spawn table уровня + process-wide registry
//!
//! Один раз на загрузку уровня сканируем spawn table, находим первый
//! template с landmine-подобным компонентом в nested-структуре, аугментируем
//! его на месте (movement + transform replication capability), перевешиваем
//! сетевую регистрацию и перезаписываем entry. Дальше все спавны этого вида
//! автоматически инстанцируют аугментированную версию.
//!
//! Registry живёт весь процесс и не чистится: последующие загрузки уровня
//! переиспользуют уже аугментированный template (идемпотентность).

use bevy::prelude::*;

use crate::logger::{log_info, log_warning};

/// Вид компонента в blueprint'е префаба (nested-структура)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefabComponent {
    /// Landmine-подобный компонент — признак eligible template
    Landmine,
    Turret,
    SpikeTrap,
    /// Movement capability, добавляется аугментацией
    RoombaDriver,
    /// Transform replication capability, добавляется аугментацией
    TransformSync,
}

/// Узел blueprint'а (дерево нод с компонентами)
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: String,
    pub components: Vec<PrefabComponent>,
    pub children: Vec<PrefabNode>,
}

impl PrefabNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, component: PrefabComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_child(mut self, child: PrefabNode) -> Self {
        self.children.push(child);
        self
    }

    /// Рекурсивный поиск компонента по nested-структуре
    pub fn contains(&self, component: PrefabComponent) -> bool {
        self.components.contains(&component)
            || self.children.iter().any(|child| child.contains(component))
    }
}

/// Blueprint префаба
#[derive(Debug, Clone)]
pub struct PrefabBlueprint {
    pub name: String,
    pub root: PrefabNode,
}

/// Entry spawn table уровня
#[derive(Debug, Clone)]
pub struct SpawnEntry {
    /// Вид объекта (ключ registry)
    pub kind: String,
    pub blueprint: PrefabBlueprint,
}

/// Spawn table уровня — список спавнящихся templates
///
/// Принадлежит уровню; перезаписывается host-драйвером на каждой загрузке.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnTable {
    pub entries: Vec<SpawnEntry>,
}

/// Сетевая регистрация префабов (registered prefab names)
#[derive(Resource, Debug, Clone, Default)]
pub struct NetworkPrefabs {
    registered: Vec<String>,
}

impl NetworkPrefabs {
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.registered.contains(&name) {
            self.registered.push(name);
        }
    }

    pub fn unregister(&mut self, name: &str) {
        self.registered.retain(|n| n != name);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.iter().any(|n| n == name)
    }
}

/// Process-wide registry аугментированного template
///
/// At most один augmented template; populated на первой загрузке уровня,
/// персистит до конца процесса (не чистится).
#[derive(Resource, Debug, Clone, Default)]
pub struct TemplateRegistry {
    /// kind аугментированного template; None = аугментация не активна
    pub augmented_kind: Option<String>,
}

impl TemplateRegistry {
    pub fn is_augmented(&self) -> bool {
        self.augmented_kind.is_some()
    }
}

/// Исход ensure-операции
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateResolution {
    /// Template найден и аугментирован на этой загрузке
    Augmented(String),
    /// Уже аугментирован ранее (идемпотентный повтор)
    AlreadyAugmented(String),
    /// Eligible template не найден — аугментация выключена для уровня
    /// (явный исход вместо null-разыменования)
    NoEligibleTemplate,
}

/// Суффикс имени аугментированного префаба
const AUGMENTED_SUFFIX: &str = "Roomba";

/// Идемпотентная ensure-операция: «аугментированный вариант зарегистрирован
/// и активен». Вызывается один раз на загрузку уровня.
pub fn ensure_augmented_template(
    table: &mut SpawnTable,
    registry: &mut TemplateRegistry,
    prefabs: &mut NetworkPrefabs,
) -> TemplateResolution {
    if let Some(kind) = &registry.augmented_kind {
        return TemplateResolution::AlreadyAugmented(kind.clone());
    }

    let Some(entry) = table
        .entries
        .iter_mut()
        .find(|entry| entry.blueprint.root.contains(PrefabComponent::Landmine))
    else {
        log_warning("substitution: no eligible template in spawn table, augmentation disabled");
        return TemplateResolution::NoEligibleTemplate;
    };

    // Аугментация на месте: movement + transform replication capability
    let stock_name = entry.blueprint.name.clone();
    entry
        .blueprint
        .root
        .components
        .push(PrefabComponent::RoombaDriver);
    entry
        .blueprint
        .root
        .components
        .push(PrefabComponent::TransformSync);
    entry.blueprint.name = format!("{stock_name}{AUGMENTED_SUFFIX}");

    // Перевешиваем сетевую регистрацию: stock выходит, augmented входит
    prefabs.unregister(&stock_name);
    prefabs.register(entry.blueprint.name.clone());

    registry.augmented_kind = Some(entry.kind.clone());
    log_info(&format!(
        "substitution: template '{}' augmented as '{}'",
        stock_name, entry.blueprint.name
    ));
    TemplateResolution::Augmented(entry.kind.clone())
}
