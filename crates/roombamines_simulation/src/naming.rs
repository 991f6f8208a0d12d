//! Name pool для display names агентов
//!
//! Sidecar текстовый файл, одно имя на строку. Отсутствующий файл —
//! self-healing: создаётся с default-списком. Загружается целиком в память
//! при старте, дальше read-only; выбор равномерно-случайным индексом.
//! Уникальность НЕ гарантируется — дубликаты между живыми агентами ок.

use bevy::prelude::*;
use rand::Rng;
use std::path::Path;
use thiserror::Error;

use crate::logger::log_warning;

/// Default-список, записывается в отсутствующий файл
const DEFAULT_NAMES: &[&str] = &[
    "John", "George", "Paul", "Ringo", "Henry", "William", "Joshua", "Sam", "Fred", "Vinny",
    "Ross", "Joey",
];

#[derive(Debug, Error)]
pub enum NamePoolError {
    #[error("name list io: {0}")]
    Io(#[from] std::io::Error),
    #[error("name list is empty")]
    Empty,
}

/// Пул имён агентов (process-wide, write-once при init)
#[derive(Resource, Debug, Clone)]
pub struct NamePool {
    names: Vec<String>,
}

impl Default for NamePool {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NamePool {
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Загрузка из файла (одно имя на строку, пустые строки пропускаются)
    pub fn from_file(path: &Path) -> Result<Self, NamePoolError> {
        let text = std::fs::read_to_string(path)?;
        let names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(NamePoolError::Empty);
        }
        Ok(Self { names })
    }

    /// Загрузка с self-healing: отсутствующий/пустой файл пересоздаётся с
    /// default-списком
    pub fn load_or_create(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(pool) => pool,
            Err(err) => {
                log_warning(&format!(
                    "names: {} unreadable ({}), recreating with defaults",
                    path.display(),
                    err
                ));
                let pool = Self::default();
                let _ = std::fs::write(path, pool.names.join("\n"));
                pool
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Равномерно-случайное имя из пула
    pub fn random_name(&self, rng: &mut impl Rng) -> String {
        let index = rng.gen_range(0..self.names.len());
        self.names[index].clone()
    }
}
