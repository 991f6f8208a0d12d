//! Physics module
//!
//! Probe-слой для state machine: raycast вниз (grounding), overlap box
//! (forward clearance), горизонтальные probes (de-clip). Сцена физики
//! принадлежит внешнему engine; в headless-режиме её заменяет ProbeWorld
//! со статической геометрией.

pub mod collision;
pub mod probes;

// Re-export основных типов
pub use collision::{agent_collider, agent_groups, AGENT_HALF_HEIGHT};
pub use probes::{ProbeWorld, RayHit, LONG_GROUND_PROBE, SHORT_GROUND_PROBE};
