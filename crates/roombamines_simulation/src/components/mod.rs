//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - mine: исходный объект мины (liveness: has_exploded, enabled)
//! - agent: roomba-агент (MovementState, TickTimer, DisplayName, LinkedMine)

pub mod agent;
pub mod mine;

// Re-exports для удобного импорта
pub use agent::*;
pub use mine::*;
