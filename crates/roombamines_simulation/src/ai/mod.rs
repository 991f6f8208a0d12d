//! Roomba AI module
//!
//! FSM движения {Idle, MoveForward, RotateRight, RotateLeft} на двух
//! cadence'ах:
//! - Update (visual rate): интеграция движения из текущего state
//! - FixedUpdate (fixed tick): tick accumulator + переоценка препятствий
//!
//! Обе системы гейтятся authority run condition и liveness мины.

use bevy::prelude::*;

pub mod motion;
pub mod ticker;

use crate::authority::is_authoritative;

// Re-export основных операций
pub use motion::{advance_motion, apply_movement_state};
pub use ticker::{advance_tick, choose_turn, next_state, Surroundings};

/// Roomba AI Plugin
///
/// Порядок выполнения:
/// 1. apply_movement_state (Update) — интеграция текущего state
/// 2. advance_tick (FixedUpdate) — accumulator + probes + transitions
pub struct RoombaAiPlugin;

impl Plugin for RoombaAiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, motion::apply_movement_state.run_if(is_authoritative))
            .add_systems(FixedUpdate, ticker::advance_tick.run_if(is_authoritative));
    }
}
