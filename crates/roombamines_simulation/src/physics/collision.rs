//! Collision Groups Constants
//!
//! Rapier collision groups — centralised constants для всего проекта.
//!
//! - Group 2: Agents (kinematic roomba bodies)
//! - Group 3: Environment (static walls/floors)
//! - Group 4: Triggers (probe-ами игнорируются)

use bevy_rapier3d::prelude::*;

/// Половина высоты корпуса roomba (плоский chassis)
pub const AGENT_HALF_HEIGHT: f32 = 0.15;

/// Group 2: Agents
pub const GROUP_AGENTS: Group = Group::GROUP_2;

/// Group 3: Environment (static geometry)
pub const GROUP_ENVIRONMENT: Group = Group::GROUP_3;

/// Group 4: Trigger volumes
pub const GROUP_TRIGGERS: Group = Group::GROUP_4;

/// Agents коллайдят с agents + environment (НЕ с triggers)
pub fn agent_groups() -> CollisionGroups {
    CollisionGroups::new(GROUP_AGENTS, GROUP_AGENTS | GROUP_ENVIRONMENT)
}

/// Плоский box-коллайдер корпуса под радиус агента
pub fn agent_collider(radius: f32) -> Collider {
    Collider::cuboid(radius, AGENT_HALF_HEIGHT, radius)
}
