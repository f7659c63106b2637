//! Canonical serializable types for the Tower Defense game.
//!
//! Produced by `sim_td` every frame and consumed read-only by whatever draws
//! the board and the HUD.

use serde::{Deserialize, Serialize};

/// Point in board coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Current wave status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(tag = "type")]
pub enum WaveStatus {
    /// Between waves; the next-wave trigger is enabled.
    Idle {
        /// Wave number that will start next.
        next_wave: u32,
    },
    /// Enemies are still queued for this wave.
    Spawning {
        wave: u32,
        /// Enemies not yet spawned.
        remaining: u32,
        /// Seconds until the next spawn attempt.
        next_spawn_in: f32,
        /// Bosses held back until the board is clear.
        bosses_queued: u32,
    },
    /// Everything has spawned; waiting for the board to clear.
    Draining { wave: u32, alive: u32 },
}

impl Default for WaveStatus {
    fn default() -> Self {
        Self::Idle { next_wave: 1 }
    }
}

/// Information about a tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TowerInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub tower_type: String,
    pub level: u8,
    pub damage: i32,
    pub range: f32,
    /// Barrel heading in radians, 0 pointing along +x.
    pub angle: f32,
    /// `None` once the tower is fully upgraded.
    pub upgrade_cost: Option<u32>,
    pub sell_value: u32,
}

/// Information about an enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct EnemyInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub enemy_type: String,
    pub hp: i32,
    pub max_hp: i32,
    /// `hp / max_hp` clamped to `[0, 1]`.
    pub health: f32,
    pub radius: f32,
    pub slow_stacks: u8,
    pub boss: bool,
}

/// Information about a projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ProjectileInfo {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub source_type: String,
}

/// Full game state observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TdObservation {
    pub tick: u64,

    pub viewport_width: f32,
    pub viewport_height: f32,
    pub path: Vec<Position>,

    pub money: u32,
    pub lives: u32,
    pub wave: u32,
    pub in_wave: bool,
    pub game_over: bool,
    pub enemy_count: u32,
    pub wave_status: WaveStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tower_type: Option<String>,

    pub towers: Vec<TowerInfo>,
    pub enemies: Vec<EnemyInfo>,
    pub projectiles: Vec<ProjectileInfo>,
}
