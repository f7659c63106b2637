use crate::config::{EnemyKind, TowerKind};
use crate::errors::ActionError;
use crate::geometry::Vec2;
use crate::spawner::WithholdReason;
use crate::world::{EnemyId, TowerId};
use sim_core::ActionId;

#[derive(Clone, Debug, PartialEq)]
pub enum TdEvent {
    WaveStarted {
        wave: u32,
        enemies: u32,
        bosses: u32,
    },
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
        boss: bool,
    },
    SpawnWithheld {
        reason: WithholdReason,
    },
    EnemyEscaped {
        id: EnemyId,
        lives: u32,
    },
    EnemyKilled {
        id: EnemyId,
        kind: EnemyKind,
        reward: u32,
        position: Vec2,
    },
    TowerPlaced {
        id: TowerId,
        kind: TowerKind,
        position: Vec2,
        cost: u32,
    },
    TowerUpgraded {
        id: TowerId,
        level: u8,
        cost: u32,
    },
    TowerSold {
        id: TowerId,
        refund: u32,
    },
    TowerFired {
        tower: TowerId,
        target: EnemyId,
    },
    WaveCompleted {
        wave: u32,
        bonus: u32,
    },
    GameOver {
        wave: u32,
    },
    MatchReset,
    ActionRejected {
        action_id: ActionId,
        error: ActionError,
    },
}
