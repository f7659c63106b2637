use crate::config::{EnemyKind, TowerKind};
use thiserror::Error;

/// Why a candidate tower position was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    #[error("too close to path")]
    Path,
    #[error("too close to tower")]
    Tower,
    #[error("position is not finite")]
    NonFinite,
}

/// Rejection of a player action. State is left untouched whenever one of these
/// is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("match is over; reset to play again")]
    GameOver,
    #[error("invalid placement: {0}")]
    Placement(#[from] PlacementError),
    #[error("insufficient funds: needs {needed}, have {have}")]
    InsufficientFunds { needed: u32, have: u32 },
    #[error("no further upgrades available")]
    MaxLevel,
    #[error("unknown tower")]
    UnknownTower,
    #[error("a wave is already in progress")]
    WaveInProgress,
    #[error("viewport must have a positive size")]
    InvalidViewport,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("path needs at least 2 waypoints, got {len}")]
    PathTooShort { len: usize },
    #[error("viewport {width}x{height} must have a positive size")]
    InvalidViewport { width: f32, height: f32 },
    #[error("tower {kind}: {reason}")]
    InvalidTower {
        kind: TowerKind,
        reason: &'static str,
    },
    #[error("enemy {kind}: {reason}")]
    InvalidEnemy {
        kind: EnemyKind,
        reason: &'static str,
    },
    #[error("{0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_reasons() {
        assert_eq!(
            ActionError::from(PlacementError::Path).to_string(),
            "invalid placement: too close to path"
        );
        assert_eq!(
            ActionError::from(PlacementError::NonFinite).to_string(),
            "invalid placement: position is not finite"
        );
        assert_eq!(
            ActionError::InsufficientFunds {
                needed: 90,
                have: 40
            }
            .to_string(),
            "insufficient funds: needs 90, have 40"
        );
        assert_eq!(
            ConfigError::InvalidTower {
                kind: TowerKind::Slow,
                reason: "fire_rate must be positive"
            }
            .to_string(),
            "tower slow: fire_rate must be positive"
        );
    }
}
