use crate::errors::ConfigError;
use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path as FsPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    Basic,
    Sniper,
    Cannon,
    Slow,
}

impl TowerKind {
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Basic,
        TowerKind::Sniper,
        TowerKind::Cannon,
        TowerKind::Slow,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TowerKind::Basic => "basic",
            TowerKind::Sniper => "sniper",
            TowerKind::Cannon => "cannon",
            TowerKind::Slow => "slow",
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Flyer,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Flyer,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Flyer => "flyer",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    pub cost: u32,
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub damage: i32,
    pub projectile_speed: f32,
    #[serde(default)]
    pub display_name: String,
}

impl TowerSpec {
    pub fn fire_interval(&self) -> f32 {
        1.0 / self.fire_rate
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub base_hp: i32,
    pub hp_growth: i32,
    pub base_speed: f32,
    pub speed_growth: f32,
    pub base_reward: f32,
    pub reward_growth: f32,
    pub radius: f32,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerTable {
    pub basic: TowerSpec,
    pub sniper: TowerSpec,
    pub cannon: TowerSpec,
    pub slow: TowerSpec,
}

impl TowerTable {
    pub fn get(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Basic => &self.basic,
            TowerKind::Sniper => &self.sniper,
            TowerKind::Cannon => &self.cannon,
            TowerKind::Slow => &self.slow,
        }
    }
}

impl Default for TowerTable {
    fn default() -> Self {
        Self {
            basic: TowerSpec {
                cost: 30,
                range: 140.0,
                fire_rate: 1.2,
                damage: 20,
                projectile_speed: 320.0,
                display_name: "Mago".to_string(),
            },
            sniper: TowerSpec {
                cost: 90,
                range: 220.0,
                fire_rate: 0.6,
                damage: 70,
                projectile_speed: 480.0,
                display_name: "Patrulheiro".to_string(),
            },
            cannon: TowerSpec {
                cost: 150,
                range: 120.0,
                fire_rate: 0.4,
                damage: 50,
                projectile_speed: 200.0,
                display_name: "Bruxo".to_string(),
            },
            slow: TowerSpec {
                cost: 80,
                range: 130.0,
                fire_rate: 0.9,
                damage: 20,
                projectile_speed: 260.0,
                display_name: "Druida".to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub basic: EnemySpec,
    pub fast: EnemySpec,
    pub tank: EnemySpec,
    pub flyer: EnemySpec,
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemySpec {
        match kind {
            EnemyKind::Basic => &self.basic,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Tank => &self.tank,
            EnemyKind::Flyer => &self.flyer,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            basic: EnemySpec {
                base_hp: 20,
                hp_growth: 15,
                base_speed: 25.0,
                speed_growth: 2.0,
                base_reward: 2.0,
                reward_growth: 0.5,
                radius: 12.0,
                display_name: "Humano".to_string(),
            },
            fast: EnemySpec {
                base_hp: 20,
                hp_growth: 18,
                base_speed: 40.0,
                speed_growth: 3.0,
                base_reward: 2.0,
                reward_growth: 0.6,
                radius: 10.0,
                display_name: "Elfo Escuro".to_string(),
            },
            tank: EnemySpec {
                base_hp: 45,
                hp_growth: 30,
                base_speed: 12.0,
                speed_growth: 1.0,
                base_reward: 3.0,
                reward_growth: 1.0,
                radius: 15.0,
                display_name: "Orc".to_string(),
            },
            flyer: EnemySpec {
                base_hp: 30,
                hp_growth: 20,
                base_speed: 30.0,
                speed_growth: 2.0,
                base_reward: 2.0,
                reward_growth: 0.5,
                radius: 11.0,
                display_name: "Draconato".to_string(),
            },
        }
    }
}

/// Wave size and cadence curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_count: u32,
    pub count_growth: u32,
    /// Spawn interval (seconds) before any decay.
    pub interval_start: f32,
    pub interval_decay: f32,
    pub interval_min: f32,
    /// Every n-th wave carries bosses. Zero disables bosses.
    pub boss_every: u32,
    pub completion_bonus: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_count: 8,
            count_growth: 1,
            interval_start: 0.75,
            interval_decay: 0.02,
            interval_min: 0.45,
            boss_every: 5,
            completion_bonus: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossSpec {
    pub hp_multiplier: f32,
    pub reward_multiplier: f32,
    pub radius_bonus: f32,
}

impl Default for BossSpec {
    fn default() -> Self {
        Self {
            hp_multiplier: 4.0,
            reward_multiplier: 5.0,
            radius_bonus: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Minimum clearance from any path segment.
    pub path_threshold: f32,
    /// Minimum clearance from another tower's center.
    pub tower_threshold: f32,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            path_threshold: 22.0,
            tower_threshold: 24.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 540.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdConfig {
    pub path: Vec<Vec2>,
    pub viewport: Viewport,

    pub starting_money: u32,
    pub starting_lives: u32,
    /// Upper bound on a single frame step, in seconds.
    pub max_frame_dt: f32,

    pub placement: PlacementRules,
    pub projectile_radius: f32,
    pub splash_radius: f32,
    /// Distance at which an enemy counts as having reached its waypoint.
    pub arrival_threshold: f32,
    /// Extra clearance required between a new spawn and the nearest enemy.
    pub spawn_spacing: f32,
    /// Delay before retrying a withheld spawn, in seconds.
    pub spawn_retry_delay: f32,
    pub max_upgrade_level: u8,

    pub wave: WaveTuning,
    pub boss: BossSpec,
    pub towers: TowerTable,
    pub enemies: EnemyTable,

    /// Surviving past this wave wins the match. `None` plays until lives run out.
    pub victory_wave: Option<u32>,
}

/// The stock winding route across the default viewport.
pub(crate) fn default_route() -> Vec<Vec2> {
    vec![
        Vec2::new(40.0, 60.0),
        Vec2::new(40.0, 300.0),
        Vec2::new(180.0, 300.0),
        Vec2::new(180.0, 120.0),
        Vec2::new(360.0, 120.0),
        Vec2::new(360.0, 420.0),
        Vec2::new(540.0, 420.0),
        Vec2::new(540.0, 180.0),
        Vec2::new(720.0, 180.0),
        Vec2::new(720.0, 480.0),
        Vec2::new(860.0, 480.0),
    ]
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            path: default_route(),
            viewport: Viewport::default(),

            starting_money: 100,
            starting_lives: 12,
            max_frame_dt: 0.05,

            placement: PlacementRules::default(),
            projectile_radius: 4.0,
            splash_radius: 36.0,
            arrival_threshold: 8.0,
            spawn_spacing: 24.0,
            spawn_retry_delay: 0.1,
            max_upgrade_level: 5,

            wave: WaveTuning::default(),
            boss: BossSpec::default(),
            towers: TowerTable::default(),
            enemies: EnemyTable::default(),

            victory_wave: None,
        }
    }
}

impl TdConfig {
    /// Parse a JSON document. Missing fields keep their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TdConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn tower(&self, kind: TowerKind) -> &TowerSpec {
        self.towers.get(kind)
    }

    pub fn enemy(&self, kind: EnemyKind) -> &EnemySpec {
        self.enemies.get(kind)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.len() < 2 {
            return Err(ConfigError::PathTooShort {
                len: self.path.len(),
            });
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(ConfigError::Invalid("max_frame_dt must be positive"));
        }

        for kind in TowerKind::ALL {
            let spec = self.tower(kind);
            if !(spec.fire_rate > 0.0) {
                return Err(ConfigError::InvalidTower {
                    kind,
                    reason: "fire_rate must be positive",
                });
            }
            if !(spec.projectile_speed > 0.0) {
                return Err(ConfigError::InvalidTower {
                    kind,
                    reason: "projectile_speed must be positive",
                });
            }
        }

        for kind in EnemyKind::ALL {
            let spec = self.enemy(kind);
            if spec.base_hp < 1 {
                return Err(ConfigError::InvalidEnemy {
                    kind,
                    reason: "base_hp must be at least 1",
                });
            }
            if spec.hp_growth < 0 || spec.speed_growth < 0.0 {
                return Err(ConfigError::InvalidEnemy {
                    kind,
                    reason: "growth must not be negative",
                });
            }
        }

        if self.wave.interval_min > self.wave.interval_start {
            return Err(ConfigError::Invalid(
                "wave.interval_min must not exceed wave.interval_start",
            ));
        }

        Ok(())
    }
}
