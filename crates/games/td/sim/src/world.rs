use crate::config::{TdConfig, TowerKind, Viewport};
use crate::entities::{Enemy, Projectile, Tower};
use crate::errors::{ConfigError, PlacementError};
use crate::geometry::{validate_placement, Path, Vec2};
use crate::spawner::SpawnScheduler;
use crate::wave::WavePlan;
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct EnemyId; }
new_key_type! { pub struct TowerId; }
new_key_type! { pub struct ProjectileId; }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave running; the next one may be started.
    Idle,
    /// Enemies still queued.
    Spawning,
    /// Everything spawned, waiting for the board to clear.
    Draining,
}

#[derive(Clone, Debug, Default)]
pub struct World {
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub towers: SlotMap<TowerId, Tower>,
    pub projectiles: SlotMap<ProjectileId, Projectile>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
    }
}

/// Result of hovering a tower kind over a board point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    pub kind: TowerKind,
    pub position: Vec2,
    pub cost: u32,
    pub affordable: bool,
    pub validity: Result<(), PlacementError>,
}

impl PlacementPreview {
    pub fn can_place(&self) -> bool {
        self.affordable && self.validity.is_ok()
    }
}

/// Everything one match owns. Passed explicitly to systems and action
/// handlers.
#[derive(Clone, Debug)]
pub struct TdState {
    pub config: TdConfig,
    pub path: Path,
    pub viewport: Viewport,
    pub world: World,

    pub money: u32,
    pub lives: u32,
    /// Number of the current wave, or of the next one while idle.
    pub wave: u32,
    pub in_wave: bool,
    pub plan: Option<WavePlan>,
    /// Seconds until the next spawn attempt.
    pub spawn_timer: f32,
    pub spawn_remaining: u32,
    pub scheduler: SpawnScheduler,
    pub game_over: bool,

    /// Tower kind armed for placement, if any.
    pub selected_kind: Option<TowerKind>,
}

impl TdState {
    pub fn new(config: TdConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let path = Path::new(config.path.clone())?;
        Ok(Self::with_path(config, path))
    }

    fn with_path(config: TdConfig, path: Path) -> Self {
        Self {
            path,
            viewport: config.viewport,
            world: World::new(),
            money: config.starting_money,
            lives: config.starting_lives,
            wave: 1,
            in_wave: false,
            plan: None,
            spawn_timer: 0.0,
            spawn_remaining: 0,
            scheduler: SpawnScheduler::default(),
            game_over: false,
            selected_kind: None,
            config,
        }
    }

    /// A fresh match on the stock configuration.
    pub fn with_defaults() -> Self {
        Self::with_path(TdConfig::default(), Path::default())
    }

    /// Back to a fresh match with the same configuration.
    pub fn reset(&mut self) {
        self.world.clear();
        self.money = self.config.starting_money;
        self.lives = self.config.starting_lives;
        self.wave = 1;
        self.in_wave = false;
        self.plan = None;
        self.spawn_timer = 0.0;
        self.spawn_remaining = 0;
        self.scheduler.clear();
        self.game_over = false;
        self.selected_kind = None;
    }

    pub fn phase(&self) -> WavePhase {
        match (self.in_wave, self.spawn_remaining) {
            (false, _) => WavePhase::Idle,
            (true, 0) => WavePhase::Draining,
            (true, _) => WavePhase::Spawning,
        }
    }

    pub fn enemy_count(&self) -> usize {
        self.world.enemies.len()
    }

    pub fn tower_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.world.towers.values().map(|t| t.position)
    }

    pub fn check_placement(&self, point: Vec2) -> Result<(), PlacementError> {
        validate_placement(
            point,
            self.tower_positions(),
            self.path.points(),
            &self.config.placement,
        )
    }

    /// Preview for the selected tower kind. `None` when nothing is selected.
    pub fn preview_placement(&self, point: Vec2) -> Option<PlacementPreview> {
        let kind = self.selected_kind?;
        Some(self.preview_kind(kind, point))
    }

    pub fn preview_kind(&self, kind: TowerKind, point: Vec2) -> PlacementPreview {
        let cost = self.config.tower(kind).cost;
        PlacementPreview {
            kind,
            position: point,
            cost,
            affordable: self.money >= cost,
            validity: self.check_placement(point),
        }
    }
}
