pub mod actions;
pub mod config;
pub mod entities;
pub mod errors;
pub mod events;
pub mod game;
pub mod geometry;
pub mod observe;
pub mod spawner;
pub mod systems;
pub mod wave;
pub mod world;

pub use actions::TdAction;
pub use config::{EnemyKind, TdConfig, TowerKind};
pub use errors::{ActionError, ConfigError, PlacementError};
pub use events::TdEvent;
pub use game::TdGame;
pub use geometry::Vec2;
pub use wave::{plan_for_wave, SpawnOrder, WaveEntry, WavePlan};
pub use world::{EnemyId, PlacementPreview, TdState, TowerId, WavePhase};
