pub mod enemy;
pub mod projectile;
pub mod tower;

pub use enemy::{Enemy, EnemyProgress, MAX_SLOW_STACKS};
pub use projectile::{Guidance, Impact, Projectile, ProjectileBehavior};
pub use tower::Tower;
