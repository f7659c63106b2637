use crate::config::TowerKind;
use crate::entities::enemy::Enemy;
use crate::entities::tower::Tower;
use crate::geometry::{distance, normalize, Vec2};
use crate::world::EnemyId;

/// Margin past the viewport edge before a projectile is culled.
const OFF_SCREEN_MARGIN: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guidance {
    /// Velocity fixed at fire time.
    Straight,
    /// Re-aimed at the target every tick while it lives.
    Homing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impact {
    Single,
    /// Single-target damage plus one slow stack.
    Slow,
    /// Damages everything within the configured splash radius.
    Splash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileBehavior {
    pub guidance: Guidance,
    pub impact: Impact,
}

impl TowerKind {
    pub const fn behavior(self) -> ProjectileBehavior {
        let (guidance, impact) = match self {
            TowerKind::Basic => (Guidance::Homing, Impact::Single),
            TowerKind::Sniper => (Guidance::Straight, Impact::Single),
            TowerKind::Cannon => (Guidance::Homing, Impact::Splash),
            TowerKind::Slow => (Guidance::Homing, Impact::Slow),
        };
        ProjectileBehavior { guidance, impact }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub damage: i32,
    pub source: TowerKind,
    pub radius: f32,
    /// Homing target. Dropped for good once it no longer resolves.
    pub target: Option<EnemyId>,
    pub alive: bool,
}

impl Projectile {
    pub fn new(
        position: Vec2,
        aim_at: Vec2,
        speed: f32,
        damage: i32,
        source: TowerKind,
        radius: f32,
        target: Option<EnemyId>,
    ) -> Self {
        let dir = normalize(aim_at.x - position.x, aim_at.y - position.y);
        Self {
            position,
            velocity: dir * speed,
            speed,
            damage,
            source,
            radius,
            target,
            alive: true,
        }
    }

    pub(crate) fn fired_by(tower: &Tower, target_id: EnemyId, aim_at: Vec2, radius: f32) -> Self {
        let target = match tower.kind.behavior().guidance {
            Guidance::Homing => Some(target_id),
            Guidance::Straight => None,
        };
        Self::new(
            tower.position,
            aim_at,
            tower.projectile_speed,
            tower.damage,
            tower.kind,
            radius,
            target,
        )
    }

    pub fn behavior(&self) -> ProjectileBehavior {
        self.source.behavior()
    }

    /// Re-aim at the target's current position. `None` means the target is
    /// gone: the projectile forgets it and keeps its last heading.
    pub fn steer(&mut self, target_position: Option<Vec2>) {
        if self.target.is_none() {
            return;
        }
        match target_position {
            Some(pos) => {
                let dir = normalize(pos.x - self.position.x, pos.y - self.position.y);
                self.velocity = dir * self.speed;
            }
            None => self.target = None,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        let Vec2 { x, y } = self.position;
        x < -OFF_SCREEN_MARGIN
            || x > width + OFF_SCREEN_MARGIN
            || y < -OFF_SCREEN_MARGIN
            || y > height + OFF_SCREEN_MARGIN
    }

    pub fn hits(&self, enemy: &Enemy) -> bool {
        distance(self.position, enemy.position) <= self.radius + enemy.radius
    }

    /// Not moving and nothing left to steer toward.
    pub fn is_stalled(&self) -> bool {
        self.target.is_none() && self.velocity == Vec2::ZERO
    }
}
