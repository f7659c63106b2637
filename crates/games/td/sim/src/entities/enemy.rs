use crate::config::{BossSpec, EnemyKind, EnemySpec};
use crate::geometry::{distance, normalize, Path, Vec2};

pub const MAX_SLOW_STACKS: u8 = 5;
const SLOW_PER_STACK: f32 = 0.1;
const MIN_SPEED_FACTOR: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyProgress {
    Walking,
    /// Passed the final waypoint.
    Escaped,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec2,
    /// Index of the waypoint currently walked toward.
    pub waypoint: usize,
    pub hp: i32,
    pub max_hp: i32,
    pub base_speed: f32,
    pub reward: u32,
    pub radius: f32,
    pub boss: bool,
    slow_stacks: u8,
}

impl Enemy {
    /// Build an enemy at `start` with stats scaled for `wave`.
    pub fn new(start: Vec2, kind: EnemyKind, wave: u32, spec: &EnemySpec) -> Self {
        let max_hp = spec.base_hp + wave as i32 * spec.hp_growth;
        let base_speed = spec.base_speed + wave as f32 * spec.speed_growth;
        // Rewards grow every other wave only.
        let reward = (spec.base_reward + (wave / 2) as f32 * spec.reward_growth)
            .floor()
            .max(1.0) as u32;

        Self {
            kind,
            position: start,
            waypoint: 1,
            hp: max_hp,
            max_hp,
            base_speed,
            reward,
            radius: spec.radius,
            boss: false,
            slow_stacks: 0,
        }
    }

    pub fn new_boss(
        start: Vec2,
        kind: EnemyKind,
        wave: u32,
        spec: &EnemySpec,
        boss: &BossSpec,
    ) -> Self {
        let mut enemy = Self::new(start, kind, wave, spec);
        enemy.max_hp = ((enemy.max_hp as f32) * boss.hp_multiplier).round().max(1.0) as i32;
        enemy.hp = enemy.max_hp;
        enemy.reward = ((enemy.reward as f32) * boss.reward_multiplier)
            .floor()
            .max(1.0) as u32;
        enemy.radius += boss.radius_bonus;
        enemy.boss = true;
        enemy
    }

    /// Subtract `amount` from hp. Death is checked separately.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    pub fn apply_slow(&mut self) {
        self.slow_stacks = (self.slow_stacks + 1).min(MAX_SLOW_STACKS);
    }

    pub fn slow_stacks(&self) -> u8 {
        self.slow_stacks
    }

    /// Base speed reduced 10% per slow stack, never below 5% of base.
    pub fn effective_speed(&self) -> f32 {
        let factor = (1.0 - SLOW_PER_STACK * self.slow_stacks as f32).max(MIN_SPEED_FACTOR);
        self.base_speed * factor
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Raw `hp / max_hp`; callers clamp for display.
    pub fn health_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp as f32
    }

    /// Walk toward the current waypoint for `dt` seconds.
    pub fn advance(&mut self, path: &Path, dt: f32, arrival_threshold: f32) -> EnemyProgress {
        let Some(target) = path.waypoint(self.waypoint) else {
            return EnemyProgress::Escaped;
        };

        let step = self.effective_speed() * dt;
        if step >= distance(self.position, target) {
            self.position = target;
        } else {
            let dir = normalize(target.x - self.position.x, target.y - self.position.y);
            self.position += dir * step;
        }

        if distance(self.position, target) < arrival_threshold {
            self.waypoint += 1;
            if self.waypoint >= path.len() {
                return EnemyProgress::Escaped;
            }
        }

        EnemyProgress::Walking
    }
}
