use crate::config::{TowerKind, TowerSpec};
use crate::entities::enemy::Enemy;
use crate::entities::projectile::Projectile;
use crate::geometry::{distance, Vec2};
use crate::world::EnemyId;

const UPGRADE_COST_FACTOR: f32 = 0.6;
const MIN_UPGRADE_COST: u32 = 5;
const UPGRADE_DAMAGE_FACTOR: f32 = 1.2;
const UPGRADE_RANGE_FACTOR: f32 = 1.12;
const UPGRADE_INTERVAL_FACTOR: f32 = 0.92;
const MIN_FIRE_INTERVAL: f32 = 0.05;
const SELL_FACTOR: f32 = 0.75;

#[derive(Clone, Debug)]
pub struct Tower {
    pub kind: TowerKind,
    pub position: Vec2,
    /// Seconds until the next shot; ready at or below zero.
    pub cooldown: f32,
    pub fire_interval: f32,
    pub damage: i32,
    pub range: f32,
    pub projectile_speed: f32,
    pub base_cost: u32,
    pub upgrade_spend: u32,
    pub level: u8,
    pub max_level: u8,
    /// Barrel heading in radians.
    pub angle: f32,
    /// Target picked on the most recent tick.
    pub target: Option<EnemyId>,
}

impl Tower {
    pub fn new(position: Vec2, kind: TowerKind, spec: &TowerSpec, max_level: u8) -> Self {
        Self {
            kind,
            position,
            cooldown: 0.0,
            fire_interval: spec.fire_interval(),
            damage: spec.damage,
            range: spec.range,
            projectile_speed: spec.projectile_speed,
            base_cost: spec.cost,
            upgrade_spend: 0,
            level: 0,
            max_level,
            angle: 0.0,
            target: None,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Nearest enemy within range. Ties keep the first one seen.
    pub fn find_target<'a, I>(&self, enemies: I) -> Option<EnemyId>
    where
        I: IntoIterator<Item = (EnemyId, &'a Enemy)>,
    {
        let mut best: Option<(EnemyId, f32)> = None;
        for (id, enemy) in enemies {
            let d = distance(self.position, enemy.position);
            if d > self.range {
                continue;
            }
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Shoot at `target`, restarting the cooldown.
    pub fn fire(&mut self, target_id: EnemyId, target: &Enemy, projectile_radius: f32) -> Projectile {
        self.cooldown = self.fire_interval;
        self.angle = (target.position - self.position).angle();
        Projectile::fired_by(self, target_id, target.position, projectile_radius)
    }

    /// Price of the next level, or `None` at the level cap.
    pub fn upgrade_cost(&self) -> Option<u32> {
        if self.level >= self.max_level {
            return None;
        }
        let raw = (self.base_cost as f32 * UPGRADE_COST_FACTOR * (self.level as f32 + 1.0)).round();
        Some((raw as u32).max(MIN_UPGRADE_COST))
    }

    /// Apply one level. Returns the amount charged, or `None` without
    /// touching the tower when already at the cap.
    pub fn upgrade(&mut self) -> Option<u32> {
        let cost = self.upgrade_cost()?;
        self.level += 1;
        self.upgrade_spend += cost;
        self.damage = (self.damage as f32 * UPGRADE_DAMAGE_FACTOR).round() as i32;
        self.range = (self.range * UPGRADE_RANGE_FACTOR).round();
        self.fire_interval = (self.fire_interval * UPGRADE_INTERVAL_FACTOR).max(MIN_FIRE_INTERVAL);
        Some(cost)
    }

    pub fn total_spend(&self) -> u32 {
        self.base_cost + self.upgrade_spend
    }

    pub fn sell_value(&self) -> u32 {
        (self.total_spend() as f32 * SELL_FACTOR).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyKind, EnemyTable, TowerTable};
    use slotmap::SlotMap;

    fn basic_tower() -> Tower {
        Tower::new(Vec2::new(100.0, 100.0), TowerKind::Basic, &TowerTable::default().basic, 5)
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), EnemyKind::Basic, 1, &EnemyTable::default().basic)
    }

    #[test]
    fn picks_nearest_in_range() {
        let tower = basic_tower();
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        let _far = enemies.insert(enemy_at(100.0, 230.0));
        let near = enemies.insert(enemy_at(150.0, 100.0));
        let _out = enemies.insert(enemy_at(400.0, 400.0));

        assert_eq!(tower.find_target(enemies.iter()), Some(near));
    }

    #[test]
    fn nothing_in_range() {
        let tower = basic_tower();
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        enemies.insert(enemy_at(100.0, 241.0));
        assert_eq!(tower.find_target(enemies.iter()), None);
    }

    #[test]
    fn tie_keeps_first_seen() {
        let tower = basic_tower();
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        let first = enemies.insert(enemy_at(150.0, 100.0));
        let _second = enemies.insert(enemy_at(50.0, 100.0));
        assert_eq!(tower.find_target(enemies.iter()), Some(first));
    }

    #[test]
    fn cooldown_after_fire_equals_interval() {
        let mut tower = basic_tower();
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        let id = enemies.insert(enemy_at(100.0, 150.0));

        assert!(tower.can_fire());
        let projectile = tower.fire(id, &enemies[id], 4.0);
        assert_eq!(tower.cooldown, tower.fire_interval);
        assert!(!tower.can_fire());
        assert_eq!(projectile.damage, tower.damage);
        assert!((tower.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        // not ready again until a full interval has elapsed
        let mut elapsed = 0.0;
        while !tower.can_fire() {
            tower.tick(0.01);
            elapsed += 0.01;
        }
        assert!(elapsed + 1e-4 >= tower.fire_interval);
    }

    #[test]
    fn upgrade_costs_rise_until_cap() {
        let mut tower = basic_tower();
        let mut last = 0;
        let mut spent = 0;
        for level in 0..5u8 {
            assert_eq!(tower.level, level);
            let cost = tower.upgrade_cost().unwrap();
            assert!(cost > last);
            last = cost;
            spent += tower.upgrade().unwrap();
        }
        // 30 * 0.6 * (1..=5) = 18, 36, 54, 72, 90
        assert_eq!(spent, 270);
        assert_eq!(tower.upgrade_spend, 270);
        assert_eq!(tower.upgrade_cost(), None);
        assert!(tower.sell_value() <= tower.total_spend());
        assert_eq!(tower.sell_value(), 225);
    }

    #[test]
    fn upgrade_at_cap_changes_nothing() {
        let mut tower = basic_tower();
        while tower.upgrade().is_some() {}
        let before = (tower.level, tower.damage, tower.range, tower.fire_interval, tower.upgrade_spend);
        assert_eq!(tower.upgrade(), None);
        let after = (tower.level, tower.damage, tower.range, tower.fire_interval, tower.upgrade_spend);
        assert_eq!(before, after);
    }

    #[test]
    fn upgrade_scales_stats() {
        let mut tower = basic_tower();
        tower.upgrade();
        assert_eq!(tower.damage, 24);
        assert_eq!(tower.range, 157.0);
        assert!((tower.fire_interval - (1.0 / 1.2) * 0.92).abs() < 1e-6);
    }

    #[test]
    fn cheap_towers_have_minimum_upgrade_cost() {
        let mut spec = TowerTable::default().basic;
        spec.cost = 4;
        let tower = Tower::new(Vec2::ZERO, TowerKind::Basic, &spec, 5);
        assert_eq!(tower.upgrade_cost(), Some(5));
    }

    #[test]
    fn fire_interval_has_floor() {
        let mut spec = TowerTable::default().basic;
        spec.fire_rate = 19.0;
        let mut tower = Tower::new(Vec2::ZERO, TowerKind::Basic, &spec, 50);
        for _ in 0..50 {
            tower.upgrade();
        }
        assert_eq!(tower.fire_interval, 0.05);
    }
}
