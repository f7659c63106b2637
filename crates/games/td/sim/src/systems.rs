//! Per-frame update, split into the stages run by [`update`].

use crate::config::TdConfig;
use crate::entities::{Enemy, EnemyProgress, Impact};
use crate::events::TdEvent;
use crate::geometry::{distance, Vec2};
use crate::spawner::{QueuedSpawn, SpawnAttempt};
use crate::world::{EnemyId, TdState, World};
use sim_core::FrameDelta;
use slotmap::SlotMap;
use tracing::{debug, info, warn};

/// Advance the match by one frame.
pub fn update(state: &mut TdState, dt: FrameDelta, events: &mut Vec<TdEvent>) {
    if state.game_over {
        return;
    }
    let dt = dt.limit(state.config.max_frame_dt).secs();

    update_spawning(state, dt, events);
    move_enemies(state, dt, events);
    if state.game_over {
        return;
    }
    update_towers(state, dt, events);
    update_projectiles(state, dt, events);
    check_wave_end(state, events);
}

fn spawn_radius(config: &TdConfig, spawn: &QueuedSpawn) -> f32 {
    let radius = config.enemy(spawn.kind).radius;
    if spawn.is_boss() {
        radius + config.boss.radius_bonus
    } else {
        radius
    }
}

fn build_enemy(config: &TdConfig, spawn: &QueuedSpawn, wave: u32, at: Vec2) -> Enemy {
    let spec = config.enemy(spawn.kind);
    if spawn.is_boss() {
        Enemy::new_boss(at, spawn.kind, wave, spec, &config.boss)
    } else {
        Enemy::new(at, spawn.kind, wave, spec)
    }
}

pub fn update_spawning(state: &mut TdState, dt: f32, events: &mut Vec<TdEvent>) {
    if !state.in_wave || state.spawn_remaining == 0 {
        return;
    }

    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return;
    }

    let config = &state.config;
    let spawn_point = state.path.start();
    let attempt = state.scheduler.attempt(
        &state.world.enemies,
        spawn_point,
        config.spawn_spacing,
        |q| spawn_radius(config, q),
    );

    match attempt {
        SpawnAttempt::Spawn(queued) => {
            let enemy = build_enemy(config, &queued, state.wave, spawn_point);
            let boss = enemy.boss;
            let id = state.world.enemies.insert(enemy);
            state.spawn_remaining = state.spawn_remaining.saturating_sub(1);
            state.spawn_timer += state.plan.as_ref().map_or(0.0, |p| p.interval);
            debug!(?id, kind = %queued.kind, boss, remaining = state.spawn_remaining, "enemy spawned");
            events.push(TdEvent::EnemySpawned {
                id,
                kind: queued.kind,
                boss,
            });
        }
        SpawnAttempt::Withheld(reason) => {
            state.spawn_timer = config.spawn_retry_delay;
            events.push(TdEvent::SpawnWithheld { reason });
        }
        SpawnAttempt::Exhausted => {
            warn!(
                remaining = state.spawn_remaining,
                "spawn queues empty before the wave count ran out"
            );
            state.spawn_remaining = 0;
        }
    }
}

pub fn move_enemies(state: &mut TdState, dt: f32, events: &mut Vec<TdEvent>) {
    let arrival = state.config.arrival_threshold;
    let mut escaped: Vec<EnemyId> = Vec::new();

    for (id, enemy) in state.world.enemies.iter_mut() {
        if enemy.advance(&state.path, dt, arrival) == EnemyProgress::Escaped {
            escaped.push(id);
        }
    }

    for id in escaped {
        if state.world.enemies.remove(id).is_none() {
            continue;
        }
        state.lives = state.lives.saturating_sub(1);
        debug!(?id, lives = state.lives, "enemy escaped");
        events.push(TdEvent::EnemyEscaped {
            id,
            lives: state.lives,
        });

        if state.lives == 0 {
            state.game_over = true;
            info!(wave = state.wave, "game over");
            events.push(TdEvent::GameOver { wave: state.wave });
            return;
        }
    }
}

pub fn update_towers(state: &mut TdState, dt: f32, events: &mut Vec<TdEvent>) {
    let projectile_radius = state.config.projectile_radius;
    let World {
        enemies,
        towers,
        projectiles,
    } = &mut state.world;

    for (tower_id, tower) in towers.iter_mut() {
        tower.tick(dt);
        tower.target = tower.find_target(enemies.iter());

        if !tower.can_fire() {
            continue;
        }
        let Some(target_id) = tower.target else {
            continue;
        };
        let Some(target) = enemies.get(target_id) else {
            continue;
        };

        projectiles.insert(tower.fire(target_id, target, projectile_radius));
        events.push(TdEvent::TowerFired {
            tower: tower_id,
            target: target_id,
        });
    }
}

pub fn update_projectiles(state: &mut TdState, dt: f32, events: &mut Vec<TdEvent>) {
    let (width, height) = (state.viewport.width, state.viewport.height);
    let splash_radius = state.config.splash_radius;
    let money = &mut state.money;
    let World {
        enemies,
        projectiles,
        ..
    } = &mut state.world;

    for (_, projectile) in projectiles.iter_mut() {
        if let Some(target) = projectile.target {
            projectile.steer(enemies.get(target).map(|e| e.position));
        }
        projectile.advance(dt);

        if projectile.is_off_screen(width, height) {
            projectile.alive = false;
            continue;
        }

        let hit = enemies
            .iter()
            .find(|(_, enemy)| projectile.hits(enemy))
            .map(|(id, _)| id);

        match hit {
            Some(hit) => {
                projectile.alive = false;
                let impact = projectile.behavior().impact;
                let point = projectile.position;
                match impact {
                    Impact::Single => {
                        damage_enemy(enemies, hit, projectile.damage, money, events);
                    }
                    Impact::Slow => {
                        if let Some(enemy) = enemies.get_mut(hit) {
                            enemy.apply_slow();
                        }
                        damage_enemy(enemies, hit, projectile.damage, money, events);
                    }
                    Impact::Splash => {
                        let victims: Vec<EnemyId> = enemies
                            .iter()
                            .filter(|(id, e)| {
                                *id == hit || distance(e.position, point) <= splash_radius
                            })
                            .map(|(id, _)| id)
                            .collect();
                        for id in victims {
                            damage_enemy(enemies, id, projectile.damage, money, events);
                        }
                    }
                }
            }
            None if projectile.is_stalled() => projectile.alive = false,
            None => {}
        }
    }

    projectiles.retain(|_, p| p.alive);
}

/// Apply damage and, on death, remove the enemy and pay its reward.
fn damage_enemy(
    enemies: &mut SlotMap<EnemyId, Enemy>,
    id: EnemyId,
    damage: i32,
    money: &mut u32,
    events: &mut Vec<TdEvent>,
) {
    let Some(enemy) = enemies.get_mut(id) else {
        return;
    };
    enemy.take_damage(damage);
    if !enemy.is_dead() {
        return;
    }
    if let Some(enemy) = enemies.remove(id) {
        *money += enemy.reward;
        debug!(?id, kind = %enemy.kind, reward = enemy.reward, "enemy killed");
        events.push(TdEvent::EnemyKilled {
            id,
            kind: enemy.kind,
            reward: enemy.reward,
            position: enemy.position,
        });
    }
}

pub fn check_wave_end(state: &mut TdState, events: &mut Vec<TdEvent>) {
    if !state.in_wave || state.spawn_remaining > 0 || !state.world.enemies.is_empty() {
        return;
    }

    let wave = state.wave;
    let bonus = state.config.wave.completion_bonus;
    state.in_wave = false;
    state.plan = None;
    state.scheduler.clear();
    state.spawn_timer = 0.0;
    state.money += bonus;
    state.wave += 1;

    info!(wave, bonus, money = state.money, "wave completed");
    events.push(TdEvent::WaveCompleted { wave, bonus });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyKind, TowerKind};
    use crate::entities::{Projectile, Tower};

    fn state() -> TdState {
        TdState::new(TdConfig::default()).unwrap()
    }

    fn enemy_at(state: &TdState, x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), EnemyKind::Basic, 1, &state.config.enemies.basic)
    }

    fn shot(kind: TowerKind, from: Vec2, toward: Vec2, damage: i32, target: Option<EnemyId>) -> Projectile {
        Projectile::new(from, toward, 200.0, damage, kind, 4.0, target)
    }

    #[test]
    fn splash_hits_neighbours_but_not_distant_enemies() {
        let mut s = state();
        let hit = s.world.enemies.insert(enemy_at(&s, 500.0, 500.0));
        let near = s.world.enemies.insert(enemy_at(&s, 520.0, 500.0));
        let far = s.world.enemies.insert(enemy_at(&s, 600.0, 500.0));
        s.world.projectiles.insert(shot(
            TowerKind::Cannon,
            Vec2::new(490.0, 500.0),
            Vec2::new(500.0, 500.0),
            50,
            Some(hit),
        ));

        let mut events = Vec::new();
        update_projectiles(&mut s, 0.01, &mut events);

        assert!(!s.world.enemies.contains_key(hit));
        assert!(!s.world.enemies.contains_key(near));
        assert!(s.world.enemies.contains_key(far));
        assert!(s.world.projectiles.is_empty());
        assert_eq!(s.money, 104);
        let kills = events
            .iter()
            .filter(|e| matches!(e, TdEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 2);
    }

    #[test]
    fn slow_projectile_adds_a_stack() {
        let mut s = state();
        let id = s.world.enemies.insert(enemy_at(&s, 500.0, 500.0));
        s.world.projectiles.insert(shot(
            TowerKind::Slow,
            Vec2::new(490.0, 500.0),
            Vec2::new(500.0, 500.0),
            20,
            Some(id),
        ));

        update_projectiles(&mut s, 0.01, &mut Vec::new());

        let enemy = &s.world.enemies[id];
        assert_eq!(enemy.slow_stacks(), 1);
        assert_eq!(enemy.hp, 35 - 20);
    }

    #[test]
    fn homing_projectile_keeps_heading_after_target_dies() {
        let mut s = state();
        let id = s.world.enemies.insert(enemy_at(&s, 300.0, 400.0));
        let pid = s.world.projectiles.insert(shot(
            TowerKind::Basic,
            Vec2::new(300.0, 300.0),
            Vec2::new(300.0, 400.0),
            20,
            Some(id),
        ));
        s.world.enemies.remove(id);

        update_projectiles(&mut s, 0.05, &mut Vec::new());

        let p = &s.world.projectiles[pid];
        assert!(p.target.is_none());
        assert_eq!(p.velocity, Vec2::new(0.0, 200.0));
        assert_eq!(p.position, Vec2::new(300.0, 310.0));
    }

    #[test]
    fn off_screen_projectiles_are_culled() {
        let mut s = state();
        s.world.projectiles.insert(shot(
            TowerKind::Sniper,
            Vec2::new(915.0, 100.0),
            Vec2::new(1000.0, 100.0),
            70,
            None,
        ));
        update_projectiles(&mut s, 0.05, &mut Vec::new());
        assert!(s.world.projectiles.is_empty());
    }

    #[test]
    fn tower_fires_at_nearest_and_waits_for_cooldown() {
        let mut s = state();
        let tower = Tower::new(Vec2::new(300.0, 300.0), TowerKind::Basic, &s.config.towers.basic, 5);
        let tid = s.world.towers.insert(tower);
        let _far = s.world.enemies.insert(enemy_at(&s, 300.0, 420.0));
        let near = s.world.enemies.insert(enemy_at(&s, 300.0, 350.0));

        let mut events = Vec::new();
        update_towers(&mut s, 0.016, &mut events);
        assert_eq!(
            events,
            vec![TdEvent::TowerFired {
                tower: tid,
                target: near
            }]
        );
        assert_eq!(s.world.projectiles.len(), 1);

        events.clear();
        update_towers(&mut s, 0.016, &mut events);
        assert!(events.is_empty());
        assert_eq!(s.world.towers[tid].target, Some(near));
    }

    #[test]
    fn wave_end_pays_bonus_once() {
        let mut s = state();
        s.in_wave = true;
        let mut events = Vec::new();
        check_wave_end(&mut s, &mut events);
        check_wave_end(&mut s, &mut events);

        assert_eq!(s.money, 104);
        assert_eq!(s.wave, 2);
        assert!(!s.in_wave);
        assert_eq!(events, vec![TdEvent::WaveCompleted { wave: 1, bonus: 4 }]);
    }

    #[test]
    fn game_over_freezes_the_board() {
        let mut s = state();
        s.game_over = true;
        s.in_wave = true;
        s.spawn_remaining = 3;
        let id = s.world.enemies.insert(enemy_at(&s, 40.0, 100.0));

        let mut events = Vec::new();
        update(&mut s, FrameDelta::from_secs(0.05), &mut events);

        assert!(events.is_empty());
        assert_eq!(s.world.enemies[id].position, Vec2::new(40.0, 100.0));
        assert_eq!(s.spawn_remaining, 3);
    }
}
