use crate::geometry::Vec2;
use crate::world::{EnemyId, TdState, TowerId, WavePhase};
use sim_core::Tick;
use slotmap::{Key, KeyData};
use td_types::{EnemyInfo, Position, ProjectileInfo, TdObservation, TowerInfo, WaveStatus};

pub fn tower_id_to_string(id: TowerId) -> String {
    id.data().as_ffi().to_string()
}

pub fn string_to_tower_id(s: &str) -> Option<TowerId> {
    let ffi: u64 = s.parse().ok()?;
    Some(TowerId::from(KeyData::from_ffi(ffi)))
}

pub fn enemy_id_to_string(id: EnemyId) -> String {
    id.data().as_ffi().to_string()
}

fn position(p: Vec2) -> Position {
    Position { x: p.x, y: p.y }
}

pub fn wave_status(state: &TdState) -> WaveStatus {
    match state.phase() {
        WavePhase::Idle => WaveStatus::Idle {
            next_wave: state.wave,
        },
        WavePhase::Spawning => WaveStatus::Spawning {
            wave: state.wave,
            remaining: state.spawn_remaining,
            next_spawn_in: state.spawn_timer.max(0.0),
            bosses_queued: state.scheduler.bosses_queued() as u32,
        },
        WavePhase::Draining => WaveStatus::Draining {
            wave: state.wave,
            alive: state.enemy_count() as u32,
        },
    }
}

pub fn build_observation(state: &TdState, tick: Tick) -> TdObservation {
    let world = &state.world;

    TdObservation {
        tick,

        viewport_width: state.viewport.width,
        viewport_height: state.viewport.height,
        path: state.path.points().iter().copied().map(position).collect(),

        money: state.money,
        lives: state.lives,
        wave: state.wave,
        in_wave: state.in_wave,
        game_over: state.game_over,
        enemy_count: state.enemy_count() as u32,
        wave_status: wave_status(state),

        selected_tower_type: state.selected_kind.map(|k| k.as_str().to_string()),

        towers: world
            .towers
            .iter()
            .map(|(id, t)| TowerInfo {
                id: tower_id_to_string(id),
                x: t.position.x,
                y: t.position.y,
                tower_type: t.kind.as_str().to_string(),
                level: t.level,
                damage: t.damage,
                range: t.range,
                angle: t.angle,
                upgrade_cost: t.upgrade_cost(),
                sell_value: t.sell_value(),
            })
            .collect(),
        enemies: world
            .enemies
            .iter()
            .map(|(id, e)| EnemyInfo {
                id: enemy_id_to_string(id),
                x: e.position.x,
                y: e.position.y,
                enemy_type: e.kind.as_str().to_string(),
                hp: e.hp,
                max_hp: e.max_hp,
                health: e.health_fraction().clamp(0.0, 1.0),
                radius: e.radius,
                slow_stacks: e.slow_stacks(),
                boss: e.boss,
            })
            .collect(),
        projectiles: world
            .projectiles
            .values()
            .map(|p| ProjectileInfo {
                x: p.position.x,
                y: p.position.y,
                radius: p.radius,
                source_type: p.source.as_str().to_string(),
            })
            .collect(),
    }
}
