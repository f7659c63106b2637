//! Player commands and their handlers.
//!
//! Every handler either applies its change in full or returns an
//! [`ActionError`] and leaves the state untouched.

use crate::config::{TowerKind, Viewport};
use crate::entities::Tower;
use crate::errors::ActionError;
use crate::events::TdEvent;
use crate::geometry::Vec2;
use crate::spawner::SpawnScheduler;
use crate::wave::{plan_for_wave, WavePlan};
use crate::world::{TdState, TowerId};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub enum TdAction {
    PlaceTower { x: f32, y: f32, kind: TowerKind },
    UpgradeTower { tower: TowerId },
    SellTower { tower: TowerId },
    StartNextWave,
    Reset,
    /// Arm a kind for placement preview, or clear it with `None`.
    SelectTowerKind { kind: Option<TowerKind> },
    ResizeViewport { width: f32, height: f32 },
}

pub fn apply(
    state: &mut TdState,
    action: &TdAction,
    events: &mut Vec<TdEvent>,
) -> Result<(), ActionError> {
    match *action {
        TdAction::PlaceTower { x, y, kind } => {
            place_tower(state, Vec2::new(x, y), kind, events).map(|_| ())
        }
        TdAction::UpgradeTower { tower } => upgrade_tower(state, tower, events).map(|_| ()),
        TdAction::SellTower { tower } => sell_tower(state, tower, events).map(|_| ()),
        TdAction::StartNextWave => start_next_wave(state, events),
        TdAction::Reset => {
            reset(state, events);
            Ok(())
        }
        TdAction::SelectTowerKind { kind } => {
            select_tower_kind(state, kind);
            Ok(())
        }
        TdAction::ResizeViewport { width, height } => resize_viewport(state, width, height),
    }
}

fn ensure_running(state: &TdState) -> Result<(), ActionError> {
    if state.game_over {
        Err(ActionError::GameOver)
    } else {
        Ok(())
    }
}

pub fn place_tower(
    state: &mut TdState,
    position: Vec2,
    kind: TowerKind,
    events: &mut Vec<TdEvent>,
) -> Result<TowerId, ActionError> {
    ensure_running(state)?;
    state.check_placement(position)?;

    let spec = state.config.tower(kind);
    if state.money < spec.cost {
        return Err(ActionError::InsufficientFunds {
            needed: spec.cost,
            have: state.money,
        });
    }

    let cost = spec.cost;
    let tower = Tower::new(position, kind, spec, state.config.max_upgrade_level);
    state.money -= cost;
    let id = state.world.towers.insert(tower);

    debug!(?id, %kind, x = position.x, y = position.y, cost, "tower placed");
    events.push(TdEvent::TowerPlaced {
        id,
        kind,
        position,
        cost,
    });
    Ok(id)
}

/// Returns the amount paid.
pub fn upgrade_tower(
    state: &mut TdState,
    id: TowerId,
    events: &mut Vec<TdEvent>,
) -> Result<u32, ActionError> {
    ensure_running(state)?;
    let tower = state
        .world
        .towers
        .get_mut(id)
        .ok_or(ActionError::UnknownTower)?;
    let cost = tower.upgrade_cost().ok_or(ActionError::MaxLevel)?;
    if state.money < cost {
        return Err(ActionError::InsufficientFunds {
            needed: cost,
            have: state.money,
        });
    }

    let paid = tower.upgrade().ok_or(ActionError::MaxLevel)?;
    state.money -= paid;

    debug!(?id, level = tower.level, paid, "tower upgraded");
    events.push(TdEvent::TowerUpgraded {
        id,
        level: tower.level,
        cost: paid,
    });
    Ok(paid)
}

/// Returns the refund.
pub fn sell_tower(
    state: &mut TdState,
    id: TowerId,
    events: &mut Vec<TdEvent>,
) -> Result<u32, ActionError> {
    ensure_running(state)?;
    let tower = state
        .world
        .towers
        .remove(id)
        .ok_or(ActionError::UnknownTower)?;
    let refund = tower.sell_value();
    state.money += refund;

    debug!(?id, refund, "tower sold");
    events.push(TdEvent::TowerSold { id, refund });
    Ok(refund)
}

/// Start the wave numbered `state.wave` with its standard composition.
pub fn start_next_wave(state: &mut TdState, events: &mut Vec<TdEvent>) -> Result<(), ActionError> {
    let plan = plan_for_wave(state.wave, &state.config.wave);
    start_wave_with_plan(state, plan, events)
}

/// Start the current wave with an explicit composition.
pub fn start_wave_with_plan(
    state: &mut TdState,
    plan: WavePlan,
    events: &mut Vec<TdEvent>,
) -> Result<(), ActionError> {
    ensure_running(state)?;
    if state.in_wave {
        return Err(ActionError::WaveInProgress);
    }

    let scheduler = SpawnScheduler::from_plan(&plan);
    let enemies = scheduler.len() as u32;
    let bosses = scheduler.bosses_queued() as u32;

    state.scheduler = scheduler;
    state.spawn_remaining = enemies;
    state.spawn_timer = 0.0;
    state.plan = Some(plan);
    state.in_wave = true;

    info!(wave = state.wave, enemies, bosses, "wave started");
    events.push(TdEvent::WaveStarted {
        wave: state.wave,
        enemies,
        bosses,
    });
    Ok(())
}

pub fn reset(state: &mut TdState, events: &mut Vec<TdEvent>) {
    state.reset();
    info!(money = state.money, lives = state.lives, "match reset");
    events.push(TdEvent::MatchReset);
}

pub fn select_tower_kind(state: &mut TdState, kind: Option<TowerKind>) {
    state.selected_kind = kind;
}

pub fn resize_viewport(state: &mut TdState, width: f32, height: f32) -> Result<(), ActionError> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ActionError::InvalidViewport);
    }
    state.viewport = Viewport { width, height };
    Ok(())
}
