//! Wave composition.
//!
//! A [`WavePlan`] is pure data derived from the wave number. The spawn
//! scheduler turns it into queues at wave start.

use crate::config::{EnemyKind, WaveTuning};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOrder {
    /// Every entry in full before the next one.
    Sequential,
    /// One of each entry in turn until all are drained.
    Interleaved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveEntry {
    pub kind: EnemyKind,
    pub count: u32,
    pub boss: bool,
}

impl WaveEntry {
    pub const fn new(kind: EnemyKind, count: u32) -> Self {
        Self {
            kind,
            count,
            boss: false,
        }
    }

    pub const fn boss(kind: EnemyKind, count: u32) -> Self {
        Self {
            kind,
            count,
            boss: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WavePlan {
    /// Seconds between successful spawns.
    pub interval: f32,
    pub order: SpawnOrder,
    pub entries: Vec<WaveEntry>,
}

impl WavePlan {
    /// A plan of `count` enemies of one kind.
    pub fn single(kind: EnemyKind, count: u32, interval: f32) -> Self {
        Self {
            interval,
            order: SpawnOrder::Sequential,
            entries: vec![WaveEntry::new(kind, count)],
        }
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn boss_count(&self) -> u32 {
        self.entries.iter().filter(|e| e.boss).map(|e| e.count).sum()
    }
}

/// Deterministic composition for `wave` (1-based).
pub fn plan_for_wave(wave: u32, tuning: &WaveTuning) -> WavePlan {
    let count = tuning.base_count + wave * tuning.count_growth;
    let interval = (tuning.interval_start - wave as f32 * tuning.interval_decay)
        .max(tuning.interval_min)
        .min(tuning.interval_start);

    let (order, mut entries) = if wave <= 2 {
        (SpawnOrder::Sequential, vec![WaveEntry::new(EnemyKind::Basic, count)])
    } else if wave <= 4 {
        let fast = count / 2;
        (
            SpawnOrder::Interleaved,
            vec![
                WaveEntry::new(EnemyKind::Basic, count - fast),
                WaveEntry::new(EnemyKind::Fast, fast),
            ],
        )
    } else {
        let third = count / 3;
        let rem = count % 3;
        (
            SpawnOrder::Interleaved,
            vec![
                WaveEntry::new(EnemyKind::Fast, third + u32::from(rem > 0)),
                WaveEntry::new(EnemyKind::Tank, third + u32::from(rem > 1)),
                WaveEntry::new(EnemyKind::Flyer, third),
            ],
        )
    };

    if tuning.boss_every > 0 && wave > 0 && wave % tuning.boss_every == 0 {
        entries.push(WaveEntry::boss(EnemyKind::Tank, wave / tuning.boss_every));
    }

    entries.retain(|e| e.count > 0);

    WavePlan {
        interval,
        order,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> WaveTuning {
        WaveTuning::default()
    }

    #[test]
    fn early_waves_are_basic_only() {
        let plan = plan_for_wave(1, &tuning());
        assert_eq!(plan.order, SpawnOrder::Sequential);
        assert_eq!(plan.entries, vec![WaveEntry::new(EnemyKind::Basic, 9)]);
        assert!((plan.interval - 0.73).abs() < 1e-6);
    }

    #[test]
    fn mid_waves_mix_basic_and_fast() {
        let plan = plan_for_wave(3, &tuning());
        assert_eq!(plan.order, SpawnOrder::Interleaved);
        assert_eq!(plan.total(), 11);
        assert_eq!(
            plan.entries,
            vec![
                WaveEntry::new(EnemyKind::Basic, 6),
                WaveEntry::new(EnemyKind::Fast, 5)
            ]
        );
    }

    #[test]
    fn fifth_wave_has_a_boss() {
        let plan = plan_for_wave(5, &tuning());
        assert_eq!(plan.boss_count(), 1);
        // 13 regulars split into thirds, plus the boss
        assert_eq!(plan.total(), 14);
        assert_eq!(plan.entries[0], WaveEntry::new(EnemyKind::Fast, 5));
        assert_eq!(plan.entries[1], WaveEntry::new(EnemyKind::Tank, 4));
        assert_eq!(plan.entries[2], WaveEntry::new(EnemyKind::Flyer, 4));
        assert_eq!(plan.entries[3], WaveEntry::boss(EnemyKind::Tank, 1));

        assert_eq!(plan_for_wave(10, &tuning()).boss_count(), 2);
        assert_eq!(plan_for_wave(6, &tuning()).boss_count(), 0);
    }

    #[test]
    fn interval_is_clamped() {
        for wave in 0..100 {
            let plan = plan_for_wave(wave, &tuning());
            assert!(plan.interval >= 0.45 && plan.interval <= 0.75);
        }
        assert_eq!(plan_for_wave(50, &tuning()).interval, 0.45);
    }

    #[test]
    fn same_wave_same_plan() {
        assert_eq!(plan_for_wave(7, &tuning()), plan_for_wave(7, &tuning()));
    }

    #[test]
    fn bosses_can_be_disabled() {
        let mut t = tuning();
        t.boss_every = 0;
        assert_eq!(plan_for_wave(5, &t).boss_count(), 0);
    }
}
