use crate::config::EnemyKind;
use crate::entities::Enemy;
use crate::geometry::{distance, Vec2};
use crate::wave::{SpawnOrder, WavePlan};
use crate::world::EnemyId;
use slotmap::SlotMap;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueOrigin {
    Primary,
    Boss,
}

/// One pending spawn, tagged with the queue it was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedSpawn {
    pub kind: EnemyKind,
    pub origin: QueueOrigin,
}

impl QueuedSpawn {
    pub fn is_boss(&self) -> bool {
        self.origin == QueueOrigin::Boss
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithholdReason {
    /// Bosses wait for an empty board.
    BossGate,
    /// Another enemy is still standing on the spawn point.
    Spacing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnAttempt {
    Spawn(QueuedSpawn),
    Withheld(WithholdReason),
    Exhausted,
}

#[derive(Clone, Debug, Default)]
pub struct SpawnScheduler {
    primary: VecDeque<QueuedSpawn>,
    bosses: VecDeque<QueuedSpawn>,
}

impl SpawnScheduler {
    pub fn from_plan(plan: &WavePlan) -> Self {
        let mut primary = VecDeque::new();
        let mut bosses = VecDeque::new();

        let regular: Vec<_> = plan.entries.iter().filter(|e| !e.boss).collect();
        match plan.order {
            SpawnOrder::Sequential => {
                for entry in &regular {
                    for _ in 0..entry.count {
                        primary.push_back(QueuedSpawn {
                            kind: entry.kind,
                            origin: QueueOrigin::Primary,
                        });
                    }
                }
            }
            SpawnOrder::Interleaved => {
                let rounds = regular.iter().map(|e| e.count).max().unwrap_or(0);
                for round in 0..rounds {
                    for entry in regular.iter().filter(|e| e.count > round) {
                        primary.push_back(QueuedSpawn {
                            kind: entry.kind,
                            origin: QueueOrigin::Primary,
                        });
                    }
                }
            }
        }

        for entry in plan.entries.iter().filter(|e| e.boss) {
            for _ in 0..entry.count {
                bosses.push_back(QueuedSpawn {
                    kind: entry.kind,
                    origin: QueueOrigin::Boss,
                });
            }
        }

        Self { primary, bosses }
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.bosses.clear();
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.bosses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.bosses.is_empty()
    }

    pub fn bosses_queued(&self) -> usize {
        self.bosses.len()
    }

    /// Order in which the remaining entries would be released.
    pub fn pending(&self) -> impl Iterator<Item = &QueuedSpawn> {
        self.primary.iter().chain(self.bosses.iter())
    }

    /// Pop the next spawn if the board allows it.
    ///
    /// `radius_of` gives the collision radius the candidate would spawn
    /// with. A spawn refused for spacing goes back to the front of the queue
    /// it came from.
    pub fn attempt<F>(
        &mut self,
        enemies: &SlotMap<EnemyId, Enemy>,
        spawn_point: Vec2,
        spacing: f32,
        radius_of: F,
    ) -> SpawnAttempt
    where
        F: Fn(&QueuedSpawn) -> f32,
    {
        let next = if let Some(next) = self.primary.pop_front() {
            next
        } else if self.bosses.is_empty() {
            return SpawnAttempt::Exhausted;
        } else if !enemies.is_empty() {
            return SpawnAttempt::Withheld(WithholdReason::BossGate);
        } else {
            match self.bosses.pop_front() {
                Some(next) => next,
                None => return SpawnAttempt::Exhausted,
            }
        };

        let nearest = enemies
            .values()
            .map(|e| (distance(e.position, spawn_point), e.radius))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((d, near_radius)) = nearest {
            if d < near_radius + radius_of(&next) + spacing {
                self.requeue(next);
                return SpawnAttempt::Withheld(WithholdReason::Spacing);
            }
        }

        SpawnAttempt::Spawn(next)
    }

    fn requeue(&mut self, spawn: QueuedSpawn) {
        match spawn.origin {
            QueueOrigin::Primary => self.primary.push_front(spawn),
            QueueOrigin::Boss => self.bosses.push_front(spawn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyTable;
    use crate::wave::WaveEntry;

    fn radius(_: &QueuedSpawn) -> f32 {
        12.0
    }

    fn enemy_at(p: Vec2) -> Enemy {
        Enemy::new(p, EnemyKind::Basic, 1, &EnemyTable::default().basic)
    }

    fn kinds(s: &SpawnScheduler) -> Vec<EnemyKind> {
        s.pending().map(|q| q.kind).collect()
    }

    #[test]
    fn sequential_concatenates() {
        let plan = WavePlan {
            interval: 0.5,
            order: SpawnOrder::Sequential,
            entries: vec![
                WaveEntry::new(EnemyKind::Basic, 2),
                WaveEntry::new(EnemyKind::Fast, 1),
            ],
        };
        let s = SpawnScheduler::from_plan(&plan);
        assert_eq!(kinds(&s), vec![EnemyKind::Basic, EnemyKind::Basic, EnemyKind::Fast]);
    }

    #[test]
    fn interleaved_round_robins() {
        let plan = WavePlan {
            interval: 0.5,
            order: SpawnOrder::Interleaved,
            entries: vec![
                WaveEntry::new(EnemyKind::Basic, 3),
                WaveEntry::new(EnemyKind::Fast, 1),
                WaveEntry::boss(EnemyKind::Tank, 1),
            ],
        };
        let s = SpawnScheduler::from_plan(&plan);
        assert_eq!(
            kinds(&s),
            vec![
                EnemyKind::Basic,
                EnemyKind::Fast,
                EnemyKind::Basic,
                EnemyKind::Basic,
                EnemyKind::Tank
            ]
        );
        assert_eq!(s.bosses_queued(), 1);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn boss_waits_for_empty_board() {
        let plan = WavePlan {
            interval: 0.5,
            order: SpawnOrder::Sequential,
            entries: vec![WaveEntry::boss(EnemyKind::Tank, 1)],
        };
        let mut s = SpawnScheduler::from_plan(&plan);
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        let far = enemies.insert(enemy_at(Vec2::new(500.0, 500.0)));

        assert_eq!(
            s.attempt(&enemies, Vec2::ZERO, 24.0, radius),
            SpawnAttempt::Withheld(WithholdReason::BossGate)
        );
        assert_eq!(s.bosses_queued(), 1);

        enemies.remove(far);
        match s.attempt(&enemies, Vec2::ZERO, 24.0, radius) {
            SpawnAttempt::Spawn(q) => assert!(q.is_boss()),
            other => panic!("expected boss spawn, got {other:?}"),
        }
        assert_eq!(s.attempt(&enemies, Vec2::ZERO, 24.0, radius), SpawnAttempt::Exhausted);
    }

    #[test]
    fn spacing_requeues_to_origin_front() {
        let plan = WavePlan {
            interval: 0.5,
            order: SpawnOrder::Sequential,
            entries: vec![
                WaveEntry::new(EnemyKind::Fast, 1),
                WaveEntry::new(EnemyKind::Basic, 1),
            ],
        };
        let mut s = SpawnScheduler::from_plan(&plan);
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        // 12 + 12 + 24 = 48 needed, only 30 available
        let blocker = enemies.insert(enemy_at(Vec2::new(30.0, 0.0)));

        assert_eq!(
            s.attempt(&enemies, Vec2::ZERO, 24.0, radius),
            SpawnAttempt::Withheld(WithholdReason::Spacing)
        );
        assert_eq!(kinds(&s), vec![EnemyKind::Fast, EnemyKind::Basic]);

        enemies[blocker].position = Vec2::new(48.0, 0.0);
        assert_eq!(
            s.attempt(&enemies, Vec2::ZERO, 24.0, radius),
            SpawnAttempt::Spawn(QueuedSpawn {
                kind: EnemyKind::Fast,
                origin: QueueOrigin::Primary
            })
        );
    }

    #[test]
    fn boss_retry_stays_in_boss_queue() {
        let plan = WavePlan {
            interval: 0.5,
            order: SpawnOrder::Sequential,
            entries: vec![WaveEntry::boss(EnemyKind::Tank, 2)],
        };
        let mut s = SpawnScheduler::from_plan(&plan);
        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();

        assert!(matches!(
            s.attempt(&enemies, Vec2::ZERO, 24.0, radius),
            SpawnAttempt::Spawn(_)
        ));
        enemies.insert(enemy_at(Vec2::ZERO));
        // board not empty: gated before spacing is even considered
        assert_eq!(
            s.attempt(&enemies, Vec2::ZERO, 24.0, radius),
            SpawnAttempt::Withheld(WithholdReason::BossGate)
        );
        assert_eq!(s.bosses_queued(), 1);
    }
}
