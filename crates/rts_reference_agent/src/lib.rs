//! A state-machine planner agent (§12 of the expanded spec): exercises every
//! SDK operation as an integration test rather than serving as a competitive
//! bot. Ground: `tools/rts_runner` for the "reference client drives the SDK
//! end to end" shape, and `other_examples/gd2bk1ng-astra_agi/planner.rs` for
//! the goal/plan vocabulary — adapted down to a simple per-unit task
//! assignment loop instead of HTN/GOAP, since the spec explicitly scopes the
//! agent out as a reference client rather than a core component.

use rts_agent_sdk::{Actions, Agent, UnitCache, UnitInfo, UnitKind, WorldView};

const MIN_WORKERS: usize = 3;

fn distance(a: (u16, u16), b: (u16, u16)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

fn nearest<'a>(from: (u16, u16), candidates: &'a [UnitInfo]) -> Option<&'a UnitInfo> {
    candidates
        .iter()
        .min_by(|a, b| distance(from, a.pos).partial_cmp(&distance(from, b.pos)).unwrap())
}

/// Early game: train workers and put them on the nearest mine. Once a
/// barracks exists, pivot spare gold into soldiers/archers and throw idle
/// combat units at the nearest enemy unit.
pub struct PlannerAgent {
    cache: UnitCache,
    next_trainee: UnitKind,
}

impl Default for PlannerAgent {
    fn default() -> Self {
        Self {
            cache: UnitCache::new(),
            next_trainee: UnitKind::Soldier,
        }
    }
}

impl PlannerAgent {
    pub fn new() -> Self {
        Self::default()
    }

    fn train_workers(&self, world: &WorldView, actions: &mut Actions) {
        let idle_base = self.cache.own(UnitKind::Base).iter().find(|b| b.is_built && b.action == "IDLE");
        let Some(base) = idle_base else { return };
        if self.cache.own(UnitKind::Worker).len() >= MIN_WORKERS {
            return;
        }
        if world.own_gold() >= 50 {
            actions.train(base.id, UnitKind::Worker);
        }
    }

    fn assign_gatherers(&self, world: &WorldView, actions: &mut Actions) {
        let base = self.cache.own(UnitKind::Base).iter().find(|b| b.is_built);
        let Some(base) = base else { return };
        let mines = world.mines();
        for worker in self.cache.own_idle(UnitKind::Worker) {
            if let Some(mine) = nearest(worker.pos, &mines) {
                if mine.health > 0 {
                    actions.gather(worker.id, mine.id, base.id);
                }
            }
        }
    }

    /// Nothing else can happen until a base exists: training needs an idle
    /// base, gathering needs somewhere to deposit, and a barracks has Base
    /// as its dependency. Built first, unconditionally, out of starting gold.
    fn build_base(&self, world: &WorldView, actions: &mut Actions) {
        if !self.cache.own(UnitKind::Base).is_empty() {
            return;
        }
        if world.own_gold() < 500 {
            return;
        }
        let Some(worker) = self.cache.own_idle(UnitKind::Worker).next() else {
            return;
        };
        let sites = world.prospective_build_positions(UnitKind::Base);
        if let Some(&anchor) = sites.iter().min_by(|a, b| distance(worker.pos, **a).partial_cmp(&distance(worker.pos, **b)).unwrap()) {
            actions.build(worker.id, anchor, UnitKind::Base);
        }
    }

    fn build_barracks(&self, world: &WorldView, actions: &mut Actions) {
        if self.cache.own(UnitKind::Base).iter().all(|b| !b.is_built) {
            return;
        }
        if !self.cache.own(UnitKind::Barracks).is_empty() {
            return;
        }
        if world.own_gold() < 300 {
            return;
        }
        let Some(worker) = self.cache.own_idle(UnitKind::Worker).next() else {
            return;
        };
        let sites = world.prospective_build_positions(UnitKind::Barracks);
        if let Some(&anchor) = sites.iter().min_by(|a, b| distance(worker.pos, **a).partial_cmp(&distance(worker.pos, **b)).unwrap()) {
            actions.build(worker.id, anchor, UnitKind::Barracks);
        }
    }

    fn train_military(&mut self, world: &WorldView, actions: &mut Actions) {
        let idle_barracks = self
            .cache
            .own(UnitKind::Barracks)
            .iter()
            .find(|b| b.is_built && b.action == "IDLE");
        let Some(barracks) = idle_barracks else { return };
        let cost = if self.next_trainee == UnitKind::Soldier { 100 } else { 120 };
        if world.own_gold() < cost {
            return;
        }
        actions.train(barracks.id, self.next_trainee);
        self.next_trainee = match self.next_trainee {
            UnitKind::Soldier => UnitKind::Archer,
            _ => UnitKind::Soldier,
        };
    }

    fn attack_with_idle_military(&self, world: &WorldView, actions: &mut Actions) {
        let enemy_units: Vec<UnitInfo> = UnitKind::ALL
            .iter()
            .filter(|&&kind| kind != UnitKind::Mine)
            .flat_map(|&kind| world.enemy_units_by_type(kind))
            .collect();
        if enemy_units.is_empty() {
            return;
        }
        for kind in [UnitKind::Soldier, UnitKind::Archer] {
            for unit in self.cache.own_idle(kind) {
                if let Some(target) = nearest(unit.pos, &enemy_units) {
                    actions.attack(unit.id, target.id);
                }
            }
        }
    }
}

impl Agent for PlannerAgent {
    fn init_match(&mut self) {
        self.next_trainee = UnitKind::Soldier;
    }

    fn init_round(&mut self, world: &WorldView) {
        self.cache.refresh(world);
    }

    fn update(&mut self, world: &WorldView, actions: &mut Actions) {
        self.cache.refresh(world);
        self.build_base(world, actions);
        self.train_workers(world, actions);
        self.assign_gatherers(world, actions);
        self.build_barracks(world, actions);
        self.train_military(world, actions);
        self.attack_with_idle_military(world, actions);

        actions.log_row(vec![
            ("gold".to_string(), world.own_gold().to_string()),
            ("workers".to_string(), self.cache.own(UnitKind::Worker).len().to_string()),
        ]);
    }

    fn learn(&mut self, _world: &WorldView) {}
}
