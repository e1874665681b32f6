//! Match/round controller (§4.8): initialization, the per-tick drive loop,
//! win-condition evaluation, and round/match bookkeeping. Grounded on
//! `host.rs`'s `MatchHost::run_for_ticks`/`step_one_tick` tick-stepping
//! idiom, specialized to two in-process agents instead of network-submitted
//! actions (there is no remaining use for a submitted-actions queue once
//! both agents run in the same process).

use rand::Rng;
use rts_core::AgentId;
use tracing::{debug, error, info, warn};

use crate::catalogs::UnitKind;
use crate::command;
use crate::config::MatchConfig;
use crate::errors::Fatal;
use crate::events::SimEvent;
use crate::sdk::{Actions, Agent, WorldView};
use crate::world::World;

const AGENTS: usize = 2;

/// Result of one round.
#[derive(Clone, Copy, Debug)]
pub struct RoundOutcome {
    pub winner: Option<AgentId>,
    pub scores: [u32; AGENTS],
}

/// Result of a whole match.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    pub winner: AgentId,
    pub round_wins: [u32; AGENTS],
    pub events: Vec<SimEvent>,
}

/// Everything produced by one `Controller::play_round` call.
pub struct RoundResult {
    pub outcome: RoundOutcome,
    pub events: Vec<SimEvent>,
    /// Per-agent CSV log rows accumulated during this round only (§6).
    pub logs: [Vec<Vec<(String, String)>>; AGENTS],
    /// Set if a registry invariant was found violated mid-round (§7); the
    /// round was aborted and its outcome forced to a tie rather than
    /// continuing to operate on inconsistent state.
    pub fatal: Option<Fatal>,
}

/// Mirror a footprint-rooted position across the map per §4.8/§9: if agent
/// A's instance of a footprint is at `(x, y)`, agent B's mirrored instance
/// sits at `(W - footprint_w - x, H - 2 + footprint_h - y)`.
///
/// The `- 2` constant is carried verbatim from spec.md (an inherited magic
/// number, not derived from any other quantity here); DESIGN.md records the
/// decision to keep it rather than "fix" it.
fn mirror(pos: (u16, u16), footprint: (u16, u16), map_size: (u16, u16)) -> (u16, u16) {
    let x = map_size.0 as i32 - footprint.0 as i32 - pos.0 as i32;
    let y = map_size.1 as i32 - 2 + footprint.1 as i32 - pos.1 as i32;
    (x.max(0) as u16, y.max(0) as u16)
}

/// Drives one match: N rounds between two agents on one `World`.
pub struct Controller {
    config: MatchConfig,
    world: World,
    agents: Vec<Box<dyn Agent>>,
    /// Which boxed agent plays as `AgentId` 0 and which plays as 1, decided
    /// once per match by coin flip (§4.8: "pick which agent is instantiated
    /// first by coin flip, for fairness").
    agent_order: [usize; AGENTS],
    round_wins: [u32; AGENTS],
    round: u8,
    total_game_time: f64,
    pub round_logs: [Vec<Vec<(String, String)>>; AGENTS],
}

impl Controller {
    pub fn new(config: MatchConfig, mut agents: Vec<Box<dyn Agent>>) -> Self {
        assert_eq!(agents.len(), AGENTS, "exactly two agents compete in a match");
        let mut rng = rand::thread_rng();
        let agent_order = if rng.gen_bool(0.5) { [0, 1] } else { [1, 0] };

        for agent in agents.iter_mut() {
            agent.init_match();
        }

        let world = World::new(config.map_width, config.map_height, config.game_speed, config.tick_hz);
        let mut controller = Self {
            config,
            world,
            agents,
            agent_order,
            round_wins: [0; AGENTS],
            round: 0,
            total_game_time: 0.0,
            round_logs: Default::default(),
        };
        controller.setup_round();
        controller
    }

    fn agent_mut(&mut self, agent: AgentId) -> &mut Box<dyn Agent> {
        &mut self.agents[self.agent_order[agent as usize]]
    }

    /// (Re)place mines and workers, reset gold, per §4.8 Initialization.
    fn setup_round(&mut self) {
        let (width, height) = (self.config.map_width, self.config.map_height);
        self.world = World::new(width, height, self.config.game_speed, self.config.tick_hz);
        self.total_game_time = 0.0;

        let worker_footprint = self.world.catalogs.descriptor(UnitKind::Worker).footprint;
        let mine_footprint = self.world.catalogs.descriptor(UnitKind::Mine).footprint;
        let mines_per_agent = (self.config.mines_per_round / 2).max(1);

        let worker_anchor_a = (2u16, 2u16);
        let worker_anchor_b = mirror(worker_anchor_a, worker_footprint, (width, height));
        let worker_anchors = [worker_anchor_a, worker_anchor_b];

        for (agent, &worker_anchor) in worker_anchors.iter().enumerate() {
            let agent = agent as AgentId;
            self.world.set_gold(agent, self.config.starting_gold);
            self.world
                .registry
                .place(&mut self.world.map, &self.world.catalogs, UnitKind::Worker, agent, worker_anchor, true);

            for i in 0..mines_per_agent {
                let offset = 4 + i as u16 * (mine_footprint.0 + 2);
                let mine_anchor_a = (worker_anchor_a.0 + offset, worker_anchor_a.1 + 2);
                let mine_anchor = if agent == 0 {
                    mine_anchor_a
                } else {
                    mirror(mine_anchor_a, mine_footprint, (width, height))
                };
                let mine_id = self.world.registry.place(
                    &mut self.world.map,
                    &self.world.catalogs,
                    UnitKind::Mine,
                    rts_core::NEUTRAL_AGENT,
                    mine_anchor,
                    true,
                );
                if let Some(mine) = self.world.registry.get_mut(mine_id) {
                    mine.health = self.config.mine_starting_gold as i32;
                    mine.max_health = self.config.mine_starting_gold as i32;
                }
            }
        }

        for log in self.round_logs.iter_mut() {
            log.clear();
        }

        for agent in 0..AGENTS as AgentId {
            let enemy = 1 - agent;
            let view = WorldView::new(&self.world, agent, enemy);
            self.agent_mut(agent).init_round(&view);
        }

        info!(round = self.round, "round initialized");
    }

    /// Advance one simulation tick (§4.8, §5): each agent's `update` in
    /// controller-chosen order, dispatch, then state-machine advance in id
    /// order.
    fn step_tick(&mut self, events: &mut Vec<SimEvent>) {
        let dt = 1.0 / self.config.tick_hz as f64;
        self.total_game_time += dt * self.config.game_speed as f64;

        for &agent in &self.agent_order_ids() {
            let enemy = 1 - agent;
            let mut actions = Actions::new(agent);
            {
                let view = WorldView::new(&self.world, agent, enemy);
                self.agent_mut(agent).update(&view, &mut actions);
            }
            for command in actions.commands.drain(..) {
                command::dispatch(&mut self.world, agent, command, events);
            }
            self.round_logs[agent as usize].extend(actions.log_rows);
        }

        let order = self.world.registry.ids_in_tick_order();
        crate::state_machine::advance_all(&mut self.world, &order, events);

        for event in events.iter() {
            if let SimEvent::CommandRejected { agent, reason } = event {
                debug!(agent, ?reason, "command rejected");
            }
        }
    }

    fn agent_order_ids(&self) -> [AgentId; AGENTS] {
        [0, 1]
    }

    fn unit_value(&self, kind: UnitKind) -> u32 {
        self.world.catalogs.descriptor(kind).cost
    }

    fn score(&self, agent: AgentId) -> u32 {
        UnitKind::ALL
            .iter()
            .filter(|&&kind| kind != UnitKind::Mine)
            .map(|&kind| self.world.registry.by_owner_type(agent, kind).len() as u32 * self.unit_value(kind))
            .sum()
    }

    fn has_live_units(&self, agent: AgentId) -> bool {
        UnitKind::ALL
            .iter()
            .filter(|&&kind| kind != UnitKind::Mine)
            .any(|&kind| {
                self.world
                    .registry
                    .by_owner_type(agent, kind)
                    .iter()
                    .filter_map(|&id| self.world.registry.get(id))
                    .any(|unit| unit.is_alive())
            })
    }

    /// Win condition per §4.8.
    fn evaluate_round(&self) -> Option<AgentId> {
        if self.total_game_time > self.config.max_seconds_per_round as f64 {
            let scores = [self.score(0), self.score(1)];
            if scores[0] != scores[1] {
                return Some(if scores[0] > scores[1] { 0 } else { 1 });
            }
            let gold = [self.world.gold(0), self.world.gold(1)];
            if gold[0] != gold[1] {
                return Some(if gold[0] > gold[1] { 0 } else { 1 });
            }
            return Some(0);
        }

        let alive = [self.has_live_units(0), self.has_live_units(1)];
        match alive {
            [true, false] => Some(0),
            [false, true] => Some(1),
            _ => None,
        }
    }

    /// Run one round to completion, up to a large tick cap as a backstop
    /// against a controller bug producing an infinite loop (never hit in
    /// practice: `max_seconds_per_round` always resolves the round first).
    ///
    /// Returns the round's own log rows snapshotted before the next round's
    /// `setup_round` clears them — `self.round_logs` is only ever "the
    /// current, in-progress round's rows", so a caller that wants to flush
    /// a CSV sink per round (§6) must take them from this return value, not
    /// re-read `round_logs` after the call.
    pub fn play_round(&mut self) -> RoundResult {
        let mut events = Vec::new();
        let tick_cap = (self.config.max_seconds_per_round as u64 + 5) * self.config.tick_hz as u64 * 4;
        let mut ticks_run: u64 = 0;
        let mut fatal = None;

        let winner = loop {
            self.step_tick(&mut events);
            ticks_run += 1;
            if let Err(err) = self
                .world
                .registry
                .check_invariants()
                .and_then(|()| crate::state_machine::check_action_payload_consistency(&self.world))
            {
                error!(%err, "invariant violated; aborting round");
                fatal = Some(err);
                break None;
            }
            if let Some(winner) = self.evaluate_round() {
                break Some(winner);
            }
            if ticks_run > tick_cap {
                warn!("round exceeded tick backstop without resolving; forcing a tie");
                break None;
            }
        };

        let scores = [self.score(0), self.score(1)];
        if let Some(agent) = winner {
            self.round_wins[agent as usize] += 1;
        }

        if self.config.enable_learning {
            for agent in 0..AGENTS as AgentId {
                let enemy = 1 - agent;
                let view = WorldView::new(&self.world, agent, enemy);
                self.agent_mut(agent).learn(&view);
            }
        }

        self.round += 1;
        info!(round = self.round, ?winner, ?scores, "round ended");
        events.push(SimEvent::RoundEnded { winner });
        let logs = std::mem::take(&mut self.round_logs);
        if self.round < self.config.rounds_per_match {
            self.setup_round();
        }

        RoundResult {
            outcome: RoundOutcome { winner, scores },
            events,
            logs,
            fatal,
        }
    }

    pub fn play_match(&mut self) -> MatchOutcome {
        while self.round < self.config.rounds_per_match {
            let result = self.play_round();
            if result.fatal.is_some() {
                break;
            }
        }
        let winner = if self.round_wins[0] >= self.round_wins[1] { 0 } else { 1 };
        info!(round_wins = ?self.round_wins, winner, "match ended");
        MatchOutcome {
            winner,
            round_wins: self.round_wins,
            events: vec![SimEvent::MatchEnded { winner }],
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
