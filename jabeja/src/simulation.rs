//! The round loop: every node samples partners and maybe swaps, then the
//! temperature moves and the round is reported.

use std::time::Instant;

use rand_pcg::Lcg64Xsh32;
use serde_json::json;

use crate::acceptance::Acceptance;
use crate::annealing::Scheduler;
use crate::config::Config;
use crate::error::Result;
use crate::graph::{Graph, Vertex};
use crate::report::{Reporter, RoundMetrics};
use crate::rng::{self, RandomSource};
use crate::sampler::{NodeSelectionPolicy, Sampler};

/// Counters of a run in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Completed rounds.
    pub round: usize,
    /// Swaps since the start of the run. Never reset.
    pub swaps: usize,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    /// About to run, or running, round `round`.
    Running { round: usize },
    Completed,
}

/// A JA-BE-JA run over one graph.
///
/// Nodes are processed one at a time in the graph's id order and a swap
/// rewrites two colors in place, so a round is inherently sequential.
/// All randomness comes from the single stream `rng`.
pub struct Jabeja<R> {
    graph: Graph,
    rounds: usize,
    policy: NodeSelectionPolicy,
    sampler: Sampler,
    acceptance: Acceptance,
    scheduler: Scheduler,
    state: SimulationState,
    started: bool,
    rng: R,
}

impl Jabeja<Lcg64Xsh32> {
    /// A run drawing from the default stream for `config.seed`.
    pub fn seeded(graph: Graph, config: &Config) -> Result<Self> {
        Self::new(graph, config, rng::seeded(config.seed))
    }
}

impl<R: RandomSource> Jabeja<R> {
    pub fn new(graph: Graph, config: &Config, rng: R) -> Result<Self> {
        config.validate()?;
        let scheduler = config.scheduler();
        Ok(Self {
            graph,
            rounds: config.rounds,
            policy: config.node_selection_policy,
            sampler: config.sampler(),
            acceptance: config.acceptance(),
            state: SimulationState {
                round: 0,
                swaps: 0,
                temperature: scheduler.temperature(),
            },
            scheduler,
            started: false,
            rng,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.state.round >= self.rounds {
            Phase::Completed
        } else {
            Phase::Running {
                round: self.state.round,
            }
        }
    }

    /// Runs every remaining round, returning the metrics of the last one.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> Result<Option<RoundMetrics>> {
        let start = Instant::now();
        self.started = true;
        let mut last = None;
        while let Some(metrics) = self.step(reporter)? {
            last = Some(metrics);
        }
        let jabeja_time = format!("{:.0?}", Instant::now().duration_since(start));

        println!(
            "{}",
            json!({
                "rounds": self.state.round,
                "swaps": self.state.swaps,
                "edge_cut": last.map(|m| m.edge_cut),
                "migrations": last.map(|m| m.migrations),
                "temperature": self.state.temperature,
                "jabeja_time": jabeja_time,
            })
        );

        Ok(last)
    }

    /// Runs one round and reports it. `None` once every round has run.
    pub fn step(&mut self, reporter: &mut dyn Reporter) -> Result<Option<RoundMetrics>> {
        self.started = true;
        let round = self.state.round;
        if round >= self.rounds {
            return Ok(None);
        }

        self.scheduler.restart(round);
        self.state.temperature = self.scheduler.temperature();

        for v in 0..self.graph.nvertices() {
            self.sample_and_swap(v);
        }

        self.scheduler.cool_down();
        self.state.temperature = self.scheduler.temperature();

        let metrics = RoundMetrics::measure(
            &self.graph,
            round,
            self.state.swaps,
            self.state.temperature,
        );
        reporter.report(&metrics)?;
        self.state.round += 1;
        Ok(Some(metrics))
    }

    /// Looks for a partner for `p` under the selection policy and swaps
    /// with it if one is found. Returns whether colors changed.
    pub fn sample_and_swap(&mut self, p: Vertex) -> bool {
        let temperature = self.scheduler.temperature();
        let mut partner = None;

        if matches!(
            self.policy,
            NodeSelectionPolicy::Local | NodeSelectionPolicy::Hybrid
        ) {
            let candidates = self.sampler.local(&self.graph, p, &mut self.rng);
            partner =
                self.acceptance
                    .find_partner(&self.graph, p, &candidates, temperature, &mut self.rng);
        }

        if matches!(
            self.policy,
            NodeSelectionPolicy::Random | NodeSelectionPolicy::Hybrid
        ) {
            if partner.is_none() {
                let candidates = self.sampler.global(&self.graph, p, &mut self.rng);
                partner = self.acceptance.find_partner(
                    &self.graph,
                    p,
                    &candidates,
                    temperature,
                    &mut self.rng,
                );
            }
        }

        self.swap(p, partner)
    }

    /// Exchanges the colors of `p` and `partner` and counts the swap, unless
    /// there is no partner or both already share a color.
    pub fn swap(&mut self, p: Vertex, partner: Option<Vertex>) -> bool {
        match partner {
            Some(q) if self.graph.color(q) != self.graph.color(p) => {
                self.graph.swap_colors(p, q);
                self.state.swaps += 1;
                true
            }
            _ => false,
        }
    }
}
