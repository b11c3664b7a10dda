//! Run configuration.
//!
//! The acceptance rule, annealing schedule and report format are chosen
//! independently of each other.

use std::path::PathBuf;

use crate::acceptance::{Acceptance, AcceptanceRule};
use crate::annealing::{AnnealingSchedule, Decay, Scheduler};
use crate::error::{Error, Result};
use crate::graphio::InitialColorPolicy;
use crate::report::ReportFormat;
use crate::sampler::{NodeSelectionPolicy, Sampler};

/// Canonical spelling for enumeration names: upper case, `-` read as `_`.
pub(crate) fn normalize(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace('-', "_")
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Total rounds; every node is processed once per round.
    pub rounds: usize,
    pub node_selection_policy: NodeSelectionPolicy,
    /// Initial temperature.
    pub temperature: f64,
    /// Linear decay step.
    pub delta: f64,
    /// Benefit exponent.
    pub alpha: f64,
    /// Multiplicative decay factor, in (0, 1).
    pub alpha2: f64,
    /// Rounds between temperature resets under [`AnnealingSchedule::Periodic`].
    pub restart_period: usize,
    pub neighbor_sample_size: usize,
    pub global_sample_size: usize,
    pub acceptance_rule: AcceptanceRule,
    pub annealing_schedule: AnnealingSchedule,
    pub seed: u64,
    /// Number of colors handed out by the initial coloring.
    pub num_partitions: u32,
    pub initial_color_policy: InitialColorPolicy,
    pub output_dir: PathBuf,
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: 1000,
            node_selection_policy: NodeSelectionPolicy::Hybrid,
            temperature: 2.0,
            delta: 0.003,
            alpha: 2.0,
            alpha2: 0.9,
            restart_period: 100,
            neighbor_sample_size: 3,
            global_sample_size: 6,
            acceptance_rule: AcceptanceRule::Greedy,
            annealing_schedule: AnnealingSchedule::Linear,
            seed: 0,
            num_partitions: 4,
            initial_color_policy: InitialColorPolicy::RoundRobin,
            output_dir: PathBuf::from("./output"),
            report_format: ReportFormat::Json,
        }
    }
}

impl Config {
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_policy(mut self, policy: NodeSelectionPolicy) -> Self {
        self.node_selection_policy = policy;
        self
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_alpha2(mut self, alpha2: f64) -> Self {
        self.alpha2 = alpha2;
        self
    }

    pub fn with_restart_period(mut self, rounds: usize) -> Self {
        self.restart_period = rounds;
        self
    }

    pub fn with_sample_sizes(mut self, neighbor: usize, global: usize) -> Self {
        self.neighbor_sample_size = neighbor;
        self.global_sample_size = global;
        self
    }

    pub fn with_acceptance_rule(mut self, rule: AcceptanceRule) -> Self {
        self.acceptance_rule = rule;
        self
    }

    pub fn with_schedule(mut self, schedule: AnnealingSchedule) -> Self {
        self.annealing_schedule = schedule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(Error::Configuration(msg));
        if !(self.temperature > 0.0) {
            return bad(format!("temperature must be positive, got {}", self.temperature));
        }
        if !(self.alpha2 > 0.0 && self.alpha2 < 1.0)
            && self.annealing_schedule == AnnealingSchedule::Multiplicative
        {
            return bad(format!("alpha2 must be in (0, 1), got {}", self.alpha2));
        }
        if !(self.delta >= 0.0) {
            return bad(format!("delta must be non-negative, got {}", self.delta));
        }
        if self.annealing_schedule != AnnealingSchedule::Multiplicative && self.temperature < 1.0 {
            return bad(format!(
                "linear decay needs a temperature of at least 1, got {}",
                self.temperature
            ));
        }
        if self.annealing_schedule == AnnealingSchedule::Periodic && self.restart_period == 0 {
            return bad("restart period must be positive".to_string());
        }
        if self.num_partitions == 0 {
            return bad("need at least one partition".to_string());
        }
        Ok(())
    }

    pub fn sampler(&self) -> Sampler {
        Sampler::new(self.neighbor_sample_size, self.global_sample_size)
    }

    pub fn acceptance(&self) -> Acceptance {
        Acceptance::new(self.acceptance_rule, self.alpha)
    }

    pub fn decay(&self) -> Decay {
        match self.annealing_schedule {
            AnnealingSchedule::Linear | AnnealingSchedule::Periodic => Decay::Linear {
                delta: self.delta,
            },
            AnnealingSchedule::Multiplicative => Decay::Multiplicative {
                alpha2: self.alpha2,
            },
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        let restart = match self.annealing_schedule {
            AnnealingSchedule::Periodic => Some(self.restart_period),
            _ => None,
        };
        Scheduler::new(self.temperature, self.decay(), restart)
    }
}
