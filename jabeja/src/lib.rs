//! # `jabeja` - crate for JA-BE-JA graph partitioning
//!
//! Simulates the decentralized JA-BE-JA heuristic in a single process:
//! every node holds a color and repeatedly exchanges it with sampled peers
//! to reduce the edge cut, with simulated annealing to escape local minima.
//!
//! Includes a reader for METIS adjacency files and reporters for the
//! per-round edge cut, swap and migration counts.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

pub mod acceptance;
pub mod annealing;
pub mod config;
mod error;
pub mod graph;
pub mod graphio;
pub mod report;
pub mod rng;
mod scanner;
pub mod sampler;
pub mod simulation;

pub use acceptance::{Acceptance, AcceptanceRule};
pub use annealing::{AnnealingSchedule, Scheduler};
pub use config::Config;
pub use error::{Error, Result};
pub use graph::{Color, Graph, Node, NodeId};
pub use report::{Reporter, RoundMetrics};
pub use sampler::{NodeSelectionPolicy, Sampler};
pub use scanner::{DelimIter, Scanner};
pub use simulation::{Jabeja, Phase, SimulationState};

const NSTAT_PERCENTILES: usize = 7;
const STAT_PERCENTILES: [f64; NSTAT_PERCENTILES] = [0.0, 0.05, 0.10, 0.50, 0.90, 0.95, 1.0];

/// Mean and percentiles of a sample, e.g. partition sizes.
pub struct SummaryStats {
    mean: f64,
    percentiles: [f64; NSTAT_PERCENTILES],
}

impl SummaryStats {
    /// `None` for an empty sample.
    pub fn from(it: impl Iterator<Item = f64>) -> Option<Self> {
        let mut v: Vec<OrderedFloat<f64>> = it.map(OrderedFloat).collect();
        if v.is_empty() {
            return None;
        }
        v.sort_unstable();
        let mut stats = SummaryStats {
            mean: v.iter().map(|f| f.into_inner()).sum::<f64>() / v.len() as f64,
            percentiles: Default::default(),
        };
        STAT_PERCENTILES
            .iter()
            .copied()
            .map(|f| v[((v.len() - 1) as f64 * f) as usize].into_inner())
            .zip(stats.percentiles.iter_mut())
            .for_each(|(val, p)| *p = val);
        Some(stats)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        let mut map: HashMap<_, _> = STAT_PERCENTILES
            .iter()
            .map(|f| format!("p{:.3}", f))
            .zip(self.percentiles.iter().copied())
            .collect();
        map.insert("mean".to_string(), self.mean);
        map
    }
}
