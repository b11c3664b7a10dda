//! Candidate partner sampling.
//!
//! Both draws are rejection samplers over a fixed index space: draw a
//! uniform index, keep it unless it was already chosen (or excluded). The
//! requested count is capped at the number of distinct candidates first,
//! so the loops always terminate.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::config::normalize;
use crate::error::{Error, Result};
use crate::graph::{Graph, Vertex};
use crate::rng::RandomSource;

/// Where partners are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSelectionPolicy {
    /// Direct neighbors only.
    Local,
    /// The whole graph only.
    Random,
    /// Neighbors first, then the whole graph if no neighbor is accepted.
    Hybrid,
}

impl FromStr for NodeSelectionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "LOCAL" => Ok(Self::Local),
            "RANDOM" => Ok(Self::Random),
            "HYBRID" => Ok(Self::Hybrid),
            _ => Err(Error::Configuration(format!(
                "unknown node selection policy {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for NodeSelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "LOCAL",
            Self::Random => "RANDOM",
            Self::Hybrid => "HYBRID",
        })
    }
}

/// Bounded, duplicate-free partner samples.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    neighbor_sample_size: usize,
    global_sample_size: usize,
}

impl Sampler {
    pub fn new(neighbor_sample_size: usize, global_sample_size: usize) -> Self {
        Self {
            neighbor_sample_size,
            global_sample_size,
        }
    }

    /// Up to `neighbor_sample_size` distinct neighbors of `v`. If `v` has
    /// no more neighbors than that, all of them are returned in adjacency
    /// order without drawing.
    pub fn local<R: RandomSource + ?Sized>(
        &self,
        graph: &Graph,
        v: Vertex,
        rng: &mut R,
    ) -> Vec<Vertex> {
        let neighbors = graph.neighbors(v);
        if neighbors.len() <= self.neighbor_sample_size {
            return neighbors.to_vec();
        }

        // repeated links would otherwise leave fewer distinct ids than asked for
        let want = self
            .neighbor_sample_size
            .min(neighbors.iter().unique().count());
        let mut chosen = Vec::with_capacity(want);
        while chosen.len() < want {
            let w = neighbors[rng.next_index(neighbors.len())];
            if !chosen.contains(&w) {
                chosen.push(w);
            }
        }
        chosen
    }

    /// Up to `global_sample_size` distinct nodes drawn from the whole
    /// graph, never including `exclude`.
    pub fn global<R: RandomSource + ?Sized>(
        &self,
        graph: &Graph,
        exclude: Vertex,
        rng: &mut R,
    ) -> Vec<Vertex> {
        let n = graph.nvertices();
        let available = if exclude < n { n - 1 } else { n };
        let want = self.global_sample_size.min(available);
        let mut chosen = Vec::with_capacity(want);
        while chosen.len() < want {
            let w = rng.next_index(n);
            if w != exclude && !chosen.contains(&w) {
                chosen.push(w);
            }
        }
        chosen
    }
}
