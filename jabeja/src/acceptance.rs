//! Swap evaluation: same-color degrees, benefit of a hypothetical swap,
//! and partner selection under an acceptance rule.

use std::fmt;
use std::str::FromStr;

use crate::config::normalize;
use crate::error::{Error, Result};
use crate::graph::{Color, Graph, Vertex};
use crate::rng::RandomSource;

/// How a candidate swap is judged against the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptanceRule {
    /// `new * T > old`. Draws nothing.
    Greedy,
    /// `exp((new - old) / T) > U`.
    Metropolis,
    /// `1 - (old - new) / (max(old, new) * T) > U`.
    ///
    /// The left side is not clamped to `[0, 1]`, and is NaN when both
    /// benefits are zero, which never accepts.
    BoundedRatio,
}

impl AcceptanceRule {
    /// Whether a swap from `old` to `new` benefit is acceptable at
    /// `temperature`. The probabilistic rules draw exactly one uniform
    /// double per call, accepted or not.
    pub fn accepts<R: RandomSource + ?Sized>(
        self,
        old: f64,
        new: f64,
        temperature: f64,
        rng: &mut R,
    ) -> bool {
        match self {
            Self::Greedy => new * temperature > old,
            Self::Metropolis => ((new - old) / temperature).exp() > rng.next_f64(),
            Self::BoundedRatio => {
                1.0 - (old - new) / (old.max(new) * temperature) > rng.next_f64()
            }
        }
    }
}

impl FromStr for AcceptanceRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "GREEDY" => Ok(Self::Greedy),
            "METROPOLIS" => Ok(Self::Metropolis),
            "BOUNDED_RATIO" => Ok(Self::BoundedRatio),
            _ => Err(Error::Configuration(format!(
                "unknown acceptance rule {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for AcceptanceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Greedy => "GREEDY",
            Self::Metropolis => "METROPOLIS",
            Self::BoundedRatio => "BOUNDED_RATIO",
        })
    }
}

/// Number of `v`'s neighbors currently holding `color`.
pub fn color_degree(graph: &Graph, v: Vertex, color: Color) -> usize {
    graph
        .neighbors(v)
        .iter()
        .filter(|&&w| graph.color(w) == color)
        .count()
}

/// Benefit of the current configuration of `p` and `q` and of the one with
/// their colors exchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Benefit {
    pub old: f64,
    pub new: f64,
}

impl Benefit {
    /// `old = d(p, c_p)^a + d(q, c_q)^a`, `new = d(p, c_q)^a + d(q, c_p)^a`.
    ///
    /// When `p` and `q` are linked, each swapped degree loses one before
    /// exponentiation: the link itself would still join two differently
    /// colored nodes after the exchange.
    pub fn of(graph: &Graph, p: Vertex, q: Vertex, alpha: f64) -> Self {
        let (cp, cq) = (graph.color(p), graph.color(q));
        let dpp = color_degree(graph, p, cp) as i64;
        let dqq = color_degree(graph, q, cq) as i64;
        let mut dpq = color_degree(graph, p, cq) as i64;
        let mut dqp = color_degree(graph, q, cp) as i64;
        if graph.is_adjacent(p, q) {
            dpq -= 1;
            dqp -= 1;
        }
        let pow = |d: i64| (d as f64).powf(alpha);
        Self {
            old: pow(dpp) + pow(dqq),
            new: pow(dpq) + pow(dqp),
        }
    }
}

/// Partner selection for one subject node.
#[derive(Debug, Clone, Copy)]
pub struct Acceptance {
    rule: AcceptanceRule,
    alpha: f64,
}

impl Acceptance {
    pub fn new(rule: AcceptanceRule, alpha: f64) -> Self {
        Self { rule, alpha }
    }

    /// Among the `candidates` the rule accepts, the one with the highest new
    /// benefit, which must also be strictly positive. Ties go to the
    /// earliest candidate. `None` when nothing qualifies.
    pub fn find_partner<R: RandomSource + ?Sized>(
        &self,
        graph: &Graph,
        p: Vertex,
        candidates: &[Vertex],
        temperature: f64,
        rng: &mut R,
    ) -> Option<Vertex> {
        let mut best = None;
        let mut highest = 0.0;
        for &q in candidates {
            let benefit = Benefit::of(graph, p, q, self.alpha);
            // the rule goes first so every candidate consumes its draw
            if self.rule.accepts(benefit.old, benefit.new, temperature, rng)
                && benefit.new > highest
            {
                best = Some(q);
                highest = benefit.new;
            }
        }
        best
    }
}
