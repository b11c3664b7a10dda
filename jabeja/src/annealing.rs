//! Temperature schedules, advanced once per round.

use std::fmt;
use std::str::FromStr;

use crate::config::normalize;
use crate::error::{Error, Result};

/// Multiplicative decay stops once the temperature is at or below this.
pub const MIN_TEMPERATURE: f64 = 1e-5;

/// Which schedule a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealingSchedule {
    /// Subtract `delta` each round, never going below 1.
    Linear,
    /// Multiply by `alpha2` each round until [`MIN_TEMPERATURE`] is reached.
    Multiplicative,
    /// Linear decay, reset to the initial temperature every `restart_period`
    /// rounds.
    Periodic,
}

impl FromStr for AnnealingSchedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "LINEAR" => Ok(Self::Linear),
            "MULTIPLICATIVE" => Ok(Self::Multiplicative),
            "PERIODIC" => Ok(Self::Periodic),
            _ => Err(Error::Configuration(format!(
                "unknown annealing schedule {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for AnnealingSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "LINEAR",
            Self::Multiplicative => "MULTIPLICATIVE",
            Self::Periodic => "PERIODIC",
        })
    }
}

/// Per-round temperature update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decay {
    /// `T -= delta` while `T > 1`, clamped to 1.
    Linear { delta: f64 },
    /// `T *= alpha2` while `T > MIN_TEMPERATURE`.
    Multiplicative { alpha2: f64 },
}

/// Owns the current temperature of a run.
#[derive(Debug, Clone)]
pub struct Scheduler {
    initial: f64,
    temperature: f64,
    decay: Decay,
    restart_period: Option<usize>,
}

impl Scheduler {
    pub fn new(initial: f64, decay: Decay, restart_period: Option<usize>) -> Self {
        Self {
            initial,
            temperature: initial,
            decay,
            restart_period,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Called at the start of every round, before any node is processed.
    /// Returns whether the temperature was reset.
    pub fn restart(&mut self, round: usize) -> bool {
        match self.restart_period {
            Some(period) if period > 0 && round % period == 0 => {
                self.temperature = self.initial;
                true
            }
            _ => false,
        }
    }

    /// Called once after every node of a round has been processed.
    pub fn cool_down(&mut self) {
        match self.decay {
            Decay::Linear { delta } => {
                if self.temperature > 1.0 {
                    self.temperature -= delta;
                }
                if self.temperature < 1.0 {
                    self.temperature = 1.0;
                }
            }
            Decay::Multiplicative { alpha2 } => {
                if self.temperature > MIN_TEMPERATURE {
                    self.temperature *= alpha2;
                }
            }
        }
    }
}
