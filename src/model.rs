//! Simulation data types.

use crate::config::{self, Config};
use crate::error::ConfigError;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// One of the two mutually exclusive opinions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opinion {
    Red,
    Blue,
}

/// Agent of the simulation.
///
/// Each agent has an identifier equal to its position in the population,
/// an opinion, and a zealot flag. Zealots never change their opinion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: usize,
    opinion: Opinion,
    is_zealot: bool,
}

impl Agent {
    /// Get the identifier of the agent.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get the current opinion of the agent.
    pub fn opinion(&self) -> Opinion {
        self.opinion
    }

    /// Whether the agent is a zealot.
    pub fn is_zealot(&self) -> bool {
        self.is_zealot
    }
}

/// Fixed-size set of agents.
///
/// Built once per initialization and never resized. Opinions are only
/// changed by the engine through the opinion update rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    agt_vec: Vec<Agent>,
}

impl Population {
    /// Generate a random population from a configuration.
    ///
    /// Every agent is independently red with probability `red_proportion`,
    /// then zealots are marked as in [`Population::from_opinions`].
    ///
    /// # Errors
    /// Returns an error, without drawing any random number, if the
    /// configuration is invalid.
    pub fn generate<R: Rng>(cfg: &Config, rng: &mut R) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let red_dist = config::bernoulli("red proportion", cfg.red_proportion)?;

        let mut opinions = Vec::with_capacity(cfg.population_size);
        for _ in 0..cfg.population_size {
            let opinion = if red_dist.sample(rng) {
                Opinion::Red
            } else {
                Opinion::Blue
            };
            opinions.push(opinion);
        }

        Ok(Self::from_opinions(
            opinions,
            cfg.red_zealot_fraction,
            cfg.blue_zealot_fraction,
            rng,
        ))
    }

    /// Build a population with the given opinions.
    ///
    /// Within each opinion group, `floor(fraction * group size)` agents are
    /// chosen uniformly without replacement and marked as zealots.
    pub fn from_opinions<R: Rng>(
        opinions: Vec<Opinion>,
        red_zealot_fraction: f64,
        blue_zealot_fraction: f64,
        rng: &mut R,
    ) -> Self {
        let mut agt_vec: Vec<_> = opinions
            .into_iter()
            .enumerate()
            .map(|(id, opinion)| Agent {
                id,
                opinion,
                is_zealot: false,
            })
            .collect();

        for (opinion, fraction) in [
            (Opinion::Red, red_zealot_fraction),
            (Opinion::Blue, blue_zealot_fraction),
        ] {
            let i_agt_group: Vec<_> = agt_vec
                .iter()
                .filter(|agt| agt.opinion == opinion)
                .map(|agt| agt.id)
                .collect();

            let n_zealot = ((fraction * i_agt_group.len() as f64).floor() as usize)
                .min(i_agt_group.len());

            for &i_agt in i_agt_group.choose_multiple(rng, n_zealot) {
                agt_vec[i_agt].is_zealot = true;
            }
        }

        Self { agt_vec }
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agt_vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agt_vec.is_empty()
    }

    /// All agents, ordered by identifier.
    pub fn agents(&self) -> &[Agent] {
        &self.agt_vec
    }

    /// Get an agent by identifier.
    pub fn agent(&self, id: usize) -> Option<&Agent> {
        self.agt_vec.get(id)
    }

    /// Number of agents holding an opinion.
    pub fn count(&self, opinion: Opinion) -> usize {
        self.agt_vec
            .iter()
            .filter(|agt| agt.opinion == opinion)
            .count()
    }

    /// Number of zealots holding an opinion.
    pub fn count_zealots(&self, opinion: Opinion) -> usize {
        self.agt_vec
            .iter()
            .filter(|agt| agt.is_zealot && agt.opinion == opinion)
            .count()
    }

    pub(crate) fn set_opinion(&mut self, id: usize, opinion: Opinion) {
        let agt = &mut self.agt_vec[id];
        debug_assert!(!agt.is_zealot || agt.opinion == opinion);
        agt.opinion = opinion;
    }
}
