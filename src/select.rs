use crate::config;
use crate::error::ConfigError;
use crate::model::{Opinion, Population};
use rand::prelude::*;
use rand_distr::Bernoulli;

/// Homophily-weighted selector of interacting pairs.
///
/// With probability `homophily` the partner is drawn among the agents that
/// share the first agent's opinion; otherwise, or if no such agent exists,
/// it is drawn from the whole population.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    same_dist: Bernoulli,
}

impl Selector {
    pub fn new(homophily: f64) -> Result<Self, ConfigError> {
        let same_dist = config::bernoulli("homophily", homophily)?;
        Ok(Self { same_dist })
    }

    /// Pick two distinct agents.
    ///
    /// Returns `None` if the population has fewer than two agents.
    pub fn select_pair<R: Rng>(&self, pop: &Population, rng: &mut R) -> Option<(usize, usize)> {
        let n_agt = pop.len();
        if n_agt < 2 {
            return None;
        }

        let i_agt_a = rng.random_range(0..n_agt);

        if self.same_dist.sample(rng) {
            if let Some(i_agt_b) = select_same_opinion(pop, i_agt_a, rng) {
                return Some((i_agt_a, i_agt_b));
            }
        }

        // Uniform over all agents but the first one.
        let mut i_agt_b = rng.random_range(0..n_agt - 1);
        if i_agt_b >= i_agt_a {
            i_agt_b += 1;
        }

        Some((i_agt_a, i_agt_b))
    }
}

fn select_same_opinion<R: Rng>(pop: &Population, i_agt_a: usize, rng: &mut R) -> Option<usize> {
    let opinion = pop.agents()[i_agt_a].opinion();
    let is_candidate =
        |i_agt: usize, agt_opinion: Opinion| i_agt != i_agt_a && agt_opinion == opinion;

    let n_candidates = pop
        .agents()
        .iter()
        .filter(|agt| is_candidate(agt.id(), agt.opinion()))
        .count();
    if n_candidates == 0 {
        return None;
    }

    let i_candidate = rng.random_range(0..n_candidates);
    pop.agents()
        .iter()
        .filter(|agt| is_candidate(agt.id(), agt.opinion()))
        .nth(i_candidate)
        .map(|agt| agt.id())
}
