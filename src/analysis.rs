use crate::config::Config;
use crate::engine::Engine;
use crate::stats::{Accumulator, Statistics};
use anyhow::{Context, Result};

/// Observable computed from the final statistics of a run.
pub trait Obs {
    fn update(&mut self, stats: &Statistics);
    fn report(&self) -> serde_json::Value;
}

pub struct FinalRedFraction {
    acc: Accumulator,
}

impl FinalRedFraction {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Obs for FinalRedFraction {
    fn update(&mut self, stats: &Statistics) {
        self.acc.add(stats.red_fraction);
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "final_red_fraction": self.acc.report() })
    }
}

pub struct Consensus {
    acc: Accumulator,
}

impl Consensus {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Obs for Consensus {
    fn update(&mut self, stats: &Statistics) {
        let consensus = stats.red_count == 0 || stats.blue_count == 0;
        self.acc.add(if consensus { 1.0 } else { 0.0 });
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "consensus": self.acc.report() })
    }
}

pub struct NInteractions {
    acc: Accumulator,
}

impl NInteractions {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Obs for NInteractions {
    fn update(&mut self, stats: &Statistics) {
        self.acc.add(stats.interaction_index as f64);
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "n_interactions": self.acc.report() })
    }
}

/// Runs independent simulations and accumulates observables over them.
pub struct Analyzer {
    cfg: Config,
    obs_ptr_vec: Vec<Box<dyn Obs>>,
    n_runs: usize,
}

impl Analyzer {
    pub fn new(cfg: Config) -> Self {
        let obs_ptr_vec: Vec<Box<dyn Obs>> = vec![
            Box::new(FinalRedFraction::new()),
            Box::new(Consensus::new()),
            Box::new(NInteractions::new()),
        ];
        Self {
            cfg,
            obs_ptr_vec,
            n_runs: 0,
        }
    }

    /// Run one simulation to completion with the given seed.
    pub fn add_run(&mut self, seed: u64) -> Result<()> {
        let mut engine = Engine::from_seed(seed);
        engine
            .initialize(self.cfg.clone())
            .context("failed to initialize engine")?;
        let stats = engine
            .run_to_completion()
            .context("failed to run simulation")?;

        for obs in &mut self.obs_ptr_vec {
            obs.update(&stats);
        }
        self.n_runs += 1;

        let red_pct = 100.0 * stats.red_fraction;
        log::debug!("run {seed} finished with {red_pct:06.2}% red");

        Ok(())
    }

    pub fn report(&self) -> serde_json::Value {
        let reports: Vec<_> = self.obs_ptr_vec.iter().map(|obs| obs.report()).collect();
        serde_json::json!({ "n_runs": self.n_runs, "observables": reports })
    }
}
