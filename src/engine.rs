use crate::config::Config;
use crate::error::{ConfigError, InvalidStateError, NotInitializedError};
use crate::events::Handlers;
use crate::model::{Opinion, Population};
use crate::select::Selector;
use crate::stats::Statistics;
use crate::update::apply_interaction;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No population yet.
    Uninitialized,
    /// Initialized, no interaction performed.
    Ready,
    /// At least one interaction performed, not complete.
    Running,
    /// Interaction budget exhausted or consensus reached.
    Complete,
}

/// Record of a single interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub interaction_index: usize,
    pub agent_a: usize,
    pub agent_b: usize,
    pub prior_opinions: (Opinion, Opinion),
    pub posterior_opinions: (Opinion, Opinion),
}

struct Run {
    cfg: Config,
    selector: Selector,
    pop: Population,
    stats: Statistics,
}

/// Simulation engine.
///
/// Holds the random number generator, the current run (configuration,
/// population and latest statistics) and the event handlers, and provides
/// methods to initialize the population and advance it one interaction at a
/// time. Every call is synchronous: pacing is left to the caller.
pub struct Engine<R = ChaCha12Rng> {
    rng: R,
    phase: Phase,
    run: Option<Run>,
    handlers: Handlers,
}

impl Engine<ChaCha12Rng> {
    /// Create an uninitialized `Engine` with a seeded generator.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha12Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Create an uninitialized `Engine` drawing from the given generator.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            phase: Phase::Uninitialized,
            run: None,
            handlers: Handlers::default(),
        }
    }

    /// Generate a new population and restart at interaction 0.
    ///
    /// May be called in any phase. A population that already holds a single
    /// opinion puts the engine directly in [`Phase::Complete`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, in which case the
    /// engine is left exactly as it was.
    pub fn initialize(&mut self, cfg: Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        let selector = Selector::new(cfg.homophily)?;
        let pop = Population::generate(&cfg, &mut self.rng)?;

        let stats = Statistics::aggregate(&pop, 0, cfg.max_interactions);
        log::info!(
            "initialized {} agents ({} red, {} blue, {} red zealots, {} blue zealots)",
            pop.len(),
            stats.red_count,
            stats.blue_count,
            stats.red_zealot_count,
            stats.blue_zealot_count
        );

        self.phase = if stats.is_complete {
            Phase::Complete
        } else {
            Phase::Ready
        };
        self.run = Some(Run {
            cfg,
            selector,
            pop,
            stats,
        });

        Ok(())
    }

    /// Perform one interaction and dispatch its events.
    ///
    /// # Errors
    /// Returns an error, without changing any state, if the engine is
    /// uninitialized or complete.
    pub fn run_interaction(&mut self) -> Result<InteractionResult, InvalidStateError> {
        let phase = self.phase;
        let error = InvalidStateError {
            op: "run an interaction",
            phase,
        };
        let run = match (phase, self.run.as_mut()) {
            (Phase::Ready | Phase::Running, Some(run)) => run,
            _ => return Err(error),
        };

        let (i_agt_a, i_agt_b) = run
            .selector
            .select_pair(&run.pop, &mut self.rng)
            .ok_or(error)?;

        let agt_a = &run.pop.agents()[i_agt_a];
        let agt_b = &run.pop.agents()[i_agt_b];
        let prior_opinions = (agt_a.opinion(), agt_b.opinion());
        let posterior_opinions = apply_interaction(agt_a, agt_b);

        run.pop.set_opinion(i_agt_a, posterior_opinions.0);
        run.pop.set_opinion(i_agt_b, posterior_opinions.1);

        let interaction_index = run.stats.interaction_index + 1;
        run.stats = Statistics::aggregate(&run.pop, interaction_index, run.cfg.max_interactions);

        let result = InteractionResult {
            interaction_index,
            agent_a: i_agt_a,
            agent_b: i_agt_b,
            prior_opinions,
            posterior_opinions,
        };
        let stats = run.stats;
        let progress_interval = run.cfg.progress_interval;

        self.phase = if stats.is_complete {
            Phase::Complete
        } else {
            Phase::Running
        };
        log::trace!("{result:?}");

        self.handlers.interaction_complete(&result, &stats);

        if interaction_index % progress_interval == 0 || stats.is_complete {
            log::debug!(
                "interaction {interaction_index}: red fraction {:.4}",
                stats.red_fraction
            );
            self.handlers.progress_update(&stats);
        }

        if stats.is_complete {
            log::info!(
                "simulation complete after {interaction_index} interactions ({} red, {} blue)",
                stats.red_count,
                stats.blue_count
            );
            self.handlers.simulation_complete(&stats);
        }

        Ok(result)
    }

    /// Run interactions until the simulation is complete.
    ///
    /// # Errors
    /// Returns an error if the engine is uninitialized.
    pub fn run_to_completion(&mut self) -> Result<Statistics, InvalidStateError> {
        let error = InvalidStateError {
            op: "run to completion",
            phase: self.phase,
        };
        while self.phase != Phase::Complete {
            self.run_interaction()?;
        }
        self.run.as_ref().map(|run| run.stats).ok_or(error)
    }

    /// Get the latest statistics.
    pub fn get_statistics(&self) -> Result<Statistics, NotInitializedError> {
        self.run.as_ref().map(|run| run.stats).ok_or(NotInitializedError)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> Option<&Config> {
        self.run.as_ref().map(|run| &run.cfg)
    }

    /// Read-only view of the current population.
    pub fn population(&self) -> Option<&Population> {
        self.run.as_ref().map(|run| &run.pop)
    }

    /// Set the handler called after every successful interaction.
    pub fn on_interaction_complete<F>(&mut self, handler: F)
    where
        F: FnMut(&InteractionResult, &Statistics) + 'static,
    {
        self.handlers.set_interaction_complete(Box::new(handler));
    }

    /// Set the handler called every `progress_interval` interactions and on completion.
    pub fn on_progress_update<F>(&mut self, handler: F)
    where
        F: FnMut(&Statistics) + 'static,
    {
        self.handlers.set_progress_update(Box::new(handler));
    }

    /// Set the handler called once, on the interaction that completes the simulation.
    pub fn on_simulation_complete<F>(&mut self, handler: F)
    where
        F: FnMut(&Statistics) + 'static,
    {
        self.handlers.set_simulation_complete(Box::new(handler));
    }

    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn config(population_size: usize, max_interactions: usize) -> Config {
        Config {
            population_size,
            max_interactions,
            progress_interval: 10,
            ..Config::default()
        }
    }

    #[test]
    fn starts_uninitialized() {
        let mut engine = Engine::from_seed(0);
        assert_eq!(engine.phase(), Phase::Uninitialized);
        assert!(!engine.is_complete());
        assert_eq!(engine.get_statistics(), Err(NotInitializedError));
        assert!(engine.population().is_none());

        let err = engine.run_interaction().unwrap_err();
        assert_eq!(err.phase, Phase::Uninitialized);
        assert!(engine.run_to_completion().is_err());
    }

    #[test]
    fn failed_initialize_keeps_state() {
        let mut engine = Engine::from_seed(0);
        let bad = Config {
            red_proportion: 1.1,
            ..Config::default()
        };
        assert_eq!(engine.initialize(bad.clone()).unwrap_err().field, "red proportion");
        assert_eq!(engine.phase(), Phase::Uninitialized);

        engine.initialize(config(50, 20)).unwrap();
        engine.run_interaction().unwrap();
        let stats = engine.get_statistics().unwrap();
        let pop = engine.population().unwrap().clone();

        assert!(engine.initialize(bad).is_err());
        assert_eq!(engine.get_statistics().unwrap(), stats);
        assert_eq!(engine.population().unwrap(), &pop);
    }

    #[test]
    fn phases_advance() {
        let mut engine = Engine::from_seed(1);
        engine
            .initialize(Config {
                red_zealot_fraction: 0.5,
                blue_zealot_fraction: 0.5,
                ..config(40, 3)
            })
            .unwrap();
        assert_eq!(engine.phase(), Phase::Ready);

        engine.run_interaction().unwrap();
        assert_eq!(engine.phase(), Phase::Running);

        let stats = engine.run_to_completion().unwrap();
        assert_eq!(engine.phase(), Phase::Complete);
        assert!(stats.is_complete);
        assert!(stats.interaction_index <= 3);
    }

    #[test]
    fn reinitialize_restarts() {
        let mut engine = Engine::from_seed(2);
        engine.initialize(config(20, 5)).unwrap();
        engine.run_to_completion().unwrap();
        assert!(engine.is_complete());

        engine.initialize(config(30, 5)).unwrap();
        let stats = engine.get_statistics().unwrap();
        assert_eq!(stats.interaction_index, 0);
        assert_eq!(stats.red_count + stats.blue_count, 30);
        assert_eq!(engine.config().unwrap().population_size, 30);
    }

    #[test]
    fn events_are_dispatched_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut engine = Engine::from_seed(3);

        let log_a = Rc::clone(&log);
        engine.on_interaction_complete(move |result, stats| {
            assert_eq!(result.interaction_index, stats.interaction_index);
            log_a.borrow_mut().push(format!("interaction {}", result.interaction_index));
        });
        let log_b = Rc::clone(&log);
        engine.on_progress_update(move |stats| {
            log_b.borrow_mut().push(format!("progress {}", stats.interaction_index));
        });
        let log_c = Rc::clone(&log);
        engine.on_simulation_complete(move |stats| {
            log_c.borrow_mut().push(format!("complete {}", stats.interaction_index));
        });

        engine
            .initialize(Config {
                red_zealot_fraction: 0.5,
                blue_zealot_fraction: 0.5,
                ..config(100, 20)
            })
            .unwrap();
        let stats = engine.run_to_completion().unwrap();
        let n = stats.interaction_index;

        let log = log.borrow();
        assert_eq!(log.iter().filter(|e| e.starts_with("complete")).count(), 1);
        assert_eq!(log.last().unwrap(), &format!("complete {n}"));
        assert_eq!(log[0], "interaction 1");
        if n >= 10 {
            let i_progress = log.iter().position(|e| e == "progress 10").unwrap();
            assert_eq!(log[i_progress - 1], "interaction 10");
        }
    }

    #[test]
    fn replacing_a_handler() {
        let count = Rc::new(RefCell::new((0, 0)));
        let mut engine = Engine::from_seed(4);
        engine.initialize(config(100, 1_000)).unwrap();

        let count_a = Rc::clone(&count);
        engine.on_interaction_complete(move |_, _| count_a.borrow_mut().0 += 1);
        engine.run_interaction().unwrap();

        let count_b = Rc::clone(&count);
        engine.on_interaction_complete(move |_, _| count_b.borrow_mut().1 += 1);
        engine.run_interaction().unwrap();

        engine.clear_handlers();
        if !engine.is_complete() {
            engine.run_interaction().unwrap();
        }

        assert_eq!(*count.borrow(), (1, 1));
    }
}
