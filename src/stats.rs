use crate::model::{Opinion, Population};
use serde::{Deserialize, Serialize};

/// Population-level snapshot after a given number of interactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub interaction_index: usize,

    pub red_count: usize,
    pub blue_count: usize,

    pub red_fraction: f64,
    pub blue_fraction: f64,

    pub red_zealot_count: usize,
    pub blue_zealot_count: usize,

    /// Interaction budget exhausted or one opinion extinct.
    pub is_complete: bool,
}

impl Statistics {
    /// Recompute the statistics of a population by a full scan.
    pub fn aggregate(pop: &Population, interaction_index: usize, max_interactions: usize) -> Self {
        let red_count = pop.count(Opinion::Red);
        let blue_count = pop.len() - red_count;
        let n_agt = pop.len() as f64;
        Self {
            interaction_index,
            red_count,
            blue_count,
            red_fraction: red_count as f64 / n_agt,
            blue_fraction: blue_count as f64 / n_agt,
            red_zealot_count: pop.count_zealots(Opinion::Red),
            blue_zealot_count: pop.count_zealots(Opinion::Blue),
            is_complete: interaction_index >= max_interactions || red_count == 0 || blue_count == 0,
        }
    }
}

/// Running mean and variance (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}
