use crate::error::ConfigError;
use anyhow::{Context, Result};
use rand_distr::Bernoulli;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file (see [`Config::from_file`]) or built in memory,
/// and validated before use. Missing keys take their [`Default`] values.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of agents.
    pub population_size: usize,

    /// Probability that an agent starts with the red opinion.
    pub red_proportion: f64,

    /// Fraction of red agents that are zealots.
    pub red_zealot_fraction: f64,
    /// Fraction of blue agents that are zealots.
    pub blue_zealot_fraction: f64,

    /// Probability that an interaction is biased toward a same-opinion partner.
    pub homophily: f64,

    /// Maximum number of interactions.
    pub max_interactions: usize,

    /// Number of interactions between progress updates.
    pub progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            red_proportion: 0.5,
            red_zealot_fraction: 0.05,
            blue_zealot_fraction: 0.05,
            homophily: 0.7,
            max_interactions: 10_000,
            progress_interval: 100,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be a TOML document whose keys are the fields of [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_num("population size", self.population_size, 1..)?;

        check_num("red proportion", self.red_proportion, 0.0..=1.0)?;

        check_num("red zealot fraction", self.red_zealot_fraction, 0.0..=1.0)?;
        check_num("blue zealot fraction", self.blue_zealot_fraction, 0.0..=1.0)?;

        check_num("homophily", self.homophily, 0.0..=1.0)?;

        check_num("maximum number of interactions", self.max_interactions, 1..)?;
        check_num("progress interval", self.progress_interval, 1..)?;

        Ok(())
    }
}

fn check_num<T, R>(field: &'static str, num: T, range: R) -> Result<(), ConfigError>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        return Err(ConfigError {
            field,
            range: format!("{range:?}"),
            value: format!("{num:?}"),
        });
    }
    Ok(())
}

/// Build the Bernoulli distribution of a probability parameter.
pub(crate) fn bernoulli(field: &'static str, prob: f64) -> Result<Bernoulli, ConfigError> {
    Bernoulli::new(prob).map_err(|_| ConfigError {
        field,
        range: format!("{:?}", 0.0..=1.0),
        value: format!("{prob:?}"),
    })
}
