//! Binary opinion dynamics with zealots and homophily.
//!
//! A population of red and blue agents, some of them zealots that never
//! change their mind, undergoes pairwise interactions. The [`Engine`] is a
//! synchronous state machine driven one interaction at a time by the caller.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod model;
pub mod select;
pub mod stats;
pub mod update;

pub use config::Config;
pub use engine::{Engine, InteractionResult, Phase};
pub use error::{ConfigError, Error, InvalidStateError, NotInitializedError};
pub use model::{Agent, Opinion, Population};
pub use stats::Statistics;
