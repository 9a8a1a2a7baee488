//! Event channels of the simulation engine.
//!
//! Each channel holds at most one handler. Handlers are called
//! synchronously, inside the engine call that produced the event.

use crate::engine::InteractionResult;
use crate::stats::Statistics;

pub type InteractionHandler = Box<dyn FnMut(&InteractionResult, &Statistics)>;
pub type StatisticsHandler = Box<dyn FnMut(&Statistics)>;

#[derive(Default)]
pub(crate) struct Handlers {
    interaction_complete: Option<InteractionHandler>,
    progress_update: Option<StatisticsHandler>,
    simulation_complete: Option<StatisticsHandler>,
}

impl Handlers {
    pub(crate) fn set_interaction_complete(&mut self, handler: InteractionHandler) {
        self.interaction_complete = Some(handler);
    }

    pub(crate) fn set_progress_update(&mut self, handler: StatisticsHandler) {
        self.progress_update = Some(handler);
    }

    pub(crate) fn set_simulation_complete(&mut self, handler: StatisticsHandler) {
        self.simulation_complete = Some(handler);
    }

    /// Remove every handler.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn interaction_complete(&mut self, result: &InteractionResult, stats: &Statistics) {
        if let Some(handler) = self.interaction_complete.as_mut() {
            handler(result, stats);
        }
    }

    pub(crate) fn progress_update(&mut self, stats: &Statistics) {
        if let Some(handler) = self.progress_update.as_mut() {
            handler(stats);
        }
    }

    pub(crate) fn simulation_complete(&mut self, stats: &Statistics) {
        if let Some(handler) = self.simulation_complete.as_mut() {
            handler(stats);
        }
    }
}
