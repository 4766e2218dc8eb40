use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong while setting up or running a Simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The parameters describe a run whose metrics would be undefined,
    /// e.g. zero customers or a pool with no tellers.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A customer's service result was not available within the collection
    /// window. Recoverable: the bounded dispatcher logs it and moves on.
    #[error("no service result for {customer} after {waited:?}")]
    ResultTimeout { customer: String, waited: Duration },

    /// An execution unit could not be created.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker unit terminated abnormally.
    #[error("worker {0} panicked")]
    WorkerPanicked(String),

    /// The pool's job queue or a result channel closed with work outstanding.
    #[error("worker pool disconnected: {0}")]
    PoolDisconnected(String),
}

impl SimulationError {
    /// Whether the run can carry on after this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ResultTimeout { .. })
    }
}
