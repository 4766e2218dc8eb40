use crate::dispatch::BoundedPool;
use crate::error::SimulationError;
use crate::timer::{ServiceTimer, UniformServiceTimer};
use std::time::Duration;

/// The parameters to create a Simulation.
#[derive(Clone, Debug)]
pub struct SimulationParameters {
    /// Size of the admission pool: how many customers the bounded discipline
    /// serves at once.
    pub capacity: usize,
    /// How many customers each run generates.
    pub customer_count: usize,
    /// How long the bounded discipline waits for any one result.
    pub result_timeout: Duration,
    /// Pause between consecutive bounded admissions.
    pub admission_pause: Duration,
    /// Source of per-customer service durations.
    pub service_timer: Box<dyn ServiceTimer>,
    /// Seed for customer generation. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            capacity: 4,
            customer_count: 20,
            result_timeout: Duration::from_secs(30),
            admission_pause: Duration::from_millis(1),
            service_timer: Box::new(UniformServiceTimer::default()),
            seed: None,
        }
    }
}

impl SimulationParameters {
    /// Rejects parameter sets whose runs would have undefined metrics.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.customer_count == 0 {
            return Err(SimulationError::Configuration(
                "customer_count must be at least 1".to_owned(),
            ));
        }
        if self.capacity == 0 {
            return Err(SimulationError::Configuration(
                "capacity must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// The bounded dispatcher these parameters describe.
    pub const fn bounded_pool(&self) -> BoundedPool {
        BoundedPool {
            capacity: self.capacity,
            result_timeout: self.result_timeout,
            admission_pause: self.admission_pause,
        }
    }
}
