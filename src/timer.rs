use crate::customer::Customer;
use crate::error::SimulationError;
use dyn_clone::DynClone;
use rand::Rng;
use std::fmt::Debug;
use std::time::Duration;

/// Decides how long a customer holds a teller.
///
/// The Service Station blocks the serving thread for whatever this returns,
/// so tests can swap in millisecond timers instead of multi-second sleeps.
pub trait ServiceTimer: DynClone + Debug + Send + Sync {
    fn service_time(&self, customer: &Customer) -> Duration;
}

dyn_clone::clone_trait_object!(ServiceTimer);

/// A uniformly random whole number of seconds in `[min, max]`.
#[derive(Clone, Debug)]
pub struct UniformServiceTimer {
    min_secs: u64,
    max_secs: u64,
}

impl UniformServiceTimer {
    pub fn new(min_secs: u64, max_secs: u64) -> Result<Self, SimulationError> {
        if min_secs > max_secs {
            return Err(SimulationError::Configuration(format!(
                "service time range [{min_secs}, {max_secs}] is empty"
            )));
        }
        Ok(Self { min_secs, max_secs })
    }
}

impl Default for UniformServiceTimer {
    /// One to five seconds.
    fn default() -> Self {
        Self {
            min_secs: 1,
            max_secs: 5,
        }
    }
}

impl ServiceTimer for UniformServiceTimer {
    fn service_time(&self, _customer: &Customer) -> Duration {
        Duration::from_secs(rand::rng().random_range(self.min_secs..=self.max_secs))
    }
}

/// Every customer takes exactly the same time.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedServiceTimer(pub Duration);

impl ServiceTimer for FixedServiceTimer {
    fn service_time(&self, _customer: &Customer) -> Duration {
        self.0
    }
}
