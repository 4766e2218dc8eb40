pub mod config;
pub mod customer;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod reporter;
pub mod station;
pub mod timer;

#[cfg(test)]
mod testing;

pub use config::SimulationParameters;
pub use customer::{Customer, Priority, ServiceType};
pub use dispatch::{BoundedPool, Discipline, DispatchOutcome, DispatchStrategy, Unbounded};
pub use error::SimulationError;
pub use metrics::SimulationMetrics;
pub use reporter::{ConsoleReporter, Reporter, SilentReporter};
pub use station::{Counter, ServiceStation, StationSnapshot, WorkerId};
pub use timer::{FixedServiceTimer, ServiceTimer, UniformServiceTimer};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// The current state of a Simulation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SimulationState {
    /// The Simulation has only been constructed.
    Constructed,
    /// The Simulation is actively serving customers.
    Running,
    /// The last run finished and produced metrics.
    Completed,
    /// The last run was rejected or aborted.
    Failed,
}

/// Both disciplines' metrics from one comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub unbounded: SimulationMetrics,
    pub bounded: SimulationMetrics,
}

/// A Simulation drives customers through a service counter.
///
/// Each run generates a fresh batch of customers, builds its own
/// [`ServiceStation`] so metrics never mix between runs, dispatches the
/// customers under one discipline and reports the resulting metrics.
///
/// The unbounded discipline serves customers in generation order. The
/// bounded discipline admits them in priority order, since that is the only
/// place a scarce pool of tellers makes priority meaningful.
pub struct Simulation {
    parameters: SimulationParameters,
    reporter: Arc<dyn Reporter>,
    rng: StdRng,
    state: SimulationState,
}

impl Simulation {
    pub fn new(parameters: SimulationParameters) -> Self {
        let rng = parameters
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Self {
            parameters,
            reporter: Arc::new(SilentReporter),
            rng,
            state: SimulationState::Constructed,
        }
    }

    /// Sends narration and metrics to `reporter` instead of discarding them.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub const fn state(&self) -> SimulationState {
        self.state
    }

    pub const fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// One teller per customer, customers in generation order.
    pub fn run_unbounded(&mut self) -> Result<SimulationMetrics, SimulationError> {
        self.checked(|sim| {
            let customers = customer::generate(sim.parameters.customer_count, &mut sim.rng);
            sim.serve(&Unbounded, customers)
        })
    }

    /// A pool of `capacity` tellers, customers admitted in priority order.
    pub fn run_bounded(&mut self) -> Result<SimulationMetrics, SimulationError> {
        self.checked(|sim| {
            let customers =
                customer::generate_priority_ordered(sim.parameters.customer_count, &mut sim.rng);
            let pool = sim.parameters.bounded_pool();
            sim.serve(&pool, customers)
        })
    }

    /// Runs the unbounded discipline, then the bounded one, on separate
    /// stations and with separately generated customers.
    pub fn run_comparison(&mut self) -> Result<Comparison, SimulationError> {
        let unbounded = self.run_unbounded()?;
        let bounded = self.run_bounded()?;
        Ok(Comparison { unbounded, bounded })
    }

    /// Serves an explicit batch of customers under `strategy`.
    pub fn run_with(
        &mut self,
        strategy: &dyn DispatchStrategy,
        customers: Vec<Customer>,
    ) -> Result<SimulationMetrics, SimulationError> {
        self.checked(|sim| sim.serve(strategy, customers))
    }

    /// Validates the parameters, then tracks the run's state around `run`.
    fn checked<T>(
        &mut self,
        run: impl FnOnce(&mut Self) -> Result<T, SimulationError>,
    ) -> Result<T, SimulationError> {
        if let Err(e) = self.parameters.validate() {
            self.state = SimulationState::Failed;
            return Err(e);
        }

        self.state = SimulationState::Running;
        let result = run(self);
        self.state = match result {
            Ok(_) => SimulationState::Completed,
            Err(_) => SimulationState::Failed,
        };
        result
    }

    fn serve(
        &self,
        strategy: &dyn DispatchStrategy,
        customers: Vec<Customer>,
    ) -> Result<SimulationMetrics, SimulationError> {
        let discipline = strategy.discipline();
        let customer_count = customers.len();
        if customer_count == 0 {
            return Err(SimulationError::Configuration(
                "no customers to serve".to_owned(),
            ));
        }

        let station = Arc::new(ServiceStation::new(
            self.parameters.service_timer.clone(),
            Arc::clone(&self.reporter),
        ));

        info!("Serving {customer_count} customers: {discipline}");
        self.reporter.run_started(discipline, customer_count);
        let outcome = strategy.dispatch(&station, customers)?;

        let metrics = metrics::report(discipline, &station, customer_count, &outcome)?;
        debug!("Finished {discipline}: {metrics:?}");
        Ok(metrics)
    }
}
