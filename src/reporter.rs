use crate::customer::Customer;
use crate::dispatch::Discipline;
use crate::metrics::SimulationMetrics;
use crate::station::WorkerId;
use std::time::Duration;

/// Receives narration from a running Simulation.
///
/// Hooks are called from worker threads while customers are being served,
/// so implementations must be thread safe. Every hook defaults to doing
/// nothing.
pub trait Reporter: Send + Sync {
    fn run_started(&self, _discipline: Discipline, _customer_count: usize) {}

    fn service_started(&self, _worker: WorkerId, _customer: &Customer) {}

    fn service_completed(&self, _worker: WorkerId, _customer: &Customer, _elapsed: Duration) {}

    fn result_timed_out(&self, _customer: &Customer, _waited: Duration) {}

    fn metrics(&self, _metrics: &SimulationMetrics) {}
}

/// Prints everything to stdout, one event per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn run_started(&self, discipline: Discipline, customer_count: usize) {
        println!("\n------------ Serving {customer_count} customers: {discipline} ------------");
    }

    fn service_started(&self, worker: WorkerId, customer: &Customer) {
        if customer.priority().is_preferential() {
            println!(
                "\n{worker} is serving {customer} - {} for {}",
                customer.priority(),
                customer.service()
            );
        } else {
            println!("\n{worker} is serving {customer} for {}", customer.service());
        }
    }

    fn service_completed(&self, worker: WorkerId, customer: &Customer, _elapsed: Duration) {
        println!("{customer} served by {worker}");
    }

    fn result_timed_out(&self, customer: &Customer, waited: Duration) {
        println!("Timeout waiting {:.2} s for {customer}", waited.as_secs_f64());
    }

    fn metrics(&self, metrics: &SimulationMetrics) {
        println!("{metrics}");
    }
}

/// Says nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}
