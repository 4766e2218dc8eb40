use log::info;
use std::sync::Arc;
use teller_sim::{ConsoleReporter, Simulation, SimulationParameters};

/// Twenty customers, first with a teller each, then through four tellers.
fn run_comparison() -> Result<(), Box<dyn std::error::Error>> {
    let mut simulation = Simulation::new(SimulationParameters {
        capacity: 4,
        customer_count: 20,
        ..Default::default()
    })
    .with_reporter(Arc::new(ConsoleReporter));

    let comparison = simulation.run_comparison()?;
    info!(
        "Unbounded used {} tellers, bounded used {}",
        comparison.unbounded.tellers_used(),
        comparison.bounded.tellers_used()
    );
    Ok(())
}

/// The same twenty customers' worth of work, through a single teller.
fn run_single_counter() -> Result<(), Box<dyn std::error::Error>> {
    let mut simulation = Simulation::new(SimulationParameters {
        capacity: 1,
        customer_count: 20,
        ..Default::default()
    })
    .with_reporter(Arc::new(ConsoleReporter));

    simulation.run_bounded()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    run_comparison()?;
    run_single_counter()
}
