use crate::dispatch::{Discipline, DispatchOutcome};
use crate::error::SimulationError;
use crate::station::{Counter, ServiceStation, StationSnapshot, WorkerId};
use std::fmt;
use std::time::Duration;

/// The end-of-run statistics for one discipline.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationMetrics {
    pub discipline: Discipline,
    pub customer_count: usize,
    pub total_served: usize,
    /// Sum of every collected service duration.
    pub total_service_time: Duration,
    /// Total queue wait divided by the number of customers.
    pub average_queue_wait: Duration,
    /// Total service time divided by the number of customers served.
    pub average_service_time: Duration,
    pub counters: Vec<(WorkerId, Counter)>,
    /// Results the dispatcher stopped waiting for.
    pub timed_out: usize,
    pub peak_in_service: usize,
}

impl SimulationMetrics {
    pub fn compute(
        discipline: Discipline,
        snapshot: StationSnapshot,
        customer_count: usize,
        outcome: &DispatchOutcome,
    ) -> Result<Self, SimulationError> {
        if customer_count == 0 {
            return Err(SimulationError::Configuration(
                "cannot average over zero customers".to_owned(),
            ));
        }
        if snapshot.total_served == 0 {
            return Err(SimulationError::Configuration(
                "cannot average over zero served customers".to_owned(),
            ));
        }

        let total_service_time: Duration = outcome.collected().sum();

        Ok(Self {
            discipline,
            customer_count,
            total_served: snapshot.total_served,
            total_service_time,
            average_queue_wait: snapshot.total_queue_wait.div_f64(customer_count as f64),
            average_service_time: total_service_time.div_f64(snapshot.total_served as f64),
            counters: snapshot.counters,
            timed_out: outcome.timed_out(),
            peak_in_service: snapshot.peak_in_service,
        })
    }

    /// How many distinct tellers ended up serving somebody.
    pub fn tellers_used(&self) -> usize {
        self.counters.len()
    }

    pub fn priority_served(&self) -> usize {
        self.counters.iter().map(|(_, c)| c.priority_served).sum()
    }

    /// Whether the per-teller tallies add up to the station total.
    pub fn counters_balance(&self) -> bool {
        self.counters.iter().map(|(_, c)| c.served).sum::<usize>() == self.total_served
    }
}

impl fmt::Display for SimulationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n------------ Metrics - {} ------------", self.discipline)?;
        for (worker, counter) in &self.counters {
            writeln!(
                f,
                "{worker} served {} customer(s), {} with priority",
                counter.served, counter.priority_served
            )?;
        }

        writeln!(f, "\nTellers used: {}", self.tellers_used())?;
        writeln!(f, "Peak concurrent services: {}", self.peak_in_service)?;
        if self.timed_out > 0 {
            writeln!(f, "Abandoned results: {}", self.timed_out)?;
        }

        writeln!(
            f,
            "\nTotal time: {:.2} s",
            self.total_service_time.as_secs_f64()
        )?;
        writeln!(
            f,
            "Average queue wait: {:.2} s",
            self.average_queue_wait.as_secs_f64()
        )?;
        write!(
            f,
            "Average service time: {:.2} s",
            self.average_service_time.as_secs_f64()
        )
    }
}

/// Computes the metrics for a finished run and hands them to the station's
/// reporter.
pub fn report(
    discipline: Discipline,
    station: &ServiceStation,
    customer_count: usize,
    outcome: &DispatchOutcome,
) -> Result<SimulationMetrics, SimulationError> {
    let metrics =
        SimulationMetrics::compute(discipline, station.snapshot(), customer_count, outcome)?;
    station.reporter().metrics(&metrics);
    Ok(metrics)
}
