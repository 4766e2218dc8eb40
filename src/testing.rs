//! Test doubles shared by the unit tests.

use crate::customer::Customer;
use crate::dispatch::Discipline;
use crate::metrics::SimulationMetrics;
use crate::reporter::Reporter;
use crate::station::WorkerId;
use crate::timer::ServiceTimer;
use parking_lot::Mutex;
use rand::Rng;
use std::time::Duration;

pub(crate) fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    RunStarted(Discipline, usize),
    Started(WorkerId, usize),
    Completed(WorkerId, usize),
    TimedOut(usize),
    Metrics(Discipline),
}

/// Remembers every hook call, in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub(crate) fn started_ids(&self) -> Vec<usize> {
        self.ids(|e| match e {
            Event::Started(_, id) => Some(*id),
            _ => None,
        })
    }

    pub(crate) fn completed_ids(&self) -> Vec<usize> {
        self.ids(|e| match e {
            Event::Completed(_, id) => Some(*id),
            _ => None,
        })
    }

    pub(crate) fn timed_out_ids(&self) -> Vec<usize> {
        self.ids(|e| match e {
            Event::TimedOut(id) => Some(*id),
            _ => None,
        })
    }

    fn ids(&self, pick: impl Fn(&Event) -> Option<usize>) -> Vec<usize> {
        self.events.lock().iter().filter_map(pick).collect()
    }
}

impl Reporter for RecordingReporter {
    fn run_started(&self, discipline: Discipline, customer_count: usize) {
        self.events
            .lock()
            .push(Event::RunStarted(discipline, customer_count));
    }

    fn service_started(&self, worker: WorkerId, customer: &Customer) {
        self.events.lock().push(Event::Started(worker, customer.id()));
    }

    fn service_completed(&self, worker: WorkerId, customer: &Customer, _elapsed: Duration) {
        self.events
            .lock()
            .push(Event::Completed(worker, customer.id()));
    }

    fn result_timed_out(&self, customer: &Customer, _waited: Duration) {
        self.events.lock().push(Event::TimedOut(customer.id()));
    }

    fn metrics(&self, metrics: &SimulationMetrics) {
        self.events.lock().push(Event::Metrics(metrics.discipline));
    }
}

/// Holds one particular customer far longer than everyone else.
#[derive(Clone, Debug)]
pub(crate) struct SlowCustomerTimer {
    pub usual: Duration,
    pub slow_customer: usize,
    pub slow: Duration,
}

impl ServiceTimer for SlowCustomerTimer {
    fn service_time(&self, customer: &Customer) -> Duration {
        if customer.id() == self.slow_customer {
            self.slow
        } else {
            self.usual
        }
    }
}

/// The production timer scaled down from seconds to milliseconds.
#[derive(Clone, Debug)]
pub(crate) struct UniformMillisTimer {
    pub min_millis: u64,
    pub max_millis: u64,
}

impl ServiceTimer for UniformMillisTimer {
    fn service_time(&self, _customer: &Customer) -> Duration {
        Duration::from_millis(rand::rng().random_range(self.min_millis..=self.max_millis))
    }
}
