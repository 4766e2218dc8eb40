//! The shared Service Station.
//!
//! Every serving thread calls [`ServiceStation::serve`] on the same instance.
//! All bookkeeping for one service event happens inside a single
//! critical section on the ledger, so concurrent calls never lose updates.

use crate::customer::Customer;
use crate::reporter::Reporter;
use crate::timer::ServiceTimer;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Stable label for one concurrent execution unit, assigned when the unit is
/// created: the pool slot index for bounded runs, the spawn index otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Teller {}", self.0 + 1)
    }
}

/// Per-teller service tally.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counter {
    pub served: usize,
    pub priority_served: usize,
}

#[derive(Debug, Default)]
struct Ledger {
    counters: HashMap<WorkerId, Counter>,
    total_served: usize,
    total_queue_wait: Duration,
}

/// A consistent copy of the station's statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationSnapshot {
    /// Per-teller counters, sorted by teller.
    pub counters: Vec<(WorkerId, Counter)>,
    pub total_served: usize,
    pub total_queue_wait: Duration,
    /// Most `serve` calls ever observed running at once.
    pub peak_in_service: usize,
}

pub struct ServiceStation {
    ledger: Mutex<Ledger>,
    in_service: AtomicUsize,
    peak_in_service: AtomicUsize,
    timer: Box<dyn ServiceTimer>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for ServiceStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceStation")
            .field("ledger", &*self.ledger.lock())
            .field("in_service", &self.in_service)
            .field("peak_in_service", &self.peak_in_service)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

/// Tracks one in-flight `serve` call for the occupancy gauges.
struct InService<'a> {
    station: &'a ServiceStation,
}

impl<'a> InService<'a> {
    fn enter(station: &'a ServiceStation) -> Self {
        let now = station.in_service.fetch_add(1, Ordering::SeqCst) + 1;
        station.peak_in_service.fetch_max(now, Ordering::SeqCst);
        Self { station }
    }
}

impl Drop for InService<'_> {
    fn drop(&mut self) {
        self.station.in_service.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ServiceStation {
    pub fn new(timer: Box<dyn ServiceTimer>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            ledger: Mutex::new(Ledger::default()),
            in_service: AtomicUsize::new(0),
            peak_in_service: AtomicUsize::new(0),
            timer,
            reporter,
        }
    }

    /// Serves one customer on behalf of `worker`, blocking the calling
    /// thread for the simulated service time. Returns the elapsed time.
    pub fn serve(&self, worker: WorkerId, customer: &Customer) -> Duration {
        let started = Instant::now();
        let _in_service = InService::enter(self);

        {
            let mut ledger = self.ledger.lock();
            let counter = ledger.counters.entry(worker).or_default();
            counter.served += 1;
            if customer.priority().is_preferential() {
                counter.priority_served += 1;
            }
            ledger.total_served += 1;

            if let Some(queued_at) = customer.queued_at() {
                ledger.total_queue_wait += started.saturating_duration_since(queued_at);
            }
        }

        self.reporter.service_started(worker, customer);

        let service_time = self.timer.service_time(customer);
        debug!("{worker} holding {customer} for {service_time:?}");
        thread::sleep(service_time);

        let elapsed = started.elapsed();
        self.reporter.service_completed(worker, customer, elapsed);
        elapsed
    }

    /// Number of `serve` calls running right now.
    pub fn in_service(&self) -> usize {
        self.in_service.load(Ordering::SeqCst)
    }

    pub fn peak_in_service(&self) -> usize {
        self.peak_in_service.load(Ordering::SeqCst)
    }

    pub fn total_served(&self) -> usize {
        self.ledger.lock().total_served
    }

    pub fn snapshot(&self) -> StationSnapshot {
        let ledger = self.ledger.lock();
        let mut counters: Vec<(WorkerId, Counter)> =
            ledger.counters.iter().map(|(w, c)| (*w, *c)).collect();
        counters.sort_by_key(|(worker, _)| *worker);

        StationSnapshot {
            counters,
            total_served: ledger.total_served,
            total_queue_wait: ledger.total_queue_wait,
            peak_in_service: self.peak_in_service(),
        }
    }

    pub(crate) fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }
}
