//! The two dispatch disciplines.
//!
//! [`Unbounded`] spawns one thread per customer and joins them all.
//! [`BoundedPool`] runs a fixed set of long-lived tellers that pull admitted
//! customers from one shared FIFO queue, so at most `capacity` customers are
//! ever in service at once.

use crate::customer::Customer;
use crate::error::SimulationError;
use crate::station::{ServiceStation, WorkerId};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How customers get to a teller.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Discipline {
    /// One teller per customer, everyone admitted immediately.
    Unbounded,
    /// A pool of `capacity` tellers gating admission.
    Bounded { capacity: usize },
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("no admission limit"),
            Self::Bounded { capacity } => write!(f, "admission pool of {capacity}"),
        }
    }
}

/// What a dispatcher hands back once every customer has been processed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Service durations in admission order. `None` marks a result the
    /// dispatcher stopped waiting for.
    pub durations: Vec<Option<Duration>>,
}

impl DispatchOutcome {
    /// The durations that were actually collected.
    pub fn collected(&self) -> impl Iterator<Item = Duration> + '_ {
        self.durations.iter().flatten().copied()
    }

    pub fn timed_out(&self) -> usize {
        self.durations.iter().filter(|d| d.is_none()).count()
    }
}

pub trait DispatchStrategy {
    fn discipline(&self) -> Discipline;

    /// Serves every customer against `station`, returning only once all of
    /// the work handed out has finished.
    fn dispatch(
        &self,
        station: &Arc<ServiceStation>,
        customers: Vec<Customer>,
    ) -> Result<DispatchOutcome, SimulationError>;
}

/// One thread per customer, no upper bound on concurrency.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl DispatchStrategy for Unbounded {
    fn discipline(&self) -> Discipline {
        Discipline::Unbounded
    }

    fn dispatch(
        &self,
        station: &Arc<ServiceStation>,
        customers: Vec<Customer>,
    ) -> Result<DispatchOutcome, SimulationError> {
        info!("Dispatching {} customers without admission limit", customers.len());

        let mut handles = Vec::with_capacity(customers.len());
        for (index, mut customer) in customers.into_iter().enumerate() {
            customer.mark_queued();
            let worker = WorkerId(index);
            let station = Arc::clone(station);
            let handle = thread::Builder::new()
                .name(worker.to_string())
                .spawn(move || station.serve(worker, &customer))?;
            handles.push((worker, handle));
        }

        // Join everything before surfacing the first failure.
        let mut durations = Vec::with_capacity(handles.len());
        let mut failure = None;
        for (worker, handle) in handles {
            match handle.join() {
                Ok(elapsed) => durations.push(Some(elapsed)),
                Err(_) if failure.is_none() => {
                    failure = Some(SimulationError::WorkerPanicked(worker.to_string()));
                }
                Err(_) => {}
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(DispatchOutcome { durations }),
        }
    }
}

/// A fixed pool of tellers fed from one FIFO admission queue.
#[derive(Clone, Copy, Debug)]
pub struct BoundedPool {
    pub capacity: usize,
    /// How long to wait for each customer's result before giving up on it.
    pub result_timeout: Duration,
    /// Pause between admissions, so consecutive stamps never collide.
    pub admission_pause: Duration,
}

impl BoundedPool {
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            result_timeout: Duration::from_secs(30),
            admission_pause: Duration::from_millis(1),
        }
    }

    fn spawn_teller(
        worker: WorkerId,
        station: Arc<ServiceStation>,
        queue: Receiver<Job>,
    ) -> Result<JoinHandle<()>, SimulationError> {
        let handle = thread::Builder::new()
            .name(worker.to_string())
            .spawn(move || {
                for job in &queue {
                    let elapsed = station.serve(worker, &job.customer);
                    // The collector may already have given up on this one.
                    let _ = job.reply.send(elapsed);
                }
                debug!("{worker} closing, admission queue drained");
            })?;
        Ok(handle)
    }

    fn collect(
        &self,
        customer: &Customer,
        result: &Receiver<Duration>,
    ) -> Result<Duration, SimulationError> {
        result.recv_timeout(self.result_timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => SimulationError::ResultTimeout {
                customer: customer.to_string(),
                waited: self.result_timeout,
            },
            RecvTimeoutError::Disconnected => {
                SimulationError::PoolDisconnected(format!("{customer} was dropped without a result"))
            }
        })
    }
}

struct Job {
    customer: Customer,
    reply: Sender<Duration>,
}

impl DispatchStrategy for BoundedPool {
    fn discipline(&self) -> Discipline {
        Discipline::Bounded {
            capacity: self.capacity,
        }
    }

    fn dispatch(
        &self,
        station: &Arc<ServiceStation>,
        customers: Vec<Customer>,
    ) -> Result<DispatchOutcome, SimulationError> {
        if self.capacity == 0 {
            return Err(SimulationError::Configuration(
                "admission pool needs at least one teller".to_owned(),
            ));
        }
        info!(
            "Dispatching {} customers through {} tellers",
            customers.len(),
            self.capacity
        );

        let (jobs, queue) = crossbeam_channel::unbounded::<Job>();
        let tellers = (0..self.capacity)
            .map(|slot| Self::spawn_teller(WorkerId(slot), Arc::clone(station), queue.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        drop(queue);

        let mut pending = Vec::with_capacity(customers.len());
        for mut customer in customers {
            customer.mark_queued();
            debug!("Admitting {customer} ({})", customer.priority());

            let (reply, result) = crossbeam_channel::bounded(1);
            pending.push((customer.clone(), result));
            jobs.send(Job { customer, reply }).map_err(|_| {
                SimulationError::PoolDisconnected("admission queue closed early".to_owned())
            })?;

            thread::sleep(self.admission_pause);
        }
        // Closing the queue lets each teller exit once it runs dry.
        drop(jobs);

        let mut durations = Vec::with_capacity(pending.len());
        let mut failure = None;
        for (customer, result) in &pending {
            match self.collect(customer, result) {
                Ok(elapsed) => durations.push(Some(elapsed)),
                Err(e) if e.is_recoverable() => {
                    warn!("{e}");
                    station.reporter().result_timed_out(customer, self.result_timeout);
                    durations.push(None);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        for (slot, teller) in tellers.into_iter().enumerate() {
            if teller.join().is_err() && failure.is_none() {
                failure = Some(SimulationError::WorkerPanicked(WorkerId(slot).to_string()));
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(DispatchOutcome { durations }),
        }
    }
}
