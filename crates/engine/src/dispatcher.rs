//! Background delivery of brand events.
//!
//! A fixed pool of worker threads, each owning a FIFO queue. Events are routed
//! by brand id, so every event of one brand lands on the same worker and is
//! handled in publish order, never concurrently with another event of that
//! brand. Events of different brands proceed in parallel.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, warn};

use catalog_core::{Error, Result};

use crate::events::{BrandEvent, EventHandler, EventSink};

/// Dispatcher metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Number of events waiting in all queues.
    pub queue_depth: usize,
    /// Number of events currently being handled.
    pub in_flight: usize,
    /// Events the handler accepted.
    pub delivered: u64,
    /// Events dropped after exhausting every attempt.
    pub dead_lettered: u64,
    /// Events refused at publish time (queue full or shut down).
    pub rejected: u64,
    /// Number of worker threads.
    pub worker_count: usize,
}

struct WorkerQueue {
    events: Mutex<VecDeque<BrandEvent>>,
    work_ready: Condvar,
}

struct DispatcherInner {
    handler: Arc<dyn EventHandler>,
    queues: Vec<WorkerQueue>,
    // Guards the idle transition so drain() cannot miss a wakeup.
    idle_lock: Mutex<()>,
    drain_cond: Condvar,
    shutdown: AtomicBool,
    queue_depth: AtomicUsize,
    in_flight: AtomicUsize,
    queue_capacity: usize,
    max_attempts: u32,
    delivered: AtomicU64,
    dead_lettered: AtomicU64,
    rejected: AtomicU64,
}

impl DispatcherInner {
    fn is_idle(&self) -> bool {
        self.queue_depth.load(Ordering::Acquire) == 0
            && self.in_flight.load(Ordering::Acquire) == 0
    }

    /// Wake drain waiters if nothing is queued or in flight.
    fn notify_if_idle(&self) {
        if self.is_idle() {
            let _guard = self.idle_lock.lock();
            self.drain_cond.notify_all();
        }
    }

    fn reject(&self, event: &BrandEvent, reason: &str) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        warn!(target: "catalog::events", event = %event, reason, "Event rejected");
    }
}

/// Brand-sharded background event dispatcher.
///
/// Implements [`EventSink`]: `publish` only enqueues, the handler runs on a
/// worker thread.
pub struct EventDispatcher {
    inner: Arc<DispatcherInner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl EventDispatcher {
    /// Start `workers` threads delivering to `handler`.
    ///
    /// Workers are named `catalog-events-0`, `catalog-events-1`, etc.
    /// `queue_capacity` bounds the events waiting across all queues;
    /// `max_attempts` is the total number of tries per event.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker thread cannot be spawned.
    pub fn new(
        handler: Arc<dyn EventHandler>,
        workers: usize,
        queue_capacity: usize,
        max_attempts: u32,
    ) -> Result<Self> {
        let workers = workers.max(1);
        let inner = Arc::new(DispatcherInner {
            handler,
            queues: (0..workers)
                .map(|_| WorkerQueue {
                    events: Mutex::new(VecDeque::new()),
                    work_ready: Condvar::new(),
                })
                .collect(),
            idle_lock: Mutex::new(()),
            drain_cond: Condvar::new(),
            shutdown: AtomicBool::new(false),
            queue_depth: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            queue_capacity,
            max_attempts: max_attempts.max(1),
            delivered: AtomicU64::new(0),
            dead_lettered: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        });

        let dispatcher = Self {
            inner,
            workers: Mutex::new(Vec::with_capacity(workers)),
        };
        for i in 0..workers {
            let inner_clone = Arc::clone(&dispatcher.inner);
            let handle = std::thread::Builder::new()
                .name(format!("catalog-events-{}", i))
                .spawn(move || worker_loop(&inner_clone, i))
                // Dropping `dispatcher` on error joins the workers already started
                .map_err(Error::Io)?;
            dispatcher.workers.lock().push(handle);
        }
        Ok(dispatcher)
    }

    fn shard_for(&self, event: &BrandEvent) -> usize {
        (event.brand_id().as_u64() % self.inner.queues.len() as u64) as usize
    }

    /// Block until all queued and in-flight events have been handled.
    ///
    /// Workers remain running after drain completes.
    pub fn drain(&self) {
        let mut guard = self.inner.idle_lock.lock();
        while !self.inner.is_idle() {
            self.inner.drain_cond.wait(&mut guard);
        }
    }

    /// Stop accepting events, let workers finish what is queued, and join them.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::Release);

        // Lock each queue before notifying so a worker between its shutdown
        // check and wait() cannot miss the wakeup.
        for queue in &self.inner.queues {
            let _events = queue.events.lock();
            queue.work_ready.notify_all();
        }

        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }

    /// Return a snapshot of dispatcher metrics.
    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            queue_depth: self.inner.queue_depth.load(Ordering::Relaxed),
            in_flight: self.inner.in_flight.load(Ordering::Relaxed),
            delivered: self.inner.delivered.load(Ordering::Relaxed),
            dead_lettered: self.inner.dead_lettered.load(Ordering::Relaxed),
            rejected: self.inner.rejected.load(Ordering::Relaxed),
            worker_count: self.inner.queues.len(),
        }
    }
}

impl EventSink for EventDispatcher {
    fn publish(&self, event: BrandEvent) {
        let inner = &self.inner;
        let queue = &inner.queues[self.shard_for(&event)];
        {
            // Both checks happen under the queue lock: a worker only exits
            // after seeing `shutdown` under this same lock with its queue empty.
            let mut events = queue.events.lock();
            if inner.shutdown.load(Ordering::Acquire) {
                drop(events);
                inner.reject(&event, "dispatcher shut down");
                return;
            }
            if inner.queue_depth.fetch_add(1, Ordering::AcqRel) >= inner.queue_capacity {
                inner.queue_depth.fetch_sub(1, Ordering::AcqRel);
                drop(events);
                inner.notify_if_idle();
                inner.reject(&event, "queue full");
                return;
            }
            events.push_back(event);
        }
        queue.work_ready.notify_one();
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Decrements `in_flight` and wakes drain waiters on drop, even if the
/// handler panicked.
struct InFlightGuard<'a> {
    inner: &'a DispatcherInner,
}

impl<'a> Drop for InFlightGuard<'a> {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::Release);
        self.inner.notify_if_idle();
    }
}

fn worker_loop(inner: &DispatcherInner, shard: usize) {
    let queue = &inner.queues[shard];
    loop {
        let event = {
            let mut events = queue.events.lock();
            loop {
                if let Some(event) = events.pop_front() {
                    // in_flight goes up before queue_depth goes down so drain()
                    // never sees both at zero mid-handoff.
                    inner.in_flight.fetch_add(1, Ordering::Release);
                    inner.queue_depth.fetch_sub(1, Ordering::Release);
                    break event;
                }
                if inner.shutdown.load(Ordering::Acquire) {
                    return;
                }
                queue.work_ready.wait(&mut events);
            }
        };

        let _guard = InFlightGuard { inner };
        deliver(inner, &event);
    }
}

fn deliver(inner: &DispatcherInner, event: &BrandEvent) {
    for attempt in 1..=inner.max_attempts {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            inner.handler.handle(event)
        }));
        match outcome {
            Ok(Ok(())) => {
                inner.delivered.fetch_add(1, Ordering::Relaxed);
                return;
            }
            Ok(Err(e)) => {
                warn!(
                    target: "catalog::events",
                    event = %event,
                    attempt,
                    error = %e,
                    "Event handler failed"
                );
            }
            Err(panic) => {
                error!(
                    target: "catalog::events",
                    event = %event,
                    attempt,
                    "Event handler panicked: {}",
                    panic.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
                );
            }
        }
    }

    inner.dead_lettered.fetch_add(1, Ordering::Relaxed);
    error!(
        target: "catalog::events",
        event = %event,
        attempts = inner.max_attempts,
        "Event dead-lettered"
    );
}
