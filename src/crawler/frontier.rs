//! Crawl frontier shared by all workers
//!
//! The queue, the visited set, the results map and the in-flight counter
//! live behind one mutex. Every method takes the lock once, does its work
//! and releases it before returning, so the lock is never held across an
//! `.await`.

use crate::crawler::result::{CrawlStats, PageResult};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Normalized absolute URL
    pub url: String,
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Answer to a worker asking for work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// A task to process; the budget slot is held until `complete`
    Task(CrawlTask),
    /// Nothing queued, but in-flight tasks may still discover links
    Wait,
    /// Queue drained or budget exhausted
    Done,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlTask>,
    seen: HashSet<String>,
    results: BTreeMap<String, PageResult>,
    in_flight: usize,
    stats: CrawlStats,
}

/// Breadth-first frontier with a page budget
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    max_pages: usize,
    notify: Notify,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            max_pages,
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a task unless its URL was enqueued before
    ///
    /// Returns true if the task was added.
    pub fn push(&self, task: CrawlTask) -> bool {
        let added = Self::push_locked(&mut self.lock(), task);
        if added {
            self.notify.notify_waiters();
        }
        added
    }

    fn push_locked(state: &mut FrontierState, task: CrawlTask) -> bool {
        if state.seen.insert(task.url.clone()) {
            state.queue.push_back(task);
            true
        } else {
            false
        }
    }

    pub fn is_seen(&self, url: &str) -> bool {
        self.lock().seen.contains(url)
    }

    /// Number of queued tasks not yet reserved
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// Pops the next task if the budget allows it
    ///
    /// A reservation counts against the budget immediately, so
    /// `results + in_flight` never exceeds `max_pages`.
    pub fn try_reserve(&self) -> Reservation {
        let mut state = self.lock();

        if state.results.len() + state.in_flight >= self.max_pages {
            return Reservation::Done;
        }

        match state.queue.pop_front() {
            Some(task) => {
                state.in_flight += 1;
                Reservation::Task(task)
            }
            None if state.in_flight > 0 => Reservation::Wait,
            None => Reservation::Done,
        }
    }

    /// Waits until a task is available or the crawl is over
    pub async fn next_task(&self) -> Option<CrawlTask> {
        loop {
            // Register interest before checking so a completion between the
            // check and the await is not missed
            let notified = self.notify.notified();

            match self.try_reserve() {
                Reservation::Task(task) => return Some(task),
                Reservation::Done => {
                    self.notify.notify_waiters();
                    return None;
                }
                Reservation::Wait => notified.await,
            }
        }
    }

    /// Stores the result of a reserved task and enqueues what it discovered
    ///
    /// Returns the number of stored results.
    pub fn complete(&self, result: PageResult, discovered: Vec<CrawlTask>) -> usize {
        let stored = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.stats.record(result.state);
            state.results.insert(result.url.clone(), result);
            for task in discovered {
                Self::push_locked(&mut state, task);
            }
            state.results.len()
        };

        self.notify.notify_waiters();
        stored
    }

    /// Moves the collected results and counters out of the frontier
    pub fn take_results(&self) -> (BTreeMap<String, PageResult>, CrawlStats) {
        let mut state = self.lock();
        (
            std::mem::take(&mut state.results),
            std::mem::take(&mut state.stats),
        )
    }
}
