//! Cooperative task scheduler
//!
//! Portable periodic scheduling without async/await or platform-specific
//! timers. The caller polls [`Scheduler::execute`] from its main loop with the
//! current time; each due task runs at most once per pass.
//!
//! If the loop stalls for several periods, the backlog is skipped instead of
//! replayed: a task's next run is measured from the pass that ran it.

use core::fmt;

use embassy_time::{Duration, Instant};
use heapless::Vec;

/// How many times a task runs after being enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    /// Runs until disabled
    Forever,
    /// Runs the given number of times, then disables itself
    Bounded(u32),
}

/// Registration data for a task
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec<K> {
    pub id: K,
    pub period: Duration,
    pub iterations: Iterations,
    pub enabled: bool,
}

/// Information handed to the task callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    /// Runs since the task was last enabled, starting at 1
    pub count: u32,
    /// This run used up the last bounded iteration
    pub last: bool,
}

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// No room for another task
    Full,
    /// A task with the same id is already registered
    Duplicate,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::Full => write!(f, "scheduler is full"),
            SchedulerError::Duplicate => write!(f, "task already registered"),
        }
    }
}

#[derive(Debug, Clone)]
struct Task<K> {
    id: K,
    period: Duration,
    iterations: Iterations,
    remaining: u32,
    enabled: bool,
    /// `None` until the first run after enabling, which makes it due at once
    last_run: Option<Instant>,
    run_count: u32,
    last_iteration: bool,
}

impl<K: Copy> Task<K> {
    const fn budget(iterations: Iterations) -> u32 {
        match iterations {
            Iterations::Forever => 0,
            Iterations::Bounded(count) => count,
        }
    }

    /// Enable with a fresh iteration budget
    fn arm(&mut self) {
        self.remaining = Self::budget(self.iterations);
        self.resume();
    }

    /// Enable with whatever budget is left; an exhausted bounded task stays off
    fn resume(&mut self) {
        self.last_run = None;
        self.run_count = 0;
        self.last_iteration = false;
        self.enabled = match self.iterations {
            Iterations::Forever => true,
            Iterations::Bounded(_) => self.remaining > 0,
        };
    }

    /// Advance bookkeeping if the task is due
    fn poll(&mut self, now: Instant) -> Option<Iteration> {
        if !self.enabled {
            return None;
        }
        if let Some(last_run) = self.last_run {
            if now.saturating_duration_since(last_run) < self.period {
                return None;
            }
        }

        self.last_run = Some(now);
        self.run_count = self.run_count.saturating_add(1);

        let last = match self.iterations {
            Iterations::Forever => false,
            Iterations::Bounded(_) => {
                self.remaining = self.remaining.saturating_sub(1);
                self.remaining == 0
            }
        };
        if last {
            // Disabled before the callback so the callback may restart it
            self.enabled = false;
        }
        self.last_iteration = last;

        Some(Iteration {
            count: self.run_count,
            last,
        })
    }
}

/// Fixed-capacity cooperative scheduler
///
/// Tasks run in registration order. `K` identifies a task; the callback
/// passed to [`execute`](Self::execute) dispatches on it.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = Scheduler::<Job, 2>::new();
/// scheduler.add(TaskSpec { id: Job::Sample, period, iterations: Iterations::Forever, enabled: true })?;
///
/// loop {
///     scheduler.execute(now(), |scheduler, job, iteration| match job {
///         Job::Sample => sample(),
///         Job::Burst => scheduler.disable(Job::Sample),
///     });
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<K, const N: usize> {
    tasks: Vec<Task<K>, N>,
}

impl<K: Copy + Eq, const N: usize> Scheduler<K, N> {
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a task
    ///
    /// Tasks registered as enabled are due on the first pass.
    pub fn add(&mut self, spec: TaskSpec<K>) -> Result<(), SchedulerError> {
        if self.find(spec.id).is_some() {
            return Err(SchedulerError::Duplicate);
        }
        let mut task = Task {
            id: spec.id,
            period: spec.period,
            iterations: spec.iterations,
            remaining: Task::<K>::budget(spec.iterations),
            enabled: false,
            last_run: None,
            run_count: 0,
            last_iteration: false,
        };
        if spec.enabled {
            task.arm();
        }
        self.tasks.push(task).map_err(|_| SchedulerError::Full)
    }

    /// Enable a task, due on the next pass
    ///
    /// Enabling an already enabled task changes nothing. A bounded task keeps
    /// the iterations it has left, so one that ran out stays disabled until
    /// [`restart`](Self::restart).
    pub fn enable(&mut self, id: K) {
        if let Some(task) = self.find_mut(id) {
            if !task.enabled {
                task.resume();
            }
        }
    }

    /// Disable a task. Disabling a disabled task changes nothing.
    pub fn disable(&mut self, id: K) {
        if let Some(task) = self.find_mut(id) {
            task.enabled = false;
        }
    }

    /// Reset the iteration budget and enable the task, due on the next pass
    pub fn restart(&mut self, id: K) {
        if let Some(task) = self.find_mut(id) {
            task.arm();
        }
    }

    /// Change the period of a task; takes effect on its next due check
    pub fn set_period(&mut self, id: K, period: Duration) {
        if let Some(task) = self.find_mut(id) {
            task.period = period;
        }
    }

    pub fn is_enabled(&self, id: K) -> bool {
        self.find(id).is_some_and(|task| task.enabled)
    }

    /// True only while the callback of a bounded task's final run executes
    pub fn is_last_iteration(&self, id: K) -> bool {
        self.find(id).is_some_and(|task| task.last_iteration)
    }

    /// Runs since the task was last enabled
    pub fn run_count(&self, id: K) -> u32 {
        self.find(id).map(|task| task.run_count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run one pass over all tasks
    ///
    /// Every enabled task whose period has elapsed since its last run is
    /// handed to `run` together with the scheduler, so callbacks can enable,
    /// disable or restart tasks. A task enabled by an earlier callback in the
    /// same pass runs later in that pass if it is registered after it.
    ///
    /// Returns the number of callbacks invoked.
    pub fn execute<F>(&mut self, now: Instant, mut run: F) -> usize
    where
        F: FnMut(&mut Self, K, Iteration),
    {
        let mut invoked = 0;
        for index in 0..self.tasks.len() {
            let task = &mut self.tasks[index];
            let Some(iteration) = task.poll(now) else {
                continue;
            };
            let id = task.id;

            run(self, id, iteration);
            invoked += 1;

            self.tasks[index].last_iteration = false;
        }
        invoked
    }

    fn find(&self, id: K) -> Option<&Task<K>> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn find_mut(&mut self, id: K) -> Option<&mut Task<K>> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

impl<K: Copy + Eq, const N: usize> Default for Scheduler<K, N> {
    fn default() -> Self {
        Self::new()
    }
}
