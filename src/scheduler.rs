//! Schedulers decide where and when deferred work runs.
//!
//! [`ObserveOn`](crate::ops::observe_on::ObserveOn) turns every notification
//! into a [`Task`] and hands it to a [`Scheduler`]. The crate ships:
//!
//! - [`TaskQueue`], a FIFO queue drained explicitly by its owner. It plays the
//!   role of a UI "main thread": work is queued from anywhere on that thread
//!   and runs, in order, when the owner calls
//!   [`run_until_idle`](TaskQueue::run_until_idle).
//! - `futures::executor::LocalSpawner`, which keeps FIFO order as well.
//! - `futures::executor::ThreadPool` (feature `futures-scheduler`) and
//!   `tokio::runtime::Handle` (feature `tokio-scheduler`). Tasks run on
//!   worker threads and may overlap, so only delivery, not ordering, is
//!   guaranteed there.

use std::collections::VecDeque;

use futures::{executor::LocalSpawner, task::LocalSpawnExt};

use crate::{
  error::ScheduleError,
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// A unit of deferred work.
pub trait Task {
  fn run(self);
}

/// Accepts tasks of type `T` for later execution.
pub trait Scheduler<T: Task> {
  fn schedule(&self, task: T) -> Result<(), ScheduleError>;
}

// ============================================================================
// TaskQueue
// ============================================================================

#[derive(Default)]
struct QueueState {
  tasks: VecDeque<Box<dyn FnOnce()>>,
  closed: bool,
}

/// Single-threaded FIFO task queue.
///
/// Clones share the same queue. Tasks scheduled while the queue is being
/// drained run in the same drain, after everything queued before them.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let queue = TaskQueue::new();
/// let seen = Rc::new(RefCell::new(vec![]));
///
/// let c_seen = seen.clone();
/// let _guard = Local::from_iter([1, 2, 3])
///   .observe_on(queue.clone())
///   .subscribe(move |v| c_seen.borrow_mut().push(v));
/// assert!(seen.borrow().is_empty());
///
/// assert_eq!(queue.run_until_idle(), 4);
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Default)]
pub struct TaskQueue {
  state: MutRc<QueueState>,
}

impl TaskQueue {
  pub fn new() -> Self { Self::default() }

  /// Run the oldest task. Returns `false` if the queue was empty.
  pub fn run_one(&self) -> bool {
    let task = self.state.rc_deref_mut().tasks.pop_front();
    match task {
      Some(task) => {
        task();
        true
      }
      None => false,
    }
  }

  /// Run tasks until the queue is empty, including tasks scheduled by the
  /// tasks themselves. Returns how many ran.
  pub fn run_until_idle(&self) -> usize {
    let mut ran = 0;
    while self.run_one() {
      ran += 1;
    }
    if ran > 0 {
      tracing::trace!(ran, "task queue drained");
    }
    ran
  }

  pub fn len(&self) -> usize { self.state.rc_deref().tasks.len() }

  pub fn is_empty(&self) -> bool { self.state.rc_deref().tasks.is_empty() }

  /// Refuse further tasks and drop the queued ones.
  pub fn close(&self) {
    let dropped = {
      let mut state = self.state.rc_deref_mut();
      state.closed = true;
      std::mem::take(&mut state.tasks)
    };
    tracing::debug!(dropped = dropped.len(), "task queue closed");
  }

  pub fn is_closed(&self) -> bool { self.state.rc_deref().closed }
}

impl<T: Task + 'static> Scheduler<T> for TaskQueue {
  fn schedule(&self, task: T) -> Result<(), ScheduleError> {
    let mut state = self.state.rc_deref_mut();
    if state.closed {
      return Err(ScheduleError::QueueClosed);
    }
    state.tasks.push_back(Box::new(move || task.run()));
    Ok(())
  }
}

// ============================================================================
// Executor adapters
// ============================================================================

impl<T: Task + 'static> Scheduler<T> for LocalSpawner {
  fn schedule(&self, task: T) -> Result<(), ScheduleError> {
    self.spawn_local(async move { task.run() })?;
    Ok(())
  }
}

#[cfg(feature = "futures-scheduler")]
impl<T: Task + Send + 'static> Scheduler<T> for futures::executor::ThreadPool {
  fn schedule(&self, task: T) -> Result<(), ScheduleError> {
    self.spawn_ok(async move { task.run() });
    Ok(())
  }
}

#[cfg(feature = "tokio-scheduler")]
impl<T: Task + Send + 'static> Scheduler<T> for tokio::runtime::Handle {
  fn schedule(&self, task: T) -> Result<(), ScheduleError> {
    drop(self.spawn(async move { task.run() }));
    Ok(())
  }
}
