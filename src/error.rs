//! Errors raised by the library's own machinery.
//!
//! Stream failures are not represented here: they travel through each
//! publisher's `Err` type parameter.

use thiserror::Error;

/// A scheduler could not accept a task.
#[derive(Debug, Error)]
pub enum ScheduleError {
  /// The [`TaskQueue`](crate::scheduler::TaskQueue) was closed by its owner.
  #[error("task queue is closed")]
  QueueClosed,
  /// The executor refused the task, usually because it is shutting down.
  #[error("executor refused the task: {0}")]
  Spawn(#[from] futures::task::SpawnError),
}
