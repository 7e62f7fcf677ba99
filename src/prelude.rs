//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core traits
pub use crate::observable::{CoreObservable, Observable, ObservableType};
// Creation/Factories
pub use crate::observable::{Empty, FromIter, Of};
// Boxed types
pub use crate::observable::{
  BoxedObservable, BoxedObservableSend, DynObservable, DynObservableSend, IntoBoxedObservable,
};
// Observer trait
pub use crate::observer::{BoxedObserver, BoxedObserverSend, FnMutObserver, Observer, ObserverAll};
// Scheduler types
pub use crate::scheduler::{Scheduler, Task, TaskQueue};
// Subject
pub use crate::subject::*;
// Subscription
pub use crate::subscription::*;
pub use crate::{
  error::ScheduleError,
  scope::{Local, ObservableFactory, Scope, Shared},
};
