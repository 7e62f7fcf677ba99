//! # rxcombine: publishers, subjects and combinators
//!
//! A small reactive-stream library: publishers emit values to subscribers,
//! subjects let imperative code push into a stream, and operators combine
//! streams. Every subscription is a handle that cancels when dropped.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, convert::Infallible, rc::Rc};
//!
//! use rxcombine::prelude::*;
//!
//! let mut username = Local::subject::<&str, Infallible>();
//! let mut password = Local::subject::<&str, Infallible>();
//!
//! let pairs = Rc::new(RefCell::new(vec![]));
//! let c_pairs = pairs.clone();
//! let guard =
//!   username.clone().zip(password.clone()).subscribe(move |pair| c_pairs.borrow_mut().push(pair));
//! username.next("u1");
//! password.next("p1");
//! drop(guard);
//! password.next("p2");
//!
//! assert_eq!(*pairs.borrow(), vec![("u1", "p1")]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Local`] / [`Shared`] | Scopes (single-thread vs thread-safe state) |
//! | [`Observable`] | Operators and `subscribe*` methods on every publisher |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` notifications |
//! | [`SubscriptionGuard`] | Handle that cancels its subscription on drop |
//! | [`TaskQueue`] | FIFO queue standing in for a UI main thread |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): `observe_on` a futures `ThreadPool`
//! - **`tokio-scheduler`**: `observe_on` a tokio runtime `Handle`
//!
//! [`Local`]: prelude::Local
//! [`Shared`]: prelude::Shared
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`SubscriptionGuard`]: subscription::SubscriptionGuard
//! [`TaskQueue`]: scheduler::TaskQueue
pub mod binding;
pub mod demos;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod scope;
pub mod subject;
pub mod subscription;

pub use prelude::*;

#[cfg(all(doctest, not(target_arch = "wasm32")))]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
