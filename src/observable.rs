//! Publishers.
//!
//! A publisher is split in two traits:
//!
//! - [`ObservableType`] names what flows through it (`Item`, `Err`) and the
//!   [`Scope`] its state lives in.
//! - [`CoreObservable<O>`] connects it to a concrete observer type `O` and
//!   returns the subscription.
//!
//! Every publisher also gets the [`Observable`] extension methods: the
//! operators and the `subscribe*` entry points.

mod boxed;
mod from_iter;
mod of;

pub use boxed::*;
pub use from_iter::*;
pub use of::*;

use crate::{
  observer::{FnMutObserver, Observer, ObserverAll},
  ops::{
    combine_latest::CombineLatest, map::Map, merge::Merge, observe_on::ObserveOn, reduce::Reduce,
    scan::Scan, zip::Zip,
  },
  scope::Scope,
  subscription::{Subscription, SubscriptionGuard},
};

/// What a publisher emits and where its state lives.
pub trait ObservableType {
  type Item;
  type Err;
  type Scope: Scope;
}

/// The subscription half of a publisher.
pub trait CoreObservable<O>: ObservableType {
  type Unsub: Subscription;

  /// Start delivering to `observer`. Synchronous sources run to completion
  /// before this returns.
  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// Operators and subscribe methods available on every publisher.
pub trait Observable: ObservableType + Sized {
  /// Subscribe with a closure that receives every value.
  ///
  /// Only available for publishers that never fail; use
  /// [`subscribe_all`](Observable::subscribe_all) otherwise. The returned
  /// guard cancels the subscription when dropped.
  fn subscribe<F>(
    self, next: F,
  ) -> SubscriptionGuard<<Self as CoreObservable<FnMutObserver<F>>>::Unsub>
  where
    F: FnMut(Self::Item),
    Self: CoreObservable<FnMutObserver<F>>,
  {
    SubscriptionGuard::new(self.actual_subscribe(FnMutObserver(next)))
  }

  /// Subscribe with one closure per notification kind.
  fn subscribe_all<N, E, C>(
    self, next: N, error: E, complete: C,
  ) -> SubscriptionGuard<<Self as CoreObservable<ObserverAll<N, E, C>>>::Unsub>
  where
    N: FnMut(Self::Item),
    E: FnOnce(Self::Err),
    C: FnOnce(),
    Self: CoreObservable<ObserverAll<N, E, C>>,
  {
    SubscriptionGuard::new(self.actual_subscribe(ObserverAll::new(next, error, complete)))
  }

  /// Subscribe an arbitrary observer, a subject for instance.
  fn subscribe_with<O>(self, observer: O) -> SubscriptionGuard<<Self as CoreObservable<O>>::Unsub>
  where
    O: Observer<Self::Item, Self::Err>,
    Self: CoreObservable<O>,
  {
    SubscriptionGuard::new(self.actual_subscribe(observer))
  }

  /// Transform every value with `f`.
  #[inline]
  fn map<B, F>(self, f: F) -> Map<Self, F>
  where
    F: FnMut(Self::Item) -> B,
  {
    Map { source: self, func: f }
  }

  /// Emit the running accumulation for every value, starting from `seed`.
  ///
  /// ```rust
  /// use rxcombine::prelude::*;
  ///
  /// let mut out = vec![];
  /// Local::from_iter(0..=5).scan(0, |acc, v| acc + v).subscribe(|v| out.push(v));
  /// assert_eq!(out, vec![0, 1, 3, 6, 10, 15]);
  /// ```
  #[inline]
  fn scan<Acc, F>(self, seed: Acc, f: F) -> Scan<Self, F, Acc>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
  {
    Scan { source: self, func: f, seed }
  }

  /// Emit only the final accumulation, once the source completes.
  ///
  /// An empty source yields `seed`.
  #[inline]
  fn reduce<Acc, F>(self, seed: Acc, f: F) -> Reduce<Self, F, Acc>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
  {
    Reduce { source: self, func: f, seed }
  }

  /// Interleave the values of both publishers in arrival order.
  #[inline]
  fn merge<S>(self, other: S) -> Merge<Self, S>
  where
    S: ObservableType<Item = Self::Item, Err = Self::Err, Scope = Self::Scope>,
  {
    Merge { source1: self, source2: other }
  }

  /// Pair the n-th value of `self` with the n-th value of `other`.
  #[inline]
  fn zip<S>(self, other: S) -> Zip<Self, S>
  where
    S: ObservableType<Err = Self::Err, Scope = Self::Scope>,
  {
    Zip { source1: self, source2: other }
  }

  /// Emit the latest value of both publishers whenever either emits, once
  /// both have emitted.
  #[inline]
  fn combine_latest<S>(self, other: S) -> CombineLatest<Self, S>
  where
    S: ObservableType<Err = Self::Err, Scope = Self::Scope>,
  {
    CombineLatest { source1: self, source2: other }
  }

  /// Deliver every notification through `scheduler` instead of on the
  /// emitting call stack.
  #[inline]
  fn observe_on<Sch>(self, scheduler: Sch) -> ObserveOn<Self, Sch> {
    ObserveOn { source: self, scheduler }
  }

  /// Erase the publisher type. The target decides the flavour:
  /// [`BoxedObservable`] for local pipelines, [`BoxedObservableSend`] for
  /// shared ones.
  ///
  /// ```rust
  /// use std::{cell::RefCell, convert::Infallible, rc::Rc};
  ///
  /// use rxcombine::prelude::*;
  ///
  /// let sources: Vec<BoxedObservable<i32, Infallible>> =
  ///   vec![Local::of(1).box_it(), Local::from_iter([2, 3]).map(|v| v * 10).box_it()];
  ///
  /// let out = Rc::new(RefCell::new(vec![]));
  /// for source in sources {
  ///   let c_out = out.clone();
  ///   source.subscribe(move |v| c_out.borrow_mut().push(v));
  /// }
  /// assert_eq!(*out.borrow(), vec![1, 20, 30]);
  /// ```
  #[inline]
  fn box_it<B>(self) -> B
  where
    Self: IntoBoxedObservable<B>,
  {
    self.into_boxed()
  }
}

impl<T: ObservableType> Observable for T {}
