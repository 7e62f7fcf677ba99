//! Observer trait and implementations
//!
//! An observer consumes the three kinds of notification a publisher can
//! produce: values (`next`), a failure (`error`) and successful termination
//! (`complete`). The two terminal notifications take `self` by value, so the
//! type system rules out anything being delivered after them.

use std::convert::Infallible;

// ============================================================================
// Observer Trait
// ============================================================================

/// The consumer side of a stream.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the failure that terminates the stream.
  fn error(self, err: Err);

  /// Receive the successful termination of the stream.
  fn complete(self);

  /// Whether this observer will ignore anything sent to it.
  ///
  /// Synchronous sources check it between values so that a cancelled
  /// downstream stops the iteration early.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], used to store observers of different
/// concrete types in one collection (a subject's subscriber list, a boxed
/// publisher).
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err); }
  fn box_complete(self: Box<Self>) { (*self).complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

macro_rules! impl_observer_for_box {
  ($ty:ty) => {
    impl<'a, Item, Err> Observer<Item, Err> for $ty {
      #[inline]
      fn next(&mut self, value: Item) { (**self).box_next(value) }

      #[inline]
      fn error(self, err: Err) { self.box_error(err) }

      #[inline]
      fn complete(self) { self.box_complete() }

      #[inline]
      fn is_closed(&self) -> bool { (**self).box_is_closed() }
    }
  };
}

impl_observer_for_box!(Box<dyn DynObserver<Item, Err> + 'a>);
impl_observer_for_box!(Box<dyn DynObserver<Item, Err> + Send + 'a>);

/// Boxed observer for the local scope.
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + 'a>;

/// Boxed observer for the shared scope.
pub type BoxedObserverSend<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

// ============================================================================
// Closure adapters
// ============================================================================

/// Adapts a value closure into an observer.
///
/// Only implemented for streams that cannot fail: a closure that only sees
/// values has nowhere to put an error.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item, Infallible> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, _err: Infallible) {}

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer built from one closure per notification kind.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self { Self { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(self) { (self.complete)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// `None` ignores everything, `Some` delegates.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Observer::is_closed) }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  struct TestObserver {
    values: Vec<i32>,
  }

  impl Observer<i32, ()> for TestObserver {
    fn next(&mut self, value: i32) { self.values.push(value); }

    fn error(self, _: ()) {}

    fn complete(self) {}

    fn is_closed(&self) -> bool { false }
  }

  #[rxcombine_macro::test]
  fn observer_trait() {
    let mut obs = TestObserver { values: vec![] };
    obs.next(1);
    obs.next(2);
    assert_eq!(obs.values, vec![1, 2]);
    assert!(!obs.is_closed());
  }

  #[rxcombine_macro::test]
  fn closure_as_observer() {
    let mut count = 0;
    let mut closure_obs = FnMutObserver(|v: i32| count += v);

    closure_obs.next(10);
    closure_obs.next(20);
    assert_eq!(count, 30);
  }

  #[rxcombine_macro::test]
  fn boxed_observer_forwards_terminal_events() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    let mut boxed: BoxedObserver<i32, &str> =
      Box::new(ObserverAll::new(|_: i32| {}, |_: &str| {}, move || c_completed.set(true)));

    boxed.next(1);
    boxed.complete();
    assert!(completed.get());
  }

  #[rxcombine_macro::test]
  fn none_is_closed() {
    let none: Option<TestObserver> = None;
    assert!(Observer::<i32, ()>::is_closed(&none));
  }
}
