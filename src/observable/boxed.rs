//! Type-erased publishers.
//!
//! Pipelines built from operators have long, closure-laden types. Boxing
//! erases them to `BoxedObservable<'a, Item, Err>` so different pipelines
//! can share a field, a `Vec` or a function signature. Boxed publishers stay
//! `Clone`, so one erased pipeline can feed several subscribers.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserver, BoxedObserverSend, Observer},
  scope::{Local, Shared},
  subscription::{BoxedSubscription, BoxedSubscriptionSend},
};

// ============================================================================
// Object-safe publisher traits
// ============================================================================

/// Object-safe publisher for the local scope.
pub trait DynObservable<'a, Item, Err> {
  fn dyn_subscribe(
    self: Box<Self>, observer: BoxedObserver<'a, Item, Err>,
  ) -> BoxedSubscription<'a>;

  fn clone_box(&self) -> Box<dyn DynObservable<'a, Item, Err> + 'a>;
}

/// Object-safe publisher for the shared scope.
pub trait DynObservableSend<'a, Item, Err> {
  fn dyn_subscribe(
    self: Box<Self>, observer: BoxedObserverSend<'a, Item, Err>,
  ) -> BoxedSubscriptionSend<'a>;

  fn clone_box(&self) -> Box<dyn DynObservableSend<'a, Item, Err> + Send + 'a>;
}

impl<'a, T, Item, Err> DynObservable<'a, Item, Err> for T
where
  T: CoreObservable<BoxedObserver<'a, Item, Err>>
    + ObservableType<Item = Item, Err = Err, Scope = Local>
    + Clone
    + 'a,
  <T as CoreObservable<BoxedObserver<'a, Item, Err>>>::Unsub: 'a,
{
  fn dyn_subscribe(
    self: Box<Self>, observer: BoxedObserver<'a, Item, Err>,
  ) -> BoxedSubscription<'a> {
    BoxedSubscription::new((*self).actual_subscribe(observer))
  }

  fn clone_box(&self) -> Box<dyn DynObservable<'a, Item, Err> + 'a> { Box::new(self.clone()) }
}

impl<'a, T, Item, Err> DynObservableSend<'a, Item, Err> for T
where
  T: CoreObservable<BoxedObserverSend<'a, Item, Err>>
    + ObservableType<Item = Item, Err = Err, Scope = Shared>
    + Clone
    + Send
    + 'a,
  <T as CoreObservable<BoxedObserverSend<'a, Item, Err>>>::Unsub: Send + 'a,
{
  fn dyn_subscribe(
    self: Box<Self>, observer: BoxedObserverSend<'a, Item, Err>,
  ) -> BoxedSubscriptionSend<'a> {
    BoxedSubscriptionSend::new((*self).actual_subscribe(observer))
  }

  fn clone_box(&self) -> Box<dyn DynObservableSend<'a, Item, Err> + Send + 'a> {
    Box::new(self.clone())
  }
}

// ============================================================================
// Boxed publishers
// ============================================================================

/// Type-erased publisher for the local scope.
pub struct BoxedObservable<'a, Item, Err>(Box<dyn DynObservable<'a, Item, Err> + 'a>);

/// Type-erased publisher for the shared scope.
pub struct BoxedObservableSend<'a, Item, Err>(
  Box<dyn DynObservableSend<'a, Item, Err> + Send + 'a>,
);

impl<'a, Item, Err> Clone for BoxedObservable<'a, Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone_box()) }
}

impl<'a, Item, Err> Clone for BoxedObservableSend<'a, Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone_box()) }
}

impl<'a, Item, Err> ObservableType for BoxedObservable<'a, Item, Err> {
  type Item = Item;
  type Err = Err;
  type Scope = Local;
}

impl<'a, Item, Err> ObservableType for BoxedObservableSend<'a, Item, Err> {
  type Item = Item;
  type Err = Err;
  type Scope = Shared;
}

impl<'a, Item, Err, O> CoreObservable<O> for BoxedObservable<'a, Item, Err>
where
  O: Observer<Item, Err> + 'a,
{
  type Unsub = BoxedSubscription<'a>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { self.0.dyn_subscribe(Box::new(observer)) }
}

impl<'a, Item, Err, O> CoreObservable<O> for BoxedObservableSend<'a, Item, Err>
where
  O: Observer<Item, Err> + Send + 'a,
{
  type Unsub = BoxedSubscriptionSend<'a>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { self.0.dyn_subscribe(Box::new(observer)) }
}

// ============================================================================
// IntoBoxedObservable
// ============================================================================

/// Conversion into one of the boxed publisher types; drives
/// [`Observable::box_it`](crate::observable::Observable::box_it).
pub trait IntoBoxedObservable<Target> {
  fn into_boxed(self) -> Target;
}

impl<'a, T, Item, Err> IntoBoxedObservable<BoxedObservable<'a, Item, Err>> for T
where
  T: DynObservable<'a, Item, Err> + 'a,
{
  #[inline]
  fn into_boxed(self) -> BoxedObservable<'a, Item, Err> { BoxedObservable(Box::new(self)) }
}

impl<'a, T, Item, Err> IntoBoxedObservable<BoxedObservableSend<'a, Item, Err>> for T
where
  T: DynObservableSend<'a, Item, Err> + Send + 'a,
{
  #[inline]
  fn into_boxed(self) -> BoxedObservableSend<'a, Item, Err> { BoxedObservableSend(Box::new(self)) }
}
