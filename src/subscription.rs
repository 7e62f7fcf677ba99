//! Subscriptions: handles that sever the link between a publisher and an
//! observer.
//!
//! Every `actual_subscribe` returns some [`Subscription`]. The user-facing
//! `subscribe*` methods wrap it in a [`SubscriptionGuard`], which cancels on
//! drop: keeping a subscription alive means keeping its guard alive.

mod boxed;
mod tuple;

pub use boxed::*;
pub use tuple::*;

/// A cancellable link between a publisher and an observer.
pub trait Subscription {
  /// Cancel the subscription. No notification reaches the observer after
  /// this returns.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;
}

/// Synchronous sources finish inside `subscribe`, so there is nothing left
/// to cancel.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<U: Subscription> Subscription for Option<U> {
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Subscription::is_closed) }
}

/// Owning handle for an active subscription.
///
/// Dropping the guard cancels the subscription, so a subscription lives
/// exactly as long as the guard returned by `subscribe`. Binding the result
/// to `_` therefore cancels immediately, which is harmless for synchronous
/// sources and means "no subscription" for subjects.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let mut subject = Local::subject::<i32, Infallible>();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
///
/// let mut guard = subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
/// subject.next(1);
/// guard.cancel();
/// guard.cancel();
/// subject.next(2);
///
/// assert_eq!(*seen.borrow(), vec![1]);
/// ```
#[derive(Debug)]
pub struct SubscriptionGuard<U: Subscription>(Option<U>);

impl<U: Subscription> SubscriptionGuard<U> {
  pub fn new(subscription: U) -> Self { Self(Some(subscription)) }

  /// Cancel the subscription. Calling it again is a no-op.
  pub fn cancel(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }

  /// Give up the guard without cancelling; the subscription then lives as
  /// long as its publisher keeps it. Returns `None` if already cancelled.
  pub fn detach(mut self) -> Option<U> { self.0.take() }

  pub fn is_closed(&self) -> bool { self.0.as_ref().map_or(true, Subscription::is_closed) }
}

impl<U: Subscription> Subscription for SubscriptionGuard<U> {
  fn unsubscribe(mut self) { self.cancel() }

  fn is_closed(&self) -> bool { SubscriptionGuard::is_closed(self) }
}

impl<U: Subscription> Drop for SubscriptionGuard<U> {
  #[inline]
  fn drop(&mut self) { self.cancel() }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  pub(super) struct MockSubscription {
    unsubscribed: Rc<Cell<usize>>,
  }

  impl MockSubscription {
    pub(super) fn new() -> (Self, Rc<Cell<usize>>) {
      let unsubscribed = Rc::new(Cell::new(0));
      (Self { unsubscribed: unsubscribed.clone() }, unsubscribed)
    }
  }

  impl Subscription for MockSubscription {
    fn unsubscribe(self) { self.unsubscribed.set(self.unsubscribed.get() + 1); }

    fn is_closed(&self) -> bool { self.unsubscribed.get() > 0 }
  }

  #[rxcombine_macro::test]
  fn guard_cancels_on_drop() {
    let (mock, count) = MockSubscription::new();
    {
      let _guard = SubscriptionGuard::new(mock);
      assert_eq!(count.get(), 0);
    }
    assert_eq!(count.get(), 1);
  }

  #[rxcombine_macro::test]
  fn cancel_is_idempotent() {
    let (mock, count) = MockSubscription::new();
    let mut guard = SubscriptionGuard::new(mock);
    guard.cancel();
    guard.cancel();
    assert!(guard.is_closed());
    drop(guard);
    assert_eq!(count.get(), 1);
  }

  #[rxcombine_macro::test]
  fn detach_keeps_subscription_alive() {
    let (mock, count) = MockSubscription::new();
    let guard = SubscriptionGuard::new(mock);
    let inner = guard.detach();
    assert_eq!(count.get(), 0);
    inner.unsubscribe();
    assert_eq!(count.get(), 1);
  }
}
