use super::Subscription;

/// Object-safe face of [`Subscription`].
///
/// `Subscription::unsubscribe(self)` needs `Sized`, so a boxed subscription
/// goes through `boxed_unsubscribe(self: Box<Self>)` instead.
pub trait BoxedSubscriptionInner {
  fn boxed_unsubscribe(self: Box<Self>);
  fn boxed_is_closed(&self) -> bool;
}

impl<T: Subscription> BoxedSubscriptionInner for T {
  #[inline]
  fn boxed_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }

  #[inline]
  fn boxed_is_closed(&self) -> bool { self.is_closed() }
}

/// Type-erased subscription for the local scope.
///
/// The lifetime follows the observers the subscription keeps alive: a
/// subject subscription owns a handle to the subject, and through it the
/// boxed observers registered on it.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let subs: Vec<BoxedSubscription> = vec![BoxedSubscription::new(()), BoxedSubscription::new(())];
/// for sub in subs {
///   sub.unsubscribe();
/// }
/// ```
pub struct BoxedSubscription<'a>(Box<dyn BoxedSubscriptionInner + 'a>);

/// Type-erased subscription that can cross threads.
pub struct BoxedSubscriptionSend<'a>(Box<dyn BoxedSubscriptionInner + Send + 'a>);

impl<'a> BoxedSubscription<'a> {
  #[inline]
  pub fn new(subscription: impl Subscription + 'a) -> Self { Self(Box::new(subscription)) }
}

impl<'a> BoxedSubscriptionSend<'a> {
  #[inline]
  pub fn new(subscription: impl Subscription + Send + 'a) -> Self { Self(Box::new(subscription)) }
}

/// Conversion into one of the boxed subscription types.
pub trait IntoBoxedSubscription<Target> {
  fn into_boxed(self) -> Target;
}

impl<'a, T: Subscription + 'a> IntoBoxedSubscription<BoxedSubscription<'a>> for T {
  #[inline]
  fn into_boxed(self) -> BoxedSubscription<'a> { BoxedSubscription::new(self) }
}

impl<'a, T: Subscription + Send + 'a> IntoBoxedSubscription<BoxedSubscriptionSend<'a>> for T {
  #[inline]
  fn into_boxed(self) -> BoxedSubscriptionSend<'a> { BoxedSubscriptionSend::new(self) }
}

impl<'a> Subscription for BoxedSubscription<'a> {
  #[inline]
  fn unsubscribe(self) { self.0.boxed_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.boxed_is_closed() }
}

impl<'a> Subscription for BoxedSubscriptionSend<'a> {
  #[inline]
  fn unsubscribe(self) { self.0.boxed_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.boxed_is_closed() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subscription::tests::MockSubscription;

  #[rxcombine_macro::test]
  fn boxed_subscription_forwards_unsubscribe() {
    let (mock, count) = MockSubscription::new();
    let boxed = BoxedSubscription::new(mock);

    assert!(!boxed.is_closed());
    boxed.unsubscribe();
    assert_eq!(count.get(), 1);
  }

  #[rxcombine_macro::test]
  fn unit_subscription_is_closed() {
    let boxed = BoxedSubscription::new(());
    assert!(boxed.is_closed());
    boxed.unsubscribe();
  }

  #[rxcombine_macro::test]
  fn into_boxed_send() {
    let boxed: BoxedSubscriptionSend = Some(()).into_boxed();
    assert!(boxed.is_closed());
    let handle = std::thread::spawn(move || boxed.unsubscribe());
    assert!(handle.join().is_ok());
  }
}
