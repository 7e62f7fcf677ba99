use super::Subject;
use crate::{
  rc::SharedFlag,
  scope::{FlagOf, Scope},
  subscription::Subscription,
};

/// Handle for one observer registered on a [`Subject`].
///
/// Holds a clone of the subject, not a borrow, so it can be stored
/// anywhere. Unsubscribing sets the shared flag first, which silences the
/// observer at once, then removes it from the list.
pub struct SubjectSubscription<S: Scope, Ob, Err> {
  subject: Subject<S, Ob, Err>,
  id: usize,
  closed: FlagOf<S>,
}

impl<S: Scope, Ob, Err> SubjectSubscription<S, Ob, Err> {
  pub(crate) fn new(subject: Subject<S, Ob, Err>, id: usize, closed: FlagOf<S>) -> Self {
    Self { subject, id, closed }
  }
}

impl<S: Scope, Ob, Err> Subscription for SubjectSubscription<S, Ob, Err> {
  fn unsubscribe(self) {
    if self.closed.is_set() {
      return;
    }
    self.closed.set();
    self.subject.remove(self.id);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.is_set() }
}
