use super::{Status, Subject, SubjectSubscription};
use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserver, BoxedObserverSend, Observer},
  rc::{RcDeref, RcDerefMut},
  scope::{Local, RcMutOf, Scope, Shared},
};

/// A subject that remembers its latest value.
///
/// Created with an initial value. Each new subscriber first receives the
/// current value, synchronously inside `subscribe`, then every later one.
/// Values sent while nobody listens still become the current value.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let mut subject = Local::behavior_subject::<_, Infallible>("Anuj");
/// let seen = Rc::new(RefCell::new(vec![]));
///
/// let c_seen = seen.clone();
/// let _guard = subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
/// subject.next("Combine");
///
/// assert_eq!(*seen.borrow(), vec!["Anuj", "Combine"]);
/// assert_eq!(subject.value(), "Combine");
/// ```
pub struct BehaviorSubject<S: Scope, Ob, Item, Err> {
  subject: Subject<S, Ob, Err>,
  value: RcMutOf<S, Item>,
}

/// Current-value subject for single-threaded pipelines.
pub type LocalBehaviorSubject<'a, Item, Err> =
  BehaviorSubject<Local, BoxedObserver<'a, Item, Err>, Item, Err>;

/// Current-value subject usable from several threads.
pub type SharedBehaviorSubject<'a, Item, Err> =
  BehaviorSubject<Shared, BoxedObserverSend<'a, Item, Err>, Item, Err>;

impl<S: Scope, Ob, Item, Err> BehaviorSubject<S, Ob, Item, Err> {
  pub fn new(value: Item) -> Self { Self { subject: Subject::new(), value: S::rc_mut(value) } }

  /// The current value.
  pub fn value(&self) -> Item
  where
    Item: Clone,
  {
    self.value.rc_deref().clone()
  }

  /// Whether `complete` or `error` has been received.
  pub fn is_terminated(&self) -> bool { self.subject.is_terminated() }
}

impl<S: Scope, Ob, Item, Err> Clone for BehaviorSubject<S, Ob, Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), value: self.value.clone() } }
}

macro_rules! impl_behavior_subject {
  ($scope:ident, $boxed:ident $(+ $bound:ident)*) => {
    impl<'a, Item, Err> ObservableType
      for BehaviorSubject<$scope, $boxed<'a, Item, Err>, Item, Err>
    {
      type Item = Item;
      type Err = Err;
      type Scope = $scope;
    }

    impl<'a, Item, Err, O> CoreObservable<O>
      for BehaviorSubject<$scope, $boxed<'a, Item, Err>, Item, Err>
    where
      O: Observer<Item, Err> $(+ $bound)* + 'a,
      Item: Clone,
      Err: Clone,
    {
      type Unsub = SubjectSubscription<$scope, $boxed<'a, Item, Err>, Err>;

      fn actual_subscribe(self, observer: O) -> Self::Unsub {
        let BehaviorSubject { subject, value } = self;
        subject.register::<Item, _>(Box::new(observer), move |observer| {
          let current = value.rc_deref().clone();
          observer.next(current);
        })
      }
    }

    impl<'a, Item, Err> Observer<Item, Err>
      for BehaviorSubject<$scope, $boxed<'a, Item, Err>, Item, Err>
    where
      Item: Clone,
      Err: Clone,
    {
      fn next(&mut self, value: Item) {
        self.subject.dispatch(value, |v| *self.value.rc_deref_mut() = v.clone())
      }

      fn error(self, err: Err) { self.subject.terminate::<Item>(Status::Errored(err)) }

      fn complete(self) { self.subject.terminate::<Item>(Status::Completed) }

      fn is_closed(&self) -> bool { self.subject.is_terminated() }
    }
  };
}

impl_behavior_subject!(Local, BoxedObserver);
impl_behavior_subject!(Shared, BoxedObserverSend + Send);
