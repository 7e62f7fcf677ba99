//! Subjects: publishers that are also observers.
//!
//! A [`Subject`] forwards every value it receives to the observers
//! registered at that moment, in subscription order. A
//! [`BehaviorSubject`] additionally keeps the latest value and hands it to
//! each new subscriber first.
//!
//! # Emission rules
//!
//! - Emission and cancellation are serialized per subject: a cancel issued
//!   from another thread waits for an in-flight emission, so no callback runs
//!   once `unsubscribe` has returned.
//! - Subscribing or cancelling from inside one of the subject's own callbacks
//!   is allowed. A new subscriber joins after the current emission; a
//!   cancelled one is skipped even within it.
//! - Emitting into a subject from inside one of its own callbacks panics.
//! - After `complete` or `error` every later `next` is ignored and late
//!   subscribers receive the terminal notification right away.

mod behavior_subject;
mod subject_subscription;
mod subscribers;

use std::thread::{self, ThreadId};

pub use behavior_subject::*;
pub use subject_subscription::*;
use subscribers::{Entry, Status, Subscribers};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserver, BoxedObserverSend, Observer},
  rc::{RcDeref, RcDerefMut, SharedFlag},
  scope::{FlagOf, Local, RcMutOf, Scope, Shared},
};

/// Bookkeeping that is only ever locked briefly, never across a callback.
struct Control<Ob, F, Err> {
  next_id: usize,
  /// Thread currently running this subject's callbacks, if any.
  emitting_on: Option<ThreadId>,
  /// Subscribers added from inside a callback, waiting for the emission to
  /// end.
  pending: Vec<Entry<Ob, F>>,
  status: Status<Err>,
}

impl<Ob, F, Err> Default for Control<Ob, F, Err> {
  fn default() -> Self {
    Self { next_id: 0, emitting_on: None, pending: Vec::new(), status: Status::Active }
  }
}

/// A multicast publisher without memory.
///
/// Values sent while nobody is subscribed are dropped. Clones share the
/// same subscriber list.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let mut subject = Local::subject::<&str, Infallible>();
/// let log = Rc::new(RefCell::new(vec![]));
///
/// subject.next("lost");
/// let c_log = log.clone();
/// let _a = subject.clone().subscribe(move |v| c_log.borrow_mut().push(format!("a {v}")));
/// let c_log = log.clone();
/// let _b = subject.clone().subscribe(move |v| c_log.borrow_mut().push(format!("b {v}")));
/// subject.next("hello");
///
/// assert_eq!(*log.borrow(), vec!["a hello", "b hello"]);
/// ```
pub struct Subject<S: Scope, Ob, Err> {
  observers: RcMutOf<S, Subscribers<Ob, FlagOf<S>>>,
  control: RcMutOf<S, Control<Ob, FlagOf<S>, Err>>,
}

/// Subject for single-threaded pipelines.
pub type LocalSubject<'a, Item, Err> = Subject<Local, BoxedObserver<'a, Item, Err>, Err>;

/// Subject that can be fed and observed from several threads.
pub type SharedSubject<'a, Item, Err> = Subject<Shared, BoxedObserverSend<'a, Item, Err>, Err>;

impl<S: Scope, Ob, Err> Clone for Subject<S, Ob, Err> {
  fn clone(&self) -> Self {
    Self { observers: self.observers.clone(), control: self.control.clone() }
  }
}

impl<S: Scope, Ob, Err> Default for Subject<S, Ob, Err> {
  fn default() -> Self { Self::new() }
}

/// Resets the emitting marker when an emission ends, including by panic.
struct Emitting<'c, S: Scope, Ob, Err> {
  control: &'c RcMutOf<S, Control<Ob, FlagOf<S>, Err>>,
}

impl<'c, S: Scope, Ob, Err> Drop for Emitting<'c, S, Ob, Err> {
  fn drop(&mut self) { self.control.rc_deref_mut().emitting_on = None; }
}

impl<S: Scope, Ob, Err> Subject<S, Ob, Err> {
  pub fn new() -> Self {
    Self { observers: S::rc_mut(Subscribers::default()), control: S::rc_mut(Control::default()) }
  }

  /// Whether `complete` or `error` has been received.
  pub fn is_terminated(&self) -> bool { !self.control.rc_deref().status.is_active() }

  fn is_emitting_here(&self) -> bool {
    self.control.rc_deref().emitting_on == Some(thread::current().id())
  }

  /// Must only be called while holding the observers lock.
  fn begin_emission(&self) -> Emitting<'_, S, Ob, Err> {
    self.control.rc_deref_mut().emitting_on = Some(thread::current().id());
    Emitting { control: &self.control }
  }

  fn take_pending(&self) -> Vec<Entry<Ob, FlagOf<S>>> {
    std::mem::take(&mut self.control.rc_deref_mut().pending)
  }

  /// Add `observer`, first handing it to `replay` (a behavior subject sends
  /// its current value there). Replay runs under the emission lock, so it
  /// cannot interleave with a concurrent `next`.
  pub(crate) fn register<Item, R>(
    &self, mut observer: Ob, replay: R,
  ) -> SubjectSubscription<S, Ob, Err>
  where
    Ob: Observer<Item, Err>,
    Err: Clone,
    R: FnOnce(&mut Ob),
  {
    let closed = S::Flag::default();

    if self.is_emitting_here() {
      // Called from one of our own callbacks: the observer list is busy, so
      // the entry waits in `pending` until the running emission ends.
      let (id, status) = {
        let mut control = self.control.rc_deref_mut();
        control.next_id += 1;
        (control.next_id, control.status.clone())
      };
      if !status.is_active() {
        closed.set();
        status.deliver::<Item, _>(observer);
      } else {
        replay(&mut observer);
        let entry = Entry { id, closed: closed.clone(), observer };
        self.control.rc_deref_mut().pending.push(entry);
      }
      tracing::trace!(id, "subject subscription added during emission");
      return SubjectSubscription::new(self.clone(), id, closed);
    }

    let mut observers = self.observers.rc_deref_mut();
    let (id, status) = {
      let mut control = self.control.rc_deref_mut();
      control.next_id += 1;
      (control.next_id, control.status.clone())
    };
    if !status.is_active() {
      drop(observers);
      closed.set();
      tracing::trace!(id, "late subscriber receives terminal notification");
      status.deliver::<Item, _>(observer);
      return SubjectSubscription::new(self.clone(), id, closed);
    }

    {
      let _emitting = self.begin_emission();
      replay(&mut observer);
    }
    observers.adopt(&mut self.take_pending());
    observers.push(Entry { id, closed: closed.clone(), observer });
    drop(observers);

    tracing::trace!(id, "subject subscription added");
    SubjectSubscription::new(self.clone(), id, closed)
  }

  /// Broadcast `value`. `on_accept` runs under the emission lock right
  /// before delivery and only if the subject is still active.
  pub(crate) fn dispatch<Item, A>(&self, value: Item, on_accept: A)
  where
    Ob: Observer<Item, Err>,
    Item: Clone,
    A: FnOnce(&Item),
  {
    if self.is_emitting_here() {
      panic!("re-entrant Subject emissions are not supported");
    }

    let mut observers = self.observers.rc_deref_mut();
    if self.is_terminated() {
      return;
    }
    on_accept(&value);
    {
      let _emitting = self.begin_emission();
      observers.broadcast_value::<Item, Err>(value);
    }
    observers.adopt(&mut self.take_pending());
    let removed = observers.take_closed::<Item, Err>();
    drop(observers);
    drop(removed);
  }

  /// Deliver a terminal `status` to everyone and clear the list. Only the
  /// first terminal notification has any effect.
  pub(crate) fn terminate<Item>(&self, status: Status<Err>)
  where
    Ob: Observer<Item, Err>,
    Err: Clone,
  {
    if self.is_emitting_here() {
      panic!("re-entrant Subject emissions are not supported");
    }

    let mut observers = self.observers.rc_deref_mut();
    {
      let mut control = self.control.rc_deref_mut();
      if !control.status.is_active() {
        return;
      }
      control.status = status.clone();
    }
    let skipped = {
      let _emitting = self.begin_emission();
      observers.broadcast_terminal::<Item, Err>(&status)
    };
    let pending = self.take_pending();
    drop(observers);
    drop(skipped);
    drop(pending);
    tracing::trace!("subject terminated");
  }

  /// Drop the entry `id`. Runs after its flag is set, so even an entry that
  /// stays in the list until the current emission ends gets no further
  /// calls.
  fn remove(&self, id: usize) {
    let (pending, reentrant) = {
      let mut control = self.control.rc_deref_mut();
      let pos = control.pending.iter().position(|e| e.id == id);
      let pending = pos.map(|pos| control.pending.remove(pos));
      (pending, control.emitting_on == Some(thread::current().id()))
    };
    drop(pending);
    if reentrant {
      // The running emission prunes closed entries once it is done.
      return;
    }
    let removed = self.observers.rc_deref_mut().remove(id);
    drop(removed);
    tracing::trace!(id, "subject subscription removed");
  }

  #[cfg(test)]
  fn observer_count(&self) -> usize { self.observers.rc_deref().len() }
}

macro_rules! impl_subject {
  ($scope:ident, $boxed:ident $(+ $bound:ident)*) => {
    impl<'a, Item, Err> ObservableType for Subject<$scope, $boxed<'a, Item, Err>, Err> {
      type Item = Item;
      type Err = Err;
      type Scope = $scope;
    }

    impl<'a, Item, Err, O> CoreObservable<O> for Subject<$scope, $boxed<'a, Item, Err>, Err>
    where
      O: Observer<Item, Err> $(+ $bound)* + 'a,
      Err: Clone,
    {
      type Unsub = SubjectSubscription<$scope, $boxed<'a, Item, Err>, Err>;

      fn actual_subscribe(self, observer: O) -> Self::Unsub {
        self.register::<Item, _>(Box::new(observer), |_| {})
      }
    }

    impl<'a, Item, Err> Observer<Item, Err> for Subject<$scope, $boxed<'a, Item, Err>, Err>
    where
      Item: Clone,
      Err: Clone,
    {
      fn next(&mut self, value: Item) { self.dispatch(value, |_| {}) }

      fn error(self, err: Err) { self.terminate::<Item>(Status::Errored(err)) }

      fn complete(self) { self.terminate::<Item>(Status::Completed) }

      fn is_closed(&self) -> bool { self.is_terminated() }
    }
  };
}

impl_subject!(Local, BoxedObserver);
impl_subject!(Shared, BoxedObserverSend + Send);

impl Local {
  /// A passthrough subject for the local scope.
  pub fn subject<'a, Item, Err>() -> LocalSubject<'a, Item, Err> { Subject::new() }

  /// A current-value subject for the local scope, starting at `value`.
  pub fn behavior_subject<'a, Item, Err>(value: Item) -> LocalBehaviorSubject<'a, Item, Err> {
    BehaviorSubject::new(value)
  }
}

impl Shared {
  /// A passthrough subject for the shared scope.
  pub fn subject<'a, Item, Err>() -> SharedSubject<'a, Item, Err> { Subject::new() }

  /// A current-value subject for the shared scope, starting at `value`.
  pub fn behavior_subject<'a, Item, Err>(value: Item) -> SharedBehaviorSubject<'a, Item, Err> {
    BehaviorSubject::new(value)
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::RefCell,
    convert::Infallible,
    rc::Rc,
    sync::{
      atomic::{AtomicBool, AtomicUsize, Ordering},
      Arc, Mutex,
    },
    time::Duration,
  };

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn passthrough_preserves_order() {
    let mut subject = Local::subject::<&str, Infallible>();
    let log = Rc::new(RefCell::new(vec![]));

    let c_log = log.clone();
    let _a = subject.clone().subscribe(move |v| c_log.borrow_mut().push(("a", v)));
    let c_log = log.clone();
    let _b = subject.clone().subscribe(move |v| c_log.borrow_mut().push(("b", v)));

    subject.next("Event1");
    subject.next("Event2");

    assert_eq!(
      *log.borrow(),
      vec![("a", "Event1"), ("b", "Event1"), ("a", "Event2"), ("b", "Event2")]
    );
  }

  #[rxcombine_macro::test]
  fn late_subscriber_misses_earlier_values() {
    let mut subject = Local::subject::<i32, Infallible>();
    let early = Rc::new(RefCell::new(vec![]));
    let late = Rc::new(RefCell::new(vec![]));

    subject.next(0);
    let c_early = early.clone();
    let _a = subject.clone().subscribe(move |v| c_early.borrow_mut().push(v));
    subject.next(1);
    let c_late = late.clone();
    let _b = subject.clone().subscribe(move |v| c_late.borrow_mut().push(v));
    subject.next(2);

    assert_eq!(*early.borrow(), vec![1, 2]);
    assert_eq!(*late.borrow(), vec![2]);
  }

  #[rxcombine_macro::test]
  fn dropping_the_guard_cancels() {
    let mut subject = Local::subject::<i32, Infallible>();
    let hits = Rc::new(RefCell::new(0));

    let c_hits = hits.clone();
    let guard = subject.clone().subscribe(move |_| *c_hits.borrow_mut() += 1);
    subject.next(1);
    assert_eq!(subject.observer_count(), 1);
    drop(guard);
    subject.next(2);

    assert_eq!(*hits.borrow(), 1);
    assert_eq!(subject.observer_count(), 0);
  }

  #[rxcombine_macro::test]
  fn complete_reaches_current_and_late_subscribers() {
    let mut subject = Local::subject::<i32, Infallible>();
    let events = Rc::new(RefCell::new(vec![]));

    let (c_next, c_done) = (events.clone(), events.clone());
    let _a = subject.clone().subscribe_all(
      move |v| c_next.borrow_mut().push(format!("next {v}")),
      |_| {},
      move || c_done.borrow_mut().push("done".to_string()),
    );
    subject.next(1);
    subject.clone().complete();
    subject.next(2);

    let c_late = events.clone();
    let late = subject.clone().subscribe_all(
      |_| {},
      |_| {},
      move || c_late.borrow_mut().push("late done".to_string()),
    );

    assert!(late.is_closed());
    assert!(subject.is_terminated());
    assert_eq!(*events.borrow(), vec!["next 1", "done", "late done"]);
  }

  #[rxcombine_macro::test]
  fn error_is_broadcast_once() {
    let subject = Local::subject::<i32, &str>();
    let errors = Rc::new(RefCell::new(vec![]));

    let c_errors = errors.clone();
    let _a = subject.clone().subscribe_all(|_| {}, move |e| c_errors.borrow_mut().push(e), || {});
    subject.clone().error("boom");
    subject.clone().error("again");
    subject.clone().complete();

    assert_eq!(*errors.borrow(), vec!["boom"]);
  }

  #[rxcombine_macro::test]
  fn subject_as_observer_of_a_source() {
    let subject = Local::subject::<&str, Infallible>();
    let log = Rc::new(RefCell::new(vec![]));

    let (c_next, c_done) = (log.clone(), log.clone());
    let _a = subject.clone().subscribe_all(
      move |v| c_next.borrow_mut().push(v.to_string()),
      |_| {},
      move || c_done.borrow_mut().push("completed".to_string()),
    );
    Local::of("Publishing the Value for subject").subscribe_with(subject.clone());

    assert_eq!(*log.borrow(), vec!["Publishing the Value for subject", "completed"]);
    assert!(subject.is_terminated());
  }

  #[rxcombine_macro::test]
  fn cancel_inside_callback_skips_later_observer() {
    let mut subject = Local::subject::<i32, Infallible>();
    let hits = Rc::new(RefCell::new(vec![]));
    let victim: Rc<RefCell<Option<SubscriptionGuard<_>>>> = Rc::new(RefCell::new(None));

    let c_victim = victim.clone();
    let c_hits = hits.clone();
    let _killer = subject.clone().subscribe(move |v| {
      c_hits.borrow_mut().push(("killer", v));
      if let Some(mut guard) = c_victim.borrow_mut().take() {
        guard.cancel();
      }
    });
    let c_hits = hits.clone();
    let guard = subject.clone().subscribe(move |v| c_hits.borrow_mut().push(("victim", v)));
    *victim.borrow_mut() = Some(guard);

    subject.next(1);
    subject.next(2);

    assert_eq!(*hits.borrow(), vec![("killer", 1), ("killer", 2)]);
    assert_eq!(subject.observer_count(), 1);
  }

  #[rxcombine_macro::test]
  fn subscribe_inside_callback_joins_next_emission() {
    let mut subject = Local::subject::<i32, Infallible>();
    let hits = Rc::new(RefCell::new(vec![]));
    let guards = Rc::new(RefCell::new(vec![]));

    let (c_subject, c_hits, c_guards) = (subject.clone(), hits.clone(), guards.clone());
    let _outer = subject.clone().subscribe(move |v| {
      c_hits.borrow_mut().push(("outer", v));
      if v == 1 {
        let inner_hits = c_hits.clone();
        let guard = c_subject
          .clone()
          .subscribe(move |v| inner_hits.borrow_mut().push(("inner", v)));
        c_guards.borrow_mut().push(guard);
      }
    });

    subject.next(1);
    subject.next(2);

    assert_eq!(*hits.borrow(), vec![("outer", 1), ("outer", 2), ("inner", 2)]);
  }

  #[rxcombine_macro::test]
  #[should_panic(expected = "re-entrant Subject emissions are not supported")]
  fn next_inside_callback_panics() {
    let mut subject = Local::subject::<i32, Infallible>();
    let mut c_subject = subject.clone();
    let _guard = subject.clone().subscribe(move |v| {
      if v == 0 {
        c_subject.next(1);
      }
    });
    subject.next(0);
  }

  #[rxcombine_macro::test]
  fn shared_cancel_waits_for_running_emission() {
    let mut subject = Shared::subject::<i32, Infallible>();
    let in_callback = Arc::new(AtomicBool::new(false));
    let calls = Arc::new(AtomicUsize::new(0));

    let (c_in, c_calls) = (in_callback.clone(), calls.clone());
    let guard = subject.clone().subscribe(move |_| {
      c_in.store(true, Ordering::SeqCst);
      std::thread::sleep(Duration::from_millis(50));
      c_calls.fetch_add(1, Ordering::SeqCst);
      c_in.store(false, Ordering::SeqCst);
    });

    let emitter = std::thread::spawn(move || subject.next(1));
    while calls.load(Ordering::SeqCst) == 0 && !in_callback.load(Ordering::SeqCst) {
      std::thread::yield_now();
    }
    drop(guard);
    // The callback had finished by the time cancel returned.
    assert!(!in_callback.load(Ordering::SeqCst));
    assert!(emitter.join().is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[rxcombine_macro::test]
  fn shared_subject_collects_from_threads() {
    let subject = Shared::subject::<usize, Infallible>();
    let seen = Arc::new(Mutex::new(vec![]));

    let c_seen = seen.clone();
    let _guard = subject.clone().subscribe(move |v| {
      if let Ok(mut seen) = c_seen.lock() {
        seen.push(v);
      }
    });

    let handles: Vec<_> = (0..4)
      .map(|i| {
        let mut subject = subject.clone();
        std::thread::spawn(move || subject.next(i))
      })
      .collect();
    for handle in handles {
      assert!(handle.join().is_ok());
    }

    let mut seen = seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);
  }
}
