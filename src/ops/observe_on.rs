//! ObserveOn operator implementation
//!
//! Re-routes every notification of the source through a [`Scheduler`], so
//! the downstream observer runs wherever the scheduler runs its tasks
//! instead of on the emitting call stack.

use std::thread::{self, ThreadId};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{RcDeref, RcDerefMut, SharedFlag},
  scheduler::{Scheduler, Task},
  scope::{FlagOf, RcMutOf, Scope},
  subscription::Subscription,
};

/// Created by
/// [`Observable::observe_on`](crate::observable::Observable::observe_on).
///
/// With a FIFO scheduler such as
/// [`TaskQueue`](crate::scheduler::TaskQueue) the downstream sees the
/// notifications in emission order. Cancelling the subscription also drops
/// the deliveries that are still queued, and waits for a delivery running
/// on another thread to finish.
#[derive(Clone)]
pub struct ObserveOn<S, Sch> {
  pub(crate) source: S,
  pub(crate) scheduler: Sch,
}

impl<S, Sch> ObservableType for ObserveOn<S, Sch>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
  type Scope = S::Scope;
}

type ObserverOf<S, O, Sch> = ObserveOnObserver<
  RcMutOf<<S as ObservableType>::Scope, Option<O>>,
  RcMutOf<<S as ObservableType>::Scope, Option<ThreadId>>,
  FlagOf<<S as ObservableType>::Scope>,
  Sch,
>;

impl<S, Sch, O> CoreObservable<O> for ObserveOn<S, Sch>
where
  S: ObservableType + CoreObservable<ObserverOf<S, O, Sch>>,
{
  type Unsub = ObserveOnSubscription<
    <S as CoreObservable<ObserverOf<S, O, Sch>>>::Unsub,
    RcMutOf<<S as ObservableType>::Scope, Option<O>>,
    RcMutOf<<S as ObservableType>::Scope, Option<ThreadId>>,
    FlagOf<<S as ObservableType>::Scope>,
  >;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let closed = <FlagOf<S::Scope> as Default>::default();
    let observer = <S::Scope as Scope>::rc_mut(Some(observer));
    let delivering = <S::Scope as Scope>::rc_mut(None);
    let source = self.source.actual_subscribe(ObserveOnObserver {
      observer: observer.clone(),
      delivering: delivering.clone(),
      closed: closed.clone(),
      scheduler: self.scheduler,
    });
    ObserveOnSubscription { source, observer, delivering, closed }
  }
}

/// One notification waiting to be delivered.
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// The task scheduled for every notification.
pub struct Delivery<P, T, F, Item, Err> {
  observer: P,
  delivering: T,
  closed: F,
  notification: Notification<Item, Err>,
}

/// Marks the thread running a delivery until dropped.
struct DeliveringOn<'a, T: RcDerefMut<Target = Option<ThreadId>>>(&'a T);

impl<'a, T: RcDerefMut<Target = Option<ThreadId>>> DeliveringOn<'a, T> {
  fn enter(cell: &'a T) -> Self {
    *cell.rc_deref_mut() = Some(thread::current().id());
    Self(cell)
  }
}

impl<'a, T: RcDerefMut<Target = Option<ThreadId>>> Drop for DeliveringOn<'a, T> {
  fn drop(&mut self) { *self.0.rc_deref_mut() = None; }
}

impl<P, T, F, O, Item, Err> Task for Delivery<P, T, F, Item, Err>
where
  P: RcDerefMut<Target = Option<O>>,
  T: RcDerefMut<Target = Option<ThreadId>>,
  F: SharedFlag,
  O: Observer<Item, Err>,
{
  fn run(self) {
    if self.closed.is_set() {
      return;
    }
    let mut observer = self.observer.rc_deref_mut();
    // A cancel may have taken the lock first.
    if self.closed.is_set() {
      return;
    }
    let _delivering = DeliveringOn::enter(&self.delivering);
    match self.notification {
      Notification::Next(value) => {
        if let Some(observer) = observer.as_mut() {
          observer.next(value);
        }
      }
      Notification::Error(err) => {
        if let Some(observer) = observer.take() {
          observer.error(err);
        }
      }
      Notification::Complete => {
        if let Some(observer) = observer.take() {
          observer.complete();
        }
      }
    }
  }
}

pub struct ObserveOnObserver<P, T, F, Sch> {
  observer: P,
  delivering: T,
  closed: F,
  scheduler: Sch,
}

impl<P, T, F, Sch> ObserveOnObserver<P, T, F, Sch>
where
  P: Clone,
  T: Clone,
  F: SharedFlag,
{
  fn schedule<Item, Err>(&self, notification: Notification<Item, Err>)
  where
    Sch: Scheduler<Delivery<P, T, F, Item, Err>>,
    Delivery<P, T, F, Item, Err>: Task,
  {
    if self.closed.is_set() {
      return;
    }
    let task = Delivery {
      observer: self.observer.clone(),
      delivering: self.delivering.clone(),
      closed: self.closed.clone(),
      notification,
    };
    if let Err(err) = self.scheduler.schedule(task) {
      tracing::warn!(%err, "observe_on dropped a notification");
    }
  }
}

impl<P, T, F, Sch, Item, Err> Observer<Item, Err> for ObserveOnObserver<P, T, F, Sch>
where
  P: Clone,
  T: Clone,
  F: SharedFlag,
  Sch: Scheduler<Delivery<P, T, F, Item, Err>>,
  Delivery<P, T, F, Item, Err>: Task,
{
  fn next(&mut self, value: Item) { self.schedule(Notification::<Item, Err>::Next(value)) }

  fn error(self, err: Err) { self.schedule(Notification::<Item, Err>::Error(err)) }

  fn complete(self) { self.schedule(Notification::<Item, Err>::Complete) }

  /// Only the cancellation flag is consulted: the downstream may be busy
  /// inside a delivery on this very stack.
  fn is_closed(&self) -> bool { self.closed.is_set() }
}

/// Cancels the source and silences every queued delivery.
///
/// Once the flag is set the downstream is taken out under its lock, so
/// `unsubscribe` returns only after a delivery running on another thread
/// has finished. A cancel issued by the downstream itself, from inside a
/// delivery, only sets the flag.
pub struct ObserveOnSubscription<U, P, T, F> {
  source: U,
  observer: P,
  delivering: T,
  closed: F,
}

impl<U, P, T, F, O> Subscription for ObserveOnSubscription<U, P, T, F>
where
  U: Subscription,
  P: RcDerefMut<Target = Option<O>>,
  T: RcDerefMut<Target = Option<ThreadId>>,
  F: SharedFlag,
{
  fn unsubscribe(self) {
    self.closed.set();
    self.source.unsubscribe();
    let reentrant = *self.delivering.rc_deref() == Some(thread::current().id());
    if !reentrant {
      let observer = self.observer.rc_deref_mut().take();
      drop(observer);
    }
  }

  fn is_closed(&self) -> bool { self.closed.is_set() }
}
