//! Zip operator implementation
//!
//! Zip combines items from two observables pairwise, emitting a tuple when
//! both sources have emitted a value at the same index.

use std::collections::VecDeque;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::RcDerefMut,
  scope::{RcMutOf, Scope},
  subscription::TupleSubscription,
};

// ==================== Zip Operator ====================

/// Created by [`Observable::zip`](crate::observable::Observable::zip).
///
/// Whichever side is ahead is buffered. The zipped stream completes as soon
/// as one side has completed and its buffer is drained, since no further
/// pair can be formed.
#[derive(Clone)]
pub struct Zip<A, B> {
  pub(crate) source1: A,
  pub(crate) source2: B,
}

impl<A, B> ObservableType for Zip<A, B>
where
  A: ObservableType,
  B: ObservableType,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;
  type Scope = A::Scope;
}

// ==================== Shared State ====================

pub struct ZipState<O, ItemA, ItemB> {
  observer: Option<O>,
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  completed_a: bool,
  completed_b: bool,
}

impl<O, ItemA, ItemB> ZipState<O, ItemA, ItemB> {
  fn new(observer: O) -> Self {
    Self {
      observer: Some(observer),
      buffer_a: VecDeque::new(),
      buffer_b: VecDeque::new(),
      completed_a: false,
      completed_b: false,
    }
  }

  /// The downstream, if no further pair can be formed.
  fn take_if_exhausted(&mut self) -> Option<O> {
    let exhausted = self.completed_a && self.buffer_a.is_empty()
      || self.completed_b && self.buffer_b.is_empty();
    if exhausted { self.observer.take() } else { None }
  }
}

// ==================== Observer Structs ====================

/// Observer for the first source.
pub struct ZipAObserver<P>(P);

/// Observer for the second source.
pub struct ZipBObserver<P>(P);

type StateOf<A, B, O> = RcMutOf<
  <A as ObservableType>::Scope,
  ZipState<O, <A as ObservableType>::Item, <B as ObservableType>::Item>,
>;

// ==================== CoreObservable Implementation ====================

impl<A, B, O> CoreObservable<O> for Zip<A, B>
where
  A: ObservableType + CoreObservable<ZipAObserver<StateOf<A, B, O>>>,
  B: ObservableType + CoreObservable<ZipBObserver<StateOf<A, B, O>>>,
{
  type Unsub = TupleSubscription<
    <A as CoreObservable<ZipAObserver<StateOf<A, B, O>>>>::Unsub,
    <B as CoreObservable<ZipBObserver<StateOf<A, B, O>>>>::Unsub,
  >;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Zip { source1, source2 } = self;
    let state: StateOf<A, B, O> = <A::Scope as Scope>::rc_mut(ZipState::new(observer));
    let unsub1 = source1.actual_subscribe(ZipAObserver(state.clone()));
    let unsub2 = source2.actual_subscribe(ZipBObserver(state));
    TupleSubscription::new(unsub1, unsub2)
  }
}

// ==================== Observer Implementations ====================

impl<P, O, ItemA, ItemB, Err> Observer<ItemA, Err> for ZipAObserver<P>
where
  P: RcDerefMut<Target = ZipState<O, ItemA, ItemB>>,
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemA) {
    let finished = {
      let mut state = self.0.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      if let Some(b) = state.buffer_b.pop_front() {
        if let Some(observer) = state.observer.as_mut() {
          observer.next((value, b));
        }
      } else {
        state.buffer_a.push_back(value);
      }
      state.take_if_exhausted()
    };
    if let Some(observer) = finished {
      observer.complete();
    }
  }

  fn error(self, err: Err) {
    let observer = self.0.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let finished = {
      let mut state = self.0.rc_deref_mut();
      state.completed_a = true;
      state.take_if_exhausted()
    };
    if let Some(observer) = finished {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.0.rc_deref().observer.is_none() }
}

impl<P, O, ItemA, ItemB, Err> Observer<ItemB, Err> for ZipBObserver<P>
where
  P: RcDerefMut<Target = ZipState<O, ItemA, ItemB>>,
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemB) {
    let finished = {
      let mut state = self.0.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      if let Some(a) = state.buffer_a.pop_front() {
        if let Some(observer) = state.observer.as_mut() {
          observer.next((a, value));
        }
      } else {
        state.buffer_b.push_back(value);
      }
      state.take_if_exhausted()
    };
    if let Some(observer) = finished {
      observer.complete();
    }
  }

  fn error(self, err: Err) {
    let observer = self.0.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let finished = {
      let mut state = self.0.rc_deref_mut();
      state.completed_b = true;
      state.take_if_exhausted()
    };
    if let Some(observer) = finished {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.0.rc_deref().observer.is_none() }
}
