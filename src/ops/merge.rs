//! Merge operator implementation
//!
//! Forwards the values of two publishers in the order they arrive.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::RcDerefMut,
  scope::{RcMutOf, Scope},
  subscription::TupleSubscription,
};

/// Created by [`Observable::merge`](crate::observable::Observable::merge).
///
/// Completes once both sources have completed; the first error ends the
/// merged stream.
#[derive(Clone)]
pub struct Merge<A, B> {
  pub(crate) source1: A,
  pub(crate) source2: B,
}

impl<A, B> ObservableType for Merge<A, B>
where
  A: ObservableType,
{
  type Item = A::Item;
  type Err = A::Err;
  type Scope = A::Scope;
}

/// Downstream shared by both halves.
pub struct MergeState<O> {
  observer: Option<O>,
  completed: usize,
}

/// Observer subscribed to each source.
pub struct MergeObserver<P>(P);

type StateOf<A, O> = RcMutOf<<A as ObservableType>::Scope, MergeState<O>>;

impl<A, B, O> CoreObservable<O> for Merge<A, B>
where
  A: ObservableType + CoreObservable<MergeObserver<StateOf<A, O>>>,
  B: CoreObservable<MergeObserver<StateOf<A, O>>>,
{
  type Unsub = TupleSubscription<A::Unsub, B::Unsub>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Merge { source1, source2 } = self;
    let state: StateOf<A, O> =
      <A::Scope as Scope>::rc_mut(MergeState { observer: Some(observer), completed: 0 });
    let unsub1 = source1.actual_subscribe(MergeObserver(state.clone()));
    let unsub2 = source2.actual_subscribe(MergeObserver(state));
    TupleSubscription::new(unsub1, unsub2)
  }
}

impl<P, O, Item, Err> Observer<Item, Err> for MergeObserver<P>
where
  P: RcDerefMut<Target = MergeState<O>>,
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.0.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let observer = self.0.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.0.rc_deref_mut();
      state.completed += 1;
      if state.completed == 2 { state.observer.take() } else { None }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.0.rc_deref().observer.is_none() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn merge_subjects_in_arrival_order() {
    let mut europe = Local::subject::<&str, Infallible>();
    let mut italy = Local::subject::<&str, Infallible>();
    let out = Rc::new(RefCell::new(vec![]));

    let c_out = out.clone();
    let _guard = europe
      .clone()
      .merge(italy.clone())
      .subscribe(move |city| c_out.borrow_mut().push(format!("{city} is a city in europe")));

    europe.next("Munich");
    italy.next("Milano");

    assert_eq!(*out.borrow(), vec!["Munich is a city in europe", "Milano is a city in europe"]);
  }

  #[rxcombine_macro::test]
  fn completes_after_both_sources() {
    let a = Local::subject::<i32, Infallible>();
    let b = Local::subject::<i32, Infallible>();
    let completed = Rc::new(RefCell::new(false));

    let c_completed = completed.clone();
    let _guard = a
      .clone()
      .merge(b.clone())
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.borrow_mut() = true);

    a.complete();
    assert!(!*completed.borrow());
    b.complete();
    assert!(*completed.borrow());
  }

  #[rxcombine_macro::test]
  fn first_error_wins() {
    let a = Local::subject::<i32, &str>();
    let mut b = Local::subject::<i32, &str>();
    let events = Rc::new(RefCell::new(vec![]));

    let (c_next, c_err) = (events.clone(), events.clone());
    let _guard = a.clone().merge(b.clone()).subscribe_all(
      move |v| c_next.borrow_mut().push(format!("next {v}")),
      move |e| c_err.borrow_mut().push(format!("error {e}")),
      || {},
    );

    a.error("first");
    b.next(1);
    b.clone().error("second");

    assert_eq!(*events.borrow(), vec!["error first"]);
  }

  #[rxcombine_macro::test]
  fn merge_sync_sources() {
    let mut out = vec![];
    Local::from_iter([1, 2]).merge(Local::from_iter([3])).subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 2, 3]);
  }
}
