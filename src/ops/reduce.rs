//! Reduce operator implementation
//!
//! Folds every value into an accumulator and emits only the final value when
//! the source completes.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Created by [`Observable::reduce`](crate::observable::Observable::reduce).
///
/// An empty source emits the seed. A failing source forwards its error and
/// emits nothing.
#[derive(Clone)]
pub struct Reduce<S, F, Acc> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) seed: Acc,
}

impl<S, F, Acc> ObservableType for Reduce<S, F, Acc>
where
  S: ObservableType,
{
  type Item = Acc;
  type Err = S::Err;
  type Scope = S::Scope;
}

impl<S, F, Acc, O> CoreObservable<O> for Reduce<S, F, Acc>
where
  S: CoreObservable<ReduceObserver<O, F, Acc>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Reduce { source, func, seed } = self;
    source.actual_subscribe(ReduceObserver { observer, func, acc: Some(seed) })
  }
}

pub struct ReduceObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Option<Acc>,
}

impl<O, F, Acc, Item, Err> Observer<Item, Err> for ReduceObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) { self.acc = self.acc.take().map(|acc| (self.func)(acc, value)); }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn reduce_sum() {
    let mut emitted = vec![];
    Local::from_iter(0..=5).reduce(0, |acc, v| acc + v).subscribe(|v| emitted.push(v));
    assert_eq!(emitted, vec![15]);
  }

  #[rxcombine_macro::test]
  fn reduce_on_empty() {
    let mut emitted = vec![];
    Local::empty::<i32>().reduce(100, |acc, v| acc + v).subscribe(|v| emitted.push(v));
    assert_eq!(emitted, vec![100]);
  }

  #[rxcombine_macro::test]
  fn reduce_mixed_types() {
    let mut emitted = String::new();
    Local::from_iter([1, 2, 3])
      .reduce(String::new(), |acc, v| format!("{acc}{v}"))
      .subscribe(|v| emitted = v);
    assert_eq!(emitted, "123");
  }

  #[rxcombine_macro::test]
  fn reduce_completes_correctly() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    Local::from_iter([1, 2]).reduce(0, |acc, v| acc + v).subscribe_all(
      |v| assert_eq!(v, 3),
      |_| {},
      move || c_completed.set(true),
    );
    assert!(completed.get());
  }

  #[rxcombine_macro::test]
  fn reduce_waits_for_subject_completion() {
    let mut subject = Local::subject::<i32, std::convert::Infallible>();
    let emitted = Rc::new(Cell::new(None));

    let c_emitted = emitted.clone();
    let _guard = subject
      .clone()
      .reduce(0, |acc, v| acc + v)
      .subscribe(move |v| c_emitted.set(Some(v)));
    subject.next(4);
    subject.next(5);
    assert_eq!(emitted.get(), None);

    subject.complete();
    assert_eq!(emitted.get(), Some(9));
  }
}
