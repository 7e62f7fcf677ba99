//! Scan operator implementation
//!
//! Folds every value into an accumulator and emits the accumulator after
//! each step.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Created by [`Observable::scan`](crate::observable::Observable::scan).
#[derive(Clone)]
pub struct Scan<S, F, Acc> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) seed: Acc,
}

impl<S, F, Acc> ObservableType for Scan<S, F, Acc>
where
  S: ObservableType,
{
  type Item = Acc;
  type Err = S::Err;
  type Scope = S::Scope;
}

impl<S, F, Acc, O> CoreObservable<O> for Scan<S, F, Acc>
where
  S: CoreObservable<ScanObserver<O, F, Acc>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Scan { source, func, seed } = self;
    source.actual_subscribe(ScanObserver { observer, func, acc: Some(seed) })
  }
}

pub struct ScanObserver<O, F, Acc> {
  observer: O,
  func: F,
  // Only `None` while `func` runs.
  acc: Option<Acc>,
}

impl<O, F, Acc, Item, Err> Observer<Item, Err> for ScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      let acc = (self.func)(acc, value);
      self.acc = Some(acc.clone());
      self.observer.next(acc);
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn running_sum() {
    let mut out = vec![];
    Local::from_iter(0..=5).scan(0, |acc, v| acc + v).subscribe(|v| out.push(v));
    assert_eq!(out, vec![0, 1, 3, 6, 10, 15]);
  }

  #[rxcombine_macro::test]
  fn scan_into_another_type() {
    let mut out = vec![];
    Local::from_iter(["a", "b", "c"])
      .scan(String::new(), |mut acc, v| {
        acc.push_str(v);
        acc
      })
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec!["a", "ab", "abc"]);
  }

  #[rxcombine_macro::test]
  fn scan_keeps_state_between_live_values() {
    let mut subject = Local::subject::<i32, Infallible>();
    let out = Rc::new(RefCell::new(vec![]));

    let c_out = out.clone();
    let _guard = subject
      .clone()
      .scan(100, |acc, v| acc + v)
      .subscribe(move |v| c_out.borrow_mut().push(v));
    subject.next(1);
    subject.next(1);

    assert_eq!(*out.borrow(), vec![101, 102]);
  }

  #[rxcombine_macro::test]
  fn empty_source_emits_nothing() {
    let mut hits = 0;
    Local::empty::<i32>().scan(0, |acc, v| acc + v).subscribe(|_| hits += 1);
    assert_eq!(hits, 0);
  }
}
