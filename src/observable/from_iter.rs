use std::{convert::Infallible, marker::PhantomData};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  scope::Scope,
};

/// Emits every element of an iterator in order, synchronously, then
/// completes. Stops early when the observer reports closed.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let mut out = vec![];
/// Local::from_iter(vec![0, 1, 2, 3]).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![0, 1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct FromIter<I, S> {
  pub(crate) iter: I,
  pub(crate) _scope: PhantomData<S>,
}

impl<I, S> ObservableType for FromIter<I, S>
where
  I: IntoIterator,
  S: Scope,
{
  type Item = I::Item;
  type Err = Infallible;
  type Scope = S;
}

impl<I, S, O> CoreObservable<O> for FromIter<I, S>
where
  I: IntoIterator,
  S: Scope,
  O: Observer<I::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for v in self.iter {
      if observer.is_closed() {
        return;
      }
      observer.next(v);
    }
    if !observer.is_closed() {
      observer.complete();
    }
  }
}

/// Completes immediately without emitting.
pub struct Empty<Item, Err, S> {
  pub(crate) _p: PhantomData<fn() -> (Item, Err, S)>,
}

impl<Item, Err, S> Clone for Empty<Item, Err, S> {
  fn clone(&self) -> Self { Empty { _p: PhantomData } }
}

impl<Item, Err, S: Scope> ObservableType for Empty<Item, Err, S> {
  type Item = Item;
  type Err = Err;
  type Scope = S;
}

impl<Item, Err, S, O> CoreObservable<O> for Empty<Item, Err, S>
where
  S: Scope,
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}
