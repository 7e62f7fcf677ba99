use std::{convert::Infallible, marker::PhantomData};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  scope::Scope,
};

/// Emits one value, then completes. Created by
/// [`ObservableFactory::of`](crate::scope::ObservableFactory::of).
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let mut received = None;
/// Local::of("Jageloo").subscribe(|v| received = Some(v));
/// assert_eq!(received, Some("Jageloo"));
/// ```
#[derive(Clone)]
pub struct Of<Item, S> {
  pub(crate) value: Item,
  pub(crate) _scope: PhantomData<S>,
}

impl<Item, S: Scope> ObservableType for Of<Item, S> {
  type Item = Item;
  type Err = Infallible;
  type Scope = S;
}

impl<Item, S, O> CoreObservable<O> for Of<Item, S>
where
  S: Scope,
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    if observer.is_closed() {
      return;
    }
    observer.next(self.value);
    observer.complete();
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn of_emits_once_then_completes() {
    let hits = Rc::new(Cell::new(0));
    let completed = Rc::new(Cell::new(false));
    let (c_hits, c_completed) = (hits.clone(), completed.clone());

    Local::of(123).subscribe_all(
      move |v| {
        assert_eq!(v, 123);
        c_hits.set(c_hits.get() + 1);
      },
      |_| {},
      move || c_completed.set(true),
    );

    assert_eq!(hits.get(), 1);
    assert!(completed.get());
  }

  #[rxcombine_macro::test]
  fn shared_of_crosses_threads() {
    let handle = std::thread::spawn(|| {
      let mut out = None;
      Shared::of(String::from("sent")).subscribe(|v| out = Some(v));
      out
    });
    assert_eq!(handle.join().ok().flatten().as_deref(), Some("sent"));
  }
}
