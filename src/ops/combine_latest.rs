//! CombineLatest operator implementation
//!
//! Remembers the latest value of each source and, once both have emitted,
//! emits the pair every time either side emits.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::RcDerefMut,
  scope::{RcMutOf, Scope},
  subscription::TupleSubscription,
};

/// Created by
/// [`Observable::combine_latest`](crate::observable::Observable::combine_latest).
///
/// Both item types must be `Clone`: the latest value of each side is kept
/// and handed out again with every emission of the other side. Completes
/// when both sources have completed; the first error ends the stream.
#[derive(Clone)]
pub struct CombineLatest<A, B> {
  pub(crate) source1: A,
  pub(crate) source2: B,
}

impl<A, B> ObservableType for CombineLatest<A, B>
where
  A: ObservableType,
  B: ObservableType,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;
  type Scope = A::Scope;
}

pub struct CombineLatestState<O, ItemA, ItemB> {
  observer: Option<O>,
  latest_a: Option<ItemA>,
  latest_b: Option<ItemB>,
  completed: usize,
}

impl<O, ItemA, ItemB> CombineLatestState<O, ItemA, ItemB> {
  fn emit<Err>(&mut self)
  where
    O: Observer<(ItemA, ItemB), Err>,
    ItemA: Clone,
    ItemB: Clone,
  {
    if let (Some(a), Some(b), Some(observer)) =
      (self.latest_a.as_ref(), self.latest_b.as_ref(), self.observer.as_mut())
    {
      observer.next((a.clone(), b.clone()));
    }
  }

  fn complete_one(&mut self) -> Option<O> {
    self.completed += 1;
    if self.completed == 2 { self.observer.take() } else { None }
  }
}

/// Observer for the first source.
pub struct CombineLatestAObserver<P>(P);

/// Observer for the second source.
pub struct CombineLatestBObserver<P>(P);

type StateOf<A, B, O> = RcMutOf<
  <A as ObservableType>::Scope,
  CombineLatestState<O, <A as ObservableType>::Item, <B as ObservableType>::Item>,
>;

impl<A, B, O> CoreObservable<O> for CombineLatest<A, B>
where
  A: ObservableType + CoreObservable<CombineLatestAObserver<StateOf<A, B, O>>>,
  B: ObservableType + CoreObservable<CombineLatestBObserver<StateOf<A, B, O>>>,
{
  type Unsub = TupleSubscription<
    <A as CoreObservable<CombineLatestAObserver<StateOf<A, B, O>>>>::Unsub,
    <B as CoreObservable<CombineLatestBObserver<StateOf<A, B, O>>>>::Unsub,
  >;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let CombineLatest { source1, source2 } = self;
    let state: StateOf<A, B, O> = <A::Scope as Scope>::rc_mut(CombineLatestState {
      observer: Some(observer),
      latest_a: None,
      latest_b: None,
      completed: 0,
    });
    let unsub1 = source1.actual_subscribe(CombineLatestAObserver(state.clone()));
    let unsub2 = source2.actual_subscribe(CombineLatestBObserver(state));
    TupleSubscription::new(unsub1, unsub2)
  }
}

macro_rules! impl_combine_latest_observer {
  ($name:ident, $item:ident, $latest:ident) => {
    impl<P, O, ItemA, ItemB, Err> Observer<$item, Err> for $name<P>
    where
      P: RcDerefMut<Target = CombineLatestState<O, ItemA, ItemB>>,
      O: Observer<(ItemA, ItemB), Err>,
      ItemA: Clone,
      ItemB: Clone,
    {
      fn next(&mut self, value: $item) {
        let mut state = self.0.rc_deref_mut();
        state.$latest = Some(value);
        state.emit::<Err>();
      }

      fn error(self, err: Err) {
        let observer = self.0.rc_deref_mut().observer.take();
        if let Some(observer) = observer {
          observer.error(err);
        }
      }

      fn complete(self) {
        let observer = self.0.rc_deref_mut().complete_one();
        if let Some(observer) = observer {
          observer.complete();
        }
      }

      fn is_closed(&self) -> bool { self.0.rc_deref().observer.is_none() }
    }
  };
}

impl_combine_latest_observer!(CombineLatestAObserver, ItemA, latest_a);
impl_combine_latest_observer!(CombineLatestBObserver, ItemB, latest_b);
