//! Execution scopes.
//!
//! A scope decides how pipeline state is shared: [`Local`] keeps it in
//! `Rc<RefCell<_>>` and never requires `Send`, [`Shared`] keeps it behind
//! `Arc<Mutex<_>>` so pipelines and subjects can be driven from several
//! threads. Sources are created from a scope (`Local::from_iter(..)`,
//! `Shared::subject()`) and every operator inherits the scope of its
//! upstream.

use std::{convert::Infallible, marker::PhantomData};

use crate::{
  observable::{Empty, FromIter, Of},
  rc::{FlagArc, FlagRc, MutArc, MutRc, RcDerefMut, SharedFlag},
};

/// Type-level description of a scope.
pub trait Scope: Sized + 'static {
  /// Shared mutable pointer used for operator and subject state.
  type RcMut<T>: RcDerefMut<Target = T> + From<T> + Clone;
  /// Cancellation flag shared between a subscription and its deliveries.
  type Flag: SharedFlag;

  /// Wrap `value` in this scope's shared pointer.
  fn rc_mut<T>(value: T) -> Self::RcMut<T> { From::from(value) }
}

/// Single-threaded scope.
#[derive(Clone, Copy, Debug, Default)]
pub struct Local;

/// Thread-safe scope.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shared;

impl Scope for Local {
  type RcMut<T> = MutRc<T>;
  type Flag = FlagRc;
}

impl Scope for Shared {
  type RcMut<T> = MutArc<T>;
  type Flag = FlagArc;
}

/// Shorthand for `S::RcMut<T>`.
pub type RcMutOf<S, T> = <S as Scope>::RcMut<T>;

/// Shorthand for `S::Flag`.
pub type FlagOf<S> = <S as Scope>::Flag;

/// Creation methods shared by every scope.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let mut sum = 0;
/// Local::from_iter(0..=5).subscribe(|v| sum += v);
/// assert_eq!(sum, 15);
/// ```
pub trait ObservableFactory: Scope {
  /// Emit `value` once, then complete.
  fn of<Item>(value: Item) -> Of<Item, Self> { Of { value, _scope: PhantomData } }

  /// Emit every element of `iter` in order, then complete.
  fn from_iter<I>(iter: I) -> FromIter<I, Self>
  where
    I: IntoIterator,
  {
    FromIter { iter, _scope: PhantomData }
  }

  /// Complete immediately without emitting.
  fn empty<Item>() -> Empty<Item, Infallible, Self> { Empty { _p: PhantomData } }
}

impl<S: Scope> ObservableFactory for S {}
