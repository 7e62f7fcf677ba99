//! Shared mutable pointers and flags.
//!
//! Every stateful piece of the library (subjects, multi-source operators,
//! `observe_on`) keeps its state behind one of these pointers. `MutRc` is the
//! single-threaded flavour used by the [`Local`](crate::scope::Local) scope,
//! `MutArc` the lock-based flavour used by [`Shared`](crate::scope::Shared).
//! Code that only needs "some shared, mutable cell" is written against
//! [`RcDeref`] / [`RcDerefMut`] and works with both.

use std::{
  cell::{Cell, Ref, RefCell, RefMut},
  ops::{Deref, DerefMut},
  rc::Rc,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
  },
};

/// Shared read access to the pointee.
pub trait RcDeref {
  type Target;
  type Guard<'a>: Deref<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref(&self) -> Self::Guard<'_>;
}

/// Exclusive access to the pointee.
///
/// For `MutRc` this is a `RefCell` borrow and panics on a conflicting
/// borrow; for `MutArc` it blocks until the lock is free.
pub trait RcDerefMut: RcDeref {
  type GuardMut<'a>: DerefMut<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref_mut(&self) -> Self::GuardMut<'_>;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  /// Whether both pointers refer to the same allocation.
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  /// Whether both pointers refer to the same allocation.
  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }

  // A panicking observer poisons the lock; the protected state is still
  // consistent because every critical section restores it before calling out.
  fn lock(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl<T> From<T> for MutRc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> From<T> for MutArc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> RcDeref for MutRc<T> {
  type Target = T;
  type Guard<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.0.borrow() }
}

impl<T> RcDerefMut for MutRc<T> {
  type GuardMut<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::GuardMut<'_> { self.0.borrow_mut() }
}

impl<T> RcDeref for MutArc<T> {
  type Target = T;
  type Guard<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.lock() }
}

impl<T> RcDerefMut for MutArc<T> {
  type GuardMut<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::GuardMut<'_> { self.lock() }
}

/// A one-way boolean shared between clones: once set it stays set.
///
/// Used to mark subscriptions as cancelled so that pending deliveries can
/// observe the cancellation without taking any lock.
pub trait SharedFlag: Clone + Default {
  fn set(&self);
  fn is_set(&self) -> bool;
}

#[derive(Clone, Default, Debug)]
pub struct FlagRc(Rc<Cell<bool>>);

#[derive(Clone, Default, Debug)]
pub struct FlagArc(Arc<AtomicBool>);

impl SharedFlag for FlagRc {
  #[inline]
  fn set(&self) { self.0.set(true) }

  #[inline]
  fn is_set(&self) -> bool { self.0.get() }
}

impl SharedFlag for FlagArc {
  #[inline]
  fn set(&self) { self.0.store(true, Ordering::Release) }

  #[inline]
  fn is_set(&self) -> bool { self.0.load(Ordering::Acquire) }
}
