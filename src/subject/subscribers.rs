use smallvec::SmallVec;

use crate::{observer::Observer, rc::SharedFlag};

/// One registered observer.
///
/// `closed` is shared with the subscription handle; a set flag means the
/// observer must not be called again, even if it is still in the list.
pub(crate) struct Entry<Ob, F> {
  pub(crate) id: usize,
  pub(crate) closed: F,
  pub(crate) observer: Ob,
}

impl<Ob, F: SharedFlag> Entry<Ob, F> {
  fn is_open<Item, Err>(&self) -> bool
  where
    Ob: Observer<Item, Err>,
  {
    !self.closed.is_set() && !Observer::<Item, Err>::is_closed(&self.observer)
  }
}

/// The observers of a subject, in subscription order. Most subjects have
/// one or two.
pub(crate) struct Subscribers<Ob, F> {
  entries: SmallVec<[Entry<Ob, F>; 2]>,
}

impl<Ob, F> Default for Subscribers<Ob, F> {
  fn default() -> Self { Self { entries: SmallVec::new() } }
}

impl<Ob, F: SharedFlag> Subscribers<Ob, F> {
  #[inline]
  pub(crate) fn push(&mut self, entry: Entry<Ob, F>) { self.entries.push(entry); }

  /// Move entries registered during an emission to the end of the list.
  #[inline]
  pub(crate) fn adopt(&mut self, pending: &mut Vec<Entry<Ob, F>>) {
    self.entries.extend(pending.drain(..));
  }

  pub(crate) fn remove(&mut self, id: usize) -> Option<Entry<Ob, F>> {
    let pos = self.entries.iter().position(|e| e.id == id)?;
    Some(self.entries.remove(pos))
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize { self.entries.len() }

  /// Deliver `value` to every open observer. The last one receives the
  /// moved value, the others a clone.
  ///
  /// Flags are re-checked right before each call: an observer cancelled by
  /// an earlier callback of the same emission is skipped.
  pub(crate) fn broadcast_value<Item, Err>(&mut self, value: Item)
  where
    Ob: Observer<Item, Err>,
    Item: Clone,
  {
    let mut iter = self.entries.iter_mut().filter(|e| !e.closed.is_set()).peekable();
    while let Some(entry) = iter.next() {
      if entry.closed.is_set() {
        continue;
      }
      if iter.peek().is_some() {
        entry.observer.next(value.clone());
      } else {
        entry.observer.next(value);
        break;
      }
    }
  }

  /// Send the terminal notification to every open observer and empty the
  /// list. Entries that were already closed are handed back so the caller
  /// can drop them outside its lock.
  pub(crate) fn broadcast_terminal<Item, Err>(
    &mut self, status: &Status<Err>,
  ) -> Vec<Entry<Ob, F>>
  where
    Ob: Observer<Item, Err>,
    Err: Clone,
  {
    let mut skipped = Vec::new();
    for entry in std::mem::take(&mut self.entries) {
      if entry.closed.is_set() {
        skipped.push(entry);
      } else {
        status.clone().deliver::<Item, _>(entry.observer);
      }
    }
    skipped
  }

  /// Take out the entries that are closed, either cancelled or reporting
  /// `is_closed`.
  pub(crate) fn take_closed<Item, Err>(&mut self) -> Vec<Entry<Ob, F>>
  where
    Ob: Observer<Item, Err>,
  {
    if self.entries.iter().all(Entry::is_open::<Item, Err>) {
      return Vec::new();
    }
    let (open, closed): (SmallVec<[_; 2]>, SmallVec<[_; 2]>) =
      std::mem::take(&mut self.entries).into_iter().partition(Entry::is_open::<Item, Err>);
    self.entries = open;
    closed.into_vec()
  }
}

/// Lifecycle of a subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Status<Err> {
  Active,
  Completed,
  Errored(Err),
}

impl<Err> Status<Err> {
  pub(crate) fn is_active(&self) -> bool { matches!(self, Status::Active) }

  /// Hand a terminal status to `observer`; `Active` just drops it.
  pub(crate) fn deliver<Item, O>(self, observer: O)
  where
    O: Observer<Item, Err>,
  {
    match self {
      Status::Active => {}
      Status::Completed => observer.complete(),
      Status::Errored(err) => observer.error(err),
    }
  }
}
