//! The UI boundary.
//!
//! A screen is modeled as a [`TapCounter`] (the state behind a button) and a
//! [`TextDisplay`] (a label). The counter publishes its text through a
//! [`BehaviorSubject`](crate::subject::BehaviorSubject); [`bind_text`]
//! forwards that text to a display through a [`TaskQueue`] standing in for
//! the UI thread.

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use crate::{
  observable::{CoreObservable, Observable, ObservableType},
  observer::Observer,
  ops::observe_on::ObserveOn,
  scheduler::TaskQueue,
  scope::Local,
  subject::LocalBehaviorSubject,
  subscription::SubscriptionGuard,
};

/// Text shown before the first tap.
pub const INITIAL_LABEL: &str = "You dont tap the button";

/// Receives text updates.
pub trait TextDisplay {
  fn on_value_changed(&mut self, value: String);
}

/// In-memory label.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Label {
  text: String,
  updates: usize,
}

impl Label {
  pub fn new() -> Self { Self::default() }

  pub fn text(&self) -> &str { &self.text }

  /// How many times the text was set.
  pub fn updates(&self) -> usize { self.updates }
}

impl TextDisplay for Label {
  fn on_value_changed(&mut self, value: String) {
    self.text = value;
    self.updates += 1;
  }
}

/// Counts button presses and publishes the matching label text.
pub struct TapCounter {
  tap_count: u32,
  label_text: LocalBehaviorSubject<'static, String, Infallible>,
}

impl Default for TapCounter {
  fn default() -> Self { Self::new() }
}

impl TapCounter {
  pub fn new() -> Self {
    Self { tap_count: 0, label_text: Local::behavior_subject(INITIAL_LABEL.to_string()) }
  }

  /// Handle one press of the button.
  pub fn on_trigger(&mut self) {
    self.tap_count = self.tap_count.saturating_add(1);
    tracing::debug!(taps = self.tap_count, "button tapped");
    self.label_text.next(format!("You have tapped the button {} time", self.tap_count));
  }

  pub fn tap_count(&self) -> u32 { self.tap_count }

  /// The label text as a publisher; new subscribers get the current text
  /// first.
  pub fn label_text(&self) -> LocalBehaviorSubject<'static, String, Infallible> {
    self.label_text.clone()
  }
}

/// Observer writing every value into a shared display.
pub struct DisplayObserver<D>(Rc<RefCell<D>>);

impl<D: TextDisplay> Observer<String, Infallible> for DisplayObserver<D> {
  fn next(&mut self, value: String) { self.0.borrow_mut().on_value_changed(value) }

  fn error(self, _: Infallible) {}

  fn complete(self) {}

  fn is_closed(&self) -> bool { false }
}

/// Keep `display` in sync with `publisher`. Updates are queued on `queue`
/// and reach the display when the queue is drained. Dropping the returned
/// guard ends the binding, including updates still in the queue.
pub fn bind_text<P, D>(
  publisher: P, queue: TaskQueue, display: Rc<RefCell<D>>,
) -> SubscriptionGuard<<ObserveOn<P, TaskQueue> as CoreObservable<DisplayObserver<D>>>::Unsub>
where
  P: ObservableType<Item = String, Err = Infallible>,
  D: TextDisplay,
  ObserveOn<P, TaskQueue>: CoreObservable<DisplayObserver<D>>,
{
  SubscriptionGuard::new(publisher.observe_on(queue).actual_subscribe(DisplayObserver(display)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxcombine_macro::test]
  fn label_starts_with_initial_text_after_drain() {
    let counter = TapCounter::new();
    let queue = TaskQueue::new();
    let label = Rc::new(RefCell::new(Label::new()));

    let _binding = bind_text(counter.label_text(), queue.clone(), label.clone());
    assert_eq!(label.borrow().text(), "");

    queue.run_until_idle();
    assert_eq!(label.borrow().text(), INITIAL_LABEL);
  }

  #[rxcombine_macro::test]
  fn taps_update_the_label_in_order() {
    let mut counter = TapCounter::new();
    let queue = TaskQueue::new();
    let label = Rc::new(RefCell::new(Label::new()));

    let _binding = bind_text(counter.label_text(), queue.clone(), label.clone());
    counter.on_trigger();
    counter.on_trigger();
    queue.run_until_idle();

    assert_eq!(counter.tap_count(), 2);
    assert_eq!(label.borrow().text(), "You have tapped the button 2 time");
    assert_eq!(label.borrow().updates(), 3);
  }

  #[rxcombine_macro::test]
  fn dropped_binding_stops_updates() {
    let mut counter = TapCounter::new();
    let queue = TaskQueue::new();
    let label = Rc::new(RefCell::new(Label::new()));

    let binding = bind_text(counter.label_text(), queue.clone(), label.clone());
    queue.run_until_idle();
    counter.on_trigger();
    drop(binding);
    queue.run_until_idle();
    counter.on_trigger();
    queue.run_until_idle();

    assert_eq!(label.borrow().text(), INITIAL_LABEL);
    assert_eq!(counter.label_text().value(), "You have tapped the button 2 time");
  }

  #[rxcombine_macro::test]
  fn tap_count_saturates() {
    let mut counter = TapCounter::new();
    counter.tap_count = u32::MAX;
    counter.on_trigger();

    assert_eq!(counter.tap_count(), u32::MAX);
    let expected = format!("You have tapped the button {} time", u32::MAX);
    assert_eq!(counter.label_text().value(), expected);
  }
}
