//! Integration tests for rxcombine
//!
//! Operator chains across subjects, the main queue and both scopes.

use std::{cell::RefCell, convert::Infallible, rc::Rc};
#[cfg(not(target_arch = "wasm32"))]
use std::{
  sync::{Arc, Mutex},
  thread,
};

use rxcombine::prelude::*;

#[rxcombine_macro::test]
fn subject_through_scan_and_map() {
  let result = Rc::new(RefCell::new(Vec::new()));
  let result_clone = result.clone();
  let mut subject = Local::subject::<i32, Infallible>();

  let _guard = subject
    .clone()
    .scan(0, |acc, v| acc + v)
    .map(|sum| sum * 10)
    .subscribe(move |v| result_clone.borrow_mut().push(v));
  for v in 1..=4 {
    subject.next(v);
  }

  assert_eq!(*result.borrow(), vec![10, 30, 60, 100]);
}

#[rxcombine_macro::test]
fn reduce_waits_for_subject_completion() {
  let result = Rc::new(RefCell::new(Vec::new()));
  let result_clone = result.clone();
  let mut subject = Local::subject::<i32, Infallible>();

  let _guard = subject
    .clone()
    .reduce(0, |acc, v| acc + v)
    .subscribe(move |v| result_clone.borrow_mut().push(v));
  subject.next(5);
  subject.next(6);
  assert!(result.borrow().is_empty());

  subject.complete();
  assert_eq!(*result.borrow(), vec![11]);
}

#[rxcombine_macro::test]
fn combine_latest_then_zip_with_a_third_source() {
  let result = Rc::new(RefCell::new(Vec::new()));
  let result_clone = result.clone();
  let mut a = Local::subject::<i32, Infallible>();
  let mut b = Local::subject::<i32, Infallible>();
  let mut labels = Local::subject::<&str, Infallible>();

  let _guard = a
    .clone()
    .combine_latest(b.clone())
    .map(|(x, y)| x + y)
    .zip(labels.clone())
    .subscribe(move |v| result_clone.borrow_mut().push(v));

  a.next(1);
  labels.next("first");
  b.next(10);
  a.next(2);
  labels.next("second");

  assert_eq!(*result.borrow(), vec![(11, "first"), (12, "second")]);
}

#[rxcombine_macro::test]
fn queued_deliveries_are_dropped_on_cancel() {
  let queue = TaskQueue::new();
  let result = Rc::new(RefCell::new(Vec::new()));
  let result_clone = result.clone();
  let mut subject = Local::subject::<&str, Infallible>();

  let mut guard = subject
    .clone()
    .merge(Local::of("from of"))
    .observe_on(queue.clone())
    .subscribe(move |v| result_clone.borrow_mut().push(v));
  subject.next("queued");
  assert_eq!(queue.len(), 2);

  guard.cancel();
  queue.run_until_idle();
  subject.next("after cancel");
  queue.run_until_idle();

  assert!(result.borrow().is_empty());
}

#[rxcombine_macro::test]
fn boxed_pipelines_share_one_signature() {
  let result = Rc::new(RefCell::new(Vec::new()));
  let behavior = Local::behavior_subject::<i32, Infallible>(7);
  let sources: Vec<BoxedObservable<i32, Infallible>> = vec![
    Local::from_iter(1..=2).box_it(),
    Local::from_iter(0..=3).reduce(0, |acc, v| acc + v).box_it(),
    behavior.box_it(),
  ];

  let mut guards = vec![];
  for source in sources {
    let result_clone = result.clone();
    guards.push(source.subscribe(move |v| result_clone.borrow_mut().push(v)));
  }

  assert_eq!(*result.borrow(), vec![1, 2, 6, 7]);
}

#[cfg(not(target_arch = "wasm32"))]
#[rxcombine_macro::test]
fn shared_subject_across_threads() {
  let total = Arc::new(Mutex::new(0));
  let total_clone = total.clone();
  let subject = Shared::subject::<i32, Infallible>();

  let mut guard = subject.clone().subscribe(move |v| {
    if let Ok(mut total) = total_clone.lock() {
      *total += v;
    }
  });

  let handles: Vec<_> = (0..4)
    .map(|_| {
      let mut subject = subject.clone();
      thread::spawn(move || {
        for _ in 0..100 {
          subject.next(1);
        }
      })
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }
  assert_eq!(*total.lock().unwrap(), 400);

  thread::spawn(move || guard.cancel()).join().unwrap();
  let mut subject = subject;
  subject.next(1);
  assert_eq!(*total.lock().unwrap(), 400);
}

#[cfg(not(target_arch = "wasm32"))]
#[rxcombine_macro::test]
fn boxed_shared_pipeline_runs_on_another_thread() {
  let result = Arc::new(Mutex::new(Vec::new()));
  let result_clone = result.clone();
  let pipeline: BoxedObservableSend<String, Infallible> =
    Shared::from_iter(1..=3).scan(0, |acc, v| acc + v).map(|v| v.to_string()).box_it();

  thread::spawn(move || {
    pipeline.subscribe(move |v| result_clone.lock().unwrap().push(v));
  })
  .join()
  .unwrap();

  assert_eq!(*result.lock().unwrap(), vec!["1", "3", "6"]);
}
