//! The tutorial pipelines.
//!
//! Every demo builds one small pipeline, drives it, and returns what it
//! printed, line by line. The `rxcombine-demo` binary prints these
//! transcripts; the integration tests compare them.

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use clap::ValueEnum;

use crate::{
  binding::{bind_text, Label, TapCounter},
  observable::{BoxedObservable, Observable},
  observer::Observer,
  scheduler::TaskQueue,
  scope::{Local, ObservableFactory},
};

/// Shared line buffer the demo subscribers write to.
#[derive(Clone, Default)]
struct Transcript(Rc<RefCell<Vec<String>>>);

impl Transcript {
  fn print(&self, line: impl Into<String>) { self.0.borrow_mut().push(line.into()) }

  fn lines(&self) -> Vec<String> { self.0.borrow().clone() }
}

/// Names accepted by `rxcombine-demo --demo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Demo {
  Sink,
  Assign,
  SubjectSend,
  MultipleSubscribers,
  CurrentValue,
  Scan,
  Reduce,
  CombineLatest,
  Merge,
  Zip,
}

impl Demo {
  /// Run the demo. `taps` is only used by [`Demo::Assign`].
  pub fn run(self, taps: u32) -> Vec<String> {
    tracing::debug!(demo = ?self, "running demo");
    match self {
      Demo::Sink => sink(),
      Demo::Assign => assign(taps),
      Demo::SubjectSend => subject_send(),
      Demo::MultipleSubscribers => multiple_subscribers(),
      Demo::CurrentValue => current_value(),
      Demo::Scan => scan(),
      Demo::Reduce => reduce(),
      Demo::CombineLatest => combine_latest(),
      Demo::Merge => merge(),
      Demo::Zip => zip(),
    }
  }
}

/// A single value through `map` into a closure subscriber.
pub fn sink() -> Vec<String> {
  let transcript = Transcript::default();
  let out = transcript.clone();
  Local::of("Jageloo").map(str::to_string).subscribe(move |v| out.print(v));
  transcript.lines()
}

/// A label bound to the tap counter through the main queue. Records the
/// label after the initial drain and after every tap.
pub fn assign(taps: u32) -> Vec<String> {
  let mut counter = TapCounter::new();
  let queue = TaskQueue::new();
  let label = Rc::new(RefCell::new(Label::new()));
  let mut lines = vec![];

  let _binding = bind_text(counter.label_text(), queue.clone(), label.clone());
  queue.run_until_idle();
  lines.push(label.borrow().text().to_string());

  for _ in 0..taps {
    counter.on_trigger();
    queue.run_until_idle();
    lines.push(label.borrow().text().to_string());
  }
  lines
}

/// Values sent by hand, then a subject fed by another publisher. The
/// feeding publisher completes the subject.
pub fn subject_send() -> Vec<String> {
  let transcript = Transcript::default();
  let mut subject = Local::subject::<String, Infallible>();

  let out = transcript.clone();
  let mut cancellable = subject.clone().subscribe(move |v| out.print(v));

  subject.next("Sending first object".to_string());
  subject.next("Sending second object".to_string());
  subject.next("Sending Third object".to_string());
  Local::of("Publishing the Value for subject".to_string()).subscribe_with(subject.clone());
  subject.next("Sent after completion".to_string());
  cancellable.cancel();

  transcript.lines()
}

/// A late subscriber only sees what is sent after it registered.
pub fn multiple_subscribers() -> Vec<String> {
  let transcript = Transcript::default();
  let mut subject = Local::subject::<String, Infallible>();
  let publisher: BoxedObservable<String, Infallible> = subject.clone().box_it();

  let out = transcript.clone();
  let _subscriber1 = publisher.clone().subscribe(move |v| out.print(v));
  subject.next("Event1".to_string());
  subject.next("Event2".to_string());

  let out = transcript.clone();
  let _subscriber2 = publisher.subscribe(move |v| out.print(v));
  subject.next("Event3".to_string());

  transcript.lines()
}

/// A current-value subject replays its value before live sends.
pub fn current_value() -> Vec<String> {
  let transcript = Transcript::default();
  let mut subject = Local::behavior_subject::<String, Infallible>("Anuj".to_string());
  let publisher: BoxedObservable<String, Infallible> = subject.clone().box_it();

  let out = transcript.clone();
  let _anuj = publisher.subscribe(move |v| out.print(v));
  subject.next("Combine".to_string());
  subject.next("Swift".to_string());

  transcript.lines()
}

/// Running sums of `0..=5`, printed on one line.
pub fn scan() -> Vec<String> {
  let mut sums = vec![];
  Local::from_iter(0..=5).scan(0, |acc, v| acc + v).subscribe(|v| sums.push(v.to_string()));
  vec![sums.join(" ")]
}

/// Sum of `0..=5`.
pub fn reduce() -> Vec<String> {
  let mut lines = vec![];
  Local::from_iter(0..=5).reduce(0, |acc, v| acc + v).subscribe(|v| lines.push(v.to_string()));
  lines
}

/// Credentials are valid when both are present and the password is longer
/// than twelve characters.
pub fn credentials_valid(username: &str, password: &str) -> bool {
  !username.is_empty() && !password.is_empty() && password.chars().count() > 12
}

/// One erased validation pipeline shared by two subscribers.
pub fn combine_latest() -> Vec<String> {
  let transcript = Transcript::default();
  let mut username = Local::subject::<String, Infallible>();
  let mut password = Local::subject::<String, Infallible>();

  let validated: BoxedObservable<bool, Infallible> = username
    .clone()
    .combine_latest(password.clone())
    .map(|(user, pass): (String, String)| credentials_valid(&user, &pass))
    .box_it();

  let out = transcript.clone();
  let _first = validated.clone().subscribe(move |valid| {
    out.print(format!("First Subscriber: CombineLatest: Are the credentials valid: {valid}"))
  });
  let out = transcript.clone();
  let _second = validated.subscribe(move |valid| {
    out.print(format!("Second Subscriber: CombineLatest: Are the credentials valid: {valid}"))
  });

  username.next("avanderlee".to_string());
  password.next("weakpass".to_string());
  password.next("verystrongpassword".to_string());

  transcript.lines()
}

/// Two city streams merged into one.
pub fn merge() -> Vec<String> {
  let transcript = Transcript::default();
  let mut german_cities = Local::subject::<String, Infallible>();
  let mut italian_cities = Local::subject::<String, Infallible>();

  let cities: BoxedObservable<String, Infallible> =
    german_cities.clone().merge(italian_cities.clone()).box_it();
  let out = transcript.clone();
  let _subscriber = cities.subscribe(move |city| out.print(format!("{city} is a city in europe")));

  german_cities.next("Munich".to_string());
  italian_cities.next("Milano".to_string());

  transcript.lines()
}

/// Username and password streams paired by position.
pub fn zip() -> Vec<String> {
  let transcript = Transcript::default();
  let mut username = Local::subject::<String, Infallible>();
  let mut password = Local::subject::<String, Infallible>();

  let out = transcript.clone();
  let _subscriber =
    username.clone().zip(password.clone()).subscribe(move |pair| out.print(format!("{pair:?}")));

  username.next("Rai55@32342".to_string());
  password.next("veryStrongPassword".to_string());
  password.next("veryStrongPassword2".to_string());
  username.next("AnujRai890888@3234909".to_string());

  transcript.lines()
}
