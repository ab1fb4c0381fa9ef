use candela::timer::{TimerError, TimerQuery};
use candela_fake::FakeContext;

#[test]
fn results_require_a_completed_measure() {
  let mut ctx = FakeContext::new("timers");
  let mut timer = TimerQuery::new(&mut ctx).unwrap();

  assert_eq!(timer.is_ready(), Err(TimerError::NoResult));
  assert_eq!(timer.wait().err(), Some(TimerError::NoResult));
  assert_eq!(timer.end(), Err(TimerError::NotRunning));

  timer.begin().unwrap();
  assert_eq!(timer.begin(), Err(TimerError::AlreadyRunning));
  assert_eq!(timer.is_ready(), Err(TimerError::NoResult));

  timer.end().unwrap();
  assert_eq!(timer.is_ready(), Ok(true));
  assert!(timer.wait().unwrap().as_nanos() > 0);
}

#[test]
fn one_timer_query_runs_per_context() {
  let mut ctx = FakeContext::new("timers");
  let mut first = TimerQuery::new(&mut ctx).unwrap();
  let mut second = TimerQuery::new(&mut ctx).unwrap();

  first.begin().unwrap();
  assert_eq!(second.begin(), Err(TimerError::AnotherQueryRunning));

  first.end().unwrap();
  second.begin().unwrap();
  second.end().unwrap();
}

#[test]
fn separate_contexts_time_independently() {
  let mut ctx = FakeContext::new("timers");
  let mut other = FakeContext::new("elsewhere");
  let mut here = TimerQuery::new(&mut ctx).unwrap();
  let mut there = TimerQuery::new(&mut other).unwrap();

  here.begin().unwrap();
  there.begin().unwrap();
  here.end().unwrap();
  there.end().unwrap();

  assert!(here.wait().is_ok());
  assert!(there.wait().is_ok());
}

#[test]
fn dropping_a_running_timer_frees_the_context() {
  let mut ctx = FakeContext::new("timers");

  {
    let mut abandoned = TimerQuery::new(&mut ctx).unwrap();
    abandoned.begin().unwrap();
  }

  let mut timer = TimerQuery::new(&mut ctx).unwrap();
  timer.begin().unwrap();
  timer.end().unwrap();
}

#[test]
fn measures_are_deterministic() {
  let mut ctx = FakeContext::new("timers");
  let mut timer = TimerQuery::new(&mut ctx).unwrap();

  timer.begin().unwrap();
  timer.end().unwrap();
  let first = timer.wait().unwrap();

  timer.begin().unwrap();
  timer.end().unwrap();
  let second = timer.wait().unwrap();

  assert_eq!(first, second);
  assert!(first.as_nanos() > 0);
}

#[test]
fn restarting_a_timer_drops_the_previous_result() {
  let mut ctx = FakeContext::new("timers");
  let mut timer = TimerQuery::new(&mut ctx).unwrap();

  timer.begin().unwrap();
  timer.end().unwrap();
  timer.wait().unwrap();

  timer.begin().unwrap();
  assert_eq!(timer.is_ready(), Err(TimerError::NoResult));
  timer.end().unwrap();
  assert_eq!(timer.is_ready(), Ok(true));
}
