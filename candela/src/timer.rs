//! Timer queries.
//!
//! A [`TimerQuery`] measures elapsed device time between [`begin`](TimerQuery::begin) and
//! [`end`](TimerQuery::end). Results become available asynchronously;
//! [`is_ready`](TimerQuery::is_ready) polls without blocking and [`wait`](TimerQuery::wait)
//! blocks until the driver answers.
//!
//! At most one timer query may be running per context at any time.

use std::error;
use std::fmt;
use std::time::Duration;

use crate::backend::timer::Timer as TimerBackend;
use crate::context::GraphicsContext;

/// A handle on one timer query.
#[derive(Debug)]
pub struct TimerQuery<B>
where
  B: ?Sized + TimerBackend,
{
  repr: B::TimerRepr,
}

impl<B> TimerQuery<B>
where
  B: ?Sized + TimerBackend,
{
  /// Allocate a timer query.
  pub fn new<C>(ctx: &mut C) -> Result<Self, TimerError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let repr = unsafe { ctx.backend().new_timer()? };
    Ok(TimerQuery { repr })
  }

  /// Start measuring.
  pub fn begin(&mut self) -> Result<(), TimerError> {
    unsafe { B::begin(&mut self.repr) }
  }

  /// Stop measuring.
  pub fn end(&mut self) -> Result<(), TimerError> {
    unsafe { B::end(&mut self.repr) }
  }

  /// Whether the result is available without blocking.
  pub fn is_ready(&self) -> Result<bool, TimerError> {
    unsafe { B::is_ready(&self.repr) }
  }

  /// Block until the result is available and hand the elapsed time back.
  pub fn wait(&self) -> Result<Duration, TimerError> {
    let nanoseconds = unsafe { B::wait_nanoseconds(&self.repr)? };
    Ok(Duration::from_nanos(nanoseconds))
  }
}

impl<B> Drop for TimerQuery<B>
where
  B: ?Sized + TimerBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_timer(&mut self.repr) }
  }
}

/// Timer query error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TimerError {
  /// The device has no timer query support.
  Unsupported,

  /// This query is already running.
  AlreadyRunning,

  /// Another query is running on the context.
  AnotherQueryRunning,

  /// The query is not running.
  NotRunning,

  /// The query has never completed a begin/end pair.
  NoResult,
}

impl fmt::Display for TimerError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      TimerError::Unsupported => f.write_str("timer queries are not supported"),
      TimerError::AlreadyRunning => f.write_str("timer query already running"),
      TimerError::AnotherQueryRunning => f.write_str("another timer query is running"),
      TimerError::NotRunning => f.write_str("timer query is not running"),
      TimerError::NoResult => f.write_str("timer query has no result"),
    }
  }
}

impl error::Error for TimerError {}
