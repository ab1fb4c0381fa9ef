//! Timer query backend interface.

use crate::timer::TimerError;

/// Timer query backend.
///
/// Drivers measure elapsed device time between `begin` and `end`. Only one timer query may be
/// running per context at any time; backends track that through their state.
pub unsafe trait Timer {
  /// Representation of a timer query.
  type TimerRepr;

  /// Allocate a timer query.
  unsafe fn new_timer(&mut self) -> Result<Self::TimerRepr, TimerError>;

  /// Destroy a timer query.
  unsafe fn destroy_timer(timer: &mut Self::TimerRepr);

  /// Start measuring.
  unsafe fn begin(timer: &mut Self::TimerRepr) -> Result<(), TimerError>;

  /// Stop measuring.
  unsafe fn end(timer: &mut Self::TimerRepr) -> Result<(), TimerError>;

  /// Whether a result is available without blocking.
  unsafe fn is_ready(timer: &Self::TimerRepr) -> Result<bool, TimerError>;

  /// Block until the result is available and return elapsed nanoseconds.
  unsafe fn wait_nanoseconds(timer: &Self::TimerRepr) -> Result<u64, TimerError>;
}
