//! Non-resettable wrapper for counters holding all-time totals.
//!
//! This module provides [`NonResettable`], a wrapper that prevents counters
//! from being reset when `value_and_reset()` is called. This is useful
//! wherever the collection pipeline resets counters per window but a
//! particular counter must keep its cumulative total, e.g. for Prometheus
//! counters that must be monotonically increasing.
//!
//! # Example
//!
//! ```rust
//! use stocastico::counters::exact::Exact;
//! use stocastico::counters::Observable;
//! use stocastico::adapters::NonResettable;
//!
//! let counter = NonResettable::new(Exact::new().with_name("total_requests"));
//! counter.add(100);
//!
//! // value_and_reset() returns the value but does NOT reset
//! assert_eq!(counter.value_and_reset().as_u64(), 100);
//! assert_eq!(Observable::value(&counter).as_u64(), 100); // Still 100!
//! ```

use crate::counters::{CounterValue, Observable};
use std::fmt::{self, Debug};
use std::ops::Deref;

/// A wrapper that prevents a counter from being reset.
///
/// When `value_and_reset()` is called on a `NonResettable` counter, it
/// returns the current value but does not reset the underlying counter.
/// For the probabilistic counter this also means the acceptance threshold
/// keeps decaying across collection windows, preserving the contention
/// relief it has already earned.
///
/// # Example
///
/// ```rust
/// use stocastico::counters::exact::Exact;
/// use stocastico::counters::Observable;
/// use stocastico::adapters::NonResettable;
///
/// let total = NonResettable::new(Exact::new().with_name("total_events"));
/// total.add(50);
/// total.add(50);
///
/// // Calling value_and_reset returns the value...
/// let v = total.value_and_reset();
/// assert_eq!(v.as_u64(), 100);
///
/// // ...but the counter is NOT reset
/// total.add(25);
/// assert_eq!(Observable::value(&total).as_u64(), 125);
/// ```
pub struct NonResettable<T> {
    inner: T,
}

impl<T> NonResettable<T> {
    /// Creates a new non-resettable wrapper around the given counter.
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns a reference to the inner counter.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes the wrapper and returns the inner counter.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Observable> Observable for NonResettable<T> {
    /// Returns the name of the underlying counter.
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the current value of the underlying counter.
    fn value(&self) -> CounterValue {
        self.inner.value()
    }

    /// Returns the current value WITHOUT resetting the counter.
    fn value_and_reset(&self) -> CounterValue {
        self.inner.value()
    }

    /// Forwards the underlying counter's labels.
    fn labels(&self) -> &[(String, String)] {
        self.inner.labels()
    }
}

impl<T: Debug> Debug for NonResettable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonResettable")
            .field("inner", &self.inner)
            .finish()
    }
}

/// Allows transparent access to the inner counter's methods.
impl<T> Deref for NonResettable<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

// DerefMut is intentionally not implemented: a mutable borrow of the inner
// counter could bypass the non-resettable behavior.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::exact::Exact;
    use crate::counters::scalable::Scalable;

    #[test]
    fn test_new() {
        let counter = NonResettable::new(Exact::new().with_name("test"));
        assert_eq!(counter.name(), "test");
    }

    #[test]
    fn test_value() {
        let counter = NonResettable::new(Exact::new());
        counter.add(42);
        assert_eq!(Observable::value(&counter), CounterValue::Exact(42));
    }

    #[test]
    fn test_value_and_reset_does_not_reset() {
        let counter = NonResettable::new(Exact::new());
        counter.add(100);

        assert_eq!(counter.value_and_reset(), CounterValue::Exact(100));
        assert_eq!(Observable::value(&counter), CounterValue::Exact(100));
        assert_eq!(counter.value_and_reset(), CounterValue::Exact(100));
    }

    #[test]
    fn test_accumulates_after_value_and_reset() {
        let counter = NonResettable::new(Exact::new());
        counter.add(100);
        counter.value_and_reset();
        counter.add(50);
        assert_eq!(Observable::value(&counter), CounterValue::Exact(150));
    }

    #[test]
    fn test_scalable_keeps_threshold_across_collections() {
        let counter = NonResettable::new(Scalable::new(0.01));
        for _ in 0..10 {
            counter.inc(0);
        }
        assert_eq!(counter.value_and_reset(), CounterValue::Estimate(10));
        // The acceptance threshold must not have been restored.
        assert!(counter.inner().acceptance_probability() < 1.0);
        assert_eq!(counter.inner().value(), 10);
    }

    #[test]
    fn test_inner() {
        let counter = NonResettable::new(Exact::new().with_name("inner_test"));
        assert_eq!(counter.inner().name(), "inner_test");
    }

    #[test]
    fn test_into_inner() {
        let counter = NonResettable::new(Exact::new().with_name("consume"));
        counter.add(42);
        let inner = counter.into_inner();
        assert_eq!(inner.value(), 42);
    }

    #[test]
    fn test_debug() {
        let counter = NonResettable::new(Exact::new().with_name("debug_test"));
        let debug_str = format!("{:?}", counter);
        assert!(debug_str.contains("NonResettable"));
    }
}
