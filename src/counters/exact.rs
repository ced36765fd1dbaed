//! Exact monotone counter backed by a single atomic word.
//!
//! This module provides [`Exact`], the plain counterpart to
//! [`Scalable`](crate::counters::scalable::Scalable): one cache-padded
//! `AtomicU64` incremented with `fetch_add`. It is the honest baseline the
//! crate's benches compare against, and the right choice whenever the
//! update rate is low enough that cache-line bouncing does not hurt.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use std::fmt::Debug;

use crate::counters::{CounterValue, Observable};

/// An exact monotone counter on a single cache-padded atomic word.
///
/// Every increment is a `fetch_add` on the same word, so under heavy
/// concurrent writes this counter pays the full cache-line bouncing cost
/// the probabilistic counter exists to avoid. In exchange the value is
/// exact, reads are a single load, and the type can live in a `static`.
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use stocastico::counters::exact::Exact;
///
/// static REQUESTS: Exact = Exact::new().with_name("requests");
///
/// REQUESTS.add(5);
/// REQUESTS.inc();
/// assert_eq!(REQUESTS.value(), 6);
/// ```
///
/// Multi-threaded usage:
///
/// ```rust
/// use stocastico::counters::exact::Exact;
/// use std::sync::Arc;
/// use std::thread;
///
/// let counter = Arc::new(Exact::new());
/// let mut handles = vec![];
///
/// for _ in 0..4 {
///     let c = Arc::clone(&counter);
///     handles.push(thread::spawn(move || {
///         for _ in 0..1000 {
///             c.inc();
///         }
///     }));
/// }
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(counter.value(), 4000);
/// ```
pub struct Exact {
    name: &'static str,
    count: CachePadded<AtomicU64>,
}

impl Exact {
    /// Creates a new counter initialized to zero.
    pub const fn new() -> Self {
        Exact {
            name: "",
            count: CachePadded::new(AtomicU64::new(0)),
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stocastico::counters::exact::Exact;
    /// use stocastico::counters::Observable;
    ///
    /// let counter = Exact::new().with_name("http_errors");
    /// assert_eq!(counter.name(), "http_errors");
    /// ```
    pub const fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Adds a value to the counter.
    ///
    /// Relaxed ordering: a running total needs atomicity, not
    /// happens-before edges.
    #[inline]
    pub fn add(&self, value: u64) {
        self.count.fetch_add(value, Ordering::Relaxed);
    }

    /// Increments the counter by one.
    #[inline]
    pub fn inc(&self) {
        self.add(1);
    }

    /// Returns the current count.
    #[inline]
    pub fn value(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Observable for Exact {
    /// Returns the exact count.
    #[inline]
    fn value(&self) -> CounterValue {
        CounterValue::Exact(self.value())
    }

    /// Returns the name of this counter.
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the count and resets it to zero in one atomic step.
    #[inline]
    fn value_and_reset(&self) -> CounterValue {
        CounterValue::Exact(self.count.swap(0, Ordering::Relaxed))
    }
}

impl Default for Exact {
    /// Creates a new counter initialized to zero with no name.
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Exact {
    /// Formats the counter as `name{ value }`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{ {} }}", self.name, self.value())
    }
}
