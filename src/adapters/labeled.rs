//! Labeled wrapper for adding tags/dimensions to counters.
//!
//! This module provides [`Labeled`], a wrapper that adds key-value labels
//! (also known as tags or dimensions) to a counter. This is particularly
//! useful for Prometheus-style metrics where labels are used to distinguish
//! between different instances of the same metric.
//!
//! # Example
//!
//! ```rust
//! use stocastico::counters::scalable::Scalable;
//! use stocastico::counters::Observable;
//! use stocastico::adapters::Labeled;
//!
//! let counter = Labeled::new(Scalable::new(0.01).with_name("http_requests"))
//!     .with_label("method", "GET")
//!     .with_label("path", "/api/users")
//!     .with_label("status", "200");
//!
//! counter.inc(7);
//!
//! for (key, value) in counter.labels() {
//!     println!("{}: {}", key, value);
//! }
//! ```

use crate::counters::{CounterValue, Observable};
use std::fmt::{self, Debug};
use std::ops::Deref;

/// A wrapper that adds labels (key-value tags) to a counter.
///
/// Labels are useful for:
///
/// - **Prometheus metrics**: Labels are exported as metric dimensions
/// - **Filtering and grouping**: Query metrics by label values
/// - **Multi-dimensional metrics**: Same metric name with different label combinations
///
/// # Example
///
/// ```rust
/// use stocastico::counters::exact::Exact;
/// use stocastico::counters::Observable;
/// use stocastico::adapters::Labeled;
///
/// let requests = Labeled::new(Exact::new().with_name("http_requests"))
///     .with_label("method", "POST")
///     .with_label("endpoint", "/api/submit");
///
/// requests.inc();
///
/// assert_eq!(requests.get_label("method"), Some("POST"));
/// assert_eq!(requests.get_label("endpoint"), Some("/api/submit"));
/// ```
///
/// # Use with Prometheus Observer
///
/// ```rust,ignore
/// use stocastico::adapters::Labeled;
/// use stocastico::counters::scalable::Scalable;
/// use stocastico::observers::prometheus::PrometheusObserver;
///
/// let get_requests = Labeled::new(Scalable::new(0.01).with_name("http_requests"))
///     .with_label("method", "GET");
///
/// // Prometheus output will show:
/// // http_requests{method="GET"} ...
/// ```
pub struct Labeled<T> {
    inner: T,
    labels: Vec<(String, String)>,
}

impl<T> Labeled<T> {
    /// Creates a new labeled wrapper around the given counter.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            labels: Vec::new(),
        }
    }

    /// Creates a new labeled wrapper with pre-defined labels.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stocastico::counters::exact::Exact;
    /// use stocastico::adapters::Labeled;
    ///
    /// let labels = vec![
    ///     ("env".to_string(), "production".to_string()),
    ///     ("region".to_string(), "us-east".to_string()),
    /// ];
    ///
    /// let counter = Labeled::with_labels(Exact::new(), labels);
    /// ```
    pub fn with_labels(inner: T, labels: Vec<(String, String)>) -> Self {
        Self { inner, labels }
    }

    /// Adds a label, returning `self` for method chaining.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Returns the value of the label with the given key, if present.
    pub fn get_label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all labels in insertion order.
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
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

impl<T: Observable> Observable for Labeled<T> {
    /// Returns the name of the underlying counter.
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the current value of the underlying counter.
    fn value(&self) -> CounterValue {
        self.inner.value()
    }

    /// Returns the current value and resets the underlying counter.
    fn value_and_reset(&self) -> CounterValue {
        self.inner.value_and_reset()
    }

    /// Returns the attached labels, for observers that export dimensions.
    fn labels(&self) -> &[(String, String)] {
        &self.labels
    }
}

impl<T: Debug> Debug for Labeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Labeled")
            .field("inner", &self.inner)
            .field("labels", &self.labels)
            .finish()
    }
}

/// Allows transparent access to the inner counter's methods.
impl<T> Deref for Labeled<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
