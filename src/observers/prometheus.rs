//! Prometheus observer for exporting counters using the official `prometheus` crate.
//!
//! This module provides [`PrometheusObserver`], which exports a collection of
//! [`Observable`] counters through a Prometheus
//! [`Registry`](prometheus::Registry) and renders them using the official
//! text exposition format.
//!
//! Every counter in this crate is monotonically increasing, including the
//! probabilistic one, so everything is exported as a Prometheus `Counter`.
//! A projection is still a valid counter sample: it is non-decreasing
//! between resets and its noise is bounded by the configured relative
//! standard deviation.
//!
//! # Feature Flag
//!
//! This module requires the `prometheus` feature:
//!
//! ```toml
//! [dependencies]
//! stocastico = { version = "0.3", features = ["prometheus"] }
//! ```
//!
//! # Integration with Prometheus
//!
//! 1. Create a `PrometheusObserver`
//! 2. Call `render()` to get the exposition format string
//! 3. Serve this string on an HTTP `/metrics` endpoint
//! 4. Configure Prometheus to scrape your endpoint
//!
//! # Examples
//!
//! ```rust,ignore
//! use stocastico::counters::scalable::Scalable;
//! use stocastico::counters::Observable;
//! use stocastico::observers::prometheus::PrometheusObserver;
//!
//! let requests = Scalable::new(0.01).with_name("http_requests_total");
//!
//! let observer = PrometheusObserver::new()
//!     .with_namespace("myapp")
//!     .with_const_label("instance", "localhost:8080")
//!     .with_help("http_requests_total", "Total HTTP requests (estimated)");
//!
//! let counters: Vec<&dyn Observable> = vec![&requests];
//! let output = observer.render(counters.into_iter())?;
//! println!("{}", output);
//! # Ok::<(), stocastico::observers::ObserverError>(())
//! ```

use crate::counters::Observable;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::collections::HashMap;

use super::{PrometheusError, Result};

/// Observer that exports counters to Prometheus format using the official crate.
///
/// This observer creates Prometheus metrics from [`Observable`] counters and
/// renders them using the official [`TextEncoder`](prometheus::TextEncoder).
/// Labels attached via the [`Labeled`](crate::adapters::Labeled) adapter are
/// exported as metric dimensions; observer-level constant labels apply to
/// every metric.
///
/// # Example
///
/// ```rust,ignore
/// use stocastico::counters::exact::Exact;
/// use stocastico::counters::Observable;
/// use stocastico::observers::prometheus::PrometheusObserver;
///
/// let counter = Exact::new().with_name("my_counter");
/// counter.add(42);
///
/// let observer = PrometheusObserver::new();
/// let counters: Vec<&dyn Observable> = vec![&counter];
/// let output = observer.render(counters.into_iter())?;
///
/// assert!(output.contains("my_counter 42"));
/// # Ok::<(), stocastico::observers::ObserverError>(())
/// ```
pub struct PrometheusObserver {
    /// Namespace (prefix) for all metrics.
    namespace: Option<String>,
    /// Subsystem for all metrics.
    subsystem: Option<String>,
    /// Constant labels applied to all metrics.
    const_labels: HashMap<String, String>,
    /// Per-metric help text.
    help_texts: HashMap<String, String>,
}

impl Default for PrometheusObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusObserver {
    /// Creates a new `PrometheusObserver`.
    pub fn new() -> Self {
        Self {
            namespace: None,
            subsystem: None,
            const_labels: HashMap::new(),
            help_texts: HashMap::new(),
        }
    }

    /// Sets the namespace (prefix) for all metrics.
    ///
    /// The namespace is prepended to metric names with an underscore.
    /// For example, namespace "myapp" + metric "requests" = "myapp_requests".
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Sets the subsystem for all metrics.
    ///
    /// The subsystem appears between namespace and metric name.
    /// For example, namespace "myapp" + subsystem "http" + metric "requests"
    /// = "myapp_http_requests".
    pub fn with_subsystem(mut self, subsystem: &str) -> Self {
        self.subsystem = Some(subsystem.to_string());
        self
    }

    /// Adds a constant label to all metrics.
    ///
    /// Constant labels are useful for identifying the source instance,
    /// environment, or other metadata.
    pub fn with_const_label(mut self, name: &str, value: &str) -> Self {
        self.const_labels
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the help text for a specific metric (keyed by raw counter name).
    pub fn with_help(mut self, name: &str, help: &str) -> Self {
        self.help_texts.insert(name.to_string(), help.to_string());
        self
    }

    /// Sanitizes a metric name to be Prometheus-compatible.
    ///
    /// Prometheus metric names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    fn sanitize_name(name: &str) -> String {
        let mut result = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                result.push(c);
            } else if c == '-' || c == '.' || c == ' ' {
                result.push('_');
            }
        }
        if result.is_empty() {
            result.push_str("unnamed");
        }
        if result
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
        {
            result.insert(0, '_');
        }
        result
    }

    /// Builds the full metric name with namespace and subsystem.
    fn build_full_name(&self, name: &str) -> String {
        let sanitized = Self::sanitize_name(name);
        match (&self.namespace, &self.subsystem) {
            (Some(ns), Some(ss)) => format!("{}_{}_{}", ns, ss, sanitized),
            (Some(ns), None) => format!("{}_{}", ns, sanitized),
            (None, Some(ss)) => format!("{}_{}", ss, sanitized),
            (None, None) => sanitized,
        }
    }

    /// Renders counters to Prometheus exposition format.
    ///
    /// A fresh registry is created per render so repeated calls never
    /// collide on metric registration.
    ///
    /// # Errors
    ///
    /// Returns an error if metric creation, registration, or encoding fails.
    pub fn render<'a>(&self, counters: impl Iterator<Item = &'a dyn Observable>) -> Result<String> {
        let registry = Registry::new();
        for counter in counters {
            self.register_counter(&registry, counter, counter.value().as_u64())?;
        }
        self.encode_registry(&registry)
    }

    /// Renders counters and resets each one after reading it.
    ///
    /// # Errors
    ///
    /// Returns an error if metric creation, registration, or encoding fails.
    pub fn render_and_reset<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<String> {
        let registry = Registry::new();
        for counter in counters {
            self.register_counter(&registry, counter, counter.value_and_reset().as_u64())?;
        }
        self.encode_registry(&registry)
    }

    /// Renders counters to bytes (useful for HTTP responses).
    ///
    /// # Errors
    ///
    /// Returns an error if metric creation, registration, or encoding fails.
    pub fn render_bytes<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<Vec<u8>> {
        Ok(self.render(counters)?.into_bytes())
    }

    /// Registers one counter sample with the registry.
    fn register_counter(
        &self,
        registry: &Registry,
        counter: &dyn Observable,
        value: u64,
    ) -> Result<()> {
        let raw_name = if counter.name().is_empty() {
            "unnamed"
        } else {
            counter.name()
        };
        let full_name = self.build_full_name(raw_name);
        let help = self
            .help_texts
            .get(raw_name)
            .cloned()
            .unwrap_or_else(|| format!("{} metric", raw_name));

        let mut labels = self.const_labels.clone();
        for (k, v) in counter.labels() {
            labels.insert(k.clone(), v.clone());
        }

        if labels.is_empty() {
            let metric = IntCounter::new(full_name, help)?;
            metric.inc_by(value);
            registry.register(Box::new(metric))?;
        } else {
            let label_names: Vec<&str> = labels.keys().map(|s| s.as_str()).collect();
            let metric = prometheus::IntCounterVec::new(
                prometheus::Opts::new(full_name, help),
                &label_names,
            )?;
            let label_values: Vec<&str> = labels.values().map(|s| s.as_str()).collect();
            metric.with_label_values(&label_values).inc_by(value);
            registry.register(Box::new(metric))?;
        }
        Ok(())
    }

    /// Encodes the registry to a string.
    fn encode_registry(&self, registry: &Registry) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| PrometheusError::EncodeError(e.to_string()))?;
        let text = String::from_utf8(buffer).map_err(PrometheusError::from)?;
        Ok(text)
    }
}
