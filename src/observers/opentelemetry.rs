//! OpenTelemetry observer for exporting counters via OTLP.
//!
//! This module provides [`OtelObserver`], which registers counters with
//! OpenTelemetry's MeterProvider using observable instruments (callbacks).
//!
//! # Feature Flag
//!
//! This module requires the `opentelemetry` feature:
//!
//! ```toml
//! [dependencies]
//! stocastico = { version = "0.3", features = ["opentelemetry"] }
//! ```
//!
//! # How It Works
//!
//! Unlike push-based approaches, this observer uses OpenTelemetry's
//! observable instruments which are read via callbacks during metric
//! collection. This integrates naturally with any OpenTelemetry exporter
//! (OTLP, Prometheus, etc.). Both counter types here are monotonically
//! increasing, so every counter registers as an `ObservableCounter`; the
//! probabilistic counter's projection is read on each collection without
//! disturbing its acceptance threshold.
//!
//! # Example
//!
//! ```rust,ignore
//! use stocastico::counters::exact::Exact;
//! use stocastico::counters::Observable;
//! use stocastico::observers::opentelemetry::OtelObserver;
//!
//! static REQUESTS: Exact = Exact::new().with_name("http_requests_total");
//! static ERRORS: Exact = Exact::new().with_name("http_errors_total");
//!
//! fn main() -> stocastico::observers::Result<()> {
//!     // Setup OpenTelemetry MeterProvider first
//!
//!     let observer = OtelObserver::new("myapp");
//!     observer.register(&[&REQUESTS, &ERRORS])?;
//!
//!     // Counters are now automatically exported by the MeterProvider
//!     REQUESTS.inc();
//!
//!     Ok(())
//! }
//! ```

use crate::counters::Observable;
use opentelemetry::{global, metrics::Meter, KeyValue};

use super::{OtelError, Result};

/// Observer that exports counters to OpenTelemetry using observable instruments.
///
/// This observer registers counters with OpenTelemetry's MeterProvider,
/// using callbacks that read counter values during metric collection.
///
/// # Static Counters
///
/// Counters must be `'static` (typically declared as `static` globals)
/// because OpenTelemetry callbacks need to hold references for the lifetime
/// of the program. `Exact` can be constructed in a `static` directly; a
/// `Scalable` needs a `LazyLock` because its constructor computes its decay
/// parameters:
///
/// ```rust,ignore
/// use std::sync::LazyLock;
/// use stocastico::counters::scalable::Scalable;
///
/// static REQUESTS: LazyLock<Scalable> =
///     LazyLock::new(|| Scalable::new(0.01).with_name("requests_total"));
/// ```
pub struct OtelObserver {
    meter: Meter,
    description_prefix: Option<String>,
}

impl OtelObserver {
    /// Creates a new OpenTelemetry observer with the given meter name.
    ///
    /// The meter name is typically the application or library name.
    /// It will be used to create a meter from the global MeterProvider.
    pub fn new(meter_name: &'static str) -> Self {
        Self {
            meter: global::meter(meter_name),
            description_prefix: None,
        }
    }

    /// Creates an observer with a specific meter instance.
    ///
    /// Use this when you need more control over the meter configuration,
    /// or when you want to use a meter from a specific MeterProvider.
    pub fn with_meter(meter: Meter) -> Self {
        Self {
            meter,
            description_prefix: None,
        }
    }

    /// Sets a description prefix for all registered metrics.
    ///
    /// The prefix will be prepended to each metric's description.
    pub fn with_description_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.description_prefix = Some(prefix.into());
        self
    }

    /// Builds the description string for a metric.
    fn build_description(&self, name: &str) -> String {
        match &self.description_prefix {
            Some(prefix) => format!("{}: {}", prefix, name),
            None => format!("{} metric", name),
        }
    }

    /// Registers all counters with OpenTelemetry.
    ///
    /// Each counter becomes a `u64` `ObservableCounter` whose callback reads
    /// the current value (exact count or projection) at collection time.
    /// Labels attached via [`Labeled`](crate::adapters::Labeled) are
    /// exported as attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if any counter has an empty name; OpenTelemetry
    /// instruments require one.
    pub fn register(&self, counters: &[&'static (dyn Observable + Send + Sync)]) -> Result<()> {
        for &counter in counters {
            self.register_one(counter)?;
        }
        Ok(())
    }

    /// Registers a single counter as an observable instrument.
    fn register_one(&self, counter: &'static (dyn Observable + Send + Sync)) -> Result<()> {
        let name = counter.name();
        if name.is_empty() {
            return Err(OtelError::MetricError("counter must have a name".into()).into());
        }

        let description = self.build_description(name);

        let _ = self
            .meter
            .u64_observable_counter(name)
            .with_description(description)
            .with_callback(move |observer| {
                let attributes = labels_to_attributes(counter.labels());
                observer.observe(counter.value().as_u64(), &attributes);
            })
            .build();

        Ok(())
    }
}

/// Converts counter labels to OpenTelemetry [`KeyValue`] attributes.
fn labels_to_attributes(labels: &[(String, String)]) -> Vec<KeyValue> {
    labels
        .iter()
        .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
        .collect()
}
