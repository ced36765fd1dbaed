//! Observer implementations for collecting and exporting counter metrics.
//!
//! This module provides various ways to observe and export counter values:
//!
//! - [`table`] - Pretty-print counters as tables using the `tabled` crate
//! - [`json`] - Serialize counters to JSON format
//! - [`prometheus`] - Export counters in Prometheus exposition format
//! - [`opentelemetry`] - Export counters via OpenTelemetry
//!
//! Observers work on [`Observable`](crate::counters::Observable) trait
//! objects, so exact and probabilistic counters mix freely in one
//! collection; the estimate/exact distinction survives into the rendered
//! output where the format can carry it.
//!
//! # Unified Error Handling
//!
//! All observers use a unified [`ObserverError`] type, allowing you to
//! switch between observers without changing error handling code.
//!
//! # Feature Flags
//!
//! Each observer is gated behind a feature flag to minimize dependencies:
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module
//! - `prometheus` - Enables the [`prometheus`] module
//! - `opentelemetry` - Enables the [`opentelemetry`] module
//! - `full` - Enables all observer modules
//!
//! # Example
//!
//! ```rust,ignore
//! use stocastico::counters::Observable;
//! use stocastico::counters::exact::Exact;
//! use stocastico::observers::{Result, ObserverError};
//!
//! static HITS: Exact = Exact::new().with_name("hits");
//! static MISSES: Exact = Exact::new().with_name("misses");
//!
//! fn export_metrics() -> Result<()> {
//!     let counters: &[&'static dyn Observable] = &[&HITS, &MISSES];
//!
//!     #[cfg(feature = "prometheus")]
//!     {
//!         use stocastico::observers::prometheus::PrometheusObserver;
//!         let observer = PrometheusObserver::new();
//!         let output = observer.render(counters.iter().copied())?;
//!         println!("{}", output);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod error;

pub use error::{ObserverError, Result};

#[cfg(feature = "prometheus")]
pub use error::PrometheusError;

#[cfg(feature = "opentelemetry")]
pub use error::OtelError;

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "prometheus")]
pub mod prometheus;

#[cfg(feature = "opentelemetry")]
pub mod opentelemetry;
