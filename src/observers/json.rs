//! JSON observer for serializing counters.
//!
//! This module provides [`JsonObserver`], which serializes a collection of
//! [`Observable`] counters to JSON using the snapshot types from
//! [`snapshot`](crate::snapshot). Estimated values are marked with an
//! `"estimate": true` field so consumers can tell projections from exact
//! counts.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! stocastico = { version = "0.3", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use stocastico::counters::exact::Exact;
//! use stocastico::counters::Observable;
//! use stocastico::observers::json::JsonObserver;
//!
//! let requests = Exact::new().with_name("http_requests");
//! requests.add(1000);
//!
//! let counters: Vec<&dyn Observable> = vec![&requests];
//!
//! let observer = JsonObserver::new();
//! let json = observer.to_json(counters.into_iter()).unwrap();
//!
//! println!("{}", json);
//! // [{"name":"http_requests","value":1000,"estimate":false}]
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::counters::Observable;
use crate::snapshot::MetricsSnapshot;

use super::Result;

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap counters in a MetricsSnapshot object.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes counters to JSON format.
///
/// # Examples
///
/// ```rust,ignore
/// use stocastico::observers::json::JsonObserver;
///
/// let json = JsonObserver::new()
///     .pretty(true)
///     .include_timestamp(true)
///     .to_json(counters.into_iter())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings
    /// (compact output, no timestamp, bare array).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables the timestamp field.
    ///
    /// Including a timestamp implies wrapping in a snapshot object.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Wraps the counter array in a `MetricsSnapshot` object instead of
    /// emitting a bare array.
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Serializes the counters to a JSON string.
    pub fn to_json<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<String> {
        let mut snapshot = MetricsSnapshot::collect(counters);
        if self.config.include_timestamp {
            snapshot.timestamp_ms = Some(now_ms());
        }
        self.serialize(snapshot)
    }

    /// Serializes the counters to a JSON string, resetting each counter
    /// after reading it.
    pub fn to_json_and_reset<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<String> {
        let mut snapshot = MetricsSnapshot::collect_and_reset(counters);
        if self.config.include_timestamp {
            snapshot.timestamp_ms = Some(now_ms());
        }
        self.serialize(snapshot)
    }

    fn serialize(&self, snapshot: MetricsSnapshot) -> Result<String> {
        let wrap = self.config.wrap_in_snapshot || self.config.include_timestamp;
        let json = match (wrap, self.config.pretty) {
            (true, true) => serde_json::to_string_pretty(&snapshot)?,
            (true, false) => serde_json::to_string(&snapshot)?,
            (false, true) => serde_json::to_string_pretty(&snapshot.counters)?,
            (false, false) => serde_json::to_string(&snapshot.counters)?,
        };
        Ok(json)
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::exact::Exact;
    use crate::counters::scalable::Scalable;

    #[test]
    fn test_to_json_bare_array() {
        let counter = Exact::new().with_name("requests");
        counter.add(100);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();

        assert_eq!(
            json,
            r#"[{"name":"requests","value":100,"estimate":false}]"#
        );
    }

    #[test]
    fn test_to_json_marks_estimates() {
        let counter = Scalable::new(0.01).with_name("requests");
        for _ in 0..10 {
            counter.inc(0);
        }

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();

        assert!(json.contains(r#""estimate":true"#));
        assert!(json.contains(r#""value":10"#));
    }

    #[test]
    fn test_to_json_pretty() {
        let counter = Exact::new().with_name("x");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .pretty(true)
            .to_json(counters.into_iter())
            .unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_wrapped() {
        let counter = Exact::new().with_name("x");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .to_json(counters.into_iter())
            .unwrap();
        assert!(json.contains(r#""counters""#));
    }

    #[test]
    fn test_to_json_with_timestamp() {
        let counter = Exact::new().with_name("x");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .include_timestamp(true)
            .to_json(counters.into_iter())
            .unwrap();
        assert!(json.contains(r#""timestamp_ms""#));
    }

    #[test]
    fn test_to_json_and_reset() {
        let counter = Exact::new().with_name("requests");
        counter.add(42);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .to_json_and_reset(counters.into_iter())
            .unwrap();

        assert!(json.contains(r#""value":42"#));
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_to_json_empty() {
        let counters: Vec<&dyn Observable> = vec![];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_round_trip() {
        use crate::snapshot::CounterSnapshot;

        let counter = Scalable::new(0.01).with_name("rt");
        counter.inc(0);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();

        let parsed: Vec<CounterSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "rt");
        assert!(parsed[0].estimate);
    }
}
