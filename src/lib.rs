//! # Stocastico - Scalable Probabilistic Statistics Counters
//!
//! A Rust library providing thread-safe counters for very hot increment
//! paths. Its flagship type is a **probabilistic counter** that trades a
//! small, configurable amount of statistical accuracy for write contention
//! that vanishes as the count grows, following the scheme of Dice, Lev and
//! Moir's *Scalable Statistics Counters* (SPAA '13).
//!
//! ## The Problem
//!
//! In multi-threaded applications, a naive approach to counting uses a
//! single atomic variable shared across all threads. While this is correct,
//! it creates a severe performance bottleneck: every increment causes
//! **cache line bouncing** between CPU cores, as each core must acquire
//! exclusive access to the cache line containing the counter.
//!
//! This contention grows worse with more threads and higher update
//! frequencies, turning what should be a simple operation into a major
//! scalability bottleneck.
//!
//! ## The Solution: Probabilistic Updates
//!
//! Sharding the counter across cache lines is the usual answer; this
//! library takes the other one. A single shared word holds an *acceptance
//! threshold*. Each increment brings its own uniform random `u32` draw and
//! only touches the shared word when the draw wins against the threshold;
//! each accepted update decays the threshold by a constant factor. Reading
//! inverts the decay to recover an estimate of the true count.
//!
//! ### Design Principles
//!
//! 1. **One word, rarely written**: after `n` increments only about
//!    `a * ln(1 + n/a)` of them have ever written to memory. Under heavy
//!    load nearly every `inc` is a single atomic load followed by a branch.
//!
//! 2. **Caller-supplied randomness**: the counter performs no random number
//!    generation. You hand each `inc` a uniform `u32`; your generator, your
//!    cost model. The statistical quality of the projection is exactly the
//!    quality of that stream.
//!
//! 3. **Tunable accuracy**: construction takes `rstdv`, the target ratio of
//!    the projection's standard deviation to the true count. `rstdv = 0.01`
//!    means ~1% noise and `a = 5000`, so the first few thousand increments
//!    are still counted near-exactly.
//!
//! 4. **Lock-free**: the only synchronization is a compare-and-swap retry
//!    loop on the threshold word. Some thread's update always commits, so
//!    the system makes progress no matter how many threads pile on.
//!
//! ## Available Counter Types
//!
//! | Type | Description | Use Case |
//! |------|-------------|----------|
//! | [`Scalable`](counters::scalable::Scalable) | Probabilistic counter, bounded relative error | Request totals, telemetry on hot paths |
//! | [`Exact`](counters::exact::Exact) | Single atomic word, exact | Low-contention counts, baselines |
//!
//! ## Quick Start
//!
//! ```rust
//! use stocastico::counters::scalable::Scalable;
//!
//! // 1% relative standard deviation.
//! let counter = Scalable::new(0.01);
//!
//! // Increment with a caller-owned random stream (xorshift here).
//! let mut r: u32 = 0x2545_F491;
//! for _ in 0..4000 {
//!     r ^= r << 6;
//!     r ^= r >> 21;
//!     r ^= r << 7;
//!     counter.inc(r);
//! }
//!
//! // Read the projected total.
//! let v = counter.value();
//! assert!(v > 3600 && v < 4400);
//! ```
//!
//! ## Thread Safety
//!
//! Both counter types are `Send + Sync` and can be shared across threads
//! via `Arc` (or `static` for [`Exact`](counters::exact::Exact)).
//! [`value`](counters::scalable::Scalable::value) is a single atomic load
//! and may be called concurrently with any number of in-flight increments;
//! it never observes a torn word.
//!
//! ## Choosing a Counter
//!
//! Use [`Scalable`](counters::scalable::Scalable) when:
//! - Many threads increment the same counter at high frequency
//! - A bounded relative error (you pick the bound) is acceptable
//! - You can supply a uniform random `u32` per increment
//!
//! Use [`Exact`](counters::exact::Exact) when update rates are modest, or
//! when the number must be exact. An exact count that is rarely written is
//! cheaper than any probabilistic machinery.
//!
//! ## Observers
//!
//! The library provides optional observer modules for exporting counter
//! values in various formats. Each observer is gated behind a feature flag:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print counters as ASCII tables |
//! | `json` | [`observers::json`] | Serialize counters to JSON |
//! | `prometheus` | [`observers::prometheus`] | Export in Prometheus exposition format |
//! | `opentelemetry` | [`observers::opentelemetry`] | Export via OpenTelemetry instruments |
//! | `serde` | [`snapshot`] | Serializable point-in-time snapshots |
//! | `full` | All observers | Enables all observer modules |
//!
//! Rendered output keeps the exact/estimate distinction: estimates print
//! with a `~` prefix in tables and carry an `"estimate": true` field in
//! JSON.
//!
//! ### Example: Table Output
//!
//! ```toml
//! [dependencies]
//! stocastico = { version = "0.3", features = ["table"] }
//! ```
//!
//! ```rust,ignore
//! use stocastico::counters::scalable::Scalable;
//! use stocastico::counters::Observable;
//! use stocastico::observers::table::TableObserver;
//!
//! let requests = Scalable::new(0.01).with_name("http_requests");
//!
//! let counters: Vec<&dyn Observable> = vec![&requests];
//! println!("{}", TableObserver::new().render(counters.into_iter()));
//! ```
//!
//! ### Example: Prometheus Output
//!
//! ```toml
//! [dependencies]
//! stocastico = { version = "0.3", features = ["prometheus"] }
//! ```
//!
//! ```rust,ignore
//! use stocastico::observers::prometheus::PrometheusObserver;
//!
//! let output = PrometheusObserver::new()
//!     .with_namespace("myapp")
//!     .with_const_label("instance", "server-1")
//!     .render(counters.into_iter())?;
//! ```

pub mod adapters;
pub mod counters;
pub mod observers;

#[cfg(feature = "serde")]
pub mod snapshot;
