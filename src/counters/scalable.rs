//! Scalable probabilistic counter with a single atomically-updated word.
//!
//! This module provides [`Scalable`], a counter designed for very hot
//! increment paths. Instead of sharding the count across cache lines, it
//! keeps one shared word and updates it with a geometrically-decaying
//! probability, trading a bounded relative error in the reported count for
//! write contention that vanishes as the count grows.
//!
//! The scheme follows Dice, Lev and Moir, *Scalable Statistics Counters*
//! (SPAA '13).

use crossbeam_utils::CachePadded;
use std::fmt::Debug;

use crate::counters::threshold::ThresholdCell;
use crate::counters::{CounterError, CounterValue, Observable};

/// The acceptance threshold is scaled against the full `u32` range.
const MAX_DRAW: f64 = u32::MAX as f64;

/// A probabilistic counter whose increments touch shared memory with a
/// geometrically-decaying probability.
///
/// `Scalable` holds a single acceptance threshold in `(0, 2^32 - 1]`. Every
/// call to [`inc`](Scalable::inc) carries a caller-supplied uniform random
/// `u32` draw; the call mutates shared state only when the draw does not
/// exceed the threshold, and each accepted increment decays the threshold by
/// the constant factor `a / (a + 1)` where `a = 1 / (2 * rstdv^2)`. Reading
/// inverts the decay: [`value`](Scalable::value) reports
/// `(1/pr - 1) * a` for the current acceptance probability `pr`, an
/// estimator of the true number of `inc` calls whose relative standard
/// deviation is approximately the `rstdv` supplied at construction.
///
/// # Accuracy / contention trade-off
///
/// | `rstdv` | `a` | behaviour |
/// |---------|-----|-----------|
/// | 0.001 | 500000 | near-exact, contention relief kicks in late |
/// | 0.01  | 5000   | 1% noise, the usual telemetry choice |
/// | 0.1   | 50     | 10% noise, shared word almost never touched |
///
/// The first ~`a` increments are accepted almost every time, so small counts
/// stay near-exact; once the count is large, only a vanishing fraction of
/// calls win the draw and everyone else returns after one atomic load.
///
/// # Randomness contract
///
/// The counter performs no randomness generation. Each call to `inc` must be
/// given a fresh draw, uniform over the full `u32` range and independent
/// across calls; the quality of that stream directly determines the
/// statistical quality of the projection. Any decent generator works (the
/// tests use the xorshift step from the paper).
///
/// # Examples
///
/// Basic usage:
///
/// ```rust
/// use stocastico::counters::scalable::Scalable;
///
/// let counter = Scalable::new(0.01);
///
/// // Drive it with a caller-owned random stream.
/// let mut r: u32 = 0x2545_F491;
/// for _ in 0..4000 {
///     r ^= r << 6;
///     r ^= r >> 21;
///     r ^= r << 7;
///     counter.inc(r);
/// }
///
/// let v = counter.value();
/// assert!(v > 3600 && v < 4400);
/// ```
///
/// Multi-threaded usage:
///
/// ```rust
/// use stocastico::counters::scalable::Scalable;
/// use std::sync::Arc;
/// use std::thread;
///
/// let counter = Arc::new(Scalable::new(0.01));
/// let mut handles = vec![];
///
/// for t in 0..4u32 {
///     let c = Arc::clone(&counter);
///     handles.push(thread::spawn(move || {
///         let mut r: u32 = 0x9E37_79B9 ^ (t + 1);
///         for _ in 0..1000 {
///             r ^= r << 6;
///             r ^= r >> 21;
///             r ^= r << 7;
///             c.inc(r);
///         }
///     }));
/// }
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// let v = counter.value();
/// assert!(v > 3600 && v < 4400);
/// ```
pub struct Scalable {
    name: &'static str,
    /// Acceptance threshold, padded so a counter embedded next to other hot
    /// data does not false-share its cache line.
    threshold: CachePadded<ThresholdCell>,
    /// Shape parameter `1 / (2 * rstdv^2)`. Read-only after construction.
    a: f64,
    /// Per-accept decay factor `a / (a + 1)`. Read-only after construction.
    prob_factor: f64,
}

impl Scalable {
    /// Creates a counter with the given relative standard deviation.
    ///
    /// `rstdv` is the ratio of the standard deviation of the projected
    /// value to the true count: smaller values mean higher accuracy and
    /// less contention relief, and vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidRstdv`] unless `rstdv` is finite and
    /// strictly positive; zero or negative values would degenerate the
    /// decay parameters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stocastico::counters::scalable::Scalable;
    ///
    /// let counter = Scalable::try_new(0.01).unwrap();
    /// assert_eq!(counter.value(), 0);
    ///
    /// assert!(Scalable::try_new(0.0).is_err());
    /// assert!(Scalable::try_new(-1.0).is_err());
    /// ```
    pub fn try_new(rstdv: f64) -> Result<Self, CounterError> {
        if !rstdv.is_finite() || rstdv <= 0.0 {
            return Err(CounterError::InvalidRstdv(rstdv));
        }

        let a = 1.0 / (2.0 * rstdv * rstdv);

        Ok(Scalable {
            name: "",
            threshold: CachePadded::new(ThresholdCell::new(MAX_DRAW)),
            a,
            prob_factor: a / (a + 1.0),
        })
    }

    /// Creates a counter with the given relative standard deviation.
    ///
    /// # Panics
    ///
    /// Panics if `rstdv` is not finite and strictly positive. Use
    /// [`try_new`](Scalable::try_new) to handle the error instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stocastico::counters::scalable::Scalable;
    ///
    /// let counter = Scalable::new(0.01);
    /// assert_eq!(counter.value(), 0);
    /// ```
    pub fn new(rstdv: f64) -> Self {
        match Self::try_new(rstdv) {
            Ok(counter) => counter,
            Err(err) => panic!("{}", err),
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    ///
    /// The name is used when formatting the counter for display and by the
    /// observers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stocastico::counters::scalable::Scalable;
    /// use stocastico::counters::Observable;
    ///
    /// let counter = Scalable::new(0.01).with_name("http_requests");
    /// assert_eq!(counter.name(), "http_requests");
    /// ```
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Increments the counter by one logical unit.
    ///
    /// `r` must be drawn uniformly at random from the full `u32` range,
    /// independently for every call. With probability `threshold / 2^32-1`
    /// the shared word is decayed via compare-and-swap; otherwise the call
    /// returns after a single atomic load.
    ///
    /// The retry loop is lock-free: a failed compare-and-swap means some
    /// other increment committed, so system-wide progress is guaranteed
    /// even though an individual call's retry count is unbounded.
    #[inline]
    pub fn inc(&self, r: u32) {
        let mut seen = self.threshold.load();
        loop {
            if r > seen as u32 {
                // Lost the draw: this increment leaves no trace, the
                // projection accounts for it in expectation.
                return;
            }
            let new = if seen < self.a + 1.0 {
                // Decay has exhausted the word's resolution; restart it at
                // the top. The projection keeps growing smoothly across the
                // rollover.
                MAX_DRAW
            } else {
                seen * self.prob_factor
            };
            match self.threshold.compare_exchange(seen, new) {
                Ok(_) => return,
                Err(actual) => seen = actual,
            }
        }
    }

    /// Returns the current projected count.
    ///
    /// A single atomic load; safe to call at any time, including
    /// concurrently with increments. The snapshot is consistent (never
    /// torn) but may trail in-flight increments. Returns 0 before any
    /// accepted increment.
    #[inline]
    pub fn value(&self) -> u64 {
        Self::project(self.a, self.threshold.load())
    }

    /// Returns the current probability that an `inc` call mutates shared
    /// state. Starts at 1.0 and decays toward 0 as the count grows.
    #[inline]
    pub fn acceptance_probability(&self) -> f64 {
        self.threshold.load() / MAX_DRAW
    }

    /// Returns the relative standard deviation this counter was built with,
    /// recovered from the shape parameter.
    #[inline]
    pub fn rstdv(&self) -> f64 {
        (1.0 / (2.0 * self.a)).sqrt()
    }

    /// Inverts the geometric decay: maps a threshold back to the count it
    /// encodes, truncated toward zero.
    #[inline]
    fn project(a: f64, threshold: f64) -> u64 {
        let pr = threshold / MAX_DRAW;
        ((1.0 / pr - 1.0) * a) as u64
    }
}

impl Observable for Scalable {
    /// Returns the projected count as an estimate.
    #[inline]
    fn value(&self) -> CounterValue {
        CounterValue::Estimate(self.value())
    }

    /// Returns the name of this counter.
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    /// Projects the current word and atomically restores the threshold to
    /// its maximum, so the counter behaves as newly constructed.
    #[inline]
    fn value_and_reset(&self) -> CounterValue {
        let old = self.threshold.swap(MAX_DRAW);
        CounterValue::Estimate(Self::project(self.a, old))
    }
}

impl Debug for Scalable {
    /// Formats the counter as `name{ pr:... value:~... }`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{{ pr:{:.6} value:~{} }}",
            self.name,
            self.acceptance_probability(),
            self.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::Observable;

    const ERR: f64 = 0.01;
    const ITERS: u64 = 10_000_000;

    /// Drives `n` increments from the xorshift step used in the paper's
    /// experiments (shift constants 6, 21, 7). Seeds must be non-zero.
    fn drive(counter: &Scalable, mut r: u32, n: u64) {
        debug_assert!(r != 0);
        for _ in 0..n {
            r ^= r << 6;
            r ^= r >> 21;
            r ^= r << 7;
            counter.inc(r);
        }
    }

    const SEEDS: [u32; 10] = [
        0x9E37_79B9,
        0x243F_6A88,
        0xB749_9CA7,
        0x85EB_CA6B,
        0xC2B2_AE35,
        0x27D4_EB2F,
        0x1656_67B1,
        0xD3A2_646C,
        0xFD70_46C5,
        0xB55A_4F09,
    ];

    #[test]
    fn test_projection_within_error_bounds() {
        let n = ITERS as f64;
        let mut sum = 0.0;

        for &seed in &SEEDS {
            let counter = Scalable::new(ERR);
            drive(&counter, seed, ITERS);
            let v = counter.value() as f64;

            // Any single run sits inside a wide sanity band.
            assert!(
                v > n * (1.0 - 6.0 * ERR) && v < n * (1.0 + 6.0 * ERR),
                "projection {} outside sanity band for seed {:#x}",
                v,
                seed
            );
            sum += v;
        }

        // The mean over independent runs must meet the configured bound.
        let mean = sum / SEEDS.len() as f64;
        assert!(
            mean > n * (1.0 - ERR) && mean < n * (1.0 + ERR),
            "mean projection {} outside error bounds [{}, {}]",
            mean,
            n * (1.0 - ERR),
            n * (1.0 + ERR)
        );
    }

    #[test]
    fn test_projection_within_error_bounds_concurrent() {
        use std::sync::Arc;
        use std::thread;

        const THREADS: u32 = 4;
        let n = ITERS as f64;
        let mut sum = 0.0;

        for &seed in &SEEDS {
            let counter = Arc::new(Scalable::new(ERR));
            let mut handles = vec![];

            for t in 0..THREADS {
                let counter = Arc::clone(&counter);
                handles.push(thread::spawn(move || {
                    drive(&counter, seed ^ (t + 1), ITERS / THREADS as u64);
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }

            let v = counter.value() as f64;
            assert!(
                v > n * (1.0 - 6.0 * ERR) && v < n * (1.0 + 6.0 * ERR),
                "projection {} outside sanity band for seed {:#x}",
                v,
                seed
            );
            sum += v;
        }

        let mean = sum / SEEDS.len() as f64;
        assert!(
            mean > n * (1.0 - ERR) && mean < n * (1.0 + ERR),
            "mean projection {} outside error bounds",
            mean
        );
    }

    #[test]
    fn test_fresh_counter_reads_zero() {
        for rstdv in [0.001, 0.01, 0.1, 1.0] {
            let counter = Scalable::new(rstdv);
            assert_eq!(counter.value(), 0);
        }
    }

    #[test]
    fn test_value_is_idempotent() {
        let counter = Scalable::new(0.01);
        drive(&counter, 0x243F_6A88, 10_000);
        let first = counter.value();
        assert_eq!(counter.value(), first);
        assert_eq!(counter.value(), first);
    }

    #[test]
    fn test_small_counts_near_exact() {
        // r = 0 always wins the draw, so the trajectory is deterministic:
        // after k accepted increments the projection is a*((1+1/a)^k - 1),
        // within k*k/(2a) of k.
        let counter = Scalable::new(0.01);
        for _ in 0..10 {
            counter.inc(0);
        }
        assert_eq!(counter.value(), 10);
    }

    #[test]
    fn test_rejected_increment_is_a_noop() {
        let counter = Scalable::new(0.01);
        for _ in 0..5 {
            counter.inc(0);
        }
        let before = counter.value();

        // Once the threshold has decayed below u32::MAX, the maximal draw
        // always loses and must leave the word untouched.
        for _ in 0..1000 {
            counter.inc(u32::MAX);
        }
        assert_eq!(counter.value(), before);
    }

    #[test]
    fn test_projection_is_monotone() {
        let counter = Scalable::new(0.05);
        let mut r: u32 = 0x85EB_CA6B;
        let mut last = 0u64;
        for _ in 0..100_000 {
            r ^= r << 6;
            r ^= r >> 21;
            r ^= r << 7;
            counter.inc(r);
            let v = counter.value();
            assert!(v >= last, "projection decreased from {} to {}", last, v);
            last = v;
        }
    }

    #[test]
    fn test_threshold_stays_in_range_under_contention() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(Scalable::new(0.01));
        let mut handles = vec![];

        for t in 0..8u32 {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                let mut r: u32 = 0xD3A2_646C ^ (t + 1);
                for _ in 0..200_000 {
                    r ^= r << 6;
                    r ^= r >> 21;
                    r ^= r << 7;
                    counter.inc(r);
                    let pr = counter.acceptance_probability();
                    assert!(pr > 0.0 && pr <= 1.0, "threshold out of range: {}", pr);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let t = counter.threshold.load();
        assert!(t.is_finite());
        assert!(t > 0.0 && t <= u32::MAX as f64);
    }

    #[test]
    fn test_overflow_resets_threshold_to_max() {
        // rstdv = 10 gives a = 0.005, so five accepted increments push the
        // threshold below a + 1 and the sixth must reset it to the top.
        let counter = Scalable::new(10.0);
        for _ in 0..6 {
            counter.inc(0);
            let pr = counter.acceptance_probability();
            assert!(pr > 0.0 && pr <= 1.0);
        }
        assert_eq!(counter.acceptance_probability(), 1.0);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_try_new_rejects_degenerate_rstdv() {
        match Scalable::try_new(0.0) {
            Err(CounterError::InvalidRstdv(v)) => assert_eq!(v, 0.0),
            Ok(_) => panic!("rstdv = 0 must be rejected"),
        }
        assert!(Scalable::try_new(-0.01).is_err());
        assert!(Scalable::try_new(f64::NAN).is_err());
        assert!(Scalable::try_new(f64::INFINITY).is_err());
    }

    #[test]
    #[should_panic(expected = "relative standard deviation")]
    fn test_new_panics_on_zero_rstdv() {
        let _ = Scalable::new(0.0);
    }

    #[test]
    fn test_rstdv_round_trips() {
        for rstdv in [0.001, 0.01, 0.5] {
            let counter = Scalable::new(rstdv);
            assert!((counter.rstdv() - rstdv).abs() < 1e-12);
        }
    }

    #[test]
    fn test_shape_parameters() {
        let counter = Scalable::new(0.01);
        assert!((counter.a - 5000.0).abs() < 1e-6);
        assert!((counter.prob_factor - 5000.0 / 5001.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_and_reset() {
        let counter = Scalable::new(0.01);
        for _ in 0..10 {
            counter.inc(0);
        }
        assert_eq!(counter.value_and_reset(), CounterValue::Estimate(10));
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.acceptance_probability(), 1.0);
    }

    #[test]
    fn test_observable_value_is_estimate() {
        let counter = Scalable::new(0.01);
        counter.inc(0);
        assert!(Observable::value(&counter).is_estimate());
    }

    #[test]
    fn test_dyn_format() {
        let counter = Scalable::new(0.01).with_name("test_counter");
        for _ in 0..3 {
            counter.inc(0);
        }
        let formatted = format!("{}", &counter as &dyn Observable);
        assert_eq!(formatted, "test_counter:~3");
    }

    #[test]
    fn test_debug() {
        let counter = Scalable::new(0.01).with_name("dbg");
        let debug_str = format!("{:?}", counter);
        assert!(debug_str.starts_with("dbg{"));
        assert!(debug_str.contains("pr:1.000000"));
        assert!(debug_str.ends_with("}"));
    }

    #[test]
    fn test_name_default() {
        let counter = Scalable::new(0.01);
        assert_eq!(counter.name(), "");
    }

    #[test]
    fn test_with_name() {
        let counter = Scalable::new(0.01).with_name("my_counter");
        assert_eq!(counter.name(), "my_counter");
    }
}
