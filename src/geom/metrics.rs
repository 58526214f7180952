//! Opt-in timing hooks for the measurement engine.
//!
//! Timing is only collected when the `measure_metrics` feature is enabled and
//! the target is not WASM (`std::time::Instant` is unavailable there). When
//! disabled, every call compiles down to invoking the closure.
//!
//! ```ignore
//! use polysurface_engine::geom::{MeasureMetrics, TimingBucket};
//!
//! let mut metrics = MeasureMetrics::default();
//! metrics.begin();
//! let triangles = metrics.time(TimingBucket::Triangulation, || build_ribbons());
//! if let Some(report) = metrics.end() {
//!     println!("triangulation: {} ns", report.triangulation_ns);
//! }
//! ```

/// Phases of a surface measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Resampling contour pairs to a common vertex count.
    Matching,
    /// Building ribbon and fan triangles.
    Triangulation,
    /// Summing calibrated triangle areas.
    Area,
    /// Per-slice contour interpolation for the volume bridge.
    Interpolation,
    /// Mesh assembly and topology diagnostics.
    Mesh,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimingReport {
    pub matching_ns: u64,
    pub triangulation_ns: u64,
    pub area_ns: u64,
    pub interpolation_ns: u64,
    pub mesh_ns: u64,
}

impl TimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.matching_ns
            .saturating_add(self.triangulation_ns)
            .saturating_add(self.area_ns)
            .saturating_add(self.interpolation_ns)
            .saturating_add(self.mesh_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing measurement phases.
///
/// Call [`begin`](Self::begin) to reset, wrap work with [`time`](Self::time),
/// and read the report with [`end`](Self::end). Without the feature,
/// [`end`](Self::end) always returns `None`.
#[derive(Debug, Default)]
pub struct MeasureMetrics {
    #[cfg(all(feature = "measure_metrics", not(target_arch = "wasm32")))]
    report: TimingReport,
}

impl MeasureMetrics {
    pub fn begin(&mut self) {
        #[cfg(all(feature = "measure_metrics", not(target_arch = "wasm32")))]
        {
            self.report = TimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<TimingReport> {
        #[cfg(all(feature = "measure_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "measure_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Run `f`, adding its wall time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "measure_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "measure_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "measure_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Matching => &mut self.report.matching_ns,
            TimingBucket::Triangulation => &mut self.report.triangulation_ns,
            TimingBucket::Area => &mut self.report.area_ns,
            TimingBucket::Interpolation => &mut self.report.interpolation_ns,
            TimingBucket::Mesh => &mut self.report.mesh_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
