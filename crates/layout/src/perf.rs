use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Collects timings and counters of breaking runs.
///
/// Without the "profiling" feature the breaker uses [`NoOpProfiler`] and pass
/// timing is compiled out.
pub trait Profiler: Send + Sync + Debug {
    fn record(&self, key: &str, duration: Duration);
    fn count(&self, key: &str, amount: usize);
    fn count_run(&self);
    fn reset(&self);
    fn log_summary(&self, label: &str);
}

/// [`DebugProfiler`] with the "profiling" feature, [`NoOpProfiler`] otherwise.
pub fn default_profiler() -> Arc<dyn Profiler> {
    if cfg!(feature = "profiling") {
        Arc::new(DebugProfiler::new())
    } else {
        Arc::new(NoOpProfiler)
    }
}

#[derive(Debug)]
pub struct NoOpProfiler;

impl Profiler for NoOpProfiler {
    #[inline(always)]
    fn record(&self, _key: &str, _duration: Duration) {}
    #[inline(always)]
    fn count(&self, _key: &str, _amount: usize) {}
    #[inline(always)]
    fn count_run(&self) {}
    #[inline(always)]
    fn reset(&self) {}
    #[inline(always)]
    fn log_summary(&self, _label: &str) {}
}

/// Accumulates per-key durations and counters and logs them on request.
#[derive(Debug)]
pub struct DebugProfiler {
    timings: Mutex<HashMap<String, Duration>>,
    counters: Mutex<HashMap<String, usize>>,
    runs: AtomicUsize,
}

impl DebugProfiler {
    pub fn new() -> Self {
        Self {
            timings: Mutex::new(HashMap::new()),
            counters: Mutex::new(HashMap::new()),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Acquire)
    }

    pub fn counter(&self, key: &str) -> usize {
        self.counters
            .lock()
            .map(|c| c.get(key).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_time(&self, key: &str) -> Option<Duration> {
        self.timings.lock().ok().and_then(|t| t.get(key).copied())
    }
}

impl Default for DebugProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler for DebugProfiler {
    fn record(&self, key: &str, duration: Duration) {
        if let Ok(mut g) = self.timings.lock() {
            *g.entry(key.to_string()).or_default() += duration;
        }
    }

    fn count(&self, key: &str, amount: usize) {
        if let Ok(mut g) = self.counters.lock() {
            *g.entry(key.to_string()).or_default() += amount;
        }
    }

    fn count_run(&self) {
        self.runs.fetch_add(1, Ordering::Release);
    }

    fn reset(&self) {
        if let Ok(mut g) = self.timings.lock() {
            g.clear();
        }
        if let Ok(mut g) = self.counters.lock() {
            g.clear();
        }
        self.runs.store(0, Ordering::Release);
    }

    fn log_summary(&self, label: &str) {
        let runs = self.runs();
        if runs == 0 {
            return;
        }

        log::info!("=== Breaking Profile ({}) ===", label);
        log::info!("Runs: {}", runs);
        if let Ok(counters) = self.counters.lock() {
            let mut keys: Vec<_> = counters.iter().collect();
            keys.sort();
            for (k, v) in keys {
                log::info!("{}: {} ({:.1}/run)", k, v, *v as f64 / runs as f64);
            }
        }
        if let Ok(timings) = self.timings.lock() {
            for (k, v) in timings.iter() {
                log::info!("{}: {:?}", k, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_profiler_accumulates() {
        let profiler = DebugProfiler::new();
        profiler.count_run();
        profiler.count_run();
        profiler.count("nodes", 10);
        profiler.count("nodes", 5);
        profiler.record("pass", Duration::from_millis(2));
        profiler.record("pass", Duration::from_millis(3));

        assert_eq!(profiler.runs(), 2);
        assert_eq!(profiler.counter("nodes"), 15);
        assert_eq!(profiler.total_time("pass"), Some(Duration::from_millis(5)));

        profiler.reset();
        assert_eq!(profiler.runs(), 0);
        assert_eq!(profiler.counter("nodes"), 0);
    }
}
