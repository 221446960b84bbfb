//! Step observers: injectable per-tick instrumentation.

use parking_lot::Mutex;
use std::time::Duration;
use swarm_core::{Faction, FactionCounts};
use tracing::debug;

/// What a single tick produced
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    pub tick: u64,
    pub duration: Duration,
    pub counts: FactionCounts,
}

pub trait StepObserver: Send + Sync {
    fn on_step(&self, report: &StepReport);
}

/// Logs every step at debug level
#[derive(Debug, Default)]
pub struct TracingObserver;

impl StepObserver for TracingObserver {
    fn on_step(&self, report: &StepReport) {
        debug!(
            tick = report.tick,
            duration_us = report.duration.as_micros() as u64,
            player_cells = report.counts.get(Faction::Player),
            empty_cells = report.counts.get(Faction::Empty),
            "Step complete"
        );
    }
}

/// Histogram of step durations in fixed-width buckets. The last bucket
/// collects everything past the range.
#[derive(Debug)]
pub struct TimingObserver {
    bucket_width: Duration,
    state: Mutex<TimingSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimingSnapshot {
    pub buckets: Vec<u64>,
    pub samples: u64,
    pub total: Duration,
    pub max: Duration,
}

impl TimingSnapshot {
    pub fn mean(&self) -> Duration {
        if self.samples == 0 {
            Duration::ZERO
        } else {
            let nanos = self.total.as_nanos() / self.samples as u128;
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }
}

impl TimingObserver {
    pub fn new(bucket_width: Duration, bucket_count: usize) -> Self {
        Self {
            bucket_width: bucket_width.max(Duration::from_nanos(1)),
            state: Mutex::new(TimingSnapshot {
                buckets: vec![0; bucket_count.max(1)],
                samples: 0,
                total: Duration::ZERO,
                max: Duration::ZERO,
            }),
        }
    }

    pub fn bucket_width(&self) -> Duration {
        self.bucket_width
    }

    pub fn snapshot(&self) -> TimingSnapshot {
        self.state.lock().clone()
    }

    fn bucket_for(&self, duration: Duration, bucket_count: usize) -> usize {
        let index = (duration.as_nanos() / self.bucket_width.as_nanos()) as usize;
        index.min(bucket_count - 1)
    }
}

impl Default for TimingObserver {
    fn default() -> Self {
        Self::new(Duration::from_millis(1), 50)
    }
}

impl StepObserver for TimingObserver {
    fn on_step(&self, report: &StepReport) {
        let mut state = self.state.lock();
        let bucket = self.bucket_for(report.duration, state.buckets.len());
        state.buckets[bucket] += 1;
        state.samples += 1;
        state.total += report.duration;
        state.max = state.max.max(report.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tick: u64, millis: u64) -> StepReport {
        StepReport {
            tick,
            duration: Duration::from_millis(millis),
            counts: FactionCounts::default(),
        }
    }

    #[test]
    fn test_timing_buckets() {
        let observer = TimingObserver::new(Duration::from_millis(2), 4);
        observer.on_step(&report(0, 1));
        observer.on_step(&report(1, 3));
        observer.on_step(&report(2, 3));
        observer.on_step(&report(3, 100));

        let snapshot = observer.snapshot();
        assert_eq!(snapshot.buckets, vec![1, 2, 0, 1]);
        assert_eq!(snapshot.samples, 4);
        assert_eq!(snapshot.max, Duration::from_millis(100));
        assert_eq!(snapshot.total, Duration::from_millis(107));
    }

    #[test]
    fn test_mean() {
        let observer = TimingObserver::default();
        assert_eq!(observer.snapshot().mean(), Duration::ZERO);
        observer.on_step(&report(0, 2));
        observer.on_step(&report(1, 4));
        assert_eq!(observer.snapshot().mean(), Duration::from_millis(3));
    }

    #[test]
    fn test_mean_with_huge_sample_count() {
        let snapshot = TimingSnapshot {
            buckets: vec![0],
            samples: 1 << 32,
            total: Duration::from_nanos(3 << 32),
            max: Duration::from_nanos(3),
        };
        assert_eq!(snapshot.mean(), Duration::from_nanos(3));
    }

    #[test]
    fn test_tracing_observer_does_not_panic() {
        TracingObserver.on_step(&report(5, 1));
    }
}
