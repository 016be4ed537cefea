//! # Runner del benchmark
//! src/bench/runner.rs
//!
//! `concurrency` threads se reparten `requests` probes. Cada probe se
//! cronometra y el resultado se acumula bajo un mutex.

use super::probe::Probe;
use super::{BenchmarkConfig, BenchmarkResult};
use crate::error::ConfigError;
use crate::stats::LatencySummary;
use std::ops::Range;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Default)]
struct Tally {
    successful: usize,
    failed: usize,
    latencies: Vec<Duration>,
}

pub struct Benchmarker;

/// Rango de números de secuencia de cada worker
///
/// El resto se reparte entre los primeros workers, así corren exactamente
/// `requests` probes.
fn partition(requests: usize, workers: usize) -> Vec<Range<usize>> {
    let base = requests / workers;
    let extra = requests % workers;

    let mut start = 0;
    (0..workers)
        .map(|worker| {
            let len = base + usize::from(worker < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

impl Benchmarker {
    /// Ejecuta la corrida completa
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::bench::{BenchmarkConfig, Benchmarker};
    ///
    /// let config = BenchmarkConfig { requests: 10, concurrency: 3, warmup: 0 };
    /// let result = Benchmarker::run(&config, &|seq: usize| seq != 7).unwrap();
    ///
    /// assert_eq!(result.total_requests, 10);
    /// assert_eq!(result.failed, 1);
    /// ```
    pub fn run<P: Probe>(config: &BenchmarkConfig, probe: &P) -> Result<BenchmarkResult, ConfigError> {
        config.validate()?;

        for seq in 0..config.warmup {
            probe.probe(seq);
        }
        if config.warmup > 0 {
            debug!(warmup = config.warmup, "warmup finished");
        }

        let tally = Mutex::new(Tally {
            latencies: Vec::with_capacity(config.requests),
            ..Default::default()
        });

        let start = Instant::now();
        thread::scope(|scope| {
            for (worker, range) in partition(config.requests, config.concurrency).into_iter().enumerate() {
                let tally = &tally;
                scope.spawn(move || {
                    debug!(worker, requests = range.len(), "worker started");
                    for seq in range {
                        let probe_start = Instant::now();
                        let ok = probe.probe(seq);
                        let latency = probe_start.elapsed();

                        let mut tally = tally.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                        if ok {
                            tally.successful += 1;
                        } else {
                            tally.failed += 1;
                        }
                        tally.latencies.push(latency);
                    }
                });
            }
        });
        let total_time = start.elapsed();

        let mut tally = tally.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        let latency = LatencySummary::from_samples(&mut tally.latencies);
        let total_requests = tally.successful + tally.failed;

        let requests_per_second = if total_time.is_zero() {
            0.0
        } else {
            total_requests as f64 / total_time.as_secs_f64()
        };

        info!(total_requests, failed = tally.failed, ?total_time, "benchmark finished");

        Ok(BenchmarkResult {
            total_requests,
            successful: tally.successful,
            failed: tally.failed,
            total_time,
            latency,
            requests_per_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::KvProbe;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_partition_spreads_remainder() {
        let ranges = partition(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);

        let lens: Vec<usize> = partition(2, 4).iter().map(|r| r.len()).collect();
        assert_eq!(lens, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_runs_exactly_requested_probes() {
        let calls = AtomicUsize::new(0);
        let probe = |_seq: usize| {
            calls.fetch_add(1, Ordering::SeqCst);
            true
        };
        let config = BenchmarkConfig {
            requests: 101,
            concurrency: 7,
            warmup: 5,
        };

        let result = Benchmarker::run(&config, &probe).unwrap();

        assert_eq!(result.total_requests, 101);
        assert_eq!(result.successful, 101);
        assert_eq!(result.latency.count, 101);
        // Warmup también llama al probe pero no se mide
        assert_eq!(calls.load(Ordering::SeqCst), 106);
    }

    #[test]
    fn test_every_sequence_number_once() {
        let seen = Mutex::new(Vec::new());
        let probe = |seq: usize| {
            seen.lock().unwrap().push(seq);
            true
        };
        let config = BenchmarkConfig {
            requests: 50,
            concurrency: 4,
            warmup: 0,
        };

        Benchmarker::run(&config, &probe).unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_failures_counted() {
        let probe = |seq: usize| seq % 4 != 0;
        let config = BenchmarkConfig {
            requests: 40,
            concurrency: 5,
            warmup: 0,
        };

        let result = Benchmarker::run(&config, &probe).unwrap();
        assert_eq!(result.failed, 10);
        assert_eq!(result.successful, 30);
        assert!((result.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kv_probe_single_worker_always_succeeds() {
        let probe = KvProbe::new();
        let config = BenchmarkConfig {
            requests: 30,
            concurrency: 1,
            warmup: 0,
        };

        let result = Benchmarker::run(&config, &probe).unwrap();
        assert_eq!(result.successful, 30);
        assert_eq!(probe.store().len(), 10);
    }

    #[test]
    fn test_invalid_config() {
        let probe = |_seq: usize| true;
        let zero = BenchmarkConfig {
            requests: 0,
            concurrency: 1,
            warmup: 0,
        };
        assert_eq!(
            Benchmarker::run(&zero, &probe).unwrap_err(),
            ConfigError::Zero { field: "requests" }
        );

        let no_workers = BenchmarkConfig {
            requests: 1,
            concurrency: 0,
            warmup: 0,
        };
        assert_eq!(
            Benchmarker::run(&no_workers, &probe).unwrap_err(),
            ConfigError::Zero { field: "concurrency" }
        );
    }
}
