//! # Benchmark
//! src/bench/mod.rs
//!
//! Herramienta de carga: repite un `Probe` desde varios threads y resume
//! latencias y throughput.
//!
//! - `probe`: trait `Probe` y el probe HTTP
//! - `kv`: probe sobre un store en memoria
//! - `runner`: reparto del trabajo y medición

pub mod kv;
pub mod probe;
pub mod runner;

pub use kv::{KvProbe, KvStore};
pub use probe::{HttpProbe, Probe};
pub use runner::Benchmarker;

use crate::error::ConfigError;
use crate::stats::LatencySummary;
use std::fmt;
use std::time::Duration;

/// Parámetros de una corrida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub requests: usize,
    pub concurrency: usize,
    /// Probes previos que no se miden
    pub warmup: usize,
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests == 0 {
            return Err(ConfigError::Zero { field: "requests" });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Zero { field: "concurrency" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub total_requests: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_time: Duration,
    pub latency: LatencySummary,
    /// 0 si la corrida no tomó tiempo medible
    pub requests_per_second: f64,
}

impl BenchmarkResult {
    /// Porcentaje de probes exitosos (0-100)
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total_requests as f64 * 100.0
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Total requests:   {}", self.total_requests)?;
        writeln!(f, "Successful:       {}", self.successful)?;
        writeln!(f, "Failed:           {}", self.failed)?;
        writeln!(f, "Total time:       {:?}", self.total_time)?;
        writeln!(f, "Average latency:  {:?}", self.latency.mean)?;
        writeln!(f, "Min latency:      {:?}", self.latency.min)?;
        writeln!(f, "Max latency:      {:?}", self.latency.max)?;
        writeln!(f, "Requests/sec:     {:.2}", self.requests_per_second)?;
        writeln!(f, "Success rate:     {:.2}%", self.success_rate())?;
        writeln!(f)?;
        writeln!(f, "Latency percentiles:")?;
        writeln!(f, "  50%: {:?}", self.latency.p50)?;
        writeln!(f, "  90%: {:?}", self.latency.p90)?;
        writeln!(f, "  95%: {:?}", self.latency.p95)?;
        write!(f, "  99%: {:?}", self.latency.p99)
    }
}
