//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor de usuarios en tiempo real.

use crate::stats::LatencySummary;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Máximo de latencias a guardar (para calcular percentiles)
pub const LATENCY_WINDOW: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Últimas latencias registradas, la más antigua al frente
    latencies: VecDeque<Duration>,

    requests_per_path: HashMap<String, u64>,

    /// Conexiones siendo atendidas ahora mismo
    active_connections: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                latencies: VecDeque::with_capacity(LATENCY_WINDOW),
                ..Default::default()
            })),
            start_time: Instant::now(),
        }
    }

    // Un handler que entró en pánico no invalida los contadores
    fn data(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registra un request atendido
    pub fn record_request(&self, path: &str, status_code: u16, latency: Duration) {
        let mut data = self.data();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;

        if data.latencies.len() >= LATENCY_WINDOW {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency);

        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;
    }

    pub fn connection_opened(&self) {
        self.data().active_connections += 1;
    }

    /// Nunca baja de cero
    pub fn connection_closed(&self) {
        let mut data = self.data();
        data.active_connections = data.active_connections.saturating_sub(1);
    }

    pub fn active_connections(&self) -> u64 {
        self.data().active_connections
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.data();
        let mut window: Vec<Duration> = data.latencies.iter().copied().collect();
        let summary = LatencySummary::from_samples(&mut window);

        let mut top_paths: Vec<PathCount> = data
            .requests_per_path
            .iter()
            .map(|(path, count)| PathCount {
                path: path.clone(),
                count: *count,
            })
            .collect();
        top_paths.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
        top_paths.truncate(10);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_requests: data.total_requests,
            active_connections: data.active_connections,
            status_codes: data.status_codes.iter().map(|(k, v)| (*k, *v)).collect(),
            top_paths,
            latency_us: LatencyMicros::from(&summary),
        }
    }

    /// Obtiene las métricas actuales en formato JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_requests: u64,
    pub active_connections: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub top_paths: Vec<PathCount>,
    pub latency_us: LatencyMicros,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PathCount {
    pub path: String,
    pub count: u64,
}

/// Latencias de la ventana en microsegundos
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LatencyMicros {
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub avg: u64,
    pub stddev: f64,
    pub samples: usize,
}

impl From<&LatencySummary> for LatencyMicros {
    fn from(summary: &LatencySummary) -> Self {
        Self {
            p50: summary.p50.as_micros() as u64,
            p95: summary.p95.as_micros() as u64,
            p99: summary.p99.as_micros() as u64,
            avg: summary.mean.as_micros() as u64,
            stddev: summary.stddev.as_secs_f64() * 1_000_000.0,
            samples: summary.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector() {
        let collector = MetricsCollector::new();

        collector.record_request("/users/1", 200, Duration::from_millis(10));
        collector.record_request("/users/1", 200, Duration::from_millis(20));
        collector.record_request("/users/9", 404, Duration::from_millis(5));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.status_codes.get(&200), Some(&2));
        assert_eq!(snapshot.status_codes.get(&404), Some(&1));
    }

    #[test]
    fn test_percentiles() {
        let collector = MetricsCollector::new();

        for i in 1..=100 {
            collector.record_request("/test", 200, Duration::from_micros(i));
        }

        let latency = collector.snapshot().latency_us;
        assert_eq!(latency.p50, 51);
        assert_eq!(latency.p95, 96);
        assert_eq!(latency.p99, 100);
        assert_eq!(latency.samples, 100);
    }

    #[test]
    fn test_active_connections_tracking() {
        let collector = MetricsCollector::new();

        collector.connection_opened();
        collector.connection_opened();
        assert_eq!(collector.active_connections(), 2);

        collector.connection_closed();
        collector.connection_closed();
        collector.connection_closed();
        assert_eq!(collector.active_connections(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let collector = MetricsCollector::new();
        let clone = collector.clone();

        clone.record_request("/health", 200, Duration::from_micros(5));
        assert_eq!(collector.snapshot().total_requests, 1);
    }

    #[test]
    fn test_json_format() {
        let collector = MetricsCollector::new();
        collector.record_request("/login", 200, Duration::from_millis(50));
        collector.record_request("/login", 401, Duration::from_millis(2));
        collector.record_request("/health", 200, Duration::from_millis(1));

        let value: serde_json::Value = serde_json::from_str(&collector.to_json()).unwrap();
        assert_eq!(value["total_requests"], 3);
        assert_eq!(value["status_codes"]["401"], 1);
        assert_eq!(value["top_paths"][0]["path"], "/login");
        assert_eq!(value["latency_us"]["samples"], 3);
    }

    #[test]
    fn test_latency_window_management() {
        let collector = MetricsCollector::new();

        for i in 0..15_000 {
            collector.record_request("/test", 200, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, 15_000);
        assert_eq!(snapshot.latency_us.samples, LATENCY_WINDOW);
        // Sólo quedan las 10k más recientes: 5000..15000
        assert_eq!(snapshot.latency_us.p50, 10_000);
    }

    #[test]
    fn test_empty_collector() {
        let snapshot = MetricsCollector::new().snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.latency_us.p99, 0);
        assert!(snapshot.top_paths.is_empty());
    }
}
