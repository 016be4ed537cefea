//! # Estadísticas de Latencia
//! src/stats.rs
//!
//! Resumen de una muestra de latencias: mínimo, máximo, media, percentiles
//! y desviación estándar. Lo usan el collector de métricas del servidor y
//! el benchmark.
//!
//! El percentil `p` se toma en el índice `len * p / 100` de la muestra
//! ordenada (limitado a `len - 1`).

use std::time::Duration;

/// Resumen estadístico de una muestra de latencias
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencySummary {
    pub count: usize,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
    /// Desviación estándar poblacional
    pub stddev: Duration,
}

impl LatencySummary {
    /// Calcula el resumen ordenando la muestra en el lugar
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::stats::LatencySummary;
    /// use std::time::Duration;
    ///
    /// let mut samples: Vec<Duration> = (1..=100).rev().map(Duration::from_millis).collect();
    /// let summary = LatencySummary::from_samples(&mut samples);
    ///
    /// assert_eq!(summary.min, Duration::from_millis(1));
    /// assert_eq!(summary.p50, Duration::from_millis(51));
    /// assert_eq!(summary.p99, Duration::from_millis(100));
    /// ```
    pub fn from_samples(samples: &mut [Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        samples.sort_unstable();

        let len = samples.len();
        let total: Duration = samples.iter().sum();
        let mean = total / len as u32;

        let mean_secs = mean.as_secs_f64();
        let variance = samples
            .iter()
            .map(|sample| {
                let diff = sample.as_secs_f64() - mean_secs;
                diff * diff
            })
            .sum::<f64>()
            / len as f64;

        Self {
            count: len,
            min: samples[0],
            max: samples[len - 1],
            mean,
            p50: percentile(samples, 50),
            p90: percentile(samples, 90),
            p95: percentile(samples, 95),
            p99: percentile(samples, 99),
            stddev: Duration::from_secs_f64(variance.sqrt()),
        }
    }
}

/// Percentil de una muestra ya ordenada
pub fn percentile(sorted: &[Duration], p: usize) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let index = (sorted.len() * p / 100).min(sorted.len() - 1);
    sorted[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        let summary = LatencySummary::from_samples(&mut []);
        assert_eq!(summary, LatencySummary::default());
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_single_sample() {
        let mut samples = vec![Duration::from_millis(7)];
        let summary = LatencySummary::from_samples(&mut samples);

        assert_eq!(summary.min, Duration::from_millis(7));
        assert_eq!(summary.max, Duration::from_millis(7));
        assert_eq!(summary.p99, Duration::from_millis(7));
        assert_eq!(summary.stddev, Duration::ZERO);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let mut samples = vec![
            Duration::from_millis(30),
            Duration::from_millis(10),
            Duration::from_millis(20),
        ];
        let summary = LatencySummary::from_samples(&mut samples);

        assert_eq!(samples[0], Duration::from_millis(10));
        assert_eq!(summary.min, Duration::from_millis(10));
        assert_eq!(summary.max, Duration::from_millis(30));
        assert_eq!(summary.mean, Duration::from_millis(20));
        // 3 * 50 / 100 = 1
        assert_eq!(summary.p50, Duration::from_millis(20));
    }

    #[test]
    fn test_percentile_index_clamped() {
        let sorted: Vec<Duration> = (1..=10).map(Duration::from_millis).collect();

        assert_eq!(percentile(&sorted, 90), Duration::from_millis(10));
        assert_eq!(percentile(&sorted, 100), Duration::from_millis(10));
        assert_eq!(percentile(&[], 50), Duration::ZERO);
    }

    #[test]
    fn test_stddev() {
        let mut samples: Vec<Duration> = [2, 4, 4, 4, 5, 5, 7, 9]
            .iter()
            .map(|&s| Duration::from_secs(s))
            .collect();
        let summary = LatencySummary::from_samples(&mut samples);

        assert_eq!(summary.mean, Duration::from_secs(5));
        let diff = (summary.stddev.as_secs_f64() - 2.0).abs();
        assert!(diff < 1e-6);
    }
}
