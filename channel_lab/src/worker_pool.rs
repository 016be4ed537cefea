//! # Worker pool
//! src/worker_pool.rs
//!
//! N workers comparten una cola acotada de trabajos (crossbeam MPMC) y
//! publican sus resultados en una cola sin límite. Cerrar la cola de
//! trabajos es la señal de fin: cada worker termina al drenarla.

use crate::error::{LabError, Result};
use crossbeam::channel::{self, Receiver, Sender};
use rand::Rng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Resultados de un pool ya apagado
#[derive(Debug)]
pub struct PoolReport<R> {
    /// `(worker, resultado)` en orden de llegada
    pub results: Vec<(usize, R)>,
    /// Trabajos procesados por cada worker, indexado por id
    pub per_worker: Vec<usize>,
}

impl<R> PoolReport<R> {
    pub fn total(&self) -> usize {
        self.per_worker.iter().sum()
    }
}

pub struct WorkerPool<J, R> {
    jobs: Option<Sender<J>>,
    results: Receiver<(usize, R)>,
    handles: Vec<JoinHandle<usize>>,
}

impl<J, R> WorkerPool<J, R>
where
    J: Send + 'static,
    R: Send + 'static,
{
    /// Arranca `workers` threads que aplican `f(worker_id, job)` a cada trabajo.
    pub fn new<F>(workers: usize, capacity: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, J) -> R + Send + Sync + 'static,
    {
        if workers == 0 {
            return Err(LabError::NoWorkers);
        }

        let (job_tx, job_rx) = channel::bounded::<J>(capacity);
        let (result_tx, result_rx) = channel::unbounded::<(usize, R)>();
        let f = Arc::new(f);

        let handles = (0..workers)
            .map(|id| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let f = Arc::clone(&f);

                thread::spawn(move || {
                    debug!(worker = id, "worker started");
                    let mut processed = 0;
                    for job in jobs.iter() {
                        processed += 1;
                        if results.send((id, f(id, job))).is_err() {
                            break;
                        }
                    }
                    debug!(worker = id, processed, "worker stopped");
                    processed
                })
            })
            .collect();

        Ok(WorkerPool {
            jobs: Some(job_tx),
            results: result_rx,
            handles,
        })
    }

    /// Encola un trabajo; bloquea si la cola está llena.
    pub fn submit(&self, job: J) -> Result<()> {
        self.jobs
            .as_ref()
            .ok_or(LabError::PoolClosed)?
            .send(job)
            .map_err(|_| LabError::PoolClosed)
    }

    /// Cierra la cola de trabajos. Los ya encolados se procesan igual.
    pub fn close(&mut self) {
        self.jobs.take();
    }

    /// Cierra la cola, espera a los workers y junta los resultados.
    pub fn shutdown(mut self) -> Result<PoolReport<R>> {
        self.close();

        let mut per_worker = Vec::with_capacity(self.handles.len());
        for handle in self.handles.drain(..) {
            per_worker.push(handle.join().map_err(|_| LabError::WorkerPanicked)?);
        }

        // Con todos los workers terminados la cola de resultados ya está cerrada
        let results: Vec<(usize, R)> = self.results.try_iter().collect();
        info!(jobs = results.len(), workers = per_worker.len(), "pool shut down");

        Ok(PoolReport {
            results,
            per_worker,
        })
    }
}

/// Duplica cada trabajo con un retardo aleatorio que simula carga.
pub fn double_all(workers: usize, jobs: Vec<i64>) -> Result<PoolReport<i64>> {
    let pool = WorkerPool::new(workers, jobs.len().max(1), |_, job: i64| {
        let jitter = rand::thread_rng().gen_range(0..5);
        thread::sleep(Duration::from_millis(jitter));
        job * 2
    })?;

    for job in jobs {
        pool.submit(job)?;
    }
    pool.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_all() {
        let report = double_all(3, (1..=9).collect()).unwrap();

        let mut doubled: Vec<i64> = report.results.iter().map(|(_, r)| *r).collect();
        doubled.sort_unstable();
        assert_eq!(doubled, (1..=9).map(|n| n * 2).collect::<Vec<_>>());
        assert_eq!(report.per_worker.len(), 3);
        assert_eq!(report.total(), 9);
    }

    #[test]
    fn test_zero_workers_is_an_error() {
        let pool = WorkerPool::new(0, 1, |_, job: u8| job);
        assert!(matches!(pool, Err(LabError::NoWorkers)));
    }

    #[test]
    fn test_submit_after_close() {
        let mut pool = WorkerPool::new(1, 1, |_, job: u8| job).unwrap();
        pool.submit(1).unwrap();
        pool.close();

        assert!(matches!(pool.submit(2), Err(LabError::PoolClosed)));
        let report = pool.shutdown().unwrap();
        assert_eq!(report.results, vec![(0, 1)]);
    }

    #[test]
    fn test_results_are_tagged_with_worker_id() {
        let pool = WorkerPool::new(2, 4, |id, job: usize| (id, job)).unwrap();
        for job in 0..20 {
            pool.submit(job).unwrap();
        }
        let report = pool.shutdown().unwrap();

        for (worker, (inner_id, _)) in &report.results {
            assert_eq!(worker, inner_id);
        }
        for (worker, count) in report.per_worker.iter().enumerate() {
            let tagged = report.results.iter().filter(|(w, _)| *w == worker).count();
            assert_eq!(tagged, *count);
        }
    }
}
