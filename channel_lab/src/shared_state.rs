//! # Estado compartido
//! src/shared_state.rs
//!
//! Contadores protegidos por `Mutex` y por atómicos, un mapa con `RwLock`
//! escrito y leído a la vez, y una inicialización única con `Once`.

use crate::error::{LabError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, Once, RwLock};
use std::thread;
use tracing::debug;

/// `threads` threads suman `iters` veces cada uno sobre un `Mutex<u64>`.
pub fn mutex_counter(threads: usize, iters: u64) -> Result<u64> {
    mutex_sum(threads, iters, |_| 1)
}

/// Cada thread suma `step(id)` en cada iteración. Un thread en pánico
/// se reporta como error en vez de devolver un total incompleto.
fn mutex_sum<F>(threads: usize, iters: u64, step: F) -> Result<u64>
where
    F: Fn(usize) -> u64 + Sync,
{
    let counter = Mutex::new(0u64);

    thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|id| {
                let (counter, step) = (&counter, &step);
                s.spawn(move || {
                    for _ in 0..iters {
                        let delta = step(id);
                        *counter.lock().unwrap_or_else(|p| p.into_inner()) += delta;
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .try_for_each(|h| h.join().map_err(|_| LabError::WorkerPanicked))
    })?;

    Ok(counter.into_inner().unwrap_or_else(|p| p.into_inner()))
}

/// Lo mismo que `mutex_counter` con un `AtomicU64`.
pub fn atomic_counter(threads: usize, iters: u64) -> u64 {
    let counter = AtomicU64::new(0);

    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..iters {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    counter.into_inner()
}

/// Escritores insertan `per_writer` claves cada uno mientras los lectores
/// recorren el mapa. Devuelve la cantidad final de claves.
pub fn rw_fill(writers: usize, per_writer: usize, readers: usize) -> usize {
    let map: RwLock<HashMap<String, usize>> = RwLock::new(HashMap::new());
    let reads = AtomicUsize::new(0);

    thread::scope(|s| {
        for w in 0..writers {
            let map = &map;
            s.spawn(move || {
                for i in 0..per_writer {
                    map.write()
                        .unwrap_or_else(|p| p.into_inner())
                        .insert(format!("w{}_k{}", w, i), i);
                }
            });
        }

        for _ in 0..readers {
            s.spawn(|| {
                for _ in 0..per_writer.max(1) {
                    let seen = map.read().unwrap_or_else(|p| p.into_inner()).len();
                    debug_assert!(seen <= writers * per_writer);
                    reads.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    debug!(reads = reads.into_inner(), "rw_fill finished");
    map.into_inner().unwrap_or_else(|p| p.into_inner()).len()
}

/// `callers` threads compiten por ejecutar el mismo `Once`. Devuelve cuántas
/// veces corrió su cuerpo.
pub fn once_runs(callers: usize) -> usize {
    let once = Once::new();
    let runs = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..callers {
            s.spawn(|| {
                once.call_once(|| {
                    runs.fetch_add(1, Ordering::SeqCst);
                });
            });
        }
    });

    runs.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_do_not_lose_updates() {
        assert_eq!(mutex_counter(8, 1_000).unwrap(), 8_000);
        assert_eq!(atomic_counter(8, 1_000), 8_000);
    }

    #[test]
    fn test_zero_threads() {
        assert_eq!(mutex_counter(0, 10).unwrap(), 0);
        assert_eq!(atomic_counter(0, 10), 0);
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let result = mutex_sum(4, 10, |id| {
            if id == 2 {
                panic!("worker {} failed", id);
            }
            1
        });
        assert!(matches!(result, Err(LabError::WorkerPanicked)));
    }

    #[test]
    fn test_rw_fill() {
        assert_eq!(rw_fill(4, 250, 3), 1_000);
        assert_eq!(rw_fill(0, 10, 2), 0);
    }

    #[test]
    fn test_once_runs_exactly_once() {
        assert_eq!(once_runs(16), 1);
        assert_eq!(once_runs(0), 0);
    }
}
